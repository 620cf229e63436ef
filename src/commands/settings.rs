//! Settings Commands
//!
//! 전체 설정 묶음 조회/갱신, 프론트엔드용 공개 설정

use serde::{Deserialize, Serialize};

use crate::access::{Access, AccessPolicy};
use crate::error::CommandResult;
use crate::models::{ConfigMode, PublicConfig, SettingsBundle, SettingsUpdate};
use crate::settings::SettingsRepository;

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsArgs {
    pub settings: SettingsUpdate,
}

#[derive(Debug, Serialize)]
pub struct UpdateSettingsResponse {
    pub success: bool,
    pub message: String,
    pub settings: SettingsBundle,
}

/// 전체 설정 조회 (공개)
///
/// 관리자에게는 마스킹된 API 설정을, 그 외 호출자에게는 민감 필드가 제거된 설정을 반환합니다.
/// 공개 엔드포인트지만 `_masked`/`_has_value`도 비밀값의 일부 정보이므로
/// 비인증 호출자에게는 `Public` 뷰만 내보냅니다.
pub fn get_settings(
    repo: &SettingsRepository,
    policy: &dyn AccessPolicy,
) -> CommandResult<SettingsBundle> {
    policy.check(Access::Public)?;
    let mode = if policy.can_manage_options() {
        ConfigMode::AdminMasked
    } else {
        ConfigMode::Public
    };
    Ok(repo.all_settings(mode)?)
}

/// 전체 설정 갱신 (관리자)
pub fn update_settings(
    repo: &SettingsRepository,
    policy: &dyn AccessPolicy,
    args: UpdateSettingsArgs,
) -> CommandResult<UpdateSettingsResponse> {
    policy.check(Access::Admin)?;
    repo.update_settings(args.settings)?;

    Ok(UpdateSettingsResponse {
        success: true,
        message: "Settings updated successfully".to_string(),
        settings: repo.all_settings(ConfigMode::AdminMasked)?,
    })
}

/// 공개 설정 (프론트엔드)
pub fn get_public_config(
    repo: &SettingsRepository,
    policy: &dyn AccessPolicy,
    api_base: &str,
) -> CommandResult<PublicConfig> {
    policy.check(Access::Public)?;
    Ok(repo.public_config(api_base)?)
}
