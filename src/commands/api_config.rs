//! API Configuration Commands
//!
//! 외부 서비스 자격증명 조회/갱신과 연결 테스트 (모두 관리자 전용).
//! 응답에는 항상 마스킹된 설정만 담깁니다.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::access::{Access, AccessPolicy};
use crate::error::CommandResult;
use crate::models::{
    ConfigMode, ConfigView, ConfigurationRecord, ConnectionTestResult, ExternalService,
};
use crate::settings::{SettingsRepository, CONFIGURATION_FIELDS};
use crate::utils::{sanitize_absint, sanitize_text_field, sanitize_url};

#[derive(Debug, Deserialize)]
pub struct UpdateApiConfigArgs {
    pub config: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct UpdateApiConfigResponse {
    pub success: bool,
    pub message: String,
    pub config: ConfigView,
}

#[derive(Debug, Deserialize)]
pub struct TestConnectionArgs {
    pub service: String,
}

/// 마스킹된 API 설정 조회
pub fn get_api_config(
    repo: &SettingsRepository,
    policy: &dyn AccessPolicy,
) -> CommandResult<ConfigView> {
    policy.check(Access::Admin)?;
    Ok(repo.get_configuration(ConfigMode::AdminMasked)?)
}

/// API 설정 갱신
///
/// 알려진 필드만 받아들이고 필드 종류별로 정리한 뒤 저장소에 넘깁니다.
pub fn update_api_config(
    repo: &SettingsRepository,
    policy: &dyn AccessPolicy,
    args: UpdateApiConfigArgs,
) -> CommandResult<UpdateApiConfigResponse> {
    policy.check(Access::Admin)?;

    repo.update_configuration(sanitize_config(&args.config))?;

    Ok(UpdateApiConfigResponse {
        success: true,
        message: "API configuration updated successfully".to_string(),
        config: repo.get_configuration(ConfigMode::AdminMasked)?,
    })
}

/// 외부 서비스 연결 테스트
pub async fn test_connection(
    repo: &SettingsRepository,
    policy: &dyn AccessPolicy,
    args: TestConnectionArgs,
) -> CommandResult<ConnectionTestResult> {
    policy.check(Access::Admin)?;

    let service: ExternalService = match sanitize_text_field(&args.service).parse() {
        Ok(service) => service,
        Err(_) => return Ok(ConnectionTestResult::failed("Unknown service")),
    };

    Ok(repo.test_external_service(service).await?)
}

fn sanitize_config(raw: &Map<String, Value>) -> ConfigurationRecord {
    let mut sanitized = ConfigurationRecord::new();

    for field in CONFIGURATION_FIELDS {
        let Some(value) = raw.get(field) else {
            continue;
        };

        let text = match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };

        let clean = match field {
            "supabase_url" => sanitize_url(&text),
            "smtp_port" => sanitize_absint(&text),
            _ => sanitize_text_field(&text),
        };
        sanitized.insert(field.to_string(), clean);
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use crate::settings::testing::repository;
    use serde_json::json;

    fn args(config: Value) -> UpdateApiConfigArgs {
        serde_json::from_value(json!({ "config": config })).unwrap()
    }

    #[test]
    fn test_update_sanitizes_and_masks_response() {
        let (repo, _) = repository();
        let response = update_api_config(
            &repo,
            &Role::Administrator,
            args(json!({
                "supabase_url": " https://abc.supabase.co ",
                "smtp_port": 587,
                "smtp_password": "hunter2-smtp",
                "unknown_field": "dropped",
            })),
        )
        .unwrap();

        let config = response.config;
        assert_eq!(config["supabase_url"].as_text(), Some("https://abc.supabase.co"));
        assert_eq!(config["smtp_port"].as_text(), Some("587"));
        assert_eq!(config["smtp_password_masked"].as_text(), Some("••••••••smtp"));
        assert!(!config.contains_key("smtp_password"));
        assert!(!config.contains_key("unknown_field"));
    }

    #[test]
    fn test_echoed_masked_config_round_trip() {
        let (repo, _) = repository();
        update_api_config(
            &repo,
            &Role::Administrator,
            args(json!({ "stripe_secret_key": "sk_live_abcdef123456" })),
        )
        .unwrap();

        let view = get_api_config(&repo, &Role::Administrator).unwrap();
        let masked = view["stripe_secret_key_masked"].as_text().unwrap().to_string();

        update_api_config(
            &repo,
            &Role::Administrator,
            args(json!({ "stripe_secret_key": masked })),
        )
        .unwrap();

        let internal = repo.decrypted_configuration().unwrap();
        assert_eq!(internal["stripe_secret_key"], "sk_live_abcdef123456");
    }

    #[test]
    fn test_api_config_is_admin_only() {
        let (repo, _) = repository();
        assert_eq!(get_api_config(&repo, &Role::Visitor).unwrap_err().status, 403);
        assert_eq!(
            update_api_config(&repo, &Role::Editor, args(json!({})))
                .unwrap_err()
                .status,
            403
        );
    }

    #[tokio::test]
    async fn test_unknown_service() {
        let (repo, _) = repository();
        let result = test_connection(
            &repo,
            &Role::Administrator,
            TestConnectionArgs {
                service: "ftp".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(!result.success);
        assert_eq!(result.message, "Unknown service");
    }

    #[tokio::test]
    async fn test_connection_requires_admin() {
        let (repo, _) = repository();
        let err = test_connection(
            &repo,
            &Role::Visitor,
            TestConnectionArgs {
                service: "supabase".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, "FORBIDDEN");
    }
}
