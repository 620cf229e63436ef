//! Command Handlers
//!
//! 라우팅 계층(`fairfence/v1/*`)이 호출하는 핸들러 정의.
//! 각 핸들러는 권한 검사 → 입력 정리 → 저장소 호출 순서로 동작하고
//! 직렬화 가능한 응답 또는 `CommandError`를 반환합니다.

pub mod api_config;
pub mod content;
pub mod settings;

use serde::Serialize;

/// 삭제 등 본문 없는 성공 응답
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
