//! FairFence Error Types
//!
//! 저장소/명령 계층 공통 에러 타입 정의

use serde::Serialize;
use thiserror::Error;

use crate::secrets::vault::VaultError;

/// 설정 저장소 에러
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),

    #[error("Permission denied")]
    Forbidden,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SettingsError {
    /// 저장소 쓰기 실패 계열인지 여부 (500 응답 대상)
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            SettingsError::Database(_)
                | SettingsError::Io(_)
                | SettingsError::Serialization(_)
                | SettingsError::Persistence(_)
        )
    }
}

/// 라우터 응답용 직렬화 가능한 에러
#[derive(Debug, Serialize)]
pub struct CommandError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    /// HTTP 상태 코드 (라우팅 계층이 그대로 사용)
    #[serde(skip)]
    pub status: u16,
}

impl CommandError {
    pub fn new(code: &str, message: impl Into<String>, status: u16) -> Self {
        CommandError {
            code: code.to_string(),
            message: message.into(),
            details: None,
            status,
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<SettingsError> for CommandError {
    fn from(error: SettingsError) -> Self {
        // 저장소 실패 원인은 로그에만 남기고 클라이언트에는 일반 메시지만 전달
        if error.is_persistence() {
            tracing::error!(error = %error, "settings persistence failed");
            return CommandError::new("UPDATE_FAILED", "Failed to save settings", 500);
        }

        match error {
            SettingsError::Validation(message) => {
                CommandError::new("VALIDATION_ERROR", message, 400)
            }
            SettingsError::NotFound { kind, .. } => {
                CommandError::new("NOT_FOUND", format!("{} not found", kind), 404)
            }
            SettingsError::Forbidden => CommandError::new(
                "FORBIDDEN",
                "You are not allowed to manage these settings",
                403,
            ),
            SettingsError::Vault(e) => {
                tracing::error!(error = %e, "secret vault failure");
                CommandError::new("VAULT_ERROR", "Failed to protect sensitive value", 500)
            }
            other => {
                tracing::error!(error = %other, "unexpected settings error");
                CommandError::new("INTERNAL_ERROR", "Unexpected error", 500)
            }
        }
    }
}

/// 명령 결과 타입
pub type CommandResult<T> = Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_errors_use_generic_message() {
        let err: CommandError =
            SettingsError::Persistence("disk full at /var/lib/x".to_string()).into();
        assert_eq!(err.status, 500);
        assert_eq!(err.message, "Failed to save settings");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err: CommandError = SettingsError::NotFound {
            kind: "FAQ",
            id: "nope".to_string(),
        }
        .into();
        assert_eq!(err.status, 404);
        assert_eq!(err.code, "NOT_FOUND");
        assert_eq!(err.message, "FAQ not found");
    }
}
