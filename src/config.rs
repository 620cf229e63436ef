//! App Configuration
//!
//! 환경 변수(+ `.env`)에서 프로세스 설정을 읽습니다.
//! salt 두 개는 vault 키 파생에만 쓰이며 로그/Debug 출력에 노출되지 않습니다.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::SettingsError;

/// REST 네임스페이스
pub const API_NAMESPACE: &str = "fairfence/v1";

const DEFAULT_DB_PATH: &str = "fairfence.db";
const DEFAULT_SITE_URL: &str = "http://localhost";
const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct AppConfig {
    pub auth_salt: String,
    pub secure_auth_salt: String,
    pub db_path: PathBuf,
    pub site_url: String,
    pub connection_timeout: Duration,
    pub stripe_api_base: String,
}

impl AppConfig {
    /// `.env`를 로드한 뒤 프로세스 환경에서 설정 구성
    pub fn from_env() -> Result<Self, SettingsError> {
        // 운영 환경에는 .env가 없을 수 있으므로 실패는 무시
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 key → value 조회 함수로 설정 구성
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let auth_salt = get("FAIRFENCE_AUTH_SALT")
            .ok_or_else(|| SettingsError::Config("FAIRFENCE_AUTH_SALT is not set".to_string()))?;
        let secure_auth_salt = get("FAIRFENCE_SECURE_AUTH_SALT").ok_or_else(|| {
            SettingsError::Config("FAIRFENCE_SECURE_AUTH_SALT is not set".to_string())
        })?;

        let connection_timeout = match get("FAIRFENCE_CONNECTION_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                SettingsError::Config(format!(
                    "FAIRFENCE_CONNECTION_TIMEOUT_SECS must be a number of seconds, got {:?}",
                    raw
                ))
            })?,
            None => DEFAULT_CONNECTION_TIMEOUT_SECS,
        };

        Ok(Self {
            auth_salt,
            secure_auth_salt,
            db_path: get("FAIRFENCE_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            site_url: get("FAIRFENCE_SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            connection_timeout: Duration::from_secs(connection_timeout),
            stripe_api_base: get("FAIRFENCE_STRIPE_API_BASE")
                .unwrap_or_else(|| DEFAULT_STRIPE_API_BASE.to_string()),
        })
    }

    /// 공개 설정에 노출되는 REST base URL
    pub fn api_base(&self) -> String {
        format!("{}/wp-json/{}", self.site_url.trim_end_matches('/'), API_NAMESPACE)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("auth_salt", &"<redacted>")
            .field("secure_auth_salt", &"<redacted>")
            .field("db_path", &self.db_path)
            .field("site_url", &self.site_url)
            .field("connection_timeout", &self.connection_timeout)
            .field("stripe_api_base", &self.stripe_api_base)
            .finish()
    }
}
