//! FairFence - Content Management Core
//!
//! 사이트 콘텐츠(일반 정보, 후기, FAQ, 서비스, 이미지)와 외부 서비스 자격증명을
//! 옵션 저장소 위에서 관리하는 라이브러리입니다.
//!
//! - `secrets`: 민감 필드 암호화/복호화/마스킹
//! - `settings`: 타입 있는 설정 저장소 + 연결 테스트
//! - `commands`: 라우팅 계층이 호출하는 권한 검사된 핸들러

pub mod access;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod secrets;
pub mod settings;
pub mod utils;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::AppConfig;
use db::Database;
use error::SettingsError;
use secrets::SecretVault;
use settings::{ConnectionTester, SettingsRepository};

/// 프로세스당 한 번 구성되는 서비스 묶음
pub struct FairFence {
    config: AppConfig,
    database: Arc<Database>,
    repository: SettingsRepository,
}

impl FairFence {
    /// DB 열기/스키마 초기화 → vault 키 파생 → 저장소 구성
    pub fn new(config: AppConfig) -> Result<Self, SettingsError> {
        let database = Arc::new(Database::new(&config.db_path)?);
        database.initialize()?;

        let vault = SecretVault::from_salts(&config.auth_salt, &config.secure_auth_salt)?;
        let connections =
            ConnectionTester::new(config.connection_timeout, &config.stripe_api_base)?;
        let repository = SettingsRepository::new(database.clone(), vault, connections);

        tracing::info!(db_path = %config.db_path.display(), "fairfence initialized");

        Ok(Self {
            config,
            database,
            repository,
        })
    }

    pub fn repository(&self) -> &SettingsRepository {
        &self.repository
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn api_base(&self) -> String {
        self.config.api_base()
    }
}

/// 로깅 초기화
///
/// `RUST_LOG`가 없으면 `info` 레벨. 로그는 stderr로 보내 stdout(JSON 출력)과 섞이지 않게 합니다.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // 테스트 등에서 이미 설치된 경우는 무시
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init();
}
