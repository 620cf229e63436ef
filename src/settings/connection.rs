//! 외부 서비스 연결 테스트
//!
//! 복호화된 설정으로 1회성 요청을 보내 도달 가능 여부를 확인합니다.
//! - 제한 시간 초과/전송 오류는 실패로 보고 (재시도 없음)
//! - HTTP 401은 엔드포인트와 키 형식이 유효하다는 뜻이므로 성공으로 분류

use std::time::Duration;

use reqwest::StatusCode;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use super::SettingsRepository;
use crate::error::SettingsError;
use crate::models::{ConfigurationRecord, ConnectionTestResult, ExternalService};

/// SMTP 인사 최대 길이 (bytes)
const MAX_GREETING_LEN: u64 = 512;

/// 연결 테스트용 HTTP 클라이언트 + 제한 시간
pub struct ConnectionTester {
    client: reqwest::Client,
    timeout: Duration,
    stripe_api_base: String,
}

impl ConnectionTester {
    pub fn new(timeout: Duration, stripe_api_base: &str) -> Result<Self, SettingsError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SettingsError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout,
            stripe_api_base: stripe_api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn supabase(&self, config: &ConfigurationRecord) -> ConnectionTestResult {
        let url = field(config, "supabase_url");
        let anon_key = field(config, "supabase_anon_key");
        if url.is_empty() || anon_key.is_empty() {
            return ConnectionTestResult::failed("Supabase URL and Anon Key are required");
        }

        let endpoint = format!("{}/rest/v1/", url.trim_end_matches('/'));
        let response = self
            .client
            .get(&endpoint)
            .header("apikey", anon_key)
            .bearer_auth(anon_key)
            .send()
            .await;

        match response {
            Ok(resp) => classify_status(resp.status()),
            Err(e) => ConnectionTestResult::failed(format!("Connection failed: {}", e)),
        }
    }

    async fn stripe(&self, config: &ConfigurationRecord) -> ConnectionTestResult {
        let secret_key = field(config, "stripe_secret_key");
        if secret_key.is_empty() {
            return ConnectionTestResult::failed("Stripe Secret Key is required");
        }

        let endpoint = format!("{}/v1/balance", self.stripe_api_base);
        match self.client.get(&endpoint).bearer_auth(secret_key).send().await {
            Ok(resp) => classify_status(resp.status()),
            Err(e) => ConnectionTestResult::failed(format!("Connection failed: {}", e)),
        }
    }

    async fn smtp(&self, config: &ConfigurationRecord) -> ConnectionTestResult {
        let host = field(config, "smtp_host");
        let port = field(config, "smtp_port");
        if host.is_empty() || port.is_empty() {
            return ConnectionTestResult::failed("SMTP Host and Port are required");
        }

        let port = match port.parse::<u16>() {
            Ok(p) if p > 0 => p,
            _ => {
                return ConnectionTestResult::failed("SMTP Port must be between 1 and 65535")
            }
        };

        match tokio::time::timeout(self.timeout, read_smtp_greeting(host, port)).await {
            Err(_) => ConnectionTestResult::failed(format!(
                "Connection timed out after {}s",
                self.timeout.as_secs_f32()
            )),
            Ok(Err(e)) => ConnectionTestResult::failed(format!("Connection failed: {}", e)),
            Ok(Ok(greeting)) if greeting.starts_with("220") => {
                ConnectionTestResult::ok(format!("SMTP server ready: {}", greeting.trim()))
            }
            Ok(Ok(greeting)) => ConnectionTestResult::failed(format!(
                "Unexpected SMTP greeting: {}",
                greeting.trim()
            )),
        }
    }
}

impl SettingsRepository {
    /// 외부 서비스 연결 테스트
    ///
    /// 필수 필드가 비어 있으면 네트워크 요청 없이 실패를 반환합니다.
    /// 저장소 읽기 실패만 에러로 전파됩니다.
    pub async fn test_external_service(
        &self,
        service: ExternalService,
    ) -> Result<ConnectionTestResult, SettingsError> {
        let config = self.decrypted_configuration()?;

        let result = match service {
            ExternalService::Supabase => self.connections.supabase(&config).await,
            ExternalService::Stripe => self.connections.stripe(&config).await,
            ExternalService::Smtp => self.connections.smtp(&config).await,
        };

        if result.success {
            tracing::info!(%service, "connection test succeeded");
        } else {
            tracing::warn!(%service, message = %result.message, "connection test failed");
        }
        Ok(result)
    }
}

fn field<'a>(config: &'a ConfigurationRecord, key: &str) -> &'a str {
    config.get(key).map(|v| v.trim()).unwrap_or_default()
}

fn classify_status(status: StatusCode) -> ConnectionTestResult {
    if status == StatusCode::OK || status == StatusCode::UNAUTHORIZED {
        ConnectionTestResult::ok("Connection successful!")
    } else {
        ConnectionTestResult::failed(format!(
            "Connection failed with status: {}",
            status.as_u16()
        ))
    }
}

async fn read_smtp_greeting(host: &str, port: u16) -> std::io::Result<String> {
    let stream = TcpStream::connect((host, port)).await?;
    // 끝없는 한 줄을 보내는 서버 대비 인사 길이 제한
    let mut reader = BufReader::new(stream.take(MAX_GREETING_LEN));

    let mut greeting = String::new();
    reader.read_line(&mut greeting).await?;

    // 인사만 확인하고 정상 종료
    let _ = reader.get_mut().get_mut().write_all(b"QUIT\r\n").await;
    Ok(greeting)
}
