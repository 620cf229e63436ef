//! FairFence Data Models
//!
//! 관리자 화면(JS)과 공개 프론트엔드가 주고받는 JSON 문서와 매핑되는 데이터 모델

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// API 설정 레코드 (필드 이름 → 문자열 값)
pub type ConfigurationRecord = BTreeMap<String, String>;

/// 조회 모드별 API 설정 뷰
pub type ConfigView = BTreeMap<String, ConfigValue>;

/// 설정 뷰의 값: 문자열 또는 `_has_value` 같은 플래그
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Text(String),
    Flag(bool),
}

impl ConfigValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            ConfigValue::Flag(_) => None,
        }
    }
}

/// API 설정 조회 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigMode {
    /// 민감 필드 완전 제거 (비인증/프론트엔드)
    Public,
    /// 민감 필드를 `_masked` / `_has_value`로 대체 (관리자 화면)
    AdminMasked,
    /// 민감 필드 복호화 (내부 1회성 사용, 외부 반환 금지)
    InternalDecrypted,
}

/// 일반 설정 (사업자 정보)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    pub business_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub tagline: String,
    pub about_text: String,
    /// 알려지지 않은 키도 보존
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            business_name: "FairFence Contracting Waikato".to_string(),
            phone: "027 960 3892".to_string(),
            email: "alex@fairfence.nz".to_string(),
            address: "Ohaupo, Waikato".to_string(),
            tagline: "Where Fairness and Quality Intersect".to_string(),
            about_text: "Welcome to Fairfence Contracting Waikato, a company that's built on the pillars of fairness and exceptional quality.".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

/// 항목 id: 문자열 또는 정수 (이전 버전은 이미지 id를 정수로 저장)
fn deserialize_item_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or integer id, got {}",
            other
        ))),
    }
}

/// 고객 후기
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    #[serde(default, deserialize_with = "deserialize_item_id")]
    pub id: String,
    pub name: String,
    pub location: String,
    pub rating: i64,
    pub text: String,
    pub date: String,
    pub source: String,
}

/// FAQ 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    #[serde(default, deserialize_with = "deserialize_item_id")]
    pub id: String,
    pub question: String,
    pub answer: String,
}

/// 서비스 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOffering {
    #[serde(default, deserialize_with = "deserialize_item_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(rename = "priceRange", default)]
    pub price_range: String,
}

/// 이미지 메타데이터 (파일 자체는 호스트 미디어 라이브러리에 있음)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    #[serde(default, deserialize_with = "deserialize_item_id")]
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub category: String,
}

/// 허용되는 이미지 카테고리 (빈 문자열 = 미분류)
pub const IMAGE_CATEGORIES: [&str; 5] = [
    "",
    "Hero Images",
    "Service Images",
    "Gallery Images",
    "Testimonial Images",
];

/// 전체 설정 묶음 (관리자 화면 초기 로드용)
#[derive(Debug, Clone, Serialize)]
pub struct SettingsBundle {
    pub general: GeneralSettings,
    pub testimonials: Vec<Testimonial>,
    pub faq: Vec<FaqEntry>,
    pub services: Vec<ServiceOffering>,
    pub images: Vec<ImageAsset>,
    pub api_config: ConfigView,
}

/// 전체 설정 부분 갱신 요청 (있는 섹션만 교체)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub general: Option<GeneralSettings>,
    pub testimonials: Option<Vec<Testimonial>>,
    pub faq: Option<Vec<FaqEntry>>,
    pub services: Option<Vec<ServiceOffering>>,
    pub images: Option<Vec<ImageAsset>>,
}

/// 공개 설정 (프론트엔드용)
#[derive(Debug, Clone, Serialize)]
pub struct PublicConfig {
    pub api: PublicApiConfig,
    pub business: PublicBusinessInfo,
    pub endpoints: PublicEndpoints,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicApiConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub stripe_public_key: String,
    pub smtp_host: String,
    pub smtp_port: String,
    pub smtp_user: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicBusinessInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicEndpoints {
    pub api_base: String,
}

/// 연결 테스트 대상 서비스
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExternalService {
    Supabase,
    Stripe,
    Smtp,
}

impl FromStr for ExternalService {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supabase" => Ok(ExternalService::Supabase),
            "stripe" => Ok(ExternalService::Stripe),
            "smtp" => Ok(ExternalService::Smtp),
            other => Err(format!("Unknown service: {}", other)),
        }
    }
}

impl fmt::Display for ExternalService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExternalService::Supabase => "supabase",
            ExternalService::Stripe => "stripe",
            ExternalService::Smtp => "smtp",
        };
        f.write_str(name)
    }
}

/// 연결 테스트 결과 (실패도 에러가 아닌 결과로 보고)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionTestResult {
    pub success: bool,
    pub message: String,
}

impl ConnectionTestResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
