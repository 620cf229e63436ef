//! Secret Vault 모듈
//!
//! API 자격증명 중 민감 필드를 저장 시 암호화하고, 관리자 화면에는 마스킹된 값만 노출합니다.
//!
//! - 키는 호스트 salt 두 개로부터 파생 (별도 저장 없음)
//! - 필드 단위 AES-256-CBC 암호화, 복호화 불가 값은 평문으로 간주
//! - 표시용 마스킹은 끝 4자리만 노출

pub mod vault;

pub use vault::{mask, SecretVault, VaultError, VaultKey, DEFAULT_VISIBLE_SUFFIX};

/// 암호화 대상 필드 (런타임에 바뀌지 않음)
pub const SENSITIVE_FIELDS: [&str; 4] = [
    "supabase_service_key",
    "session_secret",
    "stripe_secret_key",
    "smtp_password",
];

pub fn is_sensitive(field: &str) -> bool {
    SENSITIVE_FIELDS.contains(&field)
}
