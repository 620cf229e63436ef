//! 민감 필드 암호화/복호화 및 마스킹
//!
//! 저장 포맷 (StoredSecret):
//! - `base64( iv(16 bytes) ‖ base64(ciphertext) )`
//! - cipher: AES-256-CBC + PKCS#7 (인증 태그 없음, 기밀성만 보장)
//!
//! 키: 호스트 salt 두 개를 이어 붙인 SHA-256 hex digest의 앞 32자.
//! 기존 플러그인이 저장한 값과 같은 포맷이므로 그대로 복호화됩니다.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// 키 길이 (AES-256)
pub const KEY_LEN: usize = 32;

/// IV 길이 (AES 블록 크기)
pub const IV_LEN: usize = 16;

/// 마스킹 문자
pub const MASK_GLYPH: char = '•';

/// 마스킹된 값이 그대로 되돌아왔는지 판별하는 마커
pub const PLACEHOLDER_SEQUENCE: &str = "•••";

/// 마스킹 시 노출하는 끝자리 수 기본값
pub const DEFAULT_VISIBLE_SUFFIX: usize = 4;

/// Vault 오류
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Invalid key material: {0}")]
    KeyMaterial(String),
}

/// salt에서 파생된 대칭키 (drop 시 zeroize)
#[derive(Clone)]
pub struct VaultKey {
    bytes: Zeroizing<[u8; KEY_LEN]>,
}

impl VaultKey {
    /// 호스트 salt 두 개로부터 키를 결정적으로 파생
    ///
    /// salt가 바뀌면 기존 암호문은 복호화할 수 없게 되며,
    /// 이 경우 `decrypt`는 저장된 값을 그대로 돌려줍니다.
    pub fn derive(auth_salt: &str, secure_auth_salt: &str) -> Result<Self, VaultError> {
        if auth_salt.is_empty() || secure_auth_salt.is_empty() {
            return Err(VaultError::KeyMaterial(
                "both salts must be non-empty".to_string(),
            ));
        }

        let mut material = Zeroizing::new(String::with_capacity(
            auth_salt.len() + secure_auth_salt.len(),
        ));
        material.push_str(auth_salt);
        material.push_str(secure_auth_salt);

        let hex = Zeroizing::new(format!("{:x}", Sha256::digest(material.as_bytes())));

        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        bytes.copy_from_slice(&hex.as_bytes()[..KEY_LEN]);

        Ok(Self { bytes })
    }

    fn as_array(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VaultKey(<redacted>)")
    }
}

/// Secret Vault
///
/// 민감 필드 하나하나를 개별 StoredSecret으로 보호합니다.
#[derive(Debug, Clone)]
pub struct SecretVault {
    key: VaultKey,
}

impl SecretVault {
    pub fn new(key: VaultKey) -> Self {
        Self { key }
    }

    /// salt로부터 바로 vault 생성
    pub fn from_salts(auth_salt: &str, secure_auth_salt: &str) -> Result<Self, VaultError> {
        Ok(Self::new(VaultKey::derive(auth_salt, secure_auth_salt)?))
    }

    /// 평문 암호화
    ///
    /// 빈 문자열은 보호 대상이 아니므로 그대로 빈 문자열을 반환합니다.
    /// 실패 시 평문으로 대체하지 않고 에러를 반환합니다.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, VaultError> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }

        let mut iv = [0u8; IV_LEN];
        OsRng.try_fill_bytes(&mut iv).map_err(|e| {
            tracing::error!(error = %e, "failed to generate IV");
            VaultError::Encryption(e.to_string())
        })?;

        let ciphertext = Aes256CbcEnc::new(self.key.as_array().into(), (&iv).into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        let inner = BASE64.encode(ciphertext);
        let mut payload = Vec::with_capacity(IV_LEN + inner.len());
        payload.extend_from_slice(&iv);
        payload.extend_from_slice(inner.as_bytes());

        Ok(BASE64.encode(payload))
    }

    /// StoredSecret 복호화
    ///
    /// 복호화할 수 없는 값(암호화 도입 이전의 평문, 다른 키로 암호화된 값 등)은
    /// 에러 없이 입력을 그대로 반환합니다.
    pub fn decrypt(&self, stored: &str) -> String {
        if stored.is_empty() {
            return String::new();
        }

        match self.try_decrypt(stored) {
            Some(plaintext) => plaintext,
            None => {
                tracing::debug!(len = stored.len(), "stored value not decryptable, using as-is");
                stored.to_string()
            }
        }
    }

    fn try_decrypt(&self, stored: &str) -> Option<String> {
        let data = BASE64.decode(stored).ok()?;
        if data.len() < IV_LEN {
            return None;
        }

        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&data[..IV_LEN]);

        let ciphertext = BASE64.decode(&data[IV_LEN..]).ok()?;
        let plaintext = Aes256CbcDec::new(self.key.as_array().into(), (&iv).into())
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .ok()?;

        String::from_utf8(plaintext).ok()
    }
}

/// 표시용 마스킹 (끝 `visible_suffix`자만 노출, 전체 길이는 유지)
pub fn mask(value: &str, visible_suffix: usize) -> String {
    let len = value.chars().count();
    if len <= visible_suffix {
        return value.to_string();
    }

    let hidden = len - visible_suffix;
    let mut masked: String = std::iter::repeat(MASK_GLYPH).take(hidden).collect();
    masked.extend(value.chars().skip(hidden));
    masked
}

/// 클라이언트가 마스킹 값을 그대로 돌려보냈는지 여부
pub fn contains_placeholder(value: &str) -> bool {
    value.contains(PLACEHOLDER_SEQUENCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault() -> SecretVault {
        SecretVault::from_salts("test-auth-salt", "test-secure-auth-salt").unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let vault = vault();
        let stored = vault.encrypt("smtp-p@ssw0rd!").unwrap();

        assert_ne!(stored, "smtp-p@ssw0rd!");
        assert_eq!(vault.decrypt(&stored), "smtp-p@ssw0rd!");
    }

    #[test]
    fn test_empty_value_is_noop() {
        let vault = vault();
        assert_eq!(vault.encrypt("").unwrap(), "");
        assert_eq!(vault.decrypt(""), "");
    }

    #[test]
    fn test_fresh_iv_per_encryption() {
        let vault = vault();
        let a = vault.encrypt("same-secret").unwrap();
        let b = vault.encrypt("same-secret").unwrap();

        assert_ne!(a, b);
        assert_eq!(vault.decrypt(&a), vault.decrypt(&b));
    }

    #[test]
    fn test_decrypts_existing_stored_format() {
        // iv = 00..0f, 기존 플러그인이 저장한 것과 동일한 레이아웃
        let stored = "AAECAwQFBgcICQoLDA0OD3pKWU9DTFZKeFo5NmhBejNCTTVUZlpOSHlVVlZZMXZncytwYkxFd2U4bVU9";
        assert_eq!(vault().decrypt(stored), "sk_live_51Hx9exampleSecret");
    }

    #[test]
    fn test_legacy_plaintext_passes_through() {
        let vault = vault();
        assert_eq!(vault.decrypt("plain-old-password"), "plain-old-password");
        // base64로는 디코딩되지만 IV보다 짧은 값
        assert_eq!(vault.decrypt("YWJj"), "YWJj");
    }

    #[test]
    fn test_other_salts_fall_back_to_stored_value() {
        let stored = vault().encrypt("rotated").unwrap();
        let other = SecretVault::from_salts("new-auth-salt", "new-secure-salt").unwrap();

        assert_eq!(other.decrypt(&stored), stored);
    }

    #[test]
    fn test_empty_salt_rejected() {
        assert!(matches!(
            VaultKey::derive("", "secure"),
            Err(VaultError::KeyMaterial(_))
        ));
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("abcdefgh", 4), "••••efgh");
        assert_eq!(mask("ab", 4), "ab");
        assert_eq!(mask("abcd", 4), "abcd");
        assert_eq!(mask("", 4), "");
        assert_eq!(mask("pässwörd", 2), "••••••rd");
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(contains_placeholder(&mask("sk_test_123456789", DEFAULT_VISIBLE_SUFFIX)));
        assert!(!contains_placeholder("sk_test_123456789"));
    }
}
