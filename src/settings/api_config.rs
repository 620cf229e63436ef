//! API 설정 경로
//!
//! 민감 필드의 마스킹/암호화 경계를 강제합니다.
//! - 읽기: 모드별로 제거 / 마스킹 / 복호화
//! - 쓰기: 마스킹 값이 되돌아오면 기존 암호문 유지, 새 값만 암호화

use serde_json::Value;
use zeroize::Zeroizing;

use super::{SettingsRepository, OPTION_API_CONFIG};
use crate::error::SettingsError;
use crate::models::{ConfigMode, ConfigValue, ConfigView, ConfigurationRecord};
use crate::secrets::vault::contains_placeholder;
use crate::secrets::{is_sensitive, mask, DEFAULT_VISIBLE_SUFFIX, SENSITIVE_FIELDS};

/// 알려진 API 설정 필드
pub const CONFIGURATION_FIELDS: [&str; 10] = [
    "supabase_url",
    "supabase_anon_key",
    "supabase_service_key",
    "session_secret",
    "stripe_public_key",
    "stripe_secret_key",
    "smtp_host",
    "smtp_port",
    "smtp_user",
    "smtp_password",
];

/// 모든 필드가 빈 문자열인 기본 설정
pub fn default_configuration() -> ConfigurationRecord {
    CONFIGURATION_FIELDS
        .iter()
        .map(|field| (field.to_string(), String::new()))
        .collect()
}

impl SettingsRepository {
    /// 모드별 API 설정 조회
    ///
    /// 기본값 위에 저장값을 덮어쓴 뒤, 민감 필드만 모드에 따라 가공합니다.
    /// 비민감 필드는 모든 모드에서 그대로 전달됩니다.
    pub fn get_configuration(&self, mode: ConfigMode) -> Result<ConfigView, SettingsError> {
        let mut config = default_configuration();
        config.extend(self.stored_configuration()?);

        let mut view = ConfigView::new();
        for (key, value) in config {
            // 저장소에 섞여 들어간 `<민감필드>_masked` 같은 키는 어떤 모드에서도 노출하지 않음
            if is_derived_from_sensitive(&key) {
                continue;
            }
            if !is_sensitive(&key) {
                view.insert(key, ConfigValue::Text(value));
                continue;
            }

            match mode {
                ConfigMode::Public => {}
                ConfigMode::AdminMasked => {
                    let has_value = !value.is_empty();
                    if has_value {
                        let plaintext = Zeroizing::new(self.vault.decrypt(&value));
                        view.insert(
                            format!("{}_masked", key),
                            ConfigValue::Text(mask(&plaintext, DEFAULT_VISIBLE_SUFFIX)),
                        );
                    }
                    view.insert(format!("{}_has_value", key), ConfigValue::Flag(has_value));
                }
                ConfigMode::InternalDecrypted => {
                    let plaintext = self.vault.decrypt(&value);
                    view.insert(key, ConfigValue::Text(plaintext));
                }
            }
        }

        Ok(view)
    }

    /// API 설정 갱신
    ///
    /// 필드별 처리:
    /// 1. 마스킹 값(`•••` 포함, 또는 현재 마스킹 표시와 동일) → 기존 저장값 유지
    /// 2. 민감 필드 + 비어있지 않음 → 새로 암호화
    /// 3. 그 외 → 그대로 저장 (민감 필드에 빈 값이면 삭제 효과)
    ///
    /// 전달되지 않은 필드는 기존 값을 유지합니다.
    pub fn update_configuration(&self, incoming: ConfigurationRecord) -> Result<(), SettingsError> {
        let existing = self.stored_configuration()?;
        let mut merged = existing.clone();
        let mut changed = Vec::new();

        for (key, value) in incoming {
            if !CONFIGURATION_FIELDS.contains(&key.as_str()) {
                tracing::debug!(field = %key, "ignoring unknown api configuration field");
                continue;
            }
            if self.is_echoed_mask(&key, &value, existing.get(&key)) {
                continue;
            }

            let stored = if is_sensitive(&key) && !value.is_empty() {
                self.vault.encrypt(&value).map_err(|e| {
                    tracing::error!(field = %key, "refusing to store sensitive field unencrypted");
                    SettingsError::Vault(e)
                })?
            } else {
                value
            };

            changed.push(key.clone());
            merged.insert(key, stored);
        }

        self.save(OPTION_API_CONFIG, &merged)?;
        tracing::info!(fields = ?changed, "api configuration updated");
        Ok(())
    }

    /// 내부 1회성 사용을 위한 복호화된 설정
    pub(crate) fn decrypted_configuration(&self) -> Result<ConfigurationRecord, SettingsError> {
        Ok(self
            .get_configuration(ConfigMode::InternalDecrypted)?
            .into_iter()
            .filter_map(|(key, value)| match value {
                ConfigValue::Text(text) => Some((key, text)),
                ConfigValue::Flag(_) => None,
            })
            .collect())
    }

    /// 저장된 원본 레코드 (민감 필드는 암호문 그대로)
    ///
    /// 숫자/불리언으로 저장된 값도 문자열로 읽습니다.
    fn stored_configuration(&self) -> Result<ConfigurationRecord, SettingsError> {
        let mut record = ConfigurationRecord::new();
        if let Some(Value::Object(map)) = self.store.get_option(OPTION_API_CONFIG)? {
            for (key, value) in map {
                record.insert(key, value_to_string(value));
            }
        }
        Ok(record)
    }

    fn is_echoed_mask(&self, key: &str, value: &str, existing: Option<&String>) -> bool {
        if contains_placeholder(value) {
            return true;
        }
        if !is_sensitive(key) || value.is_empty() {
            return false;
        }

        // 짧은 비밀값은 마스킹 문자가 3개 미만이라 마커 검사에 걸리지 않음
        let Some(stored) = existing.filter(|s| !s.is_empty()) else {
            return false;
        };
        let plaintext = Zeroizing::new(self.vault.decrypt(stored));
        let masked = mask(&plaintext, DEFAULT_VISIBLE_SUFFIX);
        masked != *plaintext && masked == value
    }
}

fn is_derived_from_sensitive(key: &str) -> bool {
    SENSITIVE_FIELDS
        .iter()
        .any(|field| key != *field && key.starts_with(field))
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        other => other.to_string(),
    }
}
