//! Settings Repository
//!
//! 옵션 저장소 위의 타입 있는 접근자. 콘텐츠 컬렉션마다 옵션 1개(JSON 문서)를 소유하고,
//! API 설정의 민감 필드는 Secret Vault에 위임합니다.
//!
//! 리스트 컬렉션은 변경 시마다 문서 전체를 교체합니다 (마지막 쓰기 우선).

mod api_config;
mod collections;
mod connection;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::OptionStore;
use crate::error::SettingsError;
use crate::models::{
    ConfigMode, ConfigView, FaqEntry, GeneralSettings, ImageAsset, PublicApiConfig,
    PublicBusinessInfo, PublicConfig, PublicEndpoints, ServiceOffering, SettingsBundle,
    SettingsUpdate, Testimonial,
};
use crate::secrets::SecretVault;

pub use api_config::{default_configuration, CONFIGURATION_FIELDS};
pub use collections::ContentItem;
pub use connection::ConnectionTester;

/// 옵션 키
pub const OPTION_GENERAL: &str = "fairfence_general_settings";
pub const OPTION_TESTIMONIALS: &str = "fairfence_testimonials";
pub const OPTION_FAQ: &str = "fairfence_faq";
pub const OPTION_SERVICES: &str = "fairfence_services";
pub const OPTION_IMAGES: &str = "fairfence_images";
pub const OPTION_API_CONFIG: &str = "fairfence_api_configuration";

/// 설정 저장소
pub struct SettingsRepository {
    store: Arc<dyn OptionStore>,
    vault: SecretVault,
    connections: ConnectionTester,
}

impl SettingsRepository {
    pub fn new(
        store: Arc<dyn OptionStore>,
        vault: SecretVault,
        connections: ConnectionTester,
    ) -> Self {
        Self {
            store,
            vault,
            connections,
        }
    }

    /// 일반 설정 (저장값이 기본값보다 우선)
    pub fn general_settings(&self) -> Result<GeneralSettings, SettingsError> {
        Ok(self.load(OPTION_GENERAL)?.unwrap_or_default())
    }

    pub fn update_general_settings(&self, general: GeneralSettings) -> Result<(), SettingsError> {
        self.save(OPTION_GENERAL, &general)?;
        tracing::info!("general settings updated");
        Ok(())
    }

    /// 전체 설정 묶음
    ///
    /// `api_mode`는 호출자 권한에 따라 `AdminMasked` 또는 `Public`.
    pub fn all_settings(&self, api_mode: ConfigMode) -> Result<SettingsBundle, SettingsError> {
        if api_mode == ConfigMode::InternalDecrypted {
            return Err(SettingsError::Validation(
                "decrypted configuration cannot be bundled".to_string(),
            ));
        }

        Ok(SettingsBundle {
            general: self.general_settings()?,
            testimonials: self.list::<Testimonial>()?,
            faq: self.list::<FaqEntry>()?,
            services: self.list::<ServiceOffering>()?,
            images: self.list::<ImageAsset>()?,
            api_config: self.get_configuration(api_mode)?,
        })
    }

    /// 전체 설정 부분 갱신
    ///
    /// 모든 섹션을 먼저 검증한 뒤 저장하므로, 검증 실패 시 아무것도 바뀌지 않습니다.
    pub fn update_settings(&self, update: SettingsUpdate) -> Result<(), SettingsError> {
        let testimonials = update
            .testimonials
            .map(collections::prepare_all)
            .transpose()?;
        let faq = update.faq.map(collections::prepare_all).transpose()?;
        let services = update.services.map(collections::prepare_all).transpose()?;
        let images = update.images.map(collections::prepare_all).transpose()?;

        if let Some(general) = update.general {
            self.update_general_settings(general)?;
        }
        if let Some(items) = testimonials {
            self.store_items(&items)?;
        }
        if let Some(items) = faq {
            self.store_items(&items)?;
        }
        if let Some(items) = services {
            self.store_items(&items)?;
        }
        if let Some(items) = images {
            self.store_items(&items)?;
        }

        Ok(())
    }

    /// 프론트엔드용 공개 설정
    pub fn public_config(&self, api_base: &str) -> Result<PublicConfig, SettingsError> {
        let config = self.get_configuration(ConfigMode::Public)?;
        let general = self.general_settings()?;

        let text = |key: &str| {
            config
                .get(key)
                .and_then(|v| v.as_text())
                .unwrap_or_default()
                .to_string()
        };

        Ok(PublicConfig {
            api: PublicApiConfig {
                supabase_url: text("supabase_url"),
                supabase_anon_key: text("supabase_anon_key"),
                stripe_public_key: text("stripe_public_key"),
                smtp_host: text("smtp_host"),
                smtp_port: text("smtp_port"),
                smtp_user: text("smtp_user"),
            },
            business: PublicBusinessInfo {
                name: general.business_name,
                phone: general.phone,
                email: general.email,
                address: general.address,
            },
            endpoints: PublicEndpoints {
                api_base: api_base.to_string(),
            },
        })
    }

    /// 최초 설치 시 기본 콘텐츠 기록 (이미 있으면 건드리지 않음)
    pub fn install_defaults(&self) -> Result<Vec<&'static str>, SettingsError> {
        let mut installed = Vec::new();

        if self.store.add_option(OPTION_GENERAL, &serde_json::to_value(GeneralSettings::default())?)? {
            installed.push(OPTION_GENERAL);
        }
        installed.extend(self.install_default_items::<Testimonial>()?);
        installed.extend(self.install_default_items::<FaqEntry>()?);
        installed.extend(self.install_default_items::<ServiceOffering>()?);
        installed.extend(self.install_default_items::<ImageAsset>()?);

        tracing::info!(options = ?installed, "default settings installed");
        Ok(installed)
    }

    /// 모든 옵션 삭제 (언인스톨)
    pub fn delete_all_settings(&self) -> Result<(), SettingsError> {
        for name in [
            OPTION_GENERAL,
            OPTION_TESTIMONIALS,
            OPTION_FAQ,
            OPTION_SERVICES,
            OPTION_IMAGES,
            OPTION_API_CONFIG,
        ] {
            self.store.delete_option(name)?;
        }
        tracing::warn!("all settings deleted");
        Ok(())
    }

    fn install_default_items<T: ContentItem>(&self) -> Result<Option<&'static str>, SettingsError> {
        let added = self
            .store
            .add_option(T::OPTION_KEY, &serde_json::to_value(T::defaults())?)?;
        Ok(added.then_some(T::OPTION_KEY))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, SettingsError> {
        match self.store.get_option(name)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn save<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), SettingsError> {
        self.store.update_option(name, &serde_json::to_value(value)?)
    }
}
