//! 콘텐츠 컬렉션 (후기, FAQ, 서비스, 이미지)
//!
//! 모두 문자열 id로 식별되는 리스트이며, 변경 시 리스트 전체를 다시 저장합니다.
//! 동시 편집 충돌 감지는 없습니다.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use super::{
    SettingsRepository, OPTION_FAQ, OPTION_IMAGES, OPTION_SERVICES, OPTION_TESTIMONIALS,
};
use crate::error::SettingsError;
use crate::models::{FaqEntry, ImageAsset, ServiceOffering, Testimonial, IMAGE_CATEGORIES};
use crate::utils::{sanitize_text_field, sanitize_textarea_field, sanitize_url};

/// 옵션 하나에 리스트로 저장되는 콘텐츠 항목
pub trait ContentItem: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// 저장 옵션 키
    const OPTION_KEY: &'static str;
    /// 에러 메시지용 이름
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);

    /// 옵션이 없을 때의 기본 리스트
    fn defaults() -> Vec<Self>;

    /// 입력 정리 (태그 제거, 공백 정리)
    fn sanitized(self) -> Self;

    /// 저장 전 검증
    fn validate(&self) -> Result<(), SettingsError>;
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn require(value: &str, message: &str) -> Result<(), SettingsError> {
    if value.trim().is_empty() {
        return Err(SettingsError::Validation(message.to_string()));
    }
    Ok(())
}

/// 일괄 저장용 정리/검증. 빈 id는 새로 발급하고, 중복 id는 거부합니다.
pub(super) fn prepare_all<T: ContentItem>(items: Vec<T>) -> Result<Vec<T>, SettingsError> {
    let mut seen = HashSet::new();
    let mut prepared = Vec::with_capacity(items.len());

    for item in items {
        let mut item = item.sanitized();
        item.validate()?;
        if item.id().trim().is_empty() {
            item.set_id(new_id());
        }
        if !seen.insert(item.id().to_string()) {
            return Err(SettingsError::Validation(format!(
                "Duplicate {} id: {}",
                T::KIND,
                item.id()
            )));
        }
        prepared.push(item);
    }

    Ok(prepared)
}

impl SettingsRepository {
    /// 전체 목록 (저장된 게 없으면 기본값)
    pub fn list<T: ContentItem>(&self) -> Result<Vec<T>, SettingsError> {
        Ok(self.load(T::OPTION_KEY)?.unwrap_or_else(T::defaults))
    }

    /// 새 항목 추가 (id는 항상 새로 발급)
    pub fn create<T: ContentItem>(&self, item: T) -> Result<T, SettingsError> {
        let mut item = item.sanitized();
        item.validate()?;
        item.set_id(new_id());

        let mut items = self.list::<T>()?;
        items.push(item.clone());
        self.store_items(&items)?;

        tracing::info!(kind = T::KIND, id = item.id(), "content item created");
        Ok(item)
    }

    /// id로 찾아 교체
    pub fn update<T: ContentItem>(&self, id: &str, item: T) -> Result<T, SettingsError> {
        let mut item = item.sanitized();
        item.validate()?;
        item.set_id(id.to_string());

        let mut items = self.list::<T>()?;
        let slot = items
            .iter_mut()
            .find(|existing| existing.id() == id)
            .ok_or_else(|| SettingsError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            })?;
        *slot = item.clone();
        self.store_items(&items)?;

        tracing::info!(kind = T::KIND, id, "content item updated");
        Ok(item)
    }

    /// id로 삭제. 없으면 저장된 리스트는 그대로 둡니다.
    pub fn delete<T: ContentItem>(&self, id: &str) -> Result<(), SettingsError> {
        let mut items = self.list::<T>()?;
        let before = items.len();
        items.retain(|existing| existing.id() != id);

        if items.len() == before {
            return Err(SettingsError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            });
        }

        self.store_items(&items)?;
        tracing::info!(kind = T::KIND, id, "content item deleted");
        Ok(())
    }

    /// 리스트 전체 교체 (일괄 편집)
    pub fn replace_all<T: ContentItem>(&self, items: Vec<T>) -> Result<Vec<T>, SettingsError> {
        let items = prepare_all(items)?;
        self.store_items(&items)?;
        tracing::info!(kind = T::KIND, count = items.len(), "content list replaced");
        Ok(items)
    }

    pub(super) fn store_items<T: ContentItem>(&self, items: &[T]) -> Result<(), SettingsError> {
        self.save(T::OPTION_KEY, items)
    }
}

impl ContentItem for Testimonial {
    const OPTION_KEY: &'static str = OPTION_TESTIMONIALS;
    const KIND: &'static str = "Testimonial";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn defaults() -> Vec<Self> {
        vec![
            Testimonial {
                id: "1".to_string(),
                name: "Bernadette Morton".to_string(),
                location: "Hamilton East".to_string(),
                rating: 5,
                text: "Alex and his team have recently done a retaining wall and a fence for us. They were quick and efficient and did a perfect job at a reasonable cost.".to_string(),
                date: "9 months ago".to_string(),
                source: "Google".to_string(),
            },
            Testimonial {
                id: "2".to_string(),
                name: "Robbie Hogan".to_string(),
                location: "Hamilton".to_string(),
                rating: 5,
                text: "Great Team Excellent Quality and workman's ship. Easy to talk with Very quick and efficient Highly recommend".to_string(),
                date: "7 months ago".to_string(),
                source: "Google".to_string(),
            },
        ]
    }

    fn sanitized(self) -> Self {
        Testimonial {
            id: self.id,
            name: sanitize_text_field(&self.name),
            location: sanitize_text_field(&self.location),
            rating: self.rating,
            text: sanitize_textarea_field(&self.text),
            date: sanitize_text_field(&self.date),
            source: sanitize_text_field(&self.source),
        }
    }

    fn validate(&self) -> Result<(), SettingsError> {
        require(&self.name, "Testimonial name is required")?;
        require(&self.text, "Testimonial text is required")?;
        if !(1..=5).contains(&self.rating) {
            return Err(SettingsError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        Ok(())
    }
}

impl ContentItem for FaqEntry {
    const OPTION_KEY: &'static str = OPTION_FAQ;
    const KIND: &'static str = "FAQ";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn defaults() -> Vec<Self> {
        vec![
            FaqEntry {
                id: "1".to_string(),
                question: "How long does a typical fence installation take?".to_string(),
                answer: "Most residential fences are completed within 1-3 days, depending on the length and type.".to_string(),
            },
            FaqEntry {
                id: "2".to_string(),
                question: "Do I need council consent for my fence?".to_string(),
                answer: "Fences under 2.5m generally don't need consent in most areas, but there are exceptions.".to_string(),
            },
        ]
    }

    fn sanitized(self) -> Self {
        FaqEntry {
            id: self.id,
            question: sanitize_text_field(&self.question),
            answer: sanitize_textarea_field(&self.answer),
        }
    }

    fn validate(&self) -> Result<(), SettingsError> {
        require(&self.question, "FAQ question is required")?;
        require(&self.answer, "FAQ answer is required")
    }
}

impl ContentItem for ServiceOffering {
    const OPTION_KEY: &'static str = OPTION_SERVICES;
    const KIND: &'static str = "Service";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn defaults() -> Vec<Self> {
        let features = |list: &[&str]| -> Vec<String> { list.iter().map(|f| f.to_string()).collect() };
        vec![
            ServiceOffering {
                id: "timber".to_string(),
                title: "Quality Timber Fencing".to_string(),
                description: "Quality timber fencing installed by our team from start to finish."
                    .to_string(),
                features: features(&[
                    "Residential paling",
                    "Privacy screens",
                    "Custom gates",
                    "Fair pricing",
                ]),
                price_range: "Contact for pricing".to_string(),
            },
            ServiceOffering {
                id: "aluminum".to_string(),
                title: "Modern Aluminum Fencing".to_string(),
                description: "Reliable aluminum solutions installed by our experienced team."
                    .to_string(),
                features: features(&[
                    "Pool fencing",
                    "Security panels",
                    "Designer slats",
                    "Fair pricing",
                ]),
                price_range: "Contact for pricing".to_string(),
            },
        ]
    }

    fn sanitized(self) -> Self {
        ServiceOffering {
            id: self.id,
            title: sanitize_text_field(&self.title),
            description: sanitize_textarea_field(&self.description),
            features: self
                .features
                .iter()
                .map(|f| sanitize_text_field(f))
                .filter(|f| !f.is_empty())
                .collect(),
            price_range: sanitize_text_field(&self.price_range),
        }
    }

    fn validate(&self) -> Result<(), SettingsError> {
        require(&self.title, "Service title is required")
    }
}

impl ContentItem for ImageAsset {
    const OPTION_KEY: &'static str = OPTION_IMAGES;
    const KIND: &'static str = "Image";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn defaults() -> Vec<Self> {
        Vec::new()
    }

    fn sanitized(self) -> Self {
        ImageAsset {
            id: self.id,
            url: sanitize_url(&self.url),
            title: sanitize_text_field(&self.title),
            alt: sanitize_text_field(&self.alt),
            category: sanitize_text_field(&self.category),
        }
    }

    fn validate(&self) -> Result<(), SettingsError> {
        require(&self.url, "Image URL must be an absolute http(s) URL")?;
        Url::parse(&self.url)
            .map_err(|e| SettingsError::Validation(format!("Invalid image URL: {}", e)))?;
        if !IMAGE_CATEGORIES.contains(&self.category.as_str()) {
            return Err(SettingsError::Validation(format!(
                "Unknown image category: {}",
                self.category
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::repository;
    use super::*;
    use crate::db::OptionStore;
    use crate::models::ConfigMode;
    use serde_json::json;

    fn testimonial(rating: i64) -> Testimonial {
        Testimonial {
            id: String::new(),
            name: "Sam Carter".to_string(),
            location: "Cambridge".to_string(),
            rating,
            text: "Solid fence, tidy site.".to_string(),
            date: "2 weeks ago".to_string(),
            source: "Google".to_string(),
        }
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let (repo, _) = repository();
        let result = repo.create(testimonial(6));

        assert!(matches!(result, Err(SettingsError::Validation(_))));
        assert_eq!(repo.list::<Testimonial>().unwrap().len(), 2);

        assert!(repo.create(testimonial(0)).is_err());
    }

    #[test]
    fn test_rating_five_persisted_verbatim() {
        let (repo, _) = repository();
        let created = repo.create(testimonial(5)).unwrap();

        assert!(!created.id.is_empty());
        let stored = repo.list::<Testimonial>().unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored.last().unwrap(), &created);
        assert_eq!(stored.last().unwrap().rating, 5);
    }

    #[test]
    fn test_delete_unknown_faq_leaves_list_unchanged() {
        let (repo, _) = repository();
        let before = repo.list::<FaqEntry>().unwrap();

        let result = repo.delete::<FaqEntry>("does-not-exist");
        assert!(matches!(
            result,
            Err(SettingsError::NotFound { kind: "FAQ", .. })
        ));
        assert_eq!(repo.list::<FaqEntry>().unwrap(), before);
    }

    #[test]
    fn test_update_and_delete_by_id() {
        let (repo, _) = repository();
        let updated = repo
            .update(
                "2",
                FaqEntry {
                    id: "ignored".to_string(),
                    question: "  Do you <b>remove</b> old fences? ".to_string(),
                    answer: "Yes.".to_string(),
                },
            )
            .unwrap();

        assert_eq!(updated.id, "2");
        assert_eq!(updated.question, "Do you remove old fences?");

        let faq = repo.list::<FaqEntry>().unwrap();
        assert_eq!(faq.len(), 2);
        assert_eq!(faq[1], updated);

        repo.delete::<FaqEntry>("1").unwrap();
        let faq = repo.list::<FaqEntry>().unwrap();
        assert_eq!(faq.len(), 1);
        assert_eq!(faq[0].id, "2");
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let (repo, _) = repository();
        let result = repo.update("missing", testimonial(4));
        assert!(matches!(result, Err(SettingsError::NotFound { .. })));
    }

    #[test]
    fn test_image_validation() {
        let (repo, _) = repository();
        let image = |url: &str, category: &str| ImageAsset {
            id: String::new(),
            url: url.to_string(),
            title: "Front gate".to_string(),
            alt: String::new(),
            category: category.to_string(),
        };

        assert!(repo
            .create(image("https://cdn.fairfence.nz/gate.jpg", "Gallery Images"))
            .is_ok());
        assert!(repo.create(image("ftp://cdn/gate.jpg", "")).is_err());
        assert!(repo
            .create(image("https://cdn.fairfence.nz/gate.jpg", "Memes"))
            .is_err());
        assert_eq!(repo.list::<ImageAsset>().unwrap().len(), 1);
    }

    #[test]
    fn test_replace_all_assigns_ids_and_rejects_duplicates() {
        let (repo, _) = repository();
        let service = |id: &str, title: &str| ServiceOffering {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            features: vec!["Gates".to_string(), "  ".to_string()],
            price_range: String::new(),
        };

        let saved = repo
            .replace_all(vec![service("rural", "Rural Fencing"), service("", "Gates")])
            .unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].features, vec!["Gates".to_string()]);
        assert!(!saved[1].id.is_empty());
        assert_eq!(repo.list::<ServiceOffering>().unwrap(), saved);

        let dup = repo.replace_all(vec![service("a", "One"), service("a", "Two")]);
        assert!(matches!(dup, Err(SettingsError::Validation(_))));
        assert_eq!(repo.list::<ServiceOffering>().unwrap(), saved);
    }

    #[test]
    fn test_legacy_integer_image_ids_load() {
        let (repo, store) = repository();
        store
            .update_option(
                OPTION_IMAGES,
                &json!([
                    { "id": 42, "url": "https://x.nz/a.jpg", "title": "Gate", "alt": "", "category": "" },
                    { "id": "b7", "url": "https://x.nz/b.jpg" }
                ]),
            )
            .unwrap();

        let images = repo.list::<ImageAsset>().unwrap();
        assert_eq!(images[0].id, "42");
        assert_eq!(images[1].id, "b7");
        assert!(repo.all_settings(ConfigMode::Public).is_ok());

        repo.delete::<ImageAsset>("42").unwrap();
        assert_eq!(repo.list::<ImageAsset>().unwrap().len(), 1);
    }
}
