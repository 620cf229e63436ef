//! Content Collection Commands
//!
//! 후기/FAQ/서비스/이미지 컬렉션 CRUD. 항목 타입별로 같은 핸들러를 재사용합니다.
//! 조회는 공개, 변경은 관리자 전용.

use serde::{Deserialize, Serialize};

use super::SuccessResponse;
use crate::access::{Access, AccessPolicy};
use crate::error::CommandResult;
use crate::settings::{ContentItem, SettingsRepository};

#[derive(Debug, Deserialize)]
pub struct ItemArgs<T> {
    pub item: T,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceItemsArgs<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse<T> {
    pub success: bool,
    pub items: Vec<T>,
}

/// 컬렉션 목록
pub fn list_items<T: ContentItem>(
    repo: &SettingsRepository,
    policy: &dyn AccessPolicy,
) -> CommandResult<Vec<T>> {
    policy.check(Access::Public)?;
    Ok(repo.list::<T>()?)
}

/// 항목 추가 (서버가 id 발급)
pub fn create_item<T: ContentItem>(
    repo: &SettingsRepository,
    policy: &dyn AccessPolicy,
    args: ItemArgs<T>,
) -> CommandResult<T> {
    policy.check(Access::Admin)?;
    Ok(repo.create(args.item)?)
}

pub fn update_item<T: ContentItem>(
    repo: &SettingsRepository,
    policy: &dyn AccessPolicy,
    id: &str,
    args: ItemArgs<T>,
) -> CommandResult<T> {
    policy.check(Access::Admin)?;
    Ok(repo.update(id, args.item)?)
}

pub fn delete_item<T: ContentItem>(
    repo: &SettingsRepository,
    policy: &dyn AccessPolicy,
    id: &str,
) -> CommandResult<SuccessResponse> {
    policy.check(Access::Admin)?;
    repo.delete::<T>(id)?;
    Ok(SuccessResponse::ok())
}

/// 컬렉션 전체 교체
pub fn replace_items<T: ContentItem>(
    repo: &SettingsRepository,
    policy: &dyn AccessPolicy,
    args: ReplaceItemsArgs<T>,
) -> CommandResult<ItemsResponse<T>> {
    policy.check(Access::Admin)?;
    let items = repo.replace_all(args.items)?;
    Ok(ItemsResponse {
        success: true,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use crate::models::{FaqEntry, ImageAsset};
    use crate::settings::testing::repository;
    use serde_json::json;

    fn faq_args(question: &str) -> ItemArgs<FaqEntry> {
        serde_json::from_value(json!({
            "item": { "question": question, "answer": "Yes." }
        }))
        .unwrap()
    }

    #[test]
    fn test_visitor_can_list_but_not_create() {
        let (repo, _) = repository();

        let faq = list_items::<FaqEntry>(&repo, &Role::Visitor).unwrap();
        assert!(!faq.is_empty());

        let err = create_item(&repo, &Role::Visitor, faq_args("Q?")).unwrap_err();
        assert_eq!(err.code, "FORBIDDEN");
        assert_eq!(
            list_items::<FaqEntry>(&repo, &Role::Visitor).unwrap().len(),
            faq.len()
        );
    }

    #[test]
    fn test_create_then_delete() {
        let (repo, _) = repository();
        let created = create_item(&repo, &Role::Administrator, faq_args("Do you fence?")).unwrap();
        assert!(!created.id.is_empty());

        let response =
            delete_item::<FaqEntry>(&repo, &Role::Administrator, &created.id).unwrap();
        assert!(response.success);

        let remaining = list_items::<FaqEntry>(&repo, &Role::Visitor).unwrap();
        assert!(remaining.iter().all(|f| f.id != created.id));
    }

    #[test]
    fn test_update_unknown_id_is_404() {
        let (repo, _) = repository();
        let err = update_item(&repo, &Role::Administrator, "missing", faq_args("Q?")).unwrap_err();
        assert_eq!(err.status, 404);
        assert_eq!(err.message, "FAQ not found");
    }

    #[test]
    fn test_replace_rejects_invalid_image() {
        let (repo, _) = repository();
        let args: ReplaceItemsArgs<ImageAsset> = serde_json::from_value(json!({
            "items": [{ "url": "javascript:alert(1)", "category": "" }]
        }))
        .unwrap();

        let err = replace_items(&repo, &Role::Administrator, args).unwrap_err();
        assert_eq!(err.status, 400);
    }

    #[test]
    fn test_replace_assigns_missing_ids() {
        let (repo, _) = repository();
        let args: ReplaceItemsArgs<FaqEntry> = serde_json::from_value(json!({
            "items": [
                { "id": "a", "question": "One?", "answer": "1" },
                { "question": "Two?", "answer": "2" }
            ]
        }))
        .unwrap();

        let response = replace_items(&repo, &Role::Administrator, args).unwrap();
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[0].id, "a");
        assert!(!response.items[1].id.is_empty());
    }
}
