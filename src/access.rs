//! Access Policy
//!
//! 라우팅 계층이 주입하는 권한 검사. 읽기는 대부분 공개, 쓰기는 관리자 전용입니다.

use crate::error::SettingsError;

/// 요청에 필요한 접근 수준
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Admin,
}

/// 호출자 권한 정책
pub trait AccessPolicy: Send + Sync {
    /// 설정 관리 권한 (`manage_options`) 보유 여부
    fn can_manage_options(&self) -> bool;

    fn check(&self, access: Access) -> Result<(), SettingsError> {
        match access {
            Access::Public => Ok(()),
            Access::Admin if self.can_manage_options() => Ok(()),
            Access::Admin => {
                tracing::warn!("rejected admin request from unprivileged caller");
                Err(SettingsError::Forbidden)
            }
        }
    }
}

/// 호출자 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Visitor,
    Editor,
    Administrator,
}

impl AccessPolicy for Role {
    fn can_manage_options(&self) -> bool {
        matches!(self, Role::Administrator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_administrators_pass_admin_checks() {
        assert!(Role::Administrator.check(Access::Admin).is_ok());
        assert!(matches!(
            Role::Editor.check(Access::Admin),
            Err(SettingsError::Forbidden)
        ));
        assert!(Role::Visitor.check(Access::Public).is_ok());
    }
}
