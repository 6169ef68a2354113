//! 调用方身份。
//!
//! 身份由上游认证协作方解析产生，本核心只读不写。

use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub display_name: String,
    /// 管理员（客服）标记
    pub is_admin: bool,
    pub authenticated: bool,
}

impl Identity {
    pub fn new(user_id: UserId, display_name: impl Into<String>, is_admin: bool) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            is_admin,
            authenticated: true,
        }
    }

    /// 未通过认证的匿名身份。
    pub fn anonymous() -> Self {
        Self {
            user_id: UserId(0),
            display_name: String::new(),
            is_admin: false,
            authenticated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_is_unauthenticated() {
        let identity = Identity::anonymous();
        assert!(!identity.authenticated);
        assert!(!identity.is_admin);
    }

    #[test]
    fn new_identity_is_authenticated() {
        let identity = Identity::new(UserId(9), "Nadia", true);
        assert!(identity.authenticated);
        assert!(identity.is_admin);
        assert_eq!(identity.display_name, "Nadia");
    }
}
