use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Role,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub role: Role,
    /// Identifier of the sign-in that produced this session; used for sign-out.
    pub session_id: Uuid,
}

/// Caller identity handed to every service call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<SessionUser>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(user_id: Uuid, role: Role) -> Self {
        Self::from_user(SessionUser {
            user_id,
            role,
            session_id: Uuid::new_v4(),
        })
    }

    pub fn from_user(user: SessionUser) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn is_anonymous(&self) -> bool {
        self.user.is_none()
    }

    pub fn require_user(&self) -> AppResult<&SessionUser> {
        self.user.as_ref().ok_or(AppError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_session_cannot_act_as_user() {
        let session = Session::anonymous();
        assert!(session.is_anonymous());
        assert!(matches!(session.require_user(), Err(AppError::Unauthenticated)));
    }

    #[test]
    fn authenticated_session_exposes_role() {
        let id = Uuid::new_v4();
        let session = Session::authenticated(id, Role::Seller);
        assert_eq!(session.role(), Some(Role::Seller));
        assert_eq!(session.require_user().unwrap().user_id, id);
    }
}
