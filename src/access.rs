//! Role gate for the protected areas of the storefront.
//!
//! Each navigation into an area is a single synchronous check against the
//! caller's session: anonymous callers are sent to sign in, callers with the
//! wrong role are sent home.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::Role,
    session::{Session, SessionUser},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    Account,
    Cart,
    Checkout,
    Orders,
    Wishlist,
    SellerDashboard,
    AdminDashboard,
}

impl Area {
    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Area::Account => &[Role::Buyer, Role::Seller, Role::Admin],
            Area::Cart | Area::Checkout | Area::Orders | Area::Wishlist => &[Role::Buyer],
            Area::SellerDashboard => &[Role::Seller],
            Area::AdminDashboard => &[Role::Admin],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Allow,
    RedirectToLogin,
    RedirectToHome,
}

pub fn gate(session: &Session, area: Area) -> Access {
    match session.role() {
        None => Access::RedirectToLogin,
        Some(role) if area.allowed_roles().contains(&role) => Access::Allow,
        Some(_) => Access::RedirectToHome,
    }
}

/// API form of [`gate`]: the redirect targets become 401 and 403.
pub fn require(session: &Session, area: Area) -> AppResult<&SessionUser> {
    match gate(session, area) {
        Access::Allow => session.require_user(),
        Access::RedirectToLogin => Err(AppError::Unauthenticated),
        Access::RedirectToHome => Err(AppError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn as_role(role: Role) -> Session {
        Session::authenticated(Uuid::new_v4(), role)
    }

    #[test]
    fn anonymous_is_redirected_to_login_everywhere() {
        let anon = Session::anonymous();
        for area in [Area::Account, Area::Cart, Area::SellerDashboard, Area::AdminDashboard] {
            assert_eq!(gate(&anon, area), Access::RedirectToLogin);
        }
    }

    #[test]
    fn wrong_role_is_redirected_home() {
        assert_eq!(gate(&as_role(Role::Buyer), Area::SellerDashboard), Access::RedirectToHome);
        assert_eq!(gate(&as_role(Role::Seller), Area::AdminDashboard), Access::RedirectToHome);
        assert_eq!(gate(&as_role(Role::Admin), Area::Checkout), Access::RedirectToHome);
    }

    #[test]
    fn matching_role_is_allowed() {
        assert_eq!(gate(&as_role(Role::Buyer), Area::Cart), Access::Allow);
        assert_eq!(gate(&as_role(Role::Seller), Area::SellerDashboard), Access::Allow);
        assert_eq!(gate(&as_role(Role::Admin), Area::AdminDashboard), Access::Allow);
        assert_eq!(gate(&as_role(Role::Seller), Area::Account), Access::Allow);
    }

    #[test]
    fn require_maps_redirects_to_errors() {
        assert!(matches!(
            require(&Session::anonymous(), Area::Orders),
            Err(AppError::Unauthenticated)
        ));
        assert!(matches!(
            require(&as_role(Role::Buyer), Area::AdminDashboard),
            Err(AppError::Forbidden)
        ));
        assert!(require(&as_role(Role::Buyer), Area::Orders).is_ok());
    }
}
