//! Authenticated session and the administrator capability check.

use serde::{Deserialize, Serialize};

use tiendita_core::UserId;

use crate::preferences::ViewMode;

/// User of the current backend session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl SessionUser {
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            full_name: None,
            avatar_url: None,
        }
    }

    /// Name for the user chip; "Usuario" when the provider gave none.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Usuario")
    }
}

/// Single-administrator policy: the admin is whoever signs in with the
/// configured email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPolicy {
    admin_email: String,
}

impl AdminPolicy {
    pub fn new(admin_email: &str) -> Self {
        Self {
            admin_email: admin_email.trim().to_lowercase(),
        }
    }

    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    /// Case-insensitive email match; an empty email never matches.
    pub fn is_admin(&self, user: &SessionUser) -> bool {
        let email = user.email.trim().to_lowercase();
        !email.is_empty() && email == self.admin_email
    }

    /// Admin tools show only for the admin in developer view.
    pub fn acting_as_admin(&self, user: Option<&SessionUser>, view: ViewMode) -> bool {
        view == ViewMode::Developer && user.is_some_and(|u| self.is_admin(u))
    }

    /// A signed-in user who is not the admin must be signed out.
    pub fn must_sign_out(&self, user: &SessionUser) -> bool {
        !user.email.trim().is_empty() && !self.is_admin(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> SessionUser {
        SessionUser::new(UserId::new(), email)
    }

    #[test]
    fn admin_match_ignores_case_and_spaces() {
        let policy = AdminPolicy::new("  Diego@Example.com ");
        assert_eq!(policy.admin_email(), "diego@example.com");
        assert!(policy.is_admin(&user("DIEGO@example.com")));
        assert!(!policy.is_admin(&user("otro@example.com")));
    }

    #[test]
    fn empty_emails_never_match() {
        let policy = AdminPolicy::new("");
        assert!(!policy.is_admin(&user("")));
        assert!(!policy.must_sign_out(&user("")));
    }

    #[test]
    fn acting_as_admin_requires_developer_view() {
        let policy = AdminPolicy::new("admin@example.com");
        let admin = user("admin@example.com");
        assert!(policy.acting_as_admin(Some(&admin), ViewMode::Developer));
        assert!(!policy.acting_as_admin(Some(&admin), ViewMode::Client));
        assert!(!policy.acting_as_admin(None, ViewMode::Developer));
    }

    #[test]
    fn non_admins_are_signed_out() {
        let policy = AdminPolicy::new("admin@example.com");
        assert!(policy.must_sign_out(&user("cliente@example.com")));
        assert!(!policy.must_sign_out(&user("admin@example.com")));
    }

    #[test]
    fn display_name_falls_back() {
        let mut u = user("a@b.c");
        assert_eq!(u.display_name(), "Usuario");
        u.full_name = Some("Diego".into());
        assert_eq!(u.display_name(), "Diego");
    }
}
