use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Role Supabase assigns to any signed-in user.
pub const DEFAULT_ROLE: &str = "authenticated";

/// The user behind a valid session, as reported by a session provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionUser {
    pub id: String,
    pub email: Option<String>,
    pub role: String,
    /// Name of the provider that vouched for this session.
    pub provider: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl SessionUser {
    /// Create a new `SessionUser`; a missing role falls back to [`DEFAULT_ROLE`].
    pub fn new(
        id: impl Into<String>,
        email: Option<String>,
        role: Option<String>,
        provider: impl Into<String>,
    ) -> Self {
        SessionUser {
            id: id.into(),
            email,
            role: role
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            provider: provider.into(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }
}

#[test]
fn test_session_user_defaults_role() {
    let user = SessionUser::new("u1", None, None, "plain");
    assert_eq!(user.role, DEFAULT_ROLE);

    let user = SessionUser::new("u1", None, Some(String::new()), "plain");
    assert_eq!(user.role, DEFAULT_ROLE);

    let user = SessionUser::new("u1", Some("a@b.c".into()), Some("admin".into()), "plain");
    assert_eq!(user.role, "admin");
    assert_eq!(user.email.as_deref(), Some("a@b.c"));
    assert!(user.attributes.is_empty());
}
