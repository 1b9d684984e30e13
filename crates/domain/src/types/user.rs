//! Authenticated principal types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::impl_domain_status_conversions;

/// Which portal a principal signs into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Student,
    Admin,
}

impl_domain_status_conversions!(UserType {
    Student => "student",
    Admin => "admin",
});

impl UserType {
    /// Backend path that authenticates this kind of principal.
    #[must_use]
    pub fn login_path(self) -> &'static str {
        match self {
            Self::Student => "/students/login",
            Self::Admin => "/admin/login",
        }
    }
}

/// Identity of the signed-in principal, persisted as JSON under `user`.
///
/// Profile fields beyond `id`/`name`/`userType` are kept verbatim in
/// `extra` so nothing the backend returns is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub name: String,
    #[serde(rename = "userType")]
    pub user_type: UserType,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserIdentity {
    /// Build an identity from the `userInfo` object of a login response.
    ///
    /// Numeric ids are accepted and stored as strings. Returns `None` when
    /// `user_info` is not an object or carries no id.
    #[must_use]
    pub fn from_user_info(user_info: &Value, user_type: UserType) -> Option<Self> {
        let object = user_info.as_object()?;
        let id = match object.get("id")? {
            Value::String(id) => id.clone(),
            Value::Number(id) => id.to_string(),
            _ => return None,
        };
        let name = object.get("name").and_then(Value::as_str).unwrap_or_default().to_string();

        let extra = object
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "id" | "name" | "userType"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(Self { id, name, user_type, extra })
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_user_type_paths_and_parsing() {
        assert_eq!(UserType::Student.login_path(), "/students/login");
        assert_eq!(UserType::Admin.login_path(), "/admin/login");
        assert_eq!("Admin".parse::<UserType>(), Ok(UserType::Admin));
    }

    #[test]
    fn test_from_user_info_keeps_extra_fields() {
        let info = json!({ "id": "S2024001", "name": "Li Hua", "gender": "F", "dormitoryId": 12 });
        let user = UserIdentity::from_user_info(&info, UserType::Student).unwrap();

        assert_eq!(user.id, "S2024001");
        assert_eq!(user.name, "Li Hua");
        assert_eq!(user.extra.get("gender"), Some(&json!("F")));
        assert_eq!(user.extra.get("dormitoryId"), Some(&json!(12)));
        assert!(!user.is_admin());
    }

    #[test]
    fn test_from_user_info_login_type_wins() {
        let info = json!({ "id": 7, "name": "root", "userType": "student" });
        let user = UserIdentity::from_user_info(&info, UserType::Admin).unwrap();

        assert_eq!(user.id, "7");
        assert!(user.is_admin());
        assert!(!user.extra.contains_key("userType"));
    }

    #[test]
    fn test_from_user_info_requires_id() {
        assert!(UserIdentity::from_user_info(&json!({ "name": "x" }), UserType::Student).is_none());
        assert!(UserIdentity::from_user_info(&json!("x"), UserType::Student).is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let info = json!({ "id": "A1", "name": "Admin", "phone": "123" });
        let user = UserIdentity::from_user_info(&info, UserType::Admin).unwrap();
        let value = serde_json::to_value(&user).unwrap();

        assert_eq!(value, json!({ "id": "A1", "name": "Admin", "userType": "admin", "phone": "123" }));
    }
}
