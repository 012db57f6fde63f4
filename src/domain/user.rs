use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::ValidateEmail;

/// Server-assigned identifier of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Postal address nested in a user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    /// Server fields the form does not edit, e.g. `geo`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A user record as exchanged with the remote collection.
///
/// The same shape doubles as the form draft: a draft is a `User` whose `id`
/// is `None` until the server assigns one. `User::default()` is the empty
/// draft. Fields the form does not know (`company` and the like) ride along
/// in `extra` so an update sends back the whole record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub address: Address,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Returns the same record with its identifier set.
    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    /// Checks the draft the way the form does before it may be submitted:
    /// every text field is required and the email must be a valid address.
    pub fn validate(&self) -> Result<(), String> {
        let missing: Vec<&str> = [
            ("name", &self.name),
            ("username", &self.username),
            ("email", &self.email),
            ("phone", &self.phone),
            ("website", &self.website),
            ("address.street", &self.address.street),
            ("address.suite", &self.address.suite),
            ("address.city", &self.address.city),
            ("address.zipcode", &self.address.zipcode),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(format!("missing required fields: {}", missing.join(", ")));
        }

        if !self.email.trim().validate_email() {
            return Err(format!("invalid email address: {}", self.email));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> User {
        User {
            id: None,
            name: "Leanne Graham".into(),
            username: "Bret".into(),
            email: "Sincere@april.biz".into(),
            phone: "1-770-736-8031".into(),
            website: "hildegard.org".into(),
            address: Address {
                street: "Kulas Light".into(),
                suite: "Apt. 556".into(),
                city: "Gwenborough".into(),
                zipcode: "92998-3874".into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_create_body_omits_missing_id() {
        let body = serde_json::to_value(complete_draft()).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["address"]["city"], "Gwenborough");

        let body = serde_json::to_value(complete_draft().with_id(UserId(7))).unwrap();
        assert_eq!(body["id"], 7);
    }

    const SERVER_RECORD: &str = r#"{
        "id": 1,
        "name": "Leanne Graham",
        "username": "Bret",
        "email": "Sincere@april.biz",
        "address": {
            "street": "Kulas Light",
            "suite": "Apt. 556",
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": { "lat": "-37.3159", "lng": "81.1496" }
        },
        "phone": "1-770-736-8031",
        "website": "hildegard.org",
        "company": { "name": "Romaguera-Crona" }
    }"#;

    #[test]
    fn test_decode_keeps_unknown_server_fields_aside() {
        let user: User = serde_json::from_str(SERVER_RECORD).unwrap();

        assert_eq!(user.id, Some(UserId(1)));
        assert_eq!(user.name, "Leanne Graham");
        assert_eq!(user.address.city, "Gwenborough");
        assert_eq!(user.extra["company"]["name"], "Romaguera-Crona");
        assert_eq!(user.address.extra["geo"]["lat"], "-37.3159");
        assert!(!user.extra.contains_key("id"));
        assert!(!user.extra.contains_key("address"));
    }

    #[test]
    fn test_edited_record_serializes_unknown_fields_back() {
        let mut user: User = serde_json::from_str(SERVER_RECORD).unwrap();
        user.name = "Leanne".into();

        let body = serde_json::to_value(&user).unwrap();

        assert_eq!(body["name"], "Leanne");
        assert_eq!(body["company"]["name"], "Romaguera-Crona");
        assert_eq!(body["address"]["geo"]["lng"], "81.1496");
        assert_eq!(body["address"]["city"], "Gwenborough");
        assert_eq!(body["id"], 1);
    }

    #[test]
    fn test_validate_accepts_complete_draft() {
        assert_eq!(complete_draft().validate(), Ok(()));
    }

    #[test]
    fn test_validate_lists_blank_fields() {
        let mut draft = complete_draft();
        draft.phone = "   ".into();
        draft.address.zipcode.clear();

        let err = draft.validate().unwrap_err();
        assert_eq!(err, "missing required fields: phone, address.zipcode");
    }

    #[test]
    fn test_validate_rejects_malformed_email() {
        for email in [
            "no-at-sign",
            "@example.com",
            "user@",
            "a@b@c",
            "a b@example.com",
            "a@.",
            "a@-",
            "a@b..c",
            "a@<script>",
        ] {
            let mut draft = complete_draft();
            draft.email = email.into();
            assert!(draft.validate().is_err(), "accepted {email:?}");
        }
    }

    #[test]
    fn test_validate_ignores_unknown_fields() {
        let mut draft = complete_draft();
        draft.extra.insert("company".into(), Value::Null);
        assert_eq!(draft.validate(), Ok(()));
    }
}
