/*
 * Responsibility
 * - Handler から見える「認証済みの呼び出し元」の型
 * - token claims (providerId, provider, name, ...) との対応をここで固定する
 *
 * Notes
 * - 署名検証や期限チェックは services/auth 側の責務
 * - claim の欠落や型違いはエラーにせず、そのフィールドをゼロ値にする
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

/// Caller identity decoded from a verified token.
///
/// - `subject_id` + `provider` is the stable key; either may be empty when the
///   issuer omitted it, which is not a verification failure.
/// - `permissions` is kept exactly as issued (order and duplicates preserved).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "providerId", default, deserialize_with = "lenient")]
    pub subject_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub provider: String,
    #[serde(rename = "name", default, deserialize_with = "lenient")]
    pub display_name: String,
    #[serde(rename = "avatar", default, deserialize_with = "lenient")]
    pub avatar_url: String,
    #[serde(default, deserialize_with = "lenient")]
    pub group: String,
    #[serde(default, deserialize_with = "lenient")]
    pub permissions: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub member_since: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub last_login: i64,
}

impl Identity {
    pub fn is_in_group<S: AsRef<str>>(&self, groups: &[S]) -> bool {
        groups.iter().any(|g| g.as_ref() == self.group)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    pub fn has_any_permission<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        permissions.iter().any(|p| self.has_permission(p.as_ref()))
    }

    pub fn member_since_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.member_since, 0)
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.last_login, 0)
    }
}

// A present claim of the wrong shape decodes as the field's zero value.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
