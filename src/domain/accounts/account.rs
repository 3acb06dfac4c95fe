use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    /// `None` for accounts registered on this instance.
    pub host: Option<String>,
    pub avatar_url: Option<String>,
    pub is_suspended: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Owner-visible view of an account, including fields that are never shown
/// to other users. This is what a client receives on its own update stream.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub id: Uuid,
    pub username: String,
    pub host: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub email_verified: bool,
}
