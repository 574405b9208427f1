use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct User {
    pub id: String,
    pub email: String,
    pub fullname: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

#[derive(Clone, Serialize)]
pub struct CreateUserPayload {
    pub email: String,
    pub password: String,
    pub fullname: String,
}

impl std::fmt::Debug for CreateUserPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserPayload")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("fullname", &self.fullname)
            .finish()
    }
}
