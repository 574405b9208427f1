use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::auth::Credentials;

/// Standard `{ success, message, data }` wrapper used by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, turning `success: false` into `ApiError::Rejected`.
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(if self.message.is_empty() {
                "Request was not successful".to_string()
            } else {
                self.message
            }));
        }
        self.data
            .ok_or_else(|| ApiError::InvalidResponse("Response envelope has no data".to_string()))
    }

    /// Check the success flag, ignoring the payload.
    pub fn into_unit(self) -> Result<(), ApiError> {
        if self.success {
            Ok(())
        } else {
            Err(ApiError::Rejected(self.message))
        }
    }
}

/// Token pair returned by login and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTokens {
    pub token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

impl From<AuthTokens> for Credentials {
    fn from(tokens: AuthTokens) -> Self {
        Credentials {
            access_token: tokens.token,
            refresh_token: tokens.refresh_token,
        }
    }
}

/// Pagination block attached to every `.../all` listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PaginationInfo {
    pub total_data: u64,
    pub total_page: u32,
    pub total_display: u32,
    pub first_page: bool,
    pub last_page: bool,
    pub prev: Option<u32>,
    pub current: u32,
    pub next: Option<u32>,
    /// Page numbers to render as links.
    #[serde(default)]
    pub detail: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationInfo,
}
