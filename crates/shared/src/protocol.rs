use serde::{Deserialize, Serialize};

use crate::domain::{AccessToken, Session, UserId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordGrantRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

impl TokenResponse {
    pub fn into_session(self) -> Session {
        Session {
            user_id: self.user.id,
            email: self.user.email,
            access_token: AccessToken::new(self.access_token),
        }
    }
}

/// Sort direction for a PostgREST `order` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl Ordering {
    pub const NEWEST_FIRST: Ordering = Ordering {
        column: "created_at",
        direction: SortDirection::Descending,
    };

    pub fn to_query_value(&self) -> String {
        let dir = match self.direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        format!("{}.{dir}", self.column)
    }
}
