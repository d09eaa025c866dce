//! Identifies the user a request is made on behalf of.
//!
//! Users sign in through an upstream identity provider. The gateway in front
//! of this service authenticates the session and forwards the user's ID in the
//! [USER_ID_HEADER] header, which this module trusts as-is.

use std::fmt::Display;

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The header carrying the ID of the authenticated user.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The ID of the user that owns a transaction or goal.
///
/// IDs are opaque strings (UUIDs in practice) issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create a user ID.
    ///
    /// # Errors
    ///
    /// Returns an [Error::MissingUserId] if `id` is empty or only whitespace.
    pub fn new(id: &str) -> Result<Self, Error> {
        let id = id.trim();

        if id.is_empty() {
            Err(Error::MissingUserId)
        } else {
            Ok(Self(id.to_owned()))
        }
    }

    /// Create a user ID without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(Error::MissingUserId)?;

        let id = header.to_str().map_err(|error| {
            tracing::warn!("user ID header is not valid ASCII: {error}");
            Error::MissingUserId
        })?;

        UserId::new(id)
    }
}
