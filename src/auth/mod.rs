//
//  bamboo-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Every request sent to a Bamboo server carries an `Authorization` header.
//! This module provides the credential types that produce that header value.
//!
//! ## Supported Authentication Methods
//!
//! - **Basic Authentication**: Username/password pair, encoded as
//!   `Basic base64(username:password)`.
//! - **Personal Access Token**: Bamboo 6.x+ personal access tokens, sent as
//!   `Bearer <token>`.
//!
//! Anything else (a token fetched from a secret store, a signed header, ...)
//! can be plugged in by implementing [`Authorizer`].
//!
//! ## Example
//!
//! ```rust
//! use bamboo_client::auth::{Authorizer, Credential};
//!
//! let basic = Credential::basic("admin", "admin");
//! assert_eq!(basic.authorization(), "Basic YWRtaW46YWRtaW4=");
//!
//! let token = Credential::bearer("NjM0NTY3ODkw");
//! assert_eq!(token.authorization(), "Bearer NjM0NTY3ODkw");
//! ```

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Produces the value of the `Authorization` header for a request.
///
/// The client calls [`authorization`](Authorizer::authorization) once per
/// request while building it, so implementations may rotate credentials
/// between calls.
pub trait Authorizer: Send + Sync {
    /// Returns the full header value, including the scheme
    /// (e.g. `"Basic ..."` or `"Bearer ..."`).
    fn authorization(&self) -> String;
}

/// Credentials understood by the Bamboo REST API.
///
/// # Variants
///
/// - `Basic`: Username and password sent with HTTP Basic authentication.
/// - `Bearer`: A personal access token sent with Bearer authentication.
///
/// # Example
///
/// ```rust
/// use bamboo_client::auth::Credential;
///
/// let credential = Credential::basic("ci-bot", "s3cret");
/// assert!(matches!(credential, Credential::Basic { .. }));
/// ```
///
/// # Notes
///
/// - The `Debug` implementation never prints passwords or tokens.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// HTTP Basic authentication with username and password.
    Basic {
        /// The Bamboo username.
        username: String,
        /// The password for the user.
        password: String,
    },
    /// Personal Access Token authentication.
    Bearer {
        /// The personal access token string.
        token: String,
    },
}

impl Credential {
    /// Creates a Basic credential from a username and password.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates a Bearer credential from a personal access token.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }
}

impl Authorizer for Credential {
    fn authorization(&self) -> String {
        match self {
            Self::Basic { username, password } => {
                format!("Basic {}", basic_auth(username, password))
            }
            Self::Bearer { token } => format!("Bearer {}", token),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

/// Encodes `username:password` with the standard base64 alphabet.
fn basic_auth(username: &str, password: &str) -> String {
    STANDARD.encode(format!("{}:{}", username, password))
}
