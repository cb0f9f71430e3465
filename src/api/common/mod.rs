//
//  bamboo-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Bamboo REST API
//!
//! This module provides shared types used by every Bamboo service: the crate
//! error type, resource/collection metadata envelopes, links and pagination.
//!
//! # Overview
//!
//! - [`BambooError`] - Unified error type for all API operations
//! - [`ResourceMetadata`] - `expand`/`link` envelope on top-level responses
//! - [`CollectionMetadata`] - `size`/`start-index`/`max-result` on collections
//! - [`Link`] - HATEOAS-style link representation
//! - [`Pagination`] - `start`/`limit` query parameters for paged endpoints
//!
//! # Example
//!
//! ```rust
//! use bamboo_client::api::common::BambooError;
//!
//! fn handle_result<T>(result: Result<T, BambooError>) {
//!     match result {
//!         Ok(_) => println!("Success!"),
//!         Err(BambooError::AdminRequired { .. }) => println!("Admin rights needed"),
//!         Err(e) => match e.status() {
//!             Some(status) => println!("Server answered {}: {}", status, e),
//!             None => println!("Error: {}", e),
//!         },
//!     }
//! }
//! ```

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience alias used by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, BambooError>;

/// Unified error type for all Bamboo API operations.
///
/// # Variants
///
/// | Variant | Category | HTTP Status |
/// |---------|----------|-------------|
/// | `InvalidUrl` | Configuration | N/A |
/// | `Transport` | Network | N/A |
/// | `Serialize` | Serialization | N/A |
/// | `Decode` | Serialization | Any |
/// | `Io` | Raw body sink | N/A |
/// | `Validation` | Caller input | N/A |
/// | `UnexpectedStatus` | Domain/status | Any |
/// | `AdminRequired` | Domain/status | 401 |
/// | `BadRequest` | Domain/status | 400 |
/// | `NotFound` | Domain | 200 with empty result |
///
/// # Notes
///
/// - Whenever the server answered, [`BambooError::status`] returns the status,
///   so callers can branch on it even on the error path.
/// - Validation errors are raised before any network call is made.
/// - Nothing is retried.
#[derive(Error, Debug)]
pub enum BambooError {
    /// The base URL could not be parsed, has an unsupported scheme, or cannot
    /// be used to resolve endpoint paths.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// A network-level error occurred during the request.
    ///
    /// Connection refused, DNS failures, TLS errors and client-level timeouts
    /// all end up here, unchanged from `reqwest`.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request body could not be encoded as JSON.
    #[error("Failed to encode request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The response body could not be decoded into the requested type.
    #[error("Failed to decode response ({status}): {source}")]
    Decode {
        /// Status of the response whose body failed to decode.
        status: StatusCode,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Writing the raw response body into the caller's sink failed.
    #[error("Failed to write response body: {0}")]
    Io(#[from] std::io::Error),

    /// A required identifier was empty or zero.
    #[error("{0}")]
    Validation(String),

    /// The server answered with a status the operation does not accept.
    ///
    /// The message embeds the operation name, the status text and the error
    /// payload returned by the server.
    #[error("{operation} returned {status}: {message}")]
    UnexpectedStatus {
        /// Human-readable name of the operation (e.g. "List projects").
        operation: String,
        /// The status returned by the server.
        status: StatusCode,
        /// Error message extracted from the response body.
        message: String,
    },

    /// The endpoint requires an administrator account.
    #[error("You must be an admin to perform this action ({status})")]
    AdminRequired {
        /// The status returned by the server (401).
        status: StatusCode,
    },

    /// The server rejected the request parameters.
    #[error("Bad request ({status}): {message}")]
    BadRequest {
        /// The status returned by the server (400).
        status: StatusCode,
        /// Description of what was wrong with the request.
        message: String,
    },

    /// The server answered successfully but the requested entity was absent.
    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl BambooError {
    /// Returns the HTTP status of the response that caused this error, if the
    /// server answered at all.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bamboo_client::api::common::BambooError;
    /// use reqwest::StatusCode;
    ///
    /// let err = BambooError::AdminRequired { status: StatusCode::UNAUTHORIZED };
    /// assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    ///
    /// let err = BambooError::Validation("Plan key cannot be empty".to_string());
    /// assert_eq!(err.status(), None);
    /// ```
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Decode { status, .. }
            | Self::UnexpectedStatus { status, .. }
            | Self::AdminRequired { status }
            | Self::BadRequest { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }
}

/// Returns a validation error naming `what` if any of `values` is empty.
///
/// # Example
///
/// ```rust,ignore
/// require_non_empty(&[plan_key, branch_name], "Plan key and/or branch name")?;
/// ```
pub(crate) fn require_non_empty(values: &[&str], what: &str) -> Result<()> {
    if values.iter().any(|value| value.is_empty()) {
        return Err(BambooError::Validation(format!("{} cannot be empty", what)));
    }
    Ok(())
}

/// Returns a validation error naming `what` if `id` is zero.
pub(crate) fn require_id(id: u64, what: &str) -> Result<()> {
    if id == 0 {
        return Err(BambooError::Validation(format!("{} must be set", what)));
    }
    Ok(())
}

/// Metadata attached to top-level Bamboo resource responses.
///
/// # Fields
///
/// * `expand` - The `expand` parameter elements available for this resource
/// * `link` - Self link of the resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMetadata {
    /// Elements that can be requested through the `expand` query parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand: Option<String>,

    /// Self link of the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

/// Metadata attached to every Bamboo collection.
///
/// # Fields
///
/// * `size` - Total number of resources in the collection
/// * `expand` - Element of the expand parameter used for the collection
/// * `start_index` - Index from which the request started gathering resources
/// * `max_result` - Maximum number of resources returned for the request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionMetadata {
    /// Total number of resources available on the server.
    #[serde(default)]
    pub size: u32,

    /// Element of the expand parameter used for the collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand: Option<String>,

    /// Index of the first returned resource.
    #[serde(default, rename = "start-index")]
    pub start_index: u32,

    /// Maximum number of returned resources.
    #[serde(default, rename = "max-result")]
    pub max_result: u32,
}

/// HATEOAS-style link returned by Bamboo.
///
/// ```rust
/// use bamboo_client::api::common::Link;
///
/// let json = r#"{"href": "http://bamboo/rest/api/latest/project/CORE", "rel": "self"}"#;
/// let link: Link = serde_json::from_str(json).unwrap();
/// assert_eq!(link.rel, "self");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// The URL of the linked resource.
    #[serde(default)]
    pub href: String,

    /// Relationship between the link and the element (usually `"self"`).
    #[serde(default)]
    pub rel: String,
}

/// Start and limit indexes of a paginated API resource.
///
/// The default page matches the server default: `start = 0`, `limit = 25`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Index of the first resource to return.
    pub start: u32,
    /// Maximum number of resources to return.
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            start: 0,
            limit: 25,
        }
    }
}

impl Pagination {
    /// Appends `start` and `limit` to the query string of `url`.
    pub(crate) fn apply(&self, url: &mut url::Url) {
        url.query_pairs_mut()
            .append_pair("start", &self.start.to_string())
            .append_pair("limit", &self.limit.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty(&["CORE", "TEST"], "keys").is_ok());

        let err = require_non_empty(&["CORE", ""], "Plan key and/or branch name").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Plan key and/or branch name cannot be empty"
        );
        assert!(err.status().is_none());
    }

    #[test]
    fn test_require_id() {
        assert!(require_id(7, "ID").is_ok());
        assert!(matches!(
            require_id(0, "ID"),
            Err(BambooError::Validation(_))
        ));
    }

    #[test]
    fn test_collection_metadata_field_names() {
        let json = r#"{"size": 3, "expand": "plan", "start-index": 0, "max-result": 3}"#;
        let meta: CollectionMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.size, 3);
        assert_eq!(meta.max_result, 3);
        assert_eq!(meta.expand.as_deref(), Some("plan"));
    }

    #[test]
    fn test_unexpected_status_message() {
        let err = BambooError::UnexpectedStatus {
            operation: "List projects".to_string(),
            status: StatusCode::UNAUTHORIZED,
            message: "no response body".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "List projects returned 401 Unauthorized: no response body"
        );
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_pagination_apply() {
        let mut url = url::Url::parse("http://localhost/rest/api/latest/x").unwrap();
        Pagination { start: 25, limit: 50 }.apply(&mut url);
        assert_eq!(url.query(), Some("start=25&limit=50"));
    }
}
