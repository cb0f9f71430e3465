//
//  bamboo-client
//  api/permissions/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Permissions API
//!
//! Bamboo grants permissions to users, groups and the two built-in roles
//! (logged-in users and anonymous users) on a scope: the whole server or a
//! single plan, project, repository, environment or deployment project.
//!
//! ## Scopes
//!
//! | Scope | Path |
//! |-------|------|
//! | `Global` | `permissions/global/...` |
//! | `Plan(key)` | `permissions/plan/{key}/...` |
//! | `Repository(key)` | `permissions/repository/{key}/...` |
//! | `Project(key)` | `permissions/project/{key}/...` |
//! | `Environment(key)` | `permissions/environment/{key}/...` |
//! | `ProjectPlan(key)` | `permissions/projectplan/{key}/...` |
//! | `Deployment(key)` | `permissions/deployment/{key}/...` |
//!
//! ## Status Handling
//!
//! List operations succeed on 200 and fail with
//! [`AdminRequired`](BambooError::AdminRequired) on 401. Set/remove
//! operations report whether anything changed:
//!
//! | Status | Result |
//! |--------|--------|
//! | 204 | `Ok(PermissionChange::Changed)` |
//! | 304 | `Ok(PermissionChange::Unchanged)` |
//! | 400 | `Err(BadRequest)` |
//! | 401 | `Err(AdminRequired)` |
//! | other | `Err(UnexpectedStatus)` |
//!
//! ## Example
//!
//! ```rust,no_run
//! use bamboo_client::api::permissions::{Permission, PermissionScope};
//! use bamboo_client::api::BambooClient;
//! use bamboo_client::auth::Credential;
//!
//! # async fn example() -> bamboo_client::api::common::Result<()> {
//! let client = BambooClient::new(Credential::basic("admin", "admin"))?;
//! let scope = PermissionScope::project_plan("CORE");
//!
//! client
//!     .permissions()
//!     .set_user_permissions(&scope, "jdoe", &[Permission::Read, Permission::Build])
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::client::{BambooClient, Sink};
use super::common::{require_non_empty, BambooError, Pagination, Result};

pub mod groups;
pub mod roles;
pub mod users;

pub use groups::Group;
pub use roles::Role;
pub use users::User;

/// A permission that can be granted on a scope.
///
/// Not every scope supports every permission; the server answers 400 for
/// unsupported combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    /// View the entity (`Access` on the global scope).
    Read,
    /// Edit the entity.
    Write,
    /// Trigger builds or deployments.
    Build,
    /// Clone plans or environments.
    Clone,
    /// Full administration of the entity.
    Administration,
    /// Create plans, projects or deployment projects.
    Create,
    /// Create linked repositories.
    #[serde(rename = "CREATEREPOSITORY")]
    CreateRepository,
    /// Restricted administration on the global scope.
    #[serde(rename = "RESTRICTEDADMINISTRATION")]
    RestrictedAdministration,
    /// View the configuration of an environment.
    #[serde(rename = "VIEWCONFIGURATION")]
    ViewConfiguration,
}

impl Permission {
    /// The wire representation of the permission.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Build => "BUILD",
            Self::Clone => "CLONE",
            Self::Administration => "ADMINISTRATION",
            Self::Create => "CREATE",
            Self::CreateRepository => "CREATEREPOSITORY",
            Self::RestrictedAdministration => "RESTRICTEDADMINISTRATION",
            Self::ViewConfiguration => "VIEWCONFIGURATION",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = BambooError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "READ" => Ok(Self::Read),
            "WRITE" => Ok(Self::Write),
            "BUILD" => Ok(Self::Build),
            "CLONE" => Ok(Self::Clone),
            "ADMINISTRATION" => Ok(Self::Administration),
            "CREATE" => Ok(Self::Create),
            "CREATEREPOSITORY" => Ok(Self::CreateRepository),
            "RESTRICTEDADMINISTRATION" => Ok(Self::RestrictedAdministration),
            "VIEWCONFIGURATION" => Ok(Self::ViewConfiguration),
            other => Err(BambooError::Validation(format!("Unknown permission: {}", other))),
        }
    }
}

/// The entity a permission applies to.
///
/// Every scope except `Global` is addressed by a key (plan key, project key,
/// or numeric id as text for repositories, environments and deployments).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionScope {
    /// Server-wide permissions.
    Global,
    /// A plan, by plan key.
    Plan(String),
    /// A linked repository, by id.
    Repository(String),
    /// A project, by project key.
    Project(String),
    /// A deployment environment, by id.
    Environment(String),
    /// Permissions every plan of a project inherits, by project key.
    ProjectPlan(String),
    /// A deployment project, by id.
    Deployment(String),
}

impl PermissionScope {
    /// Builds a scope from its resource name (e.g. `"projectplan"`) and key.
    ///
    /// The key is ignored for `"global"`.
    ///
    /// # Errors
    ///
    /// Returns [`BambooError::Validation`] for unknown resource names.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bamboo_client::api::permissions::PermissionScope;
    ///
    /// let scope = PermissionScope::new("environment", "TEST").unwrap();
    /// assert_eq!(scope, PermissionScope::Environment("TEST".to_string()));
    /// assert!(PermissionScope::new("galaxy", "TEST").is_err());
    /// ```
    pub fn new(resource: &str, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        match resource {
            "global" => Ok(Self::Global),
            "plan" => Ok(Self::Plan(key)),
            "repository" => Ok(Self::Repository(key)),
            "project" => Ok(Self::Project(key)),
            "environment" => Ok(Self::Environment(key)),
            "projectplan" => Ok(Self::ProjectPlan(key)),
            "deployment" => Ok(Self::Deployment(key)),
            other => Err(BambooError::Validation(format!(
                "Unknown permission resource: {}",
                other
            ))),
        }
    }

    /// Plan-permissions scope of a project.
    pub fn project_plan(project_key: impl Into<String>) -> Self {
        Self::ProjectPlan(project_key.into())
    }

    /// The resource name used in the URL.
    pub fn resource(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Plan(_) => "plan",
            Self::Repository(_) => "repository",
            Self::Project(_) => "project",
            Self::Environment(_) => "environment",
            Self::ProjectPlan(_) => "projectplan",
            Self::Deployment(_) => "deployment",
        }
    }

    /// The key of the scope, `None` for `Global`.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Plan(key)
            | Self::Repository(key)
            | Self::Project(key)
            | Self::Environment(key)
            | Self::ProjectPlan(key)
            | Self::Deployment(key) => Some(key),
        }
    }

    fn validate(&self) -> Result<()> {
        match self.key() {
            Some(key) => require_non_empty(&[key], &format!("{} key", self.resource())),
            None => Ok(()),
        }
    }

    /// Path segments `permissions/{resource}[/{key}]/{tail...}`.
    fn segments<'a>(&'a self, tail: &[&'a str]) -> Vec<&'a str> {
        let mut segments = vec!["permissions", self.resource()];
        segments.extend(self.key());
        segments.extend_from_slice(tail);
        segments
    }
}

impl fmt::Display for PermissionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Some(key) => write!(f, "{} {}", self.resource(), key),
            None => f.write_str(self.resource()),
        }
    }
}

/// Outcome of a set or remove operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionChange {
    /// The permissions were granted or revoked (204).
    Changed,
    /// The subject already had (or lacked) the permissions (304).
    Unchanged,
}

/// Envelope of every permission listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub(crate) struct PermissionResults<T> {
    #[serde(default = "Vec::new")]
    pub(crate) results: Vec<T>,
}

impl<T> Default for PermissionResults<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
        }
    }
}

/// Permission operations, obtained from [`BambooClient::permissions`].
///
/// User, group and role operations are implemented in the
/// [`users`], [`groups`] and [`roles`] modules.
#[derive(Clone, Copy)]
pub struct PermissionService<'a> {
    client: &'a BambooClient,
}

impl BambooClient {
    /// Permission operations.
    pub fn permissions(&self) -> PermissionService<'_> {
        PermissionService { client: self }
    }
}

impl PermissionService<'_> {
    /// Fetches `{scope}/{tail}` and returns its `results`.
    async fn list<T: DeserializeOwned>(
        &self,
        scope: &PermissionScope,
        tail: &[&str],
        query: &[(&str, &str)],
        pagination: Option<Pagination>,
        operation: &str,
    ) -> Result<Vec<T>> {
        scope.validate()?;

        let mut request = self
            .client
            .new_request_segments(Method::GET, &scope.segments(tail))?;
        if !query.is_empty() {
            request.url_mut().query_pairs_mut().extend_pairs(query);
        }
        if let Some(pagination) = pagination {
            pagination.apply(request.url_mut());
        }

        let mut data = PermissionResults::<T>::default();
        let response = self.client.execute(request, Sink::Json(&mut data)).await?;

        match response.status {
            StatusCode::OK => Ok(data.results),
            StatusCode::UNAUTHORIZED => Err(BambooError::AdminRequired {
                status: response.status,
            }),
            _ => Err(response.unexpected(&format!("{} for {}", operation, scope))),
        }
    }

    /// Sends a PUT or DELETE with `permissions` to `{scope}/{tail}`.
    async fn change(
        &self,
        method: Method,
        scope: &PermissionScope,
        tail: &[&str],
        permissions: &[Permission],
        subject: &str,
    ) -> Result<PermissionChange> {
        scope.validate()?;

        let granting = method == Method::PUT;
        let segments = scope.segments(tail);
        let request = self
            .client
            .new_request_segments_with_body(method, &segments, permissions)?;

        let response = self.client.send(request).await?;

        match response.status {
            StatusCode::NO_CONTENT => {
                if granting {
                    info!(%scope, "{}'s permissions were granted", subject);
                } else {
                    info!(%scope, "{}'s permissions were revoked", subject);
                }
                Ok(PermissionChange::Changed)
            }
            StatusCode::NOT_MODIFIED => {
                if granting {
                    info!(%scope, "{} already had the requested permissions, nothing changed", subject);
                } else {
                    info!(%scope, "{} already lacked the requested permissions, nothing changed", subject);
                }
                Ok(PermissionChange::Unchanged)
            }
            StatusCode::BAD_REQUEST => Err(BambooError::BadRequest {
                status: response.status,
                message: match response.body.as_deref().map(str::trim) {
                    Some(body) if !body.is_empty() => response.error_message(),
                    _ => format!(
                        "{} doesn't exist or one of the requested permissions isn't supported for {}",
                        subject, scope
                    ),
                },
            }),
            StatusCode::UNAUTHORIZED => Err(BambooError::AdminRequired {
                status: response.status,
            }),
            _ => Err(response.unexpected(&format!("Changing permissions of {} on {}", subject, scope))),
        }
    }
}
