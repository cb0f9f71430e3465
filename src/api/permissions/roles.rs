//
//  bamboo-client
//  api/permissions/roles.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Role permissions.
//!
//! Bamboo has two built-in roles: logged-in users (`LOGGED_IN`) and anonymous
//! users (`ANONYMOUS`). Anonymous users can only ever be granted `READ`.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{Permission, PermissionChange, PermissionScope, PermissionService};
use crate::api::common::Result;

/// Name of the logged-in users role.
pub const LOGGED_IN_ROLE: &str = "LOGGED_IN";

/// Name of the anonymous users role.
pub const ANONYMOUS_ROLE: &str = "ANONYMOUS";

/// A role and its permissions on a scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role name ([`LOGGED_IN_ROLE`] or [`ANONYMOUS_ROLE`]).
    #[serde(default)]
    pub name: String,

    /// Permissions of the role on the scope.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Permission>,
}

impl PermissionService<'_> {
    /// Lists the roles that have permissions on `scope`.
    pub async fn role_permissions_list(&self, scope: &PermissionScope) -> Result<Vec<Role>> {
        self.list(scope, &["roles"], &[], None, "Retrieving role permissions")
            .await
    }

    /// Grants `permissions` to logged-in users on `scope`.
    pub async fn set_logged_in_users_permissions(
        &self,
        scope: &PermissionScope,
        permissions: &[Permission],
    ) -> Result<PermissionChange> {
        self.change(
            Method::PUT,
            scope,
            &["roles", LOGGED_IN_ROLE],
            permissions,
            "Logged in users role",
        )
        .await
    }

    /// Revokes `permissions` from logged-in users on `scope`.
    pub async fn remove_logged_in_users_permissions(
        &self,
        scope: &PermissionScope,
        permissions: &[Permission],
    ) -> Result<PermissionChange> {
        self.change(
            Method::DELETE,
            scope,
            &["roles", LOGGED_IN_ROLE],
            permissions,
            "Logged in users role",
        )
        .await
    }

    /// Allows anonymous users to view `scope`.
    pub async fn set_anonymous_read_permission(
        &self,
        scope: &PermissionScope,
    ) -> Result<PermissionChange> {
        self.change(
            Method::PUT,
            scope,
            &["roles", ANONYMOUS_ROLE],
            &[Permission::Read],
            "Anonymous role",
        )
        .await
    }

    /// Stops anonymous users from viewing `scope`.
    pub async fn remove_anonymous_read_permission(
        &self,
        scope: &PermissionScope,
    ) -> Result<PermissionChange> {
        self.change(
            Method::DELETE,
            scope,
            &["roles", ANONYMOUS_ROLE],
            &[Permission::Read],
            "Anonymous role",
        )
        .await
    }
}
