//
//  bamboo-client
//  api/permissions/groups.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Group permissions.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{Permission, PermissionChange, PermissionScope, PermissionService};
use crate::api::common::{require_non_empty, BambooError, Pagination, Result};

/// A group of Bamboo users and its permissions on a scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group name.
    #[serde(default)]
    pub name: String,

    /// Permissions of the group on the scope.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Permission>,
}

impl PermissionService<'_> {
    /// Lists the groups that have permissions on `scope`.
    pub async fn group_permissions_list(
        &self,
        scope: &PermissionScope,
        pagination: Option<Pagination>,
    ) -> Result<Vec<Group>> {
        self.list(scope, &["groups"], &[], pagination, "Retrieving group permissions")
            .await
    }

    /// Returns the permissions of `group` on `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`BambooError::NotFound`] if the group has no permissions entry
    /// on the scope.
    pub async fn group_permissions(
        &self,
        scope: &PermissionScope,
        group: &str,
    ) -> Result<Vec<Permission>> {
        require_non_empty(&[group], "Group name")?;

        let groups: Vec<Group> = self
            .list(
                scope,
                &["groups"],
                &[("name", group)],
                None,
                "Retrieving group permissions",
            )
            .await?;

        groups
            .into_iter()
            .next()
            .map(|found| found.permissions)
            .ok_or_else(|| {
                BambooError::NotFound(format!("Group {} not found in {} permissions", group, scope))
            })
    }

    /// Grants `permissions` to `group` on `scope`.
    pub async fn set_group_permissions(
        &self,
        scope: &PermissionScope,
        group: &str,
        permissions: &[Permission],
    ) -> Result<PermissionChange> {
        require_non_empty(&[group], "Group name")?;
        self.change(
            Method::PUT,
            scope,
            &["groups", group],
            permissions,
            &format!("Group {}", group),
        )
        .await
    }

    /// Revokes `permissions` from `group` on `scope`.
    pub async fn remove_group_permissions(
        &self,
        scope: &PermissionScope,
        group: &str,
        permissions: &[Permission],
    ) -> Result<PermissionChange> {
        require_non_empty(&[group], "Group name")?;
        self.change(
            Method::DELETE,
            scope,
            &["groups", group],
            permissions,
            &format!("Group {}", group),
        )
        .await
    }

    /// Lists the groups that have no explicit permissions on `scope`.
    pub async fn available_groups_permissions_list(
        &self,
        scope: &PermissionScope,
        pagination: Option<Pagination>,
    ) -> Result<Vec<Group>> {
        self.list(
            scope,
            &["available-groups"],
            &[],
            pagination,
            "Retrieving available groups",
        )
        .await
    }
}
