//
//  bamboo-client
//  api/permissions/users.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! User permissions.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{Permission, PermissionChange, PermissionScope, PermissionService};
use crate::api::common::{require_non_empty, BambooError, Pagination, Result};

/// A Bamboo user account and its permissions on a scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Username.
    #[serde(default)]
    pub name: String,

    /// Display name.
    #[serde(default)]
    pub full_name: String,

    /// Email address.
    #[serde(default)]
    pub email: String,

    /// Permissions of the user on the scope.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Permission>,
}

impl PermissionService<'_> {
    /// Lists the users that have permissions on `scope`.
    ///
    /// Without `pagination` the server default page is returned.
    pub async fn user_permissions_list(
        &self,
        scope: &PermissionScope,
        pagination: Option<Pagination>,
    ) -> Result<Vec<User>> {
        self.list(scope, &["users"], &[], pagination, "Retrieving user permissions")
            .await
    }

    /// Returns the permissions of `username` on `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`BambooError::NotFound`] if the user has no permissions entry
    /// on the scope.
    pub async fn user_permissions(
        &self,
        scope: &PermissionScope,
        username: &str,
    ) -> Result<Vec<Permission>> {
        require_non_empty(&[username], "Username")?;

        let users: Vec<User> = self
            .list(
                scope,
                &["users"],
                &[("name", username)],
                None,
                "Retrieving user permissions",
            )
            .await?;

        users
            .into_iter()
            .next()
            .map(|user| user.permissions)
            .ok_or_else(|| {
                BambooError::NotFound(format!("User {} not found in {} permissions", username, scope))
            })
    }

    /// Grants `permissions` to `username` on `scope`.
    pub async fn set_user_permissions(
        &self,
        scope: &PermissionScope,
        username: &str,
        permissions: &[Permission],
    ) -> Result<PermissionChange> {
        require_non_empty(&[username], "Username")?;
        self.change(
            Method::PUT,
            scope,
            &["users", username],
            permissions,
            &format!("User {}", username),
        )
        .await
    }

    /// Revokes `permissions` from `username` on `scope`.
    pub async fn remove_user_permissions(
        &self,
        scope: &PermissionScope,
        username: &str,
        permissions: &[Permission],
    ) -> Result<PermissionChange> {
        require_non_empty(&[username], "Username")?;
        self.change(
            Method::DELETE,
            scope,
            &["users", username],
            permissions,
            &format!("User {}", username),
        )
        .await
    }

    /// Lists the users that have no explicit permissions on `scope`.
    pub async fn available_users_permissions_list(
        &self,
        scope: &PermissionScope,
        pagination: Option<Pagination>,
    ) -> Result<Vec<User>> {
        self.list(
            scope,
            &["available-users"],
            &[],
            pagination,
            "Retrieving available users",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::test_client;
    use mockito::Matcher;
    use reqwest::StatusCode;

    const USERS_JSON: &str = r#"{
        "start": 0,
        "limit": 25,
        "results": [
            {"name": "jdoe", "fullName": "Jane Doe", "email": "jdoe@example.com", "permissions": ["READ", "BUILD"]},
            {"name": "admin", "fullName": "Admin", "email": "admin@example.com", "permissions": ["ADMINISTRATION"]}
        ]
    }"#;

    #[tokio::test]
    async fn test_user_permissions_list() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/latest/permissions/projectplan/CORE/users")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("start".into(), "0".into()),
                Matcher::UrlEncoded("limit".into(), "25".into()),
            ]))
            .with_status(200)
            .with_body(USERS_JSON)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let users = client
            .permissions()
            .user_permissions_list(&PermissionScope::project_plan("CORE"), Some(Pagination::default()))
            .await
            .unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].permissions, vec![Permission::Read, Permission::Build]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_user_permissions_list_requires_admin() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/latest/permissions/global/users")
            .with_status(401)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client
            .permissions()
            .user_permissions_list(&PermissionScope::Global, None)
            .await
            .unwrap_err();

        assert!(matches!(err, BambooError::AdminRequired { .. }));
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_user_permissions() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/latest/permissions/plan/CORE-BUILD/users")
            .match_query(Matcher::UrlEncoded("name".into(), "jdoe".into()))
            .with_status(200)
            .with_body(r#"{"results": [{"name": "jdoe", "permissions": ["READ", "WRITE"]}]}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let permissions = client
            .permissions()
            .user_permissions(&PermissionScope::Plan("CORE-BUILD".to_string()), "jdoe")
            .await
            .unwrap();

        assert_eq!(permissions, vec![Permission::Read, Permission::Write]);
    }

    #[tokio::test]
    async fn test_user_permissions_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/latest/permissions/plan/CORE-BUILD/users")
            .match_query(Matcher::UrlEncoded("name".into(), "ghost".into()))
            .with_status(200)
            .with_body(r#"{"results": []}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client
            .permissions()
            .user_permissions(&PermissionScope::Plan("CORE-BUILD".to_string()), "ghost")
            .await
            .unwrap_err();

        assert!(matches!(err, BambooError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_set_user_permissions() {
        let mut server = mockito::Server::new_async().await;
        let granted = server
            .mock("PUT", "/rest/api/latest/permissions/project/CORE/users/jdoe")
            .match_body(Matcher::JsonString(r#"["READ","BUILD"]"#.to_string()))
            .with_status(204)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let change = client
            .permissions()
            .set_user_permissions(
                &PermissionScope::Project("CORE".to_string()),
                "jdoe",
                &[Permission::Read, Permission::Build],
            )
            .await
            .unwrap();

        assert_eq!(change, PermissionChange::Changed);
        granted.assert_async().await;
    }

    #[tokio::test]
    async fn test_remove_user_permissions_status_mapping() {
        let scope = PermissionScope::Environment("TEST".to_string());
        let cases = [
            (304, Ok(PermissionChange::Unchanged)),
            (400, Err(StatusCode::BAD_REQUEST)),
            (401, Err(StatusCode::UNAUTHORIZED)),
            (500, Err(StatusCode::INTERNAL_SERVER_ERROR)),
        ];

        for (status, expected) in cases {
            let mut server = mockito::Server::new_async().await;
            server
                .mock("DELETE", "/rest/api/latest/permissions/environment/TEST/users/jdoe")
                .with_status(status)
                .create_async()
                .await;

            let client = test_client(&server.url());
            let result = client
                .permissions()
                .remove_user_permissions(&scope, "jdoe", &[Permission::Write])
                .await;

            match (result, expected) {
                (Ok(change), Ok(want)) => assert_eq!(change, want),
                (Err(err), Err(want)) => assert_eq!(err.status(), Some(want), "status {}", status),
                (other, want) => panic!("status {}: got {:?}, want {:?}", status, other, want),
            }
        }
    }

    #[tokio::test]
    async fn test_bad_request_default_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/rest/api/latest/permissions/global/users/ghost")
            .with_status(400)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client
            .permissions()
            .set_user_permissions(&PermissionScope::Global, "ghost", &[Permission::Read])
            .await
            .unwrap_err();

        assert!(matches!(err, BambooError::BadRequest { .. }));
        assert!(err.to_string().contains("User ghost doesn't exist"));
    }

    #[tokio::test]
    async fn test_available_users() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/latest/permissions/deployment/42/available-users")
            .with_status(200)
            .with_body(r#"{"results": [{"name": "newbie", "fullName": "New Person"}]}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let users = client
            .permissions()
            .available_users_permissions_list(&PermissionScope::Deployment("42".to_string()), None)
            .await
            .unwrap();

        assert_eq!(users[0].full_name, "New Person");
        assert!(users[0].permissions.is_empty());
    }

    #[tokio::test]
    async fn test_empty_scope_key_is_rejected() {
        let client = test_client("http://127.0.0.1:9");
        let err = client
            .permissions()
            .user_permissions_list(&PermissionScope::Plan(String::new()), None)
            .await
            .unwrap_err();
        assert!(matches!(err, BambooError::Validation(_)));
    }

    #[tokio::test]
    async fn test_user_permissions_list_global_only_permissions() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/latest/permissions/global/users")
            .with_status(200)
            .with_body(r#"{"results": [
                {"name": "ops", "permissions": ["READ", "RESTRICTEDADMINISTRATION", "CREATEREPOSITORY"]},
                {"name": "qa", "permissions": ["READ"]}
            ]}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let users = client
            .permissions()
            .user_permissions_list(&PermissionScope::Global, None)
            .await
            .unwrap();

        assert_eq!(
            users[0].permissions,
            vec![
                Permission::Read,
                Permission::RestrictedAdministration,
                Permission::CreateRepository,
            ]
        );
        assert_eq!(users[1].name, "qa");
    }
}
