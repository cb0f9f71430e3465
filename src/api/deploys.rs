//
//  bamboo-client
//  api/deploys.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Deployment project API types and operations.
//!
//! Deployment projects take the artifacts of a build plan and release them to
//! environments. This module creates versions, queues deployments and reads
//! deployment results.
//!
//! # Overview
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Deploy`] | A deployment project with its environments |
//! | [`DeployEnvironment`] | Environment summary inside a deployment project |
//! | [`Environment`] | Full environment definition including permissions |
//! | [`DeployStatus`] | State of a single deployment result |
//! | [`QueuedDeploy`] | Handle returned when a deployment is queued |
//!
//! # Example
//!
//! ```rust,no_run
//! use bamboo_client::api::BambooClient;
//! use bamboo_client::auth::Credential;
//!
//! # async fn example() -> bamboo_client::api::common::Result<()> {
//! let client = BambooClient::new(Credential::bearer("token"))?.with_url("http://bamboo:8085")?;
//! let deploys = client.deploys();
//!
//! let version = deploys
//!     .create_deploy_version(42, "CORE-BUILD-17", "release-17", "release-18")
//!     .await?;
//! let queued = deploys.queue_deploy(7, version.id).await?;
//! let status = deploys.deploy_status(queued.deployment_result_id).await?;
//! println!("{}: {}", status.deployment_version_name, status.life_cycle_state);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use super::client::{BambooClient, Sink};
use super::common::{require_id, require_non_empty, Link, Result};
use super::plans::PlanKey;

/// A deployment project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deploy {
    /// Deployment project id.
    #[serde(default)]
    pub id: u64,

    /// Plan whose artifacts this project deploys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_key: Option<PlanKey>,

    /// Project name.
    #[serde(default)]
    pub name: String,

    /// Project description.
    #[serde(default)]
    pub description: String,

    /// Environments of the project, in order.
    #[serde(default)]
    pub environments: Vec<DeployEnvironment>,
}

/// Environment summary as listed inside a deployment project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployEnvironment {
    /// Environment id.
    #[serde(default)]
    pub id: u64,

    /// Environment name.
    #[serde(default)]
    pub name: String,

    /// Environment description.
    #[serde(default)]
    pub description: String,

    /// Owning deployment project.
    #[serde(default)]
    pub deployment_project_id: u64,
}

/// Full definition of a deployment environment.
///
/// # Fields
///
/// * `id` - Environment id
/// * `key` - Environment key
/// * `name` - Environment name (e.g. `Production`)
/// * `deployment_project_id` - Owning deployment project
/// * `operations` - What the current credential may do with the environment
/// * `position` - Position of the environment in the project
/// * `configuration_state` - Configuration state (e.g. `TASKED`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// Environment id.
    #[serde(default)]
    pub id: u64,

    /// Environment key.
    #[serde(default)]
    pub key: PlanKey,

    /// Environment name (e.g. `Production`).
    #[serde(default)]
    pub name: String,

    /// Environment description.
    #[serde(default)]
    pub description: String,

    /// Owning deployment project.
    #[serde(default)]
    pub deployment_project_id: u64,

    /// What the current credential may do with the environment.
    #[serde(default)]
    pub operations: EnvironmentOperations,

    /// Position of the environment in the project.
    #[serde(default)]
    pub position: u32,

    /// Configuration state (e.g. `TASKED`).
    #[serde(default)]
    pub configuration_state: String,
}

/// Operations the current credential may perform on an environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentOperations {
    /// May view the environment.
    #[serde(default)]
    pub can_view: bool,

    /// May edit the environment.
    #[serde(default)]
    pub can_edit: bool,

    /// May delete the environment.
    #[serde(default)]
    pub can_delete: bool,

    /// Has permission to deploy to the environment.
    #[serde(default)]
    pub allowed_to_execute: bool,

    /// Can deploy right now.
    #[serde(default)]
    pub can_execute: bool,

    /// Why the environment cannot be executed, if it cannot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cant_execute_reason: Option<String>,

    /// May create versions in the owning project.
    #[serde(default)]
    pub allowed_to_create_version: bool,

    /// May change the status of versions.
    #[serde(default)]
    pub allowed_to_set_version_status: bool,
}

/// Deployment results of an environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeployEnvironmentResults {
    /// Environment name.
    #[serde(default)]
    pub name: String,

    /// Environment id.
    #[serde(default)]
    pub id: u64,

    /// Deployment results, newest first.
    #[serde(default)]
    pub results: Vec<DeployStatus>,
}

/// Version information of a deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentVersion {
    /// Version name (e.g. `release-12`).
    #[serde(default)]
    pub name: String,

    /// Version id.
    #[serde(default)]
    pub id: u64,
}

/// Handle of a queued deployment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedDeploy {
    /// Id to poll with [`DeployService::deploy_status`].
    #[serde(default)]
    pub deployment_result_id: u64,

    /// Link to the deployment result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

/// State of a single deployment result.
///
/// `deployment_state` is e.g. `SUCCESS`, `FAILED` or `UNKNOWN`;
/// `life_cycle_state` is e.g. `QUEUED`, `IN_PROGRESS` or `FINISHED`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployStatus {
    /// The deployed version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_version: Option<DeploymentVersion>,

    /// Name of the deployed version.
    #[serde(default)]
    pub deployment_version_name: String,

    /// Outcome (e.g. `SUCCESS`).
    #[serde(default)]
    pub deployment_state: String,

    /// Progress (e.g. `FINISHED`).
    #[serde(default)]
    pub life_cycle_state: String,

    /// Start of the deployment in milliseconds since the Unix epoch.
    #[serde(default)]
    pub started_date: i64,
}

impl DeployStatus {
    /// Start of the deployment, or `None` if the server did not report one.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        if self.started_date == 0 {
            return None;
        }
        DateTime::from_timestamp_millis(self.started_date)
    }
}

/// Body of the create-version request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDeploymentVersion<'a> {
    plan_result_key: &'a str,
    name: &'a str,
    next_version_name: &'a str,
}

/// A release created by [`DeployService::create_deploy_version`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployVersionResult {
    /// Version id.
    #[serde(default)]
    pub id: u64,

    /// Version name.
    #[serde(default)]
    pub name: String,
}

/// Deployment operations, obtained from [`BambooClient::deploys`].
#[derive(Clone, Copy)]
pub struct DeployService<'a> {
    client: &'a BambooClient,
}

impl BambooClient {
    /// Deployment operations.
    pub fn deploys(&self) -> DeployService<'_> {
        DeployService { client: self }
    }
}

impl DeployService<'_> {
    /// Creates a release named `version_name` from the build result
    /// `plan_result_key` in the deployment project `deployment_project_id`.
    ///
    /// `next_version_name` is the name Bamboo will suggest for the next
    /// release.
    pub async fn create_deploy_version(
        &self,
        deployment_project_id: u64,
        plan_result_key: &str,
        version_name: &str,
        next_version_name: &str,
    ) -> Result<DeployVersionResult> {
        require_id(deployment_project_id, "Deployment project ID")?;
        require_non_empty(&[plan_result_key, version_name], "Plan result key and/or version name")?;

        let body = CreateDeploymentVersion {
            plan_result_key,
            name: version_name,
            next_version_name,
        };
        let id = deployment_project_id.to_string();
        let request = self.client.new_request_segments_with_body(
            Method::POST,
            &["deploy", "project", &id, "version"],
            &body,
        )?;

        let mut result = DeployVersionResult::default();
        let response = self.client.execute(request, Sink::Json(&mut result)).await?;
        response.ensure_status(StatusCode::OK, "Create deployment version")?;

        Ok(result)
    }

    /// Lists every deployment project.
    pub async fn list_deploys(&self) -> Result<Vec<Deploy>> {
        let request = self.client.new_request(Method::GET, "deploy/project/all")?;

        let mut deploys: Vec<Deploy> = Vec::new();
        let response = self.client.execute(request, Sink::Json(&mut deploys)).await?;
        response.ensure_status(StatusCode::OK, "List deployment projects")?;

        Ok(deploys)
    }

    /// Returns the deployment project `id`.
    pub async fn deploy_project(&self, id: u64) -> Result<Deploy> {
        require_id(id, "Deployment project ID")?;

        let id = id.to_string();
        let request = self
            .client
            .new_request_segments(Method::GET, &["deploy", "project", &id])?;

        let mut deploy = Deploy::default();
        let response = self.client.execute(request, Sink::Json(&mut deploy)).await?;
        response.ensure_status(StatusCode::OK, "Get deployment project")?;

        Ok(deploy)
    }

    /// Returns the environments of the deployment project `id`.
    pub async fn deploy_environments(&self, id: u64) -> Result<Vec<DeployEnvironment>> {
        Ok(self.deploy_project(id).await?.environments)
    }

    /// Returns the full definition of the environment `id`.
    pub async fn environment(&self, id: u64) -> Result<Environment> {
        require_id(id, "Environment ID")?;

        let id = id.to_string();
        let request = self
            .client
            .new_request_segments(Method::GET, &["deploy", "environment", &id])?;

        let mut environment = Environment::default();
        let response = self
            .client
            .execute(request, Sink::Json(&mut environment))
            .await?;
        response.ensure_status(StatusCode::OK, "Get environment")?;

        Ok(environment)
    }

    /// Returns the deployment results of the environment `id`.
    pub async fn deploy_environment_results(&self, id: u64) -> Result<DeployEnvironmentResults> {
        require_id(id, "Environment ID")?;

        let id = id.to_string();
        let request = self
            .client
            .new_request_segments(Method::GET, &["deploy", "environment", &id, "results"])?;

        let mut results = DeployEnvironmentResults::default();
        let response = self.client.execute(request, Sink::Json(&mut results)).await?;
        response.ensure_status(StatusCode::OK, "Get environment results")?;

        Ok(results)
    }

    /// Queues a deployment of `version_id` to `environment_id`.
    pub async fn queue_deploy(&self, environment_id: u64, version_id: u64) -> Result<QueuedDeploy> {
        require_id(environment_id, "Environment ID")?;
        require_id(version_id, "Version ID")?;

        let mut request = self.client.new_request(Method::POST, "queue/deployment/")?;
        request
            .url_mut()
            .query_pairs_mut()
            .append_pair("environmentId", &environment_id.to_string())
            .append_pair("versionId", &version_id.to_string());

        let mut queued = QueuedDeploy::default();
        let response = self.client.execute(request, Sink::Json(&mut queued)).await?;
        response.ensure_status(StatusCode::OK, "Queue deployment")?;

        Ok(queued)
    }

    /// Returns the state of the deployment result `id`.
    pub async fn deploy_status(&self, id: u64) -> Result<DeployStatus> {
        require_id(id, "Deployment result ID")?;

        let id = id.to_string();
        let request = self
            .client
            .new_request_segments(Method::GET, &["deploy", "result", &id])?;

        let mut status = DeployStatus::default();
        let response = self.client.execute(request, Sink::Json(&mut status)).await?;
        response.ensure_status(StatusCode::OK, "Get deployment status")?;

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::test_client;
    use crate::api::common::BambooError;
    use mockito::Matcher;

    const DEPLOY_JSON: &str = r#"{
        "id": 42,
        "planKey": {"key": "CORE-BUILD"},
        "name": "Core release",
        "environments": [
            {"id": 7, "name": "Staging", "deploymentProjectId": 42},
            {"id": 8, "name": "Production", "description": "Live", "deploymentProjectId": 42}
        ]
    }"#;

    #[tokio::test]
    async fn test_create_deploy_version() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/api/latest/deploy/project/42/version")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "planResultKey": "CORE-BUILD-17",
                "name": "release-17",
                "nextVersionName": "release-18"
            })))
            .with_status(200)
            .with_body(r#"{"id": 1001, "name": "release-17"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let version = client
            .deploys()
            .create_deploy_version(42, "CORE-BUILD-17", "release-17", "release-18")
            .await
            .unwrap();

        assert_eq!(version.id, 1001);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_deploy_version_bad_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/api/latest/deploy/project/42/version")
            .with_status(400)
            .with_body(r#"{"errors": ["This release version is already in use"]}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client
            .deploys()
            .create_deploy_version(42, "CORE-BUILD-17", "release-17", "release-18")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert!(err.to_string().contains("already in use"));
    }

    #[tokio::test]
    async fn test_zero_ids_are_rejected() {
        let client = test_client("http://127.0.0.1:9");
        let deploys = client.deploys();

        assert!(matches!(
            deploys.deploy_project(0).await,
            Err(BambooError::Validation(_))
        ));
        assert!(matches!(
            deploys.queue_deploy(7, 0).await,
            Err(BambooError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_deploys() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/latest/deploy/project/all")
            .with_status(200)
            .with_body(format!("[{}]", DEPLOY_JSON))
            .create_async()
            .await;

        let client = test_client(&server.url());
        let deploys = client.deploys().list_deploys().await.unwrap();

        assert_eq!(deploys.len(), 1);
        assert_eq!(deploys[0].plan_key.as_ref().unwrap().key, "CORE-BUILD");
    }

    #[tokio::test]
    async fn test_deploy_environments() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/latest/deploy/project/42")
            .with_status(200)
            .with_body(DEPLOY_JSON)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let environments = client.deploys().deploy_environments(42).await.unwrap();

        assert_eq!(environments.len(), 2);
        assert_eq!(environments[1].name, "Production");
        assert_eq!(environments[1].deployment_project_id, 42);
    }

    #[tokio::test]
    async fn test_environment() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/latest/deploy/environment/8")
            .with_status(200)
            .with_body(r#"{
                "id": 8,
                "key": {"key": "42-8"},
                "name": "Production",
                "deploymentProjectId": 42,
                "operations": {"canView": true, "canEdit": false, "canExecute": false,
                               "cantExecuteReason": "No permission"},
                "position": 1,
                "configurationState": "TASKED"
            }"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let environment = client.deploys().environment(8).await.unwrap();

        assert_eq!(environment.key.key, "42-8");
        assert!(environment.operations.can_view);
        assert!(!environment.operations.can_execute);
        assert_eq!(
            environment.operations.cant_execute_reason.as_deref(),
            Some("No permission")
        );
    }

    #[tokio::test]
    async fn test_queue_deploy_and_status() {
        let mut server = mockito::Server::new_async().await;
        let queue = server
            .mock("POST", "/rest/api/latest/queue/deployment/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("environmentId".into(), "8".into()),
                Matcher::UrlEncoded("versionId".into(), "1001".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"deploymentResultId": 555, "link": {"href": "http://bamboo/rest/api/latest/deploy/result/555", "rel": "self"}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/rest/api/latest/deploy/result/555")
            .with_status(200)
            .with_body(r#"{
                "deploymentVersion": {"name": "release-17", "id": 1001},
                "deploymentVersionName": "release-17",
                "deploymentState": "SUCCESS",
                "lifeCycleState": "FINISHED",
                "startedDate": 1700000000000
            }"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let queued = client.deploys().queue_deploy(8, 1001).await.unwrap();
        assert_eq!(queued.deployment_result_id, 555);
        queue.assert_async().await;

        let status = client.deploys().deploy_status(555).await.unwrap();
        assert_eq!(status.deployment_state, "SUCCESS");
        assert_eq!(
            status.started_at().unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
    }

    #[tokio::test]
    async fn test_environment_results_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/latest/deploy/environment/9/results")
            .with_status(404)
            .with_body(r#"{"message": "Environment 9 not found", "status-code": 404}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client
            .deploys()
            .deploy_environment_results(9)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(err.to_string().contains("Environment 9 not found"));
    }

    #[test]
    fn test_started_at_unset() {
        assert!(DeployStatus::default().started_at().is_none());
    }
}
