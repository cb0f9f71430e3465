//
//  bamboo-client
//  api/plans.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Plan API types and operations.
//!
//! A plan is the top-level build definition in Bamboo. This module lists
//! plans, creates plan branches, and disables or deletes plans.
//!
//! # Example
//!
//! ```rust,no_run
//! use bamboo_client::api::BambooClient;
//! use bamboo_client::api::plans::PlanCreateBranchOptions;
//! use bamboo_client::auth::Credential;
//!
//! # async fn example() -> bamboo_client::api::common::Result<()> {
//! let client = BambooClient::new(Credential::basic("admin", "admin"))?
//!     .with_url("http://bamboo:8085")?;
//!
//! let options = PlanCreateBranchOptions { vcs_branch: Some("feature/login".to_string()) };
//! client.plans().create_plan_branch("CORE-BUILD", "feature-login", Some(&options)).await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use super::client::{BambooClient, Sink};
use super::common::{require_non_empty, CollectionMetadata, Link, ResourceMetadata, Result};

/// Optional parameters of [`PlanService::create_plan_branch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanCreateBranchOptions {
    /// VCS branch the new plan branch should build. Defaults to the server's
    /// choice when `None`.
    pub vcs_branch: Option<String>,
}

/// Response of the `plan` endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    /// Expand and link metadata.
    #[serde(flatten)]
    pub metadata: ResourceMetadata,

    /// The plan collection.
    #[serde(default)]
    pub plans: Plans,
}

/// A collection of plans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plans {
    /// Paging metadata.
    #[serde(flatten)]
    pub metadata: CollectionMetadata,

    /// The plans of this page.
    #[serde(default, rename = "plan")]
    pub plan_list: Vec<Plan>,
}

/// The definition of a single plan.
///
/// # Fields
///
/// * `key` - Full plan key (e.g. `CORE-BUILD`)
/// * `short_key` - Plan part of the key (e.g. `BUILD`)
/// * `name` - Full name including the project (e.g. `Core - Build`)
/// * `short_name` - Plan name without the project
/// * `plan_type` - Plan type reported by the server (e.g. `chain`)
/// * `enabled` - Whether the plan is enabled
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Plan name without the project (e.g. `Build`).
    #[serde(default)]
    pub short_name: String,

    /// Plan key without the project (e.g. `BUILD`).
    #[serde(default)]
    pub short_key: String,

    /// Plan type (e.g. `chain`).
    #[serde(default, rename = "type")]
    pub plan_type: String,

    /// Whether the plan builds.
    #[serde(default)]
    pub enabled: bool,

    /// Link to the plan resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,

    /// Full plan key (e.g. `CORE-BUILD`).
    #[serde(default)]
    pub key: String,

    /// Full plan name (e.g. `Core - Build`).
    #[serde(default)]
    pub name: String,

    /// Plan key object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_key: Option<PlanKey>,
}

/// The key of a plan, as nested in plan and branch payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanKey {
    /// Full plan key.
    #[serde(default)]
    pub key: String,
}

/// Plan operations, obtained from [`BambooClient::plans`].
#[derive(Clone, Copy)]
pub struct PlanService<'a> {
    client: &'a BambooClient,
}

impl BambooClient {
    /// Plan operations.
    pub fn plans(&self) -> PlanService<'_> {
        PlanService { client: self }
    }
}

impl PlanService<'_> {
    /// Creates a plan branch named `branch_name` for the plan `plan_key`.
    ///
    /// # Errors
    ///
    /// - [`Validation`](super::common::BambooError::Validation) if either name is empty
    /// - [`UnexpectedStatus`](super::common::BambooError::UnexpectedStatus) unless the server answers 200
    pub async fn create_plan_branch(
        &self,
        plan_key: &str,
        branch_name: &str,
        options: Option<&PlanCreateBranchOptions>,
    ) -> Result<()> {
        require_non_empty(&[plan_key, branch_name], "Plan key and/or branch name")?;

        let branch_file = format!("{}.json", branch_name);
        let mut request = self
            .client
            .new_request_segments(Method::PUT, &["plan", plan_key, "branch", &branch_file])?;

        if let Some(vcs_branch) = options.and_then(|o| o.vcs_branch.as_deref()) {
            if !vcs_branch.is_empty() {
                request
                    .url_mut()
                    .query_pairs_mut()
                    .append_pair("vcsBranch", vcs_branch);
            }
        }

        let response = self.client.send(request).await?;
        response.ensure_status(StatusCode::OK, "Create plan branch")
    }

    /// Returns the number of plans on the server.
    ///
    /// Only a single plan is requested; the count comes from the collection
    /// size.
    pub async fn number_of_plans(&self) -> Result<u32> {
        let plans = self.fetch_plans(1, "Getting the number of plans").await?;
        Ok(plans.metadata.size)
    }

    /// Returns every plan on the server.
    pub async fn list_plans(&self) -> Result<Vec<Plan>> {
        let count = self.number_of_plans().await?;
        let plans = self.fetch_plans(count, "Getting plan information").await?;
        Ok(plans.plan_list)
    }

    /// Returns the keys of every plan.
    pub async fn list_plan_keys(&self) -> Result<Vec<String>> {
        let plans = self.list_plans().await?;
        Ok(plans.into_iter().map(|plan| plan.key).collect())
    }

    /// Returns the short names of every plan.
    pub async fn list_plan_names(&self) -> Result<Vec<String>> {
        let plans = self.list_plans().await?;
        Ok(plans.into_iter().map(|plan| plan.short_name).collect())
    }

    /// Returns a map from plan key to short name.
    pub async fn plan_name_map(&self) -> Result<HashMap<String, String>> {
        let plans = self.list_plans().await?;
        Ok(plans
            .into_iter()
            .map(|plan| (plan.key, plan.short_name))
            .collect())
    }

    /// Disables a plan or plan branch.
    pub async fn disable_plan(&self, plan_key: &str) -> Result<()> {
        require_non_empty(&[plan_key], "Plan key")?;

        let request = self
            .client
            .new_request_segments(Method::DELETE, &["plan", plan_key, "enable"])?;
        let response = self.client.send(request).await?;
        response.ensure_status(StatusCode::OK, "Disable plan")
    }

    /// Deletes a plan. The server answers 204 on success.
    pub async fn delete_plan(&self, plan_key: &str) -> Result<()> {
        require_non_empty(&[plan_key], "Plan key")?;

        let request = self
            .client
            .new_request_segments(Method::DELETE, &["plan", plan_key])?;
        let response = self.client.send(request).await?;
        response.ensure_status(StatusCode::NO_CONTENT, "Delete plan")
    }

    async fn fetch_plans(&self, max_results: u32, operation: &str) -> Result<Plans> {
        let mut request = self.client.new_request(Method::GET, "plan.json")?;
        request
            .url_mut()
            .query_pairs_mut()
            .append_pair("max-results", &max_results.to_string());

        let mut plan_response = PlanResponse::default();
        let response = self
            .client
            .execute(request, Sink::Json(&mut plan_response))
            .await?;
        response.ensure_status(StatusCode::OK, operation)?;

        Ok(plan_response.plans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::test_client;
    use crate::api::common::BambooError;
    use mockito::Matcher;

    const PLANS_JSON: &str = r#"{
        "expand": "plans",
        "link": {"href": "http://bamboo/rest/api/latest/plan", "rel": "self"},
        "plans": {
            "size": 2,
            "expand": "plan",
            "start-index": 0,
            "max-result": 2,
            "plan": [
                {"shortName": "Build", "shortKey": "BUILD", "type": "chain", "enabled": true,
                 "key": "CORE-BUILD", "name": "Core - Build", "planKey": {"key": "CORE-BUILD"}},
                {"shortName": "Deploy", "shortKey": "DEPLOY", "type": "chain", "enabled": false,
                 "key": "CORE-DEPLOY", "name": "Core - Deploy", "planKey": {"key": "CORE-DEPLOY"}}
            ]
        }
    }"#;

    async fn mock_plan_list(server: &mut mockito::Server) {
        server
            .mock("GET", "/rest/api/latest/plan.json")
            .match_query(Matcher::UrlEncoded("max-results".into(), "1".into()))
            .with_status(200)
            .with_body(r#"{"plans": {"size": 2, "plan": []}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/rest/api/latest/plan.json")
            .match_query(Matcher::UrlEncoded("max-results".into(), "2".into()))
            .with_status(200)
            .with_body(PLANS_JSON)
            .create_async()
            .await;
    }

    #[test]
    fn test_plan_deserialization() {
        let response: PlanResponse = serde_json::from_str(PLANS_JSON).unwrap();
        assert_eq!(response.metadata.expand.as_deref(), Some("plans"));
        assert_eq!(response.plans.metadata.size, 2);

        let plan = &response.plans.plan_list[0];
        assert_eq!(plan.short_key, "BUILD");
        assert_eq!(plan.plan_type, "chain");
        assert!(plan.enabled);
        assert_eq!(plan.plan_key.as_ref().unwrap().key, "CORE-BUILD");
    }

    #[tokio::test]
    async fn test_create_plan_branch() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/rest/api/latest/plan/CORE-BUILD/branch/feature-x.json")
            .match_query(Matcher::UrlEncoded("vcsBranch".into(), "feature/x".into()))
            .with_status(200)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let options = PlanCreateBranchOptions {
            vcs_branch: Some("feature/x".to_string()),
        };
        client
            .plans()
            .create_plan_branch("CORE-BUILD", "feature-x", Some(&options))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_plan_branch_bad_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/rest/api/latest/plan/CORE-BUILD/branch/dup.json")
            .with_status(400)
            .with_body(r#"{"message": "Branch already exists"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client
            .plans()
            .create_plan_branch("CORE-BUILD", "dup", None)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert!(err.to_string().contains("Branch already exists"));
    }

    #[tokio::test]
    async fn test_create_plan_branch_validation() {
        let client = test_client("http://127.0.0.1:9");
        let err = client
            .plans()
            .create_plan_branch("", "feature", None)
            .await
            .unwrap_err();
        assert!(matches!(err, BambooError::Validation(_)));
    }

    #[tokio::test]
    async fn test_number_of_plans() {
        let mut server = mockito::Server::new_async().await;
        mock_plan_list(&mut server).await;

        let client = test_client(&server.url());
        assert_eq!(client.plans().number_of_plans().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_plan_derivatives() {
        let mut server = mockito::Server::new_async().await;
        mock_plan_list(&mut server).await;

        let client = test_client(&server.url());
        let plans = client.plans();

        assert_eq!(plans.list_plans().await.unwrap().len(), 2);
        assert_eq!(
            plans.list_plan_keys().await.unwrap(),
            vec!["CORE-BUILD", "CORE-DEPLOY"]
        );
        assert_eq!(plans.list_plan_names().await.unwrap(), vec!["Build", "Deploy"]);

        let map = plans.plan_name_map().await.unwrap();
        assert_eq!(map.get("CORE-DEPLOY").map(String::as_str), Some("Deploy"));
    }

    #[tokio::test]
    async fn test_list_plans_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/latest/plan.json")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.plans().list_plans().await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_disable_and_delete_plan() {
        let mut server = mockito::Server::new_async().await;
        let disable = server
            .mock("DELETE", "/rest/api/latest/plan/CORE-BUILD/enable")
            .with_status(200)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/rest/api/latest/plan/CORE-BUILD")
            .with_status(204)
            .create_async()
            .await;

        let client = test_client(&server.url());
        client.plans().disable_plan("CORE-BUILD").await.unwrap();
        client.plans().delete_plan("CORE-BUILD").await.unwrap();

        disable.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_plan_expects_no_content() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/rest/api/latest/plan/CORE-BUILD")
            .with_status(200)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.plans().delete_plan("CORE-BUILD").await.unwrap_err();
        assert!(matches!(err, BambooError::UnexpectedStatus { .. }));
    }

    #[tokio::test]
    async fn test_keys_stay_inside_their_path_segment() {
        let mut server = mockito::Server::new_async().await;
        let branch = server
            .mock("PUT", "/rest/api/latest/plan/CORE-BUILD/branch/fix%2312.json")
            .with_status(200)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/rest/api/latest/plan/..%2F..%2F..%2Fadmin")
            .with_status(204)
            .create_async()
            .await;

        let client = test_client(&server.url());
        client
            .plans()
            .create_plan_branch("CORE-BUILD", "fix#12", None)
            .await
            .unwrap();
        client.plans().delete_plan("../../../admin").await.unwrap();

        branch.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_dot_segment_key_is_rejected() {
        let client = test_client("http://127.0.0.1:9");
        let err = client.plans().delete_plan("..").await.unwrap_err();
        assert!(matches!(err, BambooError::Validation(_)));
    }
}
