//
//  bamboo-client
//  api/branches.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Plan branch API types and operations.
//!
//! Plan branches run a plan against another VCS branch. This module lists the
//! plan branches of a plan and the VCS branches Bamboo knows for it.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use super::client::{BambooClient, Sink};
use super::common::{require_non_empty, CollectionMetadata, Link, ResourceMetadata, Result};

/// Upper bound on branches requested in a single call.
const MAX_BRANCH_RESULTS: &str = "10000";

/// Response of the branch endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchesResponse {
    /// Expand and link metadata of the plan.
    #[serde(flatten)]
    pub metadata: ResourceMetadata,

    /// The branch collection.
    #[serde(default)]
    pub branches: Branches,
}

/// A collection of branches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branches {
    /// Paging metadata.
    #[serde(flatten)]
    pub metadata: CollectionMetadata,

    /// The branches of this page.
    #[serde(default, rename = "branch")]
    pub branch_list: Vec<Branch>,
}

/// A single plan branch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    /// Branch description.
    #[serde(default)]
    pub description: String,

    /// Short branch name.
    #[serde(default)]
    pub short_name: String,

    /// Short branch key (e.g. `BUILD3`).
    #[serde(default)]
    pub short_key: String,

    /// Whether the branch builds.
    #[serde(default)]
    pub enabled: bool,

    /// Link to the branch resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,

    /// Branch workflow (e.g. `BAMBOO`).
    #[serde(default)]
    pub workflow_type: String,

    /// Full key of the plan branch (e.g. `CORE-BUILD2`).
    #[serde(default)]
    pub key: String,

    /// Name of the VCS branch.
    #[serde(default)]
    pub name: String,
}

/// Plan branch operations, obtained from [`BambooClient::branches`].
#[derive(Clone, Copy)]
pub struct BranchService<'a> {
    client: &'a BambooClient,
}

impl BambooClient {
    /// Plan branch operations.
    pub fn branches(&self) -> BranchService<'_> {
        BranchService { client: self }
    }
}

impl BranchService<'_> {
    /// Lists the plan branches of `plan_key`.
    pub async fn list_plan_branches(&self, plan_key: &str) -> Result<Vec<Branch>> {
        require_non_empty(&[plan_key], "Plan key")?;

        let plan_file = format!("{}.json", plan_key);
        let branches = self
            .fetch(
                &["plan", &plan_file],
                Some("branches"),
                &format!("Listing plan branches for {}", plan_key),
            )
            .await?;

        Ok(branches.branch_list)
    }

    /// Lists the names of the VCS branches Bamboo detected for `plan_key`.
    pub async fn list_vcs_branches(&self, plan_key: &str) -> Result<Vec<String>> {
        require_non_empty(&[plan_key], "Plan key")?;

        let branches = self
            .fetch(&["plan", plan_key, "vcsBranches.json"], None, &format!("Listing VCS branches for {}", plan_key))
            .await?;

        Ok(branches
            .branch_list
            .into_iter()
            .map(|branch| branch.name)
            .collect())
    }

    async fn fetch(
        &self,
        segments: &[&str],
        expand: Option<&str>,
        operation: &str,
    ) -> Result<Branches> {
        let mut request = self.client.new_request_segments(Method::GET, segments)?;
        {
            let mut query = request.url_mut().query_pairs_mut();
            query.append_pair("max-results", MAX_BRANCH_RESULTS);
            if let Some(expand) = expand {
                query.append_pair("expand", expand);
            }
        }

        let mut branch_response = BranchesResponse::default();
        let response = self
            .client
            .execute(request, Sink::Json(&mut branch_response))
            .await?;
        response.ensure_status(StatusCode::OK, operation)?;

        Ok(branch_response.branches)
    }
}
