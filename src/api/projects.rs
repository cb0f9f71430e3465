//
//  bamboo-client
//  api/projects.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project API types and operations.
//!
//! Projects group plans and deployment projects in Bamboo.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use super::client::{BambooClient, Sink};
use super::common::{require_non_empty, CollectionMetadata, Link, ResourceMetadata, Result};
use super::plans::{Plan, PlanResponse};

/// Response of the `project.json` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectResponse {
    /// Expand and link metadata.
    #[serde(flatten)]
    pub metadata: ResourceMetadata,

    /// The project collection.
    #[serde(default)]
    pub projects: Projects,
}

/// A collection of projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projects {
    /// Paging metadata.
    #[serde(flatten)]
    pub metadata: CollectionMetadata,

    /// The projects of this page.
    #[serde(default, rename = "project")]
    pub project_list: Vec<Project>,
}

/// A single project as returned in project listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project key (e.g. `CORE`).
    #[serde(default)]
    pub key: String,

    /// Project name.
    #[serde(default)]
    pub name: String,

    /// Project description.
    #[serde(default)]
    pub description: String,

    /// Link to the project resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

/// Detailed information on a single project.
///
/// # Fields
///
/// * `key` - Project key (e.g. `CORE`)
/// * `name` - Project name
/// * `description` - Project description, empty when unset
/// * `num_plans` - Number of plans in the project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInformation {
    /// Project key.
    #[serde(default)]
    pub key: String,

    /// Project name.
    #[serde(default)]
    pub name: String,

    /// Project description.
    #[serde(default)]
    pub description: String,

    /// Plan count summary.
    #[serde(default, rename = "plans")]
    pub num_plans: ProjectPlansInformation,
}

/// Plan count of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPlansInformation {
    /// Number of plans in the project.
    #[serde(default)]
    pub size: u32,
}

/// Project operations, obtained from [`BambooClient::projects`].
#[derive(Clone, Copy)]
pub struct ProjectService<'a> {
    client: &'a BambooClient,
}

impl BambooClient {
    /// Project operations.
    pub fn projects(&self) -> ProjectService<'_> {
        ProjectService { client: self }
    }
}

impl ProjectService<'_> {
    /// Returns information on the project `project_key`.
    pub async fn project_info(&self, project_key: &str) -> Result<ProjectInformation> {
        require_non_empty(&[project_key], "Project key")?;

        let project_file = format!("{}.json", project_key);
        let request = self
            .client
            .new_request_segments(Method::GET, &["project", &project_file])?;

        let mut info = ProjectInformation::default();
        let response = self.client.execute(request, Sink::Json(&mut info)).await?;
        response.ensure_status(StatusCode::OK, "Getting project information")?;

        Ok(info)
    }

    /// Returns the plans of the project `project_key` (up to 1000).
    pub async fn project_plans(&self, project_key: &str) -> Result<Vec<Plan>> {
        require_non_empty(&[project_key], "Project key")?;

        let project_file = format!("{}.json", project_key);
        let mut request = self
            .client
            .new_request_segments(Method::GET, &["project", &project_file])?;
        request
            .url_mut()
            .query_pairs_mut()
            .append_pair("expand", "plans")
            .append_pair("max-result", "1000");

        let mut plan_response = PlanResponse::default();
        let response = self
            .client
            .execute(request, Sink::Json(&mut plan_response))
            .await?;
        response.ensure_status(StatusCode::OK, "Getting project plans")?;

        Ok(plan_response.plans.plan_list)
    }

    /// Lists every project visible to the credential.
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let request = self.client.new_request(Method::GET, "project.json")?;

        let mut project_response = ProjectResponse::default();
        let response = self
            .client
            .execute(request, Sink::Json(&mut project_response))
            .await?;
        response.ensure_status(StatusCode::OK, "List projects")?;

        Ok(project_response.projects.project_list)
    }
}
