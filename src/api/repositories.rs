//
//  bamboo-client
//  api/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Linked repository API types and operations.
//!
//! Covers the repositories linked to a project and the status of Bamboo Specs
//! scans run against them.
//!
//! # Example
//!
//! ```rust,no_run
//! use bamboo_client::api::repositories::{ListRepositoryParams, ScanStatusParams, SpecImportState};
//! use bamboo_client::api::BambooClient;
//! use bamboo_client::auth::Credential;
//!
//! # async fn example() -> bamboo_client::api::common::Result<()> {
//! let client = BambooClient::new(Credential::bearer("token"))?;
//! let repos = client
//!     .repositories()
//!     .list_repositories("CORE", &ListRepositoryParams { repository_name: Some("core-specs".into()) })
//!     .await?;
//!
//! if let Some(repo) = repos.first() {
//!     let params = ScanStatusParams { id: repo.id, branch: "main".to_string() };
//!     let status = client.repositories().repository_scan_status(&params).await?;
//!     let failed = status
//!         .specs_logs
//!         .iter()
//!         .any(|log| log.spec_import_state == SpecImportState::Error);
//!     println!("in progress: {}, failed: {}", status.in_progress, failed);
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::client::{BambooClient, Sink};
use super::common::{require_id, require_non_empty, BambooError, Result};

/// A repository linked to a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Repository id.
    #[serde(default)]
    pub id: u64,

    /// Repository name.
    #[serde(default)]
    pub name: String,

    /// Repository URL.
    #[serde(default)]
    pub url: String,

    /// Whether Bamboo Specs scanning is enabled.
    #[serde(default)]
    pub rss_enabled: bool,
}

/// Optional parameters of [`RepositoryService::list_repositories`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRepositoryParams {
    /// Only return the repository with this exact name.
    pub repository_name: Option<String>,
}

/// Parameters of [`RepositoryService::repository_scan_status`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStatusParams {
    /// Repository id. Must be non-zero.
    pub id: u64,
    /// VCS branch whose scans to return.
    pub branch: String,
}

/// Result of a Bamboo Specs import.
///
/// The server reports an in-progress import as an empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SpecImportState {
    /// The specs were imported.
    Success,
    /// The import failed.
    Error,
    /// The import is still running.
    #[default]
    InProgress,
}

impl SpecImportState {
    /// The wire representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Error => "ERROR",
            Self::InProgress => "",
        }
    }
}

impl fmt::Display for SpecImportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => f.write_str("IN_PROGRESS"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl FromStr for SpecImportState {
    type Err = BambooError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "SUCCESS" => Ok(Self::Success),
            "ERROR" => Ok(Self::Error),
            "" => Ok(Self::InProgress),
            other => Err(BambooError::Validation(format!(
                "Unknown spec import state: {}",
                other
            ))),
        }
    }
}

impl Serialize for SpecImportState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SpecImportState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        value
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// Status of the Bamboo Specs scans of a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatusResponse {
    /// Whether a scan is running.
    #[serde(default)]
    pub in_progress: bool,

    /// Past specs executions, newest first.
    #[serde(default)]
    pub specs_logs: Vec<SpecsLog>,
}

/// One Bamboo Specs execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecsLog {
    /// Repository the specs came from.
    #[serde(default)]
    pub vcs_location_id: u64,

    /// Revision the specs were read at.
    #[serde(default)]
    pub revision: String,

    /// Execution time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub specs_execution_date: u64,

    /// Server-side log file of the execution.
    #[serde(default)]
    pub log_filename: String,

    /// Outcome of the import.
    #[serde(default)]
    pub spec_import_state: SpecImportState,

    /// Human readable age of the execution (e.g. `2 hours ago`).
    #[serde(default)]
    pub relative_execution_date: String,
}

/// Repository operations, obtained from [`BambooClient::repositories`].
#[derive(Clone, Copy)]
pub struct RepositoryService<'a> {
    client: &'a BambooClient,
}

impl BambooClient {
    /// Repository operations.
    pub fn repositories(&self) -> RepositoryService<'_> {
        RepositoryService { client: self }
    }
}

impl RepositoryService<'_> {
    /// Lists the repositories linked to the project `project_key`.
    ///
    /// With `params.repository_name` set, only the repository with that exact
    /// name is returned. If no repository has that name the result is an
    /// empty list, not the unfiltered one.
    pub async fn list_repositories(
        &self,
        project_key: &str,
        params: &ListRepositoryParams,
    ) -> Result<Vec<Repository>> {
        require_non_empty(&[project_key], "Project key")?;

        let request = self
            .client
            .new_request_segments(Method::GET, &["project", project_key, "repository"])?;

        let mut repos: Vec<Repository> = Vec::new();
        let response = self.client.execute(request, Sink::Json(&mut repos)).await?;
        response.ensure_status(StatusCode::OK, "List project repositories")?;

        match params.repository_name.as_deref() {
            Some(name) if !name.is_empty() => {
                repos.retain(|repo| repo.name == name);
                Ok(repos)
            }
            _ => Ok(repos),
        }
    }

    /// Returns the Bamboo Specs scan status of a repository branch.
    pub async fn repository_scan_status(&self, params: &ScanStatusParams) -> Result<ScanStatusResponse> {
        require_id(params.id, "Repository ID")?;

        let id = params.id.to_string();
        let mut request = self
            .client
            .new_request_segments(Method::GET, &["repository", &id, "scan", "status"])?;
        request
            .url_mut()
            .query_pairs_mut()
            .append_pair("branch", &params.branch)
            .append_pair("max-result", "1000");

        let mut status = ScanStatusResponse::default();
        let response = self.client.execute(request, Sink::Json(&mut status)).await?;
        response.ensure_status(StatusCode::OK, "Get repository scan status")?;

        Ok(status)
    }
}
