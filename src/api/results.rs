//
//  bamboo-client
//  api/results.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Build result API types and operations.
//!
//! A build result is one run of a plan, addressed by its result key
//! (`{plan key}-{build number}`, e.g. `CORE-BUILD-17`).

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use super::client::{BambooClient, Sink};
use super::common::{require_non_empty, Result};

/// All the information associated with a build result.
///
/// # Fields
///
/// * `key` / `build_result_key` - Result key (e.g. `CORE-BUILD-17`)
/// * `life_cycle_state` - `Queued`, `InProgress`, `Finished`, ...
/// * `build_state` - `Successful`, `Failed` or `Unknown`
/// * `changes` - Commits that went into the build
/// * `build_started_time` / `build_completed_time` - ISO 8601 timestamps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResult {
    /// Commits included in the build.
    #[serde(default)]
    pub changes: ChangeSet,

    /// Result id.
    #[serde(default)]
    pub id: u64,

    /// Plan name.
    #[serde(default)]
    pub plan_name: String,

    /// Project name.
    #[serde(default)]
    pub project_name: String,

    /// Result key (e.g. `CORE-BUILD-17`).
    #[serde(default)]
    pub build_result_key: String,

    /// Lifecycle state (e.g. `Finished`).
    #[serde(default)]
    pub life_cycle_state: String,

    /// Start time as reported by the server.
    #[serde(default)]
    pub build_started_time: String,

    /// Completion time as reported by the server.
    #[serde(default)]
    pub build_completed_time: String,

    /// Build duration in seconds.
    #[serde(default)]
    pub build_duration_in_seconds: u64,

    /// Revision that was built.
    #[serde(default)]
    pub vcs_revision_key: String,

    /// Test summary line.
    #[serde(default)]
    pub build_test_summary: String,

    /// Number of passing tests.
    #[serde(default)]
    pub successful_test_count: u32,

    /// Number of failing tests.
    #[serde(default)]
    pub failed_test_count: u32,

    /// Number of quarantined tests.
    #[serde(default)]
    pub quarantined_test_count: u32,

    /// Number of skipped tests.
    #[serde(default)]
    pub skipped_test_count: u32,

    /// Whether the build has finished.
    #[serde(default)]
    pub finished: bool,

    /// Whether the build passed.
    #[serde(default)]
    pub successful: bool,

    /// Why the build ran, as HTML.
    #[serde(default)]
    pub build_reason: String,

    /// Why the build ran, as plain text.
    #[serde(default)]
    pub reason_summary: String,

    /// Result key.
    #[serde(default)]
    pub key: String,

    /// Result state (e.g. `Successful`).
    #[serde(default)]
    pub state: String,

    /// Build state (e.g. `Failed`).
    #[serde(default)]
    pub build_state: String,

    /// Result number.
    #[serde(default)]
    pub number: u64,

    /// Build number.
    #[serde(default)]
    pub build_number: u64,
}

/// The source changes of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// The commits.
    #[serde(default, rename = "change")]
    pub set: Vec<Change>,
}

/// Author and commit hash of a source change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    /// Commit author.
    #[serde(default)]
    pub author: String,

    /// Commit id.
    #[serde(default)]
    pub changeset_id: String,
}

/// Build result operations, obtained from [`BambooClient::results`].
#[derive(Clone, Copy)]
pub struct ResultService<'a> {
    client: &'a BambooClient,
}

impl BambooClient {
    /// Build result operations.
    pub fn results(&self) -> ResultService<'_> {
        ResultService { client: self }
    }
}

impl ResultService<'_> {
    /// Returns the latest result of the plan `plan_key`.
    pub async fn latest_result(&self, plan_key: &str) -> Result<BuildResult> {
        require_non_empty(&[plan_key], "Plan key")?;
        self.fetch(&format!("{}-latest", plan_key), "Get latest result")
            .await
    }

    /// Returns the result `result_key` (e.g. `CORE-BUILD-17`).
    pub async fn numbered_result(&self, result_key: &str) -> Result<BuildResult> {
        require_non_empty(&[result_key], "Result key")?;
        self.fetch(result_key, "Get result").await
    }

    async fn fetch(&self, result_key: &str, operation: &str) -> Result<BuildResult> {
        let request = self
            .client
            .new_request_segments(Method::GET, &["result", result_key])?;

        let mut result = BuildResult::default();
        let response = self.client.execute(request, Sink::Json(&mut result)).await?;
        response.ensure_status(StatusCode::OK, operation)?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_latest_result() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/latest/result/CORE-TEST-latest")
            .with_status(200)
            .with_body(r#"{
                "changes": {"change": [{"author": "jdoe", "changesetId": "a1b2c3"}]},
                "planName": "Test",
                "projectName": "Core",
                "buildResultKey": "CORE-TEST-12",
                "lifeCycleState": "Finished",
                "buildDurationInSeconds": 93,
                "successfulTestCount": 120,
                "failedTestCount": 1,
                "finished": true,
                "successful": false,
                "key": "CORE-TEST-12",
                "buildState": "Failed",
                "buildNumber": 12
            }"#)
            .create_async()
            .await;

        let client = crate::api::client::test_client(&server.url());
        let result = client.results().latest_result("CORE-TEST").await.unwrap();

        assert_eq!(result.build_number, 12);
        assert_eq!(result.changes.set[0].changeset_id, "a1b2c3");
        assert!(result.finished && !result.successful);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_numbered_result_empty_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/latest/result/CORE-TEST-1")
            .with_status(200)
            .create_async()
            .await;

        let client = crate::api::client::test_client(&server.url());
        let result = client.results().numbered_result("CORE-TEST-1").await.unwrap();
        assert_eq!(result, BuildResult::default());
    }

    #[tokio::test]
    async fn test_numbered_result_bad_request() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/latest/result/CORE-TEST-1")
            .with_status(400)
            .create_async()
            .await;

        let client = crate::api::client::test_client(&server.url());
        let err = client
            .results()
            .numbered_result("CORE-TEST-1")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_result_key_with_query_characters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/latest/result/CORE%3Fexpand=all")
            .with_status(200)
            .with_body(r#"{"buildNumber": 3}"#)
            .create_async()
            .await;

        let client = crate::api::client::test_client(&server.url());
        let result = client
            .results()
            .numbered_result("CORE?expand=all")
            .await
            .unwrap();

        assert_eq!(result.build_number, 3);
        mock.assert_async().await;
    }
}
