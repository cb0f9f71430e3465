//
//  bamboo-client
//  api/server.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Server state transitions and reindexing.
//!
//! # Server States
//!
//! | State | Meaning |
//! |-------|---------|
//! | `RUNNING` | Builds are scheduled normally |
//! | `PAUSING` | The server is being paused |
//! | `PAUSED` | No new builds are scheduled; change detection continues |
//! | `PREPARING_FOR_RESTART` | Change detection and indexing are stopping |
//! | `READY_FOR_RESTART` | The server may be restarted; builds resume only after a restart |
//!
//! # Example
//!
//! ```rust,no_run
//! use bamboo_client::api::BambooClient;
//! use bamboo_client::api::server::ServerState;
//! use bamboo_client::auth::Credential;
//!
//! # async fn example() -> bamboo_client::api::common::Result<()> {
//! let client = BambooClient::new(Credential::basic("admin", "admin"))?;
//! let state = client.server().pause().await?;
//! assert_eq!(state.info.state, Some(ServerState::Paused));
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use super::client::{BambooClient, Sink};
use super::common::{BambooError, Result};
use super::info::ServerInfo;

/// Lifecycle state of a Bamboo server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerState {
    /// Accepting builds.
    Running,
    /// Finishing running builds before pausing.
    Pausing,
    /// Not starting new builds.
    Paused,
    /// Finishing running builds before a restart.
    PreparingForRestart,
    /// Safe to restart.
    ReadyForRestart,
}

impl ServerState {
    /// The wire representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Pausing => "PAUSING",
            Self::Paused => "PAUSED",
            Self::PreparingForRestart => "PREPARING_FOR_RESTART",
            Self::ReadyForRestart => "READY_FOR_RESTART",
        }
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerState {
    type Err = BambooError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "RUNNING" => Ok(Self::Running),
            "PAUSING" => Ok(Self::Pausing),
            "PAUSED" => Ok(Self::Paused),
            "PREPARING_FOR_RESTART" => Ok(Self::PreparingForRestart),
            "READY_FOR_RESTART" => Ok(Self::ReadyForRestart),
            other => Err(BambooError::Validation(format!("Unknown server state: {}", other))),
        }
    }
}

/// Server state after a transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionStateInfo {
    /// State of the server after the transition.
    #[serde(flatten)]
    pub info: ServerInfo,

    /// User who requested the transition.
    #[serde(default)]
    pub set_by_user: String,
}

/// State of a server reindex.
///
/// `reindex_pending` is set when a reindex is required, e.g. because a
/// previous one failed or an upgrade task asked for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReindexState {
    /// Whether a reindex is running.
    #[serde(default)]
    pub reindex_in_progress: bool,

    /// Whether a reindex is required.
    #[serde(default)]
    pub reindex_pending: bool,
}

/// Server operations, obtained from [`BambooClient::server`].
#[derive(Clone, Copy)]
pub struct ServerService<'a> {
    client: &'a BambooClient,
}

impl BambooClient {
    /// Server operations.
    pub fn server(&self) -> ServerService<'_> {
        ServerService { client: self }
    }
}

impl ServerService<'_> {
    /// Moves the server to `PAUSED`. Only the scheduling of new builds stops.
    pub async fn pause(&self) -> Result<TransitionStateInfo> {
        self.transition(Method::POST, "server/pause.json", "Server pause")
            .await
    }

    /// Moves the server to `RUNNING`, or to `READY_FOR_RESTART` if a restart
    /// was prepared.
    pub async fn resume(&self) -> Result<TransitionStateInfo> {
        self.transition(Method::POST, "server/resume.json", "Server resume")
            .await
    }

    /// Moves the server to `PREPARING_FOR_RESTART`.
    pub async fn prepare_for_restart(&self) -> Result<TransitionStateInfo> {
        self.transition(
            Method::PUT,
            "server/prepareForRestart.json",
            "Server prepare for restart",
        )
        .await
    }

    /// Starts a reindex. The server answers 202 Accepted.
    pub async fn reindex(&self) -> Result<ReindexState> {
        self.reindex_request(Method::POST, StatusCode::ACCEPTED, "Server reindex")
            .await
    }

    /// Returns the state of the current reindex.
    pub async fn reindex_status(&self) -> Result<ReindexState> {
        self.reindex_request(Method::GET, StatusCode::OK, "Request for reindex status")
            .await
    }

    async fn transition(&self, method: Method, path: &str, operation: &str) -> Result<TransitionStateInfo> {
        let request = self.client.new_request(method, path)?;

        let mut state = TransitionStateInfo::default();
        let response = self.client.execute(request, Sink::Json(&mut state)).await?;
        response.ensure_status(StatusCode::OK, operation)?;

        Ok(state)
    }

    async fn reindex_request(
        &self,
        method: Method,
        expected: StatusCode,
        operation: &str,
    ) -> Result<ReindexState> {
        let request = self.client.new_request(method, "reindex")?;

        let mut state = ReindexState::default();
        let response = self.client.execute(request, Sink::Json(&mut state)).await?;
        response.ensure_status(expected, operation)?;

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::test_client;

    #[test]
    fn test_server_state_from_str() {
        assert_eq!(
            "READY_FOR_RESTART".parse::<ServerState>().unwrap(),
            ServerState::ReadyForRestart
        );
        assert_eq!(ServerState::PreparingForRestart.to_string(), "PREPARING_FOR_RESTART");
        assert!("running".parse::<ServerState>().is_err());
    }

    #[tokio::test]
    async fn test_pause_and_resume() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/api/latest/server/pause.json")
            .with_status(200)
            .with_body(r#"{"state": "PAUSED", "reindexInProgress": false, "setByUser": "admin"}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/rest/api/latest/server/resume.json")
            .with_status(200)
            .with_body(r#"{"state": "RUNNING", "reindexInProgress": false, "setByUser": "admin"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());

        let paused = client.server().pause().await.unwrap();
        assert_eq!(paused.info.state, Some(ServerState::Paused));
        assert_eq!(paused.set_by_user, "admin");

        let resumed = client.server().resume().await.unwrap();
        assert!(resumed.info.is_running());
    }

    #[tokio::test]
    async fn test_prepare_for_restart() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/rest/api/latest/server/prepareForRestart.json")
            .with_status(200)
            .with_body(r#"{"state": "PREPARING_FOR_RESTART", "setByUser": "admin"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let state = client.server().prepare_for_restart().await.unwrap();

        assert_eq!(state.info.state, Some(ServerState::PreparingForRestart));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_pause_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/api/latest/server/pause.json")
            .with_status(401)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.server().pause().await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_reindex() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/api/latest/reindex")
            .with_status(202)
            .with_body(r#"{"reindexInProgress": true, "reindexPending": false}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/rest/api/latest/reindex")
            .with_status(200)
            .with_body(r#"{"reindexInProgress": false, "reindexPending": true}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());

        let started = client.server().reindex().await.unwrap();
        assert!(started.reindex_in_progress);

        let status = client.server().reindex_status().await.unwrap();
        assert!(status.reindex_pending);
    }

    #[tokio::test]
    async fn test_reindex_expects_accepted() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/api/latest/reindex")
            .with_status(200)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.server().reindex().await.unwrap_err();
        assert!(err.to_string().starts_with("Server reindex returned 200 OK"));
    }
}
