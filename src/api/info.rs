//
//  bamboo-client
//  api/info.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Server build and state information.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use super::client::{BambooClient, Sink};
use super::common::Result;
use super::server::ServerState;

/// Build information of the Bamboo server (`info.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    /// Bamboo version (e.g. `9.6.0`).
    #[serde(default)]
    pub version: String,

    /// Edition of the installation.
    #[serde(default)]
    pub edition: String,

    /// Build date of this version.
    #[serde(default)]
    pub build_date: String,

    /// Build number of this version.
    #[serde(default)]
    pub build_number: String,

    /// Current server state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ServerState>,
}

/// State of the Bamboo server (`server.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    /// Current server state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ServerState>,

    /// Whether a reindex is running.
    #[serde(default)]
    pub reindex_in_progress: bool,
}

impl ServerInfo {
    /// Whether the server is running and scheduling builds.
    pub fn is_running(&self) -> bool {
        self.state == Some(ServerState::Running)
    }
}

/// Server information operations, obtained from [`BambooClient::info`].
#[derive(Clone, Copy)]
pub struct InfoService<'a> {
    client: &'a BambooClient,
}

impl BambooClient {
    /// Server information operations.
    pub fn info(&self) -> InfoService<'_> {
        InfoService { client: self }
    }
}

impl InfoService<'_> {
    /// Fetches the build information of the server.
    pub async fn build_info(&self) -> Result<BuildInfo> {
        let request = self.client.new_request(Method::GET, "info.json")?;

        let mut info = BuildInfo::default();
        let response = self.client.execute(request, Sink::Json(&mut info)).await?;
        response.ensure_status(StatusCode::OK, "Request for server build info")?;

        Ok(info)
    }

    /// Fetches the state of the server.
    pub async fn server_info(&self) -> Result<ServerInfo> {
        let request = self.client.new_request(Method::GET, "server.json")?;

        let mut info = ServerInfo::default();
        let response = self.client.execute(request, Sink::Json(&mut info)).await?;
        response.ensure_status(StatusCode::OK, "Request for server info")?;

        Ok(info)
    }
}
