//
//  bamboo-client
//  api/agents.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Agent assignment API types and operations.
//!
//! An executor (a local/remote agent or an elastic image) can be dedicated to
//! a project, plan, job or deployment environment. Dedicated executors only
//! run work for the entities they are assigned to.
//!
//! # Example
//!
//! ```rust,no_run
//! use bamboo_client::api::agents::{AssignmentType, ExecutorType};
//! use bamboo_client::api::BambooClient;
//! use bamboo_client::auth::Credential;
//!
//! # async fn example() -> bamboo_client::api::common::Result<()> {
//! let client = BambooClient::new(Credential::basic("admin", "admin"))?;
//! let executor: ExecutorType = "AGENT".parse()?;
//!
//! client
//!     .agents()
//!     .dedicate_agent(executor, AssignmentType::Project, 131073, 65537)
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;

use reqwest::{Method, Request, StatusCode};
use serde::{Deserialize, Serialize};

use super::client::{BambooClient, Sink};
use super::common::{BambooError, Result};

/// Kind of executor an assignment refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutorType {
    /// A local or remote agent.
    Agent,
    /// An elastic image configuration.
    Image,
}

impl ExecutorType {
    /// The wire representation of the executor type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "AGENT",
            Self::Image => "IMAGE",
        }
    }
}

impl fmt::Display for ExecutorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutorType {
    type Err = BambooError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "AGENT" => Ok(Self::Agent),
            "IMAGE" => Ok(Self::Image),
            "" => Err(BambooError::Validation(
                "Executor type cannot be empty".to_string(),
            )),
            other => Err(BambooError::Validation(format!(
                "Unknown executor type: {}",
                other
            ))),
        }
    }
}

/// Kind of entity an executor is dedicated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentType {
    /// An entire project.
    Project,
    /// A single plan.
    Plan,
    /// A single job of a plan.
    Job,
    /// A deployment environment.
    Environment,
}

impl AssignmentType {
    /// The wire representation of the assignment type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "PROJECT",
            Self::Plan => "PLAN",
            Self::Job => "JOB",
            Self::Environment => "ENVIRONMENT",
        }
    }
}

impl fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentType {
    type Err = BambooError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PROJECT" => Ok(Self::Project),
            "PLAN" => Ok(Self::Plan),
            "JOB" => Ok(Self::Job),
            "ENVIRONMENT" => Ok(Self::Environment),
            "" => Err(BambooError::Validation(
                "Assignment type cannot be empty".to_string(),
            )),
            other => Err(BambooError::Validation(format!(
                "Unknown assignment type: {}",
                other
            ))),
        }
    }
}

/// One executor assignment.
///
/// `executable_type` is kept as text since the server reports labels beyond
/// the assignable kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentAssignment {
    /// Path of names to the assigned entity (project, plan, job).
    #[serde(default)]
    pub name_elements: Vec<String>,

    /// Human readable description of the entity.
    #[serde(default)]
    pub description: String,

    /// Kind of entity as reported by the server (e.g. `JOB`).
    #[serde(default)]
    pub executable_type: String,

    /// Id of the assigned entity.
    #[serde(default)]
    pub executable_id: i64,

    /// Display label of `executable_type`.
    #[serde(default)]
    pub executable_type_label: String,

    /// Kind of executor the assignment binds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_type: Option<ExecutorType>,

    /// Id of the agent or image.
    #[serde(default)]
    pub executor_id: i64,

    /// Whether the executor meets the capabilities the entity requires.
    #[serde(default)]
    pub capabilities_match: bool,
}

/// Agent assignment operations, obtained from [`BambooClient::agents`].
#[derive(Clone, Copy)]
pub struct AgentService<'a> {
    client: &'a BambooClient,
}

impl BambooClient {
    /// Agent assignment operations.
    pub fn agents(&self) -> AgentService<'_> {
        AgentService { client: self }
    }
}

impl AgentService<'_> {
    /// Returns the assignments of the executor `executor_id`.
    pub async fn agent_assignments(
        &self,
        executor_type: ExecutorType,
        executor_id: i64,
    ) -> Result<Vec<AgentAssignment>> {
        let request = self.assignment_request(Method::GET, executor_type, executor_id, None)?;

        let mut assignments: Vec<AgentAssignment> = Vec::new();
        let response = self
            .client
            .execute(request, Sink::Json(&mut assignments))
            .await?;
        response.ensure_status(StatusCode::OK, "Get agent assignments")?;

        Ok(assignments)
    }

    /// Dedicates the executor `executor_id` to the entity `entity_id`.
    pub async fn dedicate_agent(
        &self,
        executor_type: ExecutorType,
        assignment_type: AssignmentType,
        executor_id: i64,
        entity_id: i64,
    ) -> Result<AgentAssignment> {
        let request = self.assignment_request(
            Method::POST,
            executor_type,
            executor_id,
            Some((assignment_type, entity_id)),
        )?;

        let mut assignment = AgentAssignment::default();
        let response = self
            .client
            .execute(request, Sink::Json(&mut assignment))
            .await?;
        response.ensure_status(StatusCode::OK, "Dedicate agent")?;

        Ok(assignment)
    }

    /// Removes the assignment of `executor_id` to `entity_id`. The server
    /// answers 204 on success.
    pub async fn remove_agent_assignment(
        &self,
        executor_type: ExecutorType,
        assignment_type: AssignmentType,
        executor_id: i64,
        entity_id: i64,
    ) -> Result<()> {
        let request = self.assignment_request(
            Method::DELETE,
            executor_type,
            executor_id,
            Some((assignment_type, entity_id)),
        )?;

        let response = self.client.send(request).await?;
        response.ensure_status(StatusCode::NO_CONTENT, "Remove agent assignment")
    }

    fn assignment_request(
        &self,
        method: Method,
        executor_type: ExecutorType,
        executor_id: i64,
        entity: Option<(AssignmentType, i64)>,
    ) -> Result<Request> {
        let mut request = self.client.new_request(method, "agent/assignment")?;
        {
            let mut query = request.url_mut().query_pairs_mut();
            query
                .append_pair("executorType", executor_type.as_str())
                .append_pair("executorId", &executor_id.to_string());
            if let Some((assignment_type, entity_id)) = entity {
                query
                    .append_pair("assignmentType", assignment_type.as_str())
                    .append_pair("entityId", &entity_id.to_string());
            }
        }
        Ok(request)
    }
}
