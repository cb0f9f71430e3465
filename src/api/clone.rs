//
//  bamboo-client
//  api/clone.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloning plans.

use reqwest::{Method, StatusCode};

use super::client::{BambooClient, Sink};
use super::common::{require_non_empty, Result};
use super::plans::Plan;

/// Clone operations, obtained from [`BambooClient::clone_service`].
#[derive(Clone, Copy)]
pub struct CloneService<'a> {
    client: &'a BambooClient,
}

impl BambooClient {
    /// Clone operations.
    pub fn clone_service(&self) -> CloneService<'_> {
        CloneService { client: self }
    }
}

impl CloneService<'_> {
    /// Clones the plan `src_key` into `dst_key` and returns the new plan.
    ///
    /// Both keys are full project-plan keys (e.g. `CORE-BUILD`). The
    /// destination may live in another project.
    pub async fn clone_plan(&self, src_key: &str, dst_key: &str) -> Result<Plan> {
        require_non_empty(&[src_key, dst_key], "Source key and/or destination key")?;

        let pair = format!("{}:{}.json", src_key, dst_key);
        let request = self
            .client
            .new_request_segments(Method::PUT, &["clone", &pair])?;

        let mut plan = Plan::default();
        let response = self.client.execute(request, Sink::Json(&mut plan)).await?;
        response.ensure_status(StatusCode::OK, "Clone plan")?;

        Ok(plan)
    }
}
