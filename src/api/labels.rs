//
//  bamboo-client
//  api/labels.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Labels on build results.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use super::client::BambooClient;
use super::common::{BambooError, Result};

/// A single label on a build result. Only `name` is sent to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label text.
    pub name: String,

    /// Result the label is added to. Not sent in the body.
    #[serde(skip)]
    pub result_key: String,
}

impl Label {
    /// Creates a label for the result `result_key`.
    pub fn new(result_key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            result_key: result_key.into(),
        }
    }
}

/// Label operations, obtained from [`BambooClient::labels`].
#[derive(Clone, Copy)]
pub struct LabelService<'a> {
    client: &'a BambooClient,
}

impl BambooClient {
    /// Label operations.
    pub fn labels(&self) -> LabelService<'_> {
        LabelService { client: self }
    }
}

impl LabelService<'_> {
    /// Adds `label` to its build result. The server answers 204 on success.
    pub async fn add_label(&self, label: &Label) -> Result<()> {
        if label.result_key.is_empty() || label.name.is_empty() {
            return Err(BambooError::Validation(
                "Label result key and name cannot be empty".to_string(),
            ));
        }

        let request = self.client.new_request_segments_with_body(
            Method::POST,
            &["result", &label.result_key, "label.json"],
            label,
        )?;
        let response = self.client.send(request).await?;

        response.ensure_status(
            StatusCode::NO_CONTENT,
            &format!("Adding label to {}", label.result_key),
        )
    }
}
