//
//  bamboo-client
//  api/comments.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Comments on build results.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use super::client::BambooClient;
use super::common::{BambooError, Result};

/// A single comment on a build result.
///
/// Only `content` is sent to the server; `result_key` addresses the result.
///
/// # Example
///
/// ```rust
/// use bamboo_client::api::comments::Comment;
///
/// let comment = Comment::new("CORE-BUILD-17", "Deployed to staging");
/// assert_eq!(
///     serde_json::to_string(&comment).unwrap(),
///     r#"{"content":"Deployed to staging"}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// The comment text.
    pub content: String,

    /// Key of the result to comment on (e.g. `CORE-BUILD-17`).
    #[serde(skip)]
    pub result_key: String,
}

impl Comment {
    /// Creates a comment for the result `result_key`.
    pub fn new(result_key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            result_key: result_key.into(),
        }
    }

    fn is_empty(&self) -> bool {
        self.result_key.is_empty() || self.content.is_empty()
    }
}

/// Comment operations, obtained from [`BambooClient::comments`].
#[derive(Clone, Copy)]
pub struct CommentService<'a> {
    client: &'a BambooClient,
}

impl BambooClient {
    /// Comment operations.
    pub fn comments(&self) -> CommentService<'_> {
        CommentService { client: self }
    }
}

impl CommentService<'_> {
    /// Adds `comment` to its build result. The server answers 204 on success.
    pub async fn add_comment(&self, comment: &Comment) -> Result<()> {
        if comment.is_empty() {
            return Err(BambooError::Validation(
                "Comment result key and content cannot be empty".to_string(),
            ));
        }

        let request = self.client.new_request_segments_with_body(
            Method::POST,
            &["result", &comment.result_key, "comment.json"],
            comment,
        )?;
        let response = self.client.send(request).await?;

        response.ensure_status(
            StatusCode::NO_CONTENT,
            &format!("Adding comment to {}", comment.result_key),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::test_client;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_add_comment() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/api/latest/result/TEST-TEST-1/comment.json")
            .match_body(Matcher::JsonString(r#"{"content": "hello world"}"#.to_string()))
            .with_status(204)
            .create_async()
            .await;

        let client = test_client(&server.url());
        client
            .comments()
            .add_comment(&Comment::new("TEST-TEST-1", "hello world"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_add_comment_bad_request() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/api/latest/result/TEST-TEST-1/comment.json")
            .with_status(400)
            .with_body("comments do not match")
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client
            .comments()
            .add_comment(&Comment::new("TEST-TEST-1", "hello world"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        let message = err.to_string();
        assert!(message.contains("400 Bad Request"));
        assert!(message.contains("comments do not match"));
    }

    #[tokio::test]
    async fn test_add_empty_comment() {
        let client = test_client("http://127.0.0.1:9");
        let err = client
            .comments()
            .add_comment(&Comment::new("TEST-TEST-1", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, BambooError::Validation(_)));
    }

    #[tokio::test]
    async fn test_add_comment_encodes_result_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/api/latest/result/TEST%2FTEST-1%231/comment.json")
            .with_status(204)
            .create_async()
            .await;

        let client = test_client(&server.url());
        client
            .comments()
            .add_comment(&Comment::new("TEST/TEST-1#1", "hello world"))
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
