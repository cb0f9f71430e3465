//
//  bamboo-client
//  api/encryption.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Server-side text encryption, used for secrets in Bamboo Specs.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use super::client::{BambooClient, Sink};
use super::common::{require_non_empty, Result};

#[derive(Debug, Serialize)]
struct EncryptionRequest<'a> {
    text: &'a str,
}

/// Text encrypted by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionResult {
    /// The encrypted value, ready to paste into a plan or specs file.
    #[serde(default)]
    pub encrypted_text: String,
}

/// Encryption operations, obtained from [`BambooClient::encryption`].
#[derive(Clone, Copy)]
pub struct EncryptionService<'a> {
    client: &'a BambooClient,
}

impl BambooClient {
    /// Encryption operations.
    pub fn encryption(&self) -> EncryptionService<'_> {
        EncryptionService { client: self }
    }
}

impl EncryptionService<'_> {
    /// Encrypts `text` with the server key.
    ///
    /// The result can be pasted into Bamboo Specs as an encrypted value.
    pub async fn encrypt(&self, text: &str) -> Result<EncryptionResult> {
        require_non_empty(&[text], "Text to encrypt")?;

        let body = EncryptionRequest { text };
        let request = self.client.new_request_with_body(Method::POST, "encrypt", &body)?;

        let mut result = EncryptionResult::default();
        let response = self.client.execute(request, Sink::Json(&mut result)).await?;
        response.ensure_status(StatusCode::OK, "Encrypt")?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::test_client;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_encrypt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/api/latest/encrypt")
            .match_body(Matcher::JsonString(r#"{"text": "p@ss<word>&"}"#.to_string()))
            .with_status(200)
            .with_body(r#"{"encryptedText": "BAMSCRT@0@0@abcdef=="}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = client.encryption().encrypt("p@ss<word>&").await.unwrap();

        assert_eq!(result.encrypted_text, "BAMSCRT@0@0@abcdef==");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_encrypt_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/api/latest/encrypt")
            .with_status(401)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.encryption().encrypt("secret").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    }
}
