//
//  bamboo-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bamboo Client Library
//!
//! An async client for the REST API of Atlassian Bamboo, the CI and
//! deployment server.
//!
//! ## Overview
//!
//! [`BambooClient`] owns the HTTP transport, the server URL and the
//! credentials. Operations are grouped into services borrowed from the
//! client (`client.plans()`, `client.deploys()`, `client.permissions()`, ...),
//! each of which builds a request, executes it and checks the status the
//! endpoint is documented to return.
//!
//! ## Module Structure
//!
//! - [`api`]: the request executor and every resource service
//! - [`auth`]: credentials and the `Authorization` header
//! - [`config`]: TOML configuration that builds a ready client
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bamboo_client::{BambooClient, Credential};
//!
//! # async fn example() -> bamboo_client::api::Result<()> {
//! let client = BambooClient::new(Credential::basic("admin", "admin"))?
//!     .with_url("https://bamboo.example.com")?;
//!
//! for key in client.plans().list_plan_keys().await? {
//!     let result = client.results().latest_result(&key).await?;
//!     println!("{}: {}", key, result.state);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// The request executor and the resource services.
pub mod api;

/// Credentials attached to every request.
pub mod auth;

/// Configuration file management.
///
/// Stored in platform-specific locations:
/// - Linux: `~/.config/bamboo/config.toml`
/// - macOS: `~/Library/Application Support/bamboo/config.toml`
/// - Windows: `%APPDATA%\bamboo\config\config.toml`
pub mod config;

pub use api::{BambooClient, BambooError};
pub use auth::Credential;
pub use config::Config;

/// Application name, used for the configuration directory.
pub const APP_NAME: &str = "bamboo";

/// Library version, taken from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
