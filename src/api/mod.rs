//
//  bamboo-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bamboo REST API
//!
//! Everything goes through [`BambooClient`]: it builds authenticated requests
//! against `<server>/rest/api/latest/`, sends them and decodes the response.
//! Each resource family is exposed as a lightweight service borrowed from the
//! client:
//!
//! | Accessor | Module | Covers |
//! |----------|--------|--------|
//! | `plans()` | [`plans`] | plan listing, branch creation, enable/delete |
//! | `projects()` | [`projects`] | projects and their plans |
//! | `branches()` | [`branches`] | plan branches and VCS branches |
//! | `deploys()` | [`deploys`] | deployment projects, versions, queueing |
//! | `results()` | [`results`] | build results |
//! | `comments()` / `labels()` | [`comments`], [`labels`] | result annotations |
//! | `clone_service()` | [`clone`] | plan cloning |
//! | `server()` / `info()` | [`server`], [`info`] | server state and build info |
//! | `agents()` | [`agents`] | agent assignments |
//! | `encryption()` | [`encryption`] | server-side secret encryption |
//! | `repositories()` | [`repositories`] | linked repositories and specs scans |
//! | `permissions()` | [`permissions`] | user, group and role permissions |
//!
//! ## Errors
//!
//! Every operation returns [`Result`]. A status other than the one the
//! operation expects becomes [`BambooError::UnexpectedStatus`], carrying the
//! status and the server's message.

pub mod agents;
pub mod branches;
pub mod client;
pub mod clone;
pub mod comments;
pub mod common;
pub mod deploys;
pub mod encryption;
pub mod info;
pub mod labels;
pub mod permissions;
pub mod plans;
pub mod projects;
pub mod repositories;
pub mod results;
pub mod server;

pub use client::{BambooClient, Response, Sink};
pub use common::{BambooError, Result};
