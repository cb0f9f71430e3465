//
//  bamboo-client
//  config/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Configuration file I/O.
//!
//! Thin helpers used by [`Config`](super::Config) to read and write its TOML
//! file. Writes create missing parent directories.

use std::path::Path;

use anyhow::{Context, Result};

/// Reads the whole configuration file at `path` as UTF-8 text.
pub fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))
}

/// Writes `content` to `path`, replacing any existing file.
///
/// Parent directories are created when missing.
pub fn write_config_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file {}", path.display()))
}

/// Returns `true` if a regular file exists at `path`.
pub fn config_exists(path: &Path) -> bool {
    path.is_file()
}
