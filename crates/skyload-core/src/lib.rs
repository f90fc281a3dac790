// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod ai;
pub mod aircraft;
pub mod analysis;
pub mod cargo;
pub mod config;
pub mod export;
pub mod flight;
pub mod load;
pub mod placement;
pub mod query;
pub mod session;

use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkyloadError {
    #[error("Invalid flight upload: {0}")]
    InvalidUpload(String),
    #[error("Invalid container {id}: {reason}")]
    InvalidContainer { id: String, reason: String },
    #[error("Flight not found: {0}")]
    FlightNotFound(String),
    #[error("No flights loaded")]
    NoFlights,
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Directory holding `settings.json` and the saved session.
/// Falls back to `.skyload` in the working directory when the platform has no
/// config location.
pub fn get_config_root() -> PathBuf {
    ProjectDirs::from("org", "skyload", "skyload")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".skyload"))
}
