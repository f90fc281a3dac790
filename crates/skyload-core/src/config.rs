// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skyload_advisor::anthropic::{AnthropicConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SETTINGS_FILE: &str = "settings.json";

/// Files written with an older version are upgraded on load.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Anthropic key. Usually supplied through `ANTHROPIC_API_KEY` instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Let the model propose placements instead of the grid.
    pub ai_placement_enabled: bool,
    pub bind_addr: String,
    pub alert_limit: usize,
    pub schema_version: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 60,
            ai_placement_enabled: false,
            bind_addr: "127.0.0.1:3000".to_string(),
            alert_limit: crate::query::DEFAULT_ALERT_LIMIT,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }
}

impl Settings {
    pub fn default_path() -> PathBuf {
        crate::get_config_root().join(SETTINGS_FILE)
    }

    /// Reads settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Settings> {
        if !path.exists() {
            log::debug!("No settings file, using defaults — path={:?}", path);
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        let mut settings: Settings = serde_json::from_str(&content).map_err(|e| {
            log::error!("Settings parse error — path={:?} error={}", path, e);
            e
        })?;

        if settings.schema_version < CURRENT_SCHEMA_VERSION {
            log::info!(
                "Migrating settings — from=v{} to=v{}",
                settings.schema_version,
                CURRENT_SCHEMA_VERSION
            );
            // v0 files predate the model switch and may carry an empty model name.
            if settings.model.trim().is_empty() {
                settings.model = DEFAULT_MODEL.to_string();
            }
            settings.schema_version = CURRENT_SCHEMA_VERSION;
        }

        Ok(settings)
    }

    /// Like [`load`](Self::load), but a broken file is logged and replaced
    /// by defaults.
    pub fn load_or_default(path: &Path) -> Settings {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable settings — path={:?} error={:#}", path, e);
            Settings::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
        log::debug!("Settings saved — path={:?}", path);
        Ok(())
    }

    /// Connection details for the model, or `None` without a usable key.
    pub fn anthropic_config(&self) -> Option<AnthropicConfig> {
        let key = self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        Some(AnthropicConfig {
            api_key: key.to_string(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        })
    }
}
