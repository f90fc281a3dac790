//! Loading plan export: the flight, its placement and a timestamp as one JSON
//! document.

use crate::flight::FlightRecord;
use crate::placement::PlacementResult;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingPlan {
    pub flight: FlightRecord,
    pub placement: PlacementResult,
    pub exported_at: DateTime<Utc>,
}

impl LoadingPlan {
    pub fn new(flight: FlightRecord, placement: PlacementResult) -> Self {
        Self::at(flight, placement, Utc::now())
    }

    pub fn at(flight: FlightRecord, placement: PlacementResult, exported_at: DateTime<Utc>) -> Self {
        Self {
            flight,
            placement,
            exported_at,
        }
    }

    /// `loading-plan-{flight}-{millis}.json`. Path separators in the flight
    /// number are replaced.
    pub fn default_file_name(&self) -> String {
        let flight: String = self
            .flight
            .flight_number
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        format!(
            "loading-plan-{}-{}.json",
            flight,
            self.exported_at.timestamp_millis()
        )
    }

    /// Writes the plan. A directory target gets the default file name inside it.
    pub fn write_to(&self, target: &Path) -> Result<PathBuf> {
        let path = if target.is_dir() {
            target.join(self.default_file_name())
        } else {
            target.to_path_buf()
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {:?}", parent))?;
            }
        }

        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize loading plan")?;
        fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;
        log::info!(
            "Loading plan exported — flight={} path={:?}",
            self.flight.flight_number,
            path
        );
        Ok(path)
    }
}
