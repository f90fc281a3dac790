// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::flight::FlightRecord;
use crate::SkyloadError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSelection {
    pub flight_number: String,
    /// Disambiguates flights that share a number across days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_date: Option<String>,
}

impl FlightSelection {
    fn matches(&self, flight: &FlightRecord) -> bool {
        flight.flight_number.eq_ignore_ascii_case(self.flight_number.trim())
            && self
                .flight_date
                .as_deref()
                .map_or(true, |d| flight.flight_date.trim() == d.trim())
    }
}

/// Flights loaded by the last upload and the one picked for planning.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub flights: Vec<FlightRecord>,
    #[serde(default)]
    pub selected: Option<FlightSelection>,
}

impl Session {
    /// Swaps in a new upload. The selection survives only if it still matches.
    pub fn replace_flights(&mut self, flights: Vec<FlightRecord>) {
        self.flights = flights;
        if let Some(selection) = &self.selected {
            if !self.flights.iter().any(|f| selection.matches(f)) {
                log::debug!(
                    "Dropping stale selection — flight={}",
                    selection.flight_number
                );
                self.selected = None;
            }
        }
    }

    /// First flight with this number (and date, if given).
    pub fn find(&self, flight_number: &str, flight_date: Option<&str>) -> Result<&FlightRecord, SkyloadError> {
        if self.flights.is_empty() {
            return Err(SkyloadError::NoFlights);
        }
        let selection = FlightSelection {
            flight_number: flight_number.to_string(),
            flight_date: flight_date.map(str::to_string),
        };
        self.flights
            .iter()
            .find(|f| selection.matches(f))
            .ok_or_else(|| match flight_date {
                Some(date) => SkyloadError::FlightNotFound(format!("{} on {}", flight_number, date)),
                None => SkyloadError::FlightNotFound(flight_number.to_string()),
            })
    }

    pub fn select(&mut self, flight_number: &str, flight_date: Option<&str>) -> Result<&FlightRecord, SkyloadError> {
        let found = self.find(flight_number, flight_date)?;
        let selection = FlightSelection {
            flight_number: found.flight_number.clone(),
            flight_date: flight_date.map(|_| found.flight_date.clone()),
        };
        self.selected = Some(selection);
        self.selected_flight().ok_or_else(|| SkyloadError::FlightNotFound(flight_number.to_string()))
    }

    pub fn selected_flight(&self) -> Option<&FlightRecord> {
        let selection = self.selected.as_ref()?;
        self.flights.iter().find(|f| selection.matches(f))
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::at(crate::get_config_root().join(SESSION_FILE))
    }
}

impl SessionStore {
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::default());
        }
        let content = fs::read_to_string(&self.path).context("Failed to read session.json")?;
        serde_json::from_str(&content).context("Failed to parse session.json")
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }
        let content = serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        fs::write(&self.path, content).context("Failed to write session.json")?;
        log::debug!(
            "Session saved — flights={} selected={:?} path={:?}",
            session.flights.len(),
            session.selected.as_ref().map(|s| s.flight_number.as_str()),
            self.path
        );
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context("Failed to remove session.json")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn flight(number: &str, date: &str) -> FlightRecord {
        FlightRecord {
            flight_number: number.to_string(),
            flight_date: date.to_string(),
            origin: "JFK".to_string(),
            destination: "LAX".to_string(),
            tail_number: "N1".to_string(),
            aircraft_type: "Boeing 737-800".to_string(),
            gross_weight_cargo_kg: 1500.0,
            gross_volume_cargo_m3: 20.0,
            passenger_count: 150,
            baggage_weight_kg: 2000.0,
            fuel_weight_kg: 10000.0,
            fuel_price_per_kg: 0.8,
            cargo_price_per_kg: 2.5,
        }
    }

    fn session() -> Session {
        Session {
            flights: vec![
                flight("SK100", "2024-03-01"),
                flight("SK100", "2024-03-02"),
                flight("SK200", "2024-03-01"),
            ],
            selected: None,
        }
    }

    #[test]
    fn test_find_by_number_and_date() {
        let session = session();
        assert_eq!(session.find("SK100", None).unwrap().flight_date, "2024-03-01");
        assert_eq!(
            session.find("sk100", Some("2024-03-02")).unwrap().flight_date,
            "2024-03-02"
        );
        assert!(matches!(
            session.find("SK100", Some("2024-03-09")),
            Err(SkyloadError::FlightNotFound(_))
        ));
        assert!(matches!(
            Session::default().find("SK100", None),
            Err(SkyloadError::NoFlights)
        ));
    }

    #[test]
    fn test_select_and_replace() {
        let mut session = session();
        session.select("SK100", Some("2024-03-02")).unwrap();
        assert_eq!(session.selected_flight().unwrap().flight_date, "2024-03-02");

        session.replace_flights(vec![flight("SK100", "2024-03-02")]);
        assert!(session.selected.is_some());

        session.replace_flights(vec![flight("SK300", "2024-03-02")]);
        assert!(session.selected.is_none());
        assert!(session.selected_flight().is_none());
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("state").join(SESSION_FILE));
        assert_eq!(store.load().unwrap(), Session::default());

        let mut session = session();
        session.select("SK200", None).unwrap();
        store.save(&session).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.selected_flight().unwrap().flight_number, "SK200");

        store.clear().unwrap();
        assert!(!store.path().exists());
    }
}
