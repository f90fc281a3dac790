use crate::aircraft::{AircraftType, ResolvedAircraft};
use crate::SkyloadError;
use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column order of the flight export. Columns are matched by name, so files
/// may reorder them or carry extras.
pub const CSV_HEADERS: [&str; 13] = [
    "flight_number",
    "flight_date",
    "origin",
    "destination",
    "tail_number",
    "aircraft_type",
    "gross_weight_cargo_kg",
    "gross_volume_cargo_m3",
    "passenger_count",
    "baggage_weight_kg",
    "fuel_weight_kg",
    "fuel_price_per_kg",
    "cargo_price_per_kg",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub flight_number: String,
    pub flight_date: String,
    pub origin: String,
    pub destination: String,
    pub tail_number: String,
    /// Raw value from the file; see [`FlightRecord::aircraft`].
    pub aircraft_type: String,
    pub gross_weight_cargo_kg: f64,
    pub gross_volume_cargo_m3: f64,
    pub passenger_count: u32,
    pub baggage_weight_kg: f64,
    pub fuel_weight_kg: f64,
    pub fuel_price_per_kg: f64,
    pub cargo_price_per_kg: f64,
}

impl FlightRecord {
    pub fn aircraft(&self) -> ResolvedAircraft {
        AircraftType::resolve(&self.aircraft_type)
    }

    pub fn route_key(&self) -> String {
        format!("{}-{}", self.origin, self.destination)
    }

    /// Parses `flight_date` as ISO (`2024-03-15`), falling back to US
    /// `03/15/2024` and then `15/03/2024`. Ambiguous slash dates read month first.
    pub fn date(&self) -> Option<NaiveDate> {
        let raw = self.flight_date.trim();
        ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    }
}

/// Lenient float: anything unparsable or non-finite becomes 0.
fn parse_amount(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Lenient count: accepts `"12"` and truncates `"12.7"`; everything else is 0.
fn parse_count(raw: &str) -> u32 {
    let raw = raw.trim();
    raw.parse::<u32>().unwrap_or_else(|_| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.trunc().min(u32::MAX as f64) as u32)
            .unwrap_or(0)
    })
}

pub struct FlightCsvParser;

impl FlightCsvParser {
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<FlightRecord>, SkyloadError> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv {
            return Err(SkyloadError::InvalidUpload(format!(
                "{} is not a .csv file",
                path.display()
            )));
        }
        let file = File::open(path)?;
        Self::parse(file)
    }

    pub fn parse_str(content: &str) -> Result<Vec<FlightRecord>, SkyloadError> {
        Self::parse(content.as_bytes())
    }

    pub fn parse<R: Read>(reader: R) -> Result<Vec<FlightRecord>, SkyloadError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut idx = [0usize; 13];
        let mut missing = Vec::new();
        for (slot, name) in idx.iter_mut().zip(CSV_HEADERS.iter()) {
            match headers.iter().position(|h| h == *name) {
                Some(i) => *slot = i,
                None => missing.push(*name),
            }
        }
        if !missing.is_empty() {
            return Err(SkyloadError::InvalidUpload(format!(
                "missing columns: {}",
                missing.join(", ")
            )));
        }

        let mut flights = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    warn!("Skipping unreadable CSV row — row={} error={}", line + 2, e);
                    continue;
                }
            };
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }

            let text = |i: usize| record.get(idx[i]).unwrap_or("").to_string();
            let amount = |i: usize| parse_amount(record.get(idx[i]).unwrap_or(""));

            flights.push(FlightRecord {
                flight_number: text(0),
                flight_date: text(1),
                origin: text(2),
                destination: text(3),
                tail_number: text(4),
                aircraft_type: text(5),
                gross_weight_cargo_kg: amount(6),
                gross_volume_cargo_m3: amount(7),
                passenger_count: parse_count(record.get(idx[8]).unwrap_or("")),
                baggage_weight_kg: amount(9),
                fuel_weight_kg: amount(10),
                fuel_price_per_kg: amount(11),
                cargo_price_per_kg: amount(12),
            });
        }

        debug!("Parsed flight CSV — flights={}", flights.len());
        Ok(flights)
    }
}
