//! Flight table filtering, sorting and the overweight alert list.

use crate::analysis::{LoadStatus, WeightAnalysis};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

pub const DEFAULT_ALERT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Safe,
    Warning,
    Danger,
}

impl StatusFilter {
    /// A flight matches when either its weight or its volume status does.
    fn matches(&self, a: &WeightAnalysis) -> bool {
        let wanted = match self {
            StatusFilter::All => return true,
            StatusFilter::Safe => LoadStatus::Safe,
            StatusFilter::Warning => LoadStatus::Warning,
            StatusFilter::Danger => LoadStatus::Danger,
        };
        a.weight_status == wanted || a.volume_status == wanted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    FlightNumber,
    #[default]
    FlightDate,
    WeightUtilization,
    VolumeUtilization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightQuery {
    /// Case-insensitive substring over flight number, origin and destination.
    pub search: String,
    pub status: StatusFilter,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Raw aircraft type strings; empty means any.
    pub aircraft_types: Vec<String>,
    /// `ORIGIN-DEST` keys; empty means any.
    pub routes: Vec<String>,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl FlightQuery {
    fn in_date_range(&self, a: &WeightAnalysis) -> bool {
        if self.date_from.is_none() && self.date_to.is_none() {
            return true;
        }
        // Unparsable dates never satisfy an explicit range.
        let Some(date) = a.flight.date() else {
            return false;
        };
        self.date_from.map_or(true, |from| date >= from) && self.date_to.map_or(true, |to| date <= to)
    }

    pub fn matches(&self, a: &WeightAnalysis) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || a.flight.flight_number.to_lowercase().contains(&needle)
            || a.flight.origin.to_lowercase().contains(&needle)
            || a.flight.destination.to_lowercase().contains(&needle);

        let matches_type = self.aircraft_types.is_empty()
            || self
                .aircraft_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(a.flight.aircraft_type.trim()));

        let matches_route = self.routes.is_empty() || {
            let key = a.flight.route_key();
            self.routes.iter().any(|r| r.eq_ignore_ascii_case(&key))
        };

        matches_search
            && self.status.matches(a)
            && self.in_date_range(a)
            && matches_type
            && matches_route
    }

    fn compare(&self, a: &WeightAnalysis, b: &WeightAnalysis) -> Ordering {
        let ord = match self.sort {
            SortField::FlightNumber => a.flight.flight_number.cmp(&b.flight.flight_number),
            SortField::FlightDate => a
                .flight
                .date()
                .cmp(&b.flight.date())
                .then_with(|| a.flight.flight_date.cmp(&b.flight.flight_date)),
            SortField::WeightUtilization => a
                .cargo_weight_utilization
                .total_cmp(&b.cargo_weight_utilization),
            SortField::VolumeUtilization => a
                .cargo_volume_utilization
                .total_cmp(&b.cargo_volume_utilization),
        };
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }

    /// Filters then stably sorts; ties keep file order.
    pub fn apply<'a>(&self, analyses: &'a [WeightAnalysis]) -> Vec<&'a WeightAnalysis> {
        let mut rows: Vec<&WeightAnalysis> = analyses.iter().filter(|a| self.matches(a)).collect();
        rows.sort_by(|a, b| self.compare(a, b));
        rows
    }
}

/// Known routes in first-seen order, for building route filters.
pub fn distinct_routes(analyses: &[WeightAnalysis]) -> Vec<String> {
    let mut seen = HashSet::new();
    analyses
        .iter()
        .map(|a| a.flight.route_key())
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

/// Overweight or over-volume flights, worst weight utilization first.
pub fn alerts(analyses: &[WeightAnalysis], limit: usize) -> Vec<&WeightAnalysis> {
    let mut flagged: Vec<&WeightAnalysis> = analyses
        .iter()
        .filter(|a| a.is_overweight || a.is_over_volume)
        .collect();
    flagged.sort_by(|a, b| b.cargo_weight_utilization.total_cmp(&a.cargo_weight_utilization));
    flagged.truncate(limit);
    flagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_all_flights;
    use crate::flight::FlightRecord;

    fn flight(number: &str, date: &str, route: (&str, &str), aircraft: &str, kg: f64, m3: f64) -> FlightRecord {
        FlightRecord {
            flight_number: number.to_string(),
            flight_date: date.to_string(),
            origin: route.0.to_string(),
            destination: route.1.to_string(),
            tail_number: "N1".to_string(),
            aircraft_type: aircraft.to_string(),
            gross_weight_cargo_kg: kg,
            gross_volume_cargo_m3: m3,
            passenger_count: 150,
            baggage_weight_kg: 2000.0,
            fuel_weight_kg: 10000.0,
            fuel_price_per_kg: 0.8,
            cargo_price_per_kg: 2.5,
        }
    }

    fn fleet() -> Vec<WeightAnalysis> {
        analyze_all_flights(&[
            flight("SK100", "2024-03-01", ("JFK", "LAX"), "Boeing 737-800", 1000.0, 10.0),
            flight("SK200", "2024-03-03", ("LHR", "DXB"), "Airbus A330-300", 17000.0, 60.0),
            flight("SK300", "2024-03-02", ("JFK", "SFO"), "Boeing 737-800", 2100.0, 20.0),
            flight("SK400", "2024-03-04", ("SFO", "JFK"), "Boeing 737-900ER", 1000.0, 60.0),
        ])
    }

    fn numbers(rows: &[&WeightAnalysis]) -> Vec<String> {
        rows.iter().map(|a| a.flight.flight_number.clone()).collect()
    }

    #[test]
    fn test_default_query_sorts_by_date_desc() {
        let analyses = fleet();
        let rows = FlightQuery::default().apply(&analyses);
        assert_eq!(numbers(&rows), vec!["SK400", "SK200", "SK300", "SK100"]);
    }

    #[test]
    fn test_slash_dates_sort_month_first() {
        let analyses = analyze_all_flights(&[
            flight("SK500", "12/01/2024", ("JFK", "LAX"), "Boeing 737-800", 1000.0, 10.0),
            flight("SK600", "02/06/2024", ("JFK", "LAX"), "Boeing 737-800", 1000.0, 10.0),
        ]);
        // December 1st is the later flight.
        let rows = FlightQuery::default().apply(&analyses);
        assert_eq!(numbers(&rows), vec!["SK500", "SK600"]);

        let december = FlightQuery {
            date_from: NaiveDate::from_ymd_opt(2024, 12, 1),
            date_to: NaiveDate::from_ymd_opt(2024, 12, 1),
            ..Default::default()
        };
        assert_eq!(numbers(&december.apply(&analyses)), vec!["SK500"]);
    }

    #[test]
    fn test_search_matches_airports() {
        let analyses = fleet();
        let query = FlightQuery {
            search: "jfk".to_string(),
            sort: SortField::FlightNumber,
            direction: SortDirection::Asc,
            ..Default::default()
        };
        assert_eq!(numbers(&query.apply(&analyses)), vec!["SK100", "SK300", "SK400"]);
    }

    #[test]
    fn test_status_filter_uses_either_dimension() {
        let analyses = fleet();
        let query = FlightQuery {
            status: StatusFilter::Danger,
            sort: SortField::FlightNumber,
            direction: SortDirection::Asc,
            ..Default::default()
        };
        // SK300 is overweight; SK400 is over volume (60 > 52).
        assert_eq!(numbers(&query.apply(&analyses)), vec!["SK300", "SK400"]);
    }

    #[test]
    fn test_date_type_and_route_filters() {
        let analyses = fleet();
        let query = FlightQuery {
            date_from: NaiveDate::from_ymd_opt(2024, 3, 2),
            date_to: NaiveDate::from_ymd_opt(2024, 3, 3),
            ..Default::default()
        };
        assert_eq!(numbers(&query.apply(&analyses)), vec!["SK200", "SK300"]);

        let query = FlightQuery {
            aircraft_types: vec!["boeing 737-800".to_string()],
            routes: vec!["JFK-SFO".to_string()],
            ..Default::default()
        };
        assert_eq!(numbers(&query.apply(&analyses)), vec!["SK300"]);
    }

    #[test]
    fn test_sort_by_weight_utilization() {
        let analyses = fleet();
        let query = FlightQuery {
            sort: SortField::WeightUtilization,
            direction: SortDirection::Desc,
            ..Default::default()
        };
        assert_eq!(
            numbers(&query.apply(&analyses)),
            vec!["SK300", "SK200", "SK100", "SK400"]
        );
    }

    #[test]
    fn test_alerts() {
        let analyses = fleet();
        let flagged = alerts(&analyses, DEFAULT_ALERT_LIMIT);
        assert_eq!(numbers(&flagged), vec!["SK300", "SK400"]);
        assert_eq!(alerts(&analyses, 1).len(), 1);
    }

    #[test]
    fn test_distinct_routes() {
        let analyses = fleet();
        assert_eq!(
            distinct_routes(&analyses),
            vec!["JFK-LAX", "LHR-DXB", "JFK-SFO", "SFO-JFK"]
        );
    }
}
