use crate::aircraft::AircraftType;
use crate::flight::FlightRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const WARNING_THRESHOLD: f64 = 85.0;
pub const DANGER_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Safe,
    Warning,
    Danger,
}

impl LoadStatus {
    /// Both thresholds are inclusive: exactly 85% is a warning, exactly 100% is danger.
    pub fn from_utilization(percentage: f64) -> Self {
        if percentage >= DANGER_THRESHOLD {
            LoadStatus::Danger
        } else if percentage >= WARNING_THRESHOLD {
            LoadStatus::Warning
        } else {
            LoadStatus::Safe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStatus::Safe => "safe",
            LoadStatus::Warning => "warning",
            LoadStatus::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightAnalysis {
    pub flight: FlightRecord,
    /// Spec the ratios were computed against.
    pub resolved_aircraft: AircraftType,
    /// False when `flight.aircraft_type` was unknown and the default spec stood in.
    pub aircraft_recognized: bool,
    pub cargo_weight_utilization: f64,
    pub cargo_volume_utilization: f64,
    pub is_overweight: bool,
    pub is_over_volume: bool,
    pub weight_status: LoadStatus,
    pub volume_status: LoadStatus,
    pub cargo_revenue: f64,
    pub fuel_cost: f64,
    pub profit_margin: f64,
}

pub fn analyze_flight_weight(flight: &FlightRecord) -> WeightAnalysis {
    let resolved = flight.aircraft();
    let spec = resolved.aircraft.spec();

    let cargo_weight_utilization = flight.gross_weight_cargo_kg / spec.max_cargo_weight * 100.0;
    let cargo_volume_utilization = flight.gross_volume_cargo_m3 / spec.max_cargo_volume * 100.0;

    let cargo_revenue = flight.gross_weight_cargo_kg * flight.cargo_price_per_kg;
    let fuel_cost = flight.fuel_weight_kg * flight.fuel_price_per_kg;

    WeightAnalysis {
        flight: flight.clone(),
        resolved_aircraft: resolved.aircraft,
        aircraft_recognized: resolved.recognized,
        cargo_weight_utilization,
        cargo_volume_utilization,
        is_overweight: flight.gross_weight_cargo_kg > spec.max_cargo_weight,
        is_over_volume: flight.gross_volume_cargo_m3 > spec.max_cargo_volume,
        weight_status: LoadStatus::from_utilization(cargo_weight_utilization),
        volume_status: LoadStatus::from_utilization(cargo_volume_utilization),
        cargo_revenue,
        fuel_cost,
        profit_margin: cargo_revenue - fuel_cost,
    }
}

pub fn analyze_all_flights(flights: &[FlightRecord]) -> Vec<WeightAnalysis> {
    flights.iter().map(analyze_flight_weight).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStats {
    pub origin: String,
    pub destination: String,
    pub flight_count: usize,
    pub avg_weight_utilization: f64,
    pub overweight_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AircraftStats {
    pub aircraft_type: String,
    pub flight_count: usize,
    pub avg_weight_utilization: f64,
    pub avg_volume_utilization: f64,
    pub overweight_count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_flights: usize,
    pub overweight_count: usize,
    pub over_volume_count: usize,
    pub avg_weight_utilization: f64,
    pub avg_volume_utilization: f64,
    pub total_cargo_revenue: f64,
    pub total_fuel_cost: f64,
    pub route_breakdown: Vec<RouteStats>,
    pub aircraft_breakdown: Vec<AircraftStats>,
}

/// Groups items by key, keeping groups in the order their key first appeared.
fn group_in_order<'a, K, F>(analyses: &'a [WeightAnalysis], key: F) -> Vec<Vec<&'a WeightAnalysis>>
where
    K: std::hash::Hash + Eq,
    F: Fn(&WeightAnalysis) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Vec<&WeightAnalysis>> = Vec::new();
    for a in analyses {
        let slot = *slots.entry(key(a)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(a);
    }
    groups
}

fn mean<'a, I: Iterator<Item = &'a WeightAnalysis>>(items: I, f: fn(&WeightAnalysis) -> f64) -> f64 {
    let (sum, n) = items.fold((0.0, 0usize), |(s, n), a| (s + f(a), n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

pub fn calculate_dashboard_stats(analyses: &[WeightAnalysis]) -> DashboardStats {
    if analyses.is_empty() {
        return DashboardStats::default();
    }

    let route_breakdown = group_in_order(analyses, |a| {
        (a.flight.origin.clone(), a.flight.destination.clone())
    })
    .into_iter()
    .map(|group| RouteStats {
        origin: group[0].flight.origin.clone(),
        destination: group[0].flight.destination.clone(),
        flight_count: group.len(),
        avg_weight_utilization: mean(group.iter().copied(), |a| a.cargo_weight_utilization),
        overweight_count: group.iter().filter(|a| a.is_overweight).count(),
    })
    .collect();

    let aircraft_breakdown = group_in_order(analyses, |a| a.flight.aircraft_type.clone())
        .into_iter()
        .map(|group| AircraftStats {
            aircraft_type: group[0].flight.aircraft_type.clone(),
            flight_count: group.len(),
            avg_weight_utilization: mean(group.iter().copied(), |a| a.cargo_weight_utilization),
            avg_volume_utilization: mean(group.iter().copied(), |a| a.cargo_volume_utilization),
            overweight_count: group.iter().filter(|a| a.is_overweight).count(),
        })
        .collect();

    DashboardStats {
        total_flights: analyses.len(),
        overweight_count: analyses.iter().filter(|a| a.is_overweight).count(),
        over_volume_count: analyses.iter().filter(|a| a.is_over_volume).count(),
        avg_weight_utilization: mean(analyses.iter(), |a| a.cargo_weight_utilization),
        avg_volume_utilization: mean(analyses.iter(), |a| a.cargo_volume_utilization),
        total_cargo_revenue: analyses.iter().map(|a| a.cargo_revenue).sum(),
        total_fuel_cost: analyses.iter().map(|a| a.fuel_cost).sum(),
        route_breakdown,
        aircraft_breakdown,
    }
}
