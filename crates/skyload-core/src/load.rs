use crate::flight::FlightRecord;
use serde::Serialize;

/// Standard mass per passenger, kg.
pub const AVG_PASSENGER_WEIGHT: f64 = 90.0;

/// Whole-flight payload breakdown for one flight and a proposed cargo weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSummary {
    pub passenger_weight: f64,
    pub baggage_weight: f64,
    pub fuel_weight: f64,
    /// Passengers + baggage + fuel.
    pub fixed_load: f64,
    pub max_payload: f64,
    pub available_for_cargo: f64,
    pub cargo_weight: f64,
    pub fuel_cost: f64,
    pub cargo_revenue: f64,
    pub profit_loss: f64,
    pub is_profitable: bool,
    /// Cargo mass whose revenue covers the fuel bill. None when cargo is free.
    pub break_even_cargo: Option<f64>,
    pub above_break_even: bool,
    /// Percent of the room left for cargo. None when any cargo is aboard but
    /// passengers and baggage already use the whole payload.
    pub cargo_utilization: Option<f64>,
    pub is_overweight: bool,
}

/// Summarises the flight with `cargo_weight` kg of cargo aboard (usually the
/// placed weight from a placement run, or the flight's own gross cargo).
pub fn summarize_load(flight: &FlightRecord, cargo_weight: f64) -> LoadSummary {
    let spec = flight.aircraft().aircraft.spec();

    let passenger_weight = f64::from(flight.passenger_count) * AVG_PASSENGER_WEIGHT;
    let baggage_weight = flight.baggage_weight_kg;
    let fuel_weight = flight.fuel_weight_kg;
    let max_payload = spec.max_total_payload;
    let available_for_cargo = (max_payload - passenger_weight - baggage_weight).max(0.0);

    let fuel_cost = fuel_weight * flight.fuel_price_per_kg;
    let cargo_revenue = cargo_weight * flight.cargo_price_per_kg;
    let profit_loss = cargo_revenue - fuel_cost;

    let break_even_cargo =
        (flight.cargo_price_per_kg > 0.0).then(|| fuel_cost / flight.cargo_price_per_kg);
    let above_break_even = match break_even_cargo {
        Some(threshold) => cargo_weight >= threshold,
        None => fuel_cost <= 0.0,
    };

    let cargo_utilization = if available_for_cargo > 0.0 {
        Some(cargo_weight / available_for_cargo * 100.0)
    } else if cargo_weight > 0.0 {
        None
    } else {
        Some(0.0)
    };

    LoadSummary {
        passenger_weight,
        baggage_weight,
        fuel_weight,
        fixed_load: passenger_weight + baggage_weight + fuel_weight,
        max_payload,
        available_for_cargo,
        cargo_weight,
        fuel_cost,
        cargo_revenue,
        profit_loss,
        is_profitable: profit_loss >= 0.0,
        break_even_cargo,
        above_break_even,
        cargo_utilization,
        is_overweight: cargo_weight > available_for_cargo,
    }
}
