// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Deterministic grid placement of containers into a cargo hold.
//!
//! Containers are taken in the order given. Each one either fits under the
//! hold's total weight limit and goes to the next section round-robin, or it
//! is marked as overflow. There is no reordering, no backtracking and no
//! per-section limit; the output is a scatter of slot positions a renderer
//! can draw directly.

use crate::aircraft::{AircraftType, CargoHold, HoldSection, Vec3, SCALE_FACTOR};
use crate::cargo::Container;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Section id given to containers that did not fit.
pub const OVERFLOW_SECTION: &str = "overflow";

const GRID_COLUMNS: usize = 2;
const SLOT_WIDTH: f64 = 0.35;
const SLOT_DEPTH: f64 = 0.4;
const SLOT_GAP: f64 = 0.08;
const FLOOR_CLEARANCE: f64 = 0.15;
const MIN_BALANCE_SCORE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRequest {
    #[serde(default)]
    pub flight_number: String,
    #[serde(default)]
    pub aircraft_type: String,
    #[serde(default)]
    pub containers: Vec<Container>,
}

impl PlacementRequest {
    pub fn total_weight(&self) -> f64 {
        self.containers.iter().map(|c| c.weight).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedContainer {
    #[serde(flatten)]
    pub container: Container,
    pub section: String,
    pub placed: bool,
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementResult {
    pub containers: Vec<PlacedContainer>,
    pub balance_score: u32,
    pub forward_weight: f64,
    pub aft_weight: f64,
    /// The aircraft actually used, after resolving the requested name.
    pub aircraft_type: String,
    pub max_capacity: f64,
    pub suggestions: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Efficiency {
    pub current: f64,
    pub optimized: f64,
    pub improvement: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverflowSummary {
    pub placed_count: usize,
    pub unplaced_count: usize,
    pub placed_weight: f64,
    pub unplaced_weight: f64,
    pub unplaced_volume: f64,
}

impl PlacementResult {
    pub fn placed(&self) -> impl Iterator<Item = &PlacedContainer> {
        self.containers.iter().filter(|c| c.placed)
    }

    pub fn placed_weight(&self) -> f64 {
        self.placed().map(|c| c.container.weight).sum()
    }

    pub fn overflow_summary(&self) -> OverflowSummary {
        self.containers
            .iter()
            .fold(OverflowSummary::default(), |mut acc, c| {
                if c.placed {
                    acc.placed_count += 1;
                    acc.placed_weight += c.container.weight;
                } else {
                    acc.unplaced_count += 1;
                    acc.unplaced_weight += c.container.weight;
                    acc.unplaced_volume += c.container.volume;
                }
                acc
            })
    }

    /// Placed weight against the hold limit, with the fixed optimisation target.
    pub fn efficiency(&self, hold: &CargoHold) -> Efficiency {
        let capacity = if hold.max_weight > 0.0 { hold.max_weight } else { 1.0 };
        Efficiency {
            current: self.placed_weight() / capacity * 100.0,
            optimized: 90.0,
            improvement: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SectionWeights {
    pub forward: f64,
    pub aft: f64,
    /// Everything placed outside `fwd` and `aft`.
    pub mid: f64,
    pub total: f64,
}

impl SectionWeights {
    pub fn of(containers: &[PlacedContainer]) -> Self {
        let mut w = SectionWeights::default();
        for c in containers.iter().filter(|c| c.placed) {
            w.total += c.container.weight;
            match c.section.as_str() {
                "fwd" => w.forward += c.container.weight,
                "aft" => w.aft += c.container.weight,
                _ => {}
            }
        }
        w.mid = w.total - w.forward - w.aft;
        w
    }

    /// 100 for perfect fore/aft symmetry, floored at 50. Mid-section weight
    /// counts half toward the forward side.
    pub fn balance_score(&self) -> u32 {
        let ratio = if self.total > 0.0 {
            (self.forward + self.mid * 0.5) / self.total
        } else {
            0.5
        };
        let score = (100.0 - (0.5 - ratio).abs() * 100.0).round();
        (score.max(0.0) as u32).max(MIN_BALANCE_SCORE)
    }
}

/// Slot for the `count`-th container placed in `section`, in render units.
fn slot_position(section: &HoldSection, count: usize) -> Vec3 {
    let col = (count % GRID_COLUMNS) as f64;
    let row = (count / GRID_COLUMNS) as f64;
    Vec3 {
        x: (col - 0.5) * (SLOT_WIDTH + SLOT_GAP),
        y: section.position.y * SCALE_FACTOR + FLOOR_CLEARANCE,
        z: section.position.z * SCALE_FACTOR + row * (SLOT_DEPTH + SLOT_GAP),
    }
}

/// Runs the grid heuristic against a specific hold.
pub fn place_in_hold(hold: &CargoHold, containers: &[Container]) -> PlacementResult {
    let sections = hold.sections;
    let max_capacity = hold.max_weight;
    let requested: f64 = containers.iter().map(|c| c.weight).sum();

    let mut running_weight = 0.0;
    let mut per_section: HashMap<&str, usize> = sections.iter().map(|s| (s.id, 0)).collect();

    let placed: Vec<PlacedContainer> = containers
        .iter()
        .enumerate()
        .map(|(index, container)| {
            if sections.is_empty() || running_weight + container.weight > max_capacity {
                return PlacedContainer {
                    container: container.clone(),
                    section: OVERFLOW_SECTION.to_string(),
                    placed: false,
                    position: Vec3::ORIGIN,
                };
            }

            let section = &sections[index % sections.len()];
            let count = per_section.entry(section.id).or_insert(0);
            let position = slot_position(section, *count);
            *count += 1;
            running_weight += container.weight;

            PlacedContainer {
                container: container.clone(),
                section: section.id.to_string(),
                placed: true,
                position,
            }
        })
        .collect();

    let weights = SectionWeights::of(&placed);
    let placed_count = placed.iter().filter(|c| c.placed).count();
    let overflow_count = placed.len() - placed_count;
    let aircraft = hold.aircraft.name();

    let mut warnings = Vec::new();
    if overflow_count > 0 {
        warnings.push(format!(
            "{} container(s) exceed {}kg capacity",
            overflow_count, max_capacity
        ));
    }

    info!(
        "Grid placement — aircraft={} placed={} overflow={} placed_kg={} capacity_kg={}",
        aircraft, placed_count, overflow_count, weights.total, max_capacity
    );

    PlacementResult {
        balance_score: weights.balance_score(),
        forward_weight: weights.forward,
        aft_weight: weights.aft,
        aircraft_type: aircraft.to_string(),
        max_capacity,
        suggestions: vec![
            format!("{} containers placed in {}", placed_count, aircraft),
            format!("Capacity: {}kg / {}kg", requested, max_capacity),
            "Weight distributed across cargo sections".to_string(),
        ],
        warnings,
        containers: placed,
    }
}

/// Resolves the requested aircraft (unknown names fall back to the default
/// type) and runs the grid heuristic. Never fails; overflow is reported per
/// container.
pub fn generate_fallback_placement(request: &PlacementRequest) -> PlacementResult {
    let resolved = AircraftType::resolve(&request.aircraft_type);
    let hold = resolved.aircraft.hold();
    debug!(
        "Fallback placement — flight={} requested={:?} matched={} recognized={} containers={} requested_kg={}",
        request.flight_number,
        request.aircraft_type,
        resolved.aircraft,
        resolved.recognized,
        request.containers.len(),
        request.total_weight()
    );
    place_in_hold(hold, &request.containers)
}
