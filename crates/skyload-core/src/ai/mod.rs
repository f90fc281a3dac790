// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Model-assisted placement and load analysis.
//!
//! [`LoadAdvisor`] is the only entry point. It never fails outward: a missing
//! client, a transport error, an unparsable reply or a useless one all end in
//! the deterministic grid placement or the static analysis below.

pub mod prompt;
pub mod reply;

use crate::aircraft::{AircraftType, CargoHold, Vec3};
use crate::cargo::Container;
use crate::config::Settings;
use crate::flight::FlightRecord;
use crate::placement::{
    generate_fallback_placement, Efficiency, PlacedContainer, PlacementRequest, PlacementResult,
    SectionWeights,
};
use log::{info, warn};
use rand::Rng;
use reply::{AiAnalysisReply, AiPlacementReply};
use serde::{Deserialize, Serialize};
use skyload_advisor::{parse_reply, AdvisorError, AnthropicClient, LlmClient};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisRequest {
    pub flight_number: String,
    pub aircraft_type: String,
    pub cargo_weight: f64,
    pub cargo_volume: f64,
    pub passenger_count: u32,
    pub baggage_weight: f64,
    pub origin: String,
    pub destination: String,
}

impl From<&FlightRecord> for AnalysisRequest {
    fn from(flight: &FlightRecord) -> Self {
        Self {
            flight_number: flight.flight_number.clone(),
            aircraft_type: flight.aircraft_type.clone(),
            cargo_weight: flight.gross_weight_cargo_kg,
            cargo_volume: flight.gross_volume_cargo_m3,
            passenger_count: flight.passenger_count,
            baggage_weight: flight.baggage_weight_kg,
            origin: flight.origin.clone(),
            destination: flight.destination.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPlacement {
    pub flight_number: String,
    pub aircraft_type: String,
    pub containers: Vec<PlacedContainer>,
    pub total_weight: f64,
    pub total_volume: f64,
    pub weight_utilization: f64,
    pub volume_utilization: f64,
    pub balance_score: u32,
    pub suggestions: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub placement: AnalysisPlacement,
    pub analysis: String,
    pub recommendations: Vec<String>,
    pub efficiency: Efficiency,
}

/// Fully populated analysis before containers are attached.
struct AnalysisDraft {
    containers: Vec<PlacedContainer>,
    balance_score: u32,
    suggestions: Vec<String>,
    warnings: Vec<String>,
    analysis: String,
    recommendations: Vec<String>,
    efficiency: Efficiency,
}

fn weight_utilization(cargo_weight: f64, hold: &CargoHold) -> f64 {
    if hold.max_weight > 0.0 {
        cargo_weight / hold.max_weight * 100.0
    } else {
        0.0
    }
}

fn static_analysis(request: &AnalysisRequest, hold: &CargoHold) -> AnalysisDraft {
    let current = weight_utilization(request.cargo_weight, hold);
    let mut warnings = Vec::new();
    if request.cargo_weight > hold.max_weight {
        warnings.push("Cargo weight exceeds capacity".to_string());
    }

    AnalysisDraft {
        containers: Vec::new(),
        balance_score: 75,
        suggestions: vec![
            "Distribute cargo evenly across sections".to_string(),
            "Place heavy items near center of gravity".to_string(),
        ],
        warnings,
        analysis: "Fallback analysis - cargo distributed based on weight optimization".to_string(),
        recommendations: vec!["Consider using LD3 containers for optimal space usage".to_string()],
        efficiency: Efficiency {
            current,
            optimized: (current + 15.0).min(95.0),
            improvement: 15.0,
        },
    }
}

fn draft_from_reply(reply: &AiAnalysisReply, request: &AnalysisRequest, hold: &CargoHold) -> AnalysisDraft {
    let current = weight_utilization(request.cargo_weight, hold);
    AnalysisDraft {
        containers: reply
            .containers
            .iter()
            .enumerate()
            .map(|(i, raw)| reply::normalize_container(raw, i, hold))
            .collect(),
        balance_score: reply::balance_score_or_default(reply.balance_score),
        suggestions: reply.suggestions.clone().unwrap_or_default(),
        warnings: reply.warnings.clone().unwrap_or_default(),
        analysis: reply
            .analysis
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Analysis completed".to_string()),
        recommendations: reply.recommendations.clone().unwrap_or_default(),
        efficiency: reply.efficiency.unwrap_or_default().complete(current),
    }
}

/// Splits the flight's cargo into evenly weighted LD3s laid out section by
/// section, two abreast. Weights carry a jitter in [-100, 100) kg and never go
/// below zero.
pub fn generate_fallback_containers<R: Rng + ?Sized>(
    cargo_weight: f64,
    hold: &CargoHold,
    rng: &mut R,
) -> Vec<PlacedContainer> {
    let sections = hold.sections;
    if sections.is_empty() {
        return Vec::new();
    }

    let count: usize = if sections.len() >= 3 { 10 } else { 6 };
    let per_section = count.div_ceil(sections.len());
    let base_weight = (cargo_weight / count as f64).floor();

    let mut containers = Vec::with_capacity(count);
    for section in sections {
        for i in 0..per_section {
            if containers.len() >= count {
                break;
            }
            let index = containers.len();
            let jitter = f64::from(rng.gen_range(-100i32..100));
            let x_offset = if i % 2 == 0 { -0.5 } else { 0.5 };
            let z_offset = (i / 2) as f64 * 0.8;

            containers.push(PlacedContainer {
                container: Container {
                    id: reply::generated_id(index),
                    name: format!("LD3 Container #{}", index + 1),
                    weight: (base_weight + jitter).max(0.0),
                    volume: 4.2,
                    width: 1.2,
                    height: 0.85,
                    depth: 1.2,
                    color: None,
                },
                section: section.id.to_string(),
                placed: true,
                position: Vec3 {
                    x: section.position.x + x_offset,
                    y: section.position.y + 0.1,
                    z: section.position.z + z_offset - section.dimensions.depth / 4.0,
                },
            });
        }
    }
    containers
}

/// Front door for placement and analysis requests.
#[derive(Clone, Default)]
pub struct LoadAdvisor {
    client: Option<Arc<dyn LlmClient>>,
    ai_placement: bool,
}

impl LoadAdvisor {
    /// No model at all; every call takes the deterministic path.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn with_client(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client: Some(client),
            ai_placement: false,
        }
    }

    /// Model placement is off unless switched on here.
    pub fn enable_ai_placement(mut self, enabled: bool) -> Self {
        self.ai_placement = enabled;
        self
    }

    /// Builds an Anthropic-backed advisor when an API key is configured.
    pub fn from_settings(settings: &Settings) -> Self {
        let advisor = match settings.anthropic_config() {
            Some(config) => match AnthropicClient::new(config) {
                Ok(client) => {
                    info!("Model client configured — model={}", client.model());
                    Self::with_client(Arc::new(client))
                }
                Err(e) => {
                    warn!("Model client unavailable, running offline — error={}", e);
                    Self::offline()
                }
            },
            None => {
                info!("No API key configured — running offline");
                Self::offline()
            }
        };
        advisor.enable_ai_placement(settings.ai_placement_enabled)
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    pub fn ai_placement_enabled(&self) -> bool {
        self.ai_placement && self.client.is_some()
    }

    pub fn place(&self, request: &PlacementRequest) -> PlacementResult {
        let client = match (&self.client, self.ai_placement) {
            (Some(client), true) => client,
            _ => return generate_fallback_placement(request),
        };

        match self.place_with_model(client.as_ref(), request) {
            Ok(Some(result)) => result,
            Ok(None) => {
                info!(
                    "Model placed nothing although cargo fits, using grid — flight={}",
                    request.flight_number
                );
                generate_fallback_placement(request)
            }
            Err(e) => {
                warn!(
                    "Model placement failed, using grid — flight={} error={}",
                    request.flight_number, e
                );
                generate_fallback_placement(request)
            }
        }
    }

    fn place_with_model(
        &self,
        client: &dyn LlmClient,
        request: &PlacementRequest,
    ) -> Result<Option<PlacementResult>, AdvisorError> {
        let resolved = AircraftType::resolve(&request.aircraft_type);
        let hold = resolved.aircraft.hold();

        let prompt = prompt::placement_prompt(request, hold)?;
        let text = client.complete(&prompt)?;
        let reply: AiPlacementReply = parse_reply(&text)?;

        let containers = reply::merge_placements(request, &reply, hold.max_weight);
        let placed = containers.iter().filter(|c| c.placed).count();
        info!(
            "Model placement merged — flight={} placed={} total={}",
            request.flight_number,
            placed,
            containers.len()
        );
        if placed == 0 && request.total_weight() <= hold.max_weight {
            return Ok(None);
        }

        let weights = SectionWeights::of(&containers);
        Ok(Some(PlacementResult {
            balance_score: reply::balance_score_or_default(reply.balance_score),
            forward_weight: reply.forward_weight.filter(|w| w.is_finite()).unwrap_or(0.0),
            aft_weight: reply.aft_weight.filter(|w| w.is_finite()).unwrap_or(0.0),
            aircraft_type: resolved.aircraft.name().to_string(),
            max_capacity: hold.max_weight,
            suggestions: reply.suggestions.unwrap_or_default(),
            warnings: {
                let mut warnings = reply.warnings.unwrap_or_default();
                if weights.total > hold.max_weight {
                    warnings.push(format!(
                        "Model placed {}kg, above {}kg capacity",
                        weights.total, hold.max_weight
                    ));
                }
                warnings
            },
            containers,
        }))
    }

    pub fn analyze<R: Rng + ?Sized>(&self, request: &AnalysisRequest, rng: &mut R) -> AnalysisResponse {
        let resolved = AircraftType::resolve(&request.aircraft_type);
        let hold = resolved.aircraft.hold();

        let draft = match &self.client {
            Some(client) => match Self::analyze_with_model(client.as_ref(), request, hold) {
                Ok(reply) => draft_from_reply(&reply, request, hold),
                Err(e) => {
                    warn!(
                        "Model analysis failed, using static analysis — flight={} error={}",
                        request.flight_number, e
                    );
                    static_analysis(request, hold)
                }
            },
            None => {
                info!(
                    "No model client, using static analysis — flight={}",
                    request.flight_number
                );
                static_analysis(request, hold)
            }
        };

        let mut containers = draft.containers;
        if containers.len() < 2 {
            info!(
                "Generating fallback containers — flight={} from_model={}",
                request.flight_number,
                containers.len()
            );
            containers = generate_fallback_containers(request.cargo_weight, hold, rng);
        }

        let hold_volume = hold.volume();
        AnalysisResponse {
            placement: AnalysisPlacement {
                flight_number: request.flight_number.clone(),
                aircraft_type: resolved.aircraft.name().to_string(),
                containers,
                total_weight: request.cargo_weight,
                total_volume: request.cargo_volume,
                weight_utilization: weight_utilization(request.cargo_weight, hold),
                volume_utilization: if hold_volume > 0.0 {
                    request.cargo_volume / hold_volume * 100.0
                } else {
                    0.0
                },
                balance_score: draft.balance_score,
                suggestions: draft.suggestions,
                warnings: draft.warnings,
            },
            analysis: draft.analysis,
            recommendations: draft.recommendations,
            efficiency: draft.efficiency,
        }
    }

    fn analyze_with_model(
        client: &dyn LlmClient,
        request: &AnalysisRequest,
        hold: &CargoHold,
    ) -> Result<AiAnalysisReply, AdvisorError> {
        let prompt = prompt::analysis_prompt(request, hold)?;
        let text = client.complete(&prompt)?;
        parse_reply(&text)
    }
}
