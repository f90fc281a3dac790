//! Typed shapes of what the model sends back, and the rules for turning a
//! partial reply into complete domain values.
//!
//! Every field is optional. Zero, negative and empty values count as missing,
//! since the model uses them as placeholders.

use crate::aircraft::{CargoHold, Vec3};
use crate::cargo::Container;
use crate::placement::{Efficiency, PlacedContainer, PlacementRequest};
use serde::Deserialize;

pub const DEFAULT_BALANCE_SCORE: u32 = 70;
const DEFAULT_SECTION: &str = "fwd";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiPlacement {
    pub container_id: Option<String>,
    pub section: Option<String>,
    pub placed: Option<bool>,
    pub position: Option<Vec3>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiPlacementReply {
    pub placements: Vec<AiPlacement>,
    pub balance_score: Option<f64>,
    pub forward_weight: Option<f64>,
    pub aft_weight: Option<f64>,
    pub suggestions: Option<Vec<String>>,
    pub warnings: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiContainer {
    pub id: Option<String>,
    pub name: Option<String>,
    pub weight: Option<f64>,
    pub volume: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub depth: Option<f64>,
    pub section: Option<String>,
    pub placed: Option<bool>,
    pub position: Option<Vec3>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AiEfficiency {
    pub current: Option<f64>,
    pub optimized: Option<f64>,
    pub improvement: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiAnalysisReply {
    pub containers: Vec<AiContainer>,
    pub balance_score: Option<f64>,
    pub suggestions: Option<Vec<String>>,
    pub warnings: Option<Vec<String>>,
    pub analysis: Option<String>,
    pub recommendations: Option<Vec<String>>,
    pub efficiency: Option<AiEfficiency>,
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

pub fn balance_score_or_default(score: Option<f64>) -> u32 {
    positive(score)
        .map(|s| s.min(100.0).round() as u32)
        .unwrap_or(DEFAULT_BALANCE_SCORE)
}

/// `CNT-001` style id for the `index`-th container (zero based).
pub fn generated_id(index: usize) -> String {
    format!("CNT-{:03}", index + 1)
}

/// Pairs each requested container with a placement, first by id and then by
/// position in the list. Containers the model skipped go to `fwd` on a simple
/// zig-zag and count as placed only when the whole request fits.
pub fn merge_placements(
    request: &PlacementRequest,
    reply: &AiPlacementReply,
    capacity: f64,
) -> Vec<PlacedContainer> {
    let fits = request.total_weight() <= capacity;

    request
        .containers
        .iter()
        .enumerate()
        .map(|(index, container)| {
            let matched = reply
                .placements
                .iter()
                .find(|p| p.container_id.as_deref() == Some(container.id.as_str()))
                .or_else(|| reply.placements.get(index));

            match matched {
                Some(p) => PlacedContainer {
                    container: container.clone(),
                    section: non_empty(p.section.as_ref())
                        .unwrap_or(DEFAULT_SECTION)
                        .to_string(),
                    placed: p.placed != Some(false),
                    position: p.position.unwrap_or(Vec3::new(0.0, 0.2, 0.0)),
                },
                None => PlacedContainer {
                    container: container.clone(),
                    section: DEFAULT_SECTION.to_string(),
                    placed: fits,
                    position: Vec3::new(
                        if index % 2 == 0 { -0.3 } else { 0.3 },
                        0.2,
                        -1.5 + index as f64 * 0.5,
                    ),
                },
            }
        })
        .collect()
}

/// Fills every gap in a model-proposed container. Missing positions sit on the
/// hold floor at the z of a section chosen round-robin.
pub fn normalize_container(raw: &AiContainer, index: usize, hold: &CargoHold) -> PlacedContainer {
    let fallback_z = if hold.sections.is_empty() {
        0.0
    } else {
        hold.sections[index % hold.sections.len()].position.z
    };

    PlacedContainer {
        container: Container {
            id: non_empty(raw.id.as_ref())
                .map(str::to_string)
                .unwrap_or_else(|| generated_id(index)),
            name: non_empty(raw.name.as_ref())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Container #{}", index + 1)),
            weight: positive(raw.weight).unwrap_or(500.0),
            volume: positive(raw.volume).unwrap_or(3.0),
            width: positive(raw.width).unwrap_or(1.2),
            height: positive(raw.height).unwrap_or(0.85),
            depth: positive(raw.depth).unwrap_or(1.2),
            color: None,
        },
        section: non_empty(raw.section.as_ref())
            .unwrap_or(DEFAULT_SECTION)
            .to_string(),
        placed: raw.placed != Some(false),
        position: raw.position.unwrap_or(Vec3::new(0.0, -0.3, fallback_z)),
    }
}

impl AiEfficiency {
    /// Missing figures take the defaults used when the model omits the block.
    pub fn complete(&self, current: f64) -> Efficiency {
        Efficiency {
            current: self.current.filter(|v| v.is_finite()).unwrap_or(current),
            optimized: self.optimized.filter(|v| v.is_finite()).unwrap_or(85.0),
            improvement: self.improvement.filter(|v| v.is_finite()).unwrap_or(10.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::AircraftType;
    use crate::cargo::LD3;
    use skyload_advisor::parse_reply;

    fn request(weights: &[f64]) -> PlacementRequest {
        PlacementRequest {
            flight_number: "SK1".to_string(),
            aircraft_type: "Boeing 737-800".to_string(),
            containers: weights
                .iter()
                .enumerate()
                .map(|(i, w)| LD3.instantiate(format!("c{}", i), format!("C{}", i), *w))
                .collect(),
        }
    }

    #[test]
    fn test_parse_partial_placement_reply() {
        let text = r#"Sure! {"placements":[{"containerId":"c1","section":"aft"}],"balanceScore":88}"#;
        let reply: AiPlacementReply = parse_reply(text).unwrap();
        assert_eq!(reply.placements.len(), 1);
        assert_eq!(reply.balance_score, Some(88.0));
        assert_eq!(reply.forward_weight, None);
        assert_eq!(reply.placements[0].placed, None);
    }

    #[test]
    fn test_merge_by_id_then_index() {
        let reply = AiPlacementReply {
            placements: vec![
                AiPlacement {
                    container_id: Some("c1".to_string()),
                    section: Some("aft".to_string()),
                    placed: Some(true),
                    position: Some(Vec3::new(0.1, 0.2, 0.3)),
                },
                AiPlacement {
                    container_id: Some("unknown".to_string()),
                    section: None,
                    placed: Some(false),
                    position: None,
                },
            ],
            ..Default::default()
        };
        let merged = merge_placements(&request(&[100.0, 200.0, 300.0]), &reply, 2000.0);

        // c0 has no id match, takes placements[0] by index.
        assert_eq!(merged[0].section, "aft");
        assert_eq!(merged[0].position, Vec3::new(0.1, 0.2, 0.3));
        // c1 matches by id.
        assert_eq!(merged[1].section, "aft");
        assert!(merged[1].placed);
        // c2: nothing by id or index.
        assert_eq!(merged[2].section, "fwd");
        assert!(merged[2].placed);
        assert_eq!(merged[2].position, Vec3::new(-0.3, 0.2, -0.5));
    }

    #[test]
    fn test_merge_defaults_when_over_capacity() {
        let reply = AiPlacementReply::default();
        let merged = merge_placements(&request(&[1500.0, 1500.0]), &reply, 2000.0);
        assert!(merged.iter().all(|c| !c.placed));
        assert_eq!(merged[1].position, Vec3::new(0.3, 0.2, -1.0));
    }

    #[test]
    fn test_merge_index_match_defaults_section_and_position() {
        let reply = AiPlacementReply {
            placements: vec![AiPlacement {
                section: Some("  ".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let merged = merge_placements(&request(&[100.0]), &reply, 2000.0);
        assert_eq!(merged[0].section, "fwd");
        assert!(merged[0].placed);
        assert_eq!(merged[0].position, Vec3::new(0.0, 0.2, 0.0));
    }

    #[test]
    fn test_normalize_container_fills_gaps() {
        let hold = AircraftType::AirbusA330_200.hold();
        let raw = AiContainer {
            weight: Some(0.0),
            placed: None,
            ..Default::default()
        };
        let c = normalize_container(&raw, 4, hold);
        assert_eq!(c.container.id, "CNT-005");
        assert_eq!(c.container.name, "Container #5");
        assert_eq!(c.container.weight, 500.0);
        assert_eq!(c.container.volume, 3.0);
        assert_eq!(c.container.height, 0.85);
        assert_eq!(c.section, "fwd");
        assert!(c.placed);
        // 4 % 3 = 1 -> mid section z
        assert_eq!(c.position, Vec3::new(0.0, -0.3, 0.0));
    }

    #[test]
    fn test_normalize_container_keeps_model_values() {
        let hold = AircraftType::Boeing737_800.hold();
        let raw = AiContainer {
            id: Some("X-1".to_string()),
            name: Some("Pallet".to_string()),
            weight: Some(1234.0),
            section: Some("aft".to_string()),
            placed: Some(false),
            position: Some(Vec3::new(0.5, -0.3, 1.5)),
            ..Default::default()
        };
        let c = normalize_container(&raw, 0, hold);
        assert_eq!(c.container.id, "X-1");
        assert_eq!(c.container.weight, 1234.0);
        assert_eq!(c.section, "aft");
        assert!(!c.placed);
        assert_eq!(c.position.z, 1.5);
    }

    #[test]
    fn test_balance_score_defaults() {
        assert_eq!(balance_score_or_default(None), 70);
        assert_eq!(balance_score_or_default(Some(0.0)), 70);
        assert_eq!(balance_score_or_default(Some(91.6)), 92);
        assert_eq!(balance_score_or_default(Some(140.0)), 100);
    }

    #[test]
    fn test_efficiency_completion() {
        let partial = AiEfficiency {
            current: None,
            optimized: Some(93.0),
            improvement: None,
        };
        let eff = partial.complete(61.0);
        assert_eq!(eff.current, 61.0);
        assert_eq!(eff.optimized, 93.0);
        assert_eq!(eff.improvement, 10.0);
    }
}
