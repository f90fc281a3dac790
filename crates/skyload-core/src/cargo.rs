use crate::flight::FlightRecord;
use crate::SkyloadError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A unit of cargo to be placed. Weights in kg, dimensions in metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub id: String,
    pub name: String,
    pub weight: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub depth: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Container {
    /// Rejects weights and sizes that would poison capacity arithmetic.
    pub fn validate(&self) -> Result<(), SkyloadError> {
        let fields = [
            ("weight", self.weight),
            ("volume", self.volume),
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(SkyloadError::InvalidContainer {
                    id: self.id.clone(),
                    reason: format!("{} must be a non-negative number", name),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerType {
    pub id: &'static str,
    pub name: &'static str,
    pub max_weight: f64,
    pub volume: f64,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub color: &'static str,
}

impl ContainerType {
    pub fn instantiate(&self, id: String, name: String, weight: f64) -> Container {
        Container {
            id,
            name,
            weight,
            volume: self.volume,
            width: self.width,
            height: self.height,
            depth: self.depth,
            color: Some(self.color.to_string()),
        }
    }
}

pub const LD3: ContainerType = ContainerType {
    id: "LD3",
    name: "LD3 Container",
    max_weight: 1588.0,
    volume: 4.5,
    width: 1.56,
    height: 1.14,
    depth: 1.53,
    color: "#00fff5",
};

pub const LD6: ContainerType = ContainerType {
    id: "LD6",
    name: "LD6 Container",
    max_weight: 3175.0,
    volume: 8.9,
    width: 3.18,
    height: 1.14,
    depth: 1.53,
    color: "#ff00ff",
};

pub const LD11: ContainerType = ContainerType {
    id: "LD11",
    name: "LD11 Container",
    max_weight: 3176.0,
    volume: 7.0,
    width: 3.18,
    height: 1.14,
    depth: 1.53,
    color: "#39ff14",
};

pub const PALLET: ContainerType = ContainerType {
    id: "PALLET",
    name: "Standard Pallet",
    max_weight: 4626.0,
    volume: 10.0,
    width: 3.18,
    height: 1.5,
    depth: 2.44,
    color: "#ffd700",
};

pub const BULK: ContainerType = ContainerType {
    id: "BULK",
    name: "Bulk Cargo",
    max_weight: 1000.0,
    volume: 3.0,
    width: 1.2,
    height: 0.8,
    depth: 1.2,
    color: "#ff8c00",
};

pub const CONTAINER_TYPES: [ContainerType; 5] = [LD3, LD6, LD11, PALLET, BULK];

pub fn container_type(id: &str) -> Option<&'static ContainerType> {
    CONTAINER_TYPES.iter().find(|t| t.id.eq_ignore_ascii_case(id))
}

/// Display color banded by mass.
pub fn color_for_weight(weight: f64) -> &'static str {
    if weight < 500.0 {
        "#39ff14"
    } else if weight < 1500.0 {
        "#ffd700"
    } else if weight < 2500.0 {
        "#ff8c00"
    } else {
        "#ff073a"
    }
}

const MAX_AUTO_CONTAINERS: usize = 12;
const MIN_REMAINING_KG: f64 = 100.0;
const MIN_CONTAINER_KG: f64 = 50.0;

fn type_for_remaining(remaining: f64) -> &'static ContainerType {
    if remaining > 3000.0 {
        &PALLET
    } else if remaining > 1500.0 {
        &LD6
    } else if remaining > 800.0 {
        &LD3
    } else {
        &BULK
    }
}

/// Splits a flight's gross cargo into ULDs, biggest first, each filled to
/// 70-90% of its rating. Leftovers of 100 kg or less stay loose.
pub fn auto_generate_containers<R: Rng + ?Sized>(flight: &FlightRecord, rng: &mut R) -> Vec<Container> {
    let mut remaining = flight.gross_weight_cargo_kg;
    let mut containers = Vec::new();

    while remaining > MIN_REMAINING_KG && containers.len() < MAX_AUTO_CONTAINERS {
        let kind = type_for_remaining(remaining);
        let fill: f64 = rng.gen_range(0.7..0.9);
        let weight = remaining.min((kind.max_weight * fill).floor());
        if weight < MIN_CONTAINER_KG {
            break;
        }

        let index = containers.len();
        containers.push(kind.instantiate(
            format!("auto-{}-{}", kind.id, index),
            format!("{} #{}", kind.name, index + 1),
            weight,
        ));
        remaining -= weight;
    }

    log::debug!(
        "Auto-generated containers — flight={} count={} loose_kg={}",
        flight.flight_number,
        containers.len(),
        remaining
    );
    containers
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn flight(kg: f64) -> FlightRecord {
        FlightRecord {
            flight_number: "SK1".to_string(),
            flight_date: "2024-03-15".to_string(),
            origin: "JFK".to_string(),
            destination: "LAX".to_string(),
            tail_number: "N1".to_string(),
            aircraft_type: "Airbus A330-300".to_string(),
            gross_weight_cargo_kg: kg,
            gross_volume_cargo_m3: 20.0,
            passenger_count: 200,
            baggage_weight_kg: 4000.0,
            fuel_weight_kg: 50000.0,
            fuel_price_per_kg: 0.8,
            cargo_price_per_kg: 2.5,
        }
    }

    #[test]
    fn test_auto_generate_covers_cargo() {
        let mut rng = StdRng::seed_from_u64(7);
        let containers = auto_generate_containers(&flight(12000.0), &mut rng);

        assert!(!containers.is_empty());
        assert!(containers.len() <= 12);
        assert_eq!(containers[0].id, "auto-PALLET-0");
        assert_eq!(containers[0].name, "Standard Pallet #1");

        let total: f64 = containers.iter().map(|c| c.weight).sum();
        assert!(total <= 12000.0);
        assert!(12000.0 - total <= 100.0);
        for c in &containers {
            assert!(c.weight >= 50.0);
            assert_eq!(c.weight, c.weight.floor());
        }
    }

    #[test]
    fn test_auto_generate_small_load_uses_bulk() {
        let mut rng = StdRng::seed_from_u64(1);
        let containers = auto_generate_containers(&flight(600.0), &mut rng);
        assert_eq!(containers[0].id, "auto-BULK-0");
        assert_eq!(containers[0].color.as_deref(), Some("#ff8c00"));
    }

    #[test]
    fn test_auto_generate_nothing_to_load() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(auto_generate_containers(&flight(0.0), &mut rng).is_empty());
        assert!(auto_generate_containers(&flight(90.0), &mut rng).is_empty());
    }

    #[test]
    fn test_auto_generate_caps_count() {
        let mut rng = StdRng::seed_from_u64(3);
        let containers = auto_generate_containers(&flight(500000.0), &mut rng);
        assert_eq!(containers.len(), 12);
    }

    #[test]
    fn test_color_bands() {
        assert_eq!(color_for_weight(499.0), "#39ff14");
        assert_eq!(color_for_weight(500.0), "#ffd700");
        assert_eq!(color_for_weight(2499.0), "#ff8c00");
        assert_eq!(color_for_weight(2500.0), "#ff073a");
    }

    #[test]
    fn test_validate() {
        let mut c = LD3.instantiate("c1".into(), "LD3 #1".into(), 800.0);
        assert!(c.validate().is_ok());
        c.weight = f64::NAN;
        assert!(c.validate().is_err());
        c.weight = -1.0;
        assert!(c.validate().is_err());
        c.weight = 800.0;
        c.depth = f64::INFINITY;
        match c.validate() {
            Err(SkyloadError::InvalidContainer { id, reason }) => {
                assert_eq!(id, "c1");
                assert!(reason.starts_with("depth"));
            }
            other => panic!("expected InvalidContainer, got {:?}", other),
        }
    }

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(container_type("ld6").map(|t| t.max_weight), Some(3175.0));
        assert!(container_type("LD9").is_none());
    }
}
