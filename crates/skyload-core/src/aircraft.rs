// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Static aircraft tables: cargo capacity per type and the belly-hold layout
//! used for placement.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Render units per metre for hold coordinates.
pub const SCALE_FACTOR: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AircraftType {
    #[serde(rename = "Boeing 737-800")]
    Boeing737_800,
    #[serde(rename = "Boeing 737-900ER")]
    Boeing737_900ER,
    #[serde(rename = "Airbus A330-200")]
    AirbusA330_200,
    #[serde(rename = "Airbus A330-300")]
    AirbusA330_300,
}

impl AircraftType {
    pub const ALL: [AircraftType; 4] = [
        AircraftType::Boeing737_800,
        AircraftType::Boeing737_900ER,
        AircraftType::AirbusA330_200,
        AircraftType::AirbusA330_300,
    ];

    pub const DEFAULT: AircraftType = AircraftType::Boeing737_800;

    pub fn name(&self) -> &'static str {
        match self {
            AircraftType::Boeing737_800 => "Boeing 737-800",
            AircraftType::Boeing737_900ER => "Boeing 737-900ER",
            AircraftType::AirbusA330_200 => "Airbus A330-200",
            AircraftType::AirbusA330_300 => "Airbus A330-300",
        }
    }

    /// Exact match on the trimmed name, then case-insensitive.
    pub fn lookup(name: &str) -> Option<AircraftType> {
        let wanted = name.trim();
        Self::ALL
            .iter()
            .find(|t| t.name() == wanted)
            .or_else(|| Self::ALL.iter().find(|t| t.name().eq_ignore_ascii_case(wanted)))
            .copied()
    }

    /// Like [`lookup`](Self::lookup) but never fails: unknown names become
    /// [`DEFAULT`](Self::DEFAULT).
    pub fn resolve(name: &str) -> ResolvedAircraft {
        match Self::lookup(name) {
            Some(aircraft) => ResolvedAircraft {
                aircraft,
                recognized: true,
            },
            None => {
                log::debug!(
                    "Unknown aircraft type, substituting default — requested={:?} default={}",
                    name,
                    Self::DEFAULT.name()
                );
                ResolvedAircraft {
                    aircraft: Self::DEFAULT,
                    recognized: false,
                }
            }
        }
    }

    pub fn spec(&self) -> &'static AircraftSpec {
        &AIRCRAFT_SPECS[self.index()]
    }

    pub fn hold(&self) -> &'static CargoHold {
        &CARGO_HOLDS[self.index()]
    }

    fn index(&self) -> usize {
        match self {
            AircraftType::Boeing737_800 => 0,
            AircraftType::Boeing737_900ER => 1,
            AircraftType::AirbusA330_200 => 2,
            AircraftType::AirbusA330_300 => 3,
        }
    }
}

impl fmt::Display for AircraftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAircraft {
    pub aircraft: AircraftType,
    /// False when the requested name was unknown and the default was substituted.
    pub recognized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AircraftSpec {
    #[serde(rename = "type")]
    pub aircraft: AircraftType,
    /// kg
    pub max_cargo_weight: f64,
    /// m³
    pub max_cargo_volume: f64,
    /// kg, passengers + baggage + cargo
    pub max_total_payload: f64,
    /// kg
    pub max_fuel: f64,
}

pub static AIRCRAFT_SPECS: [AircraftSpec; 4] = [
    AircraftSpec {
        aircraft: AircraftType::Boeing737_800,
        max_cargo_weight: 2000.0,
        max_cargo_volume: 45.0,
        max_total_payload: 20000.0,
        max_fuel: 21000.0,
    },
    AircraftSpec {
        aircraft: AircraftType::Boeing737_900ER,
        max_cargo_weight: 2500.0,
        max_cargo_volume: 52.0,
        max_total_payload: 23000.0,
        max_fuel: 24000.0,
    },
    AircraftSpec {
        aircraft: AircraftType::AirbusA330_200,
        max_cargo_weight: 15000.0,
        max_cargo_volume: 120.0,
        max_total_payload: 45000.0,
        max_fuel: 140000.0,
    },
    AircraftSpec {
        aircraft: AircraftType::AirbusA330_300,
        max_cargo_weight: 18000.0,
        max_cargo_volume: 140.0,
        max_total_payload: 52000.0,
        max_fuel: 140000.0,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ORIGIN: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Dimensions {
    pub const fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub fn volume(&self) -> f64 {
        self.width * self.height * self.depth
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldSection {
    pub id: &'static str,
    pub name: &'static str,
    /// Centre of the section in hold coordinates (metres, unscaled).
    pub position: Vec3,
    pub dimensions: Dimensions,
    /// Declared limit. Placement does not enforce it.
    pub max_weight: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoHold {
    pub aircraft: AircraftType,
    /// Overall belly hold envelope in metres.
    pub dimensions: Dimensions,
    pub max_weight: f64,
    /// Fuselage envelope used by renderers for the wireframe.
    pub fuselage: Dimensions,
    /// Ordered; placement distributes round-robin in this order.
    pub sections: &'static [HoldSection],
}

impl CargoHold {
    pub fn volume(&self) -> f64 {
        self.dimensions.volume()
    }

    pub fn section(&self, id: &str) -> Option<&'static HoldSection> {
        self.sections.iter().find(|s| s.id == id)
    }
}

const FWD_COLOR: &str = "#00fff5";
const MID_COLOR: &str = "#39ff14";
const AFT_COLOR: &str = "#ff00ff";

const fn section(
    id: &'static str,
    name: &'static str,
    position: Vec3,
    dimensions: Dimensions,
    max_weight: f64,
    color: &'static str,
) -> HoldSection {
    HoldSection {
        id,
        name,
        position,
        dimensions,
        max_weight,
        color,
    }
}

static B738_SECTIONS: [HoldSection; 2] = [
    section(
        "fwd",
        "Forward Hold",
        Vec3::new(0.0, -0.4, -1.2),
        Dimensions::new(2.4, 0.8, 2.0),
        900.0,
        FWD_COLOR,
    ),
    section(
        "aft",
        "Aft Hold",
        Vec3::new(0.0, -0.4, 1.5),
        Dimensions::new(2.4, 0.8, 2.2),
        1100.0,
        AFT_COLOR,
    ),
];

static B739_SECTIONS: [HoldSection; 2] = [
    section(
        "fwd",
        "Forward Hold",
        Vec3::new(0.0, -0.4, -1.5),
        Dimensions::new(2.4, 0.8, 2.2),
        1000.0,
        FWD_COLOR,
    ),
    section(
        "aft",
        "Aft Hold",
        Vec3::new(0.0, -0.4, 1.8),
        Dimensions::new(2.4, 0.8, 2.5),
        1500.0,
        AFT_COLOR,
    ),
];

static A332_SECTIONS: [HoldSection; 3] = [
    section(
        "fwd",
        "Forward Hold",
        Vec3::new(0.0, -0.5, -3.0),
        Dimensions::new(3.5, 1.0, 2.8),
        6000.0,
        FWD_COLOR,
    ),
    section(
        "mid",
        "Middle Hold",
        Vec3::new(0.0, -0.5, 0.0),
        Dimensions::new(3.5, 1.0, 2.4),
        4000.0,
        MID_COLOR,
    ),
    section(
        "aft",
        "Aft Hold",
        Vec3::new(0.0, -0.5, 3.0),
        Dimensions::new(3.5, 1.0, 2.8),
        5000.0,
        AFT_COLOR,
    ),
];

static A333_SECTIONS: [HoldSection; 3] = [
    section(
        "fwd",
        "Forward Hold",
        Vec3::new(0.0, -0.5, -3.5),
        Dimensions::new(3.5, 1.0, 3.0),
        7000.0,
        FWD_COLOR,
    ),
    section(
        "mid",
        "Middle Hold",
        Vec3::new(0.0, -0.5, 0.0),
        Dimensions::new(3.5, 1.0, 3.0),
        5000.0,
        MID_COLOR,
    ),
    section(
        "aft",
        "Aft Hold",
        Vec3::new(0.0, -0.5, 3.5),
        Dimensions::new(3.5, 1.0, 3.0),
        6000.0,
        AFT_COLOR,
    ),
];

pub static CARGO_HOLDS: [CargoHold; 4] = [
    CargoHold {
        aircraft: AircraftType::Boeing737_800,
        dimensions: Dimensions::new(3.5, 1.2, 8.0),
        max_weight: 2000.0,
        fuselage: Dimensions::new(2.8, 1.6, 6.0),
        sections: &B738_SECTIONS,
    },
    CargoHold {
        aircraft: AircraftType::Boeing737_900ER,
        dimensions: Dimensions::new(3.5, 1.2, 10.0),
        max_weight: 2500.0,
        fuselage: Dimensions::new(2.8, 1.6, 7.0),
        sections: &B739_SECTIONS,
    },
    CargoHold {
        aircraft: AircraftType::AirbusA330_200,
        dimensions: Dimensions::new(5.3, 1.7, 20.0),
        max_weight: 15000.0,
        fuselage: Dimensions::new(4.0, 2.0, 10.0),
        sections: &A332_SECTIONS,
    },
    CargoHold {
        aircraft: AircraftType::AirbusA330_300,
        dimensions: Dimensions::new(5.3, 1.7, 24.0),
        max_weight: 18000.0,
        fuselage: Dimensions::new(4.0, 2.0, 12.0),
        sections: &A333_SECTIONS,
    },
];
