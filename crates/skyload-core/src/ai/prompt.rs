//! System and user prompts for the two model conversations.

use crate::aircraft::{CargoHold, Dimensions, Vec3};
use crate::ai::AnalysisRequest;
use crate::cargo::{ContainerType, LD11, LD3, LD6, PALLET};
use crate::placement::PlacementRequest;
use serde::Serialize;
use skyload_advisor::{AdvisorError, CompletionRequest};

pub const PLACEMENT_MAX_TOKENS: u32 = 2048;
pub const ANALYSIS_MAX_TOKENS: u32 = 4096;

/// Unit load devices offered to the model. Loose bulk is left out on purpose
/// so it sizes real containers.
const ULD_TYPES: [ContainerType; 4] = [LD3, LD6, LD11, PALLET];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionInfo<'a> {
    id: &'a str,
    name: &'a str,
    position: Vec3,
    dimensions: Dimensions,
    max_weight: f64,
}

#[derive(Serialize)]
struct ContainerLine<'a> {
    index: usize,
    id: &'a str,
    name: &'a str,
    weight: f64,
    volume: f64,
}

fn section_info(hold: &CargoHold) -> Vec<SectionInfo<'static>> {
    hold.sections
        .iter()
        .map(|s| SectionInfo {
            id: s.id,
            name: s.name,
            position: s.position,
            dimensions: s.dimensions,
            max_weight: s.max_weight,
        })
        .collect()
}

pub fn placement_prompt(
    request: &PlacementRequest,
    hold: &CargoHold,
) -> Result<CompletionRequest, AdvisorError> {
    let total = request.total_weight();
    let fits = total <= hold.max_weight;
    let containers: Vec<ContainerLine<'_>> = request
        .containers
        .iter()
        .enumerate()
        .map(|(index, c)| ContainerLine {
            index,
            id: &c.id,
            name: &c.name,
            weight: c.weight,
            volume: c.volume,
        })
        .collect();

    let fit_rule = if fits {
        "ALL containers should fit - mark ALL as placed:true"
    } else {
        "Mark containers that fit as placed:true, overflow as placed:false"
    };

    let system = format!(
        r#"You are an expert cargo loading AI. Place containers into aircraft cargo hold.

Aircraft: {aircraft}
Total Cargo Hold Capacity: {capacity}kg
Total Containers Weight: {total}kg
Fits in hold: {fits}

Cargo Sections:
{sections}

Containers to place (use EXACT IDs from this list):
{containers}

IMPORTANT RULES:
1. Use the EXACT container IDs from the list above
2. {fit_rule}
3. Distribute weight evenly between sections
4. Position containers at different x/z coordinates within each section

Respond with ONLY valid JSON:
{{
  "placements": [
    {{"containerId": "exact-id-from-list", "section": "fwd", "placed": true, "position": {{"x": -0.3, "y": 0.2, "z": -1.5}}}}
  ],
  "balanceScore": 85,
  "forwardWeight": 2500,
  "aftWeight": 2300,
  "suggestions": ["Suggestion"],
  "warnings": []
}}"#,
        aircraft = hold.aircraft,
        capacity = hold.max_weight,
        total = total,
        fits = if fits { "YES" } else { "NO - some will overflow" },
        sections = serde_json::to_string_pretty(&section_info(hold))?,
        containers = serde_json::to_string_pretty(&containers)?,
        fit_rule = fit_rule,
    );

    let user = format!(
        "Place these containers. Total weight {}kg against {}kg capacity.\n\
         Return JSON with placements array using the exact container IDs provided.",
        total, hold.max_weight
    );

    Ok(CompletionRequest::new(system, user, PLACEMENT_MAX_TOKENS))
}

pub fn analysis_prompt(
    request: &AnalysisRequest,
    hold: &CargoHold,
) -> Result<CompletionRequest, AdvisorError> {
    let target_count = if hold.sections.len() >= 3 { "8-12" } else { "4-8" };

    let system = format!(
        r#"You are an expert cargo loading optimization AI for aircraft. Your role is to analyze flight cargo data and provide optimal cargo placement suggestions with 3D coordinates.

You have access to these ULD (Unit Load Device) container types:
{uld}

The aircraft cargo hold specifications for {aircraft}:
{hold}

3D Section positions for visualization:
{sections}

CRITICAL POSITIONING RULES:
- Use the EXACT section positions provided above for z coordinates
- Y position should be around -0.3 (inside cargo hold floor level)
- X position should spread containers within section width (e.g., -0.6, 0, 0.6 for 3 containers in a row)
- Container dimensions: width ~1.2-1.5m, height ~0.8-1.0m, depth ~1.2-1.5m

When analyzing cargo placement:
1. Split the total cargo weight into {target_count} realistic ULD containers
2. Each container should be 400-2500kg depending on type
3. Distribute containers across ALL sections for balance
4. Place heavier containers near center sections
5. Mark containers as "placed: true" if they fit, "placed: false" if overflow
6. Space containers within each section (don't stack all at same position)

IMPORTANT: Generate MULTIPLE containers with DIFFERENT positions. Spread them across the cargo hold.

Respond with a JSON object in this exact format:
{{
  "containers": [
    {{
      "id": "CNT-001",
      "name": "LD3 Container #1",
      "weight": 850,
      "volume": 4.2,
      "width": 1.3,
      "height": 0.9,
      "depth": 1.3,
      "section": "fwd",
      "placed": true,
      "position": {{ "x": -0.5, "y": -0.3, "z": -3.0 }}
    }}
  ],
  "balanceScore": 85,
  "suggestions": ["Place heavy cargo in forward hold first"],
  "warnings": ["Weight distribution slightly forward-heavy"],
  "analysis": "Detailed analysis of the cargo placement...",
  "recommendations": ["Consider redistributing 200kg to aft section"],
  "efficiency": {{ "current": 75, "optimized": 92, "improvement": 17 }}
}}"#,
        uld = serde_json::to_string_pretty(&ULD_TYPES)?,
        aircraft = hold.aircraft,
        hold = serde_json::to_string_pretty(hold)?,
        sections = serde_json::to_string_pretty(&section_info(hold))?,
        target_count = target_count,
    );

    let user = format!(
        "Analyze this flight and provide optimal cargo placement:\n\n\
         Flight: {flight}\n\
         Route: {origin} → {destination}\n\
         Aircraft: {aircraft}\n\
         Cargo Weight: {weight} kg\n\
         Cargo Volume: {volume} m³\n\
         Passengers: {pax}\n\
         Baggage: {baggage} kg\n\n\
         Maximum cargo capacity: {capacity} kg\n\
         Available volume: {hold_volume} m³\n\
         Number of sections: {sections}\n\n\
         Please generate a realistic cargo distribution using standard ULD containers and provide \
         placement coordinates within the cargo hold dimensions. Calculate the weight distribution \
         across sections and provide a balance score.",
        flight = request.flight_number,
        origin = request.origin,
        destination = request.destination,
        aircraft = hold.aircraft,
        weight = request.cargo_weight,
        volume = request.cargo_volume,
        pax = request.passenger_count,
        baggage = request.baggage_weight,
        capacity = hold.max_weight,
        hold_volume = hold.volume(),
        sections = hold.sections.len(),
    );

    Ok(CompletionRequest::new(system, user, ANALYSIS_MAX_TOKENS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::AircraftType;
    use crate::cargo::LD3;

    #[test]
    fn test_placement_prompt_lists_exact_ids() {
        let request = PlacementRequest {
            flight_number: "SK1".to_string(),
            aircraft_type: "Boeing 737-800".to_string(),
            containers: vec![
                LD3.instantiate("uld-a".into(), "A".into(), 800.0),
                LD3.instantiate("uld-b".into(), "B".into(), 1500.0),
            ],
        };
        let prompt = placement_prompt(&request, AircraftType::Boeing737_800.hold()).unwrap();

        assert_eq!(prompt.max_tokens, PLACEMENT_MAX_TOKENS);
        assert!(prompt.system.contains("\"id\": \"uld-a\""));
        assert!(prompt.system.contains("\"id\": \"uld-b\""));
        assert!(prompt.system.contains("Total Containers Weight: 2300kg"));
        assert!(prompt.system.contains("Fits in hold: NO - some will overflow"));
        assert!(prompt.system.contains("\"maxWeight\": 900.0"));
        assert!(prompt.user.contains("2000kg capacity"));
    }

    #[test]
    fn test_analysis_prompt_sizes_by_section_count() {
        let request = AnalysisRequest {
            flight_number: "SK42".to_string(),
            aircraft_type: "Airbus A330-300".to_string(),
            cargo_weight: 12000.0,
            cargo_volume: 80.0,
            passenger_count: 250,
            baggage_weight: 5000.0,
            origin: "LHR".to_string(),
            destination: "DXB".to_string(),
        };
        let prompt = analysis_prompt(&request, AircraftType::AirbusA330_300.hold()).unwrap();

        assert_eq!(prompt.max_tokens, ANALYSIS_MAX_TOKENS);
        assert!(prompt.system.contains("into 8-12 realistic ULD containers"));
        assert!(prompt.system.contains("\"id\": \"PALLET\""));
        assert!(!prompt.system.contains("\"id\": \"BULK\""));
        assert!(prompt.user.contains("Route: LHR → DXB"));
        assert!(prompt.user.contains("Maximum cargo capacity: 18000 kg"));
        assert!(prompt.user.contains("Number of sections: 3"));

        let narrow = analysis_prompt(&request, AircraftType::Boeing737_800.hold()).unwrap();
        assert!(narrow.system.contains("into 4-8 realistic ULD containers"));
    }
}
