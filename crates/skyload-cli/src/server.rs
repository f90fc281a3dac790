// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! HTTP front end: the two advisor endpoints, a CSV upload endpoint and a
//! health probe.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use skyload_core::ai::{AnalysisRequest, AnalysisResponse, LoadAdvisor};
use skyload_core::analysis::{
    analyze_all_flights, calculate_dashboard_stats, DashboardStats, WeightAnalysis,
};
use skyload_core::flight::FlightCsvParser;
use skyload_core::placement::{PlacementRequest, PlacementResult};
use skyload_core::SkyloadError;
use std::sync::Arc;

pub struct AppState {
    pub advisor: LoadAdvisor,
}

pub type SharedState = Arc<AppState>;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<SkyloadError> for ApiError {
    fn from(e: SkyloadError) -> Self {
        match e {
            SkyloadError::InvalidUpload(_)
            | SkyloadError::InvalidContainer { .. }
            | SkyloadError::Csv(_)
            | SkyloadError::Json(_) => {
                ApiError::bad_request(e.to_string())
            }
            SkyloadError::FlightNotFound(_) | SkyloadError::NoFlights => Self {
                status: StatusCode::NOT_FOUND,
                message: e.to_string(),
            },
            SkyloadError::Io(_) => ApiError::internal(e.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        log::error!("Advisor task failed — error={}", e);
        ApiError::internal("Advisor task failed")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct FlightsResponse {
    pub analyses: Vec<WeightAnalysis>,
    pub stats: DashboardStats,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/ai-place", post(ai_place))
        .route("/api/ai-analyze", post(ai_analyze))
        .route("/api/flights", post(upload_flights))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn ai_place(
    State(state): State<SharedState>,
    Json(request): Json<PlacementRequest>,
) -> Result<Json<PlacementResult>, ApiError> {
    for container in &request.containers {
        container.validate()?;
    }
    log::info!(
        "POST /api/ai-place — flight={} aircraft={:?} containers={} total_kg={}",
        request.flight_number,
        request.aircraft_type,
        request.containers.len(),
        request.total_weight()
    );

    let result = tokio::task::spawn_blocking(move || state.advisor.place(&request)).await?;
    Ok(Json(result))
}

async fn ai_analyze(
    State(state): State<SharedState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    if !request.cargo_weight.is_finite() || request.cargo_weight < 0.0 {
        return Err(ApiError::bad_request("cargoWeight must be a non-negative number"));
    }
    log::info!(
        "POST /api/ai-analyze — flight={} aircraft={:?} cargo_kg={}",
        request.flight_number,
        request.aircraft_type,
        request.cargo_weight
    );

    let response = tokio::task::spawn_blocking(move || {
        let mut rng = rand::thread_rng();
        state.advisor.analyze(&request, &mut rng)
    })
    .await?;
    Ok(Json(response))
}

async fn upload_flights(body: String) -> Result<Json<FlightsResponse>, ApiError> {
    let flights = FlightCsvParser::parse_str(&body)?;
    let analyses = analyze_all_flights(&flights);
    let stats = calculate_dashboard_stats(&analyses);
    log::info!(
        "POST /api/flights — flights={} overweight={}",
        stats.total_flights,
        stats.overweight_count
    );
    Ok(Json(FlightsResponse { analyses, stats }))
}

/// Serves until Ctrl-C.
pub async fn serve(state: SharedState, bind_addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    log::info!("Listening — addr={}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal — error={}", e);
            }
        })
        .await?;
    log::info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyload_core::cargo::LD3;

    const CSV: &str = "\
flight_number,flight_date,origin,destination,tail_number,aircraft_type,gross_weight_cargo_kg,gross_volume_cargo_m3,passenger_count,baggage_weight_kg,fuel_weight_kg,fuel_price_per_kg,cargo_price_per_kg
SK100,2024-03-01,JFK,LAX,N100,Boeing 737-800,2100,30,150,2000,10000,0.8,2.5
SK200,2024-03-02,LHR,DXB,N200,Airbus A330-300,9000,70,250,5000,60000,0.8,2.5
";

    fn state() -> SharedState {
        Arc::new(AppState {
            advisor: LoadAdvisor::offline(),
        })
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!(health().await, "OK");
    }

    #[tokio::test]
    async fn test_place_runs_grid() {
        let request = PlacementRequest {
            flight_number: "SK100".to_string(),
            aircraft_type: "Boeing 737-800".to_string(),
            containers: vec![
                LD3.instantiate("a".into(), "A".into(), 1000.0),
                LD3.instantiate("b".into(), "B".into(), 1200.0),
            ],
        };
        let Json(result) = ai_place(State(state()), Json(request)).await.unwrap();
        assert!(result.containers[0].placed);
        assert!(!result.containers[1].placed);
        assert_eq!(result.max_capacity, 2000.0);
    }

    #[tokio::test]
    async fn test_place_rejects_negative_weight() {
        let request = PlacementRequest {
            flight_number: "SK100".to_string(),
            aircraft_type: "Boeing 737-800".to_string(),
            containers: vec![LD3.instantiate("a".into(), "A".into(), -5.0)],
        };
        let err = ai_place(State(state()), Json(request)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid container a: weight must be a non-negative number");
    }

    #[tokio::test]
    async fn test_analyze_offline() {
        let request = AnalysisRequest {
            flight_number: "SK200".to_string(),
            aircraft_type: "Airbus A330-300".to_string(),
            cargo_weight: 9000.0,
            cargo_volume: 70.0,
            ..Default::default()
        };
        let Json(response) = ai_analyze(State(state()), Json(request)).await.unwrap();
        assert_eq!(response.placement.balance_score, 75);
        assert_eq!(response.placement.containers.len(), 10);
        assert!((response.efficiency.current - 50.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_upload_flights() {
        let Json(response) = upload_flights(CSV.to_string()).await.unwrap();
        assert_eq!(response.analyses.len(), 2);
        assert_eq!(response.stats.total_flights, 2);
        assert_eq!(response.stats.overweight_count, 1);
    }

    #[tokio::test]
    async fn test_upload_malformed_is_bad_request() {
        let err = upload_flights("just,some,columns\n1,2,3\n".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let body = err.into_response();
        assert_eq!(body.status(), StatusCode::BAD_REQUEST);
    }
}
