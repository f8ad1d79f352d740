//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::domain::{Coordinates, TrainNumber};
use crate::simrail::SimRailFeed;
use crate::stations::DirectoryError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<F: SimRailFeed>(state: AppState<F>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stations", get(list_stations::<F>))
        .route("/api/stations/resolve", get(resolve_station::<F>))
        .route("/api/trains", get(list_trains::<F>))
        .route("/api/trains/:train/timetable", get(train_timetable::<F>))
        .route("/api/trains/:train/position", get(train_position::<F>))
        .route("/api/trains/:train/delay", get(train_delay::<F>))
        .route("/api/trains/:train/delay/details", get(train_delay_details::<F>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The current station directory.
async fn list_stations<F: SimRailFeed>(
    State(state): State<AppState<F>>,
) -> Result<Json<StationListResponse>, AppError> {
    let snapshot = state.pipeline.stations().await?;
    Ok(Json(StationListResponse::from(snapshot.as_ref())))
}

/// Nearest station to a coordinate pair.
async fn resolve_station<F: SimRailFeed>(
    State(state): State<AppState<F>>,
    Query(req): Query<ResolveRequest>,
) -> Result<Json<ResolveResponse>, AppError> {
    let point = Coordinates::new(req.lat, req.lng);
    if !point.is_valid() {
        return Err(AppError::BadRequest {
            message: format!("Invalid coordinates: {}, {}", req.lat, req.lng),
        });
    }

    if let Some(max) = req.max_distance {
        if !max.is_finite() || max < 0.0 {
            return Err(AppError::BadRequest {
                message: format!("Invalid maxDistance: {max}"),
            });
        }
    }

    let found = state
        .pipeline
        .resolve(&point, req.max_distance)
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("No station near {point}"),
        })?;

    Ok(Json(ResolveResponse::from(found)))
}

/// Live trains, optionally filtered.
async fn list_trains<F: SimRailFeed>(
    State(state): State<AppState<F>>,
    Query(req): Query<TrainSearchRequest>,
) -> Json<TrainListResponse> {
    let trains = state.pipeline.active_trains(req.q.as_deref()).await;
    Json(TrainListResponse::from_trains(&trains))
}

/// Timetable of one train; empty if unknown.
async fn train_timetable<F: SimRailFeed>(
    State(state): State<AppState<F>>,
    Path(train): Path<String>,
) -> Result<Json<TimetableResponse>, AppError> {
    let train = parse_train(&train)?;
    let timetable = state.pipeline.fetch_timetable(&train).await;
    Ok(Json(TimetableResponse::from_timetable(&train, &timetable)))
}

/// Live position of one train.
async fn train_position<F: SimRailFeed>(
    State(state): State<AppState<F>>,
    Path(train): Path<String>,
) -> Result<Json<PositionResponse>, AppError> {
    let train = parse_train(&train)?;
    let position = state
        .pipeline
        .get_position(&train)
        .await
        .ok_or_else(|| not_running(&train))?;

    Ok(Json(PositionResponse::from(&position)))
}

/// Current delay of one train; zero when it cannot be estimated.
async fn train_delay<F: SimRailFeed>(
    State(state): State<AppState<F>>,
    Path(train): Path<String>,
) -> Result<Json<DelayResponse>, AppError> {
    let train = parse_train(&train)?;
    let estimate = state.pipeline.calculate_delay(&train).await;
    Ok(Json(DelayResponse::from_estimate(&train, estimate)))
}

/// Full delay report for one train.
async fn train_delay_details<F: SimRailFeed>(
    State(state): State<AppState<F>>,
    Path(train): Path<String>,
) -> Result<Json<DelayDetailResponse>, AppError> {
    let train = parse_train(&train)?;
    let detail = state
        .pipeline
        .delay_details(&train)
        .await
        .ok_or_else(|| not_running(&train))?;

    Ok(Json(DelayDetailResponse::from_detail(&train, &detail)))
}

fn parse_train(s: &str) -> Result<TrainNumber, AppError> {
    TrainNumber::parse(s).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })
}

fn not_running(train: &TrainNumber) -> AppError {
    AppError::NotFound {
        message: format!("Train {train} is not running or has no timetable"),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<DirectoryError> for AppError {
    fn from(e: DirectoryError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simrail::MockSimRailClient;
    use crate::tracking::TrackingConfig;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    fn router() -> (MockSimRailClient, Router) {
        let feed = MockSimRailClient::from_dir("data/mock").unwrap();
        let state = AppState::new(feed.clone(), &TrackingConfig::default());
        (feed, create_router(state))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn health_check() {
        let (_, app) = router();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn stations_listing() {
        let (_, app) = router();
        let (status, json) = get_json(app, "/api/stations").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 5);
        assert_eq!(json["stations"][0]["name"], "Katowice");
    }

    #[tokio::test]
    async fn stations_unavailable_is_internal_error() {
        let (feed, app) = router();
        feed.fail_stations(true);
        let (status, json) = get_json(app, "/api/stations").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("refresh failed"));
    }

    #[tokio::test]
    async fn resolve_endpoint() {
        let (_, app) = router();
        let (status, json) =
            get_json(app.clone(), "/api/stations/resolve?lat=50.2580&lng=19.0175").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "Katowice");

        let (status, _) = get_json(
            app.clone(),
            "/api/stations/resolve?lat=50.2580&lng=19.0175&maxDistance=5",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json(app, "/api/stations/resolve?lat=123&lng=19.0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn trains_listing_and_filter() {
        let (_, app) = router();

        let (status, json) = get_json(app.clone(), "/api/trains").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 3);

        let (_, json) = get_json(app, "/api/trains?q=warszawa").await;
        assert_eq!(json["count"], 1);
        assert_eq!(json["trains"][0]["train_number"], "4130");
        assert_eq!(json["trains"][0]["route"], "Katowice → Warszawa Zachodnia");
    }

    #[tokio::test]
    async fn timetable_endpoint() {
        let (_, app) = router();
        let (status, json) = get_json(app, "/api/trains/14120/timetable").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 4);
        assert_eq!(json["scheduled_journey_minutes"], 35);
        assert_eq!(json["entries"][1]["station_name"], "Sosnowiec Główny");
        assert_eq!(json["entries"][1]["arrival_time"], "2026-01-10T10:08:00Z");
    }

    #[tokio::test]
    async fn position_endpoint() {
        let (_, app) = router();

        let (status, json) = get_json(app.clone(), "/api/trains/4130/position").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["current_station"], "Katowice");
        assert_eq!(json["station_source"], "nearest");

        let (status, json) = get_json(app, "/api/trains/31337/position").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn delay_endpoints() {
        let (_, app) = router();

        let (status, json) = get_json(app.clone(), "/api/trains/31337/delay").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["delay_minutes"], 0);
        assert_eq!(json["is_delayed"], false);

        // The fixture timetable lies in the past, so the train is late.
        let (status, json) = get_json(app.clone(), "/api/trains/14120/delay/details").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["current_station"], "Sosnowiec Główny");
        assert_eq!(json["next_station"], "Dąbrowa Górnicza");
        assert_eq!(json["delay_trend"], "stable");
        assert!(json["current_delay_minutes"].as_u64().unwrap() > 0);

        let (status, _) = get_json(app, "/api/trains/31337/delay/details").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_train_number_is_bad_request() {
        let (_, app) = router();
        let long = "9".repeat(40);
        let (status, json) = get_json(app, &format!("/api/trains/{long}/delay")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }
}
