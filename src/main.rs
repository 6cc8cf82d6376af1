/// API сервер движка бюджетной аналитики

use std::sync::Arc;

use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use tower_http::cors::{Any, CorsLayer};

use budget_ml::{
    models::SpendingForecaster,
    preprocessing::CalendarContext,
    types::{ForecastOutput, ForecastRequest, InsightsInput, InsightsOutput},
    RecommendationEngine,
};

#[derive(Clone)]
struct AppState {
    // движок не хранит состояния между вызовами, мьютекс не нужен
    engine: Arc<RecommendationEngine>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let state = AppState {
        engine: Arc::new(RecommendationEngine::new()),
    };

    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/recommendations", post(recommendations))
        .route("/api/forecast", post(forecast))
        .layer(cors)
        .with_state(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], 8000));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://0.0.0.0:8000");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Budget ML API (Rust)",
        "version": "0.1.0"
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn recommendations(
    State(state): State<AppState>,
    Json(input): Json<InsightsInput>,
) -> Result<Json<InsightsOutput>, (StatusCode, String)> {
    tracing::info!(
        "Recommendations request: {} limits, {} history months",
        input.limits.len(),
        input.history.len()
    );

    let today = Utc::now().date_naive();
    let recommendations = state
        .engine
        .evaluate(&input, today)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(Json(InsightsOutput {
        recommendations: Some(recommendations),
        forecast: None,
    }))
}

async fn forecast(
    Json(request): Json<ForecastRequest>,
) -> Result<Json<InsightsOutput>, (StatusCode, String)> {
    tracing::info!("Forecast request: {} history months", request.history.len());

    if !request.current_spent.is_finite() || request.current_spent < 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "invalid input: current_spent must be a non-negative number".to_string(),
        ));
    }
    if request.history.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err((
            StatusCode::BAD_REQUEST,
            "invalid input: history amounts must be non-negative numbers".to_string(),
        ));
    }

    let today = Utc::now().date_naive();
    let ctx = CalendarContext::month_context(request.reference_date, today);

    let mut forecaster = SpendingForecaster::new(&request.history);
    forecaster.train();

    let projected_total = forecaster.predict_current_month(
        request.current_spent,
        ctx.current_day_of_month,
        ctx.total_days_in_month,
    );

    Ok(Json(InsightsOutput {
        recommendations: None,
        forecast: Some(ForecastOutput {
            projected_total,
            next_month: forecaster.predict_next_month(projected_total),
            daily_rate: request.current_spent / ctx.current_day_of_month.max(1) as f64,
            trend: forecaster.trend(),
            confidence: forecaster.confidence(),
            data_quality: forecaster.data_quality(),
        }),
    }))
}
