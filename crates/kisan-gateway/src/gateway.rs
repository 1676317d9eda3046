//! Main Gateway implementation
//!
//! Axum router over the advisory operations.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use kisan_core::{
    forecast, voice, Advisor, CropTimingAdvice, CropTimingRequest, OperationOutcome, SpeechRequest,
    SpeechResult, WeatherAdvice, WeatherAdviceRequest, YieldPrediction, YieldPredictionRequest,
    INVALID_INPUT,
};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::{GatewayError, Result};

/// Gateway state shared across handlers
#[derive(Debug, Clone)]
pub struct GatewayState {
    pub config: GatewayConfig,
    pub advisor: Arc<Advisor>,
}

/// Main Gateway
#[derive(Debug)]
pub struct Gateway {
    state: Arc<GatewayState>,
}

type Body<T> = std::result::Result<Json<T>, JsonRejection>;

impl Gateway {
    /// Create a gateway backed by Gemini, as described by `config.advisor`
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let advisor = Advisor::from_config(&config.advisor)?;
        Ok(Self::with_advisor(config, advisor))
    }

    /// Create a gateway around an existing advisor
    pub fn with_advisor(config: GatewayConfig, advisor: Advisor) -> Self {
        let state = Arc::new(GatewayState {
            config,
            advisor: Arc::new(advisor),
        });
        Self { state }
    }

    /// Get gateway state
    pub fn state(&self) -> Arc<GatewayState> {
        self.state.clone()
    }

    /// Build the Axum router
    pub fn build_router(&self) -> Router {
        let router = Router::new()
            .route("/health", get(Self::handle_health))
            .route("/api/forecast", get(Self::handle_forecast))
            .route("/api/languages", get(Self::handle_languages))
            .route("/api/crop-timing", post(Self::handle_crop_timing))
            .route("/api/yield-prediction", post(Self::handle_yield_prediction))
            .route("/api/weather-advice", post(Self::handle_weather_advice))
            .route("/api/speech", post(Self::handle_speech))
            .layer(CorsLayer::permissive());

        let router = if self.state.config.tracing {
            router.layer(TraceLayer::new_for_http())
        } else {
            router
        };

        router.with_state(self.state.clone())
    }

    /// Start the gateway server and run until Ctrl+C
    pub async fn start(&self) -> Result<()> {
        self.start_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
            }
        })
        .await
    }

    /// Start the gateway server and run until `shutdown` resolves
    pub async fn start_with_shutdown<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.state.config.socket_addr()?;
        let router = self.build_router();

        tracing::info!("Kisan Gateway starting on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        tracing::info!("Gateway stopped");
        Ok(())
    }

    // HTTP handlers

    async fn handle_health() -> impl IntoResponse {
        Json(serde_json::json!({
            "status": "healthy",
            "version": crate::VERSION
        }))
    }

    async fn handle_forecast() -> Result<Json<serde_json::Value>> {
        Ok(Json(serde_json::to_value(forecast::reference_table())?))
    }

    async fn handle_languages() -> Json<&'static [voice::Language]> {
        Json(voice::LANGUAGES)
    }

    async fn handle_crop_timing(
        State(state): State<Arc<GatewayState>>,
        body: Body<CropTimingRequest>,
    ) -> Json<OperationOutcome<CropTimingAdvice>> {
        Json(match body {
            Ok(Json(request)) => state.advisor.suggest_crop_timing(request).await,
            Err(rejection) => rejected(rejection),
        })
    }

    async fn handle_yield_prediction(
        State(state): State<Arc<GatewayState>>,
        body: Body<YieldPredictionRequest>,
    ) -> Json<OperationOutcome<YieldPrediction>> {
        Json(match body {
            Ok(Json(request)) => state.advisor.predict_yield(request).await,
            Err(rejection) => rejected(rejection),
        })
    }

    async fn handle_weather_advice(
        State(state): State<Arc<GatewayState>>,
        body: Body<WeatherAdviceRequest>,
    ) -> Json<OperationOutcome<WeatherAdvice>> {
        Json(match body {
            Ok(Json(request)) => state.advisor.get_weather_advice(request).await,
            Err(rejection) => rejected(rejection),
        })
    }

    async fn handle_speech(
        State(state): State<Arc<GatewayState>>,
        body: Body<SpeechRequest>,
    ) -> Json<OperationOutcome<SpeechResult>> {
        Json(match body {
            Ok(Json(request)) => state.advisor.synthesize_speech(request).await,
            Err(rejection) => rejected(rejection),
        })
    }
}

/// Unreadable bodies are reported like any other invalid input.
fn rejected<T>(rejection: JsonRejection) -> OperationOutcome<T> {
    tracing::debug!(reason = %rejection.body_text(), "request body rejected");
    OperationOutcome::Error(INVALID_INPUT.to_string())
}
