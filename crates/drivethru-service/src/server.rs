//! HTTP server for the drive-thru API.
//!
//! Exposes a single `POST /orders` endpoint backed by the shared order
//! engine. Every origin, method and header is accepted, with credentials.

use axum::{
	extract::{DefaultBodyLimit, State},
	response::Json,
	routing::post,
	Router,
};
use drivethru_config::ApiConfig;
use drivethru_core::OrderEngine;
use drivethru_types::{APIError, OrderResponse, PlaceOrderRequest};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Engine that owns the order ledger.
	pub engine: Arc<OrderEngine>,
}

/// Builds the router with its middleware stack.
pub fn build_router(state: AppState, max_request_size: usize) -> Router {
	Router::new()
		.route("/orders", post(handle_order))
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(CorsLayer::very_permissive())
				.layer(DefaultBodyLimit::max(max_request_size)),
		)
		.with_state(state)
}

/// Starts the HTTP server for the API.
///
/// Runs until the process receives Ctrl-C.
pub async fn start_server(
	api_config: ApiConfig,
	engine: Arc<OrderEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = build_router(AppState { engine }, api_config.max_request_size);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Drive-thru API server starting on {}", bind_address);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	tracing::info!("Drive-thru API server stopped");
	Ok(())
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!("Failed to listen for shutdown signal: {}", e);
		std::future::pending::<()>().await;
	}
	tracing::info!("Shutdown signal received");
}

/// Handles POST /orders requests.
///
/// Places a new order or cancels an existing one, depending on the message,
/// and returns the totals and history after the change.
async fn handle_order(
	State(state): State<AppState>,
	Json(request): Json<PlaceOrderRequest>,
) -> Result<Json<OrderResponse>, APIError> {
	match crate::apis::order::process_order_request(request, &state.engine).await {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::warn!("Order request failed: {}", e);
			Err(e)
		},
	}
}
