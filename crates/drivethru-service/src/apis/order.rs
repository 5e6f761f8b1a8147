//! Order API implementation.
//!
//! Turns `POST /orders` bodies into engine calls and maps engine failures
//! onto the structured API error type.

use drivethru_core::{EngineError, OrderEngine};
use drivethru_types::{APIError, OrderResponse, PlaceOrderRequest};
use tracing::info;

/// Runs one customer message through the engine and returns the full state.
pub async fn process_order_request(
	request: PlaceOrderRequest,
	engine: &OrderEngine,
) -> Result<OrderResponse, APIError> {
	info!(message_len = request.message.len(), "Processing order request");

	engine
		.process(&request.message)
		.await
		.map(OrderResponse::from)
		.map_err(to_api_error)
}

fn to_api_error(error: EngineError) -> APIError {
	match error {
		EngineError::InvalidInput(e) => APIError::BadRequest {
			error_type: "INVALID_CANCELLATION".to_string(),
			message: e.to_string(),
		},
		EngineError::NotFound(_) => APIError::NotFound {
			error_type: "ORDER_NOT_FOUND".to_string(),
			message: "Order not found".to_string(),
		},
		e @ EngineError::UpstreamFailure(_) => APIError::InternalServerError {
			error_type: "UPSTREAM_FAILURE".to_string(),
			message: e.to_string(),
		},
	}
}
