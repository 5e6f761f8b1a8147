//! API types for the drive-thru HTTP API.
//!
//! This module defines the request and response bodies of the `/orders`
//! endpoint and the structured error type that maps failures onto HTTP
//! status codes.

use crate::{Order, OrderSnapshot};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request body for POST /orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
	/// Free-text message from the customer.
	pub message: String,
}

/// Response body for POST /orders.
///
/// Always carries the full current state, not the delta of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
	pub total_burgers: i128,
	pub total_fries: i128,
	pub total_drinks: i128,
	pub order_history: Vec<Order>,
}

impl From<OrderSnapshot> for OrderResponse {
	fn from(snapshot: OrderSnapshot) -> Self {
		Self {
			total_burgers: snapshot.totals.burgers,
			total_fries: snapshot.totals.fries,
			total_drinks: snapshot.totals.drinks,
			order_history: snapshot.history,
		}
	}
}

/// API error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error type/code
	pub error: String,
	/// Human-readable description
	pub detail: String,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// Malformed or unusable input (400)
	BadRequest { error_type: String, message: String },
	/// Referenced resource does not exist (404)
	NotFound { error_type: String, message: String },
	/// Internal or upstream failure (500)
	InternalServerError { error_type: String, message: String },
}

impl APIError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> StatusCode {
		match self {
			APIError::BadRequest { .. } => StatusCode::BAD_REQUEST,
			APIError::NotFound { .. } => StatusCode::NOT_FOUND,
			APIError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		let (error_type, message) = match self {
			APIError::BadRequest {
				error_type,
				message,
			}
			| APIError::NotFound {
				error_type,
				message,
			}
			| APIError::InternalServerError {
				error_type,
				message,
			} => (error_type, message),
		};
		ErrorResponse {
			error: error_type.clone(),
			detail: message.clone(),
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
			APIError::NotFound { message, .. } => write!(f, "Not Found: {}", message),
			APIError::InternalServerError { message, .. } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

impl IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		(self.status_code(), Json(self.to_error_response())).into_response()
	}
}
