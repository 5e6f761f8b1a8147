//! Configuration validation utilities.
//!
//! Pluggable implementations receive their configuration as a raw TOML table.
//! A `Schema` lists the required and optional keys of that table together
//! with their expected types and bounds, and reports the first violation.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	/// Error that occurs when a required field is missing.
	#[error("Missing required field: {0}")]
	MissingField(String),
	/// Error that occurs when a field has an invalid value.
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	/// Error that occurs when field type is incorrect.
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
}

/// Represents the type of a configuration field.
#[derive(Debug)]
pub enum FieldType {
	/// A string value.
	String,
	/// An integer value with optional inclusive bounds.
	Integer { min: Option<i64>, max: Option<i64> },
	/// A float value with optional inclusive bounds. Integers are accepted.
	Float { min: Option<f64>, max: Option<f64> },
}

/// Type alias for field validator functions.
///
/// Validators run after the type check and return an error message on
/// failure.
pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// Represents a field in a configuration schema.
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	/// Creates a new field with the given name and type.
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	/// Adds a custom validator to this field.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}

	fn check(&self, value: &toml::Value) -> Result<(), ValidationError> {
		validate_field_type(&self.name, value, &self.field_type)?;

		if let Some(validator) = &self.validator {
			validator(value).map_err(|message| ValidationError::InvalidValue {
				field: self.name.clone(),
				message,
			})?;
		}

		Ok(())
	}
}

/// Defines a validation schema for a TOML table.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	/// Creates a new schema with required and optional fields.
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Validates a TOML value against this schema.
	///
	/// Required fields must be present; optional fields are only checked
	/// when present. Keys not named by the schema are ignored.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::TypeMismatch {
				field: "root".to_string(),
				expected: "table".to_string(),
				actual: config.type_str().to_string(),
			})?;

		for field in &self.required {
			let value = table
				.get(&field.name)
				.ok_or_else(|| ValidationError::MissingField(field.name.clone()))?;
			field.check(value)?;
		}

		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				field.check(value)?;
			}
		}

		Ok(())
	}
}

fn type_mismatch(field_name: &str, expected: &str, value: &toml::Value) -> ValidationError {
	ValidationError::TypeMismatch {
		field: field_name.to_string(),
		expected: expected.to_string(),
		actual: value.type_str().to_string(),
	}
}

fn out_of_range(field_name: &str, message: String) -> ValidationError {
	ValidationError::InvalidValue {
		field: field_name.to_string(),
		message,
	}
}

/// Validates that a value matches the expected field type and bounds.
fn validate_field_type(
	field_name: &str,
	value: &toml::Value,
	expected_type: &FieldType,
) -> Result<(), ValidationError> {
	match expected_type {
		FieldType::String => {
			if !value.is_str() {
				return Err(type_mismatch(field_name, "string", value));
			}
		},
		FieldType::Integer { min, max } => {
			let int_val = value
				.as_integer()
				.ok_or_else(|| type_mismatch(field_name, "integer", value))?;

			if let Some(min_val) = min {
				if int_val < *min_val {
					return Err(out_of_range(
						field_name,
						format!("Value {} is less than minimum {}", int_val, min_val),
					));
				}
			}
			if let Some(max_val) = max {
				if int_val > *max_val {
					return Err(out_of_range(
						field_name,
						format!("Value {} is greater than maximum {}", int_val, max_val),
					));
				}
			}
		},
		FieldType::Float { min, max } => {
			let float_val = value
				.as_float()
				.or_else(|| value.as_integer().map(|i| i as f64))
				.ok_or_else(|| type_mismatch(field_name, "float", value))?;

			if let Some(min_val) = min {
				if float_val < *min_val {
					return Err(out_of_range(
						field_name,
						format!("Value {} is less than minimum {}", float_val, min_val),
					));
				}
			}
			if let Some(max_val) = max {
				if float_val > *max_val {
					return Err(out_of_range(
						field_name,
						format!("Value {} is greater than maximum {}", float_val, max_val),
					));
				}
			}
		},
	}

	Ok(())
}

/// Trait defining a configuration schema that can validate TOML values.
pub trait ConfigSchema: Send + Sync {
	/// Validates a TOML configuration value against this schema.
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn schema() -> Schema {
		Schema::new(
			vec![Field::new("api_key", FieldType::String).with_validator(|v| {
				match v.as_str() {
					Some(s) if !s.trim().is_empty() => Ok(()),
					_ => Err("must not be empty".to_string()),
				}
			})],
			vec![
				Field::new(
					"max_tokens",
					FieldType::Integer {
						min: Some(1),
						max: None,
					},
				),
				Field::new(
					"temperature",
					FieldType::Float {
						min: Some(0.0),
						max: Some(2.0),
					},
				),
			],
		)
	}

	#[test]
	fn test_valid_config() {
		let config: toml::Value =
			toml::from_str("api_key = \"k\"\nmax_tokens = 100\ntemperature = 0.7").unwrap();
		assert!(schema().validate(&config).is_ok());
	}

	#[test]
	fn test_missing_required_field() {
		let config: toml::Value = toml::from_str("max_tokens = 100").unwrap();
		let err = schema().validate(&config).unwrap_err();
		assert!(matches!(err, ValidationError::MissingField(ref f) if f == "api_key"));
	}

	#[test]
	fn test_custom_validator() {
		let config: toml::Value = toml::from_str("api_key = \"  \"").unwrap();
		let err = schema().validate(&config).unwrap_err();
		assert!(err.to_string().contains("must not be empty"));
	}

	#[test]
	fn test_integer_bounds() {
		let config: toml::Value = toml::from_str("api_key = \"k\"\nmax_tokens = 0").unwrap();
		let err = schema().validate(&config).unwrap_err();
		assert!(err.to_string().contains("less than minimum 1"));
	}

	#[test]
	fn test_float_accepts_integer_and_checks_bounds() {
		let ok: toml::Value = toml::from_str("api_key = \"k\"\ntemperature = 1").unwrap();
		assert!(schema().validate(&ok).is_ok());

		let too_hot: toml::Value = toml::from_str("api_key = \"k\"\ntemperature = 2.5").unwrap();
		assert!(schema().validate(&too_hot).is_err());
	}

	#[test]
	fn test_type_mismatch() {
		let config: toml::Value = toml::from_str("api_key = 5").unwrap();
		let err = schema().validate(&config).unwrap_err();
		assert!(matches!(err, ValidationError::TypeMismatch { .. }));
	}
}
