//! Request handlers for the drive-thru HTTP API.

pub mod order;
