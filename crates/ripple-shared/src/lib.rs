//! # Ripple Shared
//!
//! Request/response types shared by the HTTP surface and the realtime
//! channel - both speak the same post payload shape.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
