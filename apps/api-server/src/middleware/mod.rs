//! Request middleware: the session gate, error presentation, and flash
//! messages.

pub mod auth;
pub mod error;
pub mod flash;
