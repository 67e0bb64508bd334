//! API endpoint handlers.
//!
//! One module per step of the screening flow.

pub mod auth;
pub mod health;
pub mod predict;
pub mod questionnaire;
