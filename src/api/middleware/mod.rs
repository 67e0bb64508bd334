//! API middleware stack.
//!
//! Execution order on protected routes (outermost → innermost):
//! 1. Session validator: bearer token → `SessionContext`
//! 2. Access logger: logs after auth, has the username

pub mod audit;
pub mod auth;
