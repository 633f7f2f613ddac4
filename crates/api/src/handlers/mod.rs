//! Request handlers for the validation service.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the core engine and map errors via
//! [`AppError`](crate::error::AppError).

pub mod schemas;
pub mod validate;
