#![doc = "The `formforge` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, storage backends, authentication, rate limiting,"]
#![doc = "routing configuration, and error handling for the formforge forms API."]
#![doc = "It is used by the main binary (`main.rs`) to construct and run the application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod security;
pub mod store;

pub use crate::error::AppError;
