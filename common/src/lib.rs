// Data-access layer for the LightBnB listing application

pub mod bootstrap;
pub mod config;
pub mod db;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod telemetry;

pub use db::repositories::DEFAULT_LIMIT;
pub use errors::{DatabaseError, ValidationError};
pub use gateway::{ListingStore, QueryGateway};
