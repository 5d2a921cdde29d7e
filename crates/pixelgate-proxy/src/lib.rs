// Library exports for integration tests and library consumers

pub mod config;
pub mod error;
pub mod geofence;
pub mod proxy;
