//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for link storage and click analytics.
//!
//! # Modules
//!
//! - [`analytics`] - Click sinks (Umami and no-op implementations)
//! - [`persistence`] - PostgreSQL and in-memory repository implementations

pub mod analytics;
pub mod persistence;
