//! Application layer services implementing business logic.
//!
//! Services consume repository and sink traits and expose the operations the
//! HTTP layer and the admin CLI call directly.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Validated link CRUD (the link store)
//! - [`services::link_resolver::LinkResolver`] - Slug resolution, expiry and rotation
//! - [`services::click_tracker::ClickTracker`] - Non-blocking click hand-off
//! - [`services::auth_service::AuthService`] - Authoring API token check

pub mod services;
