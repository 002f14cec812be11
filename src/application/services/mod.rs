//! Business logic services for the application layer.

pub mod auth_service;
pub mod click_tracker;
pub mod link_resolver;
pub mod link_service;

pub use auth_service::AuthService;
pub use click_tracker::ClickTracker;
pub use link_resolver::{LinkResolver, ResolveError, ResolvedLink};
pub use link_service::LinkService;
