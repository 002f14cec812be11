//! HTTP layer: redirect endpoint, health check and the authoring API.
//!
//! # Modules
//!
//! - [`dispatch`] - Resolution result to HTTP response
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Authentication and tracing middleware
//! - [`routes`] - Authoring API route table

pub mod dispatch;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
