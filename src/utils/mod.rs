//! Utility functions for slug, URL, timestamp and request metadata handling.

pub mod client_info;
pub mod slug;
pub mod timestamp;
pub mod url_validator;
