//! Domain layer containing business entities and logic.
//!
//! This module defines the typed link record, the errors raised at the store
//! boundary, the repository and click-sink interfaces, and the background
//! worker that delivers click events. It has no dependency on HTTP handlers.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`errors`] - Write-time validation and storage errors
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click tracking event model
//! - [`click_sink`] - Analytics sink interface
//! - [`click_worker`] - Asynchronous click delivery worker
//!
//! # Click Processing Flow
//!
//! 1. Redirect handler resolves a slug
//! 2. [`click_event::ClickEvent`] is pushed onto a bounded channel (non-blocking)
//! 3. [`click_worker::run_click_worker`] delivers events with a per-call timeout
//! 4. The event is handed to a [`click_sink::ClickSink`] (Umami, or a no-op sink)

pub mod click_event;
pub mod click_sink;
pub mod click_worker;
pub mod entities;
pub mod errors;
pub mod repositories;
