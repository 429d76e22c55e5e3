//! Domain layer containing business entities and logic.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_recorder`] - Non-blocking click recording
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Business logic is encapsulated in services (see [`crate::application::services`])
//!
//! # Click Processing Flow
//!
//! 1. Redirect resolver finds the link for a code
//! 2. [`click_recorder::ClickRecorder::record`] spawns a detached write
//! 3. The redirect response is returned without waiting
//! 4. The click is persisted via [`repositories::ClickRepository`], or dropped on failure

pub mod click_recorder;
pub mod entities;
pub mod repositories;
