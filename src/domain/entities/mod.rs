//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`User`] - An account that owns links
//! - [`Link`] - A short code mapped to a target URL
//! - [`Click`] - A redirect event on a link
//!
//! Entities follow the "New Type" pattern with separate structs for creation
//! (`NewUser`, `NewLink`, `NewClick`).

pub mod click;
pub mod link;
pub mod user;

pub use click::{Click, NewClick};
pub use link::{Link, LinkWithClicks, NewLink};
pub use user::{NewUser, User};
