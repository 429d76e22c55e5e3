//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod health;
pub mod links;
pub mod profiles;
pub mod redirect;

pub use auth::{login_handler, register_handler};
pub use health::health_handler;
pub use links::{create_link_handler, delete_link_handler, list_links_handler};
pub use profiles::profile_handler;
pub use redirect::redirect_handler;
