//! Business logic services for the application layer.

pub mod auth_service;
pub mod code_allocator;
pub mod link_service;
pub mod profile_service;
pub mod redirect_service;
pub mod token_service;

pub use auth_service::AuthService;
pub use code_allocator::CodeAllocator;
pub use link_service::LinkService;
pub use profile_service::{Profile, ProfileService};
pub use redirect_service::{ClientInfo, RedirectService, RedirectTarget};
pub use token_service::{IssuedToken, TokenService};
