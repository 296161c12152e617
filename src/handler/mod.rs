//! Request handler module
//!
//! Routes requests to the template API, the landing page, and static assets.

pub mod api;
pub mod router;
pub mod static_files;

pub use router::handle_request;
