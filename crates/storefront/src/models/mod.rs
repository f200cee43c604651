//! Client-side domain models.
//!
//! # Models
//!
//! - `session` - Explicit session context handed to authenticated operations

pub mod session;

pub use session::Session;
