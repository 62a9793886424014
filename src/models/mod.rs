//! Data models for the demo preview service.
//!
//! Field names serialize in camelCase to match the admin UI's interfaces.

mod mode;
mod profile;
mod records;
mod role;
mod session;

pub use mode::*;
pub use profile::*;
pub use records::*;
pub use role::*;
pub use session::*;
