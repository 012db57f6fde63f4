//! System orchestration, startup, and shutdown logic.

pub mod directory_system;
pub mod logging;

pub use directory_system::*;
pub use logging::*;
