//! Public runtime API surface.

pub mod errors;
pub mod handle;

pub use errors::RuntimeError;
pub use handle::EngineHandle;
