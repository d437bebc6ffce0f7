//! Core modules for the keymouse keyboard-to-pointer application.
//!
//! Everything platform independent lives here so it can be tested on any
//! host. The Windows hooks and injector are part of the binary.

pub mod config;
pub mod error;
pub mod motion;
pub mod scheduler;
pub mod state;
pub mod util;
pub mod vector;

// Re-export types for test modules
pub use config::AppConfig;
pub use error::InterceptError;
pub use state::{Interceptor, MotionSettings, PointerSink};
pub use vector::Vec2;
