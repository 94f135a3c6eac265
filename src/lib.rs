//! Capsule Plugin SDK
//!
//! Host function bindings and the shared-memory transfer engine for Capsule
//! WASM plugins. Plugins depend on this crate to exchange data with the
//! Kernel across the WASM boundary: the host exposes only a narrow,
//! word-oriented primitive set (1-byte and 8-byte arena accessors plus a
//! handful of numbered entry points), and the SDK builds bulk transfers,
//! invocation I/O, variables, config, outbound HTTP, and logging on top of
//! it.
//!
//! On native targets the host bindings route to an in-process fake host
//! (see [`testing`]) so plugin logic can be unit-tested without a WASM
//! runtime.

mod abi;

pub mod config;
pub mod error;
pub mod http;
pub mod invocation;
pub mod logging;
pub mod memory;
pub mod vars;

#[cfg(not(target_arch = "wasm32"))]
pub mod testing;

pub use error::{Error, Result};
pub use memory::{Memory, MemoryHandle};

pub mod prelude {
    pub use crate::http::{self, HttpRequest, HttpResponse};
    pub use crate::invocation::{input, input_length, input_string, set_error, set_output};
    pub use crate::logging::{self, LogLevel};
    pub use crate::memory::{Memory, MemoryHandle};
    pub use crate::{Error, Result, config, vars};
}
