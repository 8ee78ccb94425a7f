//! # conjure
//!
//! Small compile-time directives that expand into plain Rust.
//!
//! ## Features
//!
//! - **`macros`** (default) - `#[public_init]`, `obfuscate!`, `build_config!`
//! - **`engine`** - the expansion engine itself, for tools that inspect
//!   expansions outside the compiler
//!
//! ## Example
//!
//! ```rust,ignore
//! use conjure::prelude::*;
//!
//! #[public_init]
//! pub struct Endpoint {
//!     host: String,
//!     #[init(default = 443)]
//!     port: u16,
//! }
//!
//! let endpoint = Endpoint::new(build_config!(debug: "localhost".into(), release: obfuscate!("api.example.com")));
//! assert_eq!(endpoint.port, 443);
//! ```

// Re-export macros
#[cfg(feature = "macros")]
pub use conjure_macros::{build_config, obfuscate, public_init};

// Re-export the expansion engine
#[cfg(feature = "engine")]
pub use conjure_engine as engine;

/// Prelude module for convenient imports
pub mod prelude {
    #[cfg(feature = "macros")]
    pub use conjure_macros::{build_config, obfuscate, public_init};

    #[cfg(feature = "engine")]
    pub use conjure_engine::{EncodingMode, EncodingRequest};
}

/// Support code referenced by macro expansions. Not a public API.
#[doc(hidden)]
#[cfg(feature = "runtime")]
pub mod __private {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    /// Rebuild a literal stored in the base64 mode.
    ///
    /// The bytes always come from `obfuscate!`, which only stores valid
    /// base64 of valid UTF-8, so the lossy paths never trigger.
    pub fn decode_base64(encoded: &[u8]) -> String {
        let decoded = STANDARD.decode(encoded).unwrap_or_default();
        String::from_utf8_lossy(&decoded).into_owned()
    }

}
