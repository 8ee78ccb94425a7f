//! # conjure-engine
//!
//! The expansion logic behind the `conjure` directives, kept free of any
//! `proc_macro` types so it can be driven from the proc-macro crate, the
//! `conjure` CLI, and plain unit tests alike.
//!
//! Every entry point is a pure function from input tokens to output tokens or
//! a [`Diagnostic`]:
//!
//! - [`initializer::expand`] - `#[public_init]`, constructor synthesis for
//!   structs with named fields
//! - [`encoding::expand`] - `obfuscate!`, literal reconstruction under one of
//!   five byte transforms
//! - [`selector::expand`] - `build_config!`, debug/release value selection
//!
//! Calls share no state. The only non-determinism is the random generator
//! passed to [`encoding::expand_with`] (or the thread-local one used by
//! [`encoding::expand`]).

pub mod encoding;
pub mod error;
pub mod initializer;
pub mod member;
pub mod record;
pub mod selector;

pub use encoding::{encode, EncodedArtifact, EncodingMode, EncodingRequest};
pub use error::{DecodeError, Diagnostic, ExpansionError, Result};
pub use initializer::{synthesize, SynthesizedInitializer};
pub use member::{Classification, MemberDescriptor};
pub use record::RecordDecl;
pub use selector::BranchSelection;
