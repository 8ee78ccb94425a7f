//! # conjure-macros
//!
//! Procedural macros for compile-time code generation. The expansion logic
//! lives in `conjure-engine`; this crate only converts between
//! `proc_macro` and `proc_macro2` tokens and turns diagnostics into
//! `compile_error!`.
//!
//! Use the macros through the `conjure` crate: the `obfuscate!` expansion for
//! the base64 mode refers to `::conjure::__private`.
//!
//! ## Directives
//!
//! - `#[public_init]` - Generate a `pub fn new(..)` constructor for a struct
//! - `obfuscate!("literal")` / `obfuscate!("literal", Mode)` - Keep a string
//!   literal out of the binary's plain text
//! - `build_config!(debug: a, release: b)` - Pick a value by build profile

use proc_macro::TokenStream;
use quote::quote;

/// Generate a public constructor for a struct with named fields.
///
/// Every field becomes a parameter of `new`, in declaration order, unless it
/// is one of the following:
///
/// - `#[init(default = expr)]` - bound to `expr` inside `new`; a
///   `with_<field>(self, value)` method overrides it
/// - `#[init(computed = expr)]` or `#[init(get = expr)]` - computed from
///   `expr`, which may refer to the other fields by name; the `with_*`
///   methods compute it again after changing a field
/// - `#[init(skip)]` - filled from `default = expr` or `Default::default()`
/// - `PhantomData<..>` - filled with `PhantomData`
///
/// ```rust,ignore
/// use conjure::public_init;
///
/// #[public_init]
/// pub struct Session {
///     user_id: u64,
///     token: String,
///     #[init(default = 3600)]
///     ttl_secs: u32,
///     #[init(computed = format!("{user_id}:{token}"))]
///     key: String,
/// }
///
/// let session = Session::new(7, "abc".into()).with_ttl_secs(60);
/// ```
///
/// Applying it to anything other than a struct with named fields is a
/// compile error.
#[proc_macro_attribute]
pub fn public_init(attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = proc_macro2::TokenStream::from(item);
    match conjure_engine::initializer::expand(attr.into(), item.clone()) {
        Ok(expanded) => expanded.into(),
        Err(diagnostic) => {
            let error = diagnostic.to_compile_error();
            let recovered = conjure_engine::initializer::recover(item);
            quote! {
                #recovered
                #error
            }
            .into()
        }
    }
}

/// Replace a string literal with code that rebuilds it at run time.
///
/// The second argument names the mode; it defaults to `Xor`.
///
/// | Mode | Stored as |
/// |------|-----------|
/// | `Xor` | bytes XOR a random key, new key every build |
/// | `BitShift` | bytes rotated by a random amount, new amount every build |
/// | `Reversed` | UTF-8 bytes in reverse order |
/// | `Base64` | bytes of the base64 text |
/// | `Bytes` | plain UTF-8 bytes |
///
/// An unrecognized mode name selects `Base64`.
///
/// ```rust,ignore
/// use conjure::obfuscate;
///
/// let api_key: String = obfuscate!("sk-live-1234");
/// let banner: String = obfuscate!("Welcome", BitShift);
/// ```
///
/// This keeps literals out of `strings` output and hex dumps. It is not
/// encryption: the key ships in the same binary.
#[proc_macro]
pub fn obfuscate(input: TokenStream) -> TokenStream {
    conjure_engine::encoding::expand(input.into())
        .unwrap_or_else(|diagnostic| diagnostic.to_compile_error())
        .into()
}

/// Choose between two values by build profile.
///
/// ```rust,ignore
/// use conjure::build_config;
///
/// let base_url = build_config!(debug: "http://localhost:3000", release: "https://example.com");
/// ```
///
/// Both arguments are required and must have the same type. The debug value
/// is used when `debug_assertions` is enabled.
#[proc_macro]
pub fn build_config(input: TokenStream) -> TokenStream {
    conjure_engine::selector::expand(input.into())
        .unwrap_or_else(|diagnostic| diagnostic.to_compile_error())
        .into()
}
