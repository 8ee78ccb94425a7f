//! Literal encoding for `obfuscate!`.
//!
//! A string literal is turned into a byte array plus a block expression that
//! rebuilds the original `String` at run time. Five reversible transforms are
//! available:
//!
//! | Mode | Stored bytes | Auxiliary value |
//! |------|--------------|-----------------|
//! | [`Bytes`](EncodingMode::Bytes) | UTF-8 bytes as-is | none |
//! | [`Reversed`](EncodingMode::Reversed) | UTF-8 bytes in reverse order | none |
//! | [`Base64`](EncodingMode::Base64) | bytes of the standard base64 text | none |
//! | [`Xor`](EncodingMode::Xor) (default) | each byte XOR a key | key in `1..=255` |
//! | [`BitShift`](EncodingMode::BitShift) | each byte rotated left | shift in `1..=7` |
//!
//! The XOR key and the rotation are drawn once per expansion from the caller's
//! random generator and written into the expansion as constants, so one build
//! always decodes the same way while separate builds store different bytes.
//! This hides literals from casual inspection of a binary. It is not
//! encryption.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use rand::Rng;
use syn::parse::{Parse, ParseStream};
use syn::spanned::Spanned;
use syn::{Expr, ExprLit, Lit, Token};

use crate::error::{DecodeError, ExpansionError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncodingMode {
    Bytes,
    Reversed,
    Base64,
    #[default]
    Xor,
    BitShift,
}

impl EncodingMode {
    pub const ALL: [EncodingMode; 5] = [
        EncodingMode::Bytes,
        EncodingMode::Reversed,
        EncodingMode::Base64,
        EncodingMode::Xor,
        EncodingMode::BitShift,
    ];

    /// Strict lookup. Case and underscores are ignored, so `BitShift`,
    /// `bit_shift` and `bitShift` all match.
    pub fn parse_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "bytes" => Some(EncodingMode::Bytes),
            "reversed" => Some(EncodingMode::Reversed),
            "base64" => Some(EncodingMode::Base64),
            "xor" => Some(EncodingMode::Xor),
            "bitshift" => Some(EncodingMode::BitShift),
            _ => None,
        }
    }

    /// Lookup used by the directive: an unrecognized name selects
    /// [`EncodingMode::Base64`]. This fallback is part of the directive's
    /// observable behavior, not an error path.
    pub fn from_name(name: &str) -> Self {
        Self::parse_name(name).unwrap_or(EncodingMode::Base64)
    }

    /// Mode named by a directive argument. A path is read through its last
    /// segment (`Mode::Xor` and `xor` are the same); an argument that is not a
    /// path at all keeps the default.
    pub fn from_expr(expr: &Expr) -> Self {
        match expr {
            Expr::Path(path) => match path.path.segments.last() {
                Some(segment) => Self::from_name(&segment.ident.to_string()),
                None => Self::default(),
            },
            Expr::Paren(inner) => Self::from_expr(&inner.expr),
            Expr::Group(inner) => Self::from_expr(&inner.expr),
            _ => Self::default(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EncodingMode::Bytes => "bytes",
            EncodingMode::Reversed => "reversed",
            EncodingMode::Base64 => "base64",
            EncodingMode::Xor => "xor",
            EncodingMode::BitShift => "bit_shift",
        }
    }

    /// Whether the mode draws an auxiliary value per expansion.
    pub fn is_randomized(self) -> bool {
        matches!(self, EncodingMode::Xor | EncodingMode::BitShift)
    }
}

impl fmt::Display for EncodingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A literal to encode and the mode to encode it with.
#[derive(Debug, Clone)]
pub struct EncodingRequest {
    literal: String,
    mode: EncodingMode,
}

impl EncodingRequest {
    pub fn new(literal: impl Into<String>, mode: EncodingMode) -> Self {
        Self {
            literal: literal.into(),
            mode,
        }
    }

    /// Accepts only a string literal; anything computed is rejected because
    /// its bytes are not known at expansion time.
    pub fn from_expr(expr: &Expr, mode: EncodingMode) -> Result<Self> {
        match expr {
            Expr::Lit(ExprLit {
                lit: Lit::Str(lit), ..
            }) => Ok(Self::new(lit.value(), mode)),
            Expr::Group(group) => Self::from_expr(&group.expr, mode),
            other => Err(ExpansionError::NotAStaticLiteral.at(other.span())),
        }
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn mode(&self) -> EncodingMode {
        self.mode
    }
}

/// Transformed bytes plus what is needed to undo the transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArtifact {
    mode: EncodingMode,
    bytes: Vec<u8>,
    auxiliary: Option<u8>,
}

impl EncodedArtifact {
    pub fn mode(&self) -> EncodingMode {
        self.mode
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// XOR key or rotation amount; `None` for the deterministic modes.
    pub fn auxiliary(&self) -> Option<u8> {
        self.auxiliary
    }

    fn require_auxiliary(&self) -> Result<u8, DecodeError> {
        self.auxiliary.ok_or(DecodeError::MissingAuxiliary {
            mode: self.mode.as_str(),
        })
    }

    /// Apply the reconstruction rule in-process. Mirrors the code emitted by
    /// [`EncodedArtifact::reconstruction`].
    pub fn decode(&self) -> Result<String, DecodeError> {
        let bytes = match self.mode {
            EncodingMode::Bytes => self.bytes.clone(),
            EncodingMode::Reversed => self.bytes.iter().rev().copied().collect(),
            EncodingMode::Base64 => {
                let text = String::from_utf8(self.bytes.clone())?;
                STANDARD.decode(text)?
            }
            EncodingMode::Xor => {
                let key = self.require_auxiliary()?;
                self.bytes.iter().map(|b| b ^ key).collect()
            }
            EncodingMode::BitShift => {
                let shift = u32::from(self.require_auxiliary()?);
                self.bytes.iter().map(|b| b.rotate_right(shift)).collect()
            }
        };
        Ok(String::from_utf8(bytes)?)
    }

    /// Block expression of type `String` that rebuilds the literal.
    ///
    /// The base64 mode calls `::conjure::__private::decode_base64`; the other
    /// modes only use `core` and `std`.
    pub fn reconstruction(&self) -> TokenStream {
        let bytes = &self.bytes;
        let len = bytes.len();
        let array = quote! { const BYTES: [u8; #len] = [#(#bytes),*]; };

        match (self.mode, self.auxiliary) {
            (EncodingMode::Bytes, _) => quote! {{
                #array
                ::std::string::String::from_utf8_lossy(&BYTES).into_owned()
            }},
            (EncodingMode::Reversed, _) => quote! {{
                #array
                let mut decoded = BYTES.to_vec();
                decoded.reverse();
                ::std::string::String::from_utf8_lossy(&decoded).into_owned()
            }},
            (EncodingMode::Base64, _) => quote! {{
                #array
                ::conjure::__private::decode_base64(&BYTES)
            }},
            (EncodingMode::Xor, key) => {
                let key = key.unwrap_or_default();
                quote! {{
                    #array
                    const KEY: u8 = #key;
                    let decoded: ::std::vec::Vec<u8> = BYTES.iter().map(|byte| byte ^ KEY).collect();
                    ::std::string::String::from_utf8_lossy(&decoded).into_owned()
                }}
            }
            (EncodingMode::BitShift, shift) => {
                let shift = u32::from(shift.unwrap_or_default());
                quote! {{
                    #array
                    const SHIFT: u32 = #shift;
                    let decoded: ::std::vec::Vec<u8> =
                        BYTES.iter().map(|byte| byte.rotate_right(SHIFT)).collect();
                    ::std::string::String::from_utf8_lossy(&decoded).into_owned()
                }}
            }
        }
    }
}

/// Encode a literal, drawing the auxiliary value (if the mode needs one) from
/// `rng`. Each call draws independently.
pub fn encode<R: Rng + ?Sized>(request: &EncodingRequest, rng: &mut R) -> EncodedArtifact {
    let source = request.literal.as_bytes();
    let mode = request.mode;

    let (bytes, auxiliary) = match mode {
        EncodingMode::Bytes => (source.to_vec(), None),
        EncodingMode::Reversed => (source.iter().rev().copied().collect(), None),
        EncodingMode::Base64 => (STANDARD.encode(source).into_bytes(), None),
        EncodingMode::Xor => {
            let key: u8 = rng.gen_range(1..=255);
            (source.iter().map(|b| b ^ key).collect(), Some(key))
        }
        EncodingMode::BitShift => {
            let shift: u8 = rng.gen_range(1..=7);
            let bytes = source
                .iter()
                .map(|b| b.rotate_left(u32::from(shift)))
                .collect();
            (bytes, Some(shift))
        }
    };

    tracing::debug!(
        mode = mode.as_str(),
        literal_len = source.len(),
        stored_len = bytes.len(),
        "encoded literal"
    );

    EncodedArtifact {
        mode,
        bytes,
        auxiliary,
    }
}

/// Arguments of `obfuscate!`: a literal and an optional mode.
#[derive(Debug)]
pub struct ObfuscateArgs {
    pub literal: Expr,
    pub mode: Option<Expr>,
}

impl Parse for ObfuscateArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let literal: Expr = input.parse()?;
        let mut mode = None;
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            if !input.is_empty() {
                mode = Some(input.parse()?);
                if input.peek(Token![,]) {
                    input.parse::<Token![,]>()?;
                }
            }
        }
        Ok(ObfuscateArgs { literal, mode })
    }
}

impl ObfuscateArgs {
    pub fn into_request(self) -> Result<EncodingRequest> {
        let mode = self
            .mode
            .as_ref()
            .map(EncodingMode::from_expr)
            .unwrap_or_default();
        EncodingRequest::from_expr(&self.literal, mode)
    }
}

/// Expand `obfuscate!` with an explicit random generator.
pub fn expand_with<R: Rng + ?Sized>(input: TokenStream, rng: &mut R) -> Result<TokenStream> {
    if input.is_empty() {
        return Err(ExpansionError::NotAStaticLiteral.at(Span::call_site()));
    }
    let args: ObfuscateArgs = syn::parse2(input)?;
    let request = args.into_request()?;
    Ok(encode(&request, rng).reconstruction())
}

/// Expand `obfuscate!` using the thread-local generator.
pub fn expand(input: TokenStream) -> Result<TokenStream> {
    expand_with(input, &mut rand::thread_rng())
}
