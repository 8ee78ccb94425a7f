//! Error types for directive expansion.
//!
//! Every failure is local to one expansion site. An [`ExpansionError`] says what
//! went wrong; a [`Diagnostic`] pins it to the span the compiler should point at.

use std::fmt;

use proc_macro2::{Span, TokenStream};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ExpansionError {
    #[error("#[public_init] can only be applied to structs with named fields, but `{name}` is {kind}")]
    UnsupportedDeclarationKind { name: String, kind: &'static str },

    #[error("obfuscate! requires a string literal as its first argument")]
    NotAStaticLiteral,

    #[error("{directive} requires both `debug:` and `release:` arguments, `{argument}:` is missing")]
    MissingRequiredArgument {
        directive: &'static str,
        argument: &'static str,
    },

    #[error("unknown key `{key}` in #[init(...)], expected `default`, `computed`, `get`, `set` or `skip`")]
    InvalidMemberAttribute { key: String },

    #[error("field `{name}` needs a declared type; use `#[init(skip)]` on a typed field to leave it out of `new`")]
    InferredFieldType { name: String },

    #[error("#[public_init] does not take arguments")]
    UnexpectedArguments,

    #[error(transparent)]
    Syntax(#[from] syn::Error),
}

impl ExpansionError {
    /// Attach the error to a source location.
    pub fn at(self, span: Span) -> Diagnostic {
        Diagnostic { error: self, span }
    }
}

/// An expansion failure together with the span it is reported at.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    error: ExpansionError,
    span: Span,
}

impl Diagnostic {
    pub fn error(&self) -> &ExpansionError {
        &self.error
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Render as `compile_error!` tokens for the compiler to report.
    pub fn to_compile_error(&self) -> TokenStream {
        match &self.error {
            // syn errors may carry several spans; keep them all.
            ExpansionError::Syntax(err) => err.to_compile_error(),
            other => syn::Error::new(self.span, other).to_compile_error(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for Diagnostic {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<syn::Error> for Diagnostic {
    fn from(err: syn::Error) -> Self {
        let span = err.span();
        ExpansionError::Syntax(err).at(span)
    }
}

/// Errors from decoding an [`EncodedArtifact`](crate::encoding::EncodedArtifact)
/// back into its literal.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("reconstructed bytes are not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("stored base64 text is invalid: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("{mode} artifact has no auxiliary value")]
    MissingAuxiliary { mode: &'static str },
}

pub type Result<T, E = Diagnostic> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_renders_compile_error() {
        let diagnostic = ExpansionError::NotAStaticLiteral.at(Span::call_site());
        let rendered = diagnostic.to_compile_error().to_string();
        assert!(rendered.contains("compile_error"));
        assert!(rendered.contains("requires a string literal"));
    }

    #[test]
    fn test_unsupported_kind_names_declaration() {
        let err = ExpansionError::UnsupportedDeclarationKind {
            name: "Shape".to_string(),
            kind: "an enum",
        };
        assert_eq!(
            err.to_string(),
            "#[public_init] can only be applied to structs with named fields, but `Shape` is an enum"
        );
    }

    #[test]
    fn test_syn_error_keeps_message() {
        let err = syn::parse_str::<syn::Expr>("1 +").unwrap_err();
        let message = err.to_string();
        let diagnostic = Diagnostic::from(err);
        assert!(matches!(diagnostic.error(), ExpansionError::Syntax(_)));
        assert_eq!(diagnostic.to_string(), message);
    }
}
