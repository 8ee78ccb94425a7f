//! Two-branch value selection for `build_config!`.
//!
//! ```rust,ignore
//! let endpoint = build_config!(debug: "http://localhost:8080", release: "https://api.example.com");
//! ```
//!
//! Nothing is chosen at expansion time. Both labeled expressions are
//! re-embedded verbatim and `cfg(debug_assertions)` picks one when the
//! expansion is compiled.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Expr, Ident, Token};

use crate::error::{ExpansionError, Result};

const DIRECTIVE: &str = "build_config!";

/// One argument, labeled (`debug: expr`) or not.
#[derive(Debug)]
pub struct Argument {
    pub label: Option<Ident>,
    pub value: Expr,
}

impl Parse for Argument {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let label = if input.peek(Ident) && input.peek2(Token![:]) && !input.peek2(Token![::]) {
            let label: Ident = input.parse()?;
            input.parse::<Token![:]>()?;
            Some(label)
        } else {
            None
        };
        let value = input.parse()?;
        Ok(Argument { label, value })
    }
}

#[derive(Debug, Clone)]
pub struct BranchSelection {
    pub debug: Expr,
    pub release: Expr,
}

impl BranchSelection {
    /// Pick out the `debug:` and `release:` arguments. Other arguments are
    /// ignored and a repeated label keeps its last value.
    pub fn from_arguments(arguments: impl IntoIterator<Item = Argument>, span: Span) -> Result<Self> {
        let mut debug = None;
        let mut release = None;

        for argument in arguments {
            let Some(label) = &argument.label else {
                continue;
            };
            if label == "debug" {
                debug = Some(argument.value);
            } else if label == "release" {
                release = Some(argument.value);
            }
        }

        let missing = |argument| {
            ExpansionError::MissingRequiredArgument {
                directive: DIRECTIVE,
                argument,
            }
            .at(span)
        };

        Ok(BranchSelection {
            debug: debug.ok_or_else(|| missing("debug"))?,
            release: release.ok_or_else(|| missing("release"))?,
        })
    }

    pub fn render(&self) -> TokenStream {
        let debug = &self.debug;
        let release = &self.release;
        let value = Ident::new("value", Span::mixed_site());
        quote! {{
            #[cfg(debug_assertions)]
            let #value = #debug;
            #[cfg(not(debug_assertions))]
            let #value = #release;
            #value
        }}
    }
}

/// Expand `build_config!`.
pub fn expand(input: TokenStream) -> Result<TokenStream> {
    let arguments = syn::parse::Parser::parse2(
        Punctuated::<Argument, Token![,]>::parse_terminated,
        input,
    )?;
    let selection = BranchSelection::from_arguments(arguments, Span::call_site())?;
    tracing::debug!("expanded {DIRECTIVE}");
    Ok(selection.render())
}
