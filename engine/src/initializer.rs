//! Initializer synthesis for `#[public_init]`.
//!
//! [`synthesize`] applies the classification policy to a [`RecordDecl`] and
//! produces the parameter and assignment lists. [`render`] turns that into an
//! inherent `impl` with a `pub fn new(..)` constructor:
//!
//! ```rust,ignore
//! #[public_init]
//! pub struct Account {
//!     id: u64,
//!     name: Option<String>,
//!     #[init(default = true)]
//!     active: bool,
//! }
//!
//! // expands to the struct plus
//! impl Account {
//!     pub fn new(id: u64, name: Option<String>) -> Self {
//!         let active: bool = true;
//!         Self { id, name, active }
//!     }
//!
//!     pub fn with_active(mut self, active: bool) -> Self {
//!         self.active = active;
//!         self
//!     }
//! }
//! ```
//!
//! Parameters with a default are not part of `new`'s signature; they are bound
//! from their default and can be overridden through the `with_*` methods.
//! When the struct has computed members, each override rebuilds the value and
//! evaluates those members again:
//!
//! ```rust,ignore
//! pub fn with_width(self, width: u32) -> Self {
//!     let Self { width: _, height, area: _ } = self;
//!     let area: u32 = width * height;
//!     Self { width, height, area }
//! }
//! ```

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Expr, Ident, Item, Type};

use crate::error::{ExpansionError, Result};
use crate::member::{Classification, MemberDescriptor};
use crate::record::{strip_member_attributes, RecordDecl};

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: Ident,
    pub ty: Type,
    pub default: Option<Expr>,
}

/// `self.field = parameter`
#[derive(Debug, Clone)]
pub struct Assignment {
    pub field: Ident,
    pub parameter: Ident,
}

#[derive(Debug, Clone)]
pub struct SynthesizedInitializer {
    pub parameters: Vec<Parameter>,
    pub assignments: Vec<Assignment>,
}

impl SynthesizedInitializer {
    /// Parameters that must be passed to `new`.
    pub fn required(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.default.is_none())
    }

    /// Parameters bound from their default value.
    pub fn defaulted(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.default.is_some())
    }
}

/// Build the initializer for a record, keeping declaration order.
pub fn synthesize(record: &RecordDecl) -> SynthesizedInitializer {
    let mut parameters = Vec::new();
    let mut assignments = Vec::new();

    for member in &record.members {
        let class = member.classify();
        tracing::trace!(record = %record.ident, member = %member.name, class = class.as_str());
        if !class.is_included() {
            continue;
        }
        let Some(ty) = member.declared_type.clone() else {
            continue;
        };
        parameters.push(Parameter {
            name: member.name.clone(),
            ty,
            default: member.default_value.clone(),
        });
        assignments.push(Assignment {
            field: member.name.clone(),
            parameter: member.name.clone(),
        });
    }

    tracing::debug!(
        record = %record.ident,
        members = record.members.len(),
        parameters = parameters.len(),
        "synthesized initializer"
    );

    SynthesizedInitializer {
        parameters,
        assignments,
    }
}

/// Lower an item and synthesize its initializer.
pub fn synthesize_item(item: &Item) -> Result<SynthesizedInitializer> {
    RecordDecl::from_item(item).map(|record| synthesize(&record))
}

/// Value for a field that is not a constructor parameter.
fn fill_expression(member: &MemberDescriptor) -> TokenStream {
    match member.classify() {
        Classification::Static => quote! { ::core::marker::PhantomData },
        Classification::Computed => match member.getter_body() {
            Some(body) => quote! { #body },
            None => quote! { ::core::default::Default::default() },
        },
        _ => match &member.default_value {
            Some(value) => quote! { #value },
            None => quote! { ::core::default::Default::default() },
        },
    }
}

/// `let` binding that fills a non-parameter field.
fn fill_binding(member: &MemberDescriptor) -> TokenStream {
    let name = &member.name;
    let value = fill_expression(member);
    match (&member.declared_type, member.classify()) {
        (Some(ty), Classification::Computed) => quote! { let #name: #ty = #value; },
        _ => quote! { let #name = #value; },
    }
}

/// `with_*` override for a defaulted parameter. Computed members are
/// evaluated again after the new value is in place, so they never hold a
/// value derived from the default.
fn render_override(record: &RecordDecl, parameter: &Parameter) -> TokenStream {
    let name = &parameter.name;
    let ty = &parameter.ty;
    let method = format_ident!("with_{}", name.unraw());
    let doc = format!("Overrides the default value of `{}`.", name.unraw());

    let computed: Vec<&MemberDescriptor> = record
        .members
        .iter()
        .filter(|m| m.classify() == Classification::Computed)
        .collect();

    if computed.is_empty() {
        return quote! {
            #[doc = #doc]
            #[must_use]
            pub fn #method(mut self, #name: #ty) -> Self {
                self.#name = #name;
                self
            }
        };
    }

    let patterns = record.members.iter().map(|m| {
        let field = &m.name;
        if field == name || m.classify() == Classification::Computed {
            quote! { #field: _ }
        } else {
            quote! { #field }
        }
    });
    let recomputed = computed.iter().map(|m| fill_binding(m));
    let fields = record.members.iter().map(|m| &m.name);

    quote! {
        #[doc = #doc]
        #[must_use]
        pub fn #method(self, #name: #ty) -> Self {
            let Self { #(#patterns),* } = self;
            #(#recomputed)*
            Self { #(#fields),* }
        }
    }
}

/// Render the constructor `impl` block.
pub fn render(record: &RecordDecl, init: &SynthesizedInitializer) -> TokenStream {
    let ident = &record.ident;
    let (impl_generics, ty_generics, where_clause) = record.generics.split_for_impl();

    let required = init.required().map(|p| {
        let name = &p.name;
        let ty = &p.ty;
        quote! { #name: #ty }
    });

    let defaulted_bindings = init.defaulted().map(|p| {
        let name = &p.name;
        let ty = &p.ty;
        let default = &p.default;
        quote! { let #name: #ty = #default; }
    });

    let parameter_names: Vec<&Ident> = init.parameters.iter().map(|p| &p.name).collect();
    let fill_bindings = record
        .members
        .iter()
        .filter(|m| !parameter_names.contains(&&m.name))
        .map(fill_binding);

    let field_inits = record.members.iter().map(|m| {
        let field = &m.name;
        match init.assignments.iter().find(|a| &a.field == field) {
            Some(assignment) => {
                let parameter = &assignment.parameter;
                quote! { #field: #parameter }
            }
            None => quote! { #field: #field },
        }
    });

    let overrides = init.defaulted().map(|p| render_override(record, p));

    let doc = format!("Creates a new `{}`.", ident);

    quote! {
        impl #impl_generics #ident #ty_generics #where_clause {
            #[doc = #doc]
            #[allow(clippy::too_many_arguments)]
            pub fn new(#(#required),*) -> Self {
                #(#defaulted_bindings)*
                #(#fill_bindings)*
                Self {
                    #(#field_inits),*
                }
            }

            #(#overrides)*
        }
    }
}

/// Expand `#[public_init]`: the struct is re-emitted without its helper
/// attributes, followed by the constructor `impl`.
pub fn expand(attr: TokenStream, item: TokenStream) -> Result<TokenStream> {
    if let Some(first) = attr.into_iter().next() {
        return Err(ExpansionError::UnexpectedArguments.at(first.span()));
    }

    let item: Item = syn::parse2(item)?;
    let record = RecordDecl::from_item(&item)?;
    let init = synthesize(&record);
    let constructor = render(&record, &init);

    let Item::Struct(mut item_struct) = item else {
        // from_item only accepts structs
        return Err(ExpansionError::UnsupportedDeclarationKind {
            name: record.ident.to_string(),
            kind: "not a struct",
        }
        .at(Span::call_site()));
    };
    strip_member_attributes(&mut item_struct);

    Ok(quote! {
        #item_struct
        #constructor
    })
}

/// Tokens to emit next to a diagnostic: the original item, minus helper
/// attributes when it is a struct, so the error is not buried under
/// follow-up errors.
pub fn recover(item: TokenStream) -> TokenStream {
    match syn::parse2::<Item>(item.clone()) {
        Ok(Item::Struct(mut item_struct)) => {
            strip_member_attributes(&mut item_struct);
            quote! { #item_struct }
        }
        _ => item,
    }
}
