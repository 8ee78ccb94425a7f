//! Lowering of Rust items into record declarations.
//!
//! Only structs with named fields are records. Each field becomes a
//! [`MemberDescriptor`]:
//!
//! - `#[init(default = expr)]` attaches a default value
//! - `#[init(computed = expr)]` makes it a shorthand computed member
//! - `#[init(get = expr)]` / `#[init(get = expr, set)]` gives it an explicit accessor list
//! - `#[init(skip)]` leaves it out of `new`, filled from its default or
//!   `Default::default()`
//! - a `PhantomData<..>` type marks it static (no per-instance storage)
//!
//! A field typed `_` is rejected: struct fields always need a declared type.

use proc_macro2::Span;
use quote::ToTokens;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, Fields, Generics, Ident, Item, ItemStruct, Type};

use crate::error::{ExpansionError, Result};
use crate::member::{Accessor, AccessorBlock, AccessorKind, MemberDescriptor};

/// Helper attribute read from struct fields.
pub const MEMBER_ATTRIBUTE: &str = "init";

/// A struct with named fields, lowered for synthesis.
#[derive(Debug, Clone)]
pub struct RecordDecl {
    pub ident: Ident,
    pub generics: Generics,
    pub members: Vec<MemberDescriptor>,
}

impl RecordDecl {
    pub fn from_item(item: &Item) -> Result<Self> {
        match item {
            Item::Struct(item_struct) => Self::from_struct(item_struct),
            other => {
                let (name, kind) = describe_item(other);
                Err(ExpansionError::UnsupportedDeclarationKind { name, kind }.at(other.span()))
            }
        }
    }

    pub fn from_struct(item: &ItemStruct) -> Result<Self> {
        let Fields::Named(named) = &item.fields else {
            let kind = match item.fields {
                Fields::Unnamed(_) => "a tuple struct",
                _ => "a unit struct",
            };
            return Err(ExpansionError::UnsupportedDeclarationKind {
                name: item.ident.to_string(),
                kind,
            }
            .at(item.ident.span()));
        };

        let members = named
            .named
            .iter()
            .filter_map(|field| {
                let name = field.ident.clone()?;
                Some(lower_member(name, &field.ty, &field.attrs))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            ident: item.ident.clone(),
            generics: item.generics.clone(),
            members,
        })
    }
}

fn lower_member(name: Ident, ty: &Type, attrs: &[Attribute]) -> Result<MemberDescriptor> {
    if let Type::Infer(_) = ty {
        return Err(ExpansionError::InferredFieldType {
            name: name.to_string(),
        }
        .at(ty.span()));
    }

    let mut member = MemberDescriptor::stored(name, ty.clone());
    if is_phantom_data(ty) {
        member = member.into_static();
    }

    for attr in attrs.iter().filter(|a| a.path().is_ident(MEMBER_ATTRIBUTE)) {
        apply_member_attribute(&mut member, attr)?;
    }

    Ok(member)
}

fn apply_member_attribute(member: &mut MemberDescriptor, attr: &Attribute) -> Result<()> {
    let mut getter: Option<Expr> = None;
    let mut setter = false;
    let mut unknown: Option<(String, Span)> = None;

    let parsed = attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("default") {
            member.default_value = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("computed") {
            let body: Expr = meta.value()?.parse()?;
            member.accessors = Some(AccessorBlock::ImplicitGetter(body));
        } else if meta.path.is_ident("get") {
            getter = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("set") {
            setter = true;
        } else if meta.path.is_ident("skip") {
            member.declared_type = None;
        } else {
            let key = meta.path.to_token_stream().to_string().replace(' ', "");
            unknown = Some((key, meta.path.span()));
            return Err(meta.error("unknown key"));
        }
        Ok(())
    });

    if let Some((key, span)) = unknown {
        return Err(ExpansionError::InvalidMemberAttribute { key }.at(span));
    }
    parsed?;

    if getter.is_some() || setter {
        let mut list = Vec::new();
        if let Some(body) = getter {
            list.push(Accessor {
                kind: AccessorKind::Getter,
                body: Some(body),
            });
        }
        if setter {
            list.push(Accessor {
                kind: AccessorKind::Setter,
                body: None,
            });
        }
        member.accessors = Some(AccessorBlock::Explicit(list));
    }

    Ok(())
}

fn is_phantom_data(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "PhantomData"),
        _ => false,
    }
}

/// Remove the member helper attributes so the struct can be re-emitted as-is.
pub fn strip_member_attributes(item: &mut ItemStruct) {
    for field in item.fields.iter_mut() {
        field.attrs.retain(|a| !a.path().is_ident(MEMBER_ATTRIBUTE));
    }
}

fn describe_item(item: &Item) -> (String, &'static str) {
    match item {
        Item::Enum(i) => (i.ident.to_string(), "an enum"),
        Item::Union(i) => (i.ident.to_string(), "a union"),
        Item::Trait(i) => (i.ident.to_string(), "a trait"),
        Item::Type(i) => (i.ident.to_string(), "a type alias"),
        Item::Fn(i) => (i.sig.ident.to_string(), "a function"),
        Item::Mod(i) => (i.ident.to_string(), "a module"),
        Item::Const(i) => (i.ident.to_string(), "a constant"),
        Item::Static(i) => (i.ident.to_string(), "a static"),
        Item::Impl(i) => (
            i.self_ty.to_token_stream().to_string().replace(' ', ""),
            "an impl block",
        ),
        _ => ("<item>".to_string(), "not a struct"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::Classification;
    use syn::parse_quote;

    fn classes(record: &RecordDecl) -> Vec<(String, Classification)> {
        record
            .members
            .iter()
            .map(|m| (m.name.to_string(), m.classify()))
            .collect()
    }

    #[test]
    fn test_lowers_field_shapes() {
        let item: ItemStruct = parse_quote! {
            struct Profile<T> {
                id: u64,
                #[init(default = true)]
                flag: bool,
                #[init(computed = id * 2)]
                doubled: u64,
                #[init(get = id.to_string(), set)]
                label: String,
                marker: std::marker::PhantomData<T>,
                #[init(skip, default = Vec::new())]
                cache: Vec<u8>,
            }
        };
        let record = RecordDecl::from_struct(&item).unwrap();

        assert_eq!(record.ident, "Profile");
        assert_eq!(
            classes(&record),
            vec![
                ("id".to_string(), Classification::Included),
                ("flag".to_string(), Classification::Included),
                ("doubled".to_string(), Classification::Computed),
                ("label".to_string(), Classification::Computed),
                ("marker".to_string(), Classification::Static),
                ("cache".to_string(), Classification::Untyped),
            ]
        );
        assert!(record.members[1].default_value.is_some());
        assert!(record.members[5].default_value.is_some());
    }

    #[test]
    fn test_rejects_inferred_field_type() {
        let item: ItemStruct = parse_quote! {
            struct Cache {
                id: u32,
                items: _,
            }
        };
        let err = RecordDecl::from_struct(&item).unwrap_err();
        match err.error() {
            ExpansionError::InferredFieldType { name } => assert_eq!(name, "items"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("#[init(skip)]"));
    }

    #[test]
    fn test_set_only_keeps_member_stored() {
        let item: ItemStruct = parse_quote! {
            struct Observed {
                #[init(set)]
                level: u8,
            }
        };
        let record = RecordDecl::from_struct(&item).unwrap();
        assert_eq!(record.members[0].classify(), Classification::Included);
    }

    #[test]
    fn test_rejects_enum() {
        let item: Item = parse_quote! {
            enum Shape { Circle, Square }
        };
        let err = RecordDecl::from_item(&item).unwrap_err();
        match err.error() {
            ExpansionError::UnsupportedDeclarationKind { name, kind } => {
                assert_eq!(name, "Shape");
                assert_eq!(*kind, "an enum");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_tuple_struct() {
        let item: Item = parse_quote! {
            struct Meters(f64);
        };
        let err = RecordDecl::from_item(&item).unwrap_err();
        assert!(err.to_string().contains("`Meters` is a tuple struct"));
    }

    #[test]
    fn test_unknown_member_key_is_reported() {
        let item: ItemStruct = parse_quote! {
            struct Bad {
                #[init(fallback = 3)]
                value: u8,
            }
        };
        let err = RecordDecl::from_struct(&item).unwrap_err();
        match err.error() {
            ExpansionError::InvalidMemberAttribute { key } => assert_eq!(key, "fallback"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_strip_member_attributes_keeps_others() {
        let mut item: ItemStruct = parse_quote! {
            struct Config {
                #[serde(default)]
                #[init(default = 30)]
                timeout: u32,
            }
        };
        strip_member_attributes(&mut item);
        let field = item.fields.iter().next().unwrap();
        assert_eq!(field.attrs.len(), 1);
        assert!(field.attrs[0].path().is_ident("serde"));
    }
}
