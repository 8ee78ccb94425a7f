//! Member descriptors and the classification policy for initializer synthesis.
//!
//! The policy works on [`MemberDescriptor`] values rather than on syntax nodes,
//! so it can be exercised without building a struct. Lowering from a parsed
//! struct lives in [`crate::record`].

use syn::{Expr, Ident, Type};

/// One member scanned from a record declaration body.
#[derive(Debug, Clone)]
pub struct MemberDescriptor {
    pub name: Ident,
    /// `None` for members kept out of `new` with `#[init(skip)]`.
    pub declared_type: Option<Type>,
    pub default_value: Option<Expr>,
    /// Type-level member with no per-instance storage.
    pub is_static: bool,
    pub accessors: Option<AccessorBlock>,
}

/// Accessor block attached to a member.
#[derive(Debug, Clone)]
pub enum AccessorBlock {
    /// A single getter body written in shorthand form.
    ImplicitGetter(Expr),
    /// An explicit list of accessors.
    Explicit(Vec<Accessor>),
}

#[derive(Debug, Clone)]
pub struct Accessor {
    pub kind: AccessorKind,
    pub body: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Getter,
    Setter,
    Observer,
}

/// Outcome of classifying one member, in the order the rules are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Included,
    Static,
    Computed,
    Untyped,
}

impl Classification {
    pub fn is_included(self) -> bool {
        matches!(self, Classification::Included)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Included => "included",
            Classification::Static => "static",
            Classification::Computed => "computed",
            Classification::Untyped => "untyped",
        }
    }
}

impl MemberDescriptor {
    /// A plain stored member with an explicit type.
    pub fn stored(name: Ident, ty: Type) -> Self {
        Self {
            name,
            declared_type: Some(ty),
            default_value: None,
            is_static: false,
            accessors: None,
        }
    }

    pub fn with_default(mut self, value: Expr) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_accessors(mut self, accessors: AccessorBlock) -> Self {
        self.accessors = Some(accessors);
        self
    }

    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn untyped(mut self) -> Self {
        self.declared_type = None;
        self
    }

    pub fn is_computed(&self) -> bool {
        self.accessors.as_ref().is_some_and(is_computed_accessor)
    }

    pub fn classify(&self) -> Classification {
        classify(self)
    }

    /// Getter expression for computed members, if one was written.
    pub fn getter_body(&self) -> Option<&Expr> {
        match self.accessors.as_ref()? {
            AccessorBlock::ImplicitGetter(body) => Some(body),
            AccessorBlock::Explicit(list) => list
                .iter()
                .find(|a| a.kind == AccessorKind::Getter)
                .and_then(|a| a.body.as_ref()),
        }
    }
}

/// A shorthand getter always computes; an explicit list computes as soon as
/// it has a getter, even when a setter suggests backing storage.
pub fn is_computed_accessor(block: &AccessorBlock) -> bool {
    match block {
        AccessorBlock::ImplicitGetter(_) => true,
        AccessorBlock::Explicit(list) => list.iter().any(|a| a.kind == AccessorKind::Getter),
    }
}

pub fn has_instance_storage(member: &MemberDescriptor) -> bool {
    !member.is_static
}

pub fn has_declared_type(member: &MemberDescriptor) -> bool {
    member.declared_type.is_some()
}

pub fn classify(member: &MemberDescriptor) -> Classification {
    if !has_instance_storage(member) {
        Classification::Static
    } else if member.is_computed() {
        Classification::Computed
    } else if !has_declared_type(member) {
        Classification::Untyped
    } else {
        Classification::Included
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn member(name: &str) -> MemberDescriptor {
        MemberDescriptor::stored(Ident::new(name, proc_macro2::Span::call_site()), parse_quote!(u32))
    }

    fn accessor(kind: AccessorKind) -> Accessor {
        Accessor {
            kind,
            body: Some(parse_quote!(0)),
        }
    }

    #[test]
    fn test_stored_member_is_included() {
        assert_eq!(member("a").classify(), Classification::Included);
        assert_eq!(
            member("a").with_default(parse_quote!(7)).classify(),
            Classification::Included
        );
    }

    #[test]
    fn test_shorthand_getter_is_computed() {
        let m = member("b").with_accessors(AccessorBlock::ImplicitGetter(parse_quote!(self.a * 2)));
        assert_eq!(m.classify(), Classification::Computed);
        assert!(m.getter_body().is_some());
    }

    #[test]
    fn test_explicit_getter_is_computed_even_with_setter() {
        let m = member("c").with_accessors(AccessorBlock::Explicit(vec![
            accessor(AccessorKind::Getter),
            accessor(AccessorKind::Setter),
        ]));
        assert_eq!(m.classify(), Classification::Computed);
    }

    #[test]
    fn test_accessor_list_without_getter_stays_stored() {
        let m = member("c").with_accessors(AccessorBlock::Explicit(vec![accessor(
            AccessorKind::Observer,
        )]));
        assert_eq!(m.classify(), Classification::Included);
        assert!(m.getter_body().is_none());
    }

    #[test]
    fn test_static_wins_over_other_rules() {
        let m = member("d")
            .into_static()
            .with_accessors(AccessorBlock::ImplicitGetter(parse_quote!(1)))
            .untyped();
        assert_eq!(m.classify(), Classification::Static);
    }

    #[test]
    fn test_untyped_member_is_skipped() {
        let m = member("e").untyped().with_default(parse_quote!(Vec::new()));
        assert_eq!(m.classify(), Classification::Untyped);
        assert!(!m.classify().is_included());
    }
}
