#![allow(dead_code)]

use std::marker::PhantomData;

use conjure::public_init;

#[public_init]
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    id: i64,
    name: Option<String>,
    #[init(default = true)]
    flag: bool,
}

#[public_init]
pub struct Tagged<T> {
    value: u64,
    #[init(computed = value * 2)]
    doubled: u64,
    marker: PhantomData<T>,
}

#[public_init]
pub struct Session {
    user: String,
    token: String,
    #[init(computed = format!("{}:{}", user, token))]
    key: String,
    #[init(get = user.len(), set)]
    user_len: usize,
    #[init(default = 3600)]
    ttl_secs: u32,
}

#[public_init]
pub struct Bounded<K, V>
where
    K: Ord,
{
    entries: std::collections::BTreeMap<K, V>,
    #[init(default = 16)]
    limit: usize,
}

#[public_init]
pub struct Empty {}

#[public_init]
pub struct Rect {
    #[init(default = 2)]
    width: u32,
    #[init(default = 3)]
    height: u32,
    #[init(computed = width * height)]
    area: u32,
    #[init(get = format!("{}x{}", width, height), set)]
    label: String,
}

#[public_init]
pub struct Counter {
    name: &'static str,
    #[init(skip)]
    hits: u64,
    #[init(skip, default = vec![0; 4])]
    buckets: Vec<u32>,
}

#[test]
fn test_required_and_defaulted_parameters() {
    let entry = Entry::new(1, None);
    assert_eq!(entry.id, 1);
    assert_eq!(entry.name, None);
    assert!(entry.flag);

    let overridden = Entry::new(2, Some("two".to_string())).with_flag(false);
    assert_eq!(
        overridden,
        Entry {
            id: 2,
            name: Some("two".to_string()),
            flag: false,
        }
    );
}

#[test]
fn test_computed_and_static_members_are_filled() {
    let tagged: Tagged<String> = Tagged::new(21);
    assert_eq!(tagged.value, 21);
    assert_eq!(tagged.doubled, 42);
}

#[test]
fn test_computed_members_see_parameters() {
    let session = Session::new("ada".to_string(), "t0k3n".to_string()).with_ttl_secs(60);
    assert_eq!(session.key, "ada:t0k3n");
    assert_eq!(session.user_len, 3);
    assert_eq!(session.ttl_secs, 60);
    assert_eq!(session.user, "ada");
}

#[test]
fn test_generics_and_where_clause_carry_over() {
    let mut entries = std::collections::BTreeMap::new();
    entries.insert("a", 1);
    let bounded = Bounded::new(entries);
    assert_eq!(bounded.limit, 16);
    assert_eq!(bounded.entries.get("a"), Some(&1));
    assert_eq!(bounded.with_limit(4).limit, 4);
}

#[test]
fn test_struct_without_fields() {
    let _ = Empty::new();
}

#[test]
fn test_overrides_recompute_computed_members() {
    let rect = Rect::new();
    assert_eq!(rect.area, 6);

    let wider = Rect::new().with_width(5);
    assert_eq!(wider.width, 5);
    assert_eq!(wider.area, 15);
    assert_eq!(wider.label, "5x3");

    let both = Rect::new().with_height(4).with_width(10);
    assert_eq!(both.area, 40);
    assert_eq!(both.label, "10x4");
}

#[test]
fn test_skipped_members_are_filled() {
    let counter = Counter::new("requests");
    assert_eq!(counter.name, "requests");
    assert_eq!(counter.hits, 0);
    assert_eq!(counter.buckets, vec![0; 4]);
}
