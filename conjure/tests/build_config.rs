use conjure::build_config;

#[test]
fn test_picks_branch_for_profile() {
    let host: &str = build_config!(debug: "localhost", release: "prod.com");
    if cfg!(debug_assertions) {
        assert_eq!(host, "localhost");
    } else {
        assert_eq!(host, "prod.com");
    }
}

#[test]
fn test_integer_and_bool_values() {
    let retries: u32 = build_config!(release: 10, debug: 100);
    let verbose = build_config!(debug: true, release: false);
    assert_eq!(retries == 100, cfg!(debug_assertions));
    assert_eq!(verbose, cfg!(debug_assertions));
}

#[cfg(debug_assertions)]
#[test]
fn test_release_branch_is_not_compiled_in_debug() {
    let value: u8 = build_config!(debug: 1, release: unreachable!("release branch"));
    assert_eq!(value, 1);
}

#[test]
fn test_nested_in_other_directives() {
    let label = build_config!(debug: conjure::obfuscate!("dev"), release: conjure::obfuscate!("prod", Reversed));
    assert!(label == "dev" || label == "prod");
}
