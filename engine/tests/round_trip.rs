use conjure_engine::{encode, EncodingMode, EncodingRequest};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn any_mode() -> impl Strategy<Value = EncodingMode> {
    prop::sample::select(EncodingMode::ALL.to_vec())
}

proptest! {
    #[test]
    fn decodes_to_original(literal in "\\PC*", mode in any_mode(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let artifact = encode(&EncodingRequest::new(literal.clone(), mode), &mut rng);
        prop_assert_eq!(artifact.decode().unwrap(), literal);
    }

    #[test]
    fn stored_length_matches_literal(literal in "\\PC*", seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        for mode in [EncodingMode::Bytes, EncodingMode::Reversed, EncodingMode::Xor, EncodingMode::BitShift] {
            let artifact = encode(&EncodingRequest::new(literal.clone(), mode), &mut rng);
            prop_assert_eq!(artifact.bytes().len(), literal.len());
        }
    }

    #[test]
    fn only_randomized_modes_carry_auxiliary(literal in "\\PC{0,16}", mode in any_mode()) {
        let artifact = encode(&EncodingRequest::new(literal, mode), &mut rand::thread_rng());
        prop_assert_eq!(artifact.auxiliary().is_some(), mode.is_randomized());
    }
}

#[test]
fn test_unicode_round_trip_in_every_mode() {
    let samples = [
        "",
        "Hello",
        "naïve café",
        "e\u{301}\u{302} combining",
        "日本語のテキスト",
        "🦀 crab 👨‍👩‍👧",
        "tab\tnewline\nquote\"",
    ];
    let mut rng = StdRng::seed_from_u64(7);
    for sample in samples {
        for mode in EncodingMode::ALL {
            let artifact = encode(&EncodingRequest::new(sample, mode), &mut rng);
            assert_eq!(artifact.decode().unwrap(), sample, "mode {mode}");
        }
    }
}

#[test]
fn test_randomized_modes_vary_between_expansions() {
    let literal = "the same literal every time";
    for mode in [EncodingMode::Xor, EncodingMode::BitShift] {
        let request = EncodingRequest::new(literal, mode);
        let mut rng = rand::thread_rng();
        let first = encode(&request, &mut rng);
        // A bit rotation only has 7 possible amounts, so compare over many draws.
        let varied = (0..64).any(|_| encode(&request, &mut rng) != first);
        assert!(varied, "{mode} produced identical output 64 times");
        assert_eq!(first.decode().unwrap(), literal);
    }
}

#[test]
fn test_deterministic_modes_never_vary() {
    for mode in [EncodingMode::Bytes, EncodingMode::Reversed, EncodingMode::Base64] {
        let request = EncodingRequest::new("stable", mode);
        let first = encode(&request, &mut rand::thread_rng());
        let second = encode(&request, &mut rand::thread_rng());
        assert_eq!(first, second);
    }
}
