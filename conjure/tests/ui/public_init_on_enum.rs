#![allow(dead_code)]
use conjure::public_init;

#[public_init]
enum Mode {
    Fast,
    Slow,
}

fn main() {}
