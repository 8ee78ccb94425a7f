use conjure::obfuscate;

fn main() {
    let _ = obfuscate!(api_key);
}
