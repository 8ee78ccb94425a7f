//! Shared output helpers so every command prints with the same symbols and
//! colors.

use colored::Colorize;

/// Standard symbols used throughout the CLI.
pub mod symbols {
    /// Arrow for action/progress indicators
    pub const ARROW: &str = "→";
    /// Checkmark for success
    pub const SUCCESS: &str = "✓";
    /// X mark for failure
    pub const FAILURE: &str = "✗";
    /// Warning/attention indicator
    pub const WARNING: &str = "!";
    /// Bullet point
    pub const BULLET: &str = "•";
}

/// Print a step header with the action arrow.
pub fn print_step(message: &str) {
    println!("{} {}", symbols::ARROW.blue().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", symbols::SUCCESS.green().bold(), message);
}

/// Print a failure message.
pub fn print_error(message: &str) {
    println!("{} {}", symbols::FAILURE.red().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", symbols::WARNING.yellow().bold(), message);
}

/// Print a dimmed info line (indented).
pub fn print_info(message: &str) {
    println!("  {}", message.dimmed());
}

/// Print a `label: value` line under a bullet.
pub fn print_field(label: &str, value: &str) {
    println!("  {} {}: {}", symbols::BULLET.dimmed(), label, value.bold());
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(50).dimmed());
}

/// Format bytes as comma-separated decimals, or as a hex string.
pub fn format_bytes(bytes: &[u8], as_hex: bool) -> String {
    if as_hex {
        return hex::encode(bytes);
    }
    bytes
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(&[72, 105], false), "72, 105");
        assert_eq!(format_bytes(&[72, 105], true), "4869");
        assert_eq!(format_bytes(&[], false), "");
    }
}
