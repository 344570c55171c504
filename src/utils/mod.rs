//! Utility functions and helpers.

pub mod http;

/// Collapse runs of whitespace (including non-breaking spaces) into single
/// spaces and trim the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  jueves,\n  01 de abril  "), "jueves, 01 de abril");
        assert_eq!(clean_text("La\u{a0}Paz"), "La Paz");
        assert_eq!(clean_text("   "), "");
    }
}
