//! The "enter NA to hide this field" rule.

/// Sentinel a user types into any field to keep it off the rendered resume.
pub const NOT_APPLICABLE: &str = "na";

/// Returns false for the empty string and for the `NA` sentinel
/// (case-insensitive, surrounding whitespace ignored). Everything else is shown.
pub fn is_visible(value: &str) -> bool {
    !value.is_empty() && !value.trim().eq_ignore_ascii_case(NOT_APPLICABLE)
}

/// `Some(value)` when the value should be displayed.
pub fn shown(value: &str) -> Option<&str> {
    is_visible(value).then_some(value)
}

/// Clears a leaf in place when it must not be displayed.
pub fn blank_hidden(value: &mut String) {
    if !is_visible(value) {
        value.clear();
    }
}
