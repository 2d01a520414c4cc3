//! Centralized validation and helper functions.

use std::path::Path;

/// Maximum length of a cluster label used inside a bin file name
pub const MAX_LABEL_LENGTH: usize = 200;

/// Label validation error types
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Label too long: exceeds {MAX_LABEL_LENGTH} characters")]
    LabelTooLong,
    #[error("Empty label provided")]
    EmptyLabel,
    #[error("Label contains path traversal or path separators")]
    PathTraversal,
    #[error("Label contains control characters")]
    ControlCharacters,
}

/// Check that a cluster label can be embedded in a bin file name.
///
/// Labels come from an external binner and are otherwise opaque, so only
/// the characters that would let a label escape the output directory or
/// corrupt the name are rejected:
/// - empty or whitespace-only labels
/// - labels longer than [`MAX_LABEL_LENGTH`]
/// - `..`, `/` and `\`
/// - NUL and other control characters
///
/// # Errors
///
/// Returns the matching `ValidationError` for the first rule violated.
///
/// # Examples
///
/// ```
/// use contig_consensus::utils::validation::{validate_label, ValidationError};
///
/// assert!(validate_label("12").is_ok());
/// assert!(validate_label("bin_A-3").is_ok());
/// assert_eq!(validate_label("../etc"), Err(ValidationError::PathTraversal));
/// ```
pub fn validate_label(label: &str) -> Result<(), ValidationError> {
    if label.trim().is_empty() {
        return Err(ValidationError::EmptyLabel);
    }

    if label.len() > MAX_LABEL_LENGTH {
        return Err(ValidationError::LabelTooLong);
    }

    if label.contains("..") || label.contains('/') || label.contains('\\') {
        return Err(ValidationError::PathTraversal);
    }

    if label.chars().any(char::is_control) {
        return Err(ValidationError::ControlCharacters);
    }

    Ok(())
}

/// Derive a coverage column label from an alignment file path.
///
/// Strips the directory and the final extension, so `/data/s1.sorted.bam`
/// becomes `s1.sorted`.
#[must_use]
pub fn sample_label_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
