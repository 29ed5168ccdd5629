//! Centralized validation and helper functions.

/// Maximum number of contigs allowed in a single reference genome (DOS protection)
pub const MAX_CONTIGS: usize = 100_000;

/// Maximum number of bands allowed in a single track file (DOS protection)
pub const MAX_BANDS: usize = 10_000_000;

/// Check if adding another contig would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new contig.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Example
/// ```ignore
/// if check_contig_limit(contigs.len()).is_some() {
///     return Err(...);
/// }
/// contigs.push(new_contig); // Safe to add
/// ```
#[must_use]
pub fn check_contig_limit(count: usize) -> Option<String> {
    if count >= MAX_CONTIGS {
        Some(format!(
            "Too many contigs: adding another would exceed maximum of {MAX_CONTIGS}"
        ))
    } else {
        None
    }
}

/// Check if adding another band would exceed the maximum allowed.
///
/// Same contract as [`check_contig_limit`].
#[must_use]
pub fn check_band_limit(count: usize) -> Option<String> {
    if count >= MAX_BANDS {
        Some(format!(
            "Too many bands: adding another would exceed maximum of {MAX_BANDS}"
        ))
    } else {
        None
    }
}

/// Validate that an identifier (genome, track, attribute, clause) is usable:
/// non-empty, no surrounding whitespace, no control characters.
///
/// # Examples
///
/// ```
/// use bandscope::utils::validation::is_valid_identifier;
///
/// assert!(is_valid_identifier("hg38"));
/// assert!(!is_valid_identifier(""));
/// assert!(!is_valid_identifier(" padded "));
/// ```
#[must_use]
pub fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty() && s.trim() == s && !s.chars().any(char::is_control)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_contig_limit() {
        assert!(check_contig_limit(0).is_none());
        assert!(check_contig_limit(MAX_CONTIGS - 1).is_none());
        assert!(check_contig_limit(MAX_CONTIGS).is_some());
    }

    #[test]
    fn test_check_band_limit() {
        assert!(check_band_limit(10).is_none());
        assert!(check_band_limit(MAX_BANDS).is_some());
    }

    #[test]
    fn test_is_valid_identifier() {
        assert!(is_valid_identifier("GRCh38"));
        assert!(is_valid_identifier("chr1_KI270706v1_random"));
        assert!(!is_valid_identifier("tab\tinside"));
        assert!(!is_valid_identifier("trailing "));
    }
}
