// 🪪 Tax-ID (CPF) Input Mask
// Rebuilds the display mask from the full raw input on every keystroke

use regex::Regex;
use std::sync::OnceLock;

/// Number of digits in a complete CPF
pub const CPF_DIGITS: usize = 11;

/// Length of the fully punctuated form `XXX.XXX.XXX-XX`
pub const CPF_MASK_LEN: usize = 14;

fn canonical_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d{3}\.\d{3}\.\d{3}-\d{2}$").expect("static CPF pattern")
    })
}

// ============================================================================
// FORMATTER
// ============================================================================

/// Keep only ASCII digits, in order
pub fn strip_non_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Apply the CPF mask to whatever the user has typed so far.
///
/// The input may already carry separators from a previous pass; they are
/// stripped before the mask is applied, so the function is idempotent on its
/// own output. More than 11 digits are not rejected: the result is cut at
/// 14 characters and the extra digits disappear from the display.
pub fn format_cpf(raw: &str) -> String {
    let digits = strip_non_digits(raw);
    let len = digits.len();

    // Every char is an ASCII digit or separator, so byte slicing is safe below.
    let mut masked = digits.clone();
    if len > 3 {
        masked = format!("{}.{}", &digits[..3], &digits[3..]);
    }
    if len > 6 {
        masked = format!("{}.{}", &masked[..7], &digits[6..]);
    }
    if len > 9 {
        masked = format!("{}-{}", &masked[..11], &digits[9..len.min(CPF_DIGITS)]);
    }

    masked.truncate(CPF_MASK_LEN);
    masked
}

/// True when `s` is a complete mask, `XXX.XXX.XXX-XX`
pub fn is_canonical(s: &str) -> bool {
    canonical_pattern().is_match(s)
}

// ============================================================================
// TESTS
// ============================================================================
