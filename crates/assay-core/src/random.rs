//! Random test data.
//!
//! Generators for form inputs and API parameters where the exact value does
//! not matter but its shape does: letters only, digits without a leading zero,
//! punctuation accepted by the backend, or CJK text.
//!
//! Every generator takes a `range` flag. When set, the requested length is an
//! upper bound and the actual length is drawn uniformly from `1..=length`.
//!
//! ```
//! use assay_core::random::{self, RandomOptions};
//!
//! let name = random::generate_string(12, RandomOptions::default());
//! assert_eq!(name.chars().count(), 12);
//! assert!(name.chars().all(|c| c.is_ascii_alphabetic()));
//! ```

use rand::seq::SliceRandom;
use rand::Rng;

/// Upper and lower case ASCII letters.
pub const LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// ASCII digits.
pub const NUMBERS: &str = "0123456789";

/// Punctuation accepted by the platform backend.
pub const SPECIAL_CHARS: &str = "~`!@#$%^&* ()_-+=|\\{}[]:;\"',./";

const CJK_START: u32 = 0x4e00;
const CJK_END: u32 = 0x9fbf;

/// Character classes mixed into [`generate_string`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomOptions {
    /// Treat the length as an upper bound.
    pub range: bool,
    /// Include digits.
    pub numbers: bool,
    /// Include [`SPECIAL_CHARS`].
    pub special_chars: bool,
}

impl RandomOptions {
    /// Letters and digits.
    #[must_use]
    pub fn alphanumeric() -> Self {
        Self {
            numbers: true,
            ..Self::default()
        }
    }

    /// Letters, digits and punctuation.
    #[must_use]
    pub fn all() -> Self {
        Self {
            range: false,
            numbers: true,
            special_chars: true,
        }
    }
}

fn pick_length(length: usize, range: bool, min: usize) -> usize {
    if range && length > min {
        rand::thread_rng().gen_range(min..=length)
    } else {
        length
    }
}

fn sample(source: &[char], length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .filter_map(|_| source.choose(&mut rng).copied())
        .collect()
}

/// Generates a string of letters, optionally mixed with digits and punctuation.
pub fn generate_string(length: usize, options: RandomOptions) -> String {
    let mut source: Vec<char> = LETTERS.chars().collect();
    if options.numbers {
        source.extend(NUMBERS.chars());
    }
    if options.special_chars {
        source.extend(SPECIAL_CHARS.chars());
    }
    sample(&source, pick_length(length, options.range, 1))
}

/// Generates a string of digits.
///
/// Unless `leading_zero` is set, a leading `0` is replaced by a non-zero digit
/// so the result is usable as a number.
pub fn generate_numbers(length: usize, range: bool, leading_zero: bool) -> String {
    let digits: Vec<char> = NUMBERS.chars().collect();
    let mut value = sample(&digits, pick_length(length, range, 1));
    if !leading_zero && value.starts_with('0') {
        let first = rand::thread_rng().gen_range(b'1'..=b'9') as char;
        value.replace_range(..1, first.encode_utf8(&mut [0; 4]));
    }
    value
}

/// Generates a string made only of [`SPECIAL_CHARS`].
pub fn generate_special_chars(length: usize, range: bool) -> String {
    let source: Vec<char> = SPECIAL_CHARS.chars().collect();
    sample(&source, pick_length(length, range, 1))
}

/// Generates CJK unified ideographs (U+4E00 to U+9FBF).
pub fn generate_cjk_chars(length: usize, range: bool) -> String {
    let mut rng = rand::thread_rng();
    (0..pick_length(length, range, 1))
        .filter_map(|_| char::from_u32(rng.gen_range(CJK_START..=CJK_END)))
        .collect()
}

/// Generates a string from the given characters.
///
/// Unlike the other generators, a ranged length may be zero.
pub fn generate_string_from(chars: &str, length: usize, range: bool) -> String {
    let source: Vec<char> = chars.chars().collect();
    sample(&source, pick_length(length, range, 0))
}

/// Flips a coin.
pub fn generate_boolean() -> bool {
    rand::thread_rng().gen_bool(0.5)
}
