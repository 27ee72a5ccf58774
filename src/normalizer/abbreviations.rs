// Abbreviation handling for sentence boundary detection
// A period that closes one of these tokens is not a sentence end even when a capital follows

use std::collections::HashSet;

/// Titles that precede proper nouns, as in "Dr. Smith" or "Mr. Johnson"
pub const TITLE_ABBREVIATIONS: &[&str] = &[
    "Dr.", "Mr.", "Mrs.", "Ms.", "Prof.", "Sr.", "Jr.", "St.", "Rev.", "Gen.", "Col.", "Capt.",
];

/// Reference abbreviations common in typeset papers and reports, followed by numbers or names
///
/// "No." is left out: before a numeral it is never a boundary candidate, and before a capital
/// it is usually the answer word ending a sentence.
pub const REFERENCE_ABBREVIATIONS: &[&str] = &[
    "Fig.", "Figs.", "Eq.", "Eqs.", "Sec.", "Ch.", "Tab.", "Ref.", "Refs.", "Vol.", "pp.",
    "cf.", "vs.", "al.", "e.g.", "i.e.", "approx.", "resp.",
];

/// Characters stripped from the front of a token before lookup
const OPENING_MARKS: &[char] = &['"', '\'', '\u{201C}', '\u{2018}', '(', '['];

/// Abbreviation lookup using HashSet for O(1) membership
pub struct AbbreviationChecker {
    abbreviations: HashSet<&'static str>,
}

impl AbbreviationChecker {
    /// Create new abbreviation checker with the default title and reference sets
    pub fn new() -> Self {
        Self {
            abbreviations: TITLE_ABBREVIATIONS
                .iter()
                .chain(REFERENCE_ABBREVIATIONS.iter())
                .copied()
                .collect(),
        }
    }

    /// Check if a period-terminated word is a known abbreviation, an initial, or a dotted acronym
    pub fn is_abbreviation(&self, word: &str) -> bool {
        let word = word.trim_start_matches(OPENING_MARKS);
        self.abbreviations.contains(word) || is_initial(word) || is_dotted_acronym(word)
    }

    /// Check if text ends with an abbreviation that should not split sentences
    pub fn ends_with_abbreviation(&self, text: &str) -> bool {
        text.split_whitespace()
            .last()
            .is_some_and(|last_word| self.is_abbreviation(last_word))
    }
}

impl Default for AbbreviationChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Single capital letter followed by a period, e.g. the "J." in "J. Smith"
fn is_initial(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some('.'), None) if letter.is_uppercase()
    )
}

/// Two or more letter-period pairs, e.g. "U.S." or "a.m."
fn is_dotted_acronym(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    chars.len() >= 4
        && chars.len() % 2 == 0
        && chars
            .chunks(2)
            .all(|pair| pair[0].is_alphabetic() && pair[1] == '.')
}
