// Paragraph reconstruction: joins layout-wrapped lines back into logical paragraphs
// Input lines are already ligature-expanded and whitespace-collapsed, blank lines are empty

use tracing::trace;

use super::{AbbreviationChecker, NormalizationStats, NormalizerConfig};

const TERMINALS: &[char] = &['.', '!', '?'];
const CLOSERS: &[char] = &['"', '\'', '\u{201D}', '\u{2019}', ')', ']'];
const OPENERS: &[char] = &['"', '\'', '\u{201C}', '\u{2018}', '(', '['];

const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "nor", "of", "in", "on", "at", "to", "for", "by", "with",
    "from", "into", "as", "than", "that", "we", "our", "he", "she", "they", "it", "its", "this",
    "these", "is", "are", "was", "were",
];

/// Joining state, one transition per input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinState {
    /// Next non-blank line continues the current paragraph
    InParagraph,
    /// The current paragraph was flushed; next non-blank line opens a new one
    AtBoundary,
}

/// Joins prepared lines into paragraphs, one `String` per paragraph
pub struct ParagraphJoiner<'a> {
    config: &'a NormalizerConfig,
    checker: &'a AbbreviationChecker,
    state: JoinState,
    buffer: String,
    paragraphs: Vec<String>,
    hyphenations: usize,
}

impl<'a> ParagraphJoiner<'a> {
    pub fn new(config: &'a NormalizerConfig, checker: &'a AbbreviationChecker) -> Self {
        Self {
            config,
            checker,
            state: JoinState::InParagraph,
            buffer: String::new(),
            paragraphs: Vec::new(),
            hyphenations: 0,
        }
    }

    pub fn state(&self) -> JoinState {
        self.state
    }

    /// Run the joining pass over all lines and return the reconstructed paragraphs
    pub fn join_all<S: AsRef<str>>(mut self, lines: &[S], stats: &mut NormalizationStats) -> Vec<String> {
        for index in 0..lines.len() {
            let line = lines[index].as_ref();
            if line.is_empty() {
                self.boundary();
                continue;
            }

            if self.state == JoinState::AtBoundary {
                self.state = JoinState::InParagraph;
            }

            let opens_unit = self.buffer.is_empty() || self.ends_sentence();
            let previous = index.checked_sub(1).map(|i| lines[i].as_ref());
            let next = lines.get(index + 1).map(AsRef::as_ref);

            if opens_unit && self.is_heading(line, previous, next) {
                trace!(line, "Short unpunctuated line treated as heading break");
                self.flush();
                self.append(line);
                self.boundary();
            } else {
                self.append(line);
            }
        }
        self.flush();

        stats.paragraphs += self.paragraphs.len();
        stats.hyphenations_repaired += self.hyphenations;
        self.paragraphs
    }

    fn boundary(&mut self) {
        self.flush();
        self.state = JoinState::AtBoundary;
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            self.paragraphs.push(std::mem::take(&mut self.buffer));
        }
    }

    /// Append with exactly one space at the join, merging words broken by a wrap hyphen
    fn append(&mut self, line: &str) {
        if self.buffer.is_empty() {
            self.buffer.push_str(line);
        } else if is_wrap_hyphenation(&self.buffer, line) {
            self.buffer.pop();
            self.buffer.push_str(line);
            self.hyphenations += 1;
        } else {
            self.buffer.push(' ');
            self.buffer.push_str(line);
        }
    }

    /// True when the buffer ends a sentence: terminal punctuation not belonging to an abbreviation
    fn ends_sentence(&self) -> bool {
        let trimmed = self.buffer.trim_end_matches(CLOSERS);
        trimmed.ends_with(TERMINALS) && !self.checker.ends_with_abbreviation(trimmed)
    }

    /// Heading break: conspicuously short, starts capitalized or numbered, carries no trailing
    /// punctuation, and the following line starts with a capitalized word
    ///
    /// A line is never a heading when the next line's first word would have fit after it
    /// within the next line's width: that short line is a forced wrap, not a heading.
    fn is_heading(&self, line: &str, previous: Option<&str>, next: Option<&str>) -> bool {
        let Some(next) = next.filter(|next| !next.is_empty()) else {
            return false;
        };

        let line_len = line.chars().count();
        let next_len = next.chars().count();
        let previous_len = previous.map_or(0, |prev| prev.chars().count());
        let neighbor_len = previous_len.max(next_len);
        if (line_len as f64) >= self.config.heading_ratio * neighbor_len as f64 {
            return false;
        }

        let next_word_len = next.split_whitespace().next().map_or(0, |word| word.chars().count());
        if line_len + 1 + next_word_len > next_len {
            return false;
        }

        if ends_with_function_word(line) {
            return false;
        }

        let starts_ok = line
            .chars()
            .next()
            .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit());
        let ends_ok = line.chars().next_back().is_some_and(char::is_alphanumeric);

        starts_ok && ends_ok && starts_capitalized(next)
    }
}

/// Last word is an article, preposition, conjunction or pronoun, so the line continues a sentence
///
/// A one-word line is compared case-insensitively since it is capitalized as a sentence start.
fn ends_with_function_word(line: &str) -> bool {
    let mut words = line.split_whitespace();
    let Some(last) = words.next_back() else {
        return false;
    };
    if words.next().is_none() {
        FUNCTION_WORDS.contains(&last.to_lowercase().as_str())
    } else {
        FUNCTION_WORDS.contains(&last)
    }
}

/// Trailing hyphen after a letter, with the next line continuing in lowercase
fn is_wrap_hyphenation(buffer: &str, next_line: &str) -> bool {
    let mut tail = buffer.chars().rev();
    let hyphen_after_letter = matches!(
        (tail.next(), tail.next()),
        (Some('-'), Some(letter)) if letter.is_alphabetic()
    );
    hyphen_after_letter && next_line.chars().next().is_some_and(char::is_lowercase)
}

/// First letter after any opening quotes or brackets is uppercase
pub fn starts_capitalized(line: &str) -> bool {
    line.trim_start_matches(OPENERS)
        .chars()
        .next()
        .is_some_and(char::is_uppercase)
}
