// Sentence re-splitting over a reconstructed paragraph
// Uses a regex-automata meta regex to find candidate boundaries, then applies abbreviation
// and quotation guards with a small amount of state carried across candidates

use regex_automata::meta::Regex;
use std::sync::LazyLock;
use tracing::trace;

use super::{AbbreviationChecker, NormalizerConfig};

/// Candidate boundaries: terminal punctuation, optional closers, whitespace, optional openers
/// and a capital letter; or clause punctuation followed by whitespace.
/// Decimal numbers never match because a boundary needs whitespace after the terminal.
const BOUNDARY_PATTERN: &str =
    r#"[.!?]+["'”’)\]]*\s+["'“‘(\[]*\p{Lu}|[,;:]\s+"#;

static BOUNDARY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(BOUNDARY_PATTERN).expect("sentence boundary pattern is a valid regex")
});

const TERMINALS: &[char] = &['.', '!', '?'];
const CLAUSE_BREAKS: &[char] = &[',', ';', ':'];
const CLOSERS: &[char] = &['"', '\'', '\u{201D}', '\u{2019}', ')', ']'];

/// Tracks whether a double quotation is open, measured in characters from paragraph start
#[derive(Debug, Default)]
struct QuoteTracker {
    char_pos: usize,
    opened_at: Option<usize>,
}

impl QuoteTracker {
    fn advance(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '"' => {
                    self.opened_at = match self.opened_at {
                        Some(_) => None,
                        None => Some(self.char_pos),
                    }
                }
                '\u{201C}' => self.opened_at = Some(self.char_pos),
                '\u{201D}' => self.opened_at = None,
                _ => {}
            }
            self.char_pos += 1;
        }
    }

    /// A quote left open longer than `max_span` characters is treated as a stray glyph
    fn is_open(&self, max_span: usize) -> bool {
        self.opened_at
            .is_some_and(|opened| self.char_pos - opened <= max_span)
    }
}

/// Split one whitespace-collapsed paragraph into sentences (or clauses of long sentences)
///
/// Returned slices borrow from `text` and carry no leading or trailing whitespace.
pub fn split_sentences<'a>(
    text: &'a str,
    config: &NormalizerConfig,
    checker: &AbbreviationChecker,
) -> Vec<&'a str> {
    let mut sentences = Vec::new();
    let mut segment_start = 0;
    let mut scanned = 0;
    let mut quotes = QuoteTracker::default();

    for candidate in BOUNDARY_REGEX.find_iter(text) {
        quotes.advance(&text[scanned..candidate.start()]);
        scanned = candidate.start();

        let matched = &text[candidate.start()..candidate.end()];
        let split_end = if matched.starts_with(CLAUSE_BREAKS) {
            clause_break(text, segment_start, candidate.start(), config, &quotes)
        } else {
            sentence_break(text, segment_start, candidate.start(), matched, config, checker, &quotes)
        };

        quotes.advance(&text[scanned..candidate.end()]);
        scanned = candidate.end();

        if let Some(end) = split_end {
            push_segment(&mut sentences, &text[segment_start..end]);
            segment_start = end;
        }
    }

    push_segment(&mut sentences, &text[segment_start..]);
    sentences
}

fn push_segment<'a>(sentences: &mut Vec<&'a str>, segment: &'a str) {
    let segment = segment.trim();
    if !segment.is_empty() {
        sentences.push(segment);
    }
}

/// Decide whether a terminal-punctuation candidate ends the sentence.
/// Returns the byte offset just past the terminal run and any closing marks.
fn sentence_break(
    text: &str,
    segment_start: usize,
    start: usize,
    matched: &str,
    config: &NormalizerConfig,
    checker: &AbbreviationChecker,
    quotes: &QuoteTracker,
) -> Option<usize> {
    let terminal_len: usize = matched
        .chars()
        .take_while(|c| TERMINALS.contains(c))
        .map(char::len_utf8)
        .sum();
    let closers: &str = {
        let rest = &matched[terminal_len..];
        let closer_len: usize = rest
            .chars()
            .take_while(|c| CLOSERS.contains(c))
            .map(char::len_utf8)
            .sum();
        &rest[..closer_len]
    };
    let end = start + terminal_len + closers.len();

    if quotes.is_open(config.max_quote_span) {
        // Punctuation inside a quotation only ends the sentence when the quotation closes with it
        let closes_quote = closers.contains(['"', '\u{201D}']);
        if !closes_quote {
            trace!(offset = start, "Terminal inside open quotation, not splitting");
            return None;
        }
        return Some(end);
    }

    if terminal_len == 1 && closers.is_empty() && matched.starts_with('.') {
        let word_start = text[segment_start..start]
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(ws, c)| segment_start + ws + c.len_utf8())
            .unwrap_or(segment_start);
        let word = &text[word_start..=start];
        if checker.is_abbreviation(word) {
            trace!(word, "Abbreviation before capital, not splitting");
            return None;
        }
    }

    Some(end)
}

/// Clause punctuation only splits sentences that have grown past the configured length
fn clause_break(
    text: &str,
    segment_start: usize,
    start: usize,
    config: &NormalizerConfig,
    quotes: &QuoteTracker,
) -> Option<usize> {
    if config.clause_split_length == 0 || quotes.is_open(config.max_quote_span) {
        return None;
    }
    // Clause punctuation is ASCII, so the break sits one byte past `start`
    let end = start + 1;
    let segment_chars = text[segment_start..end].chars().count();
    (segment_chars >= config.clause_split_length).then_some(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<&str> {
        split_sentences(text, &NormalizerConfig::default(), &AbbreviationChecker::new())
    }

    #[test]
    fn test_basic_split() {
        assert_eq!(
            split("Hello world. This is a test! How are you? Fine."),
            vec!["Hello world.", "This is a test!", "How are you?", "Fine."]
        );
    }

    #[test]
    fn test_requires_capital_after_terminal() {
        assert_eq!(split("Version 2. and then more."), vec!["Version 2. and then more."]);
    }

    #[test]
    fn test_decimal_numbers_do_not_split() {
        assert_eq!(split("Pi is 3.14 roughly. Next one."), vec!["Pi is 3.14 roughly.", "Next one."]);
    }

    #[test]
    fn test_title_abbreviation() {
        assert_eq!(
            split("Dr. Smith arrived. He left soon."),
            vec!["Dr. Smith arrived.", "He left soon."]
        );
    }

    #[test]
    fn test_initials_and_acronyms() {
        assert_eq!(
            split("Written by J. R. Tolkien in the U.S. Then printed."),
            vec!["Written by J. R. Tolkien in the U.S. Then printed."]
        );
        assert_eq!(split("See Fig. A for details."), vec!["See Fig. A for details."]);
    }

    #[test]
    fn test_punctuation_inside_quotes() {
        assert_eq!(
            split("He said \"Stop. Now.\" Then he left."),
            vec!["He said \"Stop. Now.\"", "Then he left."]
        );
        assert_eq!(
            split("She wrote \u{201C}Wait! Please.\u{201D} Nobody did."),
            vec!["She wrote \u{201C}Wait! Please.\u{201D}", "Nobody did."]
        );
    }

    #[test]
    fn test_stray_quote_stops_suppressing() {
        let config = NormalizerConfig {
            max_quote_span: 10,
            ..NormalizerConfig::default()
        };
        let checker = AbbreviationChecker::new();
        let text = "A 12\" ruler was found here. It was old.";
        assert_eq!(
            split_sentences(text, &config, &checker),
            vec!["A 12\" ruler was found here.", "It was old."]
        );
    }

    #[test]
    fn test_repeated_terminals_and_closers() {
        assert_eq!(
            split("Really?! Yes (it was.) Then what... Nothing."),
            vec!["Really?!", "Yes (it was.)", "Then what...", "Nothing."]
        );
    }

    #[test]
    fn test_opening_quote_before_capital() {
        assert_eq!(
            split("It ended. \"Why?\" she asked."),
            vec!["It ended.", "\"Why?\" she asked."]
        );
    }

    #[test]
    fn test_clause_split_for_long_sentences() {
        let config = NormalizerConfig {
            clause_split_length: 20,
            ..NormalizerConfig::default()
        };
        let checker = AbbreviationChecker::new();
        let text = "Short, then a much longer clause follows here, and ends; done.";
        assert_eq!(
            split_sentences(text, &config, &checker),
            vec![
                "Short, then a much longer clause follows here,",
                "and ends; done."
            ]
        );
    }

    #[test]
    fn test_clause_split_disabled() {
        let config = NormalizerConfig {
            clause_split_length: 0,
            ..NormalizerConfig::default()
        };
        let checker = AbbreviationChecker::new();
        let text = "a, b, c, d, e, f, g, h, i, j, k, l, m, n, o, p, q, r, s, t.";
        assert_eq!(split_sentences(text, &config, &checker), vec![text]);
    }

    #[test]
    fn test_multibyte_whitespace_before_abbreviation() {
        assert_eq!(
            split("Hi.\u{A0}Dr. Smith came.\u{2009}Prof. Jones left."),
            vec!["Hi.", "Dr. Smith came.", "Prof. Jones left."]
        );
    }

    #[test]
    fn test_no_as_answer_ends_sentence() {
        assert_eq!(
            split("I answered No. Then we left."),
            vec!["I answered No.", "Then we left."]
        );
        assert_eq!(split("See No. 5 for details."), vec!["See No. 5 for details."]);
    }

    #[test]
    fn test_empty_and_unterminated() {
        assert!(split("").is_empty());
        assert_eq!(split("no terminal at all"), vec!["no terminal at all"]);
    }
}
