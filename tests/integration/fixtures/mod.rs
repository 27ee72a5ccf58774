// Documents with known canonical forms
// WHY: Golden comparisons need deterministic input/output pairs

/// One paragraph exercising abbreviations, dotted acronyms, quotes and mixed terminals
pub const SAMPLE_PARAGRAPH: &str = "Dr. Smith reviewed the first draft of the report. \
It described an efficient method for comparing documents that were typeset with different layouts. \
The method, which was developed at the U.S. office, splits text into sentences! Does it work? \
\"Mostly. Not always,\" said Prof. Jones. See Fig. 3 for the results.";

/// SAMPLE_PARAGRAPH as a PDF extractor emits it, with presentation-form ligatures
pub const SAMPLE_PARAGRAPH_LIGATURES: &str = "Dr. Smith reviewed the \u{FB01}rst draft of the report. \
It described an e\u{FB03}cient method for comparing documents that were typeset with di\u{FB00}erent layouts. \
The method, which was developed at the U.S. o\u{FB03}ce, splits text into sentences! Does it work? \
\"Mostly. Not always,\" said Prof. Jones. See Fig. 3 for the results.";

/// Canonical lines for SAMPLE_PARAGRAPH at any wrap width
pub const SAMPLE_EXPECTED: &[&str] = &[
    "Dr. Smith reviewed the first draft of the report.",
    "It described an efficient method for comparing documents that were typeset with different layouts.",
    "The method, which was developed at the U.S. office, splits text into sentences!",
    "Does it work?",
    "\"Mostly. Not always,\" said Prof. Jones.",
    "See Fig. 3 for the results.",
];

/// Section headings directly above their text, as pdftotext emits them
pub const HEADING_DOCUMENT: &str = "Results
The first experiment succeeded. The second one failed.
Discussion
Both runs were repeated in a later session.
";

/// Headings become their own paragraphs
pub const HEADING_EXPECTED: &[&str] = &[
    "Results",
    "",
    "The first experiment succeeded.",
    "The second one failed.",
    "",
    "Discussion",
    "",
    "Both runs were repeated in a later session.",
];

/// Words broken across lines by the typesetter
pub const HYPHENATED_DOCUMENT: &str = "Applications of the method in-
clude typesetting. Further re-
search is ongoing.
";

pub const HYPHENATED_EXPECTED: &[&str] = &[
    "Applications of the method include typesetting.",
    "Further research is ongoing.",
];

/// Long capitalized words right after sentence ends; narrow wraps leave short lines before them
pub const LONG_WORD_PARAGRAPH: &str = "The test ended. We thank Internationalization experts for help. \
It ran. The study ended. In Paris we met again later that year. \
Characterization of Telecommunications hardware was done in Europe. I answered No. Then we left.";

pub const LONG_WORD_EXPECTED: &[&str] = &[
    "The test ended.",
    "We thank Internationalization experts for help.",
    "It ran.",
    "The study ended.",
    "In Paris we met again later that year.",
    "Characterization of Telecommunications hardware was done in Europe.",
    "I answered No.",
    "Then we left.",
];
