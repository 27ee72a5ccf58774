// Ligature decomposition for typeset text
// WHY: renderers choose ligature glyphs independently of content, so two extractions of
// the same sentence can differ only in which glyphs they fused

/// Alphabetic presentation forms (U+FB00..=U+FB06) and their letter sequences
pub const LIGATURES: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"), // long s + t
    ('\u{FB06}', "st"),
];

/// Look up the expansion of a single ligature glyph
pub fn ligature_expansion(ch: char) -> Option<&'static str> {
    LIGATURES
        .iter()
        .find(|(glyph, _)| *glyph == ch)
        .map(|(_, expansion)| *expansion)
}

/// Expand every ligature glyph in `text`, allocating a new string
pub fn expand_ligatures(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    expand_ligatures_into(text, &mut result);
    result
}

/// Expand ligatures into a caller-owned buffer, returning the number of glyphs replaced
pub fn expand_ligatures_into(text: &str, buffer: &mut String) -> usize {
    buffer.clear();
    buffer.reserve(text.len());

    let mut expanded = 0;
    for ch in text.chars() {
        match ligature_expansion(ch) {
            Some(expansion) => {
                buffer.push_str(expansion);
                expanded += 1;
            }
            None => buffer.push(ch),
        }
    }
    expanded
}
