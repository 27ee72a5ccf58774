// Whitespace canonicalization shared by the joining and splitting passes

/// Collapse interior whitespace runs to one space and trim both ends
pub fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    collapse_whitespace_into(text, &mut result);
    result
}

/// Collapse whitespace into supplied buffer to avoid allocation
/// Line breaks (`\n`, `\r\n`, lone `\r`), tabs, form feeds and Unicode spaces all count as whitespace
pub fn collapse_whitespace_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            // WHY: leading whitespace never produces a space since buffer is still empty
            pending_space = !buffer.is_empty();
        } else {
            if pending_space {
                buffer.push(' ');
                pending_space = false;
            }
            buffer.push(ch);
        }
    }
}
