//! Paren-aware delimiter splitting.

/// Split `input` on `delimiter`, ignoring delimiters nested inside
/// parentheses, so `DECIMAL(10,2)` survives a comma split. Segments are
/// trimmed and empty segments dropped.
///
/// Unbalanced input is split best-effort: a dangling open paren swallows
/// the rest of the string into the final segment, and a stray close paren
/// is ignored. Imported schemas are often hand-written, so imprecision is
/// tolerated rather than rejected.
pub fn smart_split(input: &str, delimiter: char) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth: u32 = 0;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == delimiter && depth == 0 => {
                let segment = input[start..i].trim();
                if !segment.is_empty() {
                    segments.push(segment);
                }
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    let tail = input[start..].trim();
    if !tail.is_empty() {
        segments.push(tail);
    }

    segments
}
