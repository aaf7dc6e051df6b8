use alloc::{string::String, vec, vec::Vec};

/// Greedy word wrap to at most `limit` characters per line.
///
/// Lines break at the last space that fits, and the space is dropped.
/// Words longer than `limit` are cut. Text that already fits comes back
/// unchanged as a single line.
pub fn word_wrap(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let chars: Vec<char> = text.chars().collect();
    let mut rest = &chars[..];
    let mut lines = Vec::new();
    while rest.len() > limit {
        let split = if rest[limit] == ' ' {
            Some(limit)
        } else {
            rest[..limit].iter().rposition(|c| *c == ' ').filter(|&i| i > 0)
        };
        match split {
            Some(i) => {
                lines.push(rest[..i].iter().collect());
                rest = &rest[i + 1..];
            }
            None => {
                lines.push(rest[..limit].iter().collect());
                rest = &rest[limit..];
            }
        }
    }
    lines.push(rest.iter().collect());
    lines
}

/// Splits into chunks of exactly `limit` characters; the last may be shorter.
pub fn wrap(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(limit).map(|chunk| chunk.iter().collect()).collect()
}

pub fn cut(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Splits at a character (not byte) index.
pub fn split_at_char(text: &str, index: usize) -> (String, String) {
    let byte = text
        .char_indices()
        .nth(index)
        .map_or(text.len(), |(i, _)| i);
    (String::from(&text[..byte]), String::from(&text[byte..]))
}
