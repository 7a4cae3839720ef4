// SPL Line Context
// Textual lookahead over the raw current source line
//
// Two keyword decisions are made by scanning the line buffer rather than the
// token stream: `set` versus `set_array`, and `element` versus `character`.
// Both look only at the remainder of the line after the word being lexed.

/// Shape of the value written after the next standalone `of`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexTarget {
    StringLiteral,
    ArrayLiteral,
    Other,
}

/// The raw text of the current line following the word being lexed
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    rest: &'a str,
}

impl<'a> LineContext<'a> {
    /// `source[word_end..]` up to (not including) the next line break
    pub fn after(source: &'a str, word_end: usize) -> Self {
        let tail = &source[word_end..];
        let rest = match tail.find('\n') {
            Some(end) => &tail[..end],
            None => tail,
        };
        Self { rest }
    }

    /// `set` is an element assignment when the text before its `to` holds a
    /// `[` or the word `element`.
    pub fn is_element_assignment(&self) -> bool {
        let target = match find_word(self.rest, "to") {
            Some(position) => &self.rest[..position],
            None => self.rest,
        };
        target.contains('[') || find_word(target, "element").is_some()
    }

    /// What follows the next standalone `of` on this line
    pub fn index_target(&self) -> IndexTarget {
        let Some(position) = find_word(self.rest, "of") else {
            return IndexTarget::Other;
        };
        let after = self.rest[position + 2..].trim_start();
        match after.chars().next() {
            Some('"') | Some('\'') => IndexTarget::StringLiteral,
            Some('[') => IndexTarget::ArrayLiteral,
            _ => IndexTarget::Other,
        }
    }
}

/// Canonical keyword for `element`/`character` given the rest of its line
pub fn indexing_keyword(written: &str, context: LineContext<'_>) -> &'static str {
    match (written, context.index_target()) {
        (_, IndexTarget::StringLiteral) => "character",
        (_, IndexTarget::ArrayLiteral) => "element",
        ("character", IndexTarget::Other) => "character",
        _ => "element",
    }
}

/// Byte offset of `word` as a whole word (ASCII case-insensitive)
fn find_word(haystack: &str, word: &str) -> Option<usize> {
    let bytes = haystack.as_bytes();
    let needle = word.as_bytes();
    if needle.is_empty() || bytes.len() < needle.len() {
        return None;
    }

    for start in 0..=bytes.len() - needle.len() {
        let end = start + needle.len();
        if !bytes[start..end].eq_ignore_ascii_case(needle) {
            continue;
        }
        let boundary_before = start == 0 || !is_word_byte(bytes[start - 1]);
        let boundary_after = end == bytes.len() || !is_word_byte(bytes[end]);
        if boundary_before && boundary_after {
            return Some(start);
        }
    }
    None
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}
