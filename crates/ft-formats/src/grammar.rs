//! Line-level grammar: comments, keyword token, remainder.

use crate::keyword::Keyword;

/// Resolves a leading token to a keyword.
pub type KeywordLookup = fn(&str) -> Option<Keyword>;

/// A classified input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line<'a> {
    /// Blank or `#` comment
    Skip,
    /// Recognized keyword and the trimmed text after it
    Directive { keyword: Keyword, rest: &'a str },
    /// Leading token the lookup did not recognize
    Unknown { token: &'a str },
}

/// Classify one line of input.
pub fn split_line(line: &str, lookup: KeywordLookup) -> Line<'_> {
    let line = line.trim_start();
    if line.is_empty() || line.starts_with('#') {
        return Line::Skip;
    }
    let end = line
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(line.len());
    let (token, rest) = line.split_at(end);
    match lookup(token) {
        Some(keyword) => Line::Directive {
            keyword,
            rest: rest.trim(),
        },
        None => Line::Unknown { token },
    }
}

/// Decode a quoted string argument. `\"` and `\\` are unescaped; text
/// after the closing quote is dropped. Unquoted text is returned trimmed.
pub fn unquote(text: &str) -> String {
    let text = text.trim();
    let Some(body) = text.strip_prefix('"') else {
        return text.to_string();
    };
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => break,
            '\\' => match chars.next() {
                Some(escaped) => out.push(escaped),
                None => break,
            },
            c => out.push(c),
        }
    }
    out
}
