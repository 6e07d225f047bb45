// file: src/parser/normalizer.rs
// description: search input normalization and Manticore query-syntax escaping
// reference: https://manual.manticoresearch.com/Searching/Full_text_matching/Escaping

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref URL_PATTERN: Regex =
        Regex::new(r"https?://\S+").expect("URL_PATTERN regex is valid");
}

/// Operator characters of the full-text query syntax, parentheses excluded.
pub const RESERVED_CHARACTERS: [char; 12] = [
    '!', '"', '$', '\'', '-', '/', '<', '@', '\\', '^', '|', '~',
];

pub struct QueryNormalizer;

impl QueryNormalizer {
    /// Canonical composed form, single spaces, no leading or trailing whitespace.
    pub fn normalize_string(input: &str, lowercase: bool) -> String {
        let composed: String = input.nfc().collect();
        let cased = if lowercase {
            composed.to_lowercase()
        } else {
            composed
        };

        cased.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    pub fn escape_characters(input: &str) -> String {
        let mut escaped = String::with_capacity(input.len());
        for c in input.chars() {
            if RESERVED_CHARACTERS.contains(&c) {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }

    pub fn contains_url(input: &str) -> bool {
        URL_PATTERN.is_match(input)
    }

    /// Escapes operator characters inside URLs only; the rest of the query keeps its syntax.
    pub fn process_string_with_urls(input: &str) -> String {
        URL_PATTERN
            .replace_all(input, |caps: &Captures| escape_url(&caps[0]))
            .into_owned()
    }

    /// An odd number of unescaped double quotes gets the last one escaped.
    pub fn escape_unclosed_quotes(input: &str) -> String {
        let mut open: Option<usize> = None;

        for (i, b) in unescaped_bytes(input.as_bytes()) {
            if b == b'"' {
                open = match open {
                    None => Some(i),
                    Some(_) => None,
                };
            }
        }

        match open {
            Some(pos) => {
                let mut output = String::with_capacity(input.len() + 1);
                output.push_str(&input[..pos]);
                output.push('\\');
                output.push_str(&input[pos..]);
                output
            }
            None => input.to_string(),
        }
    }

    /// All-or-nothing: any unbalanced, misordered or empty pair escapes every parenthesis.
    pub fn escape_unclosed_brackets(input: &str) -> String {
        let mut opens = 0usize;
        let mut closes = 0usize;
        let mut depth = 0i64;
        let mut broken = false;
        let mut previous: Option<(usize, u8)> = None;

        for (i, b) in unescaped_bytes(input.as_bytes()) {
            match b {
                b'(' => {
                    opens += 1;
                    depth += 1;
                }
                b')' => {
                    closes += 1;
                    depth -= 1;
                    if depth < 0 {
                        broken = true;
                    }
                    if i > 0 && previous == Some((i - 1, b'(')) {
                        broken = true;
                    }
                }
                _ => {}
            }
            previous = Some((i, b));
        }

        if opens == 0 && closes == 0 {
            return input.to_string();
        }

        if opens != closes || broken {
            return escape_all_brackets(input);
        }

        input.to_string()
    }

    /// Text handed to the query-syntax match clause.
    pub fn prepare_query_string(input: &str) -> String {
        let protected = if Self::contains_url(input) {
            Self::process_string_with_urls(input)
        } else {
            input.to_string()
        };

        let quoted = Self::escape_unclosed_quotes(&protected);
        Self::escape_unclosed_brackets(&quoted)
    }
}

fn escape_url(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len() + 8);
    for c in url.chars() {
        if RESERVED_CHARACTERS.contains(&c) || c == '(' || c == ')' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn escape_all_brackets(input: &str) -> String {
    let mut output = String::with_capacity(input.len() + 8);
    let mut escaped = false;
    for c in input.chars() {
        if (c == '(' || c == ')') && !escaped {
            output.push('\\');
        }
        escaped = c == '\\' && !escaped;
        output.push(c);
    }
    output
}

/// Bytes not escaped by the backslash run before them, with their offsets.
/// A backslash escapes the next byte unless it is escaped itself.
fn unescaped_bytes(bytes: &[u8]) -> impl Iterator<Item = (usize, u8)> + '_ {
    bytes
        .iter()
        .enumerate()
        .scan(false, |escaped, (i, &b)| {
            let skip = *escaped;
            *escaped = b == b'\\' && !skip;
            Some((i, b, skip))
        })
        .filter(|&(_, _, skip)| !skip)
        .map(|(i, b, _)| (i, b))
}
