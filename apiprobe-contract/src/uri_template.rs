//! RFC 6570 URI Template syntax check
//!
//! Used as the `uri` format: any syntactically valid template is accepted,
//! which includes every plain absolute or relative URI.

/// Operators defined by level 2-4 templates
const OPERATORS: &[char] = &['+', '#', '.', '/', ';', '?', '&'];

/// Operators reserved for future extensions
const RESERVED_OPERATORS: &[char] = &['=', ',', '!', '@', '|'];

/// Whether `input` parses as an RFC 6570 URI Template
pub fn is_uri_template(input: &str) -> bool {
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        match c {
            '{' => {
                let Some(end) = rest.find('}') else {
                    return false;
                };
                if !is_expression(&rest[1..end]) {
                    return false;
                }
                rest = &rest[end + 1..];
            }
            '%' => {
                if !rest.as_bytes().get(1..3).is_some_and(is_pct_pair) {
                    return false;
                }
                rest = &rest[3..];
            }
            c if !is_literal(c) => return false,
            c => rest = &rest[c.len_utf8()..],
        }
    }

    true
}

fn is_literal(c: char) -> bool {
    !(c.is_control()
        || matches!(
            c,
            ' ' | '"' | '\'' | '<' | '>' | '\\' | '^' | '`' | '{' | '|' | '}'
        ))
}

fn is_pct_pair(hex: &[u8]) -> bool {
    hex.len() == 2 && hex.iter().all(u8::is_ascii_hexdigit)
}

fn is_expression(expression: &str) -> bool {
    let mut body = expression;
    if let Some(first) = body.chars().next() {
        if RESERVED_OPERATORS.contains(&first) {
            return false;
        }
        if OPERATORS.contains(&first) {
            body = &body[first.len_utf8()..];
        }
    }

    !body.is_empty() && body.split(',').all(is_varspec)
}

fn is_varspec(varspec: &str) -> bool {
    if let Some(name) = varspec.strip_suffix('*') {
        return is_varname(name);
    }

    match varspec.split_once(':') {
        Some((name, length)) => is_varname(name) && is_prefix_length(length),
        None => is_varname(varspec),
    }
}

fn is_prefix_length(length: &str) -> bool {
    (1..=4).contains(&length.len())
        && length.chars().all(|c| c.is_ascii_digit())
        && !length.starts_with('0')
}

fn is_varname(name: &str) -> bool {
    if name.is_empty() || name.starts_with('.') || name.ends_with('.') || name.contains("..") {
        return false;
    }

    let bytes = name.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                if !bytes.get(i + 1..i + 3).is_some_and(is_pct_pair) {
                    return false;
                }
                i += 3;
            }
            b if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' => i += 1,
            _ => return false,
        }
    }

    true
}
