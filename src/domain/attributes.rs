//! Bracketed custom-attribute sub-grammar
//!
//! Parses the content between `[` and `]`: whitespace-separated tokens of the
//! form `name`, `name=value`, `name="value with spaces"` or `name='value'`.

use crate::domain::tree::Attribute;

#[derive(Default)]
struct Token {
    name: String,
    value: String,
    seen_eq: bool,
    quote: Option<char>,
}

impl Token {
    fn emit_into(&mut self, out: &mut Vec<Attribute>) {
        if !self.name.is_empty() {
            let name = std::mem::take(&mut self.name);
            let value = std::mem::take(&mut self.value);
            out.push(Attribute::new(name, value));
        }
        *self = Token::default();
    }
}

/// Parse bracket content into attributes, in encounter order.
///
/// Duplicate names are not collapsed here; the tag's merge-on-add logic
/// downstream decides between accumulate and replace. Malformed input never
/// fails: a bare name becomes an empty-valued attribute, a stray `=` is
/// ignored, and an unterminated quote is closed by the end of input.
pub fn parse_attributes(content: &str) -> Vec<Attribute> {
    let mut out = Vec::new();
    let mut token = Token::default();

    for c in content.chars() {
        if let Some(q) = token.quote {
            if c == q {
                token.emit_into(&mut out);
            } else {
                token.value.push(c);
            }
            continue;
        }
        match c {
            c if c.is_whitespace() => token.emit_into(&mut out),
            '=' if !token.seen_eq => {
                // A '=' with no name before it guards against stray input.
                if !token.name.is_empty() {
                    token.seen_eq = true;
                }
            }
            '"' | '\'' if token.seen_eq => token.quote = Some(c),
            _ => {
                if token.seen_eq {
                    token.value.push(c);
                } else {
                    token.name.push(c);
                }
            }
        }
    }
    token.emit_into(&mut out);

    out
}
