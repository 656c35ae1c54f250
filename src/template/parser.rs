//! Scanner that splits a template into literal and placeholder tokens.

use super::token::Token;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Parses `template` into tokens.
///
/// Never fails: an opening `{{` without a matching `}}` is kept as literal
/// text through the end of the input.
#[must_use]
pub fn parse(template: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(open) = rest.find(OPEN) {
        let after_open = &rest[open + OPEN.len()..];
        let Some(close) = after_open.find(CLOSE) else {
            break;
        };

        literal.push_str(&rest[..open]);
        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        tokens.push(Token::Placeholder(after_open[..close].trim().to_string()));
        rest = &after_open[close + CLOSE.len()..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}
