//! Two-stage lexer.
//!
//! [`segments`] splits a source into raw text and `{{ ... }}` action bodies,
//! applying `{{-` / `-}}` whitespace trimming and dropping comments.
//! [`tokenize`] then breaks a single action body into tokens.

use serde_json::Number;

use crate::domain::error::TemplateError;

const LEFT: &str = "{{";
const RIGHT: &str = "}}";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Segment {
    Text(String),
    Action { body: String, line: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Dot,
    Field(Vec<String>),
    Root(Vec<String>),
    Ident(String),
    Str(String),
    Number(Number),
}

enum Scanned<'a> {
    Comment,
    Action(&'a str),
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split `source` into text and action segments.
pub(crate) fn segments(path: &str, source: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut out = Vec::new();
    let mut rest = source;
    let mut line = 1;
    let mut trim_next = false;

    while !rest.is_empty() {
        let Some(start) = rest.find(LEFT) else {
            push_text(&mut out, rest, trim_next, false);
            break;
        };

        let text = &rest[..start];
        let after = &rest[start + LEFT.len()..];
        let trim_left = after.starts_with('-') && after[1..].starts_with(is_space);
        push_text(&mut out, text, trim_next, trim_left);
        line += text.matches('\n').count();

        let inner = if trim_left { &after[1..] } else { after };
        let (scanned, consumed, trim_right) = scan_action(path, line, inner)?;
        if let Scanned::Action(body) = scanned {
            out.push(Segment::Action {
                body: body.trim_matches(is_space).to_string(),
                line,
            });
        }

        line += inner[..consumed].matches('\n').count();
        trim_next = trim_right;
        rest = &inner[consumed..];
    }

    Ok(out)
}

fn push_text(out: &mut Vec<Segment>, text: &str, trim_start: bool, trim_end: bool) {
    let mut text = text;
    if trim_start {
        text = text.trim_start_matches(is_space);
    }
    if trim_end {
        text = text.trim_end_matches(is_space);
    }
    if !text.is_empty() {
        out.push(Segment::Text(text.to_string()));
    }
}

/// Find the end of one action. Returns the body, the number of bytes
/// consumed including the closing delimiter, and whether `-}}` was used.
fn scan_action<'a>(
    path: &str,
    line: usize,
    inner: &'a str,
) -> Result<(Scanned<'a>, usize, bool), TemplateError> {
    let leading = inner.len() - inner.trim_start_matches(is_space).len();
    if inner[leading..].starts_with("/*") {
        return scan_comment(path, line, inner, leading);
    }

    let bytes = inner.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i += 1;
                loop {
                    match bytes.get(i) {
                        None | Some(b'\n') => {
                            return Err(TemplateError::parse(
                                path,
                                line,
                                "unterminated quoted string",
                            ));
                        }
                        Some(b'\\') => i += 2,
                        Some(b'"') => break,
                        Some(_) => i += 1,
                    }
                }
                i += 1;
            }
            b'`' => {
                let Some(end) = inner[i + 1..].find('`') else {
                    return Err(TemplateError::parse(
                        path,
                        line,
                        "unterminated raw quoted string",
                    ));
                };
                i += end + 2;
            }
            b'}' if inner[i..].starts_with(RIGHT) => {
                let body = &inner[..i];
                let trimmed = body.strip_suffix('-').filter(|b| b.ends_with(is_space));
                let consumed = i + RIGHT.len();
                return Ok(match trimmed {
                    Some(b) => (Scanned::Action(b), consumed, true),
                    None => (Scanned::Action(body), consumed, false),
                });
            }
            _ => i += 1,
        }
    }

    Err(TemplateError::parse(path, line, "unclosed action"))
}

fn scan_comment<'a>(
    path: &str,
    line: usize,
    inner: &'a str,
    open: usize,
) -> Result<(Scanned<'a>, usize, bool), TemplateError> {
    let Some(close) = inner[open + 2..].find("*/") else {
        return Err(TemplateError::parse(path, line, "unclosed comment"));
    };
    let after = open + 2 + close + 2;
    let tail = &inner[after..];

    if tail.starts_with(RIGHT) {
        return Ok((Scanned::Comment, after + RIGHT.len(), false));
    }
    let spaces = tail.len() - tail.trim_start_matches(is_space).len();
    if spaces > 0 && tail[spaces..].starts_with("-}}") {
        return Ok((Scanned::Comment, after + spaces + 3, true));
    }

    Err(TemplateError::parse(
        path,
        line,
        "comment ends before closing delimiter",
    ))
}

/// Break one action body into tokens.
pub(crate) fn tokenize(path: &str, line: usize, body: &str) -> Result<Vec<Token>, TemplateError> {
    let chars: Vec<char> = body.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    let err = |message: String| TemplateError::parse(path, line, message);

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if is_space(c) => i += 1,
            '.' => {
                if chars.get(i + 1).copied().is_some_and(is_ident_start) {
                    let (chain, next) = field_chain(&chars, i);
                    tokens.push(Token::Field(chain));
                    i = next;
                } else {
                    tokens.push(Token::Dot);
                    i += 1;
                }
            }
            '$' => {
                match chars.get(i + 1).copied() {
                    Some('.') if chars.get(i + 2).copied().is_some_and(is_ident_start) => {
                        let (chain, next) = field_chain(&chars, i + 1);
                        tokens.push(Token::Root(chain));
                        i = next;
                    }
                    Some(n) if is_ident_char(n) => {
                        return Err(err("template variables are not supported".into()));
                    }
                    _ => {
                        tokens.push(Token::Root(Vec::new()));
                        i += 1;
                    }
                }
            }
            '"' => {
                let mut value = String::new();
                i += 1;
                loop {
                    match chars.get(i) {
                        None => return Err(err("unterminated quoted string".into())),
                        Some('"') => break,
                        Some('\\') => {
                            let escaped = match chars.get(i + 1) {
                                Some('n') => '\n',
                                Some('t') => '\t',
                                Some('r') => '\r',
                                Some('\\') => '\\',
                                Some('"') => '"',
                                other => {
                                    return Err(err(format!("invalid escape {:?}", other)));
                                }
                            };
                            value.push(escaped);
                            i += 2;
                        }
                        Some(&ch) => {
                            value.push(ch);
                            i += 1;
                        }
                    }
                }
                tokens.push(Token::Str(value));
                i += 1;
            }
            '`' => {
                let start = i + 1;
                let Some(len) = chars[start..].iter().position(|&ch| ch == '`') else {
                    return Err(err("unterminated raw quoted string".into()));
                };
                tokens.push(Token::Str(chars[start..start + len].iter().collect()));
                i = start + len + 1;
            }
            c if c.is_ascii_digit()
                || (c == '-' && chars.get(i + 1).is_some_and(|d| d.is_ascii_digit())) =>
            {
                let start = i;
                i += 1;
                while let Some(&ch) = chars.get(i) {
                    let exponent_sign = (ch == '+' || ch == '-')
                        && matches!(chars.get(i - 1), Some('e') | Some('E'));
                    if ch.is_ascii_digit() || ch == '.' || ch == 'e' || ch == 'E' || exponent_sign
                    {
                        i += 1;
                    } else {
                        break;
                    }
                }
                let text: String = chars[start..i].iter().collect();
                tokens.push(Token::Number(parse_number(&text).ok_or_else(|| {
                    err(format!("bad number syntax: {:?}", text))
                })?));
            }
            c if is_ident_start(c) => {
                let start = i;
                while chars.get(i).copied().is_some_and(is_ident_char) {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            '|' | '(' | ')' => {
                return Err(err("pipelines and function calls are not supported".into()));
            }
            other => return Err(err(format!("unexpected {:?} in action", other))),
        }
    }

    Ok(tokens)
}

/// Read `.A.B.C` starting at the dot at `start`.
fn field_chain(chars: &[char], start: usize) -> (Vec<String>, usize) {
    let mut chain = Vec::new();
    let mut i = start;
    while chars.get(i) == Some(&'.') && chars.get(i + 1).copied().is_some_and(is_ident_start) {
        i += 1;
        let begin = i;
        while chars.get(i).copied().is_some_and(is_ident_char) {
            i += 1;
        }
        chain.push(chars[begin..i].iter().collect());
    }
    (chain, i)
}

fn parse_number(text: &str) -> Option<Number> {
    if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>().ok().and_then(Number::from_f64)
    } else {
        text.parse::<i64>().ok().map(Number::from)
    }
}
