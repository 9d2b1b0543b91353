//! Tree-walking executor.

use std::borrow::Cow;
use std::io::Write;

use serde_json::Value;

use super::TemplateSet;
use super::ast::{Expr, Node};
use crate::domain::error::TemplateError;

/// Maximum nesting of `{{template}}` calls before execution is aborted.
pub const MAX_DEPTH: usize = 256;

pub(crate) fn run<W: Write + ?Sized>(
    set: &TemplateSet,
    name: &str,
    sink: &mut W,
    data: &Value,
) -> Result<(), TemplateError> {
    let mut state = State {
        set,
        sink,
        depth: 0,
    };
    state.call(name, 0, name, data)
}

struct State<'a, W: Write + ?Sized> {
    set: &'a TemplateSet,
    sink: &'a mut W,
    depth: usize,
}

impl<'a, W: Write + ?Sized> State<'a, W> {
    fn call(
        &mut self,
        caller: &str,
        line: usize,
        name: &str,
        dot: &Value,
    ) -> Result<(), TemplateError> {
        let set: &'a TemplateSet = self.set;
        let Some(nodes) = set.lookup(name) else {
            return Err(TemplateError::execution(
                caller,
                line,
                format!("no such template {name:?}"),
            ));
        };
        if self.depth >= MAX_DEPTH {
            return Err(TemplateError::execution(
                caller,
                line,
                format!("exceeded maximum template depth ({MAX_DEPTH})"),
            ));
        }

        // `$` is rebound to the argument for the duration of the call.
        self.depth += 1;
        let result = self.walk(name, nodes, dot, dot);
        self.depth -= 1;
        result
    }

    fn walk(
        &mut self,
        template: &str,
        nodes: &[Node],
        dot: &Value,
        root: &Value,
    ) -> Result<(), TemplateError> {
        for node in nodes {
            match node {
                Node::Text(text) => self.write(template, text)?,
                Node::Output { expr, line } => {
                    let value = eval(template, *line, expr, dot, root)?;
                    let escaped = escape_html(&display(&value)).into_owned();
                    self.write(template, &escaped)?;
                }
                Node::Call { name, arg, line } => {
                    let value = match arg {
                        Some(expr) => eval(template, *line, expr, dot, root)?,
                        None => Cow::Owned(Value::Null),
                    };
                    self.call(template, *line, name, &value)?;
                }
                Node::If {
                    arms,
                    otherwise,
                    line,
                } => {
                    let mut chosen = otherwise;
                    for (cond, body) in arms {
                        if truthy(&*eval(template, *line, cond, dot, root)?) {
                            chosen = body;
                            break;
                        }
                    }
                    self.walk(template, chosen, dot, root)?;
                }
                Node::With {
                    expr,
                    body,
                    otherwise,
                    line,
                } => {
                    let value = eval(template, *line, expr, dot, root)?;
                    if truthy(&value) {
                        self.walk(template, body, &value, root)?;
                    } else {
                        self.walk(template, otherwise, dot, root)?;
                    }
                }
                Node::Range {
                    expr,
                    body,
                    otherwise,
                    line,
                } => {
                    let value = eval(template, *line, expr, dot, root)?;
                    match &*value {
                        Value::Array(items) if !items.is_empty() => {
                            for item in items {
                                self.walk(template, body, item, root)?;
                            }
                        }
                        Value::Object(map) if !map.is_empty() => {
                            for item in map.values() {
                                self.walk(template, body, item, root)?;
                            }
                        }
                        Value::Array(_) | Value::Object(_) | Value::Null => {
                            self.walk(template, otherwise, dot, root)?;
                        }
                        other => {
                            return Err(TemplateError::execution(
                                template,
                                *line,
                                format!("range can't iterate over {other}"),
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn write(&mut self, template: &str, text: &str) -> Result<(), TemplateError> {
        self.sink
            .write_all(text.as_bytes())
            .map_err(|e| TemplateError::Write {
                template: template.to_string(),
                reason: e.to_string(),
            })
    }
}

fn eval<'v>(
    template: &str,
    line: usize,
    expr: &Expr,
    dot: &'v Value,
    root: &'v Value,
) -> Result<Cow<'v, Value>, TemplateError> {
    match expr {
        Expr::Dot => Ok(Cow::Borrowed(dot)),
        Expr::Field(chain) => lookup(template, line, dot, chain).map(Cow::Borrowed),
        Expr::Root(chain) => lookup(template, line, root, chain).map(Cow::Borrowed),
        Expr::Literal(value) => Ok(Cow::Owned(value.clone())),
    }
}

fn lookup<'v>(
    template: &str,
    line: usize,
    start: &'v Value,
    chain: &[String],
) -> Result<&'v Value, TemplateError> {
    let mut value = start;
    for key in chain {
        value = match value {
            Value::Object(map) => map.get(key).ok_or_else(|| {
                TemplateError::execution(template, line, format!("map has no entry for key {key:?}"))
            })?,
            Value::Null => {
                return Err(TemplateError::execution(
                    template,
                    line,
                    format!("nil data; no entry for key {key:?}"),
                ));
            }
            other => {
                return Err(TemplateError::execution(
                    template,
                    line,
                    format!("can't evaluate field {key} in type {}", kind(other)),
                ));
            }
        };
    }
    Ok(value)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "nil",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Truthiness: false, 0, nil and empty collections are false.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn display(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::String(s) => Cow::Borrowed(s),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}

/// Escape text for HTML element and attribute content.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&#34;x&#34;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert!(matches!(escape_html("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(""), json!([]), json!({})] {
            assert!(!truthy(&falsy), "{falsy} should be false");
        }
        for t in [json!(true), json!(1), json!(-0.5), json!("x"), json!([0]), json!({"a": 0})] {
            assert!(truthy(&t), "{t} should be true");
        }
    }

    #[test]
    fn display_values() {
        assert_eq!(display(&json!(null)), "");
        assert_eq!(display(&json!("hi")), "hi");
        assert_eq!(display(&json!(42)), "42");
        assert_eq!(display(&json!(true)), "true");
        assert_eq!(display(&json!([1, "a"])), r#"[1,"a"]"#);
    }

    #[test]
    fn lookup_reports_missing_keys() {
        let data = json!({"Page": {"Title": "About"}});
        let chain = vec!["Page".to_string(), "Title".to_string()];
        assert_eq!(lookup("t", 1, &data, &chain).unwrap(), &json!("About"));

        let missing = vec!["Page".to_string(), "Author".to_string()];
        let err = lookup("t", 7, &data, &missing).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"template: t:7: map has no entry for key "Author""#
        );
    }

    #[test]
    fn lookup_on_nil_and_scalars() {
        let chain = vec!["Title".to_string()];
        let nil = lookup("t", 1, &Value::Null, &chain).unwrap_err();
        assert!(nil.to_string().contains("nil data"));
        let scalar = lookup("t", 1, &json!("x"), &chain).unwrap_err();
        assert!(scalar.to_string().contains("in type string"));
    }
}
