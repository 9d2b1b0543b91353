//! Parsed template trees.

use serde_json::Value;

/// A value-producing operand inside an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `.` - the current cursor value.
    Dot,
    /// `.Field.Sub` - a chain of lookups on the cursor.
    Field(Vec<String>),
    /// `$` or `$.Field` - lookups on the value the set was executed with.
    Root(Vec<String>),
    /// A string, number or boolean constant.
    Literal(Value),
}

/// One node of a template body.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Raw template text, emitted verbatim.
    Text(String),
    /// `{{expr}}`, emitted HTML-escaped.
    Output { expr: Expr, line: usize },
    /// `{{template "name" expr}}`.
    Call {
        name: String,
        arg: Option<Expr>,
        line: usize,
    },
    /// `{{if}}` with any number of `{{else if}}` arms.
    If {
        arms: Vec<(Expr, Vec<Node>)>,
        otherwise: Vec<Node>,
        line: usize,
    },
    /// `{{with}}`: rebinds the cursor when the value is truthy.
    With {
        expr: Expr,
        body: Vec<Node>,
        otherwise: Vec<Node>,
        line: usize,
    },
    /// `{{range}}` over arrays and objects.
    Range {
        expr: Expr,
        body: Vec<Node>,
        otherwise: Vec<Node>,
        line: usize,
    },
}

/// Every `{{template}}` call reachable from `nodes`, with its line.
pub(crate) fn calls(nodes: &[Node]) -> Vec<(&str, usize)> {
    let mut out = Vec::new();
    collect_calls(nodes, &mut out);
    out
}

fn collect_calls<'a>(nodes: &'a [Node], out: &mut Vec<(&'a str, usize)>) {
    for node in nodes {
        match node {
            Node::Call { name, line, .. } => out.push((name.as_str(), *line)),
            Node::If { arms, otherwise, .. } => {
                for (_, body) in arms {
                    collect_calls(body, out);
                }
                collect_calls(otherwise, out);
            }
            Node::With { body, otherwise, .. } | Node::Range { body, otherwise, .. } => {
                collect_calls(body, out);
                collect_calls(otherwise, out);
            }
            Node::Text(_) | Node::Output { .. } => {}
        }
    }
}
