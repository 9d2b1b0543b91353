//! Recursive-descent parser from lexer segments to [`Node`] trees.

use serde_json::Value;

use super::ast::{Expr, Node};
use super::lexer::{self, Segment, Token};
use crate::domain::error::TemplateError;

/// Result of parsing one asset.
#[derive(Debug)]
pub(crate) struct ParsedFile {
    /// Top-level body, registered under the asset path.
    pub body: Vec<Node>,
    /// `{{define}}` and `{{block}}` bodies, in source order.
    pub defines: Vec<Define>,
}

#[derive(Debug)]
pub(crate) struct Define {
    pub name: String,
    pub body: Vec<Node>,
    pub line: usize,
}

/// What ended a node list.
enum Terminator {
    Eof,
    End { line: usize },
    Else { cond: Option<Expr>, line: usize },
}

enum Step {
    Node(Node),
    Nothing,
    Stop(Terminator),
}

pub(crate) fn parse(path: &str, source: &str) -> Result<ParsedFile, TemplateError> {
    let segments = lexer::segments(path, source)?;
    let mut parser = Parser {
        path,
        segments: segments.into_iter(),
        defines: Vec::new(),
        nesting: 0,
    };

    let (body, end) = parser.parse_list()?;
    match end {
        Terminator::Eof => Ok(ParsedFile {
            body,
            defines: parser.defines,
        }),
        Terminator::End { line } => Err(parser.error(line, "unexpected {{end}}")),
        Terminator::Else { line, .. } => Err(parser.error(line, "unexpected {{else}}")),
    }
}

struct Parser<'a> {
    path: &'a str,
    segments: std::vec::IntoIter<Segment>,
    defines: Vec<Define>,
    nesting: usize,
}

impl Parser<'_> {
    fn error(&self, line: usize, message: impl Into<String>) -> TemplateError {
        TemplateError::parse(self.path, line, message)
    }

    fn parse_list(&mut self) -> Result<(Vec<Node>, Terminator), TemplateError> {
        let mut nodes = Vec::new();
        while let Some(segment) = self.segments.next() {
            match segment {
                Segment::Text(text) => nodes.push(Node::Text(text)),
                Segment::Action { body, line } => {
                    let tokens = lexer::tokenize(self.path, line, &body)?;
                    match self.action(&tokens, line)? {
                        Step::Node(node) => nodes.push(node),
                        Step::Nothing => {}
                        Step::Stop(term) => return Ok((nodes, term)),
                    }
                }
            }
        }
        Ok((nodes, Terminator::Eof))
    }

    fn action(&mut self, tokens: &[Token], line: usize) -> Result<Step, TemplateError> {
        let keyword = match tokens.first() {
            Some(Token::Ident(word)) => word.as_str(),
            _ => "",
        };
        let args = tokens.get(1..).unwrap_or_default();

        match keyword {
            "end" => {
                if let Some(extra) = args.first() {
                    return Err(self.error(line, format!("unexpected {} in end", describe(extra))));
                }
                Ok(Step::Stop(Terminator::End { line }))
            }
            "else" => match args.first() {
                None => Ok(Step::Stop(Terminator::Else { cond: None, line })),
                Some(Token::Ident(word)) if word == "if" => {
                    let cond = self.operand(&args[1..], line, "if")?;
                    Ok(Step::Stop(Terminator::Else {
                        cond: Some(cond),
                        line,
                    }))
                }
                Some(other) => Err(self.error(
                    line,
                    format!("unexpected {} after else", describe(other)),
                )),
            },
            "if" => {
                let cond = self.operand(args, line, "if")?;
                self.parse_if(cond, line).map(Step::Node)
            }
            "with" => {
                let expr = self.operand(args, line, "with")?;
                let (body, otherwise) = self.parse_branches("with", line)?;
                Ok(Step::Node(Node::With {
                    expr,
                    body,
                    otherwise,
                    line,
                }))
            }
            "range" => {
                let expr = self.operand(args, line, "range")?;
                let (body, otherwise) = self.parse_branches("range", line)?;
                Ok(Step::Node(Node::Range {
                    expr,
                    body,
                    otherwise,
                    line,
                }))
            }
            "define" => {
                if self.nesting > 0 {
                    return Err(self.error(line, "{{define}} is only allowed at the top level"));
                }
                let name = self.template_name(args, line, "define")?;
                if let Some(extra) = args.get(1) {
                    return Err(self.error(
                        line,
                        format!("unexpected {} in define clause", describe(extra)),
                    ));
                }
                let body = self.nested_body("define", line)?;
                self.defines.push(Define { name, body, line });
                Ok(Step::Nothing)
            }
            "block" => {
                let name = self.template_name(args, line, "block")?;
                let arg = self.optional_operand(&args[1..], line, "block")?;
                let body = self.nested_body("block", line)?;
                self.defines.push(Define {
                    name: name.clone(),
                    body,
                    line,
                });
                Ok(Step::Node(Node::Call { name, arg, line }))
            }
            "template" => {
                let name = self.template_name(args, line, "template")?;
                let arg = self.optional_operand(&args[1..], line, "template")?;
                Ok(Step::Node(Node::Call { name, arg, line }))
            }
            _ => {
                let expr = self.operand(tokens, line, "command")?;
                Ok(Step::Node(Node::Output { expr, line }))
            }
        }
    }

    fn parse_if(&mut self, first: Expr, line: usize) -> Result<Node, TemplateError> {
        let mut arms = Vec::new();
        let mut cond = first;
        loop {
            self.nesting += 1;
            let parsed = self.parse_list();
            self.nesting -= 1;
            let (body, term) = parsed?;
            arms.push((cond, body));

            match term {
                Terminator::End { .. } => {
                    return Ok(Node::If {
                        arms,
                        otherwise: Vec::new(),
                        line,
                    });
                }
                Terminator::Else {
                    cond: Some(next), ..
                } => cond = next,
                Terminator::Else { cond: None, .. } => {
                    let otherwise = self.nested_body("if", line)?;
                    return Ok(Node::If {
                        arms,
                        otherwise,
                        line,
                    });
                }
                Terminator::Eof => {
                    return Err(self.error(line, "unexpected EOF: {{if}} is never closed"));
                }
            }
        }
    }

    /// Body plus optional `{{else}}` body for `with` and `range`.
    fn parse_branches(
        &mut self,
        kind: &str,
        line: usize,
    ) -> Result<(Vec<Node>, Vec<Node>), TemplateError> {
        self.nesting += 1;
        let parsed = self.parse_list();
        self.nesting -= 1;
        let (body, term) = parsed?;

        match term {
            Terminator::End { .. } => Ok((body, Vec::new())),
            Terminator::Else { cond: None, .. } => {
                let otherwise = self.nested_body(kind, line)?;
                Ok((body, otherwise))
            }
            Terminator::Else { line: at, .. } => Err(self.error(
                at,
                format!("{{{{else if}}}} is not allowed in {{{{{kind}}}}}"),
            )),
            Terminator::Eof => Err(self.error(
                line,
                format!("unexpected EOF: {{{{{kind}}}}} is never closed"),
            )),
        }
    }

    /// A body that must end with `{{end}}` and admits no `{{else}}`.
    fn nested_body(&mut self, kind: &str, line: usize) -> Result<Vec<Node>, TemplateError> {
        self.nesting += 1;
        let parsed = self.parse_list();
        self.nesting -= 1;
        let (body, term) = parsed?;

        match term {
            Terminator::End { .. } => Ok(body),
            Terminator::Else { line: at, .. } => Err(self.error(
                at,
                format!("unexpected {{{{else}}}} in {{{{{kind}}}}}"),
            )),
            Terminator::Eof => Err(self.error(
                line,
                format!("unexpected EOF: {{{{{kind}}}}} is never closed"),
            )),
        }
    }

    fn template_name(&self, args: &[Token], line: usize, kind: &str) -> Result<String, TemplateError> {
        match args.first() {
            Some(Token::Str(name)) => Ok(name.clone()),
            _ => Err(self.error(
                line,
                format!("{kind} clause requires a quoted template name"),
            )),
        }
    }

    fn optional_operand(
        &self,
        tokens: &[Token],
        line: usize,
        context: &str,
    ) -> Result<Option<Expr>, TemplateError> {
        if tokens.is_empty() {
            return Ok(None);
        }
        self.operand(tokens, line, context).map(Some)
    }

    /// Exactly one operand.
    fn operand(&self, tokens: &[Token], line: usize, context: &str) -> Result<Expr, TemplateError> {
        let first = match tokens {
            [] => return Err(self.error(line, format!("missing value for {context}"))),
            [only] => only,
            [_, extra, ..] => {
                return Err(self.error(
                    line,
                    format!(
                        "unexpected {} in {context}; only one operand is allowed",
                        describe(extra)
                    ),
                ));
            }
        };

        match first {
            Token::Dot => Ok(Expr::Dot),
            Token::Field(chain) => Ok(Expr::Field(chain.clone())),
            Token::Root(chain) => Ok(Expr::Root(chain.clone())),
            Token::Str(s) => Ok(Expr::Literal(Value::String(s.clone()))),
            Token::Number(n) => Ok(Expr::Literal(Value::Number(n.clone()))),
            Token::Ident(word) => match word.as_str() {
                "true" => Ok(Expr::Literal(Value::Bool(true))),
                "false" => Ok(Expr::Literal(Value::Bool(false))),
                "nil" => Err(self.error(line, "nil is not a command")),
                other => Err(self.error(line, format!("function {other:?} not defined"))),
            },
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Dot => "<.>".into(),
        Token::Field(chain) => format!("<.{}>", chain.join(".")),
        Token::Root(chain) if chain.is_empty() => "<$>".into(),
        Token::Root(chain) => format!("<$.{}>", chain.join(".")),
        Token::Ident(word) => format!("<{word}>"),
        Token::Str(s) => format!("{s:?}"),
        Token::Number(n) => format!("<{n}>"),
    }
}
