//! The template language.
//!
//! A [`TemplateSet`] is built from one or more template assets. Each asset
//! registers its own body under its path, and every `{{define "name"}}` or
//! `{{block "name"}}` inside it registers a named template. Assets parsed
//! later override same-named definitions from earlier ones, which is how a
//! page fills in the blocks its base layout calls.
//!
//! Supported actions:
//!
//! | Action                                 | Meaning                                |
//! |----------------------------------------|----------------------------------------|
//! | `{{.}}` `{{.A.B}}` `{{$.A}}`           | output a value, HTML-escaped           |
//! | `{{"lit"}}` `{{3}}` `{{true}}`         | output a constant                      |
//! | `{{define "n"}}...{{end}}`             | define a named template (top level)    |
//! | `{{block "n" .}}...{{end}}`            | define and call in one step            |
//! | `{{template "n"}}` `{{template "n" .}}`| call a named template                  |
//! | `{{if}}` / `{{else if}}` / `{{else}}`  | conditionals                           |
//! | `{{with .A}}...{{else}}...{{end}}`     | rebind the cursor                      |
//! | `{{range .A}}...{{else}}...{{end}}`    | iterate arrays and objects             |
//! | `{{/* comment */}}`                    | ignored                                |
//! | `{{-` / `-}}`                          | trim adjacent whitespace               |

mod ast;
mod exec;
mod lexer;
mod parser;

use std::collections::BTreeMap;
use std::io::Write;

use serde_json::Value;
use tracing::{debug, trace};

use self::ast::Node;
use super::error::TemplateError;

pub use self::exec::{MAX_DEPTH, escape_html};

/// A named template body and where it came from.
#[derive(Debug, Clone)]
struct Definition {
    origin: String,
    line: usize,
    nodes: Vec<Node>,
}

impl Definition {
    /// Whitespace-only bodies never replace an existing definition.
    fn is_blank(&self) -> bool {
        self.nodes
            .iter()
            .all(|node| matches!(node, Node::Text(text) if text.trim().is_empty()))
    }
}

/// A parsed, composable collection of named templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    entry: Option<String>,
    templates: BTreeMap<String, Definition>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one template asset into the set.
    ///
    /// The first asset parsed becomes the entry template used by
    /// [`execute`](Self::execute). On error the set is left unchanged.
    pub fn parse(&mut self, path: &str, source: &str) -> Result<(), TemplateError> {
        let parsed = parser::parse(path, source)?;
        debug!(
            path,
            defines = parsed.defines.len(),
            "Parsed template asset"
        );

        self.insert(
            path.to_string(),
            Definition {
                origin: path.to_string(),
                line: 1,
                nodes: parsed.body,
            },
        );
        for define in parsed.defines {
            self.insert(
                define.name,
                Definition {
                    origin: path.to_string(),
                    line: define.line,
                    nodes: define.body,
                },
            );
        }

        if self.entry.is_none() {
            self.entry = Some(path.to_string());
        }
        Ok(())
    }

    fn insert(&mut self, name: String, definition: Definition) {
        if definition.is_blank() && self.templates.contains_key(&name) {
            trace!(name = %name, "Keeping existing definition over blank one");
            return;
        }
        if let Some(previous) = self.templates.get(&name) {
            trace!(
                name = %name,
                from = %previous.origin,
                to = %definition.origin,
                line = definition.line,
                "Template redefined"
            );
        }
        self.templates.insert(name, definition);
    }

    /// Fail if any `{{template}}` call names a template that was never defined.
    pub fn check_references(&self) -> Result<(), TemplateError> {
        for definition in self.templates.values() {
            for (name, line) in ast::calls(&definition.nodes) {
                if !self.templates.contains_key(name) {
                    return Err(TemplateError::parse(
                        &definition.origin,
                        line,
                        format!("template {name:?} is referenced but never defined"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Name of the entry template, if anything has been parsed.
    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// All template names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Execute the entry template against `data`.
    pub fn execute<W: Write + ?Sized>(
        &self,
        sink: &mut W,
        data: &Value,
    ) -> Result<(), TemplateError> {
        let Some(entry) = self.entry.as_deref() else {
            return Err(TemplateError::execution(
                "",
                0,
                "template set is empty; nothing to execute",
            ));
        };
        self.execute_template(entry, sink, data)
    }

    /// Execute a named template against `data`.
    pub fn execute_template<W: Write + ?Sized>(
        &self,
        name: &str,
        sink: &mut W,
        data: &Value,
    ) -> Result<(), TemplateError> {
        debug!(template = name, "Executing template");
        exec::run(self, name, sink, data)
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<&[Node]> {
        self.templates.get(name).map(|d| d.nodes.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = r#"<title>{{template "title" .}}</title>
<main>{{template "content" .}}</main>"#;

    fn set(files: &[(&str, &str)]) -> TemplateSet {
        let mut set = TemplateSet::new();
        for (path, source) in files {
            set.parse(path, source).unwrap();
        }
        set.check_references().unwrap();
        set
    }

    fn render(set: &TemplateSet, data: Value) -> String {
        let mut out = Vec::new();
        set.execute(&mut out, &data).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn page_fills_base_blocks() {
        let set = set(&[
            ("base.tmpl", BASE),
            (
                "pages/about.tmpl",
                r#"{{define "title"}}About{{end}}{{define "content"}}<p>Hi</p>{{end}}"#,
            ),
        ]);
        assert_eq!(set.entry(), Some("base.tmpl"));
        assert_eq!(
            render(&set, Value::Null),
            "<title>About</title>\n<main><p>Hi</p></main>"
        );
    }

    #[test]
    fn block_default_is_overridden_by_later_define() {
        let base = r#"<h1>{{block "title" .}}Default{{end}}</h1>"#;
        let alone = set(&[("base.tmpl", base)]);
        assert_eq!(render(&alone, Value::Null), "<h1>Default</h1>");

        let overridden = set(&[("base.tmpl", base), ("p.tmpl", r#"{{define "title"}}Mine{{end}}"#)]);
        assert_eq!(render(&overridden, Value::Null), "<h1>Mine</h1>");
    }

    #[test]
    fn blank_define_keeps_existing_definition() {
        let set = set(&[
            ("base.tmpl", r#"{{block "title" .}}Kept{{end}}"#),
            ("p.tmpl", "{{define \"title\"}}  \n {{end}}"),
        ]);
        assert_eq!(render(&set, Value::Null), "Kept");
    }

    #[test]
    fn missing_reference_is_a_parse_error() {
        let mut set = TemplateSet::new();
        set.parse("base.tmpl", "a\n{{template \"content\" .}}").unwrap();
        let err = set.check_references().unwrap_err();
        assert_eq!(
            err,
            TemplateError::parse(
                "base.tmpl",
                2,
                r#"template "content" is referenced but never defined"#
            )
        );
    }

    #[test]
    fn failed_parse_leaves_set_unchanged() {
        let mut set = TemplateSet::new();
        assert!(set.parse("bad.tmpl", "{{if .A}}").is_err());
        assert!(set.is_empty());
        assert_eq!(set.entry(), None);
    }

    #[test]
    fn context_fields_are_escaped() {
        let set = set(&[("t.tmpl", "<p>{{.Name}}</p>")]);
        assert_eq!(
            render(&set, json!({"Name": "<b>Tom & Jerry</b>"})),
            "<p>&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;</p>"
        );
    }

    #[test]
    fn field_on_null_context_fails() {
        let set = set(&[("t.tmpl", "x\n{{.Title}}")]);
        let err = set.execute(&mut Vec::new(), &Value::Null).unwrap_err();
        assert!(matches!(err, TemplateError::Execution { line: 2, .. }));
    }

    #[test]
    fn control_flow() {
        let set = set(&[(
            "t.tmpl",
            "{{if .Admin}}admin{{else if .User}}user{{else}}anon{{end}}|\
             {{with .User}}{{.Name}}{{else}}none{{end}}|\
             {{range .Tags}}[{{.}}]{{else}}no tags{{end}}|{{$.Site}}",
        )]);
        assert_eq!(
            render(
                &set,
                json!({"Admin": false, "User": {"Name": "ann"}, "Tags": ["a", "b"], "Site": "s"})
            ),
            "user|ann|[a][b]|s"
        );
        assert_eq!(
            render(&set, json!({"Admin": true, "User": null, "Tags": [], "Site": 1})),
            "admin|none|no tags|1"
        );
    }

    #[test]
    fn template_argument_rebinds_cursor() {
        let set = set(&[
            ("t.tmpl", r#"{{template "item" .Page}}/{{template "bare"}}"#),
            ("d.tmpl", r#"{{define "item"}}{{.Title}}{{end}}{{define "bare"}}{{.}}{{end}}"#),
        ]);
        assert_eq!(render(&set, json!({"Page": {"Title": "T"}})), "T/");
    }

    #[test]
    fn template_argument_rebinds_root() {
        let set = set(&[
            (
                "t.tmpl",
                r#"{{template "x" .Page}}|{{with .Page}}{{$.Site}}{{end}}"#,
            ),
            ("d.tmpl", r#"{{define "x"}}{{$.Title}}{{end}}"#),
        ]);
        assert_eq!(
            render(&set, json!({"Site": "s", "Page": {"Title": "T"}})),
            "T|s"
        );
    }

    #[test]
    fn runaway_recursion_is_stopped() {
        let set = set(&[(
            "t.tmpl",
            r#"{{define "loop"}}{{template "loop" .}}{{end}}{{template "loop" .}}"#,
        )]);
        let err = std::thread::Builder::new()
            .stack_size(64 * 1024 * 1024)
            .spawn(move || set.execute(&mut Vec::new(), &Value::Null).unwrap_err())
            .unwrap()
            .join()
            .unwrap();
        assert!(err.to_string().contains("maximum template depth"));
    }

    #[test]
    fn sink_failure_is_a_write_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let set = set(&[("t.tmpl", "text")]);
        let err = set.execute(&mut Broken, &Value::Null).unwrap_err();
        assert!(matches!(err, TemplateError::Write { .. }));
    }

    #[test]
    fn executing_empty_set_fails() {
        let err = TemplateSet::new().execute(&mut Vec::new(), &Value::Null).unwrap_err();
        assert!(matches!(err, TemplateError::Execution { .. }));
    }

    #[test]
    fn names_are_sorted() {
        let set = set(&[("z.tmpl", r#"{{define "a"}}{{end}}"#)]);
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["a", "z.tmpl"]);
        assert!(set.contains("a"));
        assert_eq!(set.len(), 2);
    }
}
