//! Page Renderer - composes a base layout with one page and executes it.
//!
//! The workflow for every render:
//! 1. Validate the page name
//! 2. Parse the base layout and the page asset into one template set
//! 3. Execute the base layout against the context, streaming to the sink
//!
//! Template sets are rebuilt on every call; nothing is cached.

use std::io::Write;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{AssetProvider, AssetProviderExt},
    },
    error::{VellumError, VellumResult},
};

/// Where the base layout and the pages live inside an asset set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Path of the base layout, executed for every page.
    pub base: String,
    /// Directory holding one asset per page.
    pub pages_dir: String,
    /// Extension shared by page assets, including the dot.
    pub extension: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            base: "base.tmpl".into(),
            pages_dir: "pages".into(),
            extension: ".tmpl".into(),
        }
    }
}

impl PageLayout {
    /// Asset path for a page identifier, e.g. `about` -> `pages/about.tmpl`.
    pub fn page_path(&self, page: &str) -> String {
        if self.pages_dir.is_empty() {
            format!("{}{}", page, self.extension)
        } else {
            format!("{}/{}{}", self.pages_dir, page, self.extension)
        }
    }

    /// Page identifier for an asset path, if the path is a page.
    pub fn page_name<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = if self.pages_dir.is_empty() {
            path
        } else {
            path.strip_prefix(self.pages_dir.as_str())?.strip_prefix('/')?
        };
        let name = rest.strip_suffix(self.extension.as_str())?;
        (!name.is_empty() && !name.contains('/')).then_some(name)
    }
}

/// Service rendering pages out of an [`AssetProvider`].
///
/// Cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct PageRenderer {
    provider: Arc<dyn AssetProvider>,
    layout: PageLayout,
}

impl PageRenderer {
    /// Create a renderer over `provider` with the default layout.
    pub fn new(provider: Arc<dyn AssetProvider>) -> Self {
        Self {
            provider,
            layout: PageLayout::default(),
        }
    }

    /// Replace the asset layout.
    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn provider(&self) -> &Arc<dyn AssetProvider> {
        &self.provider
    }

    /// Render `page` inside the base layout, writing to `sink`.
    ///
    /// Output is written as it is produced; on error the sink may already
    /// hold a partial page.
    #[instrument(skip(self, context, sink))]
    pub fn render_page(
        &self,
        page: &str,
        context: &Value,
        sink: &mut dyn Write,
    ) -> VellumResult<()> {
        validate_page_name(page)?;

        let paths = [self.layout.base.clone(), self.layout.page_path(page)];
        debug!(base = %paths[0], page_path = %paths[1], "Resolving page assets");

        let set = self.provider.parse_set(&paths)?;
        set.execute(sink, context)?;

        info!("Page rendered");
        Ok(())
    }

    /// Render `page` into a `String`.
    pub fn render_to_string(&self, page: &str, context: &Value) -> VellumResult<String> {
        let mut out = Vec::new();
        self.render_page(page, context, &mut out)?;
        String::from_utf8(out).map_err(|e| VellumError::Internal {
            message: format!("rendered page is not UTF-8: {e}"),
        })
    }

    /// Identifiers of every page the provider holds, sorted. The base
    /// layout is never listed, even when it sits beside the pages.
    pub fn pages(&self) -> Vec<String> {
        self.provider
            .paths()
            .iter()
            .filter(|path| **path != self.layout.base)
            .filter_map(|path| self.layout.page_name(path))
            .map(String::from)
            .collect()
    }
}

impl std::fmt::Debug for PageRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRenderer")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

fn validate_page_name(name: &str) -> Result<(), ApplicationError> {
    let reason = if name.is_empty() {
        "page name cannot be empty"
    } else if name.contains(['/', '\\']) {
        "page name cannot contain path separators"
    } else if name.contains("..") {
        "page name cannot contain '..'"
    } else {
        return Ok(());
    };
    Err(ApplicationError::InvalidPageName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockAssetProvider;
    use crate::domain::{AssetFile, ModifiedTime, TemplateError};
    use serde_json::json;

    const BASE: &str = r#"<title>{{template "title" .}}</title>{{template "content" .}}"#;

    fn renderer(files: &'static [(&'static str, &'static str)]) -> PageRenderer {
        let mut mock = MockAssetProvider::new();
        mock.expect_open().returning(move |path| {
            files
                .iter()
                .find(|(p, _)| *p == path)
                .map(|(p, content)| {
                    AssetFile::new(*p, content.as_bytes(), ModifiedTime::unknown())
                })
                .ok_or_else(|| ApplicationError::not_found(path).into())
        });
        mock.expect_paths()
            .returning(move || files.iter().map(|(p, _)| p.to_string()).collect());
        PageRenderer::new(Arc::new(mock))
    }

    #[test]
    fn renders_page_inside_base() {
        let renderer = renderer(&[
            ("base.tmpl", BASE),
            (
                "pages/about.tmpl",
                r#"{{define "title"}}About{{end}}{{define "content"}}<p>us</p>{{end}}"#,
            ),
        ]);
        let html = renderer.render_to_string("about", &Value::Null).unwrap();
        assert_eq!(html, "<title>About</title><p>us</p>");
    }

    #[test]
    fn context_flows_into_blocks() {
        let renderer = renderer(&[
            ("base.tmpl", BASE),
            (
                "pages/hello.tmpl",
                r#"{{define "title"}}Hi{{end}}{{define "content"}}{{.Name}}{{end}}"#,
            ),
        ]);
        let html = renderer
            .render_to_string("hello", &json!({"Name": "Ada"}))
            .unwrap();
        assert!(html.ends_with("Ada"));
    }

    #[test]
    fn null_context_with_field_reference_fails() {
        let renderer = renderer(&[
            ("base.tmpl", BASE),
            (
                "pages/hello.tmpl",
                r#"{{define "title"}}Hi{{end}}{{define "content"}}{{.Name}}{{end}}"#,
            ),
        ]);
        let err = renderer.render_to_string("hello", &Value::Null).unwrap_err();
        assert!(matches!(
            err,
            VellumError::Template(TemplateError::Execution { .. })
        ));
    }

    #[test]
    fn missing_page_is_not_found() {
        let renderer = renderer(&[("base.tmpl", BASE)]);
        let err = renderer.render_to_string("missing", &Value::Null).unwrap_err();
        assert_eq!(
            err,
            VellumError::Application(ApplicationError::AssetNotFound {
                path: "pages/missing.tmpl".into()
            })
        );
    }

    #[test]
    fn page_without_required_block_is_a_parse_error() {
        let renderer = renderer(&[
            ("base.tmpl", BASE),
            ("pages/partial.tmpl", r#"{{define "title"}}T{{end}}"#),
        ]);
        let err = renderer.render_to_string("partial", &Value::Null).unwrap_err();
        assert!(matches!(err, VellumError::Template(TemplateError::Parse { .. })));
    }

    #[test]
    fn invalid_page_names_are_rejected_before_lookup() {
        // No expectations: any provider call would panic.
        let renderer = PageRenderer::new(Arc::new(MockAssetProvider::new()));
        for name in ["", "../base", "a/b", "a\\b", ".."] {
            let err = renderer.render_to_string(name, &Value::Null).unwrap_err();
            assert!(
                matches!(
                    err,
                    VellumError::Application(ApplicationError::InvalidPageName { .. })
                ),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn pages_are_derived_from_paths() {
        let renderer = renderer(&[
            ("base.tmpl", BASE),
            ("pages/about.tmpl", ""),
            ("pages/home.tmpl", ""),
            ("pages/nested/deep.tmpl", ""),
            ("pages/notes.txt", ""),
        ]);
        assert_eq!(renderer.pages(), vec!["about", "home"]);
    }

    #[test]
    fn custom_layout() {
        let layout = PageLayout {
            base: "layout.html".into(),
            pages_dir: String::new(),
            extension: ".html".into(),
        };
        assert_eq!(layout.page_path("index"), "index.html");
        assert_eq!(layout.page_name("index.html"), Some("index"));
        assert_eq!(layout.page_name("layout.html"), Some("layout"));
        assert_eq!(PageLayout::default().page_path("about"), "pages/about.tmpl");
    }
}
