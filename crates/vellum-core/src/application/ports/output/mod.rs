//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `vellum-adapters` crate provides implementations.

use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::domain::{AssetFile, TemplateError, TemplateSet};
use crate::error::VellumResult;

/// Port for read-only access to a fixed set of template assets.
///
/// Implemented by:
/// - `vellum_adapters::EmbeddedAssets` (compiled into the binary)
/// - `vellum_adapters::DirectoryAssets` (same layout, read from disk)
/// - `vellum_adapters::MemoryAssets` (testing)
///
/// ## Design Notes
///
/// - Paths are `/`-separated and relative to the asset root
/// - Paths that leave the root never resolve, they fail as not found
/// - Implementations are immutable after construction
#[cfg_attr(test, mockall::automock)]
pub trait AssetProvider: Send + Sync {
    /// Resolve a path to a readable handle.
    fn open(&self, path: &str) -> VellumResult<AssetFile>;

    /// Every asset path, sorted.
    fn paths(&self) -> Vec<String>;

    /// Check if an asset exists at `path`.
    fn exists(&self, path: &str) -> bool {
        self.open(path).is_ok()
    }
}

/// Template parsing on top of any [`AssetProvider`].
pub trait AssetProviderExt: AssetProvider {
    /// Open, decode and parse `paths` in order into one [`TemplateSet`].
    ///
    /// Definitions from later paths override earlier ones. Once every path
    /// is parsed, each `{{template}}` call must resolve.
    #[instrument(skip_all, fields(count = paths.len()))]
    fn parse_set<S: AsRef<str>>(&self, paths: &[S]) -> VellumResult<TemplateSet> {
        if paths.is_empty() {
            return Err(ApplicationError::EmptyParseSet.into());
        }

        let mut set = TemplateSet::new();
        for path in paths {
            let path = path.as_ref();
            let file = self.open(path)?;
            let source = std::str::from_utf8(file.contents()).map_err(|e| {
                let valid = &file.contents()[..e.valid_up_to()];
                let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
                TemplateError::parse(path, line, "asset is not valid UTF-8")
            })?;
            set.parse(path, source)?;
        }
        set.check_references()?;

        debug!(templates = set.len(), entry = ?set.entry(), "Template set ready");
        Ok(set)
    }
}

impl<P: AssetProvider + ?Sized> AssetProviderExt for P {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModifiedTime;
    use crate::error::VellumError;

    fn provider(files: &'static [(&'static str, &'static str)]) -> MockAssetProvider {
        let mut mock = MockAssetProvider::new();
        mock.expect_open().returning(move |path| {
            files
                .iter()
                .find(|(p, _)| *p == path)
                .map(|(p, content)| AssetFile::new(*p, content.as_bytes(), ModifiedTime::unknown()))
                .ok_or_else(|| ApplicationError::not_found(path).into())
        });
        mock
    }

    #[test]
    fn parse_set_merges_in_order() {
        let mock = provider(&[
            ("base.tmpl", r#"[{{block "title" .}}base{{end}}]"#),
            ("page.tmpl", r#"{{define "title"}}page{{end}}"#),
        ]);
        let set = mock.parse_set(&["base.tmpl", "page.tmpl"]).unwrap();
        assert_eq!(set.entry(), Some("base.tmpl"));

        let mut out = Vec::new();
        set.execute(&mut out, &serde_json::Value::Null).unwrap();
        assert_eq!(out, b"[page]");
    }

    #[test]
    fn parse_set_propagates_not_found() {
        let mock = provider(&[("base.tmpl", "x")]);
        let err = mock
            .parse_set(&["base.tmpl", "pages/missing.tmpl"])
            .unwrap_err();
        assert_eq!(
            err,
            VellumError::Application(ApplicationError::AssetNotFound {
                path: "pages/missing.tmpl".into()
            })
        );
    }

    #[test]
    fn parse_set_rejects_invalid_utf8_with_line() {
        let mut mock = MockAssetProvider::new();
        mock.expect_open().returning(|path| {
            Ok(AssetFile::new(
                path,
                b"ok\nstill ok\n\xff".to_vec(),
                ModifiedTime::unknown(),
            ))
        });
        let err = mock.parse_set(&["bad.tmpl"]).unwrap_err();
        assert_eq!(
            err,
            VellumError::Template(TemplateError::parse(
                "bad.tmpl",
                3,
                "asset is not valid UTF-8"
            ))
        );
    }

    #[test]
    fn parse_set_fails_fast_on_missing_block() {
        let mock = provider(&[
            ("base.tmpl", r#"{{template "content" .}}"#),
            ("page.tmpl", r#"{{define "title"}}t{{end}}"#),
        ]);
        let err = mock.parse_set(&["base.tmpl", "page.tmpl"]).unwrap_err();
        assert!(matches!(
            err,
            VellumError::Template(TemplateError::Parse { ref path, .. }) if path == "base.tmpl"
        ));
    }

    #[test]
    fn parse_set_needs_at_least_one_path() {
        let mock = MockAssetProvider::new();
        let err = mock.parse_set::<&str>(&[]).unwrap_err();
        assert_eq!(
            err,
            VellumError::Application(ApplicationError::EmptyParseSet)
        );
    }
}
