//! The file a lint or fix run is working on.

use crate::linter::LinterError;
use crate::parser::parse;
use crate::tree::SyntaxNode;
use crate::types::Location;
use std::path::{Path, PathBuf};

/// A SQL source and the paths it is known by.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    path: &'a Path,
    content: &'a str,
    relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a context for `content` read from `path`.
    ///
    /// Locations are reported relative to `root` when `path` lies under it.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .ok()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            relative_path,
        }
    }

    /// Path as given to the linter.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path
    }

    /// The SQL text.
    #[must_use]
    pub fn content(&self) -> &str {
        self.content
    }

    /// Path used in reported locations.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Parses the content, attributing failures to this file.
    ///
    /// # Errors
    ///
    /// Returns [`LinterError::Parse`] if the content does not tokenize.
    pub fn parse(&self) -> Result<SyntaxNode, LinterError> {
        parse(self.content).map_err(|source| LinterError::Parse {
            path: self.path.to_path_buf(),
            source,
        })
    }

    /// Locates a node of this file's tree.
    #[must_use]
    pub fn locate(&self, node: &SyntaxNode) -> Location {
        Location::of_node(&self.relative_path, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path() {
        let ctx = FileContext::new(
            Path::new("/project/sql/report.sql"),
            "",
            Path::new("/project"),
        );
        assert_eq!(ctx.relative_path(), Path::new("sql/report.sql"));
        assert_eq!(ctx.path(), Path::new("/project/sql/report.sql"));
    }

    #[test]
    fn test_path_outside_root_is_kept() {
        let ctx = FileContext::new(Path::new("other/a.sql"), "", Path::new("/project"));
        assert_eq!(ctx.relative_path(), Path::new("other/a.sql"));
    }

    #[test]
    fn test_root_is_the_file_itself() {
        let ctx = FileContext::new(Path::new("/p/a.sql"), "", Path::new("/p/a.sql"));
        assert_eq!(ctx.relative_path(), Path::new("/p/a.sql"));
    }

    #[test]
    fn test_parse_and_locate() {
        let ctx = FileContext::new(
            Path::new("/p/q/a.sql"),
            "SELECT 1;\nSELECT 2;",
            Path::new("/p"),
        );
        let tree = ctx.parse().unwrap();
        assert_eq!(tree.raw(), ctx.content());

        let second = &tree.children()[2];
        let loc = ctx.locate(second);
        assert_eq!(loc.file, Path::new("q/a.sql"));
        assert_eq!((loc.line, loc.column, loc.offset, loc.length), (2, 1, 10, 9));
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let ctx = FileContext::new(Path::new("bad.sql"), "SELECT 'open", Path::new("."));
        match ctx.parse() {
            Err(LinterError::Parse { path, .. }) => assert_eq!(path, Path::new("bad.sql")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
