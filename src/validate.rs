//! The `check` pass: walk a content tree and validate every `.mdx` file.
//!
//! Files under the `blog/` subtree of the content root are validated against
//! the blog field set; everything else is a page. A file that cannot be read
//! or parsed reports that single failure instead of a field-by-field list.
//! Nothing is ever fixed silently — this pass only reports.

use crate::frontmatter::Document;
use crate::metadata::{self, ContentKind};
use crate::scan::{self, ScanError};
use std::path::{Path, PathBuf};

/// Validation errors for one content file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub path: PathBuf,
    pub errors: Vec<String>,
}

/// Classify a content file by its location under the content root.
pub fn classify(content_root: &Path, path: &Path) -> ContentKind {
    let relative = path.strip_prefix(content_root).unwrap_or(path);
    if relative.starts_with("blog") {
        ContentKind::Blog
    } else {
        ContentKind::Page
    }
}

/// Result of a `check` run: per-file reports plus how many files were seen.
#[derive(Debug)]
pub struct CheckResult {
    pub reports: Vec<FileReport>,
    pub total_files: usize,
}

impl CheckResult {
    pub fn is_clean(&self) -> bool {
        self.reports.is_empty()
    }
}

/// Validate every `.mdx` file under `content_root`.
pub fn check_tree(content_root: &Path) -> Result<CheckResult, ScanError> {
    let files = scan::collect_mdx_files(content_root)?;
    let total_files = files.len();
    let mut reports = Vec::new();

    for path in files {
        let errors = match std::fs::read_to_string(&path) {
            Ok(text) => match Document::parse(&text) {
                Ok(doc) => metadata::validate(&doc, classify(content_root, &path)),
                Err(e) => vec![format!("could not parse front matter: {e}")],
            },
            Err(e) => vec![format!("could not read file: {e}")],
        };
        if !errors.is_empty() {
            reports.push(FileReport { path, errors });
        }
    }

    Ok(CheckResult {
        reports,
        total_files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256_hex;
    use std::fs;
    use tempfile::TempDir;

    fn valid_post(body: &str) -> String {
        let hash = sha256_hex(body);
        format!(
            "---\ntitle: \"Post\"\ndate: \"2026-01-05T09:00:00+09:00\"\ndescription: \"d\"\nexcerpt: \"e\"\ncategories: [\"math\"]\ntags: [\"rust\"]\nlastUpdated: \"2026-01-05T09:00:00+09:00\"\ncontentHash: \"{hash}\"\n---\n{body}"
        )
    }

    fn valid_page(body: &str) -> String {
        let hash = sha256_hex(body);
        format!(
            "---\ntitle: \"About\"\ndescription: \"who\"\nlastUpdated: \"2026-01-05T09:00:00+09:00\"\ncontentHash: \"{hash}\"\n---\n{body}"
        )
    }

    #[test]
    fn classify_by_blog_subtree() {
        let root = Path::new("content");
        assert_eq!(
            classify(root, Path::new("content/blog/post.mdx")),
            ContentKind::Blog
        );
        assert_eq!(
            classify(root, Path::new("content/pages/about.mdx")),
            ContentKind::Page
        );
        assert_eq!(
            classify(root, Path::new("content/about.mdx")),
            ContentKind::Page
        );
    }

    #[test]
    fn clean_tree_reports_nothing() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("blog")).unwrap();
        fs::create_dir_all(tmp.path().join("pages")).unwrap();
        fs::write(tmp.path().join("blog/post.mdx"), valid_post("\nbody\n")).unwrap();
        fs::write(tmp.path().join("pages/about.mdx"), valid_page("\nwho\n")).unwrap();

        let result = check_tree(tmp.path()).unwrap();
        assert!(result.is_clean());
        assert_eq!(result.total_files, 2);
    }

    #[test]
    fn page_is_not_held_to_blog_fields() {
        // A page lacks date/categories/tags/excerpt; that must not error
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("pages")).unwrap();
        fs::write(tmp.path().join("pages/about.mdx"), valid_page("\nwho\n")).unwrap();
        assert!(check_tree(tmp.path()).unwrap().is_clean());
    }

    #[test]
    fn stale_hash_is_caught() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("blog")).unwrap();
        let mut text = valid_post("\nbody\n");
        text.push_str("sneaky edit\n");
        fs::write(tmp.path().join("blog/post.mdx"), text).unwrap();

        let result = check_tree(tmp.path()).unwrap();
        assert_eq!(result.reports.len(), 1);
        assert!(result.reports[0].errors[0].contains("contentHash"));
    }

    #[test]
    fn unreadable_front_matter_is_one_report() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("blog")).unwrap();
        fs::write(tmp.path().join("blog/broken.mdx"), "---\nnever closed\n").unwrap();

        let result = check_tree(tmp.path()).unwrap();
        assert_eq!(result.reports.len(), 1);
        assert_eq!(result.reports[0].errors.len(), 1);
        assert!(result.reports[0].errors[0].contains("front matter"));
    }

    #[test]
    fn empty_tree_is_clean() {
        let tmp = TempDir::new().unwrap();
        let result = check_tree(tmp.path()).unwrap();
        assert!(result.is_clean());
        assert_eq!(result.total_files, 0);
    }
}
