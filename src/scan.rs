//! Content discovery: post listing for ID generation and the recursive
//! `.mdx` walk the validation gate runs over.
//!
//! Posts live as flat `<slug>.mdx` files in the blog directory — the slug is
//! the file stem, there is no nesting. The scan parses each file's front
//! matter for the fields ID generation needs (`date`, `categories`, `tags`)
//! and sorts the result into the frozen registration order: date ascending,
//! then slug lexicographic. A file that fails to parse is skipped with a
//! warning rather than aborting the batch; it simply gets no ID this run.

use crate::frontmatter::Document;
use serde_yaml_ng::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One blog post as seen by the ID-generation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PostEntry {
    /// File stem; the key under which the post registers its ID.
    pub slug: String,
    /// Raw `date` front-matter value; empty when absent. Compared as a
    /// string, which is ordering-correct for ISO-8601 dates.
    pub date: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub path: PathBuf,
}

/// Result of scanning the blog directory.
#[derive(Debug, Default)]
pub struct PostScan {
    /// Posts in registration order: date ascending, then slug lexicographic.
    pub posts: Vec<PostEntry>,
    /// Files that could not be read or parsed, with the reason. These get no
    /// ID this run.
    pub skipped: Vec<(PathBuf, String)>,
}

/// Scan the blog directory (non-recursive) for `*.mdx` posts.
///
/// A missing directory yields an empty scan — a fresh repository has no
/// content yet, and that is not an error.
pub fn scan_posts(blog_dir: &Path) -> Result<PostScan, ScanError> {
    let mut scan = PostScan::default();

    let entries = match std::fs::read_dir(blog_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(scan),
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("mdx") {
            continue;
        }
        let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let slug = slug.to_string();

        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                scan.skipped.push((path, e.to_string()));
                continue;
            }
        };
        let doc = match Document::parse(&text) {
            Ok(d) => d,
            Err(e) => {
                scan.skipped.push((path, e.to_string()));
                continue;
            }
        };

        scan.posts.push(PostEntry {
            slug,
            date: doc.get_str("date").unwrap_or_default().to_string(),
            categories: string_list(&doc, "categories"),
            tags: string_list(&doc, "tags"),
            path,
        });
    }

    scan.posts
        .sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.slug.cmp(&b.slug)));
    Ok(scan)
}

/// All distinct tags across the scanned posts, sorted.
pub fn collect_tags(posts: &[PostEntry]) -> Vec<String> {
    collect_field(posts, |p| &p.tags)
}

/// All distinct categories across the scanned posts, sorted.
pub fn collect_categories(posts: &[PostEntry]) -> Vec<String> {
    collect_field(posts, |p| &p.categories)
}

fn collect_field<F>(posts: &[PostEntry], field: F) -> Vec<String>
where
    F: Fn(&PostEntry) -> &Vec<String>,
{
    let set: BTreeSet<&String> = posts.iter().flat_map(|p| field(p)).collect();
    set.into_iter().cloned().collect()
}

/// Recursively collect every `.mdx` file under `root`, in path order.
///
/// Used by the validation gate, which checks the whole content tree, pages
/// included.
pub fn collect_mdx_files(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            ScanError::Io(
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("walk error")),
            )
        })?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some("mdx")
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn string_list(doc: &Document, key: &str) -> Vec<String> {
    match doc.get(key) {
        Some(Value::Sequence(seq)) => seq
            .iter()
            .filter_map(|v| v.as_str())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_post(dir: &Path, slug: &str, date: &str, tags: &[&str], categories: &[&str]) {
        let tag_list = tags
            .iter()
            .map(|t| format!("\"{t}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let cat_list = categories
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let text = format!(
            "---\ntitle: \"{slug}\"\ndate: \"{date}\"\ntags: [{tag_list}]\ncategories: [{cat_list}]\n---\n\nbody\n"
        );
        fs::write(dir.join(format!("{slug}.mdx")), text).unwrap();
    }

    #[test]
    fn missing_blog_dir_is_an_empty_scan() {
        let tmp = TempDir::new().unwrap();
        let scan = scan_posts(&tmp.path().join("does-not-exist")).unwrap();
        assert!(scan.posts.is_empty());
        assert!(scan.skipped.is_empty());
    }

    #[test]
    fn posts_sort_by_date_then_slug() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "newer", "2026-02-01T00:00:00+09:00", &[], &[]);
        write_post(tmp.path(), "b-same-day", "2026-01-01T00:00:00+09:00", &[], &[]);
        write_post(tmp.path(), "a-same-day", "2026-01-01T00:00:00+09:00", &[], &[]);

        let scan = scan_posts(tmp.path()).unwrap();
        let slugs: Vec<&str> = scan.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["a-same-day", "b-same-day", "newer"]);
    }

    #[test]
    fn non_mdx_files_are_ignored() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "real", "2026-01-01T00:00:00+09:00", &[], &[]);
        fs::write(tmp.path().join("notes.md"), "not mdx").unwrap();
        fs::write(tmp.path().join("image.png"), [0u8; 4]).unwrap();

        let scan = scan_posts(tmp.path()).unwrap();
        assert_eq!(scan.posts.len(), 1);
    }

    #[test]
    fn unparsable_post_is_skipped_with_reason() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "good", "2026-01-01T00:00:00+09:00", &[], &[]);
        fs::write(tmp.path().join("broken.mdx"), "---\ntitle: x\nno closing\n").unwrap();

        let scan = scan_posts(tmp.path()).unwrap();
        assert_eq!(scan.posts.len(), 1);
        assert_eq!(scan.skipped.len(), 1);
        assert!(scan.skipped[0].0.ends_with("broken.mdx"));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("minimal.mdx"),
            "---\ntitle: \"m\"\n---\nbody\n",
        )
        .unwrap();
        let scan = scan_posts(tmp.path()).unwrap();
        assert_eq!(scan.posts[0].date, "");
        assert!(scan.posts[0].tags.is_empty());
        assert!(scan.posts[0].categories.is_empty());
    }

    #[test]
    fn tags_and_categories_dedupe_and_sort() {
        let tmp = TempDir::new().unwrap();
        write_post(
            tmp.path(),
            "one",
            "2026-01-01T00:00:00+09:00",
            &["rust", "math"],
            &["essays"],
        );
        write_post(
            tmp.path(),
            "two",
            "2026-01-02T00:00:00+09:00",
            &["math", "algorithms"],
            &["essays", "notes"],
        );

        let scan = scan_posts(tmp.path()).unwrap();
        assert_eq!(collect_tags(&scan.posts), ["algorithms", "math", "rust"]);
        assert_eq!(collect_categories(&scan.posts), ["essays", "notes"]);
    }

    #[test]
    fn collect_mdx_files_walks_recursively_in_order() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("blog")).unwrap();
        fs::create_dir_all(tmp.path().join("pages")).unwrap();
        fs::write(tmp.path().join("blog/z-post.mdx"), "x").unwrap();
        fs::write(tmp.path().join("blog/a-post.mdx"), "x").unwrap();
        fs::write(tmp.path().join("pages/about.mdx"), "x").unwrap();
        fs::write(tmp.path().join("pages/readme.txt"), "x").unwrap();

        let files = collect_mdx_files(tmp.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| {
                p.strip_prefix(tmp.path())
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(names, ["blog/a-post.mdx", "blog/z-post.mdx", "pages/about.mdx"]);
    }
}
