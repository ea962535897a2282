//! Content scaffolding: the `new` command's templates.
//!
//! A scaffolded file is born valid: its front matter carries every required
//! field in canonical order and a `contentHash` computed over the template
//! body, so `check` passes on it immediately and the update pass sees it as
//! unchanged until the author actually edits the body.

use crate::frontmatter::Document;
use crate::hash::sha256_hex;
use crate::metadata::{ContentKind, reorder_fields};
use serde_yaml_ng::{Mapping, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),
    #[error("could not derive a slug from title {title:?}")]
    EmptySlug { title: String },
    #[error(transparent)]
    FrontMatter(#[from] crate::frontmatter::FrontMatterError),
}

/// Everything the blog template needs beyond the clock.
#[derive(Debug, Default)]
pub struct NewPost {
    pub title: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    /// Defaults to a placeholder derived from the title when empty.
    pub excerpt: Option<String>,
}

const MAX_SLUG_LEN: usize = 80;

/// Derive a URL slug from a title.
///
/// Lowercases, replaces runs of non-alphanumerics with single dashes, strips
/// leading/trailing dashes, and truncates at a dash boundary. ASCII-only by
/// policy: non-ASCII titles need an explicit `--slug`.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut prev_dash = true; // suppress a leading dash
    for c in lowered.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    let trimmed = slug.trim_end_matches('-');

    if trimmed.len() <= MAX_SLUG_LEN {
        trimmed.to_string()
    } else {
        let truncated = &trimmed[..MAX_SLUG_LEN];
        match truncated.rfind('-') {
            Some(pos) => truncated[..pos].to_string(),
            None => truncated.to_string(),
        }
    }
}

/// Render the blog-post template.
///
/// `date` and `timestamp` are preformatted ISO-8601 strings — the caller owns
/// the clock and offset policy.
pub fn blog_template(
    post: &NewPost,
    date: &str,
    timestamp: &str,
) -> Result<String, ScaffoldError> {
    let body = "\n\nWrite here.\n";
    let excerpt = match &post.excerpt {
        Some(e) if !e.is_empty() => e.clone(),
        _ => format!("Notes on {}", post.title),
    };

    let mut matter = Mapping::new();
    matter.insert(Value::from("title"), Value::from(post.title.as_str()));
    matter.insert(Value::from("date"), Value::from(date));
    matter.insert(Value::from("description"), Value::from(excerpt.as_str()));
    matter.insert(Value::from("excerpt"), Value::from(excerpt.as_str()));
    matter.insert(
        Value::from("categories"),
        Value::Sequence(post.categories.iter().map(|c| Value::from(c.as_str())).collect()),
    );
    matter.insert(
        Value::from("tags"),
        Value::Sequence(post.tags.iter().map(|t| Value::from(t.as_str())).collect()),
    );
    matter.insert(Value::from("lastUpdated"), Value::from(timestamp));
    matter.insert(Value::from("contentHash"), Value::from(sha256_hex(body)));

    render(matter, ContentKind::Blog, body)
}

/// Render the standalone-page template.
pub fn page_template(title: &str, timestamp: &str) -> Result<String, ScaffoldError> {
    let body = format!("\n\n# {title}\n");

    let mut matter = Mapping::new();
    matter.insert(Value::from("title"), Value::from(title));
    matter.insert(Value::from("description"), Value::from(title));
    matter.insert(Value::from("lastUpdated"), Value::from(timestamp));
    matter.insert(Value::from("contentHash"), Value::from(sha256_hex(&body)));

    render(matter, ContentKind::Page, &body)
}

fn render(matter: Mapping, kind: ContentKind, body: &str) -> Result<String, ScaffoldError> {
    let doc = Document {
        matter: reorder_fields(&matter, kind.required_fields()),
        body: body.to_string(),
    };
    Ok(doc.to_text()?)
}

/// Write a scaffolded file, refusing to overwrite.
pub fn create(path: &Path, content: &str) -> Result<(), ScaffoldError> {
    if path.exists() {
        return Err(ScaffoldError::AlreadyExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
