//! # mdx-keeper
//!
//! Content tooling for a statically-exported MDX blog. The site's data
//! source is a directory of MDX files with YAML front matter; this crate is
//! the build-time companion that keeps that content internally consistent:
//!
//! ```text
//! content/
//! ├── blog/
//! │   ├── hello-world.mdx          # <slug>.mdx, front matter + body
//! │   └── test-my-experiment.mdx   # test content by naming convention
//! └── pages/
//!     └── about.mdx
//! data/
//! ├── tag-ids.json                 # persisted ID mappings, one per domain
//! ├── category-ids.json
//! └── blog-ids.json
//! ```
//!
//! Three concerns, all deterministic:
//!
//! - **Stable IDs**: posts, tags, and categories get incrementally-assigned
//!   integer IDs, persisted in JSON records. IDs back published URLs, so
//!   once assigned they never change — the batch pass registers content in
//!   a frozen sorted order to keep assignment reproducible, and slugs
//!   matching test-content markers get negative IDs to stay out of the
//!   production range.
//! - **Name obfuscation**: tag and category names appear in URLs as their
//!   SHA-256 digest; the reverse index is rebuilt in-process from the known
//!   vocabulary.
//! - **Content integrity**: each file's front matter stores a SHA-256 of
//!   its body. The update pass refreshes the hash and `lastUpdated` only
//!   when the body really changed; the validation gate catches files edited
//!   without regeneration before they are committed.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`frontmatter`] | Fenced YAML block splitting, parsing, serialization |
//! | [`hash`] | SHA-256 digests and the name↔hash registry |
//! | [`ids`] | ID allocators, persisted records, read-only lookup indexes |
//! | [`scan`] | Post discovery and the recursive `.mdx` walk |
//! | [`generate`] | The `generate-ids` batch pass |
//! | [`metadata`] | Front-matter validation and the content-hash update rule |
//! | [`validate`] | The `check` pass over a whole content tree |
//! | [`scaffold`] | `new` command templates and slug derivation |
//! | [`config`] | `keeper.toml` loading and validation |
//! | [`output`] | CLI output formatting — pure `format_*` + `print_*` wrappers |
//!
//! # Design Decisions
//!
//! ## Everything is synchronous, single-writer
//!
//! Every command loads what it needs, does all its work in memory, and
//! writes each output file once. There is no locking: the scripts run from
//! a pre-commit hook or CI step, one at a time. Hash computation is pure
//! and could parallelize, but nothing here is slow enough to warrant it.
//!
//! ## Corrupt ID records recover, loudly
//!
//! ID allocation must never be blocked by a corrupt record, so loading one
//! falls back to an empty mapping — but the caller receives an explicit
//! [`ids::LoadOutcome::RecoveredEmpty`] rather than a silent reset, because
//! previously issued IDs backing published URLs are gone at that point.
//! `generate-ids` turns that outcome into a data-loss warning.
//!
//! ## Explicit construction over ambient state
//!
//! Mappers and indexes are built by factories that load synchronously and
//! return `Result`, then get passed to whoever needs them. No module-level
//! singletons, no lazy load-on-first-use, no "is initialized" flags.

pub mod config;
pub mod frontmatter;
pub mod generate;
pub mod hash;
pub mod ids;
pub mod metadata;
pub mod output;
pub mod scaffold;
pub mod scan;
pub mod validate;
