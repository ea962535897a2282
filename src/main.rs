use clap::{Parser, Subcommand};
use mdx_keeper::metadata::current_datetime_iso;
use mdx_keeper::{config, generate, metadata, output, scaffold, validate};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mdx-keeper")]
#[command(about = "Content ID and metadata tooling for an MDX blog")]
#[command(long_about = "\
Content ID and metadata tooling for an MDX blog

Blog posts are <slug>.mdx files with YAML front matter. This tool keeps
the parts the site depends on consistent:

  content/
  ├── blog/
  │   ├── hello-world.mdx          # published post → positive ID
  │   └── test-my-experiment.mdx   # test content → negative ID
  └── pages/
      └── about.mdx
  data/
  ├── tag-ids.json                 # name → stable integer ID
  ├── category-ids.json
  └── blog-ids.json

Front matter carries a contentHash (SHA-256 of the body). Edit a post and
`update` refreshes the hash and lastUpdated; `check` fails the tree when a
stored hash is stale or required fields are missing. IDs are assigned once
and never renumbered — published URLs depend on them.

Run 'mdx-keeper gen-config' to print a documented keeper.toml.")]
#[command(version)]
struct Cli {
    /// Content root directory (overrides keeper.toml)
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    /// Data directory for the ID records (overrides keeper.toml)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scaffold a new content file with valid front matter
    New {
        /// Content title
        #[arg(long)]
        title: String,
        /// What to create
        #[arg(long, value_enum, default_value = "blog")]
        kind: Kind,
        /// File name; derived from the title when omitted
        #[arg(long)]
        slug: Option<String>,
        /// Comma-separated categories (blog only)
        #[arg(long, value_delimiter = ',')]
        categories: Vec<String>,
        /// Comma-separated tags (blog only)
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        /// Excerpt text (blog only)
        #[arg(long)]
        excerpt: Option<String>,
    },
    /// Scan content and assign missing IDs to posts, tags, and categories
    GenerateIds,
    /// Recompute contentHash/lastUpdated for the given files
    Update {
        /// Files to update
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Validate the whole content tree; non-zero exit on any error
    Check,
    /// Print a stock keeper.toml with all options documented
    GenConfig,
}

#[derive(clap::ValueEnum, Clone, Copy, PartialEq)]
enum Kind {
    Blog,
    Page,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = config::load_config(Path::new("."))?;
    if let Some(content) = &cli.content {
        config.content_dir = content.to_string_lossy().into_owned();
    }
    if let Some(data) = &cli.data {
        config.data_dir = data.to_string_lossy().into_owned();
    }

    match cli.command {
        Command::New {
            title,
            kind,
            slug,
            categories,
            tags,
            excerpt,
        } => {
            let slug = match slug {
                Some(s) => s,
                None => scaffold::slugify(&title),
            };
            if slug.is_empty() {
                return Err(scaffold::ScaffoldError::EmptySlug { title }.into());
            }
            let timestamp = current_datetime_iso(config.fixed_offset());
            let (subdir, content) = match kind {
                Kind::Blog => {
                    let date = current_datetime_iso(config.fixed_offset());
                    let post = scaffold::NewPost {
                        title,
                        categories,
                        tags,
                        excerpt,
                    };
                    ("blog", scaffold::blog_template(&post, &date, &timestamp)?)
                }
                Kind::Page => ("pages", scaffold::page_template(&title, &timestamp)?),
            };
            let path = Path::new(&config.content_dir)
                .join(subdir)
                .join(format!("{slug}.mdx"));
            scaffold::create(&path, &content)?;
            println!("Created {}", path.display());
        }
        Command::GenerateIds => {
            let summary = generate::generate_ids(&config)?;
            output::print_generate_output(&summary);
        }
        Command::Update { files } => {
            let content_root = Path::new(&config.content_dir);
            let timestamp = current_datetime_iso(config.fixed_offset());
            let mut changed = 0;
            let total = files.len();
            for file in files {
                let kind = validate::classify(content_root, &file);
                let did_change = metadata::update_file(&file, kind, &timestamp)?;
                if did_change {
                    changed += 1;
                }
                println!("{}", output::format_update_line(&file, did_change));
            }
            println!("{}", output::format_update_footer(changed, total));
        }
        Command::Check => {
            let content_root = Path::new(&config.content_dir);
            println!("==> Checking {}", content_root.display());
            let result = validate::check_tree(content_root)?;
            output::print_check_output(&result.reports, result.total_files);
            if !result.is_clean() {
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
