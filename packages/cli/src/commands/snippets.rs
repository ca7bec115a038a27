use crate::config::Config;
use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use mailcraft_editor::{SnippetLibrary, ToastKind, Toasts};
use mailcraft_store::{Backend, HttpBackend, Snippet};
use std::path::Path;

#[derive(Debug, Subcommand)]
pub enum SnippetsCommand {
    /// List saved snippets grouped by category
    List {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a saved snippet
    Delete {
        /// Snippet id
        id: String,
    },
}

pub fn snippets(command: SnippetsCommand, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let backend = HttpBackend::new(config.api_base_url.as_str(), Config::api_token())?;

    let toasts = Toasts::new();
    let mut library = SnippetLibrary::new(backend, toasts.clone());

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(command, &mut library));

    // Failures already come back through `result`
    for toast in toasts.drain() {
        if toast.kind == ToastKind::Success {
            println!("{} {}", "✓".green(), toast.message);
        }
    }
    result
}

async fn run<B: Backend>(command: SnippetsCommand, library: &mut SnippetLibrary<B>) -> Result<()> {
    match command {
        SnippetsCommand::List { category, json } => {
            library.refresh().await?;

            if json {
                println!("{}", format_json(library, category.as_deref())?);
                return Ok(());
            }

            print!("{}", format_listing(library, category.as_deref()));
            Ok(())
        }
        SnippetsCommand::Delete { id } => {
            library.delete(&id).await?;
            println!("{} Deleted snippet {}", "✓".green(), id.bright_white());
            println!("{} snippets remaining", library.snippets().len());
            Ok(())
        }
    }
}

fn format_json<B: Backend>(library: &SnippetLibrary<B>, category: Option<&str>) -> Result<String> {
    let snippets: Vec<&Snippet> = match category {
        Some(category) => library.in_category(category),
        None => library.snippets().iter().collect(),
    };
    Ok(serde_json::to_string_pretty(&snippets)?)
}

fn format_listing<B: Backend>(library: &SnippetLibrary<B>, category: Option<&str>) -> String {
    let groups = library.by_category();
    if groups.is_empty() {
        return format!("{}\n", "No snippets saved yet".dimmed());
    }

    let mut out = String::new();
    for (name, snippets) in groups {
        if category.is_some_and(|wanted| wanted != name) {
            continue;
        }

        out.push_str(&format!("{}\n", name.bold()));
        for snippet in snippets {
            let count = snippet.blocks.len();
            out.push_str(&format!(
                "  {}  {} {}\n",
                snippet.id.bright_black(),
                snippet.name,
                format!("({} block{})", count, if count == 1 { "" } else { "s" }).dimmed()
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_blocks::{registry, BlockType, SequentialIds};
    use mailcraft_store::{InMemoryBackend, NewSnippet};

    #[tokio::test]
    async fn test_listing_groups_by_category() {
        colored::control::set_override(false);

        let backend = InMemoryBackend::new();
        let mut ids = SequentialIds::from_seed("cli");
        for (name, category) in [("Footer", "Layout"), ("Sale button", "Promotions"), ("Spacer", "")] {
            let block = registry::create(BlockType::Spacer, &mut ids);
            backend
                .create_snippet(&NewSnippet::new(name, category, vec![block]).unwrap())
                .await
                .unwrap();
        }

        let mut library = SnippetLibrary::new(backend, Toasts::new());
        library.refresh().await.unwrap();

        let listing = format_listing(&library, None);
        let headings: Vec<_> = listing.lines().filter(|l| !l.starts_with(' ')).collect();
        assert_eq!(headings, vec!["General", "Layout", "Promotions"]);
        assert!(listing.contains("Sale button (1 block)"));

        let filtered = format_listing(&library, Some("Layout"));
        assert!(filtered.contains("Footer"));
        assert!(!filtered.contains("Sale button"));
    }

    #[tokio::test]
    async fn test_json_listing_uses_same_categories() {
        let backend = InMemoryBackend::new();
        let mut ids = SequentialIds::from_seed("json");
        for (name, category) in [("Spacer", ""), ("Footer", "Layout")] {
            let block = registry::create(BlockType::Spacer, &mut ids);
            backend
                .create_snippet(&NewSnippet::new(name, category, vec![block]).unwrap())
                .await
                .unwrap();
        }

        let mut library = SnippetLibrary::new(backend, Toasts::new());
        library.refresh().await.unwrap();

        let general: Vec<Snippet> = serde_json::from_str(&format_json(&library, Some("General")).unwrap()).unwrap();
        assert_eq!(general.len(), 1);
        assert_eq!(general[0].name, "Spacer");

        let all: Vec<Snippet> = serde_json::from_str(&format_json(&library, None).unwrap()).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_snippet_fails() {
        let mut library = SnippetLibrary::new(InMemoryBackend::new(), Toasts::new());
        let result = run(SnippetsCommand::Delete { id: "snp_404".into() }, &mut library).await;
        assert!(result.is_err());
    }
}
