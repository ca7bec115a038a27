use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mailcraft_blocks::{BlockProps, BlockType, HeaderProps, MergeTag, RichTextProps};
use mailcraft_editor::{EditSession, RichTextField};
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Base URL of the snippet/campaign API
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Directory for stored documents
    #[arg(short, long, default_value = "emails")]
    pub src_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

/// Starter email: header, a greeting, a button and a divider. The greeting
/// is typed through the rich-text editor and addresses the reader with the
/// first configured merge tag.
fn welcome_document(merge_tags: &[MergeTag]) -> Result<String> {
    let mut session = EditSession::with_clock().with_merge_tags(merge_tags.to_vec());

    if let Some(header) = session.add_block(BlockType::Header) {
        let props = BlockProps::Header(HeaderProps {
            brand_name: "Your Brand".to_string(),
            tagline: "News and offers".to_string(),
            ..Default::default()
        });
        session.update_props(header.as_str(), props);
    }

    if let Some(text) = session.add_block(BlockType::RichText) {
        let props = BlockProps::RichText(RichTextProps {
            html: "<p>Hi</p>".to_string(),
            ..Default::default()
        });
        session.update_props(text.as_str(), props);

        session.open_text_editor(text.as_str(), RichTextField::Body)?;
        if let Some(tag) = session.merge_tags().first().cloned() {
            session.edit_text(|editor| {
                editor.input(" ");
                editor.insert_merge_tag(&tag);
            })?;
        }
        session.text_input(", welcome aboard!")?;
        session.close_text_editor();
    }

    session.add_block(BlockType::Cta);
    session.add_block(BlockType::Divider);

    let compact = session.export_json()?;
    let value: serde_json::Value = serde_json::from_str(&compact)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Mailcraft project...".bright_blue().bold());

    let src_dir = cwd.join(&args.src_dir);
    if !src_dir.exists() {
        fs::create_dir_all(&src_dir)?;
        println!("  {} Created {}/", "✓".green(), args.src_dir);
    }

    let mut config = Config {
        src_dir: args.src_dir.clone(),
        ..Default::default()
    };
    if let Some(url) = args.api_base_url {
        config.api_base_url = url;
    }

    let example_file = src_dir.join("welcome.json");
    if !example_file.exists() {
        fs::write(&example_file, welcome_document(&config.merge_tags)?)?;
        println!("  {} Created {}/welcome.json", "✓".green(), args.src_dir);
    }

    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/welcome.json", args.src_dir);
    println!("  2. Run: mailcraft compile");
    println!("  3. Check output in {}/", config.out_dir);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_blocks::{default_merge_tags, parse_document};

    #[test]
    fn test_welcome_document_parses() {
        let json = welcome_document(&default_merge_tags()).unwrap();
        let blocks = parse_document(&json).unwrap();

        let types: Vec<_> = blocks.iter().filter_map(|b| b.block_type()).collect();
        assert_eq!(
            types,
            vec![BlockType::Header, BlockType::RichText, BlockType::Cta, BlockType::Divider]
        );
        assert!(json.contains("Your Brand"));
        assert!(json.contains("data-merge-tag=\\\"first_name\\\""));
        assert!(json.contains("welcome aboard!"));
    }

    #[test]
    fn test_welcome_greeting_uses_configured_tags() {
        let json = welcome_document(&[MergeTag::new("nickname", "Nickname")]).unwrap();
        let html = mailcraft_compiler_html::compile(&parse_document(&json).unwrap());
        assert!(html.contains("{{nickname}}, welcome aboard!"));

        let json = welcome_document(&[]).unwrap();
        assert!(json.contains("Hi, welcome aboard!"));
        assert!(!json.contains("data-merge-tag"));
    }
}
