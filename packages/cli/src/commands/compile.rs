use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use mailcraft_blocks::parse_document;
use mailcraft_compiler_html::{compile_to_html, CompileOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Document file or directory (defaults to the configured source directory)
    pub path: Option<PathBuf>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Email title (overrides config)
    #[arg(long)]
    pub title: Option<String>,

    /// Hidden inbox preview text
    #[arg(long)]
    pub preheader: Option<String>,
}

pub fn compile(args: CompileArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let input = match &args.path {
        Some(path) => cwd.join(path),
        None => config.src_dir(cwd),
    };

    if !input.exists() {
        return Err(anyhow!("Input path does not exist: {}", input.display()));
    }

    let (root, files) = if input.is_file() {
        let root = input.parent().map(Path::to_path_buf).unwrap_or_default();
        (root, vec![input.clone()])
    } else {
        (input.clone(), find_documents(&input))
    };

    if files.is_empty() {
        println!("{}", "⚠️  No documents found".yellow());
        return Ok(());
    }

    let out_dir = match &args.out_dir {
        Some(dir) => cwd.join(dir),
        None => config.out_dir(cwd),
    };
    let options = compile_options(&config, &args);

    if !args.stdout {
        println!("{}", "🔨 Compiling emails...".bright_blue().bold());
        println!("Found {} documents", files.len());
    }

    let mut success_count = 0;
    let mut error_count = 0;

    for file in &files {
        let relative_path = file.strip_prefix(&root).unwrap_or(file);
        match compile_file(file, &options) {
            Ok(html) if args.stdout => {
                success_count += 1;
                println!("{}", html);
            }
            Ok(html) => {
                let output_file = output_path(relative_path, &out_dir);
                if let Some(parent) = output_file.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&output_file, html)?;

                success_count += 1;
                println!(
                    "  {} {} → {}",
                    "✓".green(),
                    relative_path.display(),
                    output_file.display()
                );
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative_path.display(),
                    format!("{:#}", e).red()
                );
            }
        }
    }

    if args.stdout {
        return if error_count == 0 {
            Ok(())
        } else {
            Err(anyhow!("{} documents failed to compile", error_count))
        };
    }

    println!();
    if error_count == 0 {
        println!("{} Compiled {} emails successfully", "✅".green(), success_count);
        Ok(())
    } else {
        println!(
            "{} Compiled {} emails, {} errors",
            "⚠️".yellow(),
            success_count,
            error_count
        );
        Err(anyhow!("{} documents failed to compile", error_count))
    }
}

fn compile_options(config: &Config, args: &CompileArgs) -> CompileOptions {
    let mut options = config.compile.clone();
    if let Some(title) = &args.title {
        options.title = title.clone();
    }
    if let Some(preheader) = &args.preheader {
        options.preheader = preheader.clone();
    }
    options
}

/// Every `*.json` document under `dir`, skipping the config file
fn find_documents(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .filter(|path| path.file_name().and_then(|s| s.to_str()) != Some(DEFAULT_CONFIG_NAME))
        .collect();
    files.sort();
    files
}

fn output_path(relative_path: &Path, out_dir: &Path) -> PathBuf {
    out_dir.join(relative_path).with_extension("html")
}

fn compile_file(file_path: &Path, options: &CompileOptions) -> Result<String> {
    let source = fs::read_to_string(file_path)?;
    let blocks = parse_document(&source)
        .with_context(|| format!("{} is not a valid document", file_path.display()))?;

    let unknown: Vec<_> = blocks
        .iter()
        .filter(|block| block.block_type().is_none())
        .map(|block| block.type_name().to_string())
        .collect();
    if !unknown.is_empty() {
        warn!(file = %file_path.display(), types = ?unknown, "Skipping blocks of unknown type");
    }

    let html = compile_to_html(&blocks, options);
    info!(file = %file_path.display(), blocks = blocks.len(), bytes = html.len(), "Compiled email");
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mailcraft-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_output_path_mirrors_source_tree() {
        let out = output_path(Path::new("promos/spring.json"), Path::new("/tmp/dist"));
        assert_eq!(out, PathBuf::from("/tmp/dist/promos/spring.html"));
    }

    #[test]
    fn test_compile_file() {
        let dir = scratch_dir("compile");
        let file = dir.join("hello.json");
        fs::write(
            &file,
            r#"[{"id":"a","type":"header","props":{"brandName":"Hello"}},{"id":"b","type":"poll","props":{}}]"#,
        )
        .unwrap();

        let html = compile_file(&file, &CompileOptions::default()).unwrap();
        assert!(html.contains(">Hello</h1>"));

        fs::write(&file, "{\"not\": \"an array\"}").unwrap();
        assert!(compile_file(&file, &CompileOptions::default()).is_err());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_find_documents_skips_config() {
        let dir = scratch_dir("find");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("a.json"), "[]").unwrap();
        fs::write(dir.join("nested/b.json"), "[]").unwrap();
        fs::write(dir.join("notes.txt"), "").unwrap();
        fs::write(dir.join(DEFAULT_CONFIG_NAME), "{}").unwrap();

        let found = find_documents(&dir);
        assert_eq!(found, vec![dir.join("a.json"), dir.join("nested/b.json")]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_args_override_config() {
        let config = Config::default();
        let args = CompileArgs {
            path: None,
            stdout: false,
            out_dir: None,
            title: Some("Launch".to_string()),
            preheader: None,
        };

        let options = compile_options(&config, &args);
        assert_eq!(options.title, "Launch");
        assert_eq!(options.footer, config.compile.footer);
    }
}
