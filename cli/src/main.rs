//! notepage CLI - Markdown note pagination tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use notepage::render::{self, export_file_name, FsImageResolver, PageLabel};
use notepage::{
    paginate, paginate_batch, Block, JsonFormat, LayoutConfig, PageSet, PaginateOptions,
    TextMetricsOracle,
};

#[derive(Parser)]
#[command(name = "notepage")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Paginate Markdown notes into fixed-aspect pages", long_about = None)]
struct Cli {
    /// Input Markdown file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Paginate a Markdown file and print the pages
    Paginate {
        /// Input Markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Write one Markdown file per page
    Split {
        /// Input Markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// File name prefix (defaults to the input file stem)
        #[arg(long)]
        prefix: Option<String>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show pagination statistics
    Info {
        /// Input Markdown files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args, Default)]
struct LayoutArgs {
    /// Layout configuration JSON file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Content width
    #[arg(long)]
    width: Option<f32>,

    /// Maximum content height per page
    #[arg(long)]
    height: Option<f32>,

    /// Font size
    #[arg(long)]
    font_size: Option<f32>,

    /// Font family
    #[arg(long)]
    font_family: Option<String>,

    /// Line height multiplier
    #[arg(long)]
    line_height: Option<f32>,

    /// Do not start new pages at horizontal rules
    #[arg(long)]
    no_section_split: bool,
}

impl LayoutArgs {
    fn layout_config(&self) -> Result<LayoutConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)
                .map_err(|e| format!("Invalid layout config {}: {}", path.display(), e))?,
            None => LayoutConfig::default(),
        };

        if let Some(width) = self.width {
            config = config.with_content_width(width);
        }
        if let Some(height) = self.height {
            config = config.with_max_content_height(height);
        }
        if let Some(size) = self.font_size {
            config = config.with_font_size(size);
        }
        if let Some(ref family) = self.font_family {
            config = config.with_font_family(family.clone());
        }
        if let Some(line_height) = self.line_height {
            config = config.with_line_height(line_height);
        }

        config.validate()?;
        debug!("Layout config: {:?}", config);
        Ok(config)
    }

    fn options(&self) -> PaginateOptions {
        PaginateOptions::new().with_section_split(!self.no_section_split)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Page set as JSON
    Json,
    /// Plain text, pages separated by form feeds
    Text,
    /// Markdown, pages separated by rules
    Markdown,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Paginate {
            input,
            output,
            format,
            compact,
            layout,
        }) => cmd_paginate(&input, output.as_deref(), format, compact, &layout),
        Some(Commands::Split {
            input,
            output,
            prefix,
            layout,
        }) => cmd_split(&input, output.as_deref(), prefix.as_deref(), &layout),
        Some(Commands::Info { inputs, layout }) => cmd_info(&inputs, &layout),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: split if input is provided
            if let Some(input) = cli.input {
                cmd_split(&input, cli.output.as_deref(), None, &LayoutArgs::default())
            } else {
                println!("{}", "Usage: notepage <FILE> [OUTPUT]".yellow());
                println!("       notepage --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Read a Markdown file and resolve its images next to it.
fn load_blocks(input: &Path) -> Result<Vec<Block>, Box<dyn std::error::Error>> {
    let source = fs::read_to_string(input)?;
    let blocks = render::parse_markdown(&source);
    debug!("Parsed {} blocks from {}", blocks.len(), input.display());
    let base = input.parent().unwrap_or_else(|| Path::new("."));
    Ok(render::resolve_images(blocks, &FsImageResolver::new(base)))
}

fn paginate_input(input: &Path, layout: &LayoutArgs) -> Result<PageSet, Box<dyn std::error::Error>> {
    let config = layout.layout_config()?;
    let blocks = load_blocks(input)?;
    let pages = paginate(&blocks, &config, &layout.options(), &TextMetricsOracle::new())?;
    info!(
        "Paginated {} into {} pages ({} measurements)",
        input.display(),
        pages.len(),
        pages.stats.measure_count
    );
    Ok(pages)
}

fn cmd_paginate(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    compact: bool,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let pages = paginate_input(input, layout)?;

    let content = match format {
        OutputFormat::Json => {
            let json_format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            render::to_json(&pages, json_format)?
        }
        OutputFormat::Text => render::to_text(&pages),
        OutputFormat::Markdown => render::to_markdown(&pages),
    };

    if let Some(path) = output {
        fs::write(path, &content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}

fn cmd_split(
    input: &Path,
    output: Option<&Path>,
    prefix: Option<&str>,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(format!("{}_pages", stem)));
    let prefix = prefix.map(str::to_string).unwrap_or_else(|| stem.to_string());

    fs::create_dir_all(&output_dir)?;

    let pages = paginate_input(input, layout)?;

    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    let mut names = Vec::with_capacity(pages.len());
    for page in &pages {
        let label = PageLabel::new(page.index, pages.len());
        pb.set_message(format!("Writing page {}...", label));
        let name = export_file_name(&prefix, page.index, "md");
        let path = output_dir.join(&name);
        fs::write(&path, render::page_markdown(page))?;
        debug!("Wrote {}", path.display());
        names.push(name);
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    for (i, name) in names.iter().enumerate() {
        let branch = if i + 1 == names.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), name);
    }

    Ok(())
}

fn cmd_info(inputs: &[PathBuf], layout: &LayoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = layout.layout_config()?;
    let documents = inputs
        .iter()
        .map(|input| load_blocks(input))
        .collect::<Result<Vec<_>, _>>()?;

    info!("Paginating {} files", documents.len());
    let results = paginate_batch(&documents, &config, &layout.options(), &TextMetricsOracle::new());

    for (input, result) in inputs.iter().zip(results) {
        let pages = result?;
        let stats = &pages.stats;
        let name = input.file_stem().map(|s| s.to_string_lossy().to_string());

        println!("{}", "Pagination Information".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());

        println!("{}: {}", "File".bold(), input.display());
        println!("{}: {}", "Pages".bold(), pages.len());
        println!("{}: {}", "Sections".bold(), stats.section_count);
        println!(
            "{}: {} x {} @ {}px",
            "Content box".bold(),
            config.content_width,
            config.max_content_height,
            config.font_size
        );

        println!();
        println!("{}", "Split Statistics".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());

        println!("{}: {}", "Groups".bold(), stats.group_count);
        println!("{}: {}", "Measurements".bold(), stats.measure_count);
        println!("{}: {}", "Code fragments".bold(), stats.code_fragment_count);
        println!("{}: {}", "List fragments".bold(), stats.list_fragment_count);
        println!(
            "{}: {}",
            "Long item fragments".bold(),
            stats.long_item_fragment_count
        );
        if stats.oversized_count > 0 {
            println!(
                "{}: {}",
                "Oversized".bold(),
                stats.oversized_count.to_string().yellow()
            );
        }

        if !pages.is_empty() {
            println!();
            for page in &pages {
                let label = PageLabel::new(page.index, pages.len());
                println!(
                    "  {} {} blocks",
                    label.header_today(name.as_deref()).dimmed(),
                    page.block_count()
                );
            }
        }
        println!();
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "notepage".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Markdown note pagination tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/notepage".dimmed());
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_config_file_with_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.json");
        fs::write(&path, r#"{"content_width": 300.0, "font_size": 12.0}"#).unwrap();

        let args = LayoutArgs {
            config: Some(path),
            height: Some(120.0),
            ..Default::default()
        };
        let config = args.layout_config().unwrap();
        assert_eq!(config.content_width, 300.0);
        assert_eq!(config.font_size, 12.0);
        assert_eq!(config.max_content_height, 120.0);
        assert_eq!(config.line_height, LayoutConfig::default().line_height);
    }

    #[test]
    fn test_layout_config_rejects_bad_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.json");
        fs::write(&path, "not json").unwrap();

        let args = LayoutArgs {
            config: Some(path),
            ..Default::default()
        };
        assert!(args.layout_config().is_err());

        let args = LayoutArgs {
            height: Some(0.0),
            ..Default::default()
        };
        assert!(args.layout_config().is_err());
    }

    #[test]
    fn test_split_writes_one_file_per_page() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("note.md");
        fs::write(&input, "# One\n\nfirst page\n\n---\n\n# Two\n\nsecond page\n").unwrap();
        let output = dir.path().join("pages");

        cmd_split(&input, Some(&output), None, &LayoutArgs::default()).unwrap();

        let first = fs::read_to_string(output.join("note_1.md")).unwrap();
        let second = fs::read_to_string(output.join("note_2.md")).unwrap();
        assert_eq!(first, "# One\n\nfirst page\n");
        assert_eq!(second, "# Two\n\nsecond page\n");
        assert!(!output.join("note_3.md").exists());
    }

    #[test]
    fn test_split_uses_prefix() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("note.md");
        fs::write(&input, "just one page\n").unwrap();
        let output = dir.path().join("out");

        cmd_split(&input, Some(&output), Some("daily"), &LayoutArgs::default()).unwrap();
        assert!(output.join("daily_1.md").exists());
        assert!(!output.join("note_1.md").exists());
    }
}
