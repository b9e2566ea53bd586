//! missive - newsletter URL rewriting and section ordering

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use missive::{
    Config, ElementKind, NewsletterSection, Rewriter, absolutize_urls, decode_text,
    mirror_to_unsecured, order_sections,
};

#[derive(Parser)]
#[command(name = "missive")]
#[command(version, about = "Prepare newsletter HTML for email delivery", long_about = None)]
#[command(after_help = "EXAMPLES:
    missive absolutize --base-url https://news.example.org/ body.html
    missive unsecure --base-url https://news.example.org/ \\
        --unsecured-base-url https://public.example.org \\
        --folder-path /secure/img --folder pubimg body.html
    missive rewrite --config newsletter.toml body.html
    missive sections sections.json")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log each rewrite pass
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Make relative URLs absolute
    Absolutize {
        #[command(flatten)]
        source: Source,

        /// Element kinds to process, in order (default: all)
        #[arg(short, long = "kind", value_name = "KIND")]
        kinds: Vec<ElementKind>,
    },

    /// Move URLs under a secured folder onto a public mirror
    Unsecure {
        #[command(flatten)]
        source: Source,

        /// Public host serving the mirror
        #[arg(long, value_name = "URL")]
        unsecured_base_url: String,

        /// Secured folder whose resources are mirrored
        #[arg(long, value_name = "PATH")]
        folder_path: String,

        /// Folder name on the public host
        #[arg(long, value_name = "NAME")]
        folder: String,

        /// Element kinds to process, in order (default: img, a)
        #[arg(short, long = "kind", value_name = "KIND")]
        kinds: Vec<ElementKind>,
    },

    /// Run the configured pipeline
    Rewrite {
        /// TOML configuration file
        #[arg(short, long, value_name = "FILE", default_value = "missive.toml")]
        config: PathBuf,

        /// Input HTML (default: stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
    },

    /// Order a JSON array of sections
    Sections {
        /// Input JSON (default: stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
    },
}

#[derive(Args)]
struct Source {
    /// Base URL relative references resolve against
    #[arg(short, long, value_name = "URL", env = "MISSIVE_BASE_URL")]
    base_url: String,

    /// Input HTML (default: stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so stdout carries only the rewritten output.
fn init_logging(quiet: bool, verbose: bool) {
    let env_filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Absolutize { source, kinds } => {
            let kinds = or_default(kinds, &ElementKind::ALL);
            let html = read_input(source.input.as_deref())?;
            let output = absolutize_urls(&html, &source.base_url, &kinds)?;
            write_output(&output)
        }
        Command::Unsecure {
            source,
            unsecured_base_url,
            folder_path,
            folder,
            kinds,
        } => {
            let kinds = or_default(kinds, &ElementKind::MIRRORED);
            let html = read_input(source.input.as_deref())?;
            let output = mirror_to_unsecured(
                &html,
                &source.base_url,
                &unsecured_base_url,
                &folder_path,
                &folder,
                &kinds,
            )?;
            write_output(&output)
        }
        Command::Rewrite { config, input } => {
            let config = Config::load(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            let rewriter = Rewriter::from_config(&config)?;
            let html = read_input(input.as_deref())?;
            write_output(&rewriter.rewrite(&html))
        }
        Command::Sections { input } => {
            let json = read_input(input.as_deref())?;
            let sections: Vec<NewsletterSection> =
                serde_json::from_str(&json).context("parsing sections")?;
            let ordered = order_sections(sections);
            let mut output = serde_json::to_string_pretty(&ordered)?;
            output.push('\n');
            write_output(&output)
        }
    }
}

fn or_default(kinds: Vec<ElementKind>, default: &[ElementKind]) -> Vec<ElementKind> {
    if kinds.is_empty() {
        default.to_vec()
    } else {
        kinds
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    let bytes = match path {
        Some(path) => fs::read(path).with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).context("reading stdin")?;
            buf
        }
    };
    Ok(decode_text(&bytes).into_owned())
}

fn write_output(output: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
