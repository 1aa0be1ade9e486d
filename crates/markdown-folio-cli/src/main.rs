use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use markdown_folio_config::Config;
use markdown_folio_engine::{PageTemplate, Pipeline, SiteBuilder};
use relative_path::RelativePath;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "markdown-folio")]
#[command(about = "Static site generator for markdown documents with front matter")]
struct Cli {
    /// Verbose output (-v for debug, -vv for per-node trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (defaults to ./folio.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every document in the source tree
    Build {
        /// Source directory
        #[arg(long, value_name = "DIR")]
        src: Option<PathBuf>,

        /// Output directory
        #[arg(long, value_name = "DIR")]
        www: Option<PathBuf>,

        /// Template directory
        #[arg(long, value_name = "DIR")]
        tmpl: Option<PathBuf>,

        /// Skip documents that fail to render instead of stopping
        #[arg(long)]
        keep_going: bool,
    },
    /// Print the HTML fragment of a single document
    Render {
        file: PathBuf,

        /// Apply this page template instead of printing the bare fragment
        #[arg(long, value_name = "FILE")]
        template: Option<PathBuf>,
    },
    /// Write a default config file
    Init {
        #[arg(default_value = markdown_folio_config::DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Build {
            src,
            www,
            tmpl,
            keep_going,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            apply_overrides(&mut config, src, www, tmpl, keep_going);
            build(&config)
        }
        Command::Render { file, template } => {
            let config = load_config(cli.config.as_deref())?;
            render(&config, &file, template.as_deref())
        }
        Command::Init { path, force } => init(&path, force),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    // RUST_LOG, when set, wins over -v
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Loads the given config file, or `./folio.toml` if it exists, or defaults.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?
            .with_context(|| format!("Config file {} does not exist", path.display())),
        None => {
            let config = Config::load().context("Failed to load config")?;
            if config.is_none() {
                log::debug!(
                    "No {} found, using defaults",
                    Config::config_path().display()
                );
            }
            Ok(config.unwrap_or_default())
        }
    }
}

fn apply_overrides(
    config: &mut Config,
    src: Option<PathBuf>,
    www: Option<PathBuf>,
    tmpl: Option<PathBuf>,
    keep_going: bool,
) {
    if let Some(src) = src {
        config.source_dir = src;
    }
    if let Some(www) = www {
        config.output_dir = www;
    }
    if let Some(tmpl) = tmpl {
        config.template_dir = tmpl;
    }
    config.keep_going |= keep_going;
}

fn build(config: &Config) -> Result<()> {
    log::info!("Generating website");
    let excludes = config.exclude_set()?;

    let report = SiteBuilder::new(&config.source_dir, &config.output_dir, &config.template_dir)
        .with_pipeline(Pipeline::with_options(config.render))
        .output_extension(&config.output_extension)
        .failure_policy(config.failure_policy())
        .skip_if(move |path: &RelativePath| excludes.matches(path.as_str()))
        .build()
        .with_context(|| format!("Failed to build site from {}", config.source_dir.display()))?;

    log::info!(
        "Wrote {} page(s) to {}",
        report.written.len(),
        config.output_dir.display()
    );

    if !report.is_success() {
        for failure in &report.failed {
            log::error!("{}: {}", failure.document, failure.error);
        }
        bail!("{} document(s) failed to render", report.failed.len());
    }
    Ok(())
}

fn render(config: &Config, file: &Path, template: Option<&Path>) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let pipeline = Pipeline::with_options(config.render);
    let page = pipeline.render(&file.display().to_string(), &raw)?;

    match template {
        Some(template) => {
            let template = PageTemplate::from_file(template)?;
            println!("{}", template.render(&page)?);
        }
        None => println!("{}", page.content),
    }
    Ok(())
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Config::default()
        .save_to_path(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote default config to {}", path.display());
    Ok(())
}
