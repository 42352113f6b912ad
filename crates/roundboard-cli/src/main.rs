//! roundboard CLI - render dashboard pages as JSON

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roundboard::prelude::*;
use roundboard::list_sheets;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roundboard")]
#[command(author, version, about = "Dashboard pages for round-based game reports")]
struct Cli {
    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a page and write it as JSON
    Render {
        /// Page name (home, purchasing, operations, sales, finances)
        page: Page,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding the input workbooks
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List page names
    Pages,

    /// List the sheets of a workbook
    Sheets {
        /// Input spreadsheet file (xlsx, csv)
        input: PathBuf,
    },

    /// Show the columns of a normalized finance report
    Normalize {
        /// Finance report file (xlsx, csv)
        input: PathBuf,

        /// Sheet to read (default: first)
        #[arg(short, long)]
        sheet: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli.command) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Render {
            page,
            config,
            data_dir,
            pretty,
            output,
        } => render_page(
            page,
            config.as_deref(),
            data_dir.as_deref(),
            pretty,
            output.as_deref(),
        ),
        Commands::Pages => {
            for page in Page::ALL {
                println!("{}\t{}", page.name(), page.title());
            }
            Ok(())
        }
        Commands::Sheets { input } => show_sheets(&input),
        Commands::Normalize { input, sheet } => show_normalized(&input, sheet.as_deref()),
    }
}

fn load_config(config: Option<&Path>, data_dir: Option<&Path>) -> Result<DashboardConfig> {
    let config = match config {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => DashboardConfig::default(),
    };
    let config = match data_dir {
        Some(dir) => config.with_data_dir(dir),
        None => config,
    };
    tracing::debug!(inputs = ?config.inputs, "configuration loaded");
    Ok(config)
}

fn render_page(
    page: Page,
    config: Option<&Path>,
    data_dir: Option<&Path>,
    pretty: bool,
    output: Option<&Path>,
) -> Result<()> {
    let config = load_config(config, data_dir)?;
    let render = render(page, &config);

    let failed = render.failures().count();
    if failed > 0 {
        eprintln!("{} panel(s) could not be rendered", failed);
    }

    let json = if pretty {
        serde_json::to_string_pretty(&render)
    } else {
        serde_json::to_string(&render)
    }
    .context("Failed to serialize page")?;

    if let Some(path) = output {
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        eprintln!("Wrote page '{}' to '{}'", page, path.display());
    } else {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", json).context("Failed to write to stdout")?;
    }

    Ok(())
}

fn show_sheets(input: &Path) -> Result<()> {
    let names =
        list_sheets(input).with_context(|| format!("Failed to open '{}'", input.display()))?;
    for (idx, name) in names.iter().enumerate() {
        println!("{}\t{}", idx, name);
    }
    Ok(())
}

fn show_normalized(input: &Path, sheet: Option<&str>) -> Result<()> {
    let config = DashboardConfig::default();
    let raw = WorkbookLoader::new()
        .load(input, sheet)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;
    let table = normalize(&raw, &config.normalize_rules())
        .with_context(|| format!("Failed to normalize '{}'", raw.source()))?;

    let rounds: Vec<String> = table.rounds().iter().map(|r| r.to_string()).collect();
    println!("Rounds: {}", rounds.join(", "));
    for label in table.labels().iter().skip(1) {
        println!("{}\t{}", label.name, label);
    }
    Ok(())
}
