//! airlift - pack project files into a single offline HTML installer

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use airlift::{Error, FileSpec, PackConfig, build_installer};

#[derive(Parser)]
#[command(name = "airlift")]
#[command(version, about = "Pack project files into a single offline HTML installer", long_about = None)]
#[command(after_help = "EXAMPLES:
    airlift                                 Package package.json, out/extension.js, README.md
    airlift -o installer.html               Same, written to installer.html
    airlift -f main.js=dist/main.js -f README.md
                                            Package an explicit file list
    airlift -c airlift.json --print-config  Show the effective configuration")]
struct Cli {
    /// JSON config file (fields left out keep their defaults)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// File to package, as NAME=PATH or just PATH (repeatable, replaces the configured list)
    #[arg(short = 'f', long = "file", value_name = "NAME=PATH")]
    files: Vec<FileSpec>,

    /// Output HTML file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Page title
    #[arg(short, long)]
    title: Option<String>,

    /// Custom page template containing {js_array_content}
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Project root that relative paths resolve against
    #[arg(short = 'C', long = "dir", value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Suppress progress and summary output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);
    let config_path = cli.config.clone();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            // The hint is about source files, not the config file itself.
            if let Error::MissingFile { path } = &e
                && config_path.as_deref() != Some(path.as_path())
            {
                eprintln!("Please ensure you are running this from your project root (or pass --dir).");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("airlift={level}"))),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<(), Error> {
    let config = load_config(&cli)?;

    if cli.print_config {
        let json = serde_json::to_string_pretty(&config).map_err(Error::Serialize)?;
        println!("{json}");
        return Ok(());
    }

    let config = config.resolve_paths(&cli.dir);
    let report = build_installer(&config)?;

    if !cli.quiet {
        println!("{}", "-".repeat(50));
        println!("Success! Your offline installer is ready:");
        println!("File: {}", report.output.display());
        println!(
            "Packaged {} file(s): {} ({} bytes)",
            report.files.len(),
            report.files.join(", "),
            report.bytes
        );
        println!("Transfer this file (as plain text) to the offline machine.");
        println!("{}", "-".repeat(50));
    }

    Ok(())
}

/// Start from the config file (or defaults) and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<PackConfig, Error> {
    let mut config = match &cli.config {
        Some(path) => PackConfig::from_json_file(path)?,
        None => PackConfig::default(),
    };

    if !cli.files.is_empty() {
        config.files = cli.files.clone();
    }
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    if let Some(title) = &cli.title {
        config.title = title.clone();
    }
    if let Some(template) = &cli.template {
        config.template = Some(template.clone());
    }

    Ok(config)
}
