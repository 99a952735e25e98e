use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use gorefs::core::scanner::VCS_DIR;
use gorefs::core::{AnalysisOptions, ProjectAnalyzer};
use gorefs::formatters::{DotFormatter, JsonCompactFormatter, UnreachableFormatter};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "gorefs",
    version,
    about = "Builds the reference graph of a Go project and reports unreachable declarations"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    scan: ScanArgs,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Clone, Args)]
struct ScanArgs {
    /// Directory name to skip while scanning (repeatable; .git is always skipped)
    #[arg(long = "ignore-dir", value_name = "NAME", global = true)]
    ignore_dirs: Vec<String>,

    /// Also analyze _test.go files
    #[arg(long, global = true)]
    include_tests: bool,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Write the reference graph of each root as Graphviz DOT (<root-name>.dot);
    /// render it with `dot -Tsvg`
    Visualize {
        /// Project roots, each containing a go.mod
        #[arg(value_name = "ROOT", required = true)]
        roots: Vec<PathBuf>,

        /// Directory the .dot files are written to
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,
    },
    /// Print declarations no entrypoint reaches
    Unreachable {
        /// Project roots, each containing a go.mod
        #[arg(value_name = "ROOT", required = true)]
        roots: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum OutputFormat {
    Text,
    JsonCompact,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let Cli { command, scan, .. } = cli;

    let options = scan
        .ignore_dirs
        .into_iter()
        .fold(AnalysisOptions::default(), |options, dir| {
            options.with_ignore_dir(dir)
        })
        .with_ignore_dir(VCS_DIR)
        .with_include_tests(scan.include_tests);
    let analyzer = ProjectAnalyzer::new(options);

    match command {
        Command::Visualize { roots, output_dir } => {
            let formatter = DotFormatter::new();
            for root in roots {
                let analysis = analyzer
                    .analyze(&root)
                    .with_context(|| format!("failed to analyze {}", root.display()))?;
                let output = formatter.format_to_dir(&analysis, &output_dir)?;
                eprintln!("Generated {}", output.display());
            }
        }
        Command::Unreachable { roots, format } => {
            let stdout = io::stdout();
            for root in roots {
                let analysis = analyzer
                    .analyze(&root)
                    .with_context(|| format!("failed to analyze {}", root.display()))?;
                match format {
                    OutputFormat::Text => {
                        UnreachableFormatter::new().write_to(&analysis, stdout.lock())?;
                    }
                    OutputFormat::JsonCompact => {
                        let report = JsonCompactFormatter::new().format_analysis(&analysis)?;
                        println!("{report}");
                    }
                }
            }
        }
    }

    Ok(())
}
