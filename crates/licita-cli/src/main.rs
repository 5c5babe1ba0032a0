mod commands;
mod output;
mod prompt;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "licita",
    version,
    about = "Consolidate procurement line items from PDF tables and split them by vendor category"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the tables of a PDF, clean the rows and consolidate repeated lots
    Consolidate {
        /// Path to the PDF (prompted for when omitted)
        pdf_file: Option<PathBuf>,

        /// Directory for <name>_CONSOLIDADO.xlsx and <name>_DATOS_ORIGINALES.xlsx
        #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Split a consolidated file into one workbook per category
    Split {
        /// Consolidated .xlsx or .json file (prompted for when omitted)
        input_file: Option<PathBuf>,

        /// Custom JSON keyword rule file (default: builtin table)
        #[arg(short, long = "rules", value_name = "FILE")]
        rules: Option<PathBuf>,

        /// Directory for the category workbooks and the summary
        #[arg(short = 'd', long, value_name = "DIR", default_value = "CATEGORIAS_SEPARADAS")]
        out_dir: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// List the family labels of a consolidated file with their category
    Families {
        /// Consolidated .xlsx or .json file
        input_file: PathBuf,

        /// Custom JSON keyword rule file (default: builtin table)
        #[arg(short, long = "rules", value_name = "FILE")]
        rules: Option<PathBuf>,
    },
    /// Manage and inspect keyword rule tables
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// List predefined keyword tables
    List,
    /// Show the categories of a table in priority order with their keywords
    Explain {
        /// Preset name (e.g., "default")
        #[arg(default_value = "default")]
        preset: String,
    },
    /// Validate a custom rule file
    Validate {
        /// Path to JSON rule file
        file: PathBuf,
    },
    /// Classify a single family label and show the deciding keyword
    Match {
        /// Family label to classify
        label: String,

        /// Custom JSON keyword rule file (default: builtin table)
        #[arg(short, long = "rules", value_name = "FILE")]
        rules: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Consolidate {
            pdf_file,
            out_dir,
            output,
        } => commands::consolidate::run(pdf_file, &out_dir, &output),
        Commands::Split {
            input_file,
            rules,
            out_dir,
            output,
        } => commands::split::run(input_file, rules, &out_dir, &output),
        Commands::Families { input_file, rules } => commands::split::families(&input_file, rules),
        Commands::Rules { action } => match action {
            RulesAction::List => commands::rules::list(),
            RulesAction::Explain { preset } => commands::rules::explain(&preset),
            RulesAction::Validate { file } => commands::rules::validate(&file),
            RulesAction::Match { label, rules } => commands::rules::match_label(&label, rules),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
