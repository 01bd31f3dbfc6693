//! NorthStar pipeline CLI
//!
//! Command-line tool for stamping copyright headers onto C# scripts and
//! exporting the localisation sheet to the dialogue system's XML.

mod logging;

use clap::{Parser, Subcommand};
use ns_core::{check_tree, export_dialogue, stamp_tree, PipelineConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ns-cli")]
#[command(about = "NorthStar asset pipeline tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Pipeline config file (JSON); flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory relative paths are resolved against (default: current directory)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepend the copyright header to source files that lack it
    StampHeaders {
        /// Root directory to scan
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// File extension to stamp (case-sensitive)
        #[arg(short, long)]
        extension: Option<String>,

        /// Header line to require
        #[arg(long)]
        header: Option<String>,

        /// Report files missing the header without modifying them
        #[arg(long)]
        check: bool,
    },

    /// Export the localisation sheet to TextData XML
    ExportDialogue {
        /// Spreadsheet to read (.xlsx, .xls, .ods or .csv)
        #[arg(short, long)]
        workbook: Option<PathBuf>,

        /// XML file to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worksheet name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,
    },

    /// Write a config file populated with the default settings
    InitConfig {
        /// Output path for the config file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> ns_core::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(logging::level_from_flags(cli.verbose, cli.quiet)) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::StampHeaders {
            root,
            extension,
            header,
            check,
        } => {
            let config = PipelineConfig {
                source_root: root.unwrap_or(config.source_root),
                extension: extension.unwrap_or(config.extension),
                header: header.unwrap_or(config.header),
                ..config
            };
            cmd_stamp_headers(&config.resolve(&base_dir), check)
        }
        Commands::ExportDialogue {
            workbook,
            output,
            sheet,
        } => {
            let config = PipelineConfig {
                workbook: workbook.unwrap_or(config.workbook),
                output: output.unwrap_or(config.output),
                sheet: sheet.or(config.sheet),
                ..config
            };
            cmd_export_dialogue(&config.resolve(&base_dir))
        }
        Commands::InitConfig { output } => cmd_init_config(&config, &output),
    }
}

fn cmd_stamp_headers(config: &PipelineConfig, check: bool) -> ns_core::Result<()> {
    if check {
        let missing = check_tree(&config.source_root, &config.extension, &config.header)?;
        if missing.is_empty() {
            println!("All .{} files carry the header", config.extension);
            return Ok(());
        }

        println!("Missing header in {} file(s):", missing.len());
        for path in &missing {
            println!("  {}", path.display());
        }
        std::process::exit(1);
    }

    let report = stamp_tree(&config.source_root, &config.extension, &config.header)?;

    println!("Scanned {}", report.root.display());
    println!(
        "  {} .{} file(s), {} stamped, {} already headered",
        report.files_scanned,
        config.extension,
        report.stamped.len(),
        report.already_present
    );
    for path in &report.stamped {
        println!("  + {}", path.display());
    }

    Ok(())
}

fn cmd_export_dialogue(config: &PipelineConfig) -> ns_core::Result<()> {
    let summary = export_dialogue(&config.workbook, &config.output, config.sheet.as_deref())?;

    println!(
        "Exported {} text object(s) in {} language(s) from sheet '{}'",
        summary.text_objects, summary.languages, summary.sheet
    );
    println!("  {} -> {}", summary.workbook.display(), summary.output.display());

    Ok(())
}

fn cmd_init_config(config: &PipelineConfig, output: &Path) -> ns_core::Result<()> {
    config.save(output)?;
    println!("Created config file: {}", output.display());
    println!();
    println!("Edit the file to adjust paths, then run:");
    println!("  ns-cli --config {} stamp-headers", output.display());
    println!("  ns-cli --config {} export-dialogue", output.display());

    Ok(())
}
