// Licensed under the Apache-2.0 license

use anyhow::{bail, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::{error, info, LevelFilter};
use regbank::files::default_gen_dir;
use regbank::{GlueRequest, JobRunner, RegisterArg, RunOptions, Step, AXI_DEBUG_SYMBOL};
use regbank_generator::ResetPolicy;
use simple_logger::SimpleLogger;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "regbank",
    author,
    version,
    about = "Generate AXI4-Lite register glue and matching C structures"
)]
struct Cli {
    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every job found in the given files
    Run {
        /// Directory generated files are written to [default: gen next to the first file]
        #[arg(short, long, value_name = "DIR")]
        gen_dir: Option<PathBuf>,

        /// Additional directory to search for templates
        #[arg(short = 't', long = "template-dir", value_name = "DIR")]
        template_dirs: Vec<PathBuf>,

        /// Define a symbol for all jobs (SYMBOL or SYMBOL=VALUE)
        #[arg(short = 'D', long = "define", value_name = "SYMBOL")]
        defines: Vec<String>,

        /// Reset every register to its own offset
        #[arg(short = 'A', long)]
        axi_debug: bool,

        /// Job manifests (.toml) or sources with embedded jobs
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Generate glue and a C structure for registers given on the command line
    Glue {
        /// Verilog output file
        #[arg(long, value_name = "FILE")]
        verilog: PathBuf,

        /// C header output file
        #[arg(long, value_name = "FILE")]
        header: PathBuf,

        /// Name of the C structure
        #[arg(long, value_name = "NAME")]
        struct_name: String,

        /// Base template [default: builtin:axi4-lite]
        #[arg(long, value_name = "TEMPLATE")]
        template: Option<String>,

        /// Reset every register to its own offset
        #[arg(short = 'A', long)]
        axi_debug: bool,

        /// Register as name[@offset][:mode[:comment]]
        #[arg(short, long = "register", value_name = "SPEC", required = true)]
        registers: Vec<RegisterArg>,
    },

    /// List the instructions available to jobs
    Ops,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Failed to initialize logging: {e}");
    }

    if let Err(e) = run(cli.command) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            gen_dir,
            template_dirs,
            defines,
            axi_debug,
            files,
        } => run_jobs(gen_dir, template_dirs, &defines, axi_debug, &files),
        Commands::Glue {
            verilog,
            header,
            struct_name,
            template,
            axi_debug,
            registers,
        } => GlueRequest {
            verilog,
            header,
            struct_name,
            template,
            reset_policy: if axi_debug {
                ResetPolicy::Offset
            } else {
                ResetPolicy::Zero
            },
            registers,
        }
        .run(),
        Commands::Ops => {
            for (op, description) in Step::OPS {
                println!("{op:<22} {description}");
            }
            Ok(())
        }
    }
}

fn run_jobs(
    gen_dir: Option<PathBuf>,
    template_dirs: Vec<PathBuf>,
    defines: &[String],
    axi_debug: bool,
    files: &[PathBuf],
) -> Result<()> {
    let Some(first) = files.first() else {
        bail!("no input files");
    };
    let gen_dir = gen_dir.unwrap_or_else(|| default_gen_dir(first));
    info!("generating into {}", gen_dir.display());

    let mut runner = JobRunner::new(RunOptions {
        gen_dir,
        template_dirs,
    });
    for define in defines {
        match define.split_once('=') {
            Some((symbol, value)) => runner.symbols_mut().define_value(symbol, value),
            None => runner.symbols_mut().define(define),
        }
    }
    if axi_debug {
        runner.symbols_mut().define(AXI_DEBUG_SYMBOL);
    }

    let all_good = runner.run_files(files);

    info!(
        "{} jobs completed, {} total job errors, {} unreadable files",
        runner.completed_jobs(),
        runner.failed_jobs(),
        runner.failed_files()
    );
    if !all_good {
        bail!(
            "{} job(s) and {} file(s) failed",
            runner.failed_jobs(),
            runner.failed_files()
        );
    }
    Ok(())
}

