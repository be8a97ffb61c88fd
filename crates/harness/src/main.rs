use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use harness::{parse_script, report, Runner, SystemReport, TraceObserver};
use types::DEFAULT_FRAME_SIZE;
use vmm::{System, SystemConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Replay a page-access script against the demand-paging simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Script to run; reads stdin when omitted
    script: Option<PathBuf>,

    /// Cap on physical frames; unbounded when omitted
    #[arg(long)]
    frames: Option<usize>,

    /// Frame size in bytes
    #[arg(long, default_value_t = DEFAULT_FRAME_SIZE)]
    frame_size: usize,

    /// Pid of the initial process
    #[arg(long, default_value_t = 0)]
    init_pid: u32,

    /// Trace every translation, fault and switch
    #[arg(short, long)]
    verbose: bool,

    /// Final report format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let content = match &args.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read script from stdin")?;
            buf
        }
    };
    let lines = parse_script(&content)?;

    let config = SystemConfig {
        nr_frames: args.frames,
        frame_size: args.frame_size,
        init_pid: args.init_pid,
    };
    let mut system = System::new(config).with_context(|| {
        format!(
            "Failed to set up memory (--frames {:?}, --frame-size {})",
            args.frames, args.frame_size
        )
    })?;
    if args.verbose {
        system.set_observer(Box::new(TraceObserver));
    }

    let mut runner = Runner::new(system);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = runner.run(&lines, &mut out);

    match args.format {
        Format::Text => {
            println!();
            println!("{}", "Final state".bold().blue());
            println!("{}", "===========".blue());
            let sys = runner.system();
            report::write_queue(&mut out, sys)?;
            for process in sys.processes() {
                report::write_page_table(&mut out, sys, process)?;
            }
            report::write_stats(&mut out, sys)?;
        }
        Format::Json => {
            let report = SystemReport::capture(runner.system());
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    outcome
}
