use std::{
    process::ExitCode,
    sync::{Arc, atomic::Ordering},
    time::Instant,
};

use anyhow::{Context, Result};
use clap::Args;
use crossbeam::channel::select;
use log::{error, info};
use modscan_engine::RecencyWindow;
use modscan_pipeline::{Pipeline, SearchOutcome, configure};
use modscan_runtime::{DEFAULT_EXTENSIONS, POLL_INTERVAL, PROGRAM_NAME, default_scan_root};
use signal_hook::{
    consts::{SIGINT, SIGTERM},
    flag,
};

use crate::printer::{
    ColorChoice, OutputFormat, PrinterConfig, RecordPrinter, SearchSummary, stdout_printer,
};

const EXIT_ABORTED: u8 = 1;
const EXIT_CONFIG: u8 = 2;
const EXIT_CANCELLED: u8 = 130;

#[derive(Debug, Args)]
pub struct OutputOptions {
    /// Output records as NDJSON (one JSON object per line)
    #[arg(long)]
    pub json: bool,

    /// When to use colors: auto, always, never
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: String,

    /// Do not print the color legend before the results
    #[arg(long)]
    pub no_legend: bool,

    /// Suppress the closing summary line
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl OutputOptions {
    pub fn printer_config(&self) -> PrinterConfig {
        PrinterConfig {
            format: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            },
            color: ColorChoice::parse(&self.color),
            show_summary: !self.quiet,
        }
    }
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Directory to search [default: home directory]
    pub root: Option<String>,

    /// Extensions to look for, separated by spaces or commas
    #[arg(long, short = 'e', value_name = "TOKENS", default_value = DEFAULT_EXTENSIONS)]
    pub ext: String,

    /// Report files modified within: ever, hour, week, 30days
    #[arg(long, short = 's', value_name = "WINDOW", default_value = "ever")]
    pub since: RecencyWindow,

    #[command(flatten)]
    pub output: OutputOptions,
}

impl SearchArgs {
    fn root(&self) -> String {
        self.root
            .clone()
            .unwrap_or_else(|| default_scan_root().to_string_lossy().into_owned())
    }
}

pub fn run(args: SearchArgs) -> ExitCode {
    match execute(args) {
        Ok(code) => code,
        Err(e) => {
            error!("[search] {e:#}");
            eprintln!("[error] {e:#}");
            ExitCode::from(EXIT_CONFIG)
        }
    }
}

fn execute(args: SearchArgs) -> Result<ExitCode> {
    let root = args.root();

    let config = match configure(&root, &args.ext, args.since) {
        Ok(cfg) => cfg.with_legend(!args.output.no_legend),
        Err(e) => {
            eprintln!("[{PROGRAM_NAME}] {e}");
            return Ok(ExitCode::from(EXIT_CONFIG));
        }
    };

    let mut printer = stdout_printer(args.output.printer_config());
    let mut pipeline = Pipeline::new();
    let started = Instant::now();

    let interrupted = pipeline.start(config)?.cancel_token().as_flag();

    // Handlers only set the search's cancel flag.
    for sig in [SIGINT, SIGTERM] {
        flag::register(sig, Arc::clone(&interrupted))
            .with_context(|| format!("failed to register signal handler for {sig}"))?;
    }

    let status = pipeline.status().clone();
    let records = pipeline.info().clone();

    loop {
        if interrupted.load(Ordering::Relaxed) {
            info!("[search] interrupted; cancelling");
            pipeline.cancel();
            printer.finish(&SearchSummary {
                outcome: "cancelled",
                directories: 0,
                files: 0,
                inaccessible: 0,
                elapsed: started.elapsed(),
            })?;
            return Ok(ExitCode::from(EXIT_CANCELLED));
        }

        select! {
            recv(status) -> msg => match msg {
                Ok(record) => {
                    printer.print_status(&record)?;
                    if record.is_terminal() {
                        break;
                    }
                }
                Err(_) => break,
            },
            recv(records) -> msg => {
                if let Ok(record) = msg {
                    printer.print_info(&record)?;
                }
            },
            default(POLL_INTERVAL) => {}
        }
    }

    let outcome = pipeline.wait()?;

    // Walk errors are queued on info before the terminal status record.
    for record in records.try_iter() {
        printer.print_info(&record)?;
    }

    let (label, stats, code) = match outcome {
        Some(SearchOutcome::Completed(stats)) => ("completed", stats, ExitCode::SUCCESS),
        Some(SearchOutcome::Aborted(err)) => {
            info!("[search] walk aborted at {}", err.path.display());
            ("aborted", Default::default(), ExitCode::from(EXIT_ABORTED))
        }
        Some(SearchOutcome::Cancelled) | None => {
            ("cancelled", Default::default(), ExitCode::from(EXIT_CANCELLED))
        }
    };

    printer.finish(&SearchSummary {
        outcome: label,
        directories: stats.directories,
        files: stats.files,
        inaccessible: stats.inaccessible,
        elapsed: started.elapsed(),
    })?;

    Ok(code)
}
