use std::{
    io::{self, IsTerminal, Write},
    time::Duration,
};

use modscan_engine::{Category, DisplayRecord, Stream};
use modscan_runtime::PROGRAM_NAME;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored or plain lines.
    #[default]
    Human,
    /// NDJSON (newline-delimited JSON) for machine consumption.
    Json,
}

/// Color handling strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Color only when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn parse(s: &str) -> Self {
        match s {
            "always" => ColorChoice::Always,
            "never" => ColorChoice::Never,
            _ => ColorChoice::Auto,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrinterConfig {
    pub format: OutputFormat,
    pub color: ColorChoice,
    /// Print a one-line summary on stderr once the search ends.
    pub show_summary: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: ColorChoice::Auto,
            show_summary: true,
        }
    }
}

/// End-of-search figures handed to [`RecordPrinter::finish`].
#[derive(Debug)]
pub struct SearchSummary<'a> {
    /// `completed`, `aborted` or `cancelled`.
    pub outcome: &'a str,
    pub directories: usize,
    pub files: usize,
    pub inaccessible: usize,
    pub elapsed: Duration,
}

/// Renders the two output streams of a search.
///
/// Status records go to the primary writer, info records and the summary
/// to the secondary one.
pub trait RecordPrinter {
    fn print_status(&mut self, record: &DisplayRecord) -> io::Result<()>;

    fn print_info(&mut self, record: &DisplayRecord) -> io::Result<()>;

    fn finish(&mut self, summary: &SearchSummary) -> io::Result<()>;
}

/// Build the printer selected by `cfg` over stdout and stderr.
pub fn stdout_printer(cfg: PrinterConfig) -> Box<dyn RecordPrinter> {
    match cfg.format {
        OutputFormat::Human => Box::new(HumanPrinter::stdout(cfg)),
        OutputFormat::Json => Box::new(JsonPrinter::new(io::stdout(), io::stderr(), cfg)),
    }
}

fn ansi_color(category: Category) -> &'static str {
    match category {
        Category::Directory => "\x1b[37m",
        Category::Modified => "\x1b[31m",
        Category::Unmodified | Category::Finished => "\x1b[32m",
        Category::Diagnostic => "\x1b[33m",
    }
}

pub struct HumanPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
    use_color: bool,
}

impl<W: Write, E: Write> HumanPrinter<W, E> {
    /// `Auto` never colors here since arbitrary writers cannot be probed.
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        let use_color = cfg.color == ColorChoice::Always;

        Self {
            out,
            err,
            cfg,
            use_color,
        }
    }

    #[inline]
    fn format_record(&self, record: &DisplayRecord) -> String {
        if self.use_color {
            format!("{}{}\x1b[0m", ansi_color(record.category()), record.text())
        } else {
            record.text().to_owned()
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }
}

impl HumanPrinter<io::Stdout, io::Stderr> {
    /// Printer over stdout and stderr with TTY detection.
    pub fn stdout(cfg: PrinterConfig) -> Self {
        let use_color = match cfg.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal(),
        };

        Self {
            use_color,
            ..Self::new(io::stdout(), io::stderr(), cfg)
        }
    }
}

impl<W: Write, E: Write> RecordPrinter for HumanPrinter<W, E> {
    fn print_status(&mut self, record: &DisplayRecord) -> io::Result<()> {
        let line = self.format_record(record);
        writeln!(self.out, "{line}")
    }

    fn print_info(&mut self, record: &DisplayRecord) -> io::Result<()> {
        let line = self.format_record(record);
        writeln!(self.err, "{line}")
    }

    fn finish(&mut self, summary: &SearchSummary) -> io::Result<()> {
        self.out.flush()?;

        if self.cfg.show_summary {
            writeln!(
                self.err,
                "\n[{PROGRAM_NAME}] {}: {} dirs, {} files, {} inaccessible in {:.2}s",
                summary.outcome,
                summary.directories,
                summary.files,
                summary.inaccessible,
                summary.elapsed.as_secs_f64(),
            )?;
        }

        Ok(())
    }
}

pub struct JsonPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
}

impl<W: Write, E: Write> JsonPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        Self { out, err, cfg }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }
}

/// `stream` is where the record arrived, which for legend records differs
/// from the stream their category maps to.
fn record_json(record: &DisplayRecord, stream: Stream) -> serde_json::Value {
    serde_json::json!({
        "stream": stream,
        "category": record.category(),
        "text": record.text(),
    })
}

impl<W: Write, E: Write> RecordPrinter for JsonPrinter<W, E> {
    fn print_status(&mut self, record: &DisplayRecord) -> io::Result<()> {
        writeln!(self.out, "{}", record_json(record, Stream::Status))
    }

    fn print_info(&mut self, record: &DisplayRecord) -> io::Result<()> {
        writeln!(self.err, "{}", record_json(record, Stream::Info))
    }

    fn finish(&mut self, summary: &SearchSummary) -> io::Result<()> {
        self.out.flush()?;

        if self.cfg.show_summary {
            let obj = serde_json::json!({
                "type": "summary",
                "outcome": summary.outcome,
                "directories": summary.directories,
                "files": summary.files,
                "inaccessible": summary.inaccessible,
                "elapsed_ms": summary.elapsed.as_secs_f64() * 1000.0,
            });
            writeln!(self.err, "{obj}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "printer_tests.rs"]
mod tests;
