//! Shows the key hint panel for a set of mappings in the terminal.
//!
//! One cell of the terminal counts as one pixel. The panel is printed once the
//! debounce delay has passed and the process exits when it is dismissed.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use keyhint::common::config::{ConfigService, DefaultConfig, TomlConfig};
use keyhint::common::log::init_logging;
use keyhint::model::{Candidate, CandidateSet, MappingEntry};
use keyhint::sys::executor::InlineDispatcher;
use keyhint::sys::geometry::{Point, Rect, Size};
use keyhint::ui::panel::PanelContent;
use keyhint::ui::scheduler::Instant;
use keyhint::ui::surface::{AutoClose, HostWindow, PanelHandle, Placement, RenderingSurface, ShowOptions};
use keyhint::DisplayScheduler;
use serde::Deserialize;
use tokio::sync::Notify;
use tracing::{debug, info};

/// Gap between two columns, in cells.
const COLUMN_GAP: u32 = 2;

#[derive(Parser, Debug)]
#[command(name = "keyhint")]
#[command(about = "Show the keys that continue a partially typed key sequence")]
struct Cli {
    /// Config file [default: <config dir>/keyhint/config.toml when it exists]
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// A command mapping
    #[arg(long = "map", value_name = "KEY=DESC", value_parser = parse_pair)]
    maps: Vec<(String, String)>,

    /// A prefix mapping that opens further keys
    #[arg(long = "prefix", value_name = "KEY=DESC", value_parser = parse_pair)]
    prefixes: Vec<(String, String)>,

    /// TOML file with `[[mapping]]` tables of `key`, `description` and `prefix`
    #[arg(long, value_name = "PATH")]
    mappings: Option<PathBuf>,

    /// The sequence typed so far
    #[arg(long, default_value = "")]
    typed: String,

    /// Terminal width in cells
    #[arg(long, default_value_t = 80)]
    columns: u32,

    /// Terminal height in cells
    #[arg(long, default_value_t = 24)]
    rows: u32,

    /// Give up waiting for the panel to be dismissed after this many milliseconds
    #[arg(long, value_name = "MS", default_value_t = 5_000)]
    linger_ms: u64,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Deserialize, Debug, Default)]
struct MappingFile {
    #[serde(default)]
    mapping: Vec<MappingEntry>,
}

fn parse_pair(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, desc)) if !key.is_empty() => Ok((key.to_owned(), desc.to_owned())),
        _ => Err(format!("expected KEY=DESC, got `{arg}`")),
    }
}

impl Cli {
    fn candidates(&self) -> anyhow::Result<CandidateSet> {
        let mut entries: Vec<MappingEntry> = match &self.mappings {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let file: MappingFile = toml::from_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?;
                file.mapping
            }
            None => Vec::new(),
        };
        entries.extend(self.maps.iter().map(|(key, desc)| MappingEntry::command(key, desc)));
        entries.extend(self.prefixes.iter().map(|(key, desc)| MappingEntry::prefix(key, desc)));
        Ok(entries.into_iter().map(Candidate::from).collect())
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Arc<dyn ConfigService>> {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => dirs::config_dir()
            .map(|dir| dir.join("keyhint").join("config.toml"))
            .filter(|path| path.exists()),
    };
    let Some(path) = path else {
        debug!("no config file; using defaults");
        return Ok(Arc::new(DefaultConfig));
    };
    let config = TomlConfig::read(&path)
        .with_context(|| format!("loading config from {}", path.display()))?;
    info!(path = %path.display(), "loaded config");
    Ok(Arc::new(config))
}

struct TerminalWindow {
    columns: u32,
    rows: u32,
}

impl HostWindow for TerminalWindow {
    fn content_bounds(&self) -> Rect {
        Rect::new(Point::new(0, 0), Size::new(self.columns, self.rows))
    }
}

/// Prints panels to stdout. It never closes a panel on its own.
struct TerminalSurface {
    closed: Arc<Notify>,
}

/// Visible text of a markup fragment.
fn plain_text(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

impl RenderingSurface for TerminalSurface {
    fn measure_width(&self, fragment: &str) -> u32 {
        plain_text(fragment).chars().count() as u32 + COLUMN_GAP
    }

    fn panel_size(&self, content: &PanelContent) -> Size {
        let columns = content.rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let footer = if content.typed_sequence.is_some() { 2 } else { 0 };
        Size::new(content.column_width_px * columns, content.rows.len() as u32 + footer)
    }

    fn show(
        &self,
        _host: &dyn HostWindow,
        content: &PanelContent,
        placement: Placement,
        options: ShowOptions,
        _on_auto_close: AutoClose,
    ) -> Box<dyn PanelHandle> {
        debug!(?placement, ?options, "printing panel");
        let width = content.column_width_px as usize;
        for row in &content.rows {
            let line: String = row
                .iter()
                .map(|cell| format!("{:<width$}", plain_text(cell)))
                .collect();
            println!("{}", line.trim_end());
        }
        if let Some(typed) = &content.typed_sequence {
            println!("{}", "-".repeat(width.clamp(1, 40)));
            println!("{typed}");
        }
        Box::new(TerminalPanel {
            closed: self.closed.clone(),
            done: AtomicBool::new(false),
        })
    }
}

struct TerminalPanel {
    closed: Arc<Notify>,
    done: AtomicBool,
}

impl PanelHandle for TerminalPanel {
    fn close(&self) {
        if !self.done.swap(true, Ordering::SeqCst) {
            println!("(dismissed)");
            self.closed.notify_one();
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let candidates = cli.candidates()?;
    if candidates.is_empty() {
        info!("no mappings given; nothing to show");
        return Ok(());
    }

    let closed = Arc::new(Notify::new());
    let surface = Arc::new(TerminalSurface { closed: closed.clone() });
    let scheduler = DisplayScheduler::new(surface, config, Arc::new(InlineDispatcher));
    let host = Arc::new(TerminalWindow { columns: cli.columns, rows: cli.rows });

    scheduler.request_display(host, &cli.typed, candidates, Instant::now());
    let linger = Duration::from_millis(cli.linger_ms);
    if tokio::time::timeout(linger, closed.notified()).await.is_err() {
        debug!(?linger, "panel still up; hiding it");
        scheduler.hide_popup();
    }
    Ok(())
}
