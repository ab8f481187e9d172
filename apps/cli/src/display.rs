//! Terminal rendering of a propagation run.

use std::io::Write;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rollup_core::TraversalObserver;
use rollup_shared::{CompletionSummary, Item, ItemState, TraversalResult};
use tracing::debug;

/// How much of the walk to print.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DisplayMode {
    /// Every visited item as an indented tree, with annotations.
    Tree,
    /// One line per item closed (or that would be); a spinner otherwise.
    Quiet,
}

/// Observer that prints the walk, to stdout unless given another writer.
pub(crate) struct TreeDisplay {
    mode: DisplayMode,
    spinner: Option<ProgressBar>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl TreeDisplay {
    /// Print to stdout, with a spinner in quiet mode.
    pub(crate) fn new(mode: DisplayMode) -> Self {
        let mut display = Self::with_writer(mode, std::io::stdout());
        display.spinner = (mode == DisplayMode::Quiet).then(|| {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
                spinner.set_style(
                    style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
                );
            }
            spinner.enable_steady_tick(Duration::from_millis(80));
            spinner
        });
        display
    }

    /// Print to `out` with no spinner.
    pub(crate) fn with_writer(mode: DisplayMode, out: impl Write + Send + 'static) -> Self {
        Self {
            mode,
            spinner: None,
            out: Mutex::new(Box::new(out)),
        }
    }

    /// Clear the spinner, if any.
    pub(crate) fn finish(&self) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
    }

    fn print(&self, line: String) {
        let write = || {
            let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = writeln!(out, "{line}") {
                debug!(error = %e, "failed to write display line");
            }
        };
        match &self.spinner {
            Some(spinner) => spinner.suspend(write),
            None => write(),
        }
    }

    fn annotate(&self, depth: usize, note: String) {
        if self.mode == DisplayMode::Tree {
            self.print(annotation_line(depth, &note));
        }
    }
}

impl TraversalObserver for TreeDisplay {
    fn visited(&self, depth: usize, item: &Item) {
        match self.mode {
            DisplayMode::Tree => self.print(node_line(depth, item)),
            DisplayMode::Quiet => {
                if let Some(spinner) = &self.spinner {
                    spinner.set_message(format!("Checking {}", item.reference()));
                }
            }
        }
    }

    fn already_closed(&self, depth: usize, _item: &Item) {
        self.annotate(depth, style("skipped, already closed").dim().to_string());
    }

    fn no_children(&self, depth: usize, _item: &Item) {
        self.annotate(depth, style("no sub-issues").dim().to_string());
    }

    fn progress(&self, depth: usize, _item: &Item, summary: &CompletionSummary) {
        self.annotate(depth, format!("{summary} complete"));
    }

    fn closing(&self, depth: usize, item: &Item, preview: bool) {
        match self.mode {
            DisplayMode::Tree => {
                let note = if preview {
                    style("would close").yellow().bold()
                } else {
                    style("closing").green().bold()
                };
                self.print(annotation_line(depth, &note.to_string()));
            }
            DisplayMode::Quiet => self.print(closure_line(item, preview)),
        }
    }

    fn keeping_open(&self, depth: usize, _item: &Item, summary: &CompletionSummary) {
        self.annotate(depth, format!("keeping open: {summary}"));
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// `octo/app#3 Title [open]`, indented by depth.
pub(crate) fn node_line(depth: usize, item: &Item) -> String {
    let state = match item.state {
        ItemState::Open => style("open").green(),
        ItemState::Closed => style("closed").magenta(),
    };
    format!(
        "{}{} {} [{}]",
        indent(depth),
        style(item.reference()).bold(),
        item.title,
        state
    )
}

pub(crate) fn annotation_line(depth: usize, note: &str) -> String {
    format!("{}  ↳ {note}", indent(depth))
}

pub(crate) fn closure_line(item: &Item, preview: bool) -> String {
    let verb = if preview {
        style("Would close").yellow()
    } else {
        style("Closed").green()
    };
    format!("{verb} {} {}", style(item.reference()).bold(), item.title)
}

/// Final counts printed after a successful run.
pub(crate) fn summary_lines(result: &TraversalResult, preview: bool) -> Vec<String> {
    let closed_label = if preview { "Would close:" } else { "Closed:     " };
    vec![
        format!("  Processed:   {}", result.processed),
        format!("  {closed_label} {}", result.closed),
    ]
}
