//! Plain-text renderer and view for terminal output.

use super::{ChartHandle, ChartKind, ChartRenderer, ChartSeries, ChartSlot, ChartSpec, ViewSurface};
use crate::aggregate::ScatterPoint;
use crate::present::{TableRow, TABLE_COLUMNS};
use std::fmt::Write as _;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{trace, warn};

const BAR_WIDTH: usize = 40;
const SCATTER_WIDTH: usize = 48;
const SCATTER_HEIGHT: usize = 12;
const MAX_CELL_WIDTH: usize = 32;

/// Draws charts as ASCII art into a writer.
pub struct TerminalRenderer<W: Write + Send> {
    out: W,
    live: Arc<AtomicUsize>,
}

/// A chart drawn by [`TerminalRenderer`].
#[derive(Debug)]
pub struct TerminalChart {
    slot: ChartSlot,
    live: Arc<AtomicUsize>,
}

impl TerminalChart {
    /// Slot this chart was drawn for.
    pub fn slot(&self) -> ChartSlot {
        self.slot
    }
}

impl ChartHandle for TerminalChart {
    fn destroy(self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        trace!(slot = self.slot.as_str(), "Terminal chart released");
    }
}

impl TerminalRenderer<std::io::Stdout> {
    /// Draw to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    /// Draw to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Charts created and not yet destroyed.
    pub fn live_charts(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Return the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ChartRenderer for TerminalRenderer<W> {
    type Handle = TerminalChart;

    fn create(&mut self, spec: ChartSpec) -> TerminalChart {
        let text = match (&spec.kind, &spec.series) {
            (ChartKind::Scatter, ChartSeries::Points(points)) => draw_scatter(&spec, points),
            (_, ChartSeries::Values(values)) => draw_bars(&spec, values),
            (ChartKind::Bar, ChartSeries::Points(points)) => {
                let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
                draw_bars(&spec, &ys)
            }
        };

        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!(error = %e, slot = spec.slot.as_str(), "Failed to write chart");
        }

        self.live.fetch_add(1, Ordering::SeqCst);
        TerminalChart {
            slot: spec.slot,
            live: Arc::clone(&self.live),
        }
    }
}

fn draw_bars(spec: &ChartSpec, values: &[f64]) -> String {
    let mut text = format!("\n== {} ==\n", spec.style.dataset_label);
    if values.is_empty() {
        text.push_str("  (no data)\n");
        return text;
    }

    let label_width = spec
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(values.len().to_string().len());
    let max = values.iter().copied().filter(|v| v.is_finite()).fold(0.0f64, f64::max);

    for (i, value) in values.iter().enumerate() {
        let label = spec.labels.get(i).cloned().unwrap_or_else(|| (i + 1).to_string());
        let len = if max > 0.0 && value.is_finite() && *value > 0.0 {
            ((value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            text,
            "  {:>width$} | {:<bar$} {}",
            label,
            "#".repeat(len),
            value,
            width = label_width,
            bar = BAR_WIDTH
        );
    }
    text
}

fn draw_scatter(spec: &ChartSpec, points: &[ScatterPoint]) -> String {
    let mut text = format!("\n== {} ==\n", spec.style.dataset_label);
    let finite: Vec<_> = points
        .iter()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();
    if finite.is_empty() {
        text.push_str("  (no data)\n");
        return text;
    }

    let (min_x, max_x) = bounds(finite.iter().map(|p| p.x));
    let (min_y, max_y) = bounds(finite.iter().map(|p| p.y));
    let mut grid = vec![vec![' '; SCATTER_WIDTH]; SCATTER_HEIGHT];
    for p in &finite {
        let col = scale(p.x, min_x, max_x, SCATTER_WIDTH);
        let row = SCATTER_HEIGHT - 1 - scale(p.y, min_y, max_y, SCATTER_HEIGHT);
        grid[row][col] = '*';
    }

    if let Some(y_title) = spec.style.y_title {
        let _ = writeln!(text, "  {} ({:.1}..{:.1})", y_title, min_y, max_y);
    }
    for row in grid {
        let _ = writeln!(text, "  |{}", row.into_iter().collect::<String>());
    }
    let _ = writeln!(text, "  +{}", "-".repeat(SCATTER_WIDTH));
    if let Some(x_title) = spec.style.x_title {
        let _ = writeln!(text, "   {} ({:.1}..{:.1})", x_title, min_x, max_x);
    }
    text
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn scale(value: f64, min: f64, max: f64, cells: usize) -> usize {
    if max <= min {
        return 0;
    }
    let pos = ((value - min) / (max - min) * (cells - 1) as f64).round() as usize;
    pos.min(cells - 1)
}

/// Prints view updates as plain text.
pub struct ConsoleView<W: Write + Send> {
    out: W,
}

impl ConsoleView<std::io::Stdout> {
    /// Draw to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleView<W> {
    /// Draw to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Return the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!(error = %e, "Failed to write view update");
        }
    }
}

impl<W: Write + Send> ViewSurface for ConsoleView<W> {
    fn set_text(&mut self, field: &str, value: &str) {
        self.emit(&format!("{}: {}\n", field, value));
    }

    fn set_rows(&mut self, table: &str, rows: Vec<TableRow>) {
        let mut widths: Vec<usize> = TABLE_COLUMNS.iter().map(|c| c.len()).collect();
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.cells.iter().map(|c| truncate(c, MAX_CELL_WIDTH)).collect())
            .collect();
        for row in &cells {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let mut text = format!("\n[{}] {} rows\n", table, rows.len());
        let header: Vec<String> = TABLE_COLUMNS.iter().map(|c| c.to_string()).collect();
        push_row(&mut text, &header, &widths);
        for row in &cells {
            push_row(&mut text, row, &widths);
        }
        self.emit(&text);
    }

    fn set_html(&mut self, panel: &str, html: &str) {
        let mut text = format!("\n[{}]\n", panel);
        for line in strip_tags(html).lines().map(str::trim).filter(|l| !l.is_empty()) {
            let _ = writeln!(text, "  {}", line);
        }
        self.emit(&text);
    }
}

fn push_row(text: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{:<width$}", c, width = *w))
        .collect();
    let _ = writeln!(text, "  {}", line.join("  ").trim_end());
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let mut s: String = value.chars().take(max.saturating_sub(3)).collect();
        s.push_str("...");
        s
    }
}

/// Drop markup tags, keeping text content.
fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}
