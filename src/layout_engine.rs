//! Column layout for the hint panel.
//!
//! Entries are laid out column-major: the sorted list fills the first column top to
//! bottom, then the second, and so on. The widest entry decides how many columns fit,
//! and the columns then share the whole available width so they line up.

use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    /// Number of columns the width was divided into. Always at least 1.
    pub column_count: usize,
    /// Width of every column. Always at least 1.
    pub column_width_px: u32,
    /// Column-major groups of rendered entries. May hold fewer groups than
    /// `column_count` when the last columns would be empty.
    pub columns: Vec<Vec<String>>,
}

impl LayoutPlan {
    pub fn elements_per_column(&self) -> usize { self.columns.first().map_or(0, Vec::len) }

    pub fn len(&self) -> usize { self.columns.iter().map(Vec::len).sum() }

    pub fn is_empty(&self) -> bool { self.columns.is_empty() }

    /// Row-major traversal used for tabular rendering. Columns shorter than the
    /// first one simply contribute no cell to their trailing rows.
    pub fn rows(&self) -> Vec<Vec<&str>> {
        (0..self.elements_per_column())
            .map(|row| {
                self.columns
                    .iter()
                    .filter_map(|column| column.get(row).map(String::as_str))
                    .collect()
            })
            .collect()
    }
}

/// Computes the column layout for already sorted entries.
///
/// `measure` returns the rendered width of one entry in pixels. Degenerate inputs
/// (no width, zero-width entries, a single entry) still produce a valid plan.
pub fn layout(
    entries: Vec<String>,
    available_width_px: u32,
    measure: impl Fn(&str) -> u32,
) -> LayoutPlan {
    let count = entries.len();
    if count == 0 {
        return LayoutPlan {
            column_count: 1,
            column_width_px: available_width_px.max(1),
            columns: Vec::new(),
        };
    }

    let max_width = entries.iter().map(|e| measure(e)).max().unwrap_or(0).max(1);
    let raw_columns = (available_width_px / max_width) as usize;
    let column_count = raw_columns.clamp(1, count);
    let column_width_px = (available_width_px / column_count as u32).max(1);
    let per_column = count.div_ceil(column_count);

    trace!(count, max_width, column_count, column_width_px, per_column, "computed layout");

    let mut columns: Vec<Vec<String>> = Vec::with_capacity(column_count);
    let mut entries = entries.into_iter().peekable();
    while entries.peek().is_some() {
        columns.push(entries.by_ref().take(per_column).collect());
    }

    LayoutPlan { column_count, column_width_px, columns }
}
