//! Composition of the panel content and its on-screen position.

use std::fmt::Write;

use super::surface::Placement;
use crate::common::config::PopupPosition;
use crate::layout_engine::LayoutPlan;
use crate::model::Candidate;
use crate::sys::geometry::{Point, Rect, Size};

const ARROW: &str = "→";

/// Everything the surface needs to draw one panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelContent {
    pub column_width_px: u32,
    /// Row-major cells, each one an entry's markup fragment.
    pub rows: Vec<Vec<String>>,
    /// The already typed sequence, shown below the table.
    pub typed_sequence: Option<String>,
}

impl PanelContent {
    pub fn compose(plan: &LayoutPlan, typed_sequence: Option<&str>) -> Self {
        let rows = plan
            .rows()
            .into_iter()
            .map(|row| row.into_iter().map(str::to_owned).collect())
            .collect();
        Self {
            column_width_px: plan.column_width_px,
            rows,
            typed_sequence: typed_sequence.filter(|s| !s.is_empty()).map(str::to_owned),
        }
    }

    /// Renders the content as a single markup document: a fixed-width table plus an
    /// optional footer.
    pub fn markup(&self) -> String {
        let mut out = String::from("<html><body><table>");
        for row in &self.rows {
            out.push_str("<tr>");
            for cell in row {
                _ = write!(out, "<td width=\"{}\">{cell}</td>", self.column_width_px);
            }
            out.push_str("</tr>");
        }
        out.push_str("</table>");
        if let Some(typed) = &self.typed_sequence {
            _ = write!(out, "<hr><p>{}</p>", escape_markup(typed));
        }
        out.push_str("</body></html>");
        out
    }
}

/// Markup fragment for one entry. Prefix descriptions carry a leading `+` to mark
/// that the key opens further mappings.
pub fn render_entry(candidate: &Candidate) -> String {
    let marker = if candidate.entry.is_prefix { "+" } else { "" };
    format!(
        "<b>{}</b> {ARROW} {marker}{}",
        escape_markup(&candidate.label),
        escape_markup(&candidate.entry.description)
    )
}

pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Screen placement for a panel of `panel` size over a window content area.
pub fn placement(position: PopupPosition, bounds: Rect, panel: Size) -> Placement {
    match position {
        PopupPosition::Center => Placement::CenterInWindow,
        PopupPosition::Top => Placement::At(Point::new(bounds.centered_x(panel.width), bounds.min_y())),
        PopupPosition::Bottom => Placement::At(Point::new(
            bounds.centered_x(panel.width),
            bounds.max_y().saturating_sub_unsigned(panel.height),
        )),
    }
}
