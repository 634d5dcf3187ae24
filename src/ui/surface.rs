//! Narrow interfaces to the host that owns the window and draws the panel.

use super::panel::PanelContent;
use crate::sys::geometry::{Point, Rect, Size};

/// The window whose key input the panel describes.
pub trait HostWindow: Send + Sync {
    /// Content area of the window, in screen coordinates.
    fn content_bounds(&self) -> Rect;

    fn width(&self) -> u32 { self.content_bounds().size.width }
}

/// Where a panel should appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Let the surface center the panel in the host window.
    CenterInWindow,
    /// Top-left corner of the panel, in screen coordinates.
    At(Point),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowOptions {
    /// Close the panel when the user clicks anywhere outside it.
    pub cancel_on_click_outside: bool,
}

/// Invoked by the surface when it closes a panel on its own, e.g. after an outside
/// click. Surfaces must not invoke it from within [`RenderingSurface::show`].
pub type AutoClose = Box<dyn FnOnce() + Send + 'static>;

pub trait PanelHandle: Send {
    /// Closes the panel. Closing an already closed panel does nothing.
    fn close(&self);
}

/// The drawing side of the host.
pub trait RenderingSurface: Send + Sync {
    /// Rendered width of a single markup fragment, in pixels.
    fn measure_width(&self, fragment: &str) -> u32;

    /// Size the panel will have once `content` is rendered into it.
    fn panel_size(&self, content: &PanelContent) -> Size;

    fn show(
        &self,
        host: &dyn HostWindow,
        content: &PanelContent,
        placement: Placement,
        options: ShowOptions,
        on_auto_close: AutoClose,
    ) -> Box<dyn PanelHandle>;
}
