//! Integer pixel geometry in screen coordinates (origin top-left, y grows down).

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self { Self { x, y } }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self { Self { width, height } }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self { Self { origin, size } }

    pub fn min_x(&self) -> i32 { self.origin.x }

    pub fn min_y(&self) -> i32 { self.origin.y }

    pub fn max_y(&self) -> i32 { self.origin.y.saturating_add_unsigned(self.size.height) }

    /// X coordinate that centers `width` horizontally inside this rect. Content
    /// wider than the rect is pinned to the left edge instead of spilling past it.
    pub fn centered_x(&self, width: u32) -> i32 {
        let slack = self.size.width.saturating_sub(width) / 2;
        self.origin.x.saturating_add_unsigned(slack)
    }
}
