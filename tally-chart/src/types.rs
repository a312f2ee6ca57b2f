/// Default surface width in pixels (10in at 100dpi).
pub const WIDTH: i32 = 1000;
/// Default surface height in pixels (4in at 100dpi).
pub const HEIGHT: i32 = 400;

/// Margins between the surface edge and the plot area, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
}

impl Default for Insets {
    fn default() -> Self {
        // room for the title above and time labels plus axis label below
        Self::new(84, 28, 44, 60)
    }
}
