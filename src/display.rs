use crate::monitor::{Point, Rect};
use crate::text::Extents;
use crate::Error;

/// Display-server events the popup reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    /// Part of the surface needs repainting. `count` is the number of
    /// exposures still queued behind this one.
    Expose { count: u16 },
    ButtonPress { button: u8 },
    Other,
}

/// The popup surface together with its font and colors.
pub trait Display {
    fn measure(&mut self, text: &[u8]) -> Result<Extents, Error>;

    /// Moves and resizes the surface in one request and raises it.
    fn place(&mut self, rect: Rect) -> Result<(), Error>;

    fn map(&mut self) -> Result<(), Error>;

    /// Clears the surface and draws `text` with its baseline starting at
    /// `origin`.
    fn draw_text(&mut self, text: &[u8], origin: Point) -> Result<(), Error>;

    fn flush(&mut self) -> Result<(), Error>;

    /// Whether events are already buffered client-side, so waiting on the
    /// connection would not report them.
    fn has_queued_events(&mut self) -> Result<bool, Error>;

    /// Next event without blocking.
    fn poll_event(&mut self) -> Result<Option<DisplayEvent>, Error>;
}
