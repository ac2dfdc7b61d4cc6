/// Distance in pixels kept between an edge-aligned popup and the monitor edge.
pub const EDGE_OFFSET: i32 = 12;

/// Fixed padding between the popup border and its text.
pub const FIXED_MARGIN: u32 = 12;

/// Core font every X server ships; used when the requested one is missing.
pub const FALLBACK_FONT: &str = "fixed";

/// Position of the popup along one axis of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Left or top edge.
    Start,
    #[default]
    Center,
    /// Right or bottom edge.
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MonitorSelector {
    /// The monitor under the mouse pointer.
    #[default]
    Pointer,
    /// The monitor with exactly this name, e.g. `HDMI-1`.
    Name(String),
}

/// How the padding around the text is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Margins {
    Fixed { horizontal: u32, vertical: u32 },
    /// Horizontal padding is the width of a tab, vertical padding half the
    /// text height.
    FontRelative,
}

impl Default for Margins {
    fn default() -> Self {
        Margins::Fixed {
            horizontal: FIXED_MARGIN,
            vertical: FIXED_MARGIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub horizontal: Align,
    pub vertical: Align,
    /// Core font name, XLFD pattern or alias.
    pub font: String,
    pub foreground: String,
    pub background: String,
    pub monitor: MonitorSelector,
    pub margins: Margins,
    /// Pointer button that closes the popup, if any.
    pub dismiss_button: Option<u8>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            horizontal: Align::Center,
            vertical: Align::Center,
            font: FALLBACK_FONT.to_owned(),
            foreground: "#000000".to_owned(),
            background: "#ffffff".to_owned(),
            monitor: MonitorSelector::Pointer,
            margins: Margins::default(),
            dismiss_button: None,
        }
    }
}
