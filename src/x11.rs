//! X11 backend built on `x11rb`.
//!
//! Every server-side resource is wrapped in a [`Resource`] that frees it on
//! drop. [`X11Display`] declares them so the window goes first, then the
//! graphics context and colors, then the font; [`Connection`] outlives all of
//! them and flushes the releases before the socket closes.

use crate::color::ColorSpec;
use crate::config::{Config, FALLBACK_FONT};
use crate::display::{Display, DisplayEvent};
use crate::monitor::{Monitor, MonitorSource, Point, Rect};
use crate::text::Extents;
use crate::Error;
use std::collections::VecDeque;
use std::os::unix::io::{AsRawFd, RawFd};
use x11rb::connection::{Connection as _, RequestConnection as _};
use x11rb::errors::ReplyError;
use x11rb::protocol::randr::{self, ConnectionExt as _};
use x11rb::protocol::xproto::{
    Char2b, Colormap, ConfigureWindowAux, ConnectionExt as _, CreateGCAux, CreateWindowAux,
    EventMask, Screen, StackMode, WindowClass,
};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;

/// Characters per text item of a `PolyText16` request.
const MAX_ITEM_LEN: usize = 254;

pub struct Connection {
    conn: RustConnection,
    screen: usize,
}

impl Connection {
    /// Connects to the server named by `$DISPLAY`.
    pub fn connect() -> Result<Self, Error> {
        let (conn, screen) = x11rb::connect(None)?;
        log::debug!("connected to X server, screen {}", screen);
        Ok(Self { conn, screen })
    }

    fn screen(&self) -> &Screen {
        &self.conn.setup().roots[self.screen]
    }

    /// Loads the font and colors, then creates the popup window unmapped.
    ///
    /// A failure releases whatever was acquired so far.
    pub fn open_popup(&self, config: &Config) -> Result<X11Display<'_>, Error> {
        let conn = &self.conn;
        let screen = self.screen();

        let font = self.open_font_or_fallback(&config.font)?;
        let foreground = self.alloc_color(&config.foreground)?;
        let background = self.alloc_color(&config.background)?;

        let id = conn.generate_id()?;
        conn.create_gc(
            id,
            screen.root,
            &CreateGCAux::new()
                .foreground(foreground.id)
                .font(font.id)
                .graphics_exposures(0u32),
        )?;
        let gc = Resource::new(conn, Kind::Gc, id);

        let events = if config.dismiss_button.is_some() {
            EventMask::EXPOSURE | EventMask::BUTTON_PRESS
        } else {
            EventMask::EXPOSURE
        };
        let id = conn.generate_id()?;
        conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            id,
            screen.root,
            0,
            0,
            1,
            1,
            0,
            WindowClass::INPUT_OUTPUT,
            x11rb::COPY_FROM_PARENT,
            &CreateWindowAux::new()
                .override_redirect(1u32)
                .background_pixel(background.id)
                .event_mask(events),
        )?;
        let window = Resource::new(conn, Kind::Window, id);
        conn.flush()?;

        Ok(X11Display {
            window,
            gc,
            _background: background,
            _foreground: foreground,
            font,
            conn,
            queued: VecDeque::new(),
        })
    }

    fn open_font_or_fallback(&self, name: &str) -> Result<Resource<'_>, Error> {
        match (self.open_font(name), fallback_font(name)) {
            (Err(Error::FontUnavailable(_)), Some(fallback)) => {
                log::warn!(
                    "core font {:?} not found, using {:?} (see xlsfonts for available names)",
                    name,
                    fallback
                );
                self.open_font(fallback)
            }
            (opened, _) => opened,
        }
    }

    fn open_font(&self, name: &str) -> Result<Resource<'_>, Error> {
        let id = self.conn.generate_id()?;
        let opened = self.conn.open_font(id, name.as_bytes())?.check();
        x11_error_or(opened, || Error::FontUnavailable(name.to_owned()))?;
        Ok(Resource::new(&self.conn, Kind::Font, id))
    }

    fn alloc_color(&self, descr: &str) -> Result<Resource<'_>, Error> {
        let colormap = self.screen().default_colormap;
        let pixel = match ColorSpec::parse(descr) {
            Some(ColorSpec::Rgb { red, green, blue }) => self
                .conn
                .alloc_color(colormap, red, green, blue)?
                .reply()
                .map(|reply| reply.pixel),
            Some(ColorSpec::Named(name)) => self
                .conn
                .alloc_named_color(colormap, name.as_bytes())?
                .reply()
                .map(|reply| reply.pixel),
            None => return Err(Error::ColorUnavailable(descr.to_owned())),
        };
        let pixel = x11_error_or(pixel, || Error::ColorUnavailable(descr.to_owned()))?;
        Ok(Resource::new(&self.conn, Kind::Color(colormap), pixel))
    }
}

impl MonitorSource for Connection {
    fn monitors(&self) -> Result<Vec<Monitor>, Error> {
        if self
            .conn
            .extension_information(randr::X11_EXTENSION_NAME)?
            .is_none()
        {
            return Err(Error::MonitorQuery("RandR extension is not available"));
        }
        let version = self.conn.randr_query_version(1, 5)?.reply()?;
        if (version.major_version, version.minor_version) < (1, 5) {
            return Err(Error::MonitorQuery("RandR 1.5 is required"));
        }

        let reply = self
            .conn
            .randr_get_monitors(self.screen().root, true)?
            .reply()?;
        reply
            .monitors
            .iter()
            .map(|info| -> Result<Monitor, Error> {
                let name = if info.name == x11rb::NONE {
                    None
                } else {
                    let atom = self.conn.get_atom_name(info.name)?.reply()?;
                    Some(String::from_utf8_lossy(&atom.name).into_owned())
                };
                Ok(Monitor {
                    name,
                    rect: Rect {
                        x: info.x.into(),
                        y: info.y.into(),
                        width: info.width.into(),
                        height: info.height.into(),
                    },
                })
            })
            .collect()
    }

    fn pointer(&self) -> Result<Option<Point>, Error> {
        let reply = self.conn.query_pointer(self.screen().root)?.reply()?;
        Ok(reply.same_screen.then(|| Point {
            x: reply.root_x.into(),
            y: reply.root_y.into(),
        }))
    }
}

impl AsRawFd for Connection {
    fn as_raw_fd(&self) -> RawFd {
        self.conn.stream().as_raw_fd()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Err(err) = self.conn.flush() {
            log::warn!("failed to flush X11 connection: {}", err);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Window,
    Gc,
    Font,
    Color(Colormap),
}

/// A server-side resource freed when dropped.
struct Resource<'c> {
    conn: &'c RustConnection,
    kind: Kind,
    id: u32,
}

impl<'c> Resource<'c> {
    fn new(conn: &'c RustConnection, kind: Kind, id: u32) -> Self {
        log::trace!("acquired {:?} {:#x}", kind, id);
        Self { conn, kind, id }
    }
}

impl Drop for Resource<'_> {
    fn drop(&mut self) {
        let released = match self.kind {
            Kind::Window => self.conn.destroy_window(self.id).map(drop),
            Kind::Gc => self.conn.free_gc(self.id).map(drop),
            Kind::Font => self.conn.close_font(self.id).map(drop),
            Kind::Color(colormap) => self.conn.free_colors(colormap, 0, &[self.id]).map(drop),
        };
        match released {
            Ok(()) => log::trace!("released {:?} {:#x}", self.kind, self.id),
            Err(err) => log::warn!("failed to release {:?} {:#x}: {}", self.kind, self.id, err),
        }
    }
}

/// The popup window with its font and colors.
pub struct X11Display<'c> {
    window: Resource<'c>,
    gc: Resource<'c>,
    _background: Resource<'c>,
    _foreground: Resource<'c>,
    font: Resource<'c>,
    conn: &'c RustConnection,
    queued: VecDeque<DisplayEvent>,
}

impl X11Display<'_> {
    fn next_event(&mut self) -> Result<Option<DisplayEvent>, Error> {
        let event = match self.conn.poll_for_event()? {
            Some(event) => event,
            None => return Ok(None),
        };
        log::trace!("received {:?}", event);
        Ok(Some(match event {
            Event::Expose(expose) => DisplayEvent::Expose {
                count: expose.count,
            },
            Event::ButtonPress(press) => DisplayEvent::ButtonPress {
                button: press.detail,
            },
            Event::Error(err) => {
                log::warn!("X11 error: {:?}", err);
                DisplayEvent::Other
            }
            _ => DisplayEvent::Other,
        }))
    }
}

impl Display for X11Display<'_> {
    fn measure(&mut self, text: &[u8]) -> Result<Extents, Error> {
        let reply = self
            .conn
            .query_text_extents(self.font.id, &to_char2b(text))?
            .reply()?;
        Ok(Extents {
            width: reply.overall_width.max(0) as u32,
            ascent: reply.font_ascent.max(0) as u32,
            descent: reply.font_descent.max(0) as u32,
        })
    }

    fn place(&mut self, rect: Rect) -> Result<(), Error> {
        log::trace!("configure {:#x} to {:?}", self.window.id, rect);
        self.conn.configure_window(
            self.window.id,
            &ConfigureWindowAux::new()
                .x(rect.x)
                .y(rect.y)
                .width(rect.width.max(1))
                .height(rect.height.max(1))
                .stack_mode(StackMode::ABOVE),
        )?;
        Ok(())
    }

    fn map(&mut self) -> Result<(), Error> {
        self.conn.map_window(self.window.id)?;
        Ok(())
    }

    fn draw_text(&mut self, text: &[u8], origin: Point) -> Result<(), Error> {
        self.conn.clear_area(false, self.window.id, 0, 0, 0, 0)?;
        let items = text_items(&to_char2b(text));
        if !items.is_empty() {
            self.conn.poly_text16(
                self.window.id,
                self.gc.id,
                origin.x as i16,
                origin.y as i16,
                &items,
            )?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.conn.flush()?;
        Ok(())
    }

    fn has_queued_events(&mut self) -> Result<bool, Error> {
        if self.queued.is_empty() {
            if let Some(event) = self.next_event()? {
                self.queued.push_back(event);
            }
        }
        Ok(!self.queued.is_empty())
    }

    fn poll_event(&mut self) -> Result<Option<DisplayEvent>, Error> {
        match self.queued.pop_front() {
            Some(event) => Ok(Some(event)),
            None => self.next_event(),
        }
    }
}

/// Maps an `X11Error` reply to `err`, keeping connection failures as they are.
fn x11_error_or<T>(result: Result<T, ReplyError>, err: impl FnOnce() -> Error) -> Result<T, Error> {
    match result {
        Ok(value) => Ok(value),
        Err(ReplyError::X11Error(x11)) => {
            log::debug!("request failed: {:?}", x11);
            Err(err())
        }
        Err(ReplyError::ConnectionError(conn)) => Err(conn.into()),
    }
}

/// The font to try when `name` cannot be opened. X font names are
/// case-insensitive, so `FIXED` gets no second attempt.
fn fallback_font(name: &str) -> Option<&'static str> {
    (!name.eq_ignore_ascii_case(FALLBACK_FONT)).then_some(FALLBACK_FONT)
}

/// Decodes UTF-8 (lossily) into 16-bit font indices. Characters outside the
/// basic multilingual plane become U+FFFD.
fn to_char2b(text: &[u8]) -> Vec<Char2b> {
    String::from_utf8_lossy(text)
        .chars()
        .map(|c| {
            let [byte1, byte2] = u16::try_from(u32::from(c))
                .unwrap_or(0xfffd)
                .to_be_bytes();
            Char2b { byte1, byte2 }
        })
        .collect()
}

/// Encodes `PolyText16` items: a length byte, a zero x-delta, then the
/// characters, split so no item exceeds [`MAX_ITEM_LEN`].
fn text_items(chars: &[Char2b]) -> Vec<u8> {
    let mut items = Vec::with_capacity(chars.len() * 2 + 2 * (chars.len() / MAX_ITEM_LEN + 1));
    for chunk in chars.chunks(MAX_ITEM_LEN) {
        items.push(chunk.len() as u8);
        items.push(0);
        for c in chunk {
            items.push(c.byte1);
            items.push(c.byte2);
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_and_unicode_to_char2b() {
        let chars = to_char2b("aé€".as_bytes());
        let codes: Vec<[u8; 2]> = chars.iter().map(|c| [c.byte1, c.byte2]).collect();
        assert_eq!(codes, vec![[0x00, 0x61], [0x00, 0xe9], [0x20, 0xac]]);
    }

    #[test]
    fn astral_and_invalid_become_replacement() {
        let mut text = "🙂".as_bytes().to_vec();
        text.push(0xff);
        let chars = to_char2b(&text);
        assert_eq!(chars.len(), 2);
        assert!(chars.iter().all(|c| (c.byte1, c.byte2) == (0xff, 0xfd)));
    }

    #[test]
    fn text_items_are_split() {
        let chars = to_char2b(&[b'x'; 300]);
        let items = text_items(&chars);
        assert_eq!(items.len(), 2 + 2 * 254 + 2 + 2 * 46);
        assert_eq!(&items[..4], &[254, 0, 0, b'x']);
        assert_eq!(&items[2 + 2 * 254..2 + 2 * 254 + 2], &[46, 0]);
    }

    #[test]
    fn empty_text_has_no_items() {
        assert!(text_items(&[]).is_empty());
    }

    #[test]
    fn missing_font_falls_back_to_fixed() {
        assert_eq!(fallback_font("monospace"), Some("fixed"));
        assert_eq!(fallback_font("-*-terminus-*-*-*-*-16-*-*-*-*-*-*-*"), Some("fixed"));
        assert_eq!(fallback_font("fixed"), None);
        assert_eq!(fallback_font("FIXED"), None);
    }
}
