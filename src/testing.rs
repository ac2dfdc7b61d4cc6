//! In-memory stand-ins for the display server.

use crate::display::{Display, DisplayEvent};
use crate::monitor::{Monitor, MonitorSource, Point, Rect};
use crate::text::Extents;
use crate::wait::{Poller, Readiness};
use crate::Error;
use std::cell::Cell;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

static RAISING: Mutex<()> = Mutex::new(());

/// Held by tests that raise real signals. Every installed handler sees every
/// raise, so those tests must not overlap.
pub fn raising_signals() -> MutexGuard<'static, ()> {
    RAISING.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Place(Rect),
    Map,
    DrawText(Vec<u8>, Point),
    Flush,
}

/// Records every request; measures 8px per byte with a 10+4 font.
#[derive(Debug, Default)]
pub struct FakeDisplay {
    pub calls: Vec<Call>,
    pub events: VecDeque<DisplayEvent>,
}

impl Display for FakeDisplay {
    fn measure(&mut self, text: &[u8]) -> Result<Extents, Error> {
        Ok(Extents {
            width: 8 * text.len() as u32,
            ascent: 10,
            descent: 4,
        })
    }

    fn place(&mut self, rect: Rect) -> Result<(), Error> {
        self.calls.push(Call::Place(rect));
        Ok(())
    }

    fn map(&mut self) -> Result<(), Error> {
        self.calls.push(Call::Map);
        Ok(())
    }

    fn draw_text(&mut self, text: &[u8], origin: Point) -> Result<(), Error> {
        self.calls.push(Call::DrawText(text.to_vec(), origin));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.calls.push(Call::Flush);
        Ok(())
    }

    fn has_queued_events(&mut self) -> Result<bool, Error> {
        Ok(!self.events.is_empty())
    }

    fn poll_event(&mut self) -> Result<Option<DisplayEvent>, Error> {
        Ok(self.events.pop_front())
    }
}

pub struct FakeMonitors {
    monitors: Vec<Monitor>,
    pointer: Option<Point>,
    pointer_queries: Cell<usize>,
}

impl FakeMonitors {
    pub fn new(monitors: Vec<Monitor>, pointer: Option<Point>) -> Self {
        Self {
            monitors,
            pointer,
            pointer_queries: Cell::new(0),
        }
    }

    pub fn pointer_queries(&self) -> usize {
        self.pointer_queries.get()
    }
}

impl MonitorSource for FakeMonitors {
    fn monitors(&self) -> Result<Vec<Monitor>, Error> {
        Ok(self.monitors.clone())
    }

    fn pointer(&self) -> Result<Option<Point>, Error> {
        self.pointer_queries.set(self.pointer_queries.get() + 1);
        Ok(self.pointer)
    }
}

/// Replays a fixed list of wake-ups and panics if asked for more.
pub struct ScriptedPoller<'a> {
    script: VecDeque<Readiness>,
    blocking: Vec<bool>,
    signal: Option<&'a AtomicBool>,
}

impl<'a> ScriptedPoller<'a> {
    pub fn new(script: Vec<Readiness>) -> Self {
        Self {
            script: script.into(),
            blocking: Vec::new(),
            signal: None,
        }
    }

    /// Sets `flag` during every wait, like a signal arriving mid-wait.
    pub fn raising(mut self, flag: &'a AtomicBool) -> Self {
        self.signal = Some(flag);
        self
    }

    pub fn waits(&self) -> usize {
        self.blocking.len()
    }

    /// The `block` argument of each wait so far.
    pub fn blocking(&self) -> Vec<bool> {
        self.blocking.clone()
    }

    pub fn is_exhausted(&self) -> bool {
        self.script.is_empty()
    }
}

impl Poller for ScriptedPoller<'_> {
    fn wait(&mut self, block: bool) -> Result<Readiness, Error> {
        self.blocking.push(block);
        if let Some(flag) = self.signal {
            flag.store(true, Ordering::SeqCst);
        }
        Ok(self.script.pop_front().expect("unexpected wait"))
    }
}
