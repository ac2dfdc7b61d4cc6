//! The popup's event loop.
//!
//! Each iteration waits for the input stream, the display connection or a
//! shutdown signal, folds whatever woke it into at most one redraw, and stops
//! as soon as a termination condition is seen. A signal is handled before any
//! input is read, and a termination found in an iteration always wins over a
//! redraw requested earlier in the same iteration.

use crate::config::{Align, Config, Margins, EDGE_OFFSET};
use crate::display::{Display, DisplayEvent};
use crate::line::{DisplayLine, ReadLine};
use crate::monitor::Rect;
use crate::surface;
use crate::text::{Frame, Padding};
use crate::wait::{InputReadiness, Poller, Readiness};
use crate::Error;
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};

/// Why the loop stopped. None of these are failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    EndOfInput,
    Signal,
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Waiting,
    ProcessingInput,
    ProcessingDisplayEvent,
    RedrawPending,
    Terminated(Termination),
    /// Stopped by an input read error.
    Failed,
}

/// What a single display event asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reaction {
    Redraw,
    Dismiss,
    Ignore,
}

/// Placement parameters that stay fixed for the popup's lifetime.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub monitor: Rect,
    pub horizontal: Align,
    pub vertical: Align,
    pub margins: Margins,
    pub offset: i32,
}

impl Layout {
    pub fn new(config: &Config, monitor: Rect) -> Self {
        Self {
            monitor,
            horizontal: config.horizontal,
            vertical: config.vertical,
            margins: config.margins,
            offset: EDGE_OFFSET,
        }
    }
}

pub struct EventLoop<D, R> {
    display: D,
    input: R,
    line: DisplayLine,
    layout: Layout,
    dismiss_button: Option<u8>,
    mapped: bool,
    state: State,
}

impl<D: Display, R: Read> EventLoop<D, R> {
    pub fn new(display: D, input: R, layout: Layout, dismiss_button: Option<u8>) -> Self {
        Self {
            display,
            input,
            line: DisplayLine::new(),
            layout,
            dismiss_button,
            mapped: false,
            state: State::Waiting,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Runs until a termination condition.
    ///
    /// `shutdown` is checked before every wait and again after it, so a
    /// signal that lands while the wait is busy with input still stops the
    /// loop before that input is drawn.
    pub fn run<P: Poller>(
        &mut self,
        poller: &mut P,
        shutdown: &AtomicBool,
    ) -> Result<Termination, Error> {
        loop {
            if shutdown.load(Ordering::SeqCst) {
                return Ok(self.terminate(Termination::Signal));
            }
            let queued = self.display.has_queued_events()?;
            let mut ready = poller.wait(!queued)?;
            ready.display |= queued;
            ready.signal |= shutdown.load(Ordering::SeqCst);
            if let Some(termination) = self.step(ready)? {
                return Ok(termination);
            }
        }
    }

    /// Handles one wake-up.
    pub fn step(&mut self, ready: Readiness) -> Result<Option<Termination>, Error> {
        if ready.signal {
            return Ok(Some(self.terminate(Termination::Signal)));
        }
        let mut redraw = false;

        match ready.input {
            InputReadiness::HangUp => return Ok(Some(self.terminate(Termination::EndOfInput))),
            InputReadiness::Readable => {
                self.transition(State::ProcessingInput);
                match self.line.read_from(&mut self.input) {
                    Ok(ReadLine::EndOfInput) => {
                        return Ok(Some(self.terminate(Termination::EndOfInput)));
                    }
                    Ok(ReadLine::Updated) => {
                        log::trace!("new line {:?}", self.line);
                        redraw = true;
                    }
                    Err(err) => {
                        log::debug!("input read failed: {}", err);
                        self.transition(State::Failed);
                        return Err(Error::InputRead(err));
                    }
                }
            }
            InputReadiness::Idle => {}
        }

        if ready.display {
            self.transition(State::ProcessingDisplayEvent);
            while let Some(event) = self.display.poll_event()? {
                match self.react(event) {
                    Reaction::Redraw => redraw = true,
                    Reaction::Dismiss => return Ok(Some(self.terminate(Termination::Dismissed))),
                    Reaction::Ignore => {}
                }
            }
        }

        if redraw {
            self.transition(State::RedrawPending);
            self.redraw()?;
        }
        self.transition(State::Waiting);
        Ok(None)
    }

    fn react(&self, event: DisplayEvent) -> Reaction {
        match event {
            DisplayEvent::Expose { count: 0 } => Reaction::Redraw,
            DisplayEvent::Expose { .. } => Reaction::Ignore,
            DisplayEvent::ButtonPress { button } if Some(button) == self.dismiss_button => {
                Reaction::Dismiss
            }
            DisplayEvent::ButtonPress { .. } | DisplayEvent::Other => Reaction::Ignore,
        }
    }

    fn redraw(&mut self) -> Result<(), Error> {
        let text = self.line.as_bytes();
        let extents = self.display.measure(text)?;
        let tab = match self.layout.margins {
            Margins::FontRelative => self.display.measure(b"\t")?,
            Margins::Fixed { .. } => Default::default(),
        };
        let frame = Frame::new(extents, Padding::resolve(self.layout.margins, extents, tab));
        let rect = surface::place(
            self.layout.monitor,
            frame.width,
            frame.height,
            self.layout.horizontal,
            self.layout.vertical,
            self.layout.offset,
        );
        log::trace!("redraw at {:?}", rect);

        self.display.place(rect)?;
        if !self.mapped {
            self.display.map()?;
            self.mapped = true;
        }
        self.display.draw_text(text, frame.baseline)?;
        self.display.flush()
    }

    fn terminate(&mut self, termination: Termination) -> Termination {
        self.transition(State::Terminated(termination));
        termination
    }

    fn transition(&mut self, state: State) {
        if self.state != state {
            log::trace!("{:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }
}
