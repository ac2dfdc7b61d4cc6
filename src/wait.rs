//! The blocking wait on input, display and shutdown-signal readiness.

use crate::Error;
use mio::unix::SourceFd;
use mio::{Events, Interest, Poll, Token};
use signal_hook_mio::v1_0::Signals;
use std::io;
use std::os::unix::io::RawFd;
use std::time::Duration;

const INPUT: Token = Token(0);
const DISPLAY: Token = Token(1);
const SIGNALS: Token = Token(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputReadiness {
    #[default]
    Idle,
    /// Data can be read without blocking.
    Readable,
    /// The writer closed the stream and nothing is left to read.
    HangUp,
}

/// What woke the wait. All fields clear means the wait was interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Readiness {
    /// A shutdown signal arrived. Checked before anything else.
    pub signal: bool,
    pub input: InputReadiness,
    pub display: bool,
}

pub trait Poller {
    /// Waits until a source is ready, or only checks when `block` is false.
    fn wait(&mut self, block: bool) -> Result<Readiness, Error>;
}

/// A `mio::Poll` over the input, the display connection and, when given,
/// the shutdown signals.
pub struct FdPoller {
    poll: Poll,
    events: Events,
    input: RawFd,
    display: RawFd,
    /// Regular files cannot be registered and never block.
    input_always_ready: bool,
    signals: Option<Signals>,
}

impl FdPoller {
    pub fn new(input: RawFd, display: RawFd, mut signals: Option<Signals>) -> Result<Self, Error> {
        let poll = Poll::new()?;
        let registry = poll.registry();
        let input_always_ready =
            match registry.register(&mut SourceFd(&input), INPUT, Interest::READABLE) {
                Ok(()) => false,
                Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                    log::debug!("input cannot be polled, treating it as always readable");
                    true
                }
                Err(err) => return Err(err.into()),
            };
        registry.register(&mut SourceFd(&display), DISPLAY, Interest::READABLE)?;
        if let Some(signals) = signals.as_mut() {
            registry.register(signals, SIGNALS, Interest::READABLE)?;
        }
        Ok(Self {
            poll,
            events: Events::with_capacity(8),
            input,
            display,
            input_always_ready,
            signals,
        })
    }
}

impl Poller for FdPoller {
    fn wait(&mut self, block: bool) -> Result<Readiness, Error> {
        // Registrations are edge-triggered. Re-arming reports data left over
        // from a partial read again.
        let registry = self.poll.registry();
        if !self.input_always_ready {
            registry.reregister(&mut SourceFd(&self.input), INPUT, Interest::READABLE)?;
        }
        registry.reregister(&mut SourceFd(&self.display), DISPLAY, Interest::READABLE)?;

        let mut ready = Readiness::default();
        let timeout = if self.input_always_ready {
            ready.input = InputReadiness::Readable;
            Some(Duration::ZERO)
        } else if block {
            None
        } else {
            Some(Duration::ZERO)
        };

        if let Err(err) = self.poll.poll(&mut self.events, timeout) {
            if err.kind() == io::ErrorKind::Interrupted {
                log::trace!("wait interrupted by signal");
                return Ok(ready);
            }
            return Err(Error::Io(err));
        }

        for event in self.events.iter() {
            match event.token() {
                SIGNALS => {
                    if let Some(signals) = self.signals.as_mut() {
                        for signal in signals.pending() {
                            log::debug!("received signal {}", signal);
                        }
                    }
                    ready.signal = true;
                }
                INPUT => {
                    ready.input = input_readiness(
                        event.is_readable(),
                        event.is_read_closed() || event.is_error(),
                    );
                }
                // A broken connection is reported by the next event read.
                DISPLAY => {
                    ready.display |=
                        event.is_readable() || event.is_read_closed() || event.is_error();
                }
                _ => {}
            }
        }
        Ok(ready)
    }
}

/// Pending data wins over a hang-up so the last bytes still get read.
fn input_readiness(readable: bool, closed: bool) -> InputReadiness {
    if readable {
        InputReadiness::Readable
    } else if closed {
        InputReadiness::HangUp
    } else {
        InputReadiness::Idle
    }
}
