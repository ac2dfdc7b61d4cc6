//! SIGINT and SIGTERM become a shutdown flag and a pollable source.
//!
//! The handlers registered here only set an atomic flag. `signal-hook-mio`
//! adds a self-pipe so a signal also wakes the event loop's wait, even when
//! input is ready at the same time.

use crate::Error;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_mio::v1_0::Signals;
use std::os::raw::c_int;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub const SHUTDOWN_SIGNALS: [c_int; 2] = [SIGINT, SIGTERM];

/// Installed shutdown handlers.
pub struct Shutdown {
    /// Set from the signal handler.
    pub flag: Arc<AtomicBool>,
    /// Readable whenever a shutdown signal arrived; registered with the wait.
    pub signals: Signals,
}

pub fn install() -> Result<Shutdown, Error> {
    let flag = Arc::new(AtomicBool::new(false));
    for signal in SHUTDOWN_SIGNALS {
        signal_hook::flag::register(signal, Arc::clone(&flag)).map_err(Error::SignalSetup)?;
    }
    let signals = Signals::new(SHUTDOWN_SIGNALS).map_err(Error::SignalSetup)?;
    log::trace!("shutdown handlers installed for {:?}", SHUTDOWN_SIGNALS);
    Ok(Shutdown { flag, signals })
}
