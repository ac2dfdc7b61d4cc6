//! Reads standard input and shows its latest first line in a borderless
//! popup, until the input closes or the process is told to stop.

mod cli;

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::stdin;
use std::os::unix::io::{AsFd, AsRawFd};
use umess::monitor;
use umess::signal::{self, Shutdown};
use umess::wait::FdPoller;
use umess::x11::Connection;
use umess::{EventLoop, Layout};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = cli::Args::parse().into_config();

    let Shutdown { flag, signals } =
        signal::install().context("failed to install signal handlers")?;
    let conn = Connection::connect().context("failed to connect to the X server")?;
    let area = monitor::locate(&conn, &config.monitor).context("failed to find a monitor")?;
    let display = conn.open_popup(&config).context("failed to open the popup")?;

    // Reads go straight to the descriptor so nothing sits in a buffer that
    // the wait cannot see.
    let input = stdin()
        .as_fd()
        .try_clone_to_owned()
        .context("failed to open standard input")?;
    let input = File::from(input);

    let mut poller = FdPoller::new(input.as_raw_fd(), conn.as_raw_fd(), Some(signals))
        .context("failed to watch standard input and the X connection")?;
    let mut popup = EventLoop::new(
        display,
        input,
        Layout::new(&config, area),
        config.dismiss_button,
    );
    let termination = popup.run(&mut poller, &flag)?;
    log::debug!("stopped: {:?}", termination);
    Ok(())
}
