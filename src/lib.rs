pub mod color;
pub mod config;
pub mod display;
pub mod event;
pub mod line;
pub mod monitor;
pub mod signal;
pub mod surface;
pub mod text;
pub mod wait;
pub mod x11;

#[cfg(test)]
mod testing;

pub use self::config::{Align, Config, Margins, MonitorSelector};
pub use self::event::{EventLoop, Layout, Termination};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to connect to the X server: {0}")]
    Connect(#[from] x11rb::errors::ConnectError),

    #[error("X11 connection: {0}")]
    Connection(#[from] x11rb::errors::ConnectionError),

    #[error("X11 request failed: {0}")]
    Reply(#[from] x11rb::errors::ReplyError),

    #[error("ran out of X11 resource ids")]
    IdsExhausted,

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to detect monitors: {0}")]
    MonitorQuery(&'static str),

    #[error("failed to find active monitor")]
    NoMonitorMatch,

    #[error("failed to load font {0:?}")]
    FontUnavailable(String),

    #[error("failed to allocate color {0:?}")]
    ColorUnavailable(String),

    #[error("error while reading input data: {0}")]
    InputRead(#[source] std::io::Error),

    #[error("failed to set interruption handler: {0}")]
    SignalSetup(#[source] std::io::Error),
}

impl From<x11rb::errors::ReplyOrIdError> for Error {
    fn from(err: x11rb::errors::ReplyOrIdError) -> Self {
        match err {
            x11rb::errors::ReplyOrIdError::IdsExhausted => Self::IdsExhausted,
            x11rb::errors::ReplyOrIdError::ConnectionError(err) => Self::Connection(err),
            x11rb::errors::ReplyOrIdError::X11Error(err) => {
                Self::Reply(x11rb::errors::ReplyError::X11Error(err))
            }
        }
    }
}
