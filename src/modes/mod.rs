pub mod raw_in;
pub mod raw_out;
pub mod sbs;
pub mod session;

use crate::error::ProbeError;
use crate::frame::RawFrame;
use crate::journal::Journal;
use crate::sleeper::Sleeper;
use crate::sock::LinkWrapper;
use session::Outcome;
use std::fmt;
use std::io;
use std::str::FromStr;
use std::time::Duration;

pub trait Command {
    fn execute(&mut self) -> Result<Outcome, ProbeError>;
}

/// Transfer mode, one per Dump1090 port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    RawOut,
    RawIn,
    Sbs,
}

impl Mode {
    pub fn default_port(self) -> u16 {
        match self {
            Mode::RawOut => 30001,
            Mode::RawIn => 30002,
            Mode::Sbs => 30003,
        }
    }

    pub fn default_interval(self) -> Duration {
        match self {
            Mode::RawOut => Duration::from_secs(1),
            Mode::RawIn | Mode::Sbs => Duration::from_millis(10),
        }
    }

    /// Final counter line written when the session ends.
    pub fn summary(self, data_len: u64) -> String {
        match self {
            Mode::RawOut => format!("Sent {data_len} bytes"),
            Mode::RawIn | Mode::Sbs => format!("Received {data_len} bytes"),
        }
    }

    /// Picks the loop body once; `frame` is only used by RAW-OUT.
    pub fn handler(self, frame: RawFrame) -> Box<dyn ModeLoop> {
        match self {
            Mode::RawOut => Box::new(raw_out::RawOutLoop::new(frame)),
            Mode::RawIn => Box::new(raw_in::RawInLoop),
            Mode::Sbs => Box::new(sbs::SbsLoop),
        }
    }
}

impl FromStr for Mode {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RAW-OUT" => Ok(Mode::RawOut),
            "RAW-IN" => Ok(Mode::RawIn),
            "SBS" => Ok(Mode::Sbs),
            _ => Err(ProbeError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::RawOut => "RAW-OUT",
            Mode::RawIn => "RAW-IN",
            Mode::Sbs => "SBS",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Quit,
}

/// Session state a loop iteration may touch.
pub struct LoopCtx<'s> {
    pub journal: &'s mut Journal,
    pub sleeper: &'s dyn Sleeper,
    pub interval: Duration,
    pub data_len: &'s mut u64,
}

impl LoopCtx<'_> {
    pub fn count(&mut self, bytes: usize) {
        *self.data_len += bytes as u64;
    }

    pub fn pause(&self) {
        self.sleeper.sleep(self.interval);
    }
}

/// One iteration of a transfer mode.
pub trait ModeLoop {
    fn step(&mut self, link: &mut LinkWrapper, ctx: &mut LoopCtx<'_>) -> io::Result<Step>;
}
