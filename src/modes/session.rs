use derive_builder::Builder;
use log::{debug, info};

use super::{Command, LoopCtx, Mode, Step};
use crate::error::ProbeError;
use crate::frame::RawFrame;
use crate::journal::Journal;
use crate::signal::{ShutdownCheck, ShutdownFlag};
use crate::sleeper::{RealSleeper, Sleeper};
use crate::sock::{LinkFactory, LinkParams, LinkWrapper};
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";

/// Longest a read may block before the loop gets to look at the interrupt flag.
const POLL_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Builder, Clone, Debug)]
pub struct SessionParams {
    #[builder(setter(into), default = "DEFAULT_HOST.to_string()")]
    host: String,
    /// `None` or `Some(0)` selects the mode's port.
    #[builder(default)]
    port: Option<u16>,
    mode: Mode,
    /// Seconds to wait before connecting.
    #[builder(default)]
    wait: u64,
    #[builder(default)]
    interval: Option<Duration>,
    #[builder(default = "RawFrame::beacon()")]
    frame: RawFrame,
}

impl SessionParams {
    pub fn host(&self) -> &str {
        &self.host
    }
    pub fn port(&self) -> u16 {
        self.port
            .filter(|port| *port != 0)
            .unwrap_or_else(|| self.mode.default_port())
    }
    pub fn mode(&self) -> Mode {
        self.mode
    }
    pub fn wait(&self) -> u64 {
        self.wait
    }
    pub fn interval(&self) -> Duration {
        self.interval
            .unwrap_or_else(|| self.mode.default_interval())
    }
    pub fn frame(&self) -> &RawFrame {
        &self.frame
    }
}

/// How a transfer loop ended.
#[derive(Debug)]
pub enum Outcome {
    /// The peer closed the stream.
    Closed,
    /// The connection was reset or aborted.
    Reset,
    /// Ctrl+C.
    Interrupted,
    /// Any other I/O failure.
    Failed(io::Error),
}

fn is_reset(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::WriteZero
    )
}

/// One connection's worth of state: built once, driven to the end, dropped.
pub struct Session<'a> {
    params: SessionParams,
    journal: Journal,
    sleeper: &'a dyn Sleeper,
    shutdown: &'a dyn ShutdownCheck,
    data_len: u64,
    quit: bool,
}

impl<'a> Session<'a> {
    pub fn new(
        params: SessionParams,
        journal: Journal,
        sleeper: &'a dyn Sleeper,
        shutdown: &'a dyn ShutdownCheck,
    ) -> Self {
        Self {
            params,
            journal,
            sleeper,
            shutdown,
            data_len: 0,
            quit: false,
        }
    }

    /// Connects, runs the mode loop until it ends and writes the summary.
    pub fn execute(mut self, factory: &dyn LinkFactory) -> Result<Outcome, ProbeError> {
        let addr = format!("{}:{}", self.params.host(), self.params.port());
        self.journal.log(&format!("Connecting to {addr}"));

        self.wait_before_connect();

        let mut link = match self.connect(factory, &addr) {
            Ok(link) => link,
            Err(e) => {
                self.journal.close();
                return Err(e);
            }
        };
        // Ctrl+C keeps its default action while waiting and connecting
        self.shutdown.arm();
        let outcome = self.run(&mut link);
        self.finish(link);
        Ok(outcome)
    }

    /// Sleeps the startup delay in one second steps, printing a dot for each.
    fn wait_before_connect(&mut self) {
        let wait = self.params.wait();
        if wait == 0 {
            return;
        }
        self.journal
            .log(&format!("Waiting {wait} sec before connecting"));
        for _ in 0..wait {
            self.sleeper.sleep(Duration::from_secs(1));
            self.journal.console(".");
        }
        self.journal.console("\n");
    }

    fn connect(&mut self, factory: &dyn LinkFactory, addr: &str) -> Result<LinkWrapper, ProbeError> {
        let params = LinkParams::new(self.params.host(), self.params.port());
        let res = factory
            .create_link_polled(params, Some(POLL_TIMEOUT))
            .and_then(|link| LinkWrapper::new(link).open());
        match res {
            Ok(link) => {
                self.journal.log(&format!("Connected to {addr}"));
                info!("Link is up: {}", link.description());
                Ok(link)
            }
            Err(source) => {
                self.journal.log("Connection refused");
                debug!("Connecting to {addr} failed: {source}");
                Err(ProbeError::Connect {
                    addr: addr.to_string(),
                    source,
                })
            }
        }
    }

    fn run(&mut self, link: &mut LinkWrapper) -> Outcome {
        let mode = self.params.mode();
        let interval = self.params.interval();
        let mut handler = mode.handler(self.params.frame().clone());
        let mut outcome = Outcome::Closed;

        while !self.quit {
            if self.shutdown.should_stop() {
                self.journal.console("^C\n");
                outcome = Outcome::Interrupted;
                self.quit = true;
                continue;
            }
            let mut ctx = LoopCtx {
                journal: &mut self.journal,
                sleeper: self.sleeper,
                interval,
                data_len: &mut self.data_len,
            };
            match handler.step(link, &mut ctx) {
                Ok(Step::Continue) => {}
                Ok(Step::Quit) => self.quit = true,
                Err(e) if is_reset(&e) => {
                    self.journal.log("Connection reset.");
                    outcome = Outcome::Reset;
                    self.quit = true;
                }
                Err(e) => {
                    self.journal.log(&format!("Connection failed: {e}"));
                    outcome = Outcome::Failed(e);
                    self.quit = true;
                }
            }
        }
        debug!("{mode} loop finished: {outcome:?}");
        outcome
    }

    /// Logs the byte counter and closes both the link and the journal.
    fn finish(mut self, mut link: LinkWrapper) {
        let summary = self.params.mode().summary(self.data_len);
        self.journal.log(&summary);
        link.close();
        self.journal.close();
    }
}

pub struct SessionCommand {
    params: SessionParams,
    factory: Box<dyn LinkFactory>,
    log_path: PathBuf,
}

impl SessionCommand {
    pub fn new(params: SessionParams, factory: Box<dyn LinkFactory>, log_path: PathBuf) -> Self {
        Self {
            params,
            factory,
            log_path,
        }
    }
}

impl Command for SessionCommand {
    fn execute(&mut self) -> Result<Outcome, ProbeError> {
        let journal = Journal::open(&self.log_path).map_err(|source| ProbeError::Journal {
            path: self.log_path.clone(),
            source,
        })?;
        let shutdown = ShutdownFlag::new();
        let sleeper = RealSleeper::new();
        Session::new(self.params.clone(), journal, &sleeper, &shutdown)
            .execute(self.factory.as_ref())
    }
}
