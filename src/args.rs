use crate::error::ProbeError;
use crate::exit::codes;
use crate::frame::RawFrame;
use crate::journal::default_log_path;
use crate::modes::session::{DEFAULT_HOST, SessionCommand, SessionParams, SessionParamsBuilder};
use crate::modes::{Command, Mode};
use crate::sock::{
    LinkFactory, TraceCanonicalDecoratorFactory, TraceInfoDecoratorFactory,
    TraceRawDecoratorFactory,
};
use crate::sockets::tcp_client::TcpClientFactory;

use clap::Parser;
use env_logger::Env;

use std::path::PathBuf;
use std::process;
use std::time::Duration;

const ABOUT: &str = "Test client for Dump1090 style Mode-S decoders";

const LONG_ABOUT: &str = "\
Test client for Dump1090 style Mode-S decoders.

Supported modes:
  RAW-OUT  Connect to port 30001 and send '*...;' frames, like a receiver feed.
  RAW-IN   Connect to port 30002, receive '*...;' frames and print them.
  SBS      Connect to port 30003, receive 'MSG,...' lines and print them.

All traffic is printed and appended to a log file.";

#[derive(Parser)]
#[command(name = "modes-probe", version, about = ABOUT, long_about = LONG_ABOUT)]
pub struct ProbeArgs {
    /// Host to connect to
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,
    /// TCP port to connect to (0 selects the mode's port)
    #[arg(long, default_value_t = 0)]
    port: u16,
    /// Seconds to wait before connecting
    #[arg(long, default_value_t = 0)]
    wait: u64,
    /// Poll interval in milliseconds (RAW-OUT: 1000, others: 10)
    #[arg(long)]
    interval: Option<u64>,
    /// RAW frame to send in RAW-OUT mode, '*<hex>;' or bare hex
    #[arg(long)]
    frame: Option<String>,
    /// Log file (default: modes-probe.log beside the executable)
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Link info tracing
    #[arg(long, default_value_t = false)]
    trace_info: bool,
    /// Link data tracing (in raw format)
    #[arg(long, default_value_t = false)]
    trace_raw: bool,
    /// Link data tracing (in canonical format)
    #[arg(long, default_value_t = false)]
    trace_canon: bool,
    /// Transfer mode: RAW-OUT, RAW-IN or SBS
    mode: Option<String>,
}

impl ProbeArgs {
    pub fn get_scenario() -> Box<dyn Command> {
        let args = Self::try_parse().unwrap_or_else(|e| {
            // Help and version go to stdout and exit 0
            if !e.use_stderr() {
                e.exit();
            }
            eprintln!("{e}");
            process::exit(codes::FAILURE)
        });
        args.init_logging();
        args.into_command().unwrap_or_else(|e| {
            eprintln!("{e}");
            process::exit(codes::FAILURE)
        })
    }

    fn tracing(&self) -> bool {
        self.trace_info || self.trace_raw || self.trace_canon
    }

    fn init_logging(&self) {
        let level = if self.tracing() { "debug" } else { "warn" };
        let _ = env_logger::Builder::from_env(Env::default().default_filter_or(level)).try_init();
    }

    pub fn into_command(self) -> Result<Box<dyn Command>, ProbeError> {
        let params = self.params()?;
        let log_path = self.log_file.clone().unwrap_or_else(default_log_path);
        Ok(Box::new(SessionCommand::new(
            params,
            self.factory(),
            log_path,
        )))
    }

    fn mode(&self) -> Result<Mode, ProbeError> {
        self.mode
            .as_deref()
            .ok_or(ProbeError::MissingMode)?
            .parse()
    }

    fn params(&self) -> Result<SessionParams, ProbeError> {
        let mut builder = SessionParamsBuilder::default();
        builder
            .host(self.host.as_str())
            .port(Some(self.port).filter(|port| *port != 0))
            .mode(self.mode()?)
            .wait(self.wait)
            .interval(self.interval.map(Duration::from_millis));
        if let Some(frame) = &self.frame {
            let raw = RawFrame::from_hex(frame).map_err(|source| ProbeError::InvalidFrame {
                frame: frame.clone(),
                source,
            })?;
            builder.frame(raw);
        }
        Ok(builder.build()?)
    }

    fn factory(&self) -> Box<dyn LinkFactory> {
        let mut f: Box<dyn LinkFactory> = Box::new(TcpClientFactory::new());
        // Link info must be printed firstly
        if self.trace_info {
            f = TraceInfoDecoratorFactory::new(f);
        }
        // Raw data should be printed after link info
        if self.trace_raw {
            f = TraceRawDecoratorFactory::new(f);
        }
        // Canonical data is the last
        if self.trace_canon {
            f = TraceCanonicalDecoratorFactory::new(f);
        }
        f
    }
}
