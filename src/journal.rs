use chrono::Local;
use log::warn;
use std::fs::OpenOptions;
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};

pub const LOG_FILE_NAME: &str = "modes-probe.log";

/// Log file beside the running executable, or in the working directory
/// when the executable path is unknown.
pub fn default_log_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE_NAME)
}

type Sink = Box<dyn Write + Send>;

pub struct Journal {
    file: Option<Sink>,
    console: Sink,
}

impl Journal {
    /// Opens `path` in append mode and mirrors to stdout.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Self::with_sinks(Box::new(LineWriter::new(file)), Box::new(io::stdout()))
    }

    pub fn with_sinks(file: Sink, console: Sink) -> io::Result<Self> {
        let mut journal = Self {
            file: Some(file),
            console,
        };
        journal.start()?;
        Ok(journal)
    }

    fn start(&mut self) -> io::Result<()> {
        if let Some(file) = self.file.as_mut() {
            writeln!(
                file,
                "\n{}: --- Starting -------",
                Local::now().format("%d-%B-%Y %H:%M:%S")
            )?;
        }
        Ok(())
    }

    /// Writes one event to the console and the file. Trailing line
    /// terminators in `text` are normalised to a single newline.
    pub fn log(&mut self, text: &str) {
        let line = text.trim_end_matches(['\r', '\n']);
        self.console(&format!("{line}\n"));
        if let Some(file) = self.file.as_mut() {
            let stamp = Local::now().format("%H:%M:%S");
            if let Err(e) = writeln!(file, "{stamp}: {line}") {
                warn!("Journal write failed: {e}");
            }
        }
    }

    /// Writes `text` to the console only, as is.
    pub fn console(&mut self, text: &str) {
        let res = self
            .console
            .write_all(text.as_bytes())
            .and_then(|_| self.console.flush());
        if let Err(e) = res {
            warn!("Console write failed: {e}");
        }
    }

    /// Flushes and releases the log file. Later events reach the console only.
    pub fn close(&mut self) {
        if let Some(mut file) = self.file.take()
            && let Err(e) = file.flush()
        {
            warn!("Journal flush failed: {e}");
        }
        let _ = self.console.flush();
    }
}

impl Drop for Journal {
    fn drop(&mut self) {
        self.close();
    }
}
