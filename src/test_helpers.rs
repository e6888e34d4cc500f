use crate::frame::LineRead;
use crate::journal::Journal;
use crate::signal::ShutdownCheck;
use crate::sock::{ComplexLink, LinkFactory, LinkParams, LinkPollCtl, LinkWrapper, SimpleLink, make_link};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory sink whose clones share one buffer.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Journal writing to memory: (journal, file, console).
pub fn test_journal() -> (Journal, SharedBuf, SharedBuf) {
    let file = SharedBuf::default();
    let console = SharedBuf::default();
    let journal = Journal::with_sinks(Box::new(file.clone()), Box::new(console.clone())).unwrap();
    (journal, file, console)
}

#[derive(Default)]
struct LinkLogState {
    opened: bool,
    closed: bool,
    poll: Option<Duration>,
    written: Vec<Vec<u8>>,
}

/// What happened to a scripted link, readable after the link is gone.
#[derive(Clone, Default)]
pub struct LinkLog(Arc<Mutex<LinkLogState>>);

impl LinkLog {
    pub fn opened(&self) -> bool {
        self.0.lock().unwrap().opened
    }
    pub fn closed(&self) -> bool {
        self.0.lock().unwrap().closed
    }
    pub fn poll(&self) -> Option<Duration> {
        self.0.lock().unwrap().poll
    }
    pub fn written(&self) -> Vec<Vec<u8>> {
        self.0.lock().unwrap().written.clone()
    }
}

make_link!(ScriptedLink {
    reads: VecDeque<io::Result<LineRead>>,
    writes: VecDeque<io::Result<usize>>,
    refuse: bool,
    log: LinkLog,
}, "scripted");

impl ScriptedLink {
    /// Replays `reads` then reports `Closed`; `writes` results default to
    /// accepting everything.
    pub fn scripted(
        reads: Vec<io::Result<LineRead>>,
        writes: Vec<io::Result<usize>>,
        log: LinkLog,
    ) -> Self {
        Self::new(reads.into(), writes.into(), false, log)
    }

    pub fn refusing(log: LinkLog) -> Self {
        Self::new(VecDeque::new(), VecDeque::new(), true, log)
    }

    pub fn wrapped(
        reads: Vec<io::Result<LineRead>>,
        writes: Vec<io::Result<usize>>,
        log: LinkLog,
    ) -> LinkWrapper {
        LinkWrapper::new(Box::new(Self::scripted(reads, writes, log)))
            .open()
            .unwrap()
    }
}

impl SimpleLink for ScriptedLink {
    fn open(&mut self) -> io::Result<()> {
        if self.refuse {
            return Err(io::Error::from(io::ErrorKind::ConnectionRefused));
        }
        self.log.0.lock().unwrap().opened = true;
        Ok(())
    }
    fn close(&mut self) {
        self.log.0.lock().unwrap().closed = true;
    }
    fn read_line(&mut self, _limit: usize) -> io::Result<LineRead> {
        self.reads.pop_front().unwrap_or(Ok(LineRead::Closed))
    }
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let res = self.writes.pop_front().unwrap_or(Ok(data.len()));
        if let Ok(n) = res
            && n > 0
        {
            self.log.0.lock().unwrap().written.push(data[..n].to_vec());
        }
        res
    }
}

impl LinkPollCtl for ScriptedLink {
    fn set_poll(&mut self, poll: Option<Duration>) -> io::Result<()> {
        self.log.0.lock().unwrap().poll = poll;
        Ok(())
    }
}

/// Hands out one prepared link and remembers where it was asked to go.
pub struct ScriptedFactory {
    link: RefCell<Option<ScriptedLink>>,
    params: RefCell<Option<LinkParams>>,
}

impl ScriptedFactory {
    pub fn new(link: ScriptedLink) -> Self {
        Self {
            link: RefCell::new(Some(link)),
            params: RefCell::new(None),
        }
    }
    pub fn params(&self) -> Option<LinkParams> {
        self.params.borrow().clone()
    }
}

impl LinkFactory for ScriptedFactory {
    fn create_link(&self, params: LinkParams) -> io::Result<Box<dyn ComplexLink>> {
        *self.params.borrow_mut() = Some(params);
        match self.link.borrow_mut().take() {
            Some(link) => Ok(Box::new(link)),
            None => Err(io::Error::other("scripted link already used")),
        }
    }
}

/// Lets `n` loop iterations through, then reports an interrupt.
pub struct StopAfter {
    remaining: Cell<usize>,
    armed: Cell<bool>,
}

impl StopAfter {
    pub fn new(n: usize) -> Self {
        Self {
            remaining: Cell::new(n),
            armed: Cell::new(false),
        }
    }
    pub fn armed(&self) -> bool {
        self.armed.get()
    }
}

impl ShutdownCheck for StopAfter {
    fn should_stop(&self) -> bool {
        match self.remaining.get() {
            0 => true,
            n => {
                self.remaining.set(n - 1);
                false
            }
        }
    }
    fn arm(&self) {
        self.armed.set(true);
    }
}
