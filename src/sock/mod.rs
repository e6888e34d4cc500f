pub mod decorators;
pub use decorators::{
    TraceCanonicalDecoratorFactory, TraceInfoDecoratorFactory, TraceRawDecoratorFactory,
};

use crate::frame::LineRead;
use std::io::{self, Result};
use std::time::Duration;

/// A simple line-oriented link providing basic read/write operations.
pub trait SimpleLink: Send {
    /// Opens the link (connects for network links).
    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    /// Closes the link. Must be safe to call more than once.
    fn close(&mut self) {}

    /// Reads one line of at most `limit` bytes, terminator included.
    fn read_line(&mut self, limit: usize) -> Result<LineRead>;

    /// Writes `data`, returning how many bytes the peer accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize>;
}

pub trait LinkInfo {
    fn get_type_name(&self) -> &str;
    fn get_id(&self) -> u32;
    fn get_description(&self) -> String {
        format!("{}{}", self.get_type_name(), self.get_id())
    }
}

pub trait LinkPollCtl {
    /// Sets how long a read may block before reporting an idle poll.
    fn set_poll(&mut self, _: Option<Duration>) -> Result<()> {
        Ok(())
    }
}

pub trait ComplexLink: SimpleLink + LinkPollCtl + LinkInfo {}

// Any type that impl SimpleLink, LinkPollCtl & LinkInfo automatically
// implements ComplexLink
impl<T: SimpleLink + LinkPollCtl + LinkInfo> ComplexLink for T {}

/// Where a link connects to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkParams {
    pub host: String,
    pub port: u16,
}

impl LinkParams {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

pub trait LinkFactory {
    /// Creates a new, not yet opened, link for the given parameters.
    fn create_link(&self, params: LinkParams) -> Result<Box<dyn ComplexLink>>;
    fn create_link_polled(
        &self,
        params: LinkParams,
        poll: Option<Duration>,
    ) -> Result<Box<dyn ComplexLink>> {
        let mut link = self.create_link(params)?;
        link.set_poll(poll)?;
        Ok(link)
    }
}

/// Owns an opened link and closes it when dropped.
pub struct LinkWrapper {
    link: Box<dyn ComplexLink>,
}

impl LinkWrapper {
    pub fn new(link: Box<dyn ComplexLink>) -> Self {
        Self { link }
    }
    pub fn open(mut self) -> io::Result<Self> {
        self.link.open()?;
        Ok(self)
    }
    pub fn close(&mut self) {
        self.link.close();
    }
    pub fn description(&self) -> String {
        self.link.get_description()
    }
    pub fn read_line(&mut self, limit: usize) -> Result<LineRead> {
        self.link.read_line(limit)
    }
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.link.write(data)
    }
    /// Writes until all of `data` is accepted. A write that takes nothing
    /// means the peer is gone.
    pub fn write_all(&mut self, mut data: &[u8]) -> Result<()> {
        while !data.is_empty() {
            match self.link.write(data) {
                Ok(0) => return Err(io::Error::from(io::ErrorKind::ConnectionReset)),
                Ok(n) => data = &data[n..],
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl Drop for LinkWrapper {
    fn drop(&mut self) {
        self.close();
    }
}

macro_rules! make_link {
    ($name: ident { $($field:ident : $t:ty),* $(,)? }, $ltype: expr $(, $self_ident: ident, $link_descr: block)?) => {
        paste::paste! {
            use std::sync::atomic::AtomicU32 as IdAtomic;
            use std::sync::atomic::Ordering as IdOrdering;
            #[allow(non_upper_case_globals)]
            static [<$name _id>]: IdAtomic = IdAtomic::new(0);
            pub struct $name {
                ltype: &'static str,
                id: u32,
                $($field: $t),*
            }
            impl $name {
                pub fn new($($field: $t),*) -> Self {
                    Self {
                        id: [<$name _id>].fetch_add(1, IdOrdering::Relaxed),
                        ltype: $ltype,
                        $($field),*
                    }
                }
            }
            impl $crate::sock::LinkInfo for $name {
                fn get_type_name(&self) -> &str {
                    self.ltype
                }
                fn get_id(&self) -> u32 {
                    self.id
                }
                $(
                    fn get_description(&$self_ident) -> String {
                        $link_descr
                    }
                )?
            }
        }
    };
}
pub(crate) use make_link;
