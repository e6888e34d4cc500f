use super::{ComplexLink, LinkFactory, LinkInfo, LinkParams, LinkPollCtl, SimpleLink};
use crate::frame::LineRead;
use log::debug;
use pretty_hex::PrettyHex;
use std::io::Result;
use std::time::Duration;

macro_rules! link_decorator {
    ($name: ident) => {
        pub struct $name {
            link: Box<dyn ComplexLink>,
        }
        impl $name {
            pub fn new(link: Box<dyn ComplexLink>) -> Box<dyn ComplexLink> {
                Box::new(Self { link })
            }
        }
        impl LinkPollCtl for $name {
            fn set_poll(&mut self, poll: Option<Duration>) -> Result<()> {
                self.link.set_poll(poll)
            }
        }
        impl LinkInfo for $name {
            fn get_type_name(&self) -> &str {
                self.link.get_type_name()
            }
            fn get_id(&self) -> u32 {
                self.link.get_id()
            }
            fn get_description(&self) -> String {
                self.link.get_description()
            }
        }
        paste::paste! {
            pub struct [< $name Factory >] {
                factory: Box<dyn LinkFactory>,
            }
            impl [< $name Factory >] {
                pub fn new(factory: Box<dyn LinkFactory>) -> Box<dyn LinkFactory> {
                    Box::new(Self { factory })
                }
            }
            impl LinkFactory for [< $name Factory >] {
                fn create_link(&self, params: LinkParams) -> Result<Box<dyn ComplexLink>> {
                    Ok($name::new(self.factory.create_link(params)?))
                }
            }
        }
    };
}

macro_rules! decorator_openclose_default {
    () => {
        fn open(&mut self) -> Result<()> {
            self.link.open()
        }
        fn close(&mut self) {
            self.link.close();
        }
    };
}

link_decorator!(TraceInfoDecorator);

impl SimpleLink for TraceInfoDecorator {
    fn read_line(&mut self, limit: usize) -> Result<LineRead> {
        let res = self.link.read_line(limit);
        if let Ok(LineRead::Line(_)) = res {
            debug!("Line is received from: {}", self.link.get_description());
        }
        res
    }
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let res = self.link.write(data);
        if !data.is_empty() {
            debug!("Data is transferred to: {}", self.link.get_description());
        }
        res
    }
    fn open(&mut self) -> Result<()> {
        debug!("Link is opened: {}", self.link.get_description());
        self.link.open()
    }
    fn close(&mut self) {
        debug!("Link is closed: {}", self.link.get_description());
        self.link.close()
    }
}

link_decorator!(TraceRawDecorator);

impl SimpleLink for TraceRawDecorator {
    fn read_line(&mut self, limit: usize) -> Result<LineRead> {
        let res = self.link.read_line(limit);
        if let Ok(LineRead::Line(line)) = &res {
            debug!("Line is received: {:?}", line.as_slice());
        }
        res
    }
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let res = self.link.write(data);
        if let Ok(sz) = res
            && sz > 0
        {
            debug!("Data is written: {:?}", &data[..sz]);
        }
        res
    }
    decorator_openclose_default!();
}

link_decorator!(TraceCanonicalDecorator);

impl SimpleLink for TraceCanonicalDecorator {
    fn read_line(&mut self, limit: usize) -> Result<LineRead> {
        let res = self.link.read_line(limit);
        if let Ok(LineRead::Line(line)) = &res {
            debug!("Received line (canonical format):\n{:?}", line[..].hex_dump());
        }
        res
    }
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let res = self.link.write(data);
        if let Ok(sz) = res
            && sz > 0
        {
            debug!("Written data (canonical format):\n{:?}", data[..sz].hex_dump());
        }
        res
    }
    decorator_openclose_default!();
}
