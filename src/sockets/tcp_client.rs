use crate::frame::{LineRead, LineReader};
use crate::sock::make_link;
use crate::sock::{ComplexLink, LinkFactory, LinkParams, LinkPollCtl, SimpleLink};
use std::io::{Error, ErrorKind, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

type MaybeReader = Option<LineReader<TcpStream>>;

make_link!(TcpClientLink {
    params: LinkParams,
    reader: MaybeReader,
    poll: Option<Duration>,
}, "tcp-client", self, {
    format!(
        "{}{} ({}:{})",
        self.ltype, self.id, self.params.host, self.params.port
    )
});

impl SimpleLink for TcpClientLink {
    fn open(&mut self) -> std::io::Result<()> {
        let stream = TcpStream::connect((self.params.host.as_str(), self.params.port))?;
        stream.set_read_timeout(self.poll)?;
        self.reader = Some(LineReader::new(stream));
        Ok(())
    }
    fn close(&mut self) {
        if let Some(reader) = self.reader.take() {
            let _ = reader.get_ref().shutdown(Shutdown::Both);
        }
    }
    fn read_line(&mut self, limit: usize) -> std::io::Result<LineRead> {
        match self.reader.as_mut() {
            Some(reader) => reader.read_line(limit),
            None => Err(Error::from(ErrorKind::NotConnected)),
        }
    }
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        match self.reader.as_mut() {
            Some(reader) => {
                reader.get_mut().write_all(data)?;
                Ok(data.len())
            }
            None => Err(Error::from(ErrorKind::NotConnected)),
        }
    }
}

impl LinkPollCtl for TcpClientLink {
    fn set_poll(&mut self, poll: Option<Duration>) -> std::io::Result<()> {
        // A zero timeout is rejected by the OS, treat it as blocking
        self.poll = poll.filter(|p| !p.is_zero());
        if let Some(reader) = self.reader.as_ref() {
            reader.get_ref().set_read_timeout(self.poll)?;
        }
        Ok(())
    }
}

pub struct TcpClientFactory;

impl TcpClientFactory {
    pub fn new() -> Self {
        Self
    }
}

impl LinkFactory for TcpClientFactory {
    fn create_link(&self, params: LinkParams) -> std::io::Result<Box<dyn ComplexLink>> {
        if params.host.is_empty() {
            return Err(Error::new(ErrorKind::InvalidInput, "Empty host name"));
        }
        // Blocking by default
        Ok(Box::new(TcpClientLink::new(params, None, None)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sock::{LinkInfo, LinkWrapper};
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::thread;

    fn local_listener() -> (TcpListener, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    #[test]
    fn reads_lines_until_peer_closes() {
        let (listener, port) = local_listener();
        let server = thread::spawn(move || {
            let (mut peer, _) = listener.accept().unwrap();
            peer.write_all(b"MSG,3,1,1,4B9696,1\nMSG,4,1,1,4B9696,1\n")
                .unwrap();
        });

        let factory = TcpClientFactory::new();
        let link = factory
            .create_link_polled(
                LinkParams::new("127.0.0.1", port),
                Some(Duration::from_secs(5)),
            )
            .unwrap();
        let mut link = LinkWrapper::new(link).open().unwrap();
        server.join().unwrap();

        assert_eq!(
            link.read_line(4096).unwrap(),
            LineRead::Line(b"MSG,3,1,1,4B9696,1\n".to_vec())
        );
        assert_eq!(
            link.read_line(4096).unwrap(),
            LineRead::Line(b"MSG,4,1,1,4B9696,1\n".to_vec())
        );
        assert_eq!(link.read_line(4096).unwrap(), LineRead::Closed);
    }

    #[test]
    fn writes_reach_peer() {
        let (listener, port) = local_listener();
        let server = thread::spawn(move || {
            let (peer, _) = listener.accept().unwrap();
            let mut line = String::new();
            BufReader::new(peer).read_line(&mut line).unwrap();
            line
        });

        let link = TcpClientFactory::new()
            .create_link(LinkParams::new("127.0.0.1", port))
            .unwrap();
        let mut link = LinkWrapper::new(link).open().unwrap();
        let sent = link.write(b"*8d4b969699155600e87406f5b69f;\n").unwrap();
        assert_eq!(sent, 31);
        assert_eq!(server.join().unwrap(), "*8d4b969699155600e87406f5b69f;\n");
    }

    #[test]
    fn idle_poll_reports_idle() {
        let (listener, port) = local_listener();
        let link = TcpClientFactory::new()
            .create_link_polled(
                LinkParams::new("127.0.0.1", port),
                Some(Duration::from_millis(20)),
            )
            .unwrap();
        let mut link = LinkWrapper::new(link).open().unwrap();
        let (_peer, _) = listener.accept().unwrap();
        assert_eq!(link.read_line(128).unwrap(), LineRead::Idle);
    }

    #[test]
    fn refused_connection_is_an_error() {
        // Bind then drop to get a port with nobody listening
        let port = {
            let (_listener, port) = local_listener();
            port
        };
        let link = TcpClientFactory::new()
            .create_link(LinkParams::new("127.0.0.1", port))
            .unwrap();
        assert!(LinkWrapper::new(link).open().is_err());
    }

    #[test]
    fn unopened_link_is_not_connected() {
        let mut link = TcpClientFactory::new()
            .create_link(LinkParams::new("127.0.0.1", 1))
            .unwrap();
        let err = link.read_line(16).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotConnected);
        let err = link.write(b"x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotConnected);
    }

    #[test]
    fn description_names_endpoint() {
        let link = TcpClientFactory::new()
            .create_link(LinkParams::new("localhost", 30002))
            .unwrap();
        let descr = link.get_description();
        assert!(descr.starts_with("tcp-client"));
        assert!(descr.ends_with("(localhost:30002)"));
    }

    #[test]
    fn empty_host_is_rejected() {
        assert!(
            TcpClientFactory::new()
                .create_link(LinkParams::new("", 30001))
                .is_err()
        );
    }
}
