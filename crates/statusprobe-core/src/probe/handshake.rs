//! Fixed-format binary handshake over TCP
//!
//! Sends a configured byte sequence and expects an exact byte sequence back.
//! The whole transaction (resolve, connect, send, receive) shares one
//! deadline.

use crate::error::ProbeError;
use crate::probe::{DEFAULT_BUFFER_SIZE, DEFAULT_TCP_TIMEOUT, Probe, ProbeKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Host and port of a raw socket service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketTarget {
    pub host: String,
    pub port: u16,
}

impl SocketTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for SocketTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Probe that validates a request/acknowledgement exchange byte for byte
#[derive(Debug, Clone)]
pub struct HandshakeProbe {
    name: String,
    target: SocketTarget,
    payload: Vec<u8>,
    expected: Vec<u8>,
    timeout: Duration,
    buffer_size: usize,
}

impl HandshakeProbe {
    pub fn new(
        name: impl Into<String>,
        target: SocketTarget,
        payload: impl Into<Vec<u8>>,
        expected: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            target,
            payload: payload.into(),
            expected: expected.into(),
            timeout: DEFAULT_TCP_TIMEOUT,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Upper bound on the number of response bytes read
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    fn remaining(&self, deadline: Instant) -> Result<Duration, ProbeError> {
        let left = deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            return Err(ProbeError::Timeout {
                target: self.target.to_string(),
                timeout: self.timeout,
            });
        }
        Ok(left)
    }

    /// Resolves on a helper thread, bounded by the deadline. A lookup that
    /// misses it is abandoned.
    fn resolve(&self, deadline: Instant) -> Result<Vec<SocketAddr>, ProbeError> {
        self.remaining(deadline)?;
        let target = self.target.to_string();
        let (tx, rx) = mpsc::channel();
        let (host, port) = (self.target.host.clone(), self.target.port);

        thread::Builder::new()
            .name("statusprobe-resolve".to_string())
            .spawn(move || {
                let resolved = (host.as_str(), port)
                    .to_socket_addrs()
                    .map(|addrs| addrs.collect::<Vec<SocketAddr>>());
                let _ = tx.send(resolved);
            })
            .map_err(|source| ProbeError::Resolve {
                target: target.clone(),
                source,
            })?;

        let addrs = match rx.recv_timeout(self.remaining(deadline)?) {
            Ok(resolved) => resolved.map_err(|source| ProbeError::Resolve {
                target: target.clone(),
                source,
            })?,
            Err(RecvTimeoutError::Timeout) => {
                return Err(ProbeError::Timeout {
                    target,
                    timeout: self.timeout,
                });
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(ProbeError::Resolve {
                    target,
                    source: io::Error::other("resolver thread exited"),
                });
            }
        };

        if addrs.is_empty() {
            return Err(ProbeError::NoAddress(target));
        }
        Ok(addrs)
    }

    fn connect(&self, deadline: Instant) -> Result<TcpStream, ProbeError> {
        let target = self.target.to_string();
        let mut last_err = None;

        for addr in self.resolve(deadline)? {
            let left = self.remaining(deadline)?;
            match TcpStream::connect_timeout(&addr, left) {
                Ok(stream) => return Ok(stream),
                Err(err) => {
                    log::trace!("connect to {} ({}) failed: {}", target, addr, err);
                    last_err = Some(err);
                }
            }
        }

        match last_err {
            Some(err) if err.kind() == io::ErrorKind::TimedOut => Err(ProbeError::Timeout {
                target,
                timeout: self.timeout,
            }),
            Some(source) => Err(ProbeError::Connect { target, source }),
            None => Err(ProbeError::NoAddress(target)),
        }
    }

    /// Reads until the expected length arrived, the peer closed, or the
    /// buffer is full. A timeout after partial data ends the read; the
    /// comparison then reports the short response.
    fn read_response(&self, stream: &mut TcpStream, deadline: Instant) -> Result<Vec<u8>, ProbeError> {
        let target = self.target.to_string();
        let mut buf = vec![0u8; self.buffer_size];
        let mut filled = 0;

        while filled < buf.len() {
            let left = match self.remaining(deadline) {
                Ok(left) => left,
                Err(_) if filled > 0 => break,
                Err(err) => return Err(err),
            };
            stream
                .set_read_timeout(Some(left))
                .map_err(|err| ProbeError::from_io(&target, self.timeout, err))?;

            match stream.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => {
                    filled += n;
                    if filled >= self.expected.len() {
                        break;
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err)
                    if filled > 0
                        && matches!(
                            err.kind(),
                            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
                        ) =>
                {
                    break;
                }
                Err(err) => return Err(ProbeError::from_io(&target, self.timeout, err)),
            }
        }

        buf.truncate(filled);
        Ok(buf)
    }
}

impl Probe for HandshakeProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ProbeKind {
        ProbeKind::Handshake
    }

    fn target(&self) -> String {
        self.target.to_string()
    }

    fn probe(&self) -> Result<(), ProbeError> {
        let deadline = Instant::now() + self.timeout;
        let target = self.target.to_string();

        // Dropped on every return path, which closes the socket
        let mut stream = self.connect(deadline)?;

        let left = self.remaining(deadline)?;
        stream
            .set_write_timeout(Some(left))
            .map_err(|err| ProbeError::from_io(&target, self.timeout, err))?;
        stream
            .write_all(&self.payload)
            .map_err(|err| ProbeError::from_io(&target, self.timeout, err))?;

        let received = self.read_response(&mut stream, deadline)?;
        if received == self.expected {
            Ok(())
        } else {
            Err(ProbeError::ResponseMismatch {
                expected: self.expected.escape_ascii().to_string(),
                received: received.escape_ascii().to_string(),
            })
        }
    }
}
