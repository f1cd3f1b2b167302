//! Scripted TCP peers for handshake tests
//!
//! Each peer listens on an ephemeral loopback port and answers every
//! connection according to a fixed script. Connections are served on their
//! own threads, so a peer that holds one connection open still accepts the
//! next.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// How long a peer waits for the client's request before answering anyway
const REQUEST_READ_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Clone)]
enum Script {
    /// Read the request, then write each chunk with a pause in between
    Reply { chunks: Vec<Vec<u8>>, gap: Duration },
    /// Read the request and keep the connection open without answering
    Silent { hold: Duration },
    /// Close the connection right after accepting it
    HangUp,
}

/// Loopback TCP server following a fixed script
pub struct ScriptedPeer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<Vec<u8>>>>,
    connections: Arc<AtomicUsize>,
    stop: Arc<AtomicBool>,
}

impl ScriptedPeer {
    /// Answers every request with `bytes` in a single write
    pub fn reply(bytes: &[u8]) -> Self {
        Self::spawn(Script::Reply {
            chunks: vec![bytes.to_vec()],
            gap: Duration::ZERO,
        })
    }

    /// Answers with several writes separated by `gap`
    pub fn reply_in_chunks(chunks: Vec<Vec<u8>>, gap: Duration) -> Self {
        Self::spawn(Script::Reply { chunks, gap })
    }

    /// Accepts and reads, but never answers; closes after `hold`
    pub fn silent(hold: Duration) -> Self {
        Self::spawn(Script::Silent { hold })
    }

    /// Accepts and closes immediately
    pub fn hang_up() -> Self {
        Self::spawn(Script::HangUp)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Request bytes seen so far, one entry per connection
    pub fn received(&self) -> Vec<Vec<u8>> {
        self.received
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of accepted connections
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    fn spawn(script: Script) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind loopback listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read listener address");

        let received = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));
        let stop = Arc::new(AtomicBool::new(false));

        {
            let received = Arc::clone(&received);
            let connections = Arc::clone(&connections);
            let stop = Arc::clone(&stop);

            thread::spawn(move || {
                for stream in listener.incoming() {
                    if stop.load(Ordering::SeqCst) {
                        break;
                    }
                    let Ok(stream) = stream else { continue };
                    connections.fetch_add(1, Ordering::SeqCst);

                    let script = script.clone();
                    let received = Arc::clone(&received);
                    thread::spawn(move || serve(stream, &script, &received));
                }
            });
        }

        Self {
            addr,
            received,
            connections,
            stop,
        }
    }
}

impl Drop for ScriptedPeer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        // Wake the accept loop so it observes the stop flag
        let _ = TcpStream::connect_timeout(&self.addr, Duration::from_millis(100));
    }
}

fn serve(mut stream: TcpStream, script: &Script, received: &Mutex<Vec<Vec<u8>>>) {
    if let Script::HangUp = script {
        return;
    }

    let _ = stream.set_read_timeout(Some(REQUEST_READ_TIMEOUT));
    let mut buf = [0u8; 4096];
    if let Ok(n) = stream.read(&mut buf)
        && n > 0
    {
        received
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(buf[..n].to_vec());
    }

    match script {
        Script::Reply { chunks, gap } => {
            for (index, chunk) in chunks.iter().enumerate() {
                if index > 0 {
                    thread::sleep(*gap);
                }
                if stream.write_all(chunk).and_then(|_| stream.flush()).is_err() {
                    return;
                }
            }
        }
        Script::Silent { hold } => thread::sleep(*hold),
        Script::HangUp => {}
    }
}

/// A loopback port with nothing listening on it
pub fn refused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind loopback listener");
    listener
        .local_addr()
        .expect("Failed to read listener address")
        .port()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_peer_answers_and_records() {
        let peer = ScriptedPeer::reply(b"pong");
        let mut stream = TcpStream::connect(peer.addr()).unwrap();
        stream.write_all(b"ping").unwrap();

        let mut answer = Vec::new();
        stream.read_to_end(&mut answer).unwrap();

        assert_eq!(answer, b"pong");
        assert_eq!(peer.received(), vec![b"ping".to_vec()]);
        assert_eq!(peer.connections(), 1);
    }

    #[test]
    fn test_refused_port_refuses() {
        let port = refused_port();
        assert!(TcpStream::connect(("127.0.0.1", port)).is_err());
    }

    #[test]
    fn test_hang_up_closes_without_data() {
        let peer = ScriptedPeer::hang_up();
        let mut stream = TcpStream::connect(peer.addr()).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();

        let mut answer = Vec::new();
        let _ = stream.read_to_end(&mut answer);
        assert!(answer.is_empty());
    }
}
