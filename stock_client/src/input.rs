//! Terminal input.
//!
//! Stdin is read on a dedicated thread and forwarded line by line to the event
//! loop. A blocked read never holds up shutdown: the thread is simply abandoned
//! when the process exits. Bytes that are not valid UTF-8 are replaced rather
//! than rejected, so no input can stop the client.
use std::io::{self, BufRead};
use std::thread;

use log::{debug, error};
use tokio::sync::mpsc::UnboundedSender;

/// Spawns the stdin reader. The channel closes when stdin reaches EOF.
pub fn spawn_stdin_reader(lines: UnboundedSender<String>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        if let Err(e) = forward_lines(stdin.lock(), &lines) {
            error!("Reading stdin failed: {}", e);
        }
        debug!("Stdin reader stopping...");
    });
}

/// Sends every line of `reader` to `lines` without its line terminator.
///
/// Stops at EOF or once the receiving side is gone.
pub fn forward_lines<R: BufRead>(mut reader: R, lines: &UnboundedSender<String>) -> io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\r', '\n']);
        if lines.send(line.to_string()).is_err() {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let (tx, mut rx) = unbounded_channel();
        let input = Cursor::new(b"letter B\n\xff\xfe\r\nprice 10".to_vec());

        forward_lines(input, &tx).unwrap();

        assert_eq!(rx.try_recv().unwrap(), "letter B");
        assert_eq!(rx.try_recv().unwrap(), "\u{FFFD}\u{FFFD}");
        assert_eq!(rx.try_recv().unwrap(), "price 10");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn stops_when_receiver_is_gone() {
        let (tx, rx) = unbounded_channel();
        drop(rx);
        assert!(forward_lines(Cursor::new(b"help\nquit\n".to_vec()), &tx).is_ok());
    }
}
