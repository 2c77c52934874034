use crate::Result;
use std::io::{BufRead, Write};

/// A bidirectional, newline-delimited text channel.
pub trait LineChannel {
    /// Writes `line` plus a newline and flushes immediately.
    fn send_line(&mut self, line: &str) -> Result<()>;

    /// Blocks for the next line, without its terminator. `Ok(None)` means
    /// the peer closed the stream.
    fn read_line(&mut self) -> Result<Option<String>>;

    /// Shows a recoverable problem to the user.
    fn notify(&mut self, message: &str) -> Result<()> {
        log::warn!("{}", message);
        Ok(())
    }
}

impl<T: LineChannel + ?Sized> LineChannel for Box<T> {
    fn send_line(&mut self, line: &str) -> Result<()> {
        (**self).send_line(line)
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        (**self).read_line()
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        (**self).notify(message)
    }
}

/// Where [`StreamChannel`] sends notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeRoute {
    /// Log only. Used when the writer is a pipe the peer parses.
    Log,
    /// Log and also write to the channel's writer, e.g. stdout in console mode.
    Writer,
}

/// [`LineChannel`] over any buffered reader and writer pair.
pub struct StreamChannel<R, W> {
    reader: R,
    writer: W,
    notices: NoticeRoute,
}

impl<R: BufRead, W: Write> StreamChannel<R, W> {
    pub fn new(reader: R, writer: W, notices: NoticeRoute) -> Self {
        Self {
            reader,
            writer,
            notices,
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<R: BufRead, W: Write> LineChannel for StreamChannel<R, W> {
    fn send_line(&mut self, line: &str) -> Result<()> {
        log::debug!(">> {}", line);
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut bytes = Vec::new();
        if self.reader.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        // Invalid UTF-8 becomes U+FFFD and is reported as a malformed line
        let mut buf = String::from_utf8_lossy(&bytes).into_owned();
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        log::debug!("<< {}", buf);
        Ok(Some(buf))
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        log::warn!("{}", message);
        if self.notices == NoticeRoute::Writer {
            writeln!(self.writer, "{}", message)?;
            self.writer.flush()?;
        }
        Ok(())
    }
}
