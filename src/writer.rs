// Copyright (C) 2022-2025 Michael Herstine <sp1ff@pobox.com>
//
// This file is part of posixish-syslog.
//
// posixish-syslog is free software: you can redistribute it and/or modify it under the terms of the
// GNU General Public License as published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// posixish-syslog is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without
// even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with posixish-syslog.  If
// not, see <http://www.gnu.org/licenses/>.

//! Raw byte sinks
//!
//! The types in this module write already-formatted text somewhere. They can't do anything with a
//! priority, so they insist on being handed the zero [`Priority`]; put a formatting adapter such
//! as [`Rfc3164`](crate::rfc3164::Rfc3164) in front of them.

use crate::{
    error::{Error, Result},
    message::Message,
    priority::Priority,
    syslogger::{Close, Syslogger},
};

use backtrace::Backtrace;

use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
    sync::Mutex,
};

fn check_priority(backend: &'static str, priority: Priority) -> Result<()> {
    if priority != Priority::default() {
        Err(Error::UnexpectedPriority {
            backend,
            priority,
            back: Backtrace::new(),
        })
    } else {
        Ok(())
    }
}

fn write_text<W: Write>(backend: &'static str, w: &mut W, msg: &Message) -> Result<()> {
    let text = msg
        .as_text()
        .ok_or_else(|| Error::unsupported(backend, msg.kind()))?;
    w.write_all(text.as_bytes())?;
    w.flush()?;
    Ok(())
}

/// Write plain-text messages to any [`Write`] implementation
pub struct Writer<W: Write + Send> {
    inner: Mutex<W>,
}

impl<W: Write + Send> Writer<W> {
    pub fn new(inner: W) -> Writer<W> {
        Writer {
            inner: Mutex::new(inner),
        }
    }
    pub fn into_inner(self) -> W {
        self.inner.into_inner().unwrap_or_else(|err| err.into_inner())
    }
}

impl<W: Write + Send> Syslogger for Writer<W> {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()> {
        check_priority("Writer", priority)?;
        let mut w = self.inner.lock().unwrap_or_else(|err| err.into_inner());
        write_text("Writer", &mut *w, msg)
    }
}

/// A [`Writer`] that owns (and can release) what it writes to
pub struct WriteCloser<W: Write + Send> {
    inner: Mutex<Option<W>>,
}

impl<W: Write + Send> WriteCloser<W> {
    pub fn new(inner: W) -> WriteCloser<W> {
        WriteCloser {
            inner: Mutex::new(Some(inner)),
        }
    }
}

impl<W: Write + Send> Syslogger for WriteCloser<W> {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()> {
        check_priority("WriteCloser", priority)?;
        let mut guard = self.inner.lock().unwrap_or_else(|err| err.into_inner());
        match guard.as_mut() {
            Some(w) => write_text("WriteCloser", w, msg),
            None => Err(Error::closed("WriteCloser")),
        }
    }
}

impl<W: Write + Send> Close for WriteCloser<W> {
    fn close(&self) -> Result<()> {
        let taken = self
            .inner
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .take();
        if let Some(mut w) = taken {
            w.flush()?;
        }
        Ok(())
    }
}

/// Write plain-text messages to this process' standard error
#[derive(Clone, Copy, Debug, Default)]
pub struct Stderr;

impl Syslogger for Stderr {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()> {
        check_priority("Stderr", priority)?;
        write_text("Stderr", &mut std::io::stderr().lock(), msg)
    }
}

/// Write plain-text messages to the system console
pub struct DevConsole {
    file: WriteCloser<File>,
}

impl DevConsole {
    pub const PATH: &'static str = "/dev/console";

    pub fn open() -> Result<DevConsole> {
        DevConsole::open_path(DevConsole::PATH)
    }
    /// Open some other device (or file) as if it were the console
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<DevConsole> {
        let file = OpenOptions::new().append(true).write(true).open(path)?;
        Ok(DevConsole {
            file: WriteCloser::new(file),
        })
    }
}

impl Syslogger for DevConsole {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()> {
        self.file.log(priority, msg)
    }
}

impl Close for DevConsole {
    fn close(&self) -> Result<()> {
        self.file.close()
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::{facility::Severity, testing::SharedBuf};

    #[test]
    fn test_writer() {
        let buf = SharedBuf::default();
        let w = Writer::new(buf.clone());
        w.log(Priority::default(), &Message::from("one\n")).unwrap();
        w.log(Priority::default(), &Message::from("two\n")).unwrap();
        assert_eq!(buf.contents(), "one\ntwo\n");

        assert!(matches!(
            w.log(Severity::LOG_ERR.into(), &Message::from("x")),
            Err(Error::UnexpectedPriority { .. })
        ));
        assert!(matches!(
            w.log(
                Priority::default(),
                &Message::error(std::io::Error::new(std::io::ErrorKind::Other, "e"))
            ),
            Err(Error::UnsupportedMessage { .. })
        ));
        assert_eq!(buf.contents(), "one\ntwo\n");
    }

    #[test]
    fn test_write_closer() {
        let buf = SharedBuf::default();
        let w = WriteCloser::new(buf.clone());
        w.log(Priority::default(), &Message::from("before")).unwrap();
        w.close().unwrap();
        assert!(matches!(
            w.log(Priority::default(), &Message::from("after")),
            Err(Error::Closed { .. })
        ));
        // closing twice is fine
        w.close().unwrap();
        assert_eq!(buf.contents(), "before");
    }

    #[test]
    fn test_dev_console() {
        assert!(DevConsole::open_path("/i/am/not/there").is_err());
        let path = std::env::temp_dir().join(format!("posixish-console-{}", std::process::id()));
        std::fs::write(&path, b"").unwrap();
        let con = DevConsole::open_path(&path).unwrap();
        con.log(Priority::default(), &Message::from("hello\n"))
            .unwrap();
        con.close().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
        let _ = std::fs::remove_file(&path);
    }
}
