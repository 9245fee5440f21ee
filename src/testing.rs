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

//! Test doubles shared by the unit tests in this crate

use crate::{
    error::{Error, Result},
    facility::Facility,
    message::Message,
    posixish::Platform,
    priority::Priority,
    syslogger::{Close, Resource, Syslogger},
    writer::Writer,
};

use std::{
    io::Write,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

/// A backend that records everything it's asked to log, and can be told to fail
#[derive(Default)]
pub struct Recorder {
    records: Mutex<Vec<(Priority, String)>>,
    fail: AtomicBool,
    fail_close: AtomicBool,
    closed: AtomicUsize,
}

impl Recorder {
    pub fn new() -> Arc<Recorder> {
        Arc::new(Recorder::default())
    }
    pub fn failing() -> Arc<Recorder> {
        let r = Recorder::default();
        r.fail.store(true, Ordering::SeqCst);
        Arc::new(r)
    }
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
    /// Make subsequent calls to [`Close::close`] fail (they're still counted)
    pub fn set_fail_close(&self, fail: bool) {
        self.fail_close.store(fail, Ordering::SeqCst);
    }
    pub fn records(&self) -> Vec<(Priority, String)> {
        self.records
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .clone()
    }
    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|(_, m)| m).collect()
    }
    /// Number of calls, including failed ones
    pub fn calls(&self) -> usize {
        self.records().len()
    }
    pub fn times_closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Syslogger for Recorder {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()> {
        self.records
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .push((priority, msg.render().into_owned()));
        if self.fail.load(Ordering::SeqCst) {
            Err(Error::transport("recorder told to fail"))
        } else {
            Ok(())
        }
    }
}

impl Close for Recorder {
    fn close(&self) -> Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        if self.fail_close.load(Ordering::SeqCst) {
            Err(Error::transport("recorder told to fail on close"))
        } else {
            Ok(())
        }
    }
}

/// An in-memory [`Write`] implementation whose contents can be inspected after being handed-off
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap_or_else(|err| err.into_inner())).into_owned()
    }
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A [`Platform`] whose daemon & console are [`Recorder`]s and whose standard error is a
/// [`SharedBuf`]
pub struct FakePlatform {
    pub native: Option<Arc<Recorder>>,
    pub console: Option<Arc<Recorder>>,
    pub stderr: SharedBuf,
    pub native_opens: AtomicUsize,
    pub console_opens: AtomicUsize,
}

impl FakePlatform {
    /// Platform with a working daemon & console
    pub fn working() -> FakePlatform {
        FakePlatform {
            native: Some(Recorder::new()),
            console: Some(Recorder::new()),
            stderr: SharedBuf::default(),
            native_opens: AtomicUsize::new(0),
            console_opens: AtomicUsize::new(0),
        }
    }
    /// Platform where neither the daemon nor the console can be opened
    pub fn broken() -> FakePlatform {
        FakePlatform {
            native: None,
            console: None,
            stderr: SharedBuf::default(),
            native_opens: AtomicUsize::new(0),
            console_opens: AtomicUsize::new(0),
        }
    }
}

impl Platform for FakePlatform {
    fn native(&self, _facility: Facility, _ident: &str) -> Result<Arc<dyn Resource>> {
        self.native_opens.fetch_add(1, Ordering::SeqCst);
        match &self.native {
            Some(r) => Ok(r.clone()),
            None => Err(Error::Io {
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no syslogd"),
                back: backtrace::Backtrace::new(),
            }),
        }
    }
    fn console(&self) -> Result<Arc<dyn Resource>> {
        self.console_opens.fetch_add(1, Ordering::SeqCst);
        match &self.console {
            Some(r) => Ok(r.clone()),
            None => Err(Error::Io {
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no console"),
                back: backtrace::Backtrace::new(),
            }),
        }
    }
    fn stderr(&self) -> Arc<dyn Syslogger> {
        Arc::new(Writer::new(self.stderr.clone()))
    }
}

/// Lets a test keep a handle on the platform (and its counters) it gave a session
impl Platform for Arc<FakePlatform> {
    fn native(&self, facility: Facility, ident: &str) -> Result<Arc<dyn Resource>> {
        self.as_ref().native(facility, ident)
    }
    fn console(&self) -> Result<Arc<dyn Resource>> {
        self.as_ref().console()
    }
    fn stderr(&self) -> Arc<dyn Syslogger> {
        self.as_ref().stderr()
    }
}
