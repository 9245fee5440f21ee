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

//! Deferred backend construction
//!
//! [`Delay`] is how `LOG_ODELAY` is implemented: the real backend isn't built until there's
//! something to log. The build step holds a lock so that concurrent first callers build exactly
//! one backend; once built, the lock is held only long enough to clone a reference, and the
//! actual logging happens outside it.

use crate::{
    error::{Error, Result},
    message::Message,
    priority::Priority,
    syslogger::Syslogger,
};

use backtrace::Backtrace;

use std::sync::{Arc, Mutex};

/// Builds the backend a [`Delay`] will forward to
pub type Factory = dyn Fn() -> Result<Arc<dyn Syslogger>> + Send + Sync;

enum Slot {
    Empty,
    Built(Arc<dyn Syslogger>),
}

/// Build a backend on first use, then forward to it
pub struct Delay {
    factory: Box<Factory>,
    slot: Mutex<Slot>,
}

impl Delay {
    pub fn new<F>(factory: F) -> Delay
    where
        F: Fn() -> Result<Arc<dyn Syslogger>> + Send + Sync + 'static,
    {
        Delay {
            factory: Box::new(factory),
            slot: Mutex::new(Slot::Empty),
        }
    }
    /// Fails with [`Error::NoFactory`] when `factory` is `None`
    pub fn from_factory(factory: Option<Box<Factory>>) -> Result<Delay> {
        match factory {
            Some(factory) => Ok(Delay {
                factory,
                slot: Mutex::new(Slot::Empty),
            }),
            None => Err(Error::NoFactory {
                back: Backtrace::new(),
            }),
        }
    }
    /// Forget the built backend (without closing it); the next message will build a new one
    pub fn reset(&self) {
        *self.lock() = Slot::Empty;
    }
    pub fn is_built(&self) -> bool {
        matches!(*self.lock(), Slot::Built(_))
    }
    fn lock(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|err| err.into_inner())
    }
    fn backend(&self) -> Result<Arc<dyn Syslogger>> {
        let mut slot = self.lock();
        if let Slot::Built(backend) = &*slot {
            return Ok(backend.clone());
        }
        // On failure we stay `Empty` so that the next message tries again
        let backend = (self.factory)()?;
        *slot = Slot::Built(backend.clone());
        Ok(backend)
    }
}

impl Syslogger for Delay {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()> {
        let backend = self.backend()?;
        backend.log(priority, msg)
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::{facility::Severity, testing::Recorder};

    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Barrier,
    };

    #[test]
    fn test_no_factory() {
        assert!(matches!(
            Delay::from_factory(None),
            Err(Error::NoFactory { .. })
        ));
        let rec = Recorder::new();
        let r2 = rec.clone();
        let factory: Box<Factory> = Box::new(move || Ok(r2.clone() as Arc<dyn Syslogger>));
        let d = Delay::from_factory(Some(factory)).unwrap();
        d.log(Severity::LOG_INFO.into(), &Message::from("hi"))
            .unwrap();
        assert_eq!(rec.calls(), 1);
    }

    #[test]
    fn test_built_once_under_contention() {
        let builds = Arc::new(AtomicUsize::new(0));
        let rec = Recorder::new();
        let (b2, r2) = (builds.clone(), rec.clone());
        let d = Arc::new(Delay::new(move || {
            b2.fetch_add(1, Ordering::SeqCst);
            // Give the other callers a chance to pile up behind the build
            std::thread::sleep(std::time::Duration::from_millis(20));
            Ok(r2.clone() as Arc<dyn Syslogger>)
        }));

        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let (d, barrier) = (d.clone(), barrier.clone());
                std::thread::spawn(move || {
                    barrier.wait();
                    d.log(Severity::LOG_INFO.into(), &Message::text(format!("{}", i)))
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap().unwrap();
        }

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        // Every caller logged through the single cached instance
        assert_eq!(rec.calls(), 8);
    }

    #[test]
    fn test_failed_build_retries() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let rec = Recorder::new();
        let (a2, r2) = (attempts.clone(), rec.clone());
        let d = Delay::new(move || {
            if a2.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Error::transport("not yet"))
            } else {
                Ok(r2.clone() as Arc<dyn Syslogger>)
            }
        });
        assert!(d
            .log(Severity::LOG_INFO.into(), &Message::from("a"))
            .is_err());
        assert!(!d.is_built());
        d.log(Severity::LOG_INFO.into(), &Message::from("b"))
            .unwrap();
        assert!(d.is_built());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(rec.messages(), vec!["b"]);
    }

    #[test]
    fn test_reset() {
        let builds = Arc::new(AtomicUsize::new(0));
        let b2 = builds.clone();
        let d = Delay::new(move || {
            b2.fetch_add(1, Ordering::SeqCst);
            Ok(Recorder::new() as Arc<dyn Syslogger>)
        });
        d.log(Severity::LOG_INFO.into(), &Message::from("a"))
            .unwrap();
        d.log(Severity::LOG_INFO.into(), &Message::from("b"))
            .unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        d.reset();
        assert!(!d.is_built());
        d.log(Severity::LOG_INFO.into(), &Message::from("c"))
            .unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }
}
