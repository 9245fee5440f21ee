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

//! Broadcast to several backends

use crate::{error::Result, message::Message, priority::Priority, syslogger::Syslogger};

use std::sync::Arc;

/// Log each message to every backend in a list, in order
///
/// With `try_all` unset, the first failure is returned immediately and later backends never see
/// the message. With `try_all` set, every backend is tried and the first failure is returned once
/// they all have been.
#[derive(Default)]
pub struct Multi {
    backends: Vec<Arc<dyn Syslogger>>,
    try_all: bool,
}

impl Multi {
    pub fn new(backends: Vec<Arc<dyn Syslogger>>, try_all: bool) -> Multi {
        Multi { backends, try_all }
    }
    pub fn push(mut self, backend: Arc<dyn Syslogger>) -> Self {
        self.backends.push(backend);
        self
    }
    pub fn try_all(mut self, try_all: bool) -> Self {
        self.try_all = try_all;
        self
    }
    pub fn len(&self) -> usize {
        self.backends.len()
    }
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl Syslogger for Multi {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()> {
        let mut first = None;
        for backend in &self.backends {
            if let Err(err) = backend.log(priority, msg) {
                if !self.try_all {
                    return Err(err);
                }
                first.get_or_insert(err);
            }
        }
        match first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::{error::Error, facility::Severity, testing::Recorder};

    fn ok_fail_ok() -> (Arc<Recorder>, Arc<Recorder>, Arc<Recorder>) {
        (Recorder::new(), Recorder::failing(), Recorder::new())
    }

    #[test]
    fn test_short_circuit() {
        let (a, b, c) = ok_fail_ok();
        let m = Multi::new(vec![a.clone(), b.clone(), c.clone()], false);
        assert!(matches!(
            m.log(Severity::LOG_ERR.into(), &Message::from("x")),
            Err(Error::Transport { .. })
        ));
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 1);
        assert_eq!(c.calls(), 0);
    }

    #[test]
    fn test_try_all() {
        let (a, b, c) = ok_fail_ok();
        let m = Multi::default()
            .push(a.clone())
            .push(b.clone())
            .push(c.clone())
            .try_all(true);
        assert!(matches!(
            m.log(Severity::LOG_ERR.into(), &Message::from("x")),
            Err(Error::Transport { .. })
        ));
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 1);
        assert_eq!(c.calls(), 1);
    }

    #[test]
    fn test_first_failure_wins() {
        // Distinguish the two failures by shape: the second backend rejects non-text messages
        struct Picky;
        impl Syslogger for Picky {
            fn log(&self, _: Priority, _: &Message) -> Result<()> {
                Err(Error::unsupported("Picky", "renderable"))
            }
        }
        let m = Multi::new(vec![Recorder::failing(), Arc::new(Picky)], true);
        assert!(matches!(
            m.log(Severity::LOG_ERR.into(), &Message::from("x")),
            Err(Error::Transport { .. })
        ));
    }

    #[test]
    fn test_empty() {
        assert!(Multi::default()
            .log(Severity::LOG_ERR.into(), &Message::from("x"))
            .is_ok());
    }
}
