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

//! Try one backend, then another

use crate::{
    error::{Error, Result},
    message::Message,
    priority::Priority,
    syslogger::Syslogger,
};

use backtrace::Backtrace;

use std::sync::Arc;

/// Log to a default backend; if that fails, log to a fallback
///
/// A message that the default rejects part-way through may be delivered twice.
#[derive(Default)]
pub struct Fallthrough {
    default: Option<Arc<dyn Syslogger>>,
    fallthrough: Option<Arc<dyn Syslogger>>,
}

impl Fallthrough {
    pub fn new(default: Arc<dyn Syslogger>, fallthrough: Arc<dyn Syslogger>) -> Fallthrough {
        Fallthrough {
            default: Some(default),
            fallthrough: Some(fallthrough),
        }
    }
    pub fn from_parts(
        default: Option<Arc<dyn Syslogger>>,
        fallthrough: Option<Arc<dyn Syslogger>>,
    ) -> Fallthrough {
        Fallthrough {
            default,
            fallthrough,
        }
    }
}

impl Syslogger for Fallthrough {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()> {
        let first = match &self.default {
            Some(default) => match default.log(priority, msg) {
                Ok(()) => return Ok(()),
                Err(err) => Some(err),
            },
            None => None,
        };
        match (&self.fallthrough, first) {
            (Some(fallthrough), _) => fallthrough.log(priority, msg),
            (None, Some(err)) => Err(err),
            (None, None) => Err(Error::NoBackend {
                back: Backtrace::new(),
            }),
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::{facility::Severity, testing::Recorder};

    #[test]
    fn test_failing_default() {
        let default = Recorder::failing();
        let fallback = Recorder::new();
        let f = Fallthrough::new(default.clone(), fallback.clone());
        assert!(f
            .log(Severity::LOG_INFO.into(), &Message::from("hi"))
            .is_ok());
        assert_eq!(default.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }

    #[test]
    fn test_working_default() {
        let default = Recorder::new();
        let fallback = Recorder::new();
        let f = Fallthrough::new(default.clone(), fallback.clone());
        f.log(Severity::LOG_INFO.into(), &Message::from("hi"))
            .unwrap();
        assert_eq!(default.calls(), 1);
        assert_eq!(fallback.calls(), 0);
    }

    #[test]
    fn test_missing_backends() {
        let f = Fallthrough::default();
        assert!(matches!(
            f.log(Severity::LOG_INFO.into(), &Message::from("hi")),
            Err(Error::NoBackend { .. })
        ));

        // Only a fallback
        let fallback = Recorder::new();
        let f = Fallthrough::from_parts(None, Some(fallback.clone()));
        f.log(Severity::LOG_INFO.into(), &Message::from("hi"))
            .unwrap();
        assert_eq!(fallback.calls(), 1);

        // Only a (failing) default: its error comes back
        let f = Fallthrough::from_parts(Some(Recorder::failing()), None);
        assert!(matches!(
            f.log(Severity::LOG_INFO.into(), &Message::from("hi")),
            Err(Error::Transport { .. })
        ));
    }
}
