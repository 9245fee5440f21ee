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

//! Drop messages by severity

use crate::{
    error::Result, mask::SeverityMask, message::Message, priority::Priority, syslogger::Syslogger,
};

use std::sync::Arc;

/// Forward only those messages whose severity is allowed by a [`SeverityMask`]
///
/// A suppressed message is reported as successfully logged.
pub struct SeverityFilter {
    inner: Arc<dyn Syslogger>,
    mask: SeverityMask,
}

impl SeverityFilter {
    pub fn new(inner: Arc<dyn Syslogger>, mask: SeverityMask) -> SeverityFilter {
        SeverityFilter { inner, mask }
    }
    pub fn mask(&self) -> SeverityMask {
        self.mask
    }
}

impl Syslogger for SeverityFilter {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()> {
        if self.mask.masked(priority.severity()) {
            return Ok(());
        }
        self.inner.log(priority, msg)
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::{facility::Severity, testing::Recorder};

    #[test]
    fn test_filter() {
        let rec = Recorder::new();
        let filt = SeverityFilter::new(rec.clone(), SeverityMask::up_to(Severity::LOG_ERR));
        for s in Severity::ALL {
            filt.log(s.into(), &Message::from(s.name())).unwrap();
        }
        assert_eq!(
            rec.messages(),
            vec!["LOG_EMERG", "LOG_ALERT", "LOG_CRIT", "LOG_ERR"]
        );
    }

    #[test]
    fn test_masked_message_never_reaches_failing_backend() {
        let rec = Recorder::failing();
        let filt = SeverityFilter::new(rec.clone(), SeverityMask::only(Severity::LOG_INFO));
        assert!(filt
            .log(Severity::LOG_DEBUG.into(), &Message::from("quiet"))
            .is_ok());
        assert!(filt
            .log(Severity::LOG_INFO.into(), &Message::from("loud"))
            .is_err());
        assert_eq!(rec.calls(), 1);
    }
}
