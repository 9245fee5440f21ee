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

//! Human-readable message formatting
//!
//! [`HumanReadable`] spells the facility & severity out by name, which is handy when the output is
//! meant for a terminal or a plain log file rather than a syslog daemon:
//!
//! ```text
//! LOG_DAEMON LOG_ERR Thu Mar  7 09:05:02 PST 2024 bree mydaemon[1234] something broke
//! ```

use crate::{
    byte_utils::program_name,
    error::Result,
    facility::Facility,
    message::Message,
    priority::Priority,
    rfc3164::Rfc3164Hostname,
    syslogger::Syslogger,
};

use chrono::prelude::*;

use std::sync::Arc;

/// Render messages for people, then forward them as text at the zero priority
pub struct HumanReadable {
    inner: Arc<dyn Syslogger>,
    ident: String,
    facility: Facility,
    pid: bool,
    hostname: String,
}

impl HumanReadable {
    pub fn new(inner: Arc<dyn Syslogger>) -> HumanReadable {
        HumanReadable {
            inner,
            ident: String::new(),
            facility: Facility::LOG_USER,
            pid: false,
            hostname: Rfc3164Hostname::default().to_string(),
        }
    }
    /// An empty ident means "use the program name"
    pub fn ident(mut self, ident: &str) -> Self {
        self.ident = ident.to_string();
        self
    }
    pub fn facility(mut self, facility: Facility) -> Self {
        self.facility = facility;
        self
    }
    pub fn pid(mut self, pid: bool) -> Self {
        self.pid = pid;
        self
    }
    pub fn hostname(mut self, hostname: Rfc3164Hostname) -> Self {
        self.hostname = hostname.to_string();
        self
    }
    pub fn format(&self, priority: Priority, content: &str, timestamp: DateTime<Local>) -> String {
        let priority = priority.or_facility(self.facility);
        let facility = priority.facility().unwrap_or(self.facility);
        let mut ident = if self.ident.is_empty() {
            program_name()
        } else {
            self.ident.clone()
        };
        if self.pid {
            ident = format!("{}[{}]", ident, std::process::id());
        }
        format!(
            "{} {} {} {} {} {}",
            facility,
            priority.severity(),
            timestamp.format("%a %b %e %H:%M:%S %Z %Y"),
            self.hostname,
            ident,
            content
        )
    }
}

impl Syslogger for HumanReadable {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()> {
        let line = self.format(priority, &msg.render(), Local::now());
        self.inner.log(Priority::default(), &Message::Text(line))
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::{facility::Severity, testing::Recorder};

    fn timestamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap()
    }

    #[test]
    fn test_format() {
        let h = HumanReadable::new(Recorder::new())
            .ident("mydaemon")
            .facility(Facility::LOG_DAEMON)
            .hostname(Rfc3164Hostname::try_from("bree".to_string()).unwrap());
        let line = h.format(Severity::LOG_ERR.into(), "something broke", timestamp());
        assert!(line.starts_with("LOG_DAEMON LOG_ERR Thu Mar  7 09:05:02 "));
        assert!(line.ends_with(" 2024 bree mydaemon something broke"));

        let line = h.format(Facility::LOG_MAIL | Severity::LOG_DEBUG, "x", timestamp());
        assert!(line.starts_with("LOG_MAIL LOG_DEBUG "));

        let h = h.pid(true);
        let line = h.format(Severity::LOG_INFO.into(), "x", timestamp());
        assert!(line.ends_with(&format!(" bree mydaemon[{}] x", std::process::id())));
    }

    #[test]
    fn test_accepts_every_shape() {
        let rec = Recorder::new();
        let h = HumanReadable::new(rec.clone()).ident("me");
        h.log(Severity::LOG_INFO.into(), &Message::from("text"))
            .unwrap();
        h.log(Severity::LOG_INFO.into(), &Message::renderable(17))
            .unwrap();
        h.log(
            Severity::LOG_INFO.into(),
            &Message::error(std::io::Error::new(std::io::ErrorKind::Other, "oops")),
        )
        .unwrap();
        let records = rec.records();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|(p, _)| *p == Priority::default()));
        assert!(records[0].1.starts_with("LOG_USER LOG_INFO "));
        assert!(records[0].1.ends_with(" me text"));
        assert!(records[1].1.ends_with(" me 17"));
        assert!(records[2].1.ends_with(" me oops"));
    }
}
