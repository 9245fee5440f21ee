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

//! Formatting messages the BSD syslog way
//!
//! # Introduction
//!
//! [`Rfc3164`] is a formatting adapter: it renders each message according to RFC [3164] (AKA the
//! BSD syslog protocol) & hands the result, as plain text at the zero priority, to the backend it
//! wraps.
//!
//! [3164]: https://datatracker.ietf.org/doc/html/rfc3164
//!
//! The session orchestrator uses it to write syslog-style lines to the console & to standard
//! error:
//!
//! ```text
//! <14>Jun 23 16:10:55 hostname appname[pid]: Hello, world!
//! ```
//!
//! The RFC limits the entire packet to 1024 bytes. Messages that would exceed that are rejected
//! with [`Error::MessageTooLong`], not truncated.

use crate::{
    byte_utils::{bytes_from_os_str, program_name},
    error::{Error, Result},
    facility::Facility,
    message::Message,
    priority::Priority,
    syslogger::Syslogger,
};

use backtrace::Backtrace;
use chrono::prelude::*;

use std::sync::Arc;

type StdResult<T, E> = std::result::Result<T, E>;

/// Maximum length, in bytes, of an RFC 3164 message
pub const MAX_LEN: usize = 1024;

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                         utility types                                          //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A `String` with the additional constraint that its contents be ASCII above the value 32 (space)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rfc3164Hostname(String);

impl Rfc3164Hostname {
    /// Validate `bytes` as a HOSTNAME field: non-empty, printable ASCII without spaces.
    ///
    /// The RFC wants a bare host name (no domain) or an IP address; which one is left to the
    /// caller, though [`Rfc3164Hostname::try_default`] always strips the domain.
    pub fn new(bytes: Vec<u8>) -> Result<Rfc3164Hostname> {
        if !bytes.is_empty() && bytes.iter().all(|&x| x > 32 && x < 128) {
            // All ASCII, so this can't fail
            String::from_utf8(bytes)
                .map(Rfc3164Hostname)
                .map_err(|err| Error::BadHostname {
                    name: err.into_bytes(),
                    back: Backtrace::new(),
                })
        } else {
            Err(Error::BadHostname {
                name: bytes,
                back: Backtrace::new(),
            })
        }
    }
    /// "host.example.com" -> "host"
    fn strip_domain(mut bytes: Vec<u8>) -> Vec<u8> {
        if let Some(idx) = bytes.iter().position(|&x| x == b'.') {
            bytes.truncate(idx);
        }
        bytes
    }
    /// Attempt to figure-out an RFC [3164]-compliant hostname: the host name (sans domain) if
    /// that's compliant, else this host's IP address.
    ///
    /// [3164]: https://datatracker.ietf.org/doc/html/rfc3164
    pub fn try_default() -> Result<Rfc3164Hostname> {
        hostname::get()
            .map_err(Error::from)
            .and_then(|hn| {
                Rfc3164Hostname::new(Rfc3164Hostname::strip_domain(bytes_from_os_str(hn)))
            })
            .or_else(|_err| {
                local_ip_address::local_ip()
                    .map(|ip| Rfc3164Hostname(ip.to_string()))
                    .map_err(|err| Error::NoHostname {
                        source: err.to_string().into(),
                        back: Backtrace::new(),
                    })
            })
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::default::Default for Rfc3164Hostname {
    /// [`Rfc3164Hostname::try_default`], or "localhost" if that fails
    fn default() -> Self {
        Rfc3164Hostname::try_default().unwrap_or_else(|_| Rfc3164Hostname("localhost".to_string()))
    }
}

impl std::convert::TryFrom<String> for Rfc3164Hostname {
    type Error = Error;
    fn try_from(x: String) -> StdResult<Self, Self::Error> {
        Rfc3164Hostname::new(x.into_bytes())
    }
}

impl std::fmt::Display for Rfc3164Hostname {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "{}", self.0)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                        the adapter                                             //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A formatting adapter that produces RFC [3164]-conformant syslog messages.
///
/// [3164]: https://datatracker.ietf.org/doc/html/rfc3164
///
/// All three message shapes are accepted. A message whose priority carries no (or an invalid)
/// facility is logged at this instance's facility.
///
/// # Character encoding
///
/// The RFC expects seven-bit ASCII, yet daemons take UTF-8 just fine. Content is therefore
/// passed through unchanged unless [escaping] is asked for.
///
/// [escaping]: str::escape_unicode
pub struct Rfc3164 {
    inner: Arc<dyn Syslogger>,
    facility: Facility,
    hostname: Rfc3164Hostname,
    tag: String,
    pid: Option<u32>,
    escape_unicode: bool,
}

impl Rfc3164 {
    /// Format for `inner` with the defaults: `LOG_USER`, this host's name, the program name as tag,
    /// and no PID
    pub fn new(inner: Arc<dyn Syslogger>) -> Rfc3164 {
        Rfc3164 {
            inner,
            facility: Facility::LOG_USER,
            hostname: Rfc3164Hostname::default(),
            tag: program_name(),
            pid: None,
            escape_unicode: false,
        }
    }
    pub fn builder(inner: Arc<dyn Syslogger>) -> Rfc3164Builder {
        Rfc3164Builder {
            imp: Rfc3164::new(inner),
        }
    }
    /// Render one message
    pub fn format(
        &self,
        priority: Priority,
        content: &str,
        timestamp: DateTime<Local>,
    ) -> Result<String> {
        let priority = priority.or_facility(self.facility);
        let mut buf = format!(
            "<{}>{} ",
            priority.into_raw(),
            timestamp.format("%b %_d %H:%M:%S"),
        )
        .into_bytes();

        use bytes::BufMut;
        buf.put_slice(self.hostname.as_str().as_bytes());

        // The MSG part has two fields known as the TAG field and the CONTENT field. The TAG is
        // the program name; "TAG[pid]:" is common & the left square bracket is then the first
        // character of the CONTENT field.
        buf.put_slice(b" ");
        buf.put_slice(self.tag.as_bytes());
        if let Some(pid) = self.pid {
            buf.put_slice(format!("[{}]", pid).as_bytes());
        }
        buf.put_slice(b": ");

        if self.escape_unicode {
            buf.put_slice(content.escape_unicode().to_string().as_bytes())
        } else {
            buf.put_slice(content.as_bytes())
        }

        if buf.len() > MAX_LEN {
            return Err(Error::MessageTooLong {
                len: buf.len(),
                max: MAX_LEN,
                back: Backtrace::new(),
            });
        }

        String::from_utf8(buf).map_err(|source| Error::Encoding {
            source,
            back: Backtrace::new(),
        })
    }
}

pub struct Rfc3164Builder {
    imp: Rfc3164,
}

impl Rfc3164Builder {
    pub fn facility(mut self, facility: Facility) -> Self {
        self.imp.facility = facility;
        self
    }
    pub fn hostname(mut self, hostname: Rfc3164Hostname) -> Self {
        self.imp.hostname = hostname;
        self
    }
    pub fn hostname_as_string(mut self, hostname: String) -> Result<Self> {
        self.imp.hostname = Rfc3164Hostname::try_from(hostname)?;
        Ok(self)
    }
    /// An empty ident leaves the program name in place
    pub fn ident(mut self, ident: &str) -> Self {
        if !ident.is_empty() {
            self.imp.tag = ident.to_string();
        }
        self
    }
    pub fn pid(mut self, pid: bool) -> Self {
        self.imp.pid = if pid { Some(std::process::id()) } else { None };
        self
    }
    pub fn escape_unicode(mut self, escape_unicode: bool) -> Self {
        self.imp.escape_unicode = escape_unicode;
        self
    }
    pub fn build(self) -> Rfc3164 {
        self.imp
    }
}

impl Syslogger for Rfc3164 {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()> {
        let line = self.format(priority, &msg.render(), Local::now())?;
        self.inner.log(Priority::default(), &Message::Text(line))
    }
}
