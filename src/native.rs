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

//! Talking to the syslog daemon
//!
//! [`NativeSyslog`] is the backend closest to what `syslog(3)` does: it connects to the local
//! daemon's socket (or to a remote daemon over UDP or TCP) & writes one line per message. It is
//! bound to a single facility at construction time.
//!
//! Messages sent to the local daemon look like
//!
//! ```text
//! <30>Mar  7 09:05:02 mydaemon[1234]: Hello, world!
//! ```
//!
//! while messages sent over the network carry a full timestamp & the hostname:
//!
//! ```text
//! <30>2024-03-07T09:05:02-08:00 bree mydaemon[1234]: Hello, world!
//! ```
//!
//! If a send fails, [`NativeSyslog`] reconnects once & retries before reporting the failure.

use crate::{
    byte_utils::program_name,
    error::{Error, Result},
    facility::Facility,
    message::Message,
    priority::Priority,
    rfc3164::Rfc3164Hostname,
    syslogger::{Close, Syslogger},
    transport::{TcpTransport, Transport, UdpTransport},
};

use backtrace::Backtrace;
use chrono::prelude::*;
use tracing::debug;

use std::sync::RwLock;

#[cfg(unix)]
use crate::transport::{UnixSocket, UnixSocketStream};
#[cfg(unix)]
use std::path::PathBuf;

/// Where the local syslog daemon might be listening, in order of preference
#[cfg(unix)]
pub const LOCAL_SOCKETS: [&str; 3] = ["/dev/log", "/var/run/syslog", "/var/run/log"];

/// A remote (or at least non-default) syslog daemon
#[derive(Clone, Debug)]
pub enum Network {
    Udp(String),
    Tcp(String),
    /// A Unix socket other than the usual ones; datagram is tried first, then stream
    #[cfg(unix)]
    Unix(PathBuf),
}

#[derive(Clone, Debug)]
enum Target {
    Local,
    Remote(Network),
}

#[cfg(unix)]
fn connect_unix(path: &std::path::Path) -> Result<Box<dyn Transport>> {
    match UnixSocket::new(path) {
        Ok(t) => Ok(Box::new(t)),
        Err(_) => Ok(Box::new(UnixSocketStream::new(path)?)),
    }
}

impl Target {
    fn connect(&self) -> Result<Box<dyn Transport>> {
        match self {
            #[cfg(unix)]
            Target::Local => {
                let mut last = None;
                for path in LOCAL_SOCKETS {
                    match connect_unix(std::path::Path::new(path)) {
                        Ok(t) => return Ok(t),
                        Err(err) => {
                            debug!("Couldn't connect to syslogd at {}: {}", path, err);
                            last = Some(err);
                        }
                    }
                }
                Err(last.unwrap_or_else(|| Error::transport("no local syslog socket")))
            }
            #[cfg(not(unix))]
            Target::Local => Err(Error::transport("no local syslog socket on this platform")),
            Target::Remote(Network::Udp(addr)) => Ok(Box::new(UdpTransport::new(addr.as_str())?)),
            Target::Remote(Network::Tcp(addr)) => Ok(Box::new(TcpTransport::new(addr.as_str())?)),
            #[cfg(unix)]
            Target::Remote(Network::Unix(path)) => connect_unix(path),
        }
    }
}

/// A connection to a syslog daemon for one facility
pub struct NativeSyslog {
    facility: Facility,
    tag: String,
    pid: u32,
    hostname: String,
    target: Target,
    // `None` once closed
    conn: RwLock<Option<Box<dyn Transport>>>,
}

impl NativeSyslog {
    /// Connect to the local syslog daemon
    pub fn new(facility: Facility, ident: &str) -> Result<NativeSyslog> {
        NativeSyslog::connect(Target::Local, facility, ident)
    }
    /// Connect to the syslog daemon at `network`
    pub fn dial(network: Network, facility: Facility, ident: &str) -> Result<NativeSyslog> {
        NativeSyslog::connect(Target::Remote(network), facility, ident)
    }
    fn connect(target: Target, facility: Facility, ident: &str) -> Result<NativeSyslog> {
        let conn = target.connect()?;
        Ok(NativeSyslog {
            facility,
            tag: if ident.is_empty() {
                program_name()
            } else {
                ident.to_string()
            },
            pid: std::process::id(),
            hostname: Rfc3164Hostname::default().to_string(),
            target,
            conn: RwLock::new(Some(conn)),
        })
    }
    pub fn facility(&self) -> Facility {
        self.facility
    }
    /// Render one line, trailing newline included
    pub fn format(&self, priority: Priority, msg: &str, timestamp: DateTime<Local>) -> String {
        let prival = priority.with_facility(self.facility).into_raw();
        let nl = if msg.ends_with('\n') { "" } else { "\n" };
        match self.target {
            Target::Local => format!(
                "<{}>{} {}[{}]: {}{}",
                prival,
                timestamp.format("%b %e %H:%M:%S"),
                self.tag,
                self.pid,
                msg,
                nl
            ),
            Target::Remote(_) => format!(
                "<{}>{} {} {}[{}]: {}{}",
                prival,
                timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
                self.hostname,
                self.tag,
                self.pid,
                msg,
                nl
            ),
        }
    }
    fn send(&self, line: &[u8]) -> Result<()> {
        {
            let conn = self.conn.read().unwrap_or_else(|err| err.into_inner());
            match conn.as_ref() {
                Some(transport) => match transport.send(line) {
                    Ok(_) => return Ok(()),
                    Err(err) => debug!("syslog send failed ({}); reconnecting", err),
                },
                None => return Err(Error::closed("NativeSyslog")),
            }
        }
        let mut conn = self.conn.write().unwrap_or_else(|err| err.into_inner());
        if conn.is_none() {
            // closed while we were waiting
            return Err(Error::closed("NativeSyslog"));
        }
        let transport = self.target.connect()?;
        transport.send(line)?;
        *conn = Some(transport);
        Ok(())
    }
}

impl Syslogger for NativeSyslog {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()> {
        let text = msg
            .as_text()
            .ok_or_else(|| Error::unsupported("NativeSyslog", msg.kind()))?;
        if !priority.is_facility_unset() && priority.facility() != Some(self.facility) {
            return Err(Error::FacilityMismatch {
                expected: self.facility,
                actual: priority,
                back: Backtrace::new(),
            });
        }
        self.send(self.format(priority, text, Local::now()).as_bytes())
    }
}

impl Close for NativeSyslog {
    fn close(&self) -> Result<()> {
        self.conn
            .write()
            .unwrap_or_else(|err| err.into_inner())
            .take();
        Ok(())
    }
}
