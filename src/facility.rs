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

//! syslog facility & severity defintions.
//!
//! [`Facility`] and [`Severity`] replicate the names used in `<syslog.h>`. They are (mostly)
//! identical in both RFC [3164] & [5424], and so [posixish-syslog](crate) models both with the
//! same enumeration.
//!
//! [3164]: https://datatracker.ietf.org/doc/html/rfc3164
//! [5424]: https://datatracker.ietf.org/doc/html/rfc5424

use crate::error::{Error, Result};

use backtrace::Backtrace;

type StdResult<T, E> = std::result::Result<T, E>;

/// Both RFCs [5424] & [3164] define twenty-four "facilities" for messages. The enumeration values
/// duplicate the constants defined in `<syslog.h>`, albeit multiplied by 8 for convenience in
/// forming syslog message headers (which again mirrors the `#define`s in `<syslog.h>`).
///
/// [5424]: https://datatracker.ietf.org/doc/html/rfc5424
/// [3164]: https://datatracker.ietf.org/doc/html/rfc3164
///
/// Note that `LOG_KERN` encodes as zero, which is also how a [`Priority`] says "no facility,
/// use the default". Backends that fill in a default facility therefore can't tell the two
/// apart; this mirrors the C API, where `LOG_KERN` can't be requested by user processes anyway.
///
/// [`Priority`]: crate::priority::Priority
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Facility {
    /// kernel messages
    LOG_KERN = 0 << 3,
    /// random user-level messages
    LOG_USER = 1 << 3,
    /// mail system
    LOG_MAIL = 2 << 3,
    /// system daemons
    LOG_DAEMON = 3 << 3,
    /// security/authorization messages
    LOG_AUTH = 4 << 3,
    /// messages generated internally by syslogd
    LOG_SYSLOG = 5 << 3,
    /// line printer subsystem
    LOG_LPR = 6 << 3,
    /// network news subsystem
    LOG_NEWS = 7 << 3,
    /// UUCP subsystem
    LOG_UUCP = 8 << 3,
    /// clock daemon
    LOG_CRON = 9 << 3,
    /// security/authorization messages (private)
    LOG_AUTHPRIV = 10 << 3,
    /// ftp daemon
    LOG_FTP = 11 << 3,
    /// NTP subsystem
    LOG_NTP = 12 << 3,
    /// log audit
    LOG_AUDIT = 13 << 3,
    /// log alert; most systems route this facility to the console
    LOG_CONSOLE = 14 << 3,
    /// clock daemon (the second of the two codes found in the wild)
    LOG_CRON2 = 15 << 3,
    /// reserved for local use
    LOG_LOCAL0 = 16 << 3,
    /// reserved for local use
    LOG_LOCAL1 = 17 << 3,
    /// reserved for local use
    LOG_LOCAL2 = 18 << 3,
    /// reserved for local use
    LOG_LOCAL3 = 19 << 3,
    /// reserved for local use
    LOG_LOCAL4 = 20 << 3,
    /// reserved for local use
    LOG_LOCAL5 = 21 << 3,
    /// reserved for local use
    LOG_LOCAL6 = 22 << 3,
    /// reserved for local use
    LOG_LOCAL7 = 23 << 3,
}

impl Facility {
    /// All twenty-four facilities, in numeric order.
    pub const ALL: [Facility; 24] = [
        Facility::LOG_KERN,
        Facility::LOG_USER,
        Facility::LOG_MAIL,
        Facility::LOG_DAEMON,
        Facility::LOG_AUTH,
        Facility::LOG_SYSLOG,
        Facility::LOG_LPR,
        Facility::LOG_NEWS,
        Facility::LOG_UUCP,
        Facility::LOG_CRON,
        Facility::LOG_AUTHPRIV,
        Facility::LOG_FTP,
        Facility::LOG_NTP,
        Facility::LOG_AUDIT,
        Facility::LOG_CONSOLE,
        Facility::LOG_CRON2,
        Facility::LOG_LOCAL0,
        Facility::LOG_LOCAL1,
        Facility::LOG_LOCAL2,
        Facility::LOG_LOCAL3,
        Facility::LOG_LOCAL4,
        Facility::LOG_LOCAL5,
        Facility::LOG_LOCAL6,
        Facility::LOG_LOCAL7,
    ];

    /// The facility's code (0-23), i.e. its encoded value shifted back down.
    pub const fn code(self) -> u8 {
        (self as u8) >> 3
    }

    pub const fn name(self) -> &'static str {
        match self {
            Facility::LOG_KERN => "LOG_KERN",
            Facility::LOG_USER => "LOG_USER",
            Facility::LOG_MAIL => "LOG_MAIL",
            Facility::LOG_DAEMON => "LOG_DAEMON",
            Facility::LOG_AUTH => "LOG_AUTH",
            Facility::LOG_SYSLOG => "LOG_SYSLOG",
            Facility::LOG_LPR => "LOG_LPR",
            Facility::LOG_NEWS => "LOG_NEWS",
            Facility::LOG_UUCP => "LOG_UUCP",
            Facility::LOG_CRON => "LOG_CRON",
            Facility::LOG_AUTHPRIV => "LOG_AUTHPRIV",
            Facility::LOG_FTP => "LOG_FTP",
            Facility::LOG_NTP => "LOG_NTP",
            Facility::LOG_AUDIT => "LOG_AUDIT",
            Facility::LOG_CONSOLE => "LOG_CONSOLE",
            Facility::LOG_CRON2 => "LOG_CRON2",
            Facility::LOG_LOCAL0 => "LOG_LOCAL0",
            Facility::LOG_LOCAL1 => "LOG_LOCAL1",
            Facility::LOG_LOCAL2 => "LOG_LOCAL2",
            Facility::LOG_LOCAL3 => "LOG_LOCAL3",
            Facility::LOG_LOCAL4 => "LOG_LOCAL4",
            Facility::LOG_LOCAL5 => "LOG_LOCAL5",
            Facility::LOG_LOCAL6 => "LOG_LOCAL6",
            Facility::LOG_LOCAL7 => "LOG_LOCAL7",
        }
    }
}

impl std::default::Default for Facility {
    /// The default facility is `LOG_USER`.
    fn default() -> Self {
        Facility::LOG_USER
    }
}

impl std::fmt::Display for Facility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "{}", self.name())
    }
}

/// Convert an encoded facility (a multiple of eight, as in `<syslog.h>`) to a [`Facility`].
impl std::convert::TryFrom<u8> for Facility {
    type Error = Error;
    fn try_from(value: u8) -> Result<Self> {
        if value & 0x07 != 0 {
            return Err(Error::InvalidFacility {
                value,
                back: Backtrace::new(),
            });
        }
        Facility::ALL
            .get(usize::from(value >> 3))
            .copied()
            .ok_or_else(|| Error::InvalidFacility {
                value,
                back: Backtrace::new(),
            })
    }
}

impl std::str::FromStr for Facility {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Facility::ALL
            .iter()
            .find(|f| f.name() == s)
            .copied()
            .ok_or_else(|| Error::UnknownName {
                kind: "facility",
                name: s.to_owned(),
                back: Backtrace::new(),
            })
    }
}

/// Both RFCs [5424] & [3164] define eight severity levels for messages. The enumeration values
/// duplicate the constants documented as per the `syslog()` manual [page] & defined in
/// `<syslog.h>`.
///
/// [5424]: https://datatracker.ietf.org/doc/html/rfc5424
/// [3164]: https://datatracker.ietf.org/doc/html/rfc3164
/// [page]: https://man7.org/linux/man-pages/man3/syslog.3.html
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Severity {
    /// system is unusable
    LOG_EMERG,
    /// action must be take immediately
    LOG_ALERT,
    /// critical conditions
    LOG_CRIT,
    /// error conditions
    LOG_ERR,
    /// warning conditions
    LOG_WARNING,
    /// normal, but significant condition
    LOG_NOTICE,
    /// informational message
    LOG_INFO,
    /// debug-level message
    LOG_DEBUG,
}

impl Severity {
    /// All eight severities, most urgent first.
    pub const ALL: [Severity; 8] = [
        Severity::LOG_EMERG,
        Severity::LOG_ALERT,
        Severity::LOG_CRIT,
        Severity::LOG_ERR,
        Severity::LOG_WARNING,
        Severity::LOG_NOTICE,
        Severity::LOG_INFO,
        Severity::LOG_DEBUG,
    ];

    /// Take the low three bits of `value`; every such pattern is a valid severity.
    pub const fn from_low_bits(value: u8) -> Severity {
        Severity::ALL[(value & 0x07) as usize]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Severity::LOG_EMERG => "LOG_EMERG",
            Severity::LOG_ALERT => "LOG_ALERT",
            Severity::LOG_CRIT => "LOG_CRIT",
            Severity::LOG_ERR => "LOG_ERR",
            Severity::LOG_WARNING => "LOG_WARNING",
            Severity::LOG_NOTICE => "LOG_NOTICE",
            Severity::LOG_INFO => "LOG_INFO",
            Severity::LOG_DEBUG => "LOG_DEBUG",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "{}", self.name())
    }
}

impl std::convert::TryFrom<u8> for Severity {
    type Error = Error;
    fn try_from(value: u8) -> Result<Self> {
        if value > 7 {
            Err(Error::InvalidSeverity {
                value,
                back: Backtrace::new(),
            })
        } else {
            Ok(Severity::from_low_bits(value))
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Severity::ALL
            .iter()
            .find(|x| x.name() == s)
            .copied()
            .ok_or_else(|| Error::UnknownName {
                kind: "severity",
                name: s.to_owned(),
                back: Backtrace::new(),
            })
    }
}
