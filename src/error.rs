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

//! [posixish-syslog](crate) errors

use crate::{facility::Facility, options::Options, priority::Priority};

use backtrace::Backtrace;

/// [posixish-syslog](crate) error type
///
/// Every backend in this crate speaks the same error type so that wrappers (fallthrough chains,
/// broadcasts, deferred initialization) can forward failures without re-boxing them. Like the
/// rest of the crate it's a plain enumeration rather than something built on [thiserror] or
/// [anyhow]; each variant records a [`Backtrace`] taken where the failure was first noticed.
///
/// [thiserror]: https://docs.rs/thiserror
/// [anyhow]: https://docs.rs/anyhow
#[non_exhaustive]
pub enum Error {
    /// `LOG_ODELAY` and `LOG_NDELAY` were both requested
    ConflictingDelayOptions { options: Options, back: Backtrace },
    /// Bits outside the known option flags were set
    UnknownOptions { bits: u8, back: Backtrace },
    /// A facility value was not one of the twenty-four defined codes (or carried severity bits)
    InvalidFacility { value: u8, back: Backtrace },
    /// A severity value was outside 0-7
    InvalidSeverity { value: u8, back: Backtrace },
    /// A symbolic name (`LOG_USER`, `LOG_PID`, ...) wasn't recognized
    UnknownName {
        kind: &'static str,
        name: String,
        back: Backtrace,
    },
    /// A deferred backend was requested without a factory to build it
    NoFactory { back: Backtrace },
    /// A fallthrough chain had neither a default nor a fallback backend
    NoBackend { back: Backtrace },
    /// No daemon, console or fallback was available to a session
    NoDeliveryMechanism { back: Backtrace },
    /// A backend was handed a message shape it doesn't support
    UnsupportedMessage {
        backend: &'static str,
        kind: &'static str,
        back: Backtrace,
    },
    /// A raw sink was handed a non-zero priority
    UnexpectedPriority {
        backend: &'static str,
        priority: Priority,
        back: Backtrace,
    },
    /// A message's facility didn't match the facility its backend was built for
    FacilityMismatch {
        expected: Facility,
        actual: Priority,
        back: Backtrace,
    },
    /// A formatted message exceeded its wire format's limit
    MessageTooLong {
        len: usize,
        max: usize,
        back: Backtrace,
    },
    /// Non-compliant hostname provided
    BadHostname { name: Vec<u8>, back: Backtrace },
    /// Neither this host's name nor its IP address could be determined
    NoHostname {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        back: Backtrace,
    },
    /// A formatter produced bytes that aren't valid UTF-8
    Encoding {
        source: std::string::FromUtf8Error,
        back: Backtrace,
    },
    /// The backend (or the resource underneath it) has been closed
    Closed { what: &'static str, back: Backtrace },
    /// The session was re-opened or closed while a deferred build was pending
    Reconfigured { back: Backtrace },
    /// The process-wide default session was used before it was installed
    NotInitialized { back: Backtrace },
    /// I/O error
    Io {
        source: std::io::Error,
        back: Backtrace,
    },
    /// General transport layer error
    Transport {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        back: Backtrace,
    },
}

impl Error {
    pub(crate) fn unsupported(backend: &'static str, kind: &'static str) -> Error {
        Error::UnsupportedMessage {
            backend,
            kind,
            back: Backtrace::new(),
        }
    }
    pub(crate) fn closed(what: &'static str) -> Error {
        Error::Closed {
            what,
            back: Backtrace::new(),
        }
    }
    pub(crate) fn transport<E>(err: E) -> Error
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Error::Transport {
            source: err.into(),
            back: Backtrace::new(),
        }
    }
    /// The backtrace captured when this error was constructed
    pub fn backtrace(&self) -> &Backtrace {
        match self {
            Error::ConflictingDelayOptions { back, .. }
            | Error::UnknownOptions { back, .. }
            | Error::InvalidFacility { back, .. }
            | Error::InvalidSeverity { back, .. }
            | Error::UnknownName { back, .. }
            | Error::NoFactory { back }
            | Error::NoBackend { back }
            | Error::NoDeliveryMechanism { back }
            | Error::UnsupportedMessage { back, .. }
            | Error::UnexpectedPriority { back, .. }
            | Error::FacilityMismatch { back, .. }
            | Error::MessageTooLong { back, .. }
            | Error::BadHostname { back, .. }
            | Error::NoHostname { back, .. }
            | Error::Encoding { back, .. }
            | Error::Closed { back, .. }
            | Error::Reconfigured { back }
            | Error::NotInitialized { back }
            | Error::Io { back, .. }
            | Error::Transport { back, .. } => back,
        }
    }
}

impl std::convert::From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            source: err,
            back: Backtrace::new(),
        }
    }
}

impl std::fmt::Display for Error {
    // `Error` is non-exhaustive so that adding variants won't be a breaking change to our
    // callers. That means the compiler won't catch us if we miss a variant here, so we
    // always include a `_` arm.
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::ConflictingDelayOptions { options, .. } => write!(
                f,
                "LOG_ODELAY and LOG_NDELAY are mutually exclusive, but both were given ({})",
                options
            ),
            Error::UnknownOptions { bits, .. } => write!(
                f,
                "{:#04x} contains bits that are not known option flags",
                bits
            ),
            Error::InvalidFacility { value, .. } => write!(
                f,
                "{:#04x} is not one of the 24 syslog facilities (LOG_KERN through LOG_LOCAL7)",
                value
            ),
            Error::InvalidSeverity { value, .. } => {
                write!(f, "{} is not a syslog severity (0-7)", value)
            }
            Error::UnknownName { kind, name, .. } => {
                write!(f, "{:?} is not a known syslog {}", name, kind)
            }
            Error::NoFactory { .. } => write!(
                f,
                "A deferred backend needs a factory for building the real backend, but none was given"
            ),
            Error::NoBackend { .. } => write!(
                f,
                "A fallthrough chain needs at least one backend, but neither a default nor a \
                 fallback was configured: no usable backend"
            ),
            Error::NoDeliveryMechanism { .. } => write!(
                f,
                "Unable to reach syslogd (or the system console, if requested), and LOG_NOFALLBACK \
                 is set without LOG_PERROR: no delivery mechanism available"
            ),
            Error::UnsupportedMessage { backend, kind, .. } => write!(
                f,
                "{} does not support {} messages",
                backend, kind
            ),
            Error::UnexpectedPriority {
                backend, priority, ..
            } => write!(
                f,
                "{} cannot differentiate between priorities and expects a zero priority, but got {}",
                backend, priority
            ),
            Error::FacilityMismatch {
                expected, actual, ..
            } => write!(
                f,
                "This backend was created for facility {}, but was asked to log at {}",
                expected, actual
            ),
            Error::MessageTooLong { len, max, .. } => write!(
                f,
                "The formatted message is {} bytes long, but the limit is {} bytes",
                len, max
            ),
            Error::BadHostname { name, .. } => {
                write!(f, "{:?} is not an RFC3164-compliant hostname", name)
            }
            Error::NoHostname { source, .. } => {
                write!(f, "Couldn't determine a hostname or IP address: {}", source)
            }
            Error::Encoding { source, .. } => {
                write!(f, "Formatted message is not valid UTF-8: {}", source)
            }
            Error::Closed { what, .. } => write!(f, "{} has been closed", what),
            Error::Reconfigured { .. } => write!(
                f,
                "The session was re-opened or closed before its backend could be built"
            ),
            Error::NotInitialized { .. } => write!(
                f,
                "The default syslog session has not been initialized"
            ),
            Error::Io { source, .. } => write!(f, "I/O error: {}", source),
            Error::Transport { source, .. } => write!(f, "Transport error: {}", source),
            _ => write!(f, "Other posixish-syslog error"),
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}\n{:?}", self, self.backtrace())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Transport { source, .. } => Some(source.as_ref()),
            Error::NoHostname { source, .. } => Some(source.as_ref()),
            Error::Encoding { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
