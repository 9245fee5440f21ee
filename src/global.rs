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

//! The process-wide default session
//!
//! For programs that just want to call `syslog()` from anywhere. Nothing is set up implicitly: call
//! [`init_from_env`] (or [`set_default`] with a session of your own) early in `main`, before any
//! of the free functions in this module. Until then they fail with
//! [`Error::NotInitialized`]. Tests may swap the default out with [`set_default`] at any time.
//!
//! ```no_run
//! use posixish_syslog::{facility::Facility, global, options::Options};
//!
//! global::init_from_env().unwrap();
//! global::openlog("mydaemon", Options::PID, Facility::LOG_DAEMON).unwrap();
//! global::info("Hello, world!").unwrap();
//! global::closelog().unwrap();
//! ```

use crate::{
    config::Config,
    error::{Error, Result},
    facility::Severity,
    mask::SeverityMask,
    message::Message,
    options::Options,
    posixish::Posixish,
    priority::Priority,
};

use backtrace::Backtrace;

use std::sync::RwLock;

static DEFAULT: RwLock<Option<Posixish>> = RwLock::new(None);

/// Install `session` as the default, returning the one it replaces
pub fn set_default(session: Posixish) -> Option<Posixish> {
    DEFAULT
        .write()
        .unwrap_or_else(|err| err.into_inner())
        .replace(session)
}

/// Uninstall the default session, returning it
pub fn take_default() -> Option<Posixish> {
    DEFAULT.write().unwrap_or_else(|err| err.into_inner()).take()
}

/// A handle on the default session
pub fn default_session() -> Result<Posixish> {
    DEFAULT
        .read()
        .unwrap_or_else(|err| err.into_inner())
        .clone()
        .ok_or_else(|| Error::NotInitialized {
            back: Backtrace::new(),
        })
}

/// Open a session configured from the environment (see [`Config`]) & make it the default
pub fn init_from_env() -> Result<Posixish> {
    let session = Config::from_env().open()?;
    set_default(session.clone());
    Ok(session)
}

pub fn openlog<P: Into<Priority>>(ident: &str, options: Options, facility: P) -> Result<()> {
    default_session()?.open(ident, options, facility)
}

pub fn closelog() -> Result<()> {
    default_session()?.close()
}

pub fn setlogmask(mask: SeverityMask) -> Result<()> {
    default_session()?.set_log_mask(mask);
    Ok(())
}

/// Log `msg` to the default session; the message is rendered to text first
pub fn syslog<M: Into<Message>>(priority: Priority, msg: M) -> Result<()> {
    default_session()?.syslog(priority, msg.into().into_text())
}

pub fn emerg<M: Into<Message>>(msg: M) -> Result<()> {
    syslog(Severity::LOG_EMERG.into(), msg)
}

pub fn alert<M: Into<Message>>(msg: M) -> Result<()> {
    syslog(Severity::LOG_ALERT.into(), msg)
}

pub fn crit<M: Into<Message>>(msg: M) -> Result<()> {
    syslog(Severity::LOG_CRIT.into(), msg)
}

pub fn err<M: Into<Message>>(msg: M) -> Result<()> {
    syslog(Severity::LOG_ERR.into(), msg)
}

pub fn warning<M: Into<Message>>(msg: M) -> Result<()> {
    syslog(Severity::LOG_WARNING.into(), msg)
}

pub fn notice<M: Into<Message>>(msg: M) -> Result<()> {
    syslog(Severity::LOG_NOTICE.into(), msg)
}

pub fn info<M: Into<Message>>(msg: M) -> Result<()> {
    syslog(Severity::LOG_INFO.into(), msg)
}

pub fn debug<M: Into<Message>>(msg: M) -> Result<()> {
    syslog(Severity::LOG_DEBUG.into(), msg)
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::{facility::Facility, testing::FakePlatform};

    // The default session is process-wide, so everything touching it lives in one test
    #[test]
    fn test_default_session() {
        take_default();
        assert!(matches!(info("nobody home"), Err(Error::NotInitialized { .. })));
        assert!(matches!(closelog(), Err(Error::NotInitialized { .. })));

        let platform = FakePlatform::working();
        let native = platform.native.clone().unwrap();
        assert!(set_default(Posixish::with_platform(platform)).is_none());

        openlog("global", Options::NDELAY, Facility::LOG_LOCAL5).unwrap();
        assert_eq!(default_session().unwrap().ident(), "global");
        setlogmask(SeverityMask::up_to(Severity::LOG_NOTICE)).unwrap();

        emerg("e").unwrap();
        alert("a").unwrap();
        crit("c").unwrap();
        err(Message::error(std::io::Error::new(
            std::io::ErrorKind::Other,
            "rendered",
        )))
        .unwrap();
        warning("w").unwrap();
        notice("n").unwrap();
        info("i").unwrap();
        debug("d").unwrap();

        assert_eq!(native.messages(), vec!["e", "a", "c", "rendered", "w", "n"]);
        let severities: Vec<Severity> = native
            .records()
            .into_iter()
            .map(|(p, _)| p.severity())
            .collect();
        assert_eq!(severities, Severity::ALL[..6].to_vec());

        closelog().unwrap();
        assert_eq!(native.times_closed(), 1);
        assert!(take_default().is_some());
    }
}
