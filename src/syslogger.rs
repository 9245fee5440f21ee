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

//! The backend contract
//!
//! Everything in this crate that can accept a log message implements [`Syslogger`]. Wrappers
//! ([`SeverityFilter`], [`Fallthrough`], [`Multi`], [`NoWait`], [`Delay`]) hold other
//! [`Syslogger`]s, formatting adapters ([`Rfc3164`], [`HumanReadable`], [`Newliner`]) rewrite the
//! message & pass it on, and sinks ([`Writer`], [`NativeSyslog`]) finally put bytes somewhere.
//!
//! Sinks that hold an OS resource additionally implement [`Close`].
//!
//! [`SeverityFilter`]: crate::filter::SeverityFilter
//! [`Fallthrough`]: crate::fallthrough::Fallthrough
//! [`Multi`]: crate::multi::Multi
//! [`NoWait`]: crate::nowait::NoWait
//! [`Delay`]: crate::delay::Delay
//! [`Rfc3164`]: crate::rfc3164::Rfc3164
//! [`HumanReadable`]: crate::human_readable::HumanReadable
//! [`Newliner`]: crate::newliner::Newliner
//! [`Writer`]: crate::writer::Writer
//! [`NativeSyslog`]: crate::native::NativeSyslog

use crate::{error::Result, message::Message, priority::Priority};

use std::sync::Arc;

/// Log one message at one priority
///
/// Implementations must be callable from many threads at once, and must not stash the priority
/// they were handed for use on later calls.
pub trait Syslogger: Send + Sync {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()>;
}

impl<T: Syslogger + ?Sized> Syslogger for Arc<T> {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()> {
        (**self).log(priority, msg)
    }
}

impl<T: Syslogger + ?Sized> Syslogger for Box<T> {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()> {
        (**self).log(priority, msg)
    }
}

/// Release an underlying OS resource
///
/// Once closed, further calls to [`Syslogger::log`] on the same value fail with
/// [`Error::Closed`](crate::error::Error::Closed). Closing twice is not an error.
pub trait Close: Send + Sync {
    fn close(&self) -> Result<()>;
}

impl<T: Close + ?Sized> Close for Arc<T> {
    fn close(&self) -> Result<()> {
        (**self).close()
    }
}

/// A [`Syslogger`] that must be [closed](Close) when its session ends
pub trait Resource: Syslogger + Close {}

impl<T: Syslogger + Close> Resource for T {}

/// View a shared [`Resource`] as a [`Syslogger`]
pub fn as_syslogger(r: &Arc<dyn Resource>) -> Arc<dyn Syslogger> {
    Arc::new(Arc::clone(r))
}

/// View a shared [`Resource`] as something to be [closed](Close)
pub fn as_close(r: &Arc<dyn Resource>) -> Arc<dyn Close> {
    Arc::new(Arc::clone(r))
}
