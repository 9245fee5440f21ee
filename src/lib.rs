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

//! POSIX-style [`syslog`] sessions built from small, composable backends
//!
//! [`syslog`]: https://man7.org/linux/man-pages/man3/syslog.3.html
//!
//! # Introduction
//!
//! The C library's `openlog`/`syslog`/`closelog` trio hides a surprising amount of policy: connect
//! now or on first use, fall back to the console, mirror to standard error, and so on. This crate
//! keeps those semantics but makes the machinery underneath explicit. Every piece implements one
//! trait, [`Syslogger`]:
//!
//! ```text
//! fn log(&self, priority: Priority, msg: &Message) -> Result<()>;
//! ```
//!
//! and the pieces stack:
//!
//! - [`SeverityFilter`] drops messages by severity
//! - [`Fallthrough`] tries one backend, then another
//! - [`Multi`] broadcasts to several
//! - [`NoWait`] logs on a worker thread & returns at once
//! - [`Delay`] builds its backend on first use
//! - [`Rfc3164`], [`HumanReadable`] and [`Newliner`] format text
//! - [`Writer`], [`NativeSyslog`] & friends put bytes somewhere
//!
//! [`Posixish`] assembles them into a chain according to the classic `LOG_*` options.
//!
//! [`Syslogger`]: crate::syslogger::Syslogger
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
//! [`Posixish`]: crate::posixish::Posixish
//!
//! # Usage
//!
//! ```no_run
//! use posixish_syslog::{
//!     facility::{Facility, Severity},
//!     options::Options,
//!     posixish::Posixish,
//! };
//!
//! let session = Posixish::new();
//! // Mirror everything to stderr, and write to the console if syslogd is down
//! session
//!     .open("mydaemon", Options::PID | Options::CONS | Options::PERROR, Facility::LOG_DAEMON)
//!     .unwrap();
//! session.syslog(Severity::LOG_NOTICE.into(), "Hello, world!").unwrap();
//! session.close().unwrap();
//! ```
//!
//! Or hand-build a chain:
//!
//! ```rust
//! use posixish_syslog::{
//!     facility::{Facility, Severity},
//!     fallthrough::Fallthrough,
//!     rfc3164::Rfc3164,
//!     syslogger::Syslogger,
//!     writer::Stderr,
//! };
//! use std::sync::Arc;
//!
//! let stderr: Arc<dyn Syslogger> =
//!     Arc::new(Rfc3164::builder(Arc::new(Stderr)).ident("example").build());
//! let chain = Fallthrough::from_parts(None, Some(stderr));
//! chain.log(Facility::LOG_LOCAL0 | Severity::LOG_INFO, &"Hello, world!".into()).unwrap();
//! ```
//!
//! A [`tracing-subscriber`] [`Layer`](crate::layer::Layer) is provided for routing [`tracing`]
//! events into any of the above; a process-wide default session lives in [`global`].
//!
//! [`tracing-subscriber`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/index.html
//! [`tracing`]: https://docs.rs/tracing/latest/tracing/index.html

pub mod byte_utils;
pub mod config;
pub mod delay;
pub mod error;
pub mod facility;
pub mod fallthrough;
pub mod filter;
pub mod global;
pub mod human_readable;
pub mod layer;
pub mod mask;
pub mod message;
pub mod multi;
pub mod native;
pub mod newliner;
pub mod nowait;
pub mod options;
pub mod posixish;
pub mod priority;
pub mod rfc3164;
pub mod syslogger;
pub mod transport;
pub mod writer;

#[cfg(test)]
mod testing;
