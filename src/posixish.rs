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

//! `openlog`/`syslog`/`closelog` sessions
//!
//! # Introduction
//!
//! [`Posixish`] gives the POSIX logging calls' semantics on top of the composable backends in this
//! crate. [`Posixish::open`] records an ident, a set of [`Options`] & a facility; the first message
//! logged after that (or the `open` call itself, given `LOG_NDELAY`) assembles a chain of backends
//! that reflects those options:
//!
//! 1. a connection to the local syslog daemon, if there is one
//! 2. with `LOG_CONS`, the system console as a fallback behind it
//! 3. with `LOG_PERROR`, standard error alongside whatever came out of steps 1 & 2
//! 4. without `LOG_PERROR`, standard error as a last-resort fallback; `LOG_NOFALLBACK` turns that
//!    off, in which case having nothing from steps 1 & 2 is an error
//! 5. with `LOG_NOWAIT`, all of that handed off to a pool of worker threads
//!
//! Transports that can't be reached degrade the chain rather than failing it.
//!
//! # Locking
//!
//! Session state lives behind an [`RwLock`]. Logging takes the read side just long enough to clone
//! a reference to the current chain, then logs outside the lock. `open`, `close` & `set_log_mask`
//! take the write side. A deferred build takes the write side too, but only from inside
//! [`Delay`]'s own build lock; so it never runs while the session lock is held by the same thread.
//!
//! Each `open` or `close` bumps a generation counter. A deferred build that finds the generation
//! moved on fails with [`Error::Reconfigured`] instead of building a chain for stale settings.

use crate::{
    delay::Delay,
    error::{Error, Result},
    facility::Facility,
    fallthrough::Fallthrough,
    filter::SeverityFilter,
    mask::SeverityMask,
    message::Message,
    multi::Multi,
    native::NativeSyslog,
    newliner::Newliner,
    nowait::NoWait,
    options::Options,
    priority::Priority,
    rfc3164::Rfc3164,
    syslogger::{as_close, as_syslogger, Close, Resource, Syslogger},
    writer::{DevConsole, Stderr},
};

use backtrace::Backtrace;
use tracing::{debug, warn};

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                        the platform seam                                       //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Where a session's transports come from
///
/// [`System`] is the real thing; tests substitute transports that fail or record on demand.
pub trait Platform: Send + Sync {
    /// A connection to the syslog daemon for `facility` & `ident`
    fn native(&self, facility: Facility, ident: &str) -> Result<Arc<dyn Resource>>;
    /// The system console
    fn console(&self) -> Result<Arc<dyn Resource>>;
    /// This process' standard error
    fn stderr(&self) -> Arc<dyn Syslogger>;
}

/// The local syslog daemon, `/dev/console` & the real standard error
#[derive(Clone, Copy, Debug, Default)]
pub struct System;

impl Platform for System {
    fn native(&self, facility: Facility, ident: &str) -> Result<Arc<dyn Resource>> {
        Ok(Arc::new(NativeSyslog::new(facility, ident)?))
    }
    fn console(&self) -> Result<Arc<dyn Resource>> {
        Ok(Arc::new(DevConsole::open()?))
    }
    fn stderr(&self) -> Arc<dyn Syslogger> {
        Arc::new(Stderr)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                         session state                                          //
////////////////////////////////////////////////////////////////////////////////////////////////////

struct State {
    ident: String,
    options: Options,
    facility: Facility,
    generation: u64,
    backend: Option<Arc<dyn Syslogger>>,
    resources: Vec<Arc<dyn Close>>,
}

impl State {
    /// Close everything acquired while building the current chain; every resource is closed even
    /// if an earlier one fails, and the first failure is returned
    fn release(&mut self) -> Result<()> {
        let mut first = None;
        for resource in self.resources.drain(..) {
            if let Err(err) = resource.close() {
                first.get_or_insert(err);
            }
        }
        match first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct Shared {
    platform: Box<dyn Platform>,
    state: RwLock<State>,
}

impl Shared {
    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|err| err.into_inner())
    }
    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|err| err.into_inner())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                      chain construction                                        //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Assemble a backend chain for `state`'s ident, options & facility. Any resources acquired along
/// the way are pushed onto `state.resources`; the prior set must already have been released.
fn open_chain(platform: &dyn Platform, state: &mut State) -> Result<Arc<dyn Syslogger>> {
    let options = state.options;
    let pid = options.contains(Options::PID);
    let rfc3164 = |sink: Arc<dyn Syslogger>| -> Arc<dyn Syslogger> {
        Arc::new(
            Rfc3164::builder(Arc::new(Newliner::new(sink)))
                .facility(state.facility)
                .ident(&state.ident)
                .pid(pid)
                .build(),
        )
    };

    let mut chain: Option<Arc<dyn Syslogger>> = None;
    let mut acquired: Vec<Arc<dyn Close>> = Vec::new();

    match platform.native(state.facility, &state.ident) {
        Ok(native) => {
            acquired.push(as_close(&native));
            chain = Some(as_syslogger(&native));
        }
        Err(err) => debug!("syslogd unavailable: {}", err),
    }

    if options.contains(Options::CONS) {
        match platform.console() {
            Ok(console) => {
                acquired.push(as_close(&console));
                let console = rfc3164(as_syslogger(&console));
                chain = Some(match chain {
                    Some(native) => {
                        Arc::new(Fallthrough::new(native, console)) as Arc<dyn Syslogger>
                    }
                    None => console,
                });
            }
            Err(err) => debug!("console unavailable: {}", err),
        }
    }

    let perror = options.contains(Options::PERROR);
    let chain: Arc<dyn Syslogger> = if !perror && options.contains(Options::NOFALLBACK) {
        match chain {
            Some(chain) => chain,
            None => {
                return Err(Error::NoDeliveryMechanism {
                    back: Backtrace::new(),
                })
            }
        }
    } else {
        let stderr = rfc3164(platform.stderr());
        match chain {
            None => {
                debug!("logging to stderr alone");
                stderr
            }
            Some(chain) if perror => {
                Arc::new(Multi::new(vec![chain, stderr], true)) as Arc<dyn Syslogger>
            }
            Some(chain) => Arc::new(Fallthrough::new(chain, stderr)) as Arc<dyn Syslogger>,
        }
    };

    state.resources.extend(acquired);

    if options.contains(Options::NOWAIT) {
        Ok(Arc::new(NoWait::new(chain)?))
    } else {
        Ok(chain)
    }
}

/// A [`Delay`] that builds the chain for generation `generation` of `shared`'s session
fn prepare_delay(shared: &Arc<Shared>, generation: u64) -> Arc<dyn Syslogger> {
    let weak: Weak<Shared> = Arc::downgrade(shared);
    Arc::new(Delay::new(move || {
        let shared = weak.upgrade().ok_or_else(|| Error::closed("Posixish"))?;
        let mut state = shared.write();
        if state.generation != generation {
            return Err(Error::Reconfigured {
                back: Backtrace::new(),
            });
        }
        if let Err(err) = state.release() {
            warn!("releasing stale syslog resources: {}", err);
        }
        open_chain(shared.platform.as_ref(), &mut state)
    }))
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                          the session                                           //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A POSIX-style logging session
///
/// Cloning a [`Posixish`] yields another handle on the same session.
#[derive(Clone)]
pub struct Posixish {
    shared: Arc<Shared>,
}

impl std::default::Default for Posixish {
    fn default() -> Self {
        Posixish::new()
    }
}

impl Posixish {
    /// A session on the real [`System`]; nothing is opened until it's needed
    pub fn new() -> Posixish {
        Posixish::with_platform(System)
    }
    pub fn with_platform<P: Platform + 'static>(platform: P) -> Posixish {
        Posixish {
            shared: Arc::new(Shared {
                platform: Box::new(platform),
                state: RwLock::new(State {
                    ident: String::new(),
                    options: Options::NONE,
                    facility: Facility::default(),
                    generation: 0,
                    backend: None,
                    resources: Vec::new(),
                }),
            }),
        }
    }
    /// `openlog(3)`
    ///
    /// `facility` must be a bare facility (no severity bits). Conflicting options or a bad
    /// facility are rejected before anything about the session changes. With `LOG_NDELAY` the
    /// chain is built now, and a failure to build it is returned; otherwise it's built when the
    /// first message is logged.
    pub fn open<P: Into<Priority>>(&self, ident: &str, options: Options, facility: P) -> Result<()> {
        let options = options.validate()?;
        let facility = facility.into().valid_facility()?;

        let mut state = self.shared.write();
        if let Err(err) = state.release() {
            warn!("closing the previous syslog session: {}", err);
        }
        state.backend = None;
        state.ident = ident.to_string();
        state.options = options;
        state.facility = facility;
        state.generation += 1;

        if options.contains(Options::NDELAY) {
            let chain = open_chain(self.shared.platform.as_ref(), &mut state)?;
            state.backend = Some(chain);
        } else {
            state.backend = Some(prepare_delay(&self.shared, state.generation));
        }
        Ok(())
    }
    /// The chain to log to, installing a deferred default one if there's none
    fn backend(&self) -> Arc<dyn Syslogger> {
        if let Some(backend) = self.shared.read().backend.clone() {
            return backend;
        }
        let mut state = self.shared.write();
        Self::ensure_backend(&self.shared, &mut state)
    }
    fn ensure_backend(shared: &Arc<Shared>, state: &mut State) -> Arc<dyn Syslogger> {
        match &state.backend {
            Some(backend) => backend.clone(),
            None => {
                let backend = prepare_delay(shared, state.generation);
                state.backend = Some(backend.clone());
                backend
            }
        }
    }
    /// `syslog(3)`, more or less
    pub fn syslog<M: Into<Message>>(&self, priority: Priority, msg: M) -> Result<()> {
        self.log(priority, &msg.into())
    }
    /// `setlogmask(3)`
    ///
    /// The mask is applied on top of any installed previously, so a severity suppressed by an
    /// earlier call stays suppressed.
    pub fn set_log_mask(&self, mask: SeverityMask) {
        let mut state = self.shared.write();
        let backend = Self::ensure_backend(&self.shared, &mut state);
        state.backend = Some(Arc::new(SeverityFilter::new(backend, mask)));
    }
    /// `closelog(3)`
    ///
    /// Every resource is released even if some fail to close; the first failure is returned.
    /// The next message logged reopens the session with the last ident, options & facility.
    pub fn close(&self) -> Result<()> {
        let mut state = self.shared.write();
        state.generation += 1;
        state.backend = None;
        state.release()
    }
    pub fn ident(&self) -> String {
        self.shared.read().ident.clone()
    }
    pub fn options(&self) -> Options {
        self.shared.read().options
    }
    pub fn facility(&self) -> Facility {
        self.shared.read().facility
    }
}

impl Syslogger for Posixish {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()> {
        self.backend().log(priority, msg)
    }
}

impl Close for Posixish {
    fn close(&self) -> Result<()> {
        Posixish::close(self)
    }
}
