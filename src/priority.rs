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

//! syslog priorities
//!
//! A syslog "priority" packs a [`Facility`] into the high five bits of a byte & a [`Severity`]
//! into the low three, exactly as `<syslog.h>` does with `LOG_MAKEPRI`.

use crate::{
    error::{Error, Result},
    facility::{Facility, Severity},
};

use backtrace::Backtrace;

type StdResult<T, E> = std::result::Result<T, E>;

const FACILITY_MASK: u8 = 0xf8;
const SEVERITY_MASK: u8 = 0x07;

/// A [`Facility`] combined with a [`Severity`].
///
/// The raw byte may hold a facility value past `LOG_LOCAL7` (the five facility bits can encode
/// thirty-two codes, only twenty-four of which are defined); such a [`Priority`] is representable
/// but [`Priority::valid_facility`] will reject it. An all-zero facility means "unset": backends
/// substitute their own configured facility.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Priority(u8);

impl Priority {
    pub fn new(facility: Facility, severity: Severity) -> Priority {
        Priority(facility as u8 | severity as u8)
    }
    pub const fn from_raw(raw: u8) -> Priority {
        Priority(raw)
    }
    pub const fn into_raw(self) -> u8 {
        self.0
    }
    /// The facility component; `None` if the facility bits don't name one of the 24 facilities.
    ///
    /// An unset facility comes back as `Some(LOG_KERN)`; use [`Priority::is_facility_unset`] to
    /// tell the two apart where it matters.
    pub fn facility(self) -> Option<Facility> {
        Facility::try_from(self.0 & FACILITY_MASK).ok()
    }
    pub fn severity(self) -> Severity {
        Severity::from_low_bits(self.0)
    }
    pub fn is_facility_unset(self) -> bool {
        self.0 & FACILITY_MASK == 0
    }
    /// Interpret this [`Priority`] as a bare facility, as `openlog` does with its third argument.
    ///
    /// Fails if any severity bits are set or if the facility bits are out of range.
    pub fn valid_facility(self) -> Result<Facility> {
        if self.0 & SEVERITY_MASK != 0 {
            return Err(Error::InvalidFacility {
                value: self.0,
                back: Backtrace::new(),
            });
        }
        Facility::try_from(self.0)
    }
    /// Replace the facility, keeping the severity.
    pub fn with_facility(self, facility: Facility) -> Priority {
        Priority::new(facility, self.severity())
    }
    /// Fill-in `default` if the facility is unset or invalid; otherwise leave this instance as-is.
    pub fn or_facility(self, default: Facility) -> Priority {
        match self.facility() {
            Some(_) if !self.is_facility_unset() => self,
            _ => self.with_facility(default),
        }
    }
}

impl std::convert::From<Severity> for Priority {
    fn from(severity: Severity) -> Self {
        Priority(severity as u8)
    }
}

impl std::convert::From<Facility> for Priority {
    fn from(facility: Facility) -> Self {
        Priority(facility as u8)
    }
}

impl std::convert::From<(Facility, Severity)> for Priority {
    fn from(x: (Facility, Severity)) -> Self {
        Priority::new(x.0, x.1)
    }
}

impl std::ops::BitOr<Severity> for Facility {
    type Output = Priority;
    fn bitor(self, rhs: Severity) -> Priority {
        Priority::new(self, rhs)
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        // An unset facility is omitted, as is LOG_EMERG after a facility (so a bare facility prints
        // as just its name).
        if !self.is_facility_unset() {
            match self.facility() {
                Some(facility) => write!(f, "{}", facility)?,
                None => write!(f, "Priority({:#x})", self.0 & FACILITY_MASK)?,
            }
            if self.0 & SEVERITY_MASK == 0 {
                return Ok(());
            }
            write!(f, "|")?;
        }
        write!(f, "{}", self.severity())
    }
}

impl std::fmt::Debug for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "{} ({:#04x})", self, self.0)
    }
}
