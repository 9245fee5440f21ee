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

//! Severity masks

use crate::facility::Severity;

type StdResult<T, E> = std::result::Result<T, E>;

/// A bit set over the eight severities; a set bit means "suppress messages of this severity".
///
/// This is the complement of the `setlogmask(3)` convention, where a set bit _enables_ a
/// priority. The default mask suppresses nothing.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct SeverityMask(u8);

impl SeverityMask {
    pub const ALLOW_ALL: SeverityMask = SeverityMask(0);

    /// Allow `severity` and everything more urgent; suppress the rest (`LOG_UPTO`).
    pub fn up_to(severity: Severity) -> SeverityMask {
        let allowed = (1u16 << (severity as u16 + 1)) - 1;
        SeverityMask(!(allowed as u8))
    }
    /// Allow exactly one severity (`LOG_MASK`).
    pub fn only(severity: Severity) -> SeverityMask {
        SeverityMask(!(1u8 << severity as u8))
    }
    /// Allow exactly the given severities.
    pub fn allowing<I: IntoIterator<Item = Severity>>(severities: I) -> SeverityMask {
        let allowed = severities
            .into_iter()
            .fold(0u8, |acc, s| acc | (1 << s as u8));
        SeverityMask(!allowed)
    }
    pub const fn from_bits(bits: u8) -> SeverityMask {
        SeverityMask(bits)
    }
    pub const fn bits(self) -> u8 {
        self.0
    }
    pub fn masked(self, severity: Severity) -> bool {
        self.0 & (1 << severity as u8) != 0
    }
    pub fn allows(self, severity: Severity) -> bool {
        !self.masked(severity)
    }
}

impl std::fmt::Debug for SeverityMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "SeverityMask({:#010b})", self.0)
    }
}
