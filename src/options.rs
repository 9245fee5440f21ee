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

//! `openlog` option flags

use crate::error::{Error, Result};

use backtrace::Backtrace;

type StdResult<T, E> = std::result::Result<T, E>;

/// A set of `openlog` options.
///
/// The first six flags carry their `<syslog.h>` meanings; `LOG_NOFALLBACK` is an addition that
/// disables the implicit fall back to standard error when nothing else is reachable.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Options(u8);

impl Options {
    pub const NONE: Options = Options(0);
    /// Include the process ID with each message
    pub const PID: Options = Options(0x01);
    /// Write to the system console if the syslog daemon can't be reached
    pub const CONS: Options = Options(0x02);
    /// Delay opening the connection until the first message is logged (the default)
    pub const ODELAY: Options = Options(0x04);
    /// Open the connection immediately
    pub const NDELAY: Options = Options(0x08);
    /// Don't wait for messages to be delivered
    pub const NOWAIT: Options = Options(0x10);
    /// Also write each message to standard error
    pub const PERROR: Options = Options(0x20);
    /// Don't fall back to standard error when no other delivery mechanism is available
    pub const NOFALLBACK: Options = Options(0x40);

    const KNOWN: u8 = 0x7f;

    const NAMES: [(Options, &'static str); 7] = [
        (Options::PID, "LOG_PID"),
        (Options::CONS, "LOG_CONS"),
        (Options::ODELAY, "LOG_ODELAY"),
        (Options::NDELAY, "LOG_NDELAY"),
        (Options::NOWAIT, "LOG_NOWAIT"),
        (Options::PERROR, "LOG_PERROR"),
        (Options::NOFALLBACK, "LOG_NOFALLBACK"),
    ];

    pub const fn empty() -> Options {
        Options::NONE
    }
    pub fn from_bits(bits: u8) -> Result<Options> {
        if bits & !Options::KNOWN != 0 {
            Err(Error::UnknownOptions {
                bits,
                back: Backtrace::new(),
            })
        } else {
            Ok(Options(bits))
        }
    }
    pub const fn bits(self) -> u8 {
        self.0
    }
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
    /// True if every flag in `other` is set in `self`
    pub const fn contains(self, other: Options) -> bool {
        self.0 & other.0 == other.0
    }
    /// Reject option combinations that can't be honored (today, only `LOG_ODELAY|LOG_NDELAY`).
    pub fn validate(self) -> Result<Options> {
        if self.contains(Options::ODELAY | Options::NDELAY) {
            Err(Error::ConflictingDelayOptions {
                options: self,
                back: Backtrace::new(),
            })
        } else {
            Ok(self)
        }
    }
    /// Look-up a single flag by its `<syslog.h>` name
    pub fn by_name(name: &str) -> Option<Options> {
        Options::NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(o, _)| *o)
    }
    /// Iterate over each single flag set in `self`, along with its name
    pub fn iter(self) -> impl Iterator<Item = (Options, &'static str)> {
        Options::NAMES
            .into_iter()
            .filter(move |(o, _)| self.contains(*o))
    }
}

impl std::ops::BitOr for Options {
    type Output = Options;
    fn bitor(self, rhs: Options) -> Options {
        Options(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Options {
    fn bitor_assign(&mut self, rhs: Options) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for Options {
    type Output = Options;
    fn bitand(self, rhs: Options) -> Options {
        Options(self.0 & rhs.0)
    }
}

impl std::fmt::Display for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        if self.is_empty() {
            return write!(f, "0");
        }
        let mut first = true;
        for (_, name) in self.iter() {
            if !first {
                write!(f, "|")?;
            }
            write!(f, "{}", name)?;
            first = false;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "Options({})", self)
    }
}

/// Parse `LOG_PID|LOG_NDELAY`-style strings (`,` is accepted as a separator too).
impl std::str::FromStr for Options {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        s.split(|c| c == '|' || c == ',')
            .map(str::trim)
            .filter(|x| !x.is_empty() && *x != "0")
            .try_fold(Options::NONE, |acc, name| {
                Options::by_name(name)
                    .map(|o| acc | o)
                    .ok_or_else(|| Error::UnknownName {
                        kind: "option",
                        name: name.to_owned(),
                        back: Backtrace::new(),
                    })
            })
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_validate() {
        assert!((Options::ODELAY | Options::NDELAY).validate().is_err());
        assert!((Options::PID | Options::ODELAY | Options::NDELAY)
            .validate()
            .is_err());
        assert!((Options::PID | Options::NDELAY).validate().is_ok());
        assert!(Options::NONE.validate().is_ok());
    }

    #[test]
    fn test_bits() {
        assert_eq!(Options::from_bits(0x7f).unwrap().bits(), 0x7f);
        assert!(Options::from_bits(0x80).is_err());
        let o = Options::PID | Options::PERROR;
        assert!(o.contains(Options::PID));
        assert!(!o.contains(Options::CONS));
        assert!(!o.contains(Options::PID | Options::CONS));
    }

    #[test]
    fn test_names() {
        assert_eq!(
            format!("{}", Options::PID | Options::CONS | Options::NOFALLBACK),
            "LOG_PID|LOG_CONS|LOG_NOFALLBACK"
        );
        assert_eq!(format!("{}", Options::NONE), "0");
        assert_eq!(
            "LOG_PERROR | LOG_NOWAIT".parse::<Options>().unwrap(),
            Options::PERROR | Options::NOWAIT
        );
        assert_eq!("".parse::<Options>().unwrap(), Options::NONE);
        assert!("LOG_PID|LOG_FOO".parse::<Options>().is_err());
    }
}
