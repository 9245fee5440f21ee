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

//! Session configuration from the environment
//!
//! The following variables are recognized:
//!
//! | variable                         | meaning                                                  |
//! |----------------------------------|----------------------------------------------------------|
//! | `LOG_PID` ... `LOG_NOFALLBACK`   | set the option of the same name                          |
//! | `LOG_FACILITY` (or `LOG_PRIORITY`) | facility name, e.g. `LOG_LOCAL3`; default `LOG_USER`   |
//! | `LOG_UPTO`                       | severity name; suppress everything less urgent           |
//! | `LOG_MASK`                       | severity names (`\|` or `,` separated) to allow          |
//! | `LOG_IDENT`                      | ident; default is the program name                       |
//!
//! An option variable counts as set unless its value is `0`, `false`, `no` or `off`. `LOG_UPTO`
//! takes precedence over `LOG_MASK`. Unrecognized values are ignored (and reported via
//! [`tracing`]), since a typo in the environment shouldn't keep a program from logging.

use crate::{
    error::Result,
    facility::{Facility, Severity},
    mask::SeverityMask,
    options::Options,
    posixish::Posixish,
};

use tracing::debug;

use std::collections::HashMap;

/// Everything needed to open a [`Posixish`] session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub ident: String,
    pub options: Options,
    pub facility: Facility,
    pub mask: SeverityMask,
}

fn flag_set(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

fn parse_facility(value: &str) -> Option<Facility> {
    match value.trim().parse::<Facility>() {
        Ok(facility) => Some(facility),
        Err(err) => {
            debug!("ignoring facility: {}", err);
            None
        }
    }
}

fn parse_mask(vars: &HashMap<String, String>) -> SeverityMask {
    if let Some(value) = vars.get("LOG_UPTO") {
        match value.trim().parse::<Severity>() {
            Ok(severity) => return SeverityMask::up_to(severity),
            Err(err) => debug!("ignoring LOG_UPTO: {}", err),
        }
    }
    if let Some(value) = vars.get("LOG_MASK") {
        let parsed: std::result::Result<Vec<Severity>, _> = value
            .split(|c| c == '|' || c == ',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<Severity>)
            .collect();
        match parsed {
            Ok(severities) if !severities.is_empty() => return SeverityMask::allowing(severities),
            Ok(_) => debug!("ignoring empty LOG_MASK"),
            Err(err) => debug!("ignoring LOG_MASK: {}", err),
        }
    }
    SeverityMask::ALLOW_ALL
}

impl Config {
    /// Read the process environment
    pub fn from_env() -> Config {
        Config::from_vars(std::env::vars())
    }
    /// Parse configuration out of any set of name/value pairs
    pub fn from_vars<I, K, V>(vars: I) -> Config
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with("LOG_"))
            .collect();

        let options = Options::empty();
        let options = vars
            .iter()
            .filter(|(_, v)| flag_set(v))
            .filter_map(|(k, _)| Options::by_name(k))
            .fold(options, |acc, o| acc | o);

        let facility = vars
            .get("LOG_FACILITY")
            .or_else(|| vars.get("LOG_PRIORITY"))
            .and_then(|v| parse_facility(v))
            .unwrap_or_default();

        Config {
            ident: vars.get("LOG_IDENT").cloned().unwrap_or_default(),
            options,
            facility,
            mask: parse_mask(&vars),
        }
    }
    /// Open `session` with this configuration; the mask is installed only if it suppresses
    /// anything
    pub fn apply(&self, session: &Posixish) -> Result<()> {
        session.open(&self.ident, self.options, self.facility)?;
        if self.mask != SeverityMask::ALLOW_ALL {
            session.set_log_mask(self.mask);
        }
        Ok(())
    }
    /// Open a new session on the real system with this configuration
    pub fn open(&self) -> Result<Posixish> {
        let session = Posixish::new();
        self.apply(&session)?;
        Ok(session)
    }
}
