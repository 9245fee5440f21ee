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

//! Exercise a full `openlog`/`syslog`/`closelog` session against the local syslog daemon.
//!
//! Everything is mirrored to stderr, so the output should show up there as well as in the system
//! log; if the daemon isn't running, the console is tried.

use posixish_syslog::{
    facility::{Facility, Severity},
    mask::SeverityMask,
    options::Options,
    posixish::Posixish,
};

pub fn main() {
    let session = Posixish::new();
    session
        .open(
            "session-test",
            Options::PID | Options::CONS | Options::PERROR | Options::NDELAY,
            Facility::LOG_LOCAL0,
        )
        .unwrap();

    for severity in Severity::ALL {
        session
            .syslog(severity.into(), format!("Hello, 世界! ({})", severity))
            .unwrap();
    }

    // Nothing below LOG_WARNING from here on
    session.set_log_mask(SeverityMask::up_to(Severity::LOG_WARNING));
    session
        .syslog(Severity::LOG_INFO.into(), "You should not see this")
        .unwrap();
    session
        .syslog(Facility::LOG_LOCAL0 | Severity::LOG_WARNING, "Goodbye.")
        .unwrap();

    session.close().unwrap();
}
