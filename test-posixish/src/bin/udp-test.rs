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

//! Test writing to port 514 on the local host.

use posixish_syslog::{
    facility::{Facility, Severity},
    message::Message,
    native::{Network, NativeSyslog},
    syslogger::{Close, Syslogger},
};

pub fn main() {
    let syslog =
        NativeSyslog::dial(Network::Udp("127.0.0.1:514".to_string()), Facility::LOG_USER, "udp-test")
            .unwrap();
    for severity in Severity::ALL {
        syslog
            .log(severity.into(), &Message::from("Hello, 世界!"))
            .unwrap();
    }
    syslog.close().unwrap();
}
