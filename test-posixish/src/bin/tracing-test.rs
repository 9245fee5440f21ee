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

//! Route [`tracing`] events through a [`Posixish`] session to the local daemon.
//!
//! [`tracing`]: https://docs.rs/tracing/latest/tracing/index.html
//! [`Posixish`]: posixish_syslog::posixish::Posixish

use posixish_syslog::{facility::Facility, layer::Layer, options::Options, posixish::Posixish};
use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::{
    layer::SubscriberExt, // Needed to get `with()`
    registry::Registry,
};

pub fn main() {
    let session = Posixish::new();
    session
        .open("tracing-test", Options::PID | Options::PERROR, Facility::LOG_DAEMON)
        .unwrap();

    // Setup the real subscriber...
    let subscriber = Registry::default().with(Layer::new(session.clone()));
    // and install it.
    let _guard = tracing::subscriber::set_default(subscriber);

    trace!("Hello, 世界!");
    debug!("Hello, 世界!");
    info!("Hello, 世界!");
    warn!("Hello, 世界!");
    error!("Hello, 世界!");

    session.close().unwrap();
}
