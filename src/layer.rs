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

//! A [`tracing-subscriber`] [`Layer`] that forwards [`tracing`] [`Event`]s to any [`Syslogger`]
//!
//! [`tracing-subscriber`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/index.html
//! [`Layer`]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/trait.Layer.html
//! [`tracing`]: https://docs.rs/tracing/latest/tracing/index.html
//! [`Event`]: https://docs.rs/tracing/latest/tracing/struct.Event.html
//!
//! ```no_run
//! use posixish_syslog::{facility::Facility, layer::Layer, options::Options, posixish::Posixish};
//! use tracing::info;
//! use tracing_subscriber::layer::SubscriberExt; // Needed to get `with()`
//! use tracing_subscriber::registry::Registry;
//!
//! let session = Posixish::new();
//! session.open("mydaemon", Options::PID, Facility::LOG_DAEMON).unwrap();
//! let subscriber = Registry::default().with(Layer::new(session));
//! let _guard = tracing::subscriber::set_default(subscriber);
//!
//! info!("Hello, world!");
//! ```
//!
//! Events emitted by this crate itself are never forwarded, so a session's own diagnostics can't
//! loop back into it.

use crate::{
    facility::{Facility, Severity},
    message::Message,
    priority::Priority,
    syslogger::Syslogger,
};

use tracing::Event;
use tracing_subscriber::layer::Context;

fn default_level_mapping(level: &tracing::Level) -> Severity {
    match level {
        &tracing::Level::TRACE | &tracing::Level::DEBUG => Severity::LOG_DEBUG,
        &tracing::Level::INFO => Severity::LOG_INFO,
        &tracing::Level::WARN => Severity::LOG_WARNING,
        &tracing::Level::ERROR => Severity::LOG_ERR,
    }
}

struct MessageEventVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageEventVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        }
    }
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            // The tracing macros "pre-format" the `message` field, so `value` is really a
            // `std::fmt::Arguments`, whose debug format has no enclosing double-quotes.
            self.message = Some(format!("{:?}", value));
        }
    }
}

/// Forward the "message" field of each [`Event`] to a [`Syslogger`]
pub struct Layer<B: Syslogger> {
    backend: B,
    facility: Option<Facility>,
    map_level: Box<dyn Fn(&tracing::Level) -> Severity + Send + Sync>,
}

impl<B: Syslogger> Layer<B> {
    pub fn new(backend: B) -> Layer<B> {
        Layer {
            backend,
            facility: None,
            map_level: Box::new(default_level_mapping),
        }
    }
    /// Log at `facility` rather than leaving the facility to the backend
    pub fn with_facility(mut self, facility: Facility) -> Self {
        self.facility = Some(facility);
        self
    }
    pub fn with_level_mapping<F>(mut self, map_level: F) -> Self
    where
        F: Fn(&tracing::Level) -> Severity + Send + Sync + 'static,
    {
        self.map_level = Box::new(map_level);
        self
    }
    fn priority(&self, level: &tracing::Level) -> Priority {
        let severity = (self.map_level)(level);
        match self.facility {
            Some(facility) => facility | severity,
            None => severity.into(),
        }
    }
}

impl<S, B> tracing_subscriber::layer::Layer<S> for Layer<B>
where
    S: tracing::Subscriber,
    B: Syslogger + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target().starts_with(env!("CARGO_CRATE_NAME")) {
            return;
        }
        let mut visitor = MessageEventVisitor { message: None };
        event.record(&mut visitor);
        let message = match visitor.message {
            Some(message) => message,
            None => return,
        };
        if let Err(err) = self
            .backend
            .log(self.priority(metadata.level()), &Message::Text(message))
        {
            ::tracing::error!("failed to forward a tracing event: {}", err);
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::testing::Recorder;

    use std::sync::Arc;

    use tracing::{debug, error, info, trace, warn};
    use tracing_subscriber::{
        layer::SubscriberExt, // Needed to get `with()`
        registry::Registry,
    };

    #[test]
    fn test_forwarding() {
        let rec = Recorder::new();
        let subscriber = Registry::default().with(Layer::new(rec.clone()));
        tracing::subscriber::with_default(subscriber, || {
            trace!(target: "app", "Hello, 世界!");
            debug!(target: "app", "debug");
            info!(target: "app", answer = 42, "info {}", 1);
            warn!(target: "app", "warn");
            error!(target: "app", "error");
            // this crate's own diagnostics stay out
            info!("internal");
            // no message field
            info!(target: "app", answer = 42);
        });
        let records = rec.records();
        let got: Vec<(Severity, &str)> = records
            .iter()
            .map(|(p, m)| (p.severity(), m.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                (Severity::LOG_DEBUG, "Hello, 世界!"),
                (Severity::LOG_DEBUG, "debug"),
                (Severity::LOG_INFO, "info 1"),
                (Severity::LOG_WARNING, "warn"),
                (Severity::LOG_ERR, "error"),
            ]
        );
        assert!(records.iter().all(|(p, _)| p.is_facility_unset()));
    }

    #[test]
    fn test_facility_and_mapping() {
        let rec = Recorder::new();
        let layer = Layer::new(rec.clone() as Arc<dyn Syslogger>)
            .with_facility(Facility::LOG_LOCAL4)
            .with_level_mapping(|_| Severity::LOG_NOTICE);
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            error!(target: "app", "remapped");
        });
        assert_eq!(
            rec.records(),
            vec![(Facility::LOG_LOCAL4 | Severity::LOG_NOTICE, "remapped".to_string())]
        );
    }
}
