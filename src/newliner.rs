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

//! Line termination

use crate::{
    error::{Error, Result},
    message::Message,
    priority::Priority,
    syslogger::Syslogger,
};

use std::sync::Arc;

/// Make sure every message ends with exactly one trailing `\n` before forwarding it as text
///
/// Text & renderable messages are accepted; error values are not.
pub struct Newliner {
    inner: Arc<dyn Syslogger>,
}

impl Newliner {
    pub fn new(inner: Arc<dyn Syslogger>) -> Newliner {
        Newliner { inner }
    }
}

impl Syslogger for Newliner {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()> {
        let text = match msg {
            Message::Text(_) | Message::Renderable(_) => msg.render(),
            Message::Error(_) => return Err(Error::unsupported("Newliner", msg.kind())),
        };
        if text.ends_with('\n') {
            self.inner.log(priority, &Message::Text(text.into_owned()))
        } else {
            self.inner.log(priority, &Message::Text((text + "\n").into_owned()))
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::{
        testing::{Recorder, SharedBuf},
        writer::Writer,
    };

    #[test]
    fn test_newliner() {
        let buf = SharedBuf::default();
        let n = Newliner::new(Arc::new(Writer::new(buf.clone())));
        n.log(Priority::default(), &Message::from("a")).unwrap();
        n.log(Priority::default(), &Message::from("b\n")).unwrap();
        n.log(Priority::default(), &Message::renderable(42)).unwrap();
        assert_eq!(buf.contents(), "a\nb\n42\n");
    }

    #[test]
    fn test_rejects_errors() {
        let rec = Recorder::new();
        let n = Newliner::new(rec.clone());
        assert!(matches!(
            n.log(
                Priority::default(),
                &Message::error(std::io::Error::new(std::io::ErrorKind::Other, "e"))
            ),
            Err(Error::UnsupportedMessage { .. })
        ));
        assert_eq!(rec.calls(), 0);
    }
}
