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

//! Log messages
//!
//! A [`Message`] is one of three shapes: plain text, something that can render itself as text, or
//! an error value. Wrappers pass messages along untouched; the first backend that needs bytes
//! decides which shapes it will accept, and rejects the rest with
//! [`Error::UnsupportedMessage`](crate::error::Error::UnsupportedMessage).

use std::{borrow::Cow, fmt::Display, sync::Arc};

type StdResult<T, E> = std::result::Result<T, E>;

/// A message to be logged
///
/// Cloning is cheap for the non-text shapes; [`NoWait`](crate::nowait::NoWait) relies on this to
/// hand a copy to another thread.
#[derive(Clone)]
pub enum Message {
    Text(String),
    Renderable(Arc<dyn Display + Send + Sync>),
    Error(Arc<dyn std::error::Error + Send + Sync>),
}

impl Message {
    pub fn text<S: Into<String>>(s: S) -> Message {
        Message::Text(s.into())
    }
    pub fn renderable<D: Display + Send + Sync + 'static>(d: D) -> Message {
        Message::Renderable(Arc::new(d))
    }
    pub fn error<E: std::error::Error + Send + Sync + 'static>(err: E) -> Message {
        Message::Error(Arc::new(err))
    }
    /// A short name for this message's shape, for use in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Text(_) => "text",
            Message::Renderable(_) => "renderable",
            Message::Error(_) => "error",
        }
    }
    /// The message text, if this is a plain text message
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Message::Text(s) => Some(s),
            _ => None,
        }
    }
    /// Resolve the textual form of this message, whatever its shape
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Message::Text(s) => Cow::Borrowed(s),
            Message::Renderable(d) => Cow::Owned(d.to_string()),
            Message::Error(e) => Cow::Owned(e.to_string()),
        }
    }
    /// Collapse this message into a [`Message::Text`]
    pub fn into_text(self) -> Message {
        match self {
            Message::Text(_) => self,
            other => Message::Text(other.render().into_owned()),
        }
    }
}

impl std::convert::From<&str> for Message {
    fn from(s: &str) -> Self {
        Message::Text(s.to_owned())
    }
}

impl std::convert::From<String> for Message {
    fn from(s: String) -> Self {
        Message::Text(s)
    }
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "Message::{}({:?})", self.kind(), self.render())
    }
}

#[cfg(test)]
mod test {

    use super::*;

    struct Widget(u32);

    impl std::fmt::Display for Widget {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "widget #{}", self.0)
        }
    }

    #[test]
    fn test_shapes() {
        let m = Message::from("hello");
        assert_eq!(m.kind(), "text");
        assert_eq!(m.as_text(), Some("hello"));

        let m = Message::renderable(Widget(7));
        assert_eq!(m.kind(), "renderable");
        assert!(m.as_text().is_none());
        assert_eq!(m.render(), "widget #7");

        let m = Message::error(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert_eq!(m.kind(), "error");
        assert_eq!(m.render(), "boom");
        let m = m.into_text();
        assert_eq!(m.as_text(), Some("boom"));
    }
}
