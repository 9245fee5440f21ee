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

//! Fire-and-forget logging

use crate::{
    error::{Error, Result},
    message::Message,
    priority::Priority,
    syslogger::Syslogger,
};

use crossbeam_channel::{Receiver, Sender};

use std::sync::Arc;

/// Worker threads started by [`NoWait::new`]
pub const DEFAULT_WORKERS: usize = 4;

struct Job {
    priority: Priority,
    msg: Message,
}

fn work(inner: Arc<dyn Syslogger>, receiver: Receiver<Job>) {
    // Runs until every `Sender` is gone & the queue has drained
    for job in receiver.iter() {
        let _ = inner.log(job.priority, &job.msg);
    }
}

/// Hand each message to a small pool of worker threads & return immediately
///
/// # Fire and forget
///
/// Every call to [`Syslogger::log`] on a [`NoWait`] succeeds as soon as the message is queued.
/// Whatever the wrapped backend eventually returns is silently discarded, so delivery failures are
/// invisible to the caller. The queue is unbounded and the workers pull from it concurrently, so
/// messages logged in quick succession may reach the backend in any order.
///
/// Dropping the [`NoWait`] lets the workers finish what's queued, then exit.
pub struct NoWait {
    sender: Sender<Job>,
}

impl NoWait {
    pub fn new(inner: Arc<dyn Syslogger>) -> Result<NoWait> {
        NoWait::with_workers(inner, DEFAULT_WORKERS)
    }
    /// Start `workers` threads (at least one) feeding `inner`
    pub fn with_workers(inner: Arc<dyn Syslogger>, workers: usize) -> Result<NoWait> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        for i in 0..workers.max(1) {
            let inner = inner.clone();
            let receiver = receiver.clone();
            std::thread::Builder::new()
                .name(format!("syslog-nowait-{}", i))
                .spawn(move || work(inner, receiver))?;
        }
        Ok(NoWait { sender })
    }
}

impl Syslogger for NoWait {
    fn log(&self, priority: Priority, msg: &Message) -> Result<()> {
        self.sender
            .send(Job {
                priority,
                msg: msg.clone(),
            })
            .map_err(|_| Error::closed("NoWait"))
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::{facility::Severity, testing::Recorder};

    use std::sync::{mpsc, Mutex};
    use std::time::{Duration, Instant};

    /// Blocks each call until the test lets it go
    struct Gate {
        release: Mutex<mpsc::Receiver<()>>,
        done: Mutex<mpsc::Sender<String>>,
    }

    impl Syslogger for Gate {
        fn log(&self, _: Priority, msg: &Message) -> Result<()> {
            let _ = self.release.lock().unwrap().recv();
            let _ = self.done.lock().unwrap().send(msg.render().into_owned());
            Err(crate::error::Error::transport("after the fact"))
        }
    }

    fn wait_for_calls(rec: &Recorder, n: usize) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while rec.calls() < n && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_returns_before_backend() {
        let (release_tx, release_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();
        let nw = NoWait::with_workers(
            Arc::new(Gate {
                release: Mutex::new(release_rx),
                done: Mutex::new(done_tx),
            }),
            1,
        )
        .unwrap();

        // The backend is blocked (and will fail), yet the call succeeds
        assert!(nw
            .log(Severity::LOG_INFO.into(), &Message::from("later"))
            .is_ok());
        assert!(done_rx.try_recv().is_err());

        release_tx.send(()).unwrap();
        assert_eq!(
            done_rx.recv_timeout(Duration::from_secs(10)).unwrap(),
            "later"
        );
    }

    #[test]
    fn test_failures_are_discarded() {
        let rec = Recorder::failing();
        let nw = NoWait::new(rec.clone()).unwrap();
        for _ in 0..4 {
            assert!(nw
                .log(Severity::LOG_ERR.into(), &Message::from("x"))
                .is_ok());
        }
        wait_for_calls(&rec, 4);
        assert_eq!(rec.calls(), 4);
    }

    #[test]
    fn test_bursts_reuse_the_pool() {
        let rec = Recorder::new();
        let nw = NoWait::with_workers(rec.clone(), 2).unwrap();
        for i in 0..5000 {
            nw.log(Severity::LOG_DEBUG.into(), &Message::from(format!("{}", i)))
                .unwrap();
        }
        wait_for_calls(&rec, 5000);
        let mut got: Vec<usize> = rec
            .messages()
            .iter()
            .map(|m| m.parse().unwrap())
            .collect();
        got.sort_unstable();
        assert_eq!(got, (0..5000).collect::<Vec<usize>>());
    }

    #[test]
    fn test_drop_drains_the_queue() {
        let rec = Recorder::new();
        let nw = NoWait::with_workers(rec.clone(), 1).unwrap();
        for _ in 0..100 {
            nw.log(Severity::LOG_INFO.into(), &Message::from("queued"))
                .unwrap();
        }
        drop(nw);
        wait_for_calls(&rec, 100);
        assert_eq!(rec.calls(), 100);
    }
}
