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

//! The byte transport layer underneath [`NativeSyslog`](crate::native::NativeSyslog).
//!
//! This module defines the [`Transport`] trait along with UDP, TCP & Unix socket (datagram and
//! stream) implementations.
//!
//! # Examples
//!
//! To send datagrams to a daemon listening on port 514 (the default) on localhost:
//!
//! ```rust
//! use posixish_syslog::transport::UdpTransport;
//! let udp = UdpTransport::local().unwrap();
//! ```
//!
//! To a local Unix socket:
//!
//! ```rust
//! use posixish_syslog::transport::UnixSocket;
//! // nobody listening here
//! assert!(UnixSocket::new("/no/such/dir/log.sock").is_err());
//! ```

use crate::error::{Error, Result};

use std::{
    io::Write,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream, ToSocketAddrs, UdpSocket},
};

#[cfg(unix)]
use std::{
    os::unix::net::{UnixDatagram, UnixStream},
    path::Path,
};

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                     byte transports                                            //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A connected channel to a syslog daemon
pub trait Transport: Send + Sync {
    /// Deliver `buf`, returning the number of bytes sent
    ///
    /// Stream transports write the slice as-is; framing (a trailing newline, say) is the caller's
    /// business.
    fn send(&self, buf: &[u8]) -> Result<usize>;
}

/// One datagram per message, over UDP
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Connect to the daemon at `addr`
    ///
    /// Each address `addr` resolves to is tried in turn; the local socket is bound to the
    /// unspecified address of the same family, on any port.
    pub fn new<A: ToSocketAddrs>(addr: A) -> Result<UdpTransport> {
        let mut last = None;
        for addr in addr.to_socket_addrs().map_err(Error::transport)? {
            let local: SocketAddr = match addr {
                SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
                SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
            };
            match UdpSocket::bind(local).and_then(|socket| {
                socket.connect(addr)?;
                Ok(socket)
            }) {
                Ok(socket) => return Ok(UdpTransport { socket }),
                Err(err) => last = Some(err),
            }
        }
        Err(Error::transport(last.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "address resolved to nothing",
            )
        })))
    }
    /// The daemon on this host, port 514
    pub fn local() -> Result<UdpTransport> {
        UdpTransport::new("localhost:514")
    }
}

impl Transport for UdpTransport {
    fn send(&self, buf: &[u8]) -> Result<usize> {
        self.socket.send(buf).map_err(Error::transport)
    }
}

/// A TCP connection; messages are written back-to-back
pub struct TcpTransport {
    socket: TcpStream,
}

impl TcpTransport {
    pub fn new<A: ToSocketAddrs>(addr: A) -> Result<TcpTransport> {
        Ok(TcpTransport {
            socket: TcpStream::connect(addr).map_err(Error::transport)?,
        })
    }
}

/// `Write` is implemented for `&TcpStream` & `&UnixStream` as well as the owned types, so a
/// shared reference is enough to write.
fn write_stream<W: Write>(mut writer: W, buf: &[u8]) -> Result<usize> {
    writer.write_all(buf).map_err(Error::transport)?;
    writer.flush().map_err(Error::transport)?;
    Ok(buf.len())
}

impl Transport for TcpTransport {
    fn send(&self, buf: &[u8]) -> Result<usize> {
        write_stream(&self.socket, buf)
    }
}

/// A Unix datagram socket, the usual way to reach `/dev/log`
#[cfg(unix)]
pub struct UnixSocket {
    socket: UnixDatagram,
}

#[cfg(unix)]
impl UnixSocket {
    /// Connect to the socket bound at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<UnixSocket> {
        let sock = UnixDatagram::unbound().map_err(Error::transport)?;
        sock.connect(path).map_err(Error::transport)?;
        Ok(UnixSocket { socket: sock })
    }
}

#[cfg(unix)]
impl Transport for UnixSocket {
    fn send(&self, buf: &[u8]) -> Result<usize> {
        self.socket.send(buf).map_err(Error::transport)
    }
}

/// A Unix stream socket, for daemons that listen that way
#[cfg(unix)]
pub struct UnixSocketStream {
    socket: UnixStream,
}

#[cfg(unix)]
impl UnixSocketStream {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<UnixSocketStream> {
        Ok(UnixSocketStream {
            socket: UnixStream::connect(path).map_err(Error::transport)?,
        })
    }
}

#[cfg(unix)]
impl Transport for UnixSocketStream {
    fn send(&self, buf: &[u8]) -> Result<usize> {
        write_stream(&self.socket, buf)
    }
}
