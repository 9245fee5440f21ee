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

/// Produce a [`Vec`] of bytes from an [`OsString`](std::ffi::OsString).
#[cfg(unix)]
pub fn bytes_from_os_str(s: std::ffi::OsString) -> Vec<u8> {
    use std::os::unix::ffi::OsStringExt;
    s.into_vec()
}

#[cfg(not(unix))]
pub fn bytes_from_os_str(s: std::ffi::OsString) -> Vec<u8> {
    s.to_string_lossy().as_bytes().to_vec()
}

/// The name under which this process was invoked, for use when no ident was given
///
/// Prefers the file name of the running executable, then `argv[0]`, then `"-"` (the RFC 5424
/// NILVALUE).
pub fn program_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|pbuf| pbuf.file_name().map(|s| s.to_os_string()))
        .or_else(|| std::env::args_os().next())
        .map(|s| String::from_utf8_lossy(&bytes_from_os_str(s)).into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "-".to_string())
}
