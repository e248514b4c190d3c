use std::{
    fs::{self, OpenOptions},
    io::Write,
    net::Ipv4Addr,
    path::PathBuf,
};

use chrono::{Local, SecondsFormat};
use log::warn;
use thiserror::Error;

use crate::ipv4source::parse_dotted_quad;

/// Error returned when the address log cannot be read or extended
#[derive(Error, Debug)]
pub enum IpLogError {
    #[error("could not read public IP address log {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not update public IP address log {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The append-only log of public IPv4 addresses this host has held.
///
/// One line per successful update cycle, `"<RFC-3339 timestamp> <address>"`.
/// Only the newest entry is ever read back; older lines are history.
pub struct IpLog {
    path: PathBuf,
}

impl IpLog {
    pub fn new(path: PathBuf) -> Self {
        IpLog { path }
    }

    /// Return the address recorded by the most recent log entry.
    ///
    /// A missing log file is not an error: it means no update has ever been
    /// applied, and the caller treats that as "the address changed". An entry
    /// that does not end in a valid dotted quad is treated the same way.
    pub fn last_address(&self) -> Result<Option<Ipv4Addr>, IpLogError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(IpLogError::Read {
                    path: self.path.to_owned(),
                    source: e,
                })
            }
        };

        let last_line = match contents.lines().rev().find(|l| !l.trim().is_empty()) {
            Some(l) => l,
            None => return Ok(None),
        };

        // The address is the last field of the line, after the timestamp
        let field = last_line.split_whitespace().last().unwrap_or_default();
        match parse_dotted_quad(field) {
            Ok(addr) => Ok(Some(addr)),
            Err(_) => {
                warn!(
                    "ignoring malformed entry in {}: {}",
                    self.path.display(),
                    last_line
                );
                Ok(None)
            }
        }
    }

    /// Append a new entry for `address`, timestamped now.
    ///
    /// Never truncates or rewrites existing lines.
    pub fn append(&self, address: Ipv4Addr) -> Result<(), IpLogError> {
        let write_err = |source| IpLogError::Write {
            path: self.path.to_owned(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        let timestamp = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
        writeln!(file, "{} {}", timestamp, address).map_err(write_err)
    }
}
