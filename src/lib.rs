//! Main crate for the `updatedns` application.
//!
//! `updatedns` keeps DigitalOcean DNS records pointed at the public IPv4
//! address of the host it runs on. It is a single-shot tool: detect the
//! current address, compare it against the last entry in the address log,
//! and update every configured record if the address changed.
//!
//! The following modules might be of interest if you want to add new functionality:
//! - [`ipv4source`]s are used to retrieve the current public IPv4 address of this host
//! - [`provider`]s are DNS providers such as DigitalOcean that serve the records we keep updated
//! - [`iplog`] is the append-only log recording every address change we have applied
//! - [`reporter`]s deliver user-facing messages to the terminal or to syslog
//! - [`updater`] drives a single detect-compare-update cycle

#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod iplog;
pub mod ipv4source;
pub mod provider;
pub mod reporter;
pub mod updater;
