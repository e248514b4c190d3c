use clap::Parser;
use std::{net::Ipv4Addr, path::PathBuf};

macro_rules! env_prefix {
    () => {
        "UPDATEDNS_"
    };
}

/// Update the DigitalOcean DNS servers if the public IPv4 address of this server changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(value_name = "CONFIGURATION_FILE")]
    pub configuration_file: PathBuf,

    /// Do not color messages written to the terminal
    #[arg(
        long,
        action,
        default_value_t = false,
        env = concat!(env_prefix!(), "NO_COLOR")
    )]
    pub no_color: bool,

    /// Send messages to syslog instead of the terminal
    #[arg(
        long,
        action,
        default_value_t = false,
        env = concat!(env_prefix!(), "SYSLOG")
    )]
    pub syslog: bool,

    /// Report on every step of the update cycle
    #[arg(
        short = 'v',
        long,
        action,
        default_value_t = false,
        env = concat!(env_prefix!(), "VERBOSE")
    )]
    pub verbose: bool,

    /// Set the loglevel for diagnostic output
    #[arg(
        value_enum,
        short = 'l',
        long,
        default_value_t = Loglevel::Warn,
        value_name = "LEVEL",
        env = concat!(env_prefix!(), "LOGLEVEL")
    )]
    pub loglevel: Loglevel,

    /// Hostname whose A record echoes the address of whoever asks
    #[arg(
        long,
        value_name = "HOSTNAME",
        default_value = "myip.opendns.com",
        env = concat!(env_prefix!(), "ECHO_HOSTNAME")
    )]
    pub echo_hostname: String,

    /// List of DNS servers to send the echo query to, as a comma-separated string.
    /// Must be resolvers that answer the echo hostname truthfully.
    #[arg(
        long,
        value_name = "SERVER_IP",
        use_value_delimiter = true,
        value_delimiter = ',',
        default_values = ["208.67.222.222", "208.67.220.220"],
        env = concat!(env_prefix!(), "ECHO_DNS_SERVERS")
    )]
    pub echo_dns_servers: Vec<Ipv4Addr>,
}

use clap::ValueEnum;
use log::LevelFilter;

/// Diagnostic loglevel of the application
// log::LevelFilter doesn't derive ValueEnum, so clap needs its own copy
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum)]
pub enum Loglevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
impl From<Loglevel> for LevelFilter {
    fn from(ll: Loglevel) -> Self {
        match ll {
            Loglevel::Error => LevelFilter::Error,
            Loglevel::Warn => LevelFilter::Warn,
            Loglevel::Info => LevelFilter::Info,
            Loglevel::Debug => LevelFilter::Debug,
            Loglevel::Trace => LevelFilter::Trace,
        }
    }
}
