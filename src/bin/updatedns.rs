mod cli;

use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;

use clap::Parser;
use env_logger::Builder;
use itertools::Itertools;
use log::debug;

use updatedns::{
    config::{self, Config},
    iplog::IpLog,
    ipv4source::{DnsEchoConfig, DnsEchoSource},
    provider::{DigitalOceanProvider, DigitalOceanProviderConfig},
    reporter::{ConsoleReporter, Reporter, SyslogReporter},
    updater::{UpdateOutcome, Updater},
};

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    Builder::new().filter_level(cli.loglevel.into()).init();

    let reporter: Box<dyn Reporter> = if cli.syslog {
        match SyslogReporter::new(cli.verbose) {
            Ok(r) => Box::new(r),
            Err(e) => {
                eprintln!("updatedns: could not connect to syslog: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        Box::new(ConsoleReporter::new(!cli.no_color, cli.verbose))
    };

    match run(&cli, reporter.as_ref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

fn run(cli: &Cli, reporter: &dyn Reporter) -> Result<(), ()> {
    let config = match Config::load(&cli.configuration_file) {
        Ok(c) => c,
        Err(e) => {
            reporter.error(&e.to_string());
            return Err(());
        }
    };

    let token = match config::read_access_token(&config.personal_access_token_file) {
        Ok(t) => t,
        Err(e) => {
            reporter.error(&e.to_string());
            return Err(());
        }
    };

    let provider = match DigitalOceanProvider::from_config(&DigitalOceanProviderConfig {
        api_token: &token,
    }) {
        Ok(p) => p,
        Err(e) => {
            reporter.error(&e.to_string());
            return Err(());
        }
    };

    let source = DnsEchoSource::from_config(&DnsEchoConfig {
        hostname: cli.echo_hostname.to_owned(),
        servers: cli
            .echo_dns_servers
            .iter()
            .map(|ip4| SocketAddr::new(IpAddr::V4(ip4.to_owned()), 53))
            .collect_vec(),
    });

    let log = IpLog::new(config.public_ip_address_log_file.to_owned());

    let updater = Updater::new(source.as_ref(), provider.as_ref(), &log, reporter);
    match updater.run(&config.domains) {
        Ok(UpdateOutcome::Unchanged { address }) => {
            debug!("No change, still {}", address);
            Ok(())
        }
        Ok(UpdateOutcome::Updated { address, records }) => {
            debug!("Updated {} records to {}", records, address);
            Ok(())
        }
        Err(e) => {
            reporter.error(&e.to_string());
            Err(())
        }
    }
}
