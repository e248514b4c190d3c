use std::net::Ipv4Addr;

use log::debug;
use thiserror::Error;

use crate::{
    config::DomainConfig,
    iplog::{IpLog, IpLogError},
    ipv4source::{Ipv4Source, SourceError},
    provider::{DnsProvider, ProviderError},
    reporter::Reporter,
};

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("{0}")]
    Source(#[from] SourceError),
    #[error("{0}")]
    Provider(#[from] ProviderError),
    #[error("{0}")]
    Log(#[from] IpLogError),
}

/// How a run ended, for callers that want more than the exit code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The public address has not changed; nothing was touched
    Unchanged { address: Ipv4Addr },
    /// Every configured record now points at `address`
    Updated { address: Ipv4Addr, records: usize },
}

/// An updater performs one full detect-compare-update cycle.
///
/// All collaborators are borrowed: the binary builds them once from the
/// configuration and the updater only drives them.
pub struct Updater<'a> {
    source: &'a dyn Ipv4Source,
    provider: &'a dyn DnsProvider,
    log: &'a IpLog,
    reporter: &'a dyn Reporter,
}

impl<'a> Updater<'a> {
    pub fn new(
        source: &'a dyn Ipv4Source,
        provider: &'a dyn DnsProvider,
        log: &'a IpLog,
        reporter: &'a dyn Reporter,
    ) -> Updater<'a> {
        Self {
            source,
            provider,
            log,
            reporter,
        }
    }

    /// Run one update cycle over `domains`.
    ///
    /// Records are visited in configuration order and the first failure
    /// aborts the rest of the run: a partial run must not be committed to
    /// the address log, so the next run retries the full set. The log entry
    /// is appended only after every record has been updated.
    pub fn run(&self, domains: &[DomainConfig]) -> Result<UpdateOutcome, UpdateError> {
        let address = self.source.addr()?;
        self.reporter
            .info(&format!("The public IP address is {}", address));

        let last = self.log.last_address()?;
        match last {
            Some(last) => self
                .reporter
                .info(&format!("The last public IP address was {}", last)),
            None => self.reporter.info("The last public IP address was not set"),
        }

        if last == Some(address) {
            self.reporter.info("No updates performed.");
            return Ok(UpdateOutcome::Unchanged { address });
        }

        let mut records = 0;
        for domain in domains {
            for record in &domain.records {
                self.reporter.info(&format!(
                    "Updating DNS {}, {} record {} ...",
                    domain.name, record.record_type, record.name
                ));
                let record_id =
                    self.provider
                        .resolve_record_id(&domain.name, &record.name, &record.record_type)?;
                debug!(
                    "Record {} in {} has id {}",
                    record.name, domain.name, record_id
                );
                self.provider
                    .update_record(&domain.name, &record_id, address)?;
                records += 1;
            }
        }

        self.log.append(address)?;
        self.reporter.info("All updates performed.");
        Ok(UpdateOutcome::Updated { address, records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::RecordConfig,
        iplog::IpLog,
        ipv4source::FixedSource,
        provider::MockDnsProvider,
        reporter::Reporter,
    };
    use mockall::{predicate::eq, Sequence};
    use std::{fs, path::PathBuf, sync::Mutex};
    use tempfile::{tempdir, TempDir};

    #[derive(Default)]
    struct RecordingReporter {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingReporter {
        fn contains(&self, needle: &str) -> bool {
            self.messages
                .lock()
                .unwrap()
                .iter()
                .any(|m| m.contains(needle))
        }
    }

    impl Reporter for RecordingReporter {
        fn info(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
        fn error(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn addr(text: &str) -> Ipv4Addr {
        text.parse().unwrap()
    }

    fn domain(name: &str, records: &[(&str, &str)]) -> DomainConfig {
        DomainConfig {
            name: name.to_string(),
            records: records
                .iter()
                .map(|(name, record_type)| RecordConfig {
                    name: name.to_string(),
                    record_type: record_type.to_string(),
                })
                .collect(),
        }
    }

    /// Log file primed with `entries`, or left missing when empty
    fn log_file(entries: &[&str]) -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("updatedns.log");
        if !entries.is_empty() {
            let mut contents = String::new();
            for (i, entry) in entries.iter().enumerate() {
                contents.push_str(&format!("2024-01-02T03:04:{:02}-05:00 {}\n", i, entry));
            }
            fs::write(&path, contents).unwrap();
        }
        (dir, path)
    }

    #[test]
    fn unchanged_address_touches_nothing() {
        let (_dir, path) = log_file(&["203.0.113.9"]);
        let log = IpLog::new(path.clone());
        let source = FixedSource::create(addr("203.0.113.9"));
        // No expectations: any provider call fails the test
        let provider = MockDnsProvider::new();
        let reporter = RecordingReporter::default();

        let updater = Updater::new(source.as_ref(), &provider, &log, &reporter);
        let outcome = updater
            .run(&[domain("example.com", &[("www.example.com", "A")])])
            .unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::Unchanged {
                address: addr("203.0.113.9")
            }
        );
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
        assert!(reporter.contains("No updates performed."));
    }

    #[test]
    fn missing_log_forces_an_update() {
        let (_dir, path) = log_file(&[]);
        let log = IpLog::new(path.clone());
        let source = FixedSource::create(addr("203.0.113.9"));
        let reporter = RecordingReporter::default();

        let mut provider = MockDnsProvider::new();
        provider
            .expect_resolve_record_id()
            .times(1)
            .returning(|_, _, _| Ok("abc123".to_string()));
        provider
            .expect_update_record()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let updater = Updater::new(source.as_ref(), &provider, &log, &reporter);
        let outcome = updater
            .run(&[domain("example.com", &[("www.example.com", "A")])])
            .unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                address: addr("203.0.113.9"),
                records: 1
            }
        );
        assert!(fs::read_to_string(&path)
            .unwrap()
            .trim_end()
            .ends_with("203.0.113.9"));
    }

    #[test]
    fn changed_address_updates_and_commits() {
        let (_dir, path) = log_file(&["203.0.113.5"]);
        let log = IpLog::new(path.clone());
        let source = FixedSource::create(addr("203.0.113.9"));
        let reporter = RecordingReporter::default();

        let mut provider = MockDnsProvider::new();
        provider
            .expect_resolve_record_id()
            .with(eq("example.com"), eq("www.example.com"), eq("A"))
            .times(1)
            .returning(|_, _, _| Ok("abc123".to_string()));
        provider
            .expect_update_record()
            .with(eq("example.com"), eq("abc123"), eq(addr("203.0.113.9")))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let updater = Updater::new(source.as_ref(), &provider, &log, &reporter);
        let outcome = updater
            .run(&[domain("example.com", &[("www.example.com", "A")])])
            .unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                address: addr("203.0.113.9"),
                records: 1
            }
        );

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.trim_end().ends_with("203.0.113.9"));
        assert!(reporter.contains("All updates performed."));
    }

    #[test]
    fn records_are_visited_in_configuration_order() {
        let (_dir, path) = log_file(&[]);
        let log = IpLog::new(path);
        let source = FixedSource::create(addr("203.0.113.9"));
        let reporter = RecordingReporter::default();

        let mut seq = Sequence::new();
        let mut provider = MockDnsProvider::new();
        for (domain_name, id) in [("example.com", "1"), ("example.org", "2")] {
            provider
                .expect_resolve_record_id()
                .with(eq(domain_name), eq("www"), eq("A"))
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_, _, _| Ok(id.to_string()));
            provider
                .expect_update_record()
                .with(eq(domain_name), eq(id), eq(addr("203.0.113.9")))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _, _| Ok(()));
        }

        let updater = Updater::new(source.as_ref(), &provider, &log, &reporter);
        let outcome = updater
            .run(&[
                domain("example.com", &[("www", "A")]),
                domain("example.org", &[("www", "A")]),
            ])
            .unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                address: addr("203.0.113.9"),
                records: 2
            }
        );
    }

    #[test]
    fn first_failure_stops_the_run_and_commits_nothing() {
        let (_dir, path) = log_file(&[]);
        let log = IpLog::new(path.clone());
        let source = FixedSource::create(addr("203.0.113.9"));
        let reporter = RecordingReporter::default();

        let mut provider = MockDnsProvider::new();
        // Only the first record may be touched; times(1) turns any further
        // call into a test failure
        provider
            .expect_resolve_record_id()
            .with(eq("example.com"), eq("www.example.com"), eq("A"))
            .times(1)
            .returning(|_, _, _| Ok("id-www".to_string()));
        provider
            .expect_update_record()
            .times(1)
            .returning(|_, _, _| Err(ProviderError::Unavailable("[503] down".to_string())));

        let updater = Updater::new(source.as_ref(), &provider, &log, &reporter);
        let result = updater.run(&[domain(
            "example.com",
            &[("www.example.com", "A"), ("home.example.com", "A")],
        )]);

        assert!(matches!(
            result,
            Err(UpdateError::Provider(ProviderError::Unavailable(_)))
        ));
        assert!(!path.exists(), "a failed run must not be committed");
    }

    #[test]
    fn missing_record_is_fatal() {
        let (_dir, path) = log_file(&[]);
        let log = IpLog::new(path.clone());
        let source = FixedSource::create(addr("203.0.113.9"));
        let reporter = RecordingReporter::default();

        let mut provider = MockDnsProvider::new();
        provider
            .expect_resolve_record_id()
            .times(1)
            .returning(|domain, name, record_type| {
                Err(ProviderError::RecordNotFound {
                    domain: domain.to_string(),
                    name: name.to_string(),
                    record_type: record_type.to_string(),
                })
            });

        let updater = Updater::new(source.as_ref(), &provider, &log, &reporter);
        let result = updater.run(&[domain("example.com", &[("www.example.com", "A")])]);

        assert!(matches!(
            result,
            Err(UpdateError::Provider(ProviderError::RecordNotFound { .. }))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn detection_failure_is_fatal_before_any_provider_call() {
        struct FailingSource;
        impl Ipv4Source for FailingSource {
            fn addr(&self) -> Result<Ipv4Addr, SourceError> {
                Err(SourceError::NoAnswer("myip.opendns.com".to_string()))
            }
        }

        let (_dir, path) = log_file(&[]);
        let log = IpLog::new(path);
        let provider = MockDnsProvider::new();
        let reporter = RecordingReporter::default();

        let updater = Updater::new(&FailingSource, &provider, &log, &reporter);
        let result = updater.run(&[domain("example.com", &[("www.example.com", "A")])]);

        assert!(matches!(result, Err(UpdateError::Source(_))));
    }
}
