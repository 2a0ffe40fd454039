//! Resolver adapter: wraps `hickory_resolver` and normalizes each record
//! type into a uniform [`DnsRecord`] value.

use std::net::SocketAddr;
use std::time::Duration;

use hickory_resolver::config::{
    LookupIpStrategy, NameServerConfig, Protocol, ResolverConfig, ResolverOpts,
};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::TokioAsyncResolver;
use thiserror::Error;

use crate::config::ConfigError;
use crate::record::{DnsRecord, RecordKind};

/// Per-domain resolution failures. Recovered locally by the monitor loop:
/// reported as an error outcome, never fatal.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The lookup succeeded but no values of the requested kind remained.
    #[error("no {kind} records found for {domain}")]
    NotFound { domain: String, kind: RecordKind },

    /// The underlying resolver reported a failure.
    #[error("failed to look up {kind} records for {domain}: {source}")]
    ResolutionFailed {
        domain: String,
        kind: RecordKind,
        #[source]
        source: ResolveError,
    },
}

impl LookupError {
    fn not_found(domain: &str, kind: RecordKind) -> Self {
        LookupError::NotFound {
            domain: domain.to_string(),
            kind,
        }
    }

    fn resolution_failed(domain: &str, kind: RecordKind, source: ResolveError) -> Self {
        LookupError::ResolutionFailed {
            domain: domain.to_string(),
            kind,
            source,
        }
    }
}

/// DNS client querying the configured servers (or the resolver default
/// configuration when none are given).
pub struct DnsClient {
    resolver: TokioAsyncResolver,
}

impl DnsClient {
    /// Builds a client for the given `host:port` server addresses.
    ///
    /// An empty server list uses the resolver's default configuration.
    pub fn new(servers: &[String], timeout: Duration) -> Result<Self, ConfigError> {
        let opts = resolver_opts(timeout);

        let config = if servers.is_empty() {
            ResolverConfig::default()
        } else {
            let mut config = ResolverConfig::new();
            for server in servers {
                let addr: SocketAddr =
                    server
                        .parse()
                        .map_err(|source| ConfigError::InvalidServer {
                            addr: server.clone(),
                            source,
                        })?;
                config.add_name_server(NameServerConfig::new(addr, Protocol::Udp));
            }
            config
        };

        Ok(DnsClient {
            resolver: TokioAsyncResolver::tokio(config, opts),
        })
    }

    /// Resolves one record kind for a domain into a normalized record.
    pub async fn query(&self, domain: &str, kind: RecordKind) -> Result<DnsRecord, LookupError> {
        match kind {
            RecordKind::A => self.query_a(domain).await,
            RecordKind::Aaaa => self.query_aaaa(domain).await,
            RecordKind::Cname => self.query_cname(domain).await,
            RecordKind::Mx => self.query_mx(domain).await,
            RecordKind::Txt => self.query_txt(domain).await,
        }
    }

    async fn query_a(&self, domain: &str) -> Result<DnsRecord, LookupError> {
        let lookup = self
            .resolver
            .lookup_ip(domain)
            .await
            .map_err(|e| LookupError::resolution_failed(domain, RecordKind::A, e))?;

        let values: Vec<String> = lookup
            .iter()
            .filter(|ip| ip.is_ipv4())
            .map(|ip| ip.to_string())
            .collect();

        if values.is_empty() {
            return Err(LookupError::not_found(domain, RecordKind::A));
        }
        Ok(DnsRecord::new(domain, RecordKind::A, values))
    }

    async fn query_aaaa(&self, domain: &str) -> Result<DnsRecord, LookupError> {
        let lookup = self
            .resolver
            .lookup_ip(domain)
            .await
            .map_err(|e| LookupError::resolution_failed(domain, RecordKind::Aaaa, e))?;

        let values: Vec<String> = lookup
            .iter()
            .filter(|ip| ip.is_ipv6())
            .map(|ip| ip.to_string())
            .collect();

        if values.is_empty() {
            return Err(LookupError::not_found(domain, RecordKind::Aaaa));
        }
        Ok(DnsRecord::new(domain, RecordKind::Aaaa, values))
    }

    async fn query_cname(&self, domain: &str) -> Result<DnsRecord, LookupError> {
        match self.resolver.lookup(domain, RecordType::CNAME).await {
            Ok(lookup) => {
                let canonical = lookup
                    .iter()
                    .find_map(|rdata| match rdata {
                        RData::CNAME(name) => Some(name.to_utf8()),
                        _ => None,
                    })
                    .unwrap_or_else(|| domain.to_string());
                Ok(DnsRecord::new(
                    domain,
                    RecordKind::Cname,
                    vec![strip_root_label(&canonical)],
                ))
            }
            // A domain that exists without a CNAME record is canonical for
            // itself; only NXDOMAIN and transport failures are errors.
            Err(err) if exists_without_records(&err) => Ok(DnsRecord::new(
                domain,
                RecordKind::Cname,
                vec![strip_root_label(domain)],
            )),
            Err(err) => Err(LookupError::resolution_failed(domain, RecordKind::Cname, err)),
        }
    }

    async fn query_mx(&self, domain: &str) -> Result<DnsRecord, LookupError> {
        let lookup = self
            .resolver
            .lookup(domain, RecordType::MX)
            .await
            .map_err(|e| LookupError::resolution_failed(domain, RecordKind::Mx, e))?;

        // Formatted as "<preference> <exchange>" and sorted as text, so the
        // ordering is lexicographic over the combined string.
        let values: Vec<String> = lookup
            .iter()
            .filter_map(|rdata| {
                if let RData::MX(mx) = rdata {
                    Some(format!(
                        "{} {}",
                        mx.preference(),
                        strip_root_label(&mx.exchange().to_utf8())
                    ))
                } else {
                    None
                }
            })
            .collect();

        Ok(DnsRecord::new(domain, RecordKind::Mx, values))
    }

    async fn query_txt(&self, domain: &str) -> Result<DnsRecord, LookupError> {
        let lookup = self
            .resolver
            .lookup(domain, RecordType::TXT)
            .await
            .map_err(|e| LookupError::resolution_failed(domain, RecordKind::Txt, e))?;

        // TXT records can be split across multiple byte slices, join them
        let values: Vec<String> = lookup
            .iter()
            .filter_map(|rdata| {
                if let RData::TXT(txt) = rdata {
                    let joined: String = txt
                        .iter()
                        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                        .collect();
                    Some(joined)
                } else {
                    None
                }
            })
            .collect();

        if values.is_empty() {
            return Err(LookupError::not_found(domain, RecordKind::Txt));
        }
        Ok(DnsRecord::new(domain, RecordKind::Txt, values))
    }
}

fn resolver_opts(timeout: Duration) -> ResolverOpts {
    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    opts.attempts = 2; // fail faster on unresponsive servers
    opts.ndots = 0; // domains are absolute, never append search suffixes
    // Always query both address families; the stock strategy only asks for
    // AAAA once A comes back empty, which hides IPv6 records on dual-stack
    // names.
    opts.ip_strategy = LookupIpStrategy::Ipv4AndIpv6;
    opts
}

/// True when the response was authoritative "name exists, no such records".
fn exists_without_records(err: &ResolveError) -> bool {
    matches!(
        err.kind(),
        ResolveErrorKind::NoRecordsFound { response_code, .. }
            if is_clean_empty_answer(*response_code)
    )
}

/// Only a NOERROR negative answer proves the name exists. NXDOMAIN and
/// server failures stay errors.
fn is_clean_empty_answer(code: ResponseCode) -> bool {
    code == ResponseCode::NoError
}

/// Strips a single trailing root-label terminator, if present.
fn strip_root_label(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn client_accepts_normalized_server_addresses() {
        let servers = vec!["8.8.8.8:53".to_string(), "1.1.1.1:53".to_string()];
        assert!(DnsClient::new(&servers, Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn client_rejects_unparseable_server_address() {
        let servers = vec!["not-an-ip:53".to_string()];
        let Err(err) = DnsClient::new(&servers, Duration::from_secs(5)) else {
            panic!("expected the bad server address to be rejected");
        };
        assert!(err.to_string().contains("not-an-ip:53"));
    }

    #[test]
    fn lookups_query_both_address_families() {
        let opts = resolver_opts(Duration::from_secs(5));
        assert_eq!(opts.ip_strategy, LookupIpStrategy::Ipv4AndIpv6);
    }

    #[test]
    fn only_noerror_empty_answers_fall_back_to_the_name_itself() {
        assert!(is_clean_empty_answer(ResponseCode::NoError));
        assert!(!is_clean_empty_answer(ResponseCode::NXDomain));
        assert!(!is_clean_empty_answer(ResponseCode::ServFail));
        assert!(!is_clean_empty_answer(ResponseCode::Refused));
    }

    #[tokio::test]
    async fn empty_server_list_uses_default_configuration() {
        assert!(DnsClient::new(&[], Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn strip_root_label_removes_one_terminator() {
        assert_eq!(strip_root_label("mail.example.com."), "mail.example.com");
        assert_eq!(strip_root_label("mail.example.com"), "mail.example.com");
    }

    #[test]
    fn lookup_error_messages_name_domain_and_kind() {
        let err = LookupError::not_found("example.com", RecordKind::Txt);
        assert_eq!(err.to_string(), "no TXT records found for example.com");
    }
}
