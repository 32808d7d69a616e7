use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::record::{DNSRecord, DNSRecordType};

#[derive(Serialize, Debug)]
pub struct AuthRequest {
    pub login: String,
    pub nonce: String,
    pub read_only: bool,
    pub expiration_time: String,
    pub label: String,
    pub global_key: bool,
}

#[derive(Deserialize, Debug)]
pub struct AuthResponse {
    pub token: String,
}

/// A DNS entry as the TransIP API represents it. `expire` is the TTL in
/// seconds; entries carry no identifier of their own.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DnsEntry {
    pub name: String,
    pub expire: u32,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub content: String,
}

impl DnsEntry {
    pub fn same_identity(&self, other: &DnsEntry) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.entry_type.eq_ignore_ascii_case(&other.entry_type)
    }
}

#[derive(Deserialize, Debug)]
pub struct DnsEntriesResponse {
    #[serde(rename = "dnsEntries", default)]
    pub dns_entries: Vec<DnsEntry>,
}

#[derive(Serialize, Debug)]
pub struct DnsEntryRequest<'a> {
    #[serde(rename = "dnsEntry")]
    pub dns_entry: &'a DnsEntry,
}

#[derive(Serialize, Debug)]
pub struct DnsEntriesRequest<'a> {
    #[serde(rename = "dnsEntries")]
    pub dns_entries: &'a [DnsEntry],
}

#[derive(Deserialize, Debug)]
pub struct TransipError {
    pub error: String,
}

pub fn to_dns_record(entry: &DnsEntry) -> DNSRecord {
    DNSRecord {
        id: None,
        record_type: entry
            .entry_type
            .parse::<DNSRecordType>()
            .unwrap_or_else(|never| match never {}),
        name: entry.name.clone(),
        value: entry.content.clone(),
        ttl: Duration::from_secs(u64::from(entry.expire)),
    }
}

/// Converts a host name, relative or absolute, into the zone-relative form
/// the API stores. The zone apex is `@`.
pub fn relative_name(name: &str, zone: &str) -> String {
    let name = name.strip_suffix('.').unwrap_or(name);
    let zone = zone.strip_suffix('.').unwrap_or(zone);
    if name.is_empty() || name == "@" || name.eq_ignore_ascii_case(zone) {
        return "@".to_string();
    }

    let split = name.len().checked_sub(zone.len() + 1);
    match split {
        Some(at)
            if !zone.is_empty()
                && name.is_char_boundary(at)
                && name[at..].starts_with('.')
                && name[at + 1..].eq_ignore_ascii_case(zone) =>
        {
            name[..at].to_string()
        }
        _ => name.to_string(),
    }
}

pub fn to_dns_entry(rec: &DNSRecord, zone: &str) -> DnsEntry {
    DnsEntry {
        name: relative_name(&rec.name, zone),
        expire: rec.ttl_secs(),
        entry_type: rec.record_type.to_string(),
        content: rec.value.clone(),
    }
}
