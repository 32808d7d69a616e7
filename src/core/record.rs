use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DNSRecordType {
    A,
    AAAA,
    CNAME,
    MX,
    NS,
    TXT,
    SRV,
    CAA,
    Other(String),
}

impl FromStr for DNSRecordType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Ok(match upper.as_str() {
            "A" => DNSRecordType::A,
            "AAAA" => DNSRecordType::AAAA,
            "CNAME" => DNSRecordType::CNAME,
            "MX" => DNSRecordType::MX,
            "NS" => DNSRecordType::NS,
            "TXT" => DNSRecordType::TXT,
            "SRV" => DNSRecordType::SRV,
            "CAA" => DNSRecordType::CAA,
            _ => DNSRecordType::Other(upper),
        })
    }
}

impl fmt::Display for DNSRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DNSRecordType::A => "A",
            DNSRecordType::AAAA => "AAAA",
            DNSRecordType::CNAME => "CNAME",
            DNSRecordType::MX => "MX",
            DNSRecordType::NS => "NS",
            DNSRecordType::TXT => "TXT",
            DNSRecordType::SRV => "SRV",
            DNSRecordType::CAA => "CAA",
            DNSRecordType::Other(other) => other,
        };
        f.write_str(s)
    }
}

/// Provider-agnostic DNS record as exchanged with the host.
///
/// `name` is relative to the zone (`@` for the apex). `id` is provider-opaque
/// and stays `None` for providers without stable record identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DNSRecord {
    pub id: Option<String>,
    pub record_type: DNSRecordType,
    pub name: String,
    pub value: String,
    pub ttl: Duration,
}

impl DNSRecord {
    pub fn new(
        record_type: DNSRecordType,
        name: impl Into<String>,
        value: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: None,
            record_type,
            name: name.into(),
            value: value.into(),
            ttl,
        }
    }

    /// TTL in whole seconds, saturating at `u32::MAX`.
    pub fn ttl_secs(&self) -> u32 {
        u32::try_from(self.ttl.as_secs()).unwrap_or(u32::MAX)
    }
}
