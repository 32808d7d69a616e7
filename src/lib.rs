//! TransIP DNS provider for hosts that manage records through the generic
//! getter / appender / setter / deleter record traits.

pub mod config;
pub mod error;

pub mod auth {
    pub mod credentials;
}

pub mod core {
    pub mod provider;
    pub mod record;
}

pub mod providers {
    pub mod transip;
}

pub use config::TransipConfig;
pub use crate::core::provider::{DNSProvider, RecordAppender, RecordDeleter, RecordGetter, RecordSetter};
pub use crate::core::record::{DNSRecord, DNSRecordType};
pub use error::Error;
pub use providers::transip::TransipProvider;
