//! TransIP provider implementation

pub mod client;
pub mod error;
pub mod types;


pub use client::{TransipClient, ZoneClient};
pub use error::TransipProviderError;
pub use types::DnsEntry;

use crate::config::TransipConfig;
use crate::core::provider::{
    DNSProvider, RecordAppender, RecordDeleter, RecordGetter, RecordSetter,
};
use crate::core::record::DNSRecord;
use crate::error::Error;
use async_trait::async_trait;
use error::map_error;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use types::{to_dns_entry, to_dns_record};

/// TTLs below this are not accepted reliably by the API.
pub const MIN_TTL: Duration = Duration::from_secs(300);

/// Trims one trailing "." from a zone name. The API does not use FQDNs.
pub fn un_fqdn(zone: &str) -> &str {
    zone.strip_suffix('.').unwrap_or(zone)
}

/// Adapts the generic record traits onto a TransIP account.
///
/// The API client is built on first use. The mutex only guards that
/// construction; remote calls run without holding it.
pub struct TransipProvider {
    config: TransipConfig,
    client: Mutex<Option<Arc<dyn ZoneClient>>>,
}

impl TransipProvider {
    pub fn new(config: TransipConfig) -> Self {
        Self {
            config,
            client: Mutex::new(None),
        }
    }

    /// Uses an already constructed zone client instead of building one lazily.
    pub fn with_client(config: TransipConfig, client: Arc<dyn ZoneClient>) -> Self {
        Self {
            config,
            client: Mutex::new(Some(client)),
        }
    }

    pub fn config(&self) -> &TransipConfig {
        &self.config
    }

    async fn client(&self) -> Result<Arc<dyn ZoneClient>, Error> {
        let mut guard = self.client.lock().await;
        if let Some(client) = guard.as_ref() {
            return Ok(Arc::clone(client));
        }

        let client: Arc<dyn ZoneClient> =
            Arc::new(TransipClient::new(self.config.clone()).map_err(map_error)?);
        *guard = Some(Arc::clone(&client));
        Ok(client)
    }
}

fn remote_failure(e: TransipProviderError, op: &str, domain: &str) -> Error {
    warn!("TransIP {op} failed for {domain}: {e}");
    map_error(e)
}

#[async_trait]
impl RecordGetter for TransipProvider {
    async fn get_records(&self, zone: &str) -> Result<Vec<DNSRecord>, Error> {
        let domain = un_fqdn(zone);
        let client = self.client().await?;
        let entries = client
            .list_entries(domain)
            .await
            .map_err(|e| remote_failure(e, "list", domain))?;
        Ok(entries.iter().map(to_dns_record).collect())
    }
}

#[async_trait]
impl RecordAppender for TransipProvider {
    async fn append_records(
        &self,
        zone: &str,
        records: Vec<DNSRecord>,
    ) -> Result<Vec<DNSRecord>, Error> {
        let domain = un_fqdn(zone);
        let client = self.client().await?;
        let mut appended = Vec::with_capacity(records.len());

        for record in records {
            let mut entry = to_dns_entry(&record, domain);
            entry.expire = entry.expire.max(MIN_TTL.as_secs() as u32);
            client
                .add_entry(domain, &entry)
                .await
                .map_err(|e| remote_failure(e, "add", domain))?;
            appended.push(to_dns_record(&entry));
        }

        debug!("Appended {} records to {domain}", appended.len());
        Ok(appended)
    }
}

#[async_trait]
impl RecordSetter for TransipProvider {
    async fn set_records(
        &self,
        zone: &str,
        records: Vec<DNSRecord>,
    ) -> Result<Vec<DNSRecord>, Error> {
        let domain = un_fqdn(zone);
        let client = self.client().await?;
        let mut set = Vec::with_capacity(records.len());

        for record in records {
            let mut entry = to_dns_entry(&record, domain);
            let mut entries = client
                .list_entries(domain)
                .await
                .map_err(|e| remote_failure(e, "list", domain))?;

            match entries.iter().position(|e| e.same_identity(&entry)) {
                Some(index) => {
                    // Keep the stored spelling; the API matches names literally.
                    entry.name = entries[index].name.clone();
                    let duplicates = entries.iter().filter(|e| e.same_identity(&entry)).count();
                    if duplicates == 1 && entries[index].expire == entry.expire {
                        client
                            .update_entry(domain, &entry)
                            .await
                            .map_err(|e| remote_failure(e, "update", domain))?;
                    } else {
                        entries[index] = entry.clone();
                        client
                            .replace_entries(domain, &entries)
                            .await
                            .map_err(|e| remote_failure(e, "replace", domain))?;
                    }
                }
                None => {
                    client
                        .add_entry(domain, &entry)
                        .await
                        .map_err(|e| remote_failure(e, "add", domain))?;
                }
            }

            set.push(to_dns_record(&entry));
        }

        debug!("Set {} records in {domain}", set.len());
        Ok(set)
    }
}

#[async_trait]
impl RecordDeleter for TransipProvider {
    async fn delete_records(
        &self,
        zone: &str,
        records: Vec<DNSRecord>,
    ) -> Result<Vec<DNSRecord>, Error> {
        let domain = un_fqdn(zone);
        let client = self.client().await?;
        let mut deleted = Vec::with_capacity(records.len());

        for record in records {
            let wanted = to_dns_entry(&record, domain);
            let entries = client
                .list_entries(domain)
                .await
                .map_err(|e| remote_failure(e, "list", domain))?;

            // Content only narrows the match when the caller supplied one.
            let Some(existing) = entries.into_iter().find(|e| {
                e.same_identity(&wanted) && (wanted.content.is_empty() || e.content == wanted.content)
            }) else {
                return Err(Error::NotFound(format!(
                    "no {} record named {} in zone {domain}",
                    wanted.entry_type, wanted.name
                )));
            };

            client
                .remove_entry(domain, &existing)
                .await
                .map_err(|e| remote_failure(e, "remove", domain))?;
            deleted.push(to_dns_record(&existing));
        }

        debug!("Deleted {} records from {domain}", deleted.len());
        Ok(deleted)
    }
}

impl DNSProvider for TransipProvider {
    fn name(&self) -> &str {
        "transip"
    }
}
