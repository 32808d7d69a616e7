use crate::core::record::DNSRecord;
use crate::error::Error;
use async_trait::async_trait;

#[async_trait]
pub trait RecordGetter: Send + Sync {
    /// Lists all records in the zone.
    async fn get_records(&self, zone: &str) -> Result<Vec<DNSRecord>, Error>;
}

#[async_trait]
pub trait RecordAppender: Send + Sync {
    /// Adds records to the zone and returns the records that were added.
    async fn append_records(
        &self,
        zone: &str,
        records: Vec<DNSRecord>,
    ) -> Result<Vec<DNSRecord>, Error>;
}

#[async_trait]
pub trait RecordSetter: Send + Sync {
    /// Updates matching records or creates them, returning what was set.
    async fn set_records(&self, zone: &str, records: Vec<DNSRecord>)
    -> Result<Vec<DNSRecord>, Error>;
}

#[async_trait]
pub trait RecordDeleter: Send + Sync {
    /// Removes records from the zone and returns the records that were removed.
    async fn delete_records(
        &self,
        zone: &str,
        records: Vec<DNSRecord>,
    ) -> Result<Vec<DNSRecord>, Error>;
}

pub trait DNSProvider: RecordGetter + RecordAppender + RecordSetter + RecordDeleter {
    fn name(&self) -> &str;
}
