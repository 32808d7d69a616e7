use async_trait::async_trait;
use log::{debug, info};
use rand::Rng;
use rand::distributions::Alphanumeric;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::auth::credentials::{PrivateKeySigner, RequestSigner};
use crate::config::TransipConfig;
use crate::providers::transip::error::TransipProviderError;
use crate::providers::transip::types::*;

const TOKEN_EXPIRATION: &str = "30 minutes";
// Renew a little before the API expires the token.
const TOKEN_REFRESH_AFTER: Duration = Duration::from_secs(25 * 60);

/// Authenticated operations on a zone's entry list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ZoneClient: Send + Sync {
    async fn list_entries(&self, domain: &str) -> Result<Vec<DnsEntry>, TransipProviderError>;
    async fn add_entry(&self, domain: &str, entry: &DnsEntry)
    -> Result<(), TransipProviderError>;
    /// Changes the content of the entry identified by name, type and expire.
    async fn update_entry(
        &self,
        domain: &str,
        entry: &DnsEntry,
    ) -> Result<(), TransipProviderError>;
    /// Replaces every entry of the zone with `entries`.
    async fn replace_entries(
        &self,
        domain: &str,
        entries: &[DnsEntry],
    ) -> Result<(), TransipProviderError>;
    async fn remove_entry(
        &self,
        domain: &str,
        entry: &DnsEntry,
    ) -> Result<(), TransipProviderError>;
}

struct AccessToken {
    value: String,
    obtained: Instant,
}

pub struct TransipClient {
    config: TransipConfig,
    client: Client,
    signer: Arc<dyn RequestSigner>,
    token: Mutex<Option<AccessToken>>,
}

impl TransipClient {
    /// Builds a client that signs with the key at `config.private_key_path`.
    pub fn new(config: TransipConfig) -> Result<Self, TransipProviderError> {
        let signer = PrivateKeySigner::from_file(&config.private_key_path)
            .map_err(|e| TransipProviderError::Credential(e.to_string()))?;
        Self::with_signer(config, Arc::new(signer))
    }

    pub fn with_signer(
        config: TransipConfig,
        signer: Arc<dyn RequestSigner>,
    ) -> Result<Self, TransipProviderError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            config,
            client,
            signer,
            token: Mutex::new(None),
        })
    }

    async fn authenticate(&self) -> Result<String, TransipProviderError> {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();

        let auth = AuthRequest {
            login: self.config.account_name.clone(),
            label: format!("dns-transip {nonce}"),
            nonce,
            read_only: self.config.read_only,
            expiration_time: TOKEN_EXPIRATION.to_string(),
            global_key: self.config.global_key,
        };
        // The signature covers the exact bytes sent.
        let body = serde_json::to_vec(&auth)?;
        let signature = self
            .signer
            .sign(&body)
            .map_err(|e| TransipProviderError::Credential(e.to_string()))?;

        let response = self
            .client
            .post(format!("{}/auth", self.config.api_url))
            .header(CONTENT_TYPE, "application/json")
            .header("Signature", signature)
            .body(body)
            .send()
            .await?;

        let token: AuthResponse = Self::check(response).await?.json().await?;
        info!(
            "Obtained TransIP access token for account {}",
            self.config.account_name
        );
        Ok(token.token)
    }

    async fn access_token(&self) -> Result<String, TransipProviderError> {
        let mut token = self.token.lock().await;
        if let Some(current) = token.as_ref() {
            if current.obtained.elapsed() < TOKEN_REFRESH_AFTER {
                return Ok(current.value.clone());
            }
        }

        let value = self.authenticate().await?;
        *token = Some(AccessToken {
            value: value.clone(),
            obtained: Instant::now(),
        });
        Ok(value)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, TransipProviderError> {
        let token = self.access_token().await?;
        let response = request
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await?;
        Self::check(response).await
    }

    async fn check(response: Response) -> Result<Response, TransipProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error: TransipError = response.json().await.unwrap_or(TransipError {
            error: status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        });
        Err(TransipProviderError::from_status(status, error.error))
    }

    fn dns_url(&self, domain: &str) -> String {
        format!("{}/domains/{}/dns", self.config.api_url, domain)
    }
}

#[async_trait]
impl ZoneClient for TransipClient {
    async fn list_entries(&self, domain: &str) -> Result<Vec<DnsEntry>, TransipProviderError> {
        debug!("Listing DNS entries for {domain}");
        let response = self.send(self.client.get(self.dns_url(domain))).await?;
        let body: DnsEntriesResponse = response.json().await?;
        Ok(body.dns_entries)
    }

    async fn add_entry(
        &self,
        domain: &str,
        entry: &DnsEntry,
    ) -> Result<(), TransipProviderError> {
        debug!(
            "Adding {} entry {} to {domain}",
            entry.entry_type, entry.name
        );
        let req = DnsEntryRequest { dns_entry: entry };
        self.send(self.client.post(self.dns_url(domain)).json(&req))
            .await
            .map(|_| ())
    }

    async fn update_entry(
        &self,
        domain: &str,
        entry: &DnsEntry,
    ) -> Result<(), TransipProviderError> {
        debug!(
            "Updating {} entry {} in {domain}",
            entry.entry_type, entry.name
        );
        let req = DnsEntryRequest { dns_entry: entry };
        self.send(self.client.patch(self.dns_url(domain)).json(&req))
            .await
            .map(|_| ())
    }

    async fn replace_entries(
        &self,
        domain: &str,
        entries: &[DnsEntry],
    ) -> Result<(), TransipProviderError> {
        debug!("Replacing all {} DNS entries of {domain}", entries.len());
        let req = DnsEntriesRequest {
            dns_entries: entries,
        };
        self.send(self.client.put(self.dns_url(domain)).json(&req))
            .await
            .map(|_| ())
    }

    async fn remove_entry(
        &self,
        domain: &str,
        entry: &DnsEntry,
    ) -> Result<(), TransipProviderError> {
        debug!(
            "Removing {} entry {} from {domain}",
            entry.entry_type, entry.name
        );
        let req = DnsEntryRequest { dns_entry: entry };
        self.send(self.client.delete(self.dns_url(domain)).json(&req))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::providers::transip::error::map_error;
    use assert_matches::assert_matches;
    use httpmock::prelude::*;
    use serde_json::json;

    struct FakeSigner {
        fail: bool,
    }

    impl RequestSigner for FakeSigner {
        fn sign(&self, _body: &[u8]) -> Result<String, Error> {
            if self.fail {
                Err(Error::CredentialError("no key".into()))
            } else {
                Ok("c2lnbmVk".to_string())
            }
        }
    }

    fn client_for(server: &MockServer, fail: bool) -> TransipClient {
        let config = TransipConfig {
            api_url: server.base_url(),
            account_name: "alice".into(),
            ..TransipConfig::default()
        };
        TransipClient::with_signer(config, Arc::new(FakeSigner { fail })).unwrap()
    }

    fn www() -> DnsEntry {
        DnsEntry {
            name: "www".into(),
            expire: 300,
            entry_type: "A".into(),
            content: "1.2.3.4".into(),
        }
    }

    async fn mock_auth(server: &MockServer) -> httpmock::Mock<'_> {
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/auth")
                    .header("Signature", "c2lnbmVk")
                    .json_body_partial(
                        r#"{"login": "alice", "read_only": false, "global_key": false, "expiration_time": "30 minutes"}"#,
                    );
                then.status(201).json_body(json!({ "token": "test-token" }));
            })
            .await
    }

    #[tokio::test]
    async fn test_list_entries_authenticates_once() {
        let server = MockServer::start_async().await;
        let auth_mock = mock_auth(&server).await;
        let list_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/domains/example.com/dns")
                    .header("Authorization", "Bearer test-token");
                then.status(200).json_body(json!({
                    "dnsEntries": [
                        { "name": "www", "expire": 300, "type": "A", "content": "1.2.3.4" },
                        { "name": "@", "expire": 3600, "type": "TXT", "content": "hello" }
                    ]
                }));
            })
            .await;

        let client = client_for(&server, false);
        let entries = client.list_entries("example.com").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], www());
        assert_eq!(entries[1].content, "hello");

        client.list_entries("example.com").await.unwrap();
        auth_mock.assert_async().await;
        list_mock.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn test_add_entry_posts_single_entry() {
        let server = MockServer::start_async().await;
        let _auth = mock_auth(&server).await;
        let add_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/domains/example.com/dns")
                    .header("Authorization", "Bearer test-token")
                    .json_body(json!({
                        "dnsEntry": { "name": "www", "expire": 300, "type": "A", "content": "1.2.3.4" }
                    }));
                then.status(201);
            })
            .await;

        let client = client_for(&server, false);
        client.add_entry("example.com", &www()).await.unwrap();
        add_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_and_replace_entries() {
        let server = MockServer::start_async().await;
        let _auth = mock_auth(&server).await;
        let patch_mock = server
            .mock_async(|when, then| {
                when.method(httpmock::Method::PATCH).path("/domains/example.com/dns").json_body(json!({
                    "dnsEntry": { "name": "www", "expire": 300, "type": "A", "content": "1.2.3.4" }
                }));
                then.status(204);
            })
            .await;
        let put_mock = server
            .mock_async(|when, then| {
                when.method(PUT).path("/domains/example.com/dns").json_body(json!({
                    "dnsEntries": [
                        { "name": "www", "expire": 300, "type": "A", "content": "1.2.3.4" }
                    ]
                }));
                then.status(204);
            })
            .await;

        let client = client_for(&server, false);
        client.update_entry("example.com", &www()).await.unwrap();
        client.replace_entries("example.com", &[www()]).await.unwrap();
        patch_mock.assert_async().await;
        put_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_remove_missing_entry_is_not_found() {
        let server = MockServer::start_async().await;
        let _auth = mock_auth(&server).await;
        let delete_mock = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/domains/example.com/dns");
                then.status(404)
                    .json_body(json!({ "error": "Dns entry not found" }));
            })
            .await;

        let client = client_for(&server, false);
        let err = client.remove_entry("example.com", &www()).await.unwrap_err();
        assert_matches!(err, TransipProviderError::NotFound(msg) if msg == "Dns entry not found");
        delete_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_without_body() {
        let server = MockServer::start_async().await;
        let _auth = mock_auth(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/domains/example.com/dns");
                then.status(500);
            })
            .await;

        let client = client_for(&server, false);
        let err = client.list_entries("example.com").await.unwrap_err();
        assert_matches!(err, TransipProviderError::Provider(msg) if msg.contains("Internal Server Error"));
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let server = MockServer::start_async().await;
        let auth_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/auth");
                then.status(401)
                    .json_body(json!({ "error": "Signature is invalid" }));
            })
            .await;
        let list_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/domains/example.com/dns");
                then.status(200).json_body(json!({ "dnsEntries": [] }));
            })
            .await;

        let client = client_for(&server, false);
        let err = client.list_entries("example.com").await.unwrap_err();
        assert_matches!(err, TransipProviderError::Credential(msg) if msg == "Signature is invalid");
        auth_mock.assert_async().await;
        list_mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_signer_failure_skips_auth_request() {
        let server = MockServer::start_async().await;
        let auth_mock = mock_auth(&server).await;

        let client = client_for(&server, true);
        let err = client.list_entries("example.com").await.unwrap_err();
        assert_matches!(err, TransipProviderError::Credential(_));
        auth_mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_timeout_maps_to_context_error() {
        let server = MockServer::start_async().await;
        let _auth = mock_auth(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/domains/example.com/dns");
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .json_body(json!({ "dnsEntries": [] }));
            })
            .await;

        let config = TransipConfig {
            api_url: server.base_url(),
            account_name: "alice".into(),
            request_timeout: 1,
            ..TransipConfig::default()
        };
        let client =
            TransipClient::with_signer(config, Arc::new(FakeSigner { fail: false })).unwrap();
        let err = client.list_entries("example.com").await.unwrap_err();
        assert_matches!(map_error(err), Error::Context(_));
    }
}
