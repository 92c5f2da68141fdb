//! Authenticated connections to Temporal Cloud.

use std::{str::FromStr, sync::Arc};

use anyhow::Context;
use log::info;
use temporal_client::{Client, RetryClient, TlsConfig};
use temporal_sdk::sdk_client_options;
use temporal_sdk_core::Url;
use tonic::{
    Request, Status,
    metadata::{Ascii, MetadataValue},
};

use crate::secret::{ApiKey, ApiKeySupplier};

/// Where to connect and as whom.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// `host:port`, or a full URL when a scheme is given.
    pub address: String,
    pub namespace: String,
    pub api_key: ApiKey,
}

impl ConnectionSettings {
    /// Bare `host:port` addresses are always dialed over TLS.
    pub fn target_url(&self) -> Result<Url, anyhow::Error> {
        let raw = if self.address.contains("://") {
            self.address.clone()
        } else {
            format!("https://{}", self.address)
        };
        Url::from_str(&raw).with_context(|| format!("invalid Temporal address {:?}", self.address))
    }
}

/// A connected client plus the key supplier used to authorize raw calls.
#[derive(Clone)]
pub struct TemporalConnection {
    client: RetryClient<Client>,
    namespace: String,
    api_key: Arc<dyn ApiKeySupplier>,
}

impl TemporalConnection {
    pub fn into_client(self) -> RetryClient<Client> {
        self.client
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn api_key_supplier(&self) -> Arc<dyn ApiKeySupplier> {
        self.api_key.clone()
    }
}

/// Build a request with `authorization: Bearer <key>`, asking `supplier`
/// for the key at call time.
pub fn authorized_request<T>(supplier: &dyn ApiKeySupplier, message: T) -> Result<Request<T>, Status> {
    let key = supplier.api_key();
    let mut value: MetadataValue<Ascii> = format!("Bearer {}", key.expose())
        .parse()
        .map_err(|_| Status::unauthenticated("API key is not a valid header value"))?;
    value.set_sensitive(true);

    let mut request = Request::new(message);
    request.metadata_mut().insert("authorization", value);
    Ok(request)
}

/// Connect to `settings.address` and bind the client to
/// `settings.namespace`. The key is not checked until the first call.
pub async fn connect(
    settings: &ConnectionSettings,
    api_key: Arc<dyn ApiKeySupplier>,
) -> Result<TemporalConnection, anyhow::Error> {
    let url = settings.target_url()?;

    let mut builder = sdk_client_options(url.clone());
    builder.api_key(Some(api_key.api_key().expose().to_owned()));
    if url.scheme() == "https" {
        builder.tls_cfg(TlsConfig::default());
    }
    let opts = builder
        .build()
        .context("failed building Temporal client options")?;

    info!(
        "Connecting to Temporal at {} (namespace={})",
        settings.address, settings.namespace
    );

    // `RetryClient` retries transient failures with the SDK's default policy.
    let client = opts
        .connect(settings.namespace.clone(), None)
        .await
        .with_context(|| format!("failed connecting to Temporal at {}", settings.address))?;

    Ok(TemporalConnection {
        client,
        namespace: settings.namespace.clone(),
        api_key,
    })
}
