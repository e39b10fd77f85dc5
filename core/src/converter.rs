//! Async conversion: build, execute, parse.

use crate::client::RateClient;
use crate::config::ProviderConfig;
use crate::error::{ConversionError, TransportError};
use crate::http::{HttpTransport, ReqwestTransport};
use crate::types::{ConversionRequest, ConversionResult};

/// Stateless converter pairing a `RateClient` with a transport.
///
/// Holds no per-attempt state; the busy flag belongs to the caller (see
/// `ConverterForm`). Nothing is retried.
#[derive(Debug, Clone)]
pub struct Converter<T> {
    client: RateClient,
    transport: T,
}

impl Converter<ReqwestTransport> {
    /// Fails only if the HTTP client cannot be initialized.
    pub fn from_config(config: ProviderConfig) -> Result<Self, TransportError> {
        Ok(Self::new(RateClient::from_config(config), ReqwestTransport::new()?))
    }
}

impl<T: HttpTransport> Converter<T> {
    pub fn new(client: RateClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub async fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult, ConversionError> {
        let http_request = self.client.build_latest_rates(request);

        let outcome = match self.transport.execute(http_request).await {
            Ok(response) => self.client.parse_latest_rates(request, response),
            Err(err) => Err(err.into()),
        };

        match &outcome {
            Ok(result) => tracing::info!(
                base = %request.base,
                target = %request.target,
                rate = result.rate,
                "conversion succeeded"
            ),
            Err(err) => tracing::warn!(
                base = %request.base,
                target = %request.target,
                error = ?err,
                "conversion failed"
            ),
        }
        outcome
    }
}
