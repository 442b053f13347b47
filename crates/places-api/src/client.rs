//! Place-lookup API HTTP client

use crate::error::Result;
use crate::types::{DetailsOutcome, ForwardedResponse, PlaceResult};
use std::time::Duration;
use tracing::{debug, warn};

/// Path of the place-details endpoint, relative to the API host
pub const DETAILS_PATH: &str = "/maps/api/place/details/json";

/// Client for the upstream place-lookup API
///
/// The API key is supplied per call by the proxy's caller and is never stored
/// or logged by the client.
#[derive(Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    base_url: String,
}

impl PlacesClient {
    /// Default API host
    pub const DEFAULT_BASE_URL: &'static str = "https://maps.googleapis.com";
    /// Default per-request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a new client against the default host (10 second timeout)
    pub fn new() -> Self {
        Self::try_new(Self::DEFAULT_BASE_URL, Self::DEFAULT_TIMEOUT)
            .expect("Failed to create HTTP client")
    }

    /// Create a client against a custom host with a custom timeout
    pub fn try_new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Look up a place by identifier, asking for exactly `fields`
    ///
    /// The HTTP status of the upstream response is not consulted: the API
    /// reports failures through the `status` member of its JSON body, so any
    /// JSON body is accepted and classified by that member.
    pub async fn place_details<S: AsRef<str>>(
        &self,
        place_id: &str,
        fields: &[S],
        key: &str,
    ) -> Result<DetailsOutcome> {
        let fields = fields
            .iter()
            .map(|f| f.as_ref())
            .collect::<Vec<_>>()
            .join(",");

        let url = format!(
            "{}{}?place_id={}&fields={}&key={}",
            self.base_url,
            DETAILS_PATH,
            urlencoding::encode(place_id),
            urlencoding::encode(&fields),
            urlencoding::encode(key)
        );

        debug!(place_id, fields = %fields, "Fetching place details");

        let response = self.http.get(&url).send().await?;
        let http_status = response.status();
        let bytes = response.bytes().await?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)?;

        match body.get("status").and_then(|s| s.as_str()) {
            Some("OK") => {
                let result = body
                    .get("result")
                    .cloned()
                    .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
                let place: PlaceResult = serde_json::from_value(result)?;
                Ok(DetailsOutcome::Found(place))
            }
            status => {
                warn!(
                    place_id,
                    http_status = %http_status,
                    status = status.unwrap_or("<missing>"),
                    "Place details request rejected upstream"
                );
                Ok(DetailsOutcome::Rejected(body))
            }
        }
    }

    /// Forward a request path (with query string) to the API host verbatim
    pub async fn forward(&self, path_and_query: &str) -> Result<ForwardedResponse> {
        let url = format!("{}{}", self.base_url, path_and_query);

        let response = self.http.get(&url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.bytes().await?.to_vec();

        debug!(status, size = body.len(), "Forwarded upstream response");

        Ok(ForwardedResponse {
            status,
            content_type,
            body,
        })
    }
}

impl Default for PlacesClient {
    fn default() -> Self {
        Self::new()
    }
}
