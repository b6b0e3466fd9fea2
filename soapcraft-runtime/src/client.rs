//! SOAP HTTP client implementation (spec.md §6 "Wire protocol (runtime)").
//!
//! `SoapClient` performs the complete SOAP request/response cycle:
//! 1. Serialize request body to XML, wrap in a SOAP envelope.
//! 2. POST to the endpoint with the wire headers spec.md §6 requires.
//! 3. Validate the HTTP status (only 200/500 are acceptable carriers) and
//!    the response `Content-Type`.
//! 4. Check for a SOAP fault before attempting typed deserialization.
//! 5. Deserialize the response body into the caller's response type.

use crate::envelope::{SoapEnvelope, SoapVersion};
use crate::error::{SoapError, SoapResult};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[cfg(feature = "tracing")]
use tracing::{debug, info, instrument, warn};

/// SOAP client for making HTTP requests.
///
/// # Example
///
/// ```no_run
/// use soapcraft_runtime::SoapClient;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Serialize)]
/// struct MyRequest {
///     name: String,
/// }
///
/// #[derive(Deserialize)]
/// struct MyResponse {
///     result: String,
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SoapClient::new("http://example.com/soap");
/// let request = MyRequest { name: "test".to_string() };
/// let response: MyResponse = client.call("MyOperation", &request).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SoapClient {
    endpoint: String,
    http_client: Client,
    soap_version: SoapVersion,
    soap_action: Option<String>,
    timeout: Duration,
}

/// Validates the HTTP status and `Content-Type` of a raw response against
/// spec.md §6, returning the response body text if both checks pass.
async fn validate_response(response: reqwest::Response) -> SoapResult<String> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if status != StatusCode::OK && status != StatusCode::INTERNAL_SERVER_ERROR {
        let body = response.text().await.unwrap_or_default();
        return Err(SoapError::HttpNotOk {
            status: status.as_u16(),
            body,
        });
    }

    if !content_type.starts_with("text/xml") && !content_type.is_empty() {
        return Err(SoapError::InvalidMimeType { content_type });
    }

    response.text().await.map_err(SoapError::from)
}

#[cfg(feature = "blocking")]
fn validate_response_blocking(response: reqwest::blocking::Response) -> SoapResult<String> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if status != StatusCode::OK && status != StatusCode::INTERNAL_SERVER_ERROR {
        let body = response.text().unwrap_or_default();
        return Err(SoapError::HttpNotOk {
            status: status.as_u16(),
            body,
        });
    }

    if !content_type.starts_with("text/xml") && !content_type.is_empty() {
        return Err(SoapError::InvalidMimeType { content_type });
    }

    response.text().map_err(SoapError::from)
}

impl SoapClient {
    /// Create a new SOAP client with default settings (SOAP 1.1, 30s timeout).
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http_client: Client::new(),
            soap_version: SoapVersion::Soap11,
            soap_action: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Create a new SOAP client builder for advanced configuration
    pub fn builder(endpoint: impl Into<String>) -> SoapClientBuilder {
        SoapClientBuilder::new(endpoint)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn set_soap_version(&mut self, version: SoapVersion) {
        self.soap_version = version;
    }

    pub fn soap_version(&self) -> SoapVersion {
        self.soap_version
    }

    /// Required for SOAP 1.1 operations; optional for SOAP 1.2.
    pub fn set_soap_action(&mut self, action: impl Into<String>) {
        self.soap_action = Some(action.into());
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Make a SOAP call using the operation name as the SOAPAction.
    #[cfg_attr(feature = "tracing", instrument(skip(self, request), fields(endpoint = %self.endpoint, soap_version = ?self.soap_version)))]
    pub async fn call<Req, Resp>(&self, operation: &str, request: &Req) -> SoapResult<Resp>
    where
        Req: Serialize,
        Resp: for<'de> Deserialize<'de>,
    {
        #[cfg(feature = "tracing")]
        info!(operation = %operation, "Initiating SOAP call");

        #[cfg(feature = "metrics")]
        let start = std::time::Instant::now();

        let result = self
            .call_with_soap_action(operation, None, None, true, request)
            .await;

        #[cfg(feature = "metrics")]
        {
            let duration = start.elapsed();
            metrics::histogram!("soap_request_duration_seconds", duration.as_secs_f64());
            metrics::increment_counter!("soap_requests_total");
            if result.is_err() {
                metrics::increment_counter!("soap_errors_total");
            }
        }

        #[cfg(feature = "tracing")]
        match &result {
            Ok(_) => info!(operation = %operation, "SOAP call completed successfully"),
            Err(e) => warn!(operation = %operation, error = %e, "SOAP call failed"),
        }

        result
    }

    /// Call a SOAP operation with an explicit SOAPAction header, namespace
    /// on the request body element, and element-form-qualified flag
    /// (spec.md §4.5's generated operation method contract).
    #[cfg_attr(feature = "tracing", instrument(skip(self, request), fields(endpoint = %self.endpoint, soap_version = ?self.soap_version)))]
    pub async fn call_with_soap_action<Req, Resp>(
        &self,
        operation: &str,
        soap_action: Option<&str>,
        namespace: Option<&str>,
        element_form_qualified: bool,
        request: &Req,
    ) -> SoapResult<Resp>
    where
        Req: Serialize,
        Resp: for<'de> Deserialize<'de>,
    {
        #[cfg(feature = "tracing")]
        debug!(operation = %operation, soap_action = ?soap_action, namespace = ?namespace, element_form_qualified = %element_form_qualified, "Building SOAP envelope");

        let envelope = SoapEnvelope::build_with_namespace(
            request,
            self.soap_version,
            namespace,
            element_form_qualified,
        )?;

        #[cfg(feature = "tracing")]
        debug!(envelope_size = envelope.len(), "SOAP envelope built");

        let mut http_request = self
            .http_client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .body(envelope.clone());

        http_request = match self.soap_version {
            SoapVersion::Soap11 => http_request.header("Content-Type", "text/xml; charset=utf-8"),
            SoapVersion::Soap12 => {
                http_request.header("Content-Type", "application/soap+xml; charset=utf-8")
            }
        };
        http_request = http_request.header("Content-Length", envelope.len().to_string());

        if self.soap_version == SoapVersion::Soap11 {
            let action = soap_action.or(self.soap_action.as_deref()).unwrap_or(operation);
            http_request = http_request.header("SOAPAction", format!("\"{}\"", action));
        }

        #[cfg(feature = "tracing")]
        info!(endpoint = %self.endpoint, "Sending HTTP POST request");

        let response = match http_request.send().await {
            Ok(resp) => resp,
            Err(e) => {
                #[cfg(feature = "tracing")]
                warn!(endpoint = %self.endpoint, error = %e, "HTTP request failed");
                return Err(e.into());
            }
        };

        let response_text = validate_response(response).await?;

        #[cfg(feature = "tracing")]
        debug!(response_size = response_text.len(), "Received response body");

        #[cfg(feature = "metrics")]
        metrics::histogram!("soap_response_size_bytes", response_text.len() as f64);

        if let Err(e) = SoapEnvelope::check_for_fault(&response_text) {
            #[cfg(feature = "tracing")]
            warn!(error = %e, "SOAP fault detected in response");
            return Err(e);
        }

        #[cfg(feature = "tracing")]
        debug!("Parsing SOAP response");

        let parsed_response = SoapEnvelope::parse_response(&response_text)?;

        #[cfg(feature = "tracing")]
        debug!("SOAP response parsed successfully");

        Ok(parsed_response)
    }

    /// Make a SOAP call without deserializing the response; returns the
    /// raw response body text (after fault detection).
    #[cfg_attr(feature = "tracing", instrument(skip(self, request), fields(endpoint = %self.endpoint)))]
    pub async fn call_raw<Req>(&self, operation: &str, request: &Req) -> SoapResult<String>
    where
        Req: Serialize,
    {
        let envelope = SoapEnvelope::build(request, self.soap_version)?;

        let mut http_request = self
            .http_client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .body(envelope.clone());

        http_request = match self.soap_version {
            SoapVersion::Soap11 => http_request.header("Content-Type", "text/xml; charset=utf-8"),
            SoapVersion::Soap12 => {
                http_request.header("Content-Type", "application/soap+xml; charset=utf-8")
            }
        };
        http_request = http_request.header("Content-Length", envelope.len().to_string());

        if self.soap_version == SoapVersion::Soap11 {
            let soap_action = self.soap_action.as_deref().unwrap_or(operation);
            http_request = http_request.header("SOAPAction", format!("\"{}\"", soap_action));
        }

        let response = http_request.send().await?;
        let response_text = validate_response(response).await?;

        if let Err(e) = SoapEnvelope::check_for_fault(&response_text) {
            return Err(e);
        }

        Ok(response_text)
    }

    /// Blocking variant of [`Self::call_with_soap_action`] (spec.md §5:
    /// "on the synchronous API path it blocks the calling thread until the
    /// response is parsed"). Requires the `blocking` feature.
    #[cfg(feature = "blocking")]
    pub fn call_with_soap_action_blocking<Req, Resp>(
        &self,
        operation: &str,
        soap_action: Option<&str>,
        namespace: Option<&str>,
        element_form_qualified: bool,
        request: &Req,
    ) -> SoapResult<Resp>
    where
        Req: Serialize,
        Resp: for<'de> Deserialize<'de>,
    {
        let envelope = SoapEnvelope::build_with_namespace(
            request,
            self.soap_version,
            namespace,
            element_form_qualified,
        )?;

        let blocking_client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;

        let mut http_request = blocking_client.post(&self.endpoint).body(envelope.clone());

        http_request = match self.soap_version {
            SoapVersion::Soap11 => http_request.header("Content-Type", "text/xml; charset=utf-8"),
            SoapVersion::Soap12 => {
                http_request.header("Content-Type", "application/soap+xml; charset=utf-8")
            }
        };
        http_request = http_request.header("Content-Length", envelope.len().to_string());

        if self.soap_version == SoapVersion::Soap11 {
            let action = soap_action.or(self.soap_action.as_deref()).unwrap_or(operation);
            http_request = http_request.header("SOAPAction", format!("\"{}\"", action));
        }

        let response = http_request.send()?;
        let response_text = validate_response_blocking(response)?;

        SoapEnvelope::check_for_fault(&response_text)?;
        SoapEnvelope::parse_response(&response_text)
    }

    /// Blocking variant of [`Self::call`].
    #[cfg(feature = "blocking")]
    pub fn call_blocking<Req, Resp>(&self, operation: &str, request: &Req) -> SoapResult<Resp>
    where
        Req: Serialize,
        Resp: for<'de> Deserialize<'de>,
    {
        self.call_with_soap_action_blocking(operation, None, None, true, request)
    }
}

/// Builder for configuring a SOAP client.
pub struct SoapClientBuilder {
    endpoint: String,
    soap_version: SoapVersion,
    soap_action: Option<String>,
    timeout: Duration,
    http_client: Option<Client>,
}

impl SoapClientBuilder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            soap_version: SoapVersion::Soap11,
            soap_action: None,
            timeout: Duration::from_secs(30),
            http_client: None,
        }
    }

    pub fn soap_version(mut self, version: SoapVersion) -> Self {
        self.soap_version = version;
        self
    }

    pub fn soap_action(mut self, action: impl Into<String>) -> Self {
        self.soap_action = Some(action.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a pre-configured `reqwest::Client` (custom proxies, TLS, etc.).
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> SoapClient {
        SoapClient {
            endpoint: self.endpoint,
            http_client: self.http_client.unwrap_or_default(),
            soap_version: self.soap_version,
            soap_action: self.soap_action,
            timeout: self.timeout,
        }
    }
}
