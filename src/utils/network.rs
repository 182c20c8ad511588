use crate::error::{ProvstoreError, Result};
use reqwest::Client;
use std::time::Duration;

/// Configuration for HTTP client with proper timeouts and user-friendly error handling
pub struct NetworkConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(120),
            user_agent: format!("provstore/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Create a properly configured HTTP client with timeouts
pub fn create_http_client(config: &NetworkConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .user_agent(&config.user_agent)
        .build()
        .map_err(|e| ProvstoreError::network(format!("Failed to create HTTP client: {}", e)))
}

/// Network error classification with user-friendly messages for ARM requests
pub fn classify_network_error(error: &reqwest::Error, url: &str) -> ProvstoreError {
    let host = extract_host_from_url(url);

    if error.is_timeout() {
        return ProvstoreError::connection_timeout(format!(
            "Request to '{}' timed out. This might be due to network issues or the Azure management endpoint being unreachable.",
            host
        ));
    }

    if error.is_connect() {
        if is_dns_resolution_error(error) {
            return ProvstoreError::network(format!(
                "Unable to resolve '{}'. Please check your network connection and DNS settings.",
                host
            ));
        }

        return ProvstoreError::network(format!(
            "Failed to connect to '{}'. Please check your network connection.",
            host
        ));
    }

    if error.is_request() {
        return ProvstoreError::network(format!(
            "Invalid request to '{}'. Please check the request parameters.",
            host
        ));
    }

    if let Some(status) = error.status() {
        match status.as_u16() {
            503 => {
                return ProvstoreError::network(format!(
                    "The Azure Resource Manager service at '{}' is temporarily unavailable. Please try again later.",
                    host
                ))
            }
            502 | 504 => {
                return ProvstoreError::network(format!(
                    "Gateway error when calling '{}'. The Azure service may be experiencing issues.",
                    host
                ))
            }
            _ => {}
        }
    }

    ProvstoreError::network(format!(
        "Network error when calling '{}': {}. Please check your internet connection and try again.",
        host, error
    ))
}

/// DNS error detection
fn is_dns_resolution_error(error: &reqwest::Error) -> bool {
    let error_msg = error.to_string().to_lowercase();
    let dns_indicators = [
        "dns",
        "name resolution",
        "resolve",
        "lookup",
        "name or service not known",
        "nodename nor servname provided",
        "temporary failure in name resolution",
        "no such host",
        "host not found",
        "getaddrinfo failed",
        "could not resolve host",
    ];

    dns_indicators
        .iter()
        .any(|&indicator| error_msg.contains(indicator))
}

/// Extract the host portion of a URL for error messages
fn extract_host_from_url(url: &str) -> String {
    if let Ok(parsed_url) = url::Url::parse(url) {
        if let Some(host) = parsed_url.host_str() {
            return host.to_string();
        }
    }

    "management.azure.com".to_string()
}
