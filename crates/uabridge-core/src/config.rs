//! Bridge configuration.
//!
//! These options configure the external protocol server, not the mapping
//! engine: the bridge only holds them and forwards them at construction.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default protocol server port.
pub const DEFAULT_PORT: u16 = 4840;

/// Default server resource path.
pub const DEFAULT_RESOURCE_PATH: &str = "/UA/AmbientTelemetry";

/// Options forwarded to the protocol server at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeOptions {
    /// Network port the protocol server listens on.
    pub port: u16,
    /// Resource path the server is exposed under.
    pub resource_path: String,
    /// Server certificate, if the deployment uses one.
    pub certificate_file: Option<PathBuf>,
    /// Private key matching the certificate.
    pub private_key_file: Option<PathBuf>,
    /// Whether event-handling errors are printed by the host.
    pub print_errors: bool,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            resource_path: DEFAULT_RESOURCE_PATH.to_string(),
            certificate_file: None,
            private_key_file: None,
            print_errors: false,
        }
    }
}

impl BridgeOptions {
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_certificate(
        mut self,
        certificate_file: impl Into<PathBuf>,
        private_key_file: impl Into<PathBuf>,
    ) -> Self {
        self.certificate_file = Some(certificate_file.into());
        self.private_key_file = Some(private_key_file.into());
        self
    }

    pub fn with_print_errors(mut self, print_errors: bool) -> Self {
        self.print_errors = print_errors;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = BridgeOptions::default();
        assert_eq!(options.port, DEFAULT_PORT);
        assert_eq!(options.resource_path, DEFAULT_RESOURCE_PATH);
        assert!(options.certificate_file.is_none());
        assert!(!options.print_errors);
    }

    #[test]
    fn test_deserialize_partial() {
        let options: BridgeOptions =
            serde_json::from_str(r#"{"port": 14840, "printErrors": true}"#).unwrap();
        assert_eq!(options.port, 14840);
        assert!(options.print_errors);
        assert_eq!(options.resource_path, DEFAULT_RESOURCE_PATH);
    }
}
