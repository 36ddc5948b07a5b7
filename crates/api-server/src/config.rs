//! Server process configuration

use anyhow::{bail, Context};

const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 500 * 1024 * 1024; // 500 MiB

/// HTTP-layer configuration, read once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub addr: String,

    /// Request body cap for uploads, in bytes
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Read the server configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails on an unparseable `DEPOT_MAX_UPLOAD_BYTES`; the process refuses
    /// to start rather than running with a silently wrong limit.
    pub fn from_env() -> anyhow::Result<Self> {
        let addr = std::env::var("DEPOT_SERVER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

        let max_upload_bytes = match std::env::var("DEPOT_MAX_UPLOAD_BYTES") {
            Ok(raw) => {
                let parsed: usize = raw
                    .parse()
                    .with_context(|| format!("invalid DEPOT_MAX_UPLOAD_BYTES: {raw}"))?;
                if parsed == 0 {
                    bail!("DEPOT_MAX_UPLOAD_BYTES must be positive");
                }
                parsed
            }
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            addr,
            max_upload_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Uses defaults when the variables are unset.
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.addr, DEFAULT_ADDR);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }
}
