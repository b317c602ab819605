use serde::{Deserialize, Serialize};

use super::defaults::*;

/// WhatsApp transport config.
///
/// Session data is stored at `{data_dir}/whatsapp_session/whatsapp.db`
/// unless `session_db` points elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    /// Explicit session database path. Empty = default under `data_dir`.
    #[serde(default)]
    pub session_db: String,
    /// Ask the phone for a full (one year) history sync when pairing.
    #[serde(default)]
    pub request_full_sync: bool,
    /// Name shown in the phone's linked-devices list.
    #[serde(default = "default_device_name")]
    pub device_name: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            session_db: String::new(),
            request_full_sync: false,
            device_name: default_device_name(),
        }
    }
}

/// Pairing HTTP endpoint config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingConfig {
    #[serde(default = "default_pairing_host")]
    pub host: String,
    #[serde(default = "default_pairing_port")]
    pub port: u16,
    /// Path the QR image is served at.
    #[serde(default = "default_pairing_path")]
    pub path: String,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            host: default_pairing_host(),
            port: default_pairing_port(),
            path: default_pairing_path(),
        }
    }
}
