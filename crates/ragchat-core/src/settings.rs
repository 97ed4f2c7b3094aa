//! Client config persisted in the key-value store.

use ragchat_types::config::{ClientConfig, CONFIG_STORAGE_KEY};
use ragchat_types::Result;
use crate::ports::KeyValuePort;

/// Stored config, or the defaults when nothing usable is stored.
pub fn load_config(store: &dyn KeyValuePort) -> ClientConfig {
    match store.get(CONFIG_STORAGE_KEY) {
        Ok(Some(json)) => match serde_json::from_str::<ClientConfig>(&json) {
            Ok(config) => {
                log::info!("Config restored from {}", store.backend_name());
                config
            }
            Err(e) => {
                log::warn!("Ignoring unreadable stored config: {}", e);
                ClientConfig::default()
            }
        },
        Ok(None) => ClientConfig::default(),
        Err(e) => {
            log::warn!("Could not read stored config: {}", e);
            ClientConfig::default()
        }
    }
}

pub fn save_config(store: &dyn KeyValuePort, config: &ClientConfig) -> Result<()> {
    let json = serde_json::to_string(config)?;
    store.set(CONFIG_STORAGE_KEY, &json)?;
    log::info!("Config saved to {}", store.backend_name());
    Ok(())
}
