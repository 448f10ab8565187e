//! Alias → session registry
//!
//! Owns every open [`DeviceSession`]. Removing an entry always disconnects it
//! first, so a closed session is never reachable through an alias.

use anyhow::{anyhow, bail, Result};
use sf8xxx_hardware::{DeviceSession, SerialSettings};
use std::collections::BTreeMap;
use tracing::debug;

use crate::cli::ALL;

/// Connected devices keyed by user-chosen alias
pub struct DeviceRegistry {
    devices: BTreeMap<String, DeviceSession>,
    settings: SerialSettings,
}

/// What was closed by a hangup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HungUp {
    pub alias: String,
    pub port: String,
    pub serial_no: u16,
}

impl DeviceRegistry {
    pub fn new(settings: SerialSettings) -> Self {
        Self {
            devices: BTreeMap::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &SerialSettings {
        &self.settings
    }

    /// Open `port` and register it under `alias`
    pub async fn dial(&mut self, port: &str, alias: &str) -> Result<&DeviceSession> {
        self.check_alias_free(alias)?;

        let session = DeviceSession::connect(port, &self.settings).await?;
        self.insert(alias, session)?;
        self.get(alias)
    }

    /// Register an already connected session
    pub fn insert(&mut self, alias: &str, session: DeviceSession) -> Result<()> {
        self.check_alias_free(alias)?;
        debug!("Registering {} on {}", alias, session.port());
        self.devices.insert(alias.to_string(), session);
        Ok(())
    }

    fn check_alias_free(&self, alias: &str) -> Result<()> {
        if alias == ALL {
            bail!("'{}' is reserved and cannot be used as an alias", ALL);
        }
        if self.devices.contains_key(alias) {
            bail!("Already connected to {}", alias);
        }
        Ok(())
    }

    pub fn get(&self, alias: &str) -> Result<&DeviceSession> {
        self.devices
            .get(alias)
            .ok_or_else(|| anyhow!("Device {} is not connected. Try \"list\".", alias))
    }

    pub fn get_mut(&mut self, alias: &str) -> Result<&mut DeviceSession> {
        self.devices
            .get_mut(alias)
            .ok_or_else(|| anyhow!("Device {} is not connected. Try \"list\".", alias))
    }

    /// Resolve a command target into aliases; `all` expands to every device
    pub fn targets(&self, target: &str) -> Result<Vec<String>> {
        if target == ALL {
            return Ok(self.devices.keys().cloned().collect());
        }
        self.get(target)?;
        Ok(vec![target.to_string()])
    }

    /// Disconnect, then forget, one device
    pub fn hangup(&mut self, alias: &str) -> Result<HungUp> {
        let session = self.get_mut(alias)?;
        session.disconnect();

        let hung_up = HungUp {
            alias: alias.to_string(),
            port: session.port().to_string(),
            serial_no: session.serial_no(),
        };
        self.devices.remove(alias);
        Ok(hung_up)
    }

    /// Disconnect and forget every device
    pub fn hangup_all(&mut self) -> Vec<HungUp> {
        let aliases: Vec<String> = self.devices.keys().cloned().collect();
        aliases
            .iter()
            .filter_map(|alias| self.hangup(alias).ok())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DeviceSession)> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl Drop for DeviceRegistry {
    fn drop(&mut self) {
        self.hangup_all();
    }
}
