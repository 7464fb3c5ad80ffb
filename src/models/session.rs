use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_AFI_SAFI: &str = "ipv4-unicast";
pub const DEFAULT_INSTANCE_NAME: &str = "default";

/// Identity of one BGP session on one device
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub device: String,
    pub peer_address: String,
    #[serde(default = "default_afi_safi")]
    pub afi_safi: String,
    #[serde(default = "default_instance_name")]
    pub instance_name: String,
}

fn default_afi_safi() -> String {
    DEFAULT_AFI_SAFI.to_string()
}

fn default_instance_name() -> String {
    DEFAULT_INSTANCE_NAME.to_string()
}

impl SessionKey {
    /// Session in the default AFI/SAFI and routing instance
    pub fn new(device: impl Into<String>, peer_address: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            peer_address: peer_address.into(),
            afi_safi: default_afi_safi(),
            instance_name: default_instance_name(),
        }
    }

    pub fn with_afi_safi(mut self, afi_safi: impl Into<String>) -> Self {
        self.afi_safi = afi_safi.into();
        self
    }

    pub fn with_instance(mut self, instance_name: impl Into<String>) -> Self {
        self.instance_name = instance_name.into();
        self
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.device, self.peer_address)
    }
}
