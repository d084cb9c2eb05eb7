use serde::{Deserialize, Serialize};

pub const ADDRESS_ENV_VAR: &str = "ROSTER_API_ADDRESS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Api {
    pub address: String,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            address: crate::Client::DEFAULT_ADDRESS.into(),
        }
    }
}

impl Api {
    /// The configured address, unless the environment overrides it
    pub fn resolve(&self) -> String {
        std::env::var(ADDRESS_ENV_VAR).unwrap_or_else(|_| self.address.clone())
    }
}
