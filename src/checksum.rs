//! Checksums for exported definitions

use sha2::{Digest, Sha256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::definition::SchemaDefinition;
use crate::error::Result;

/// SHA256 checksum of emitted definition text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum(String);

impl Checksum {
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Checksum of the compact JSON form of a definition.
    ///
    /// Field order is part of the definition, so equal checksums imply equal
    /// declaration order.
    pub fn of_definition(definition: &SchemaDefinition) -> Result<Self> {
        let compact = serde_json::to_vec(definition)?;
        Ok(Self::from_bytes(&compact))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn verify(&self, content: &[u8]) -> bool {
        Self::from_bytes(content) == *self
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
