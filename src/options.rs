use crate::charset::Charsets;
use crate::config::{CoreConfig, DEFAULT_LENGTH, DEFAULT_MAX, DEFAULT_SYMBOL_SET, LATEST_GEN_VERSION};
use crate::error::{Error, Result};
use crate::generator::GeneratorVersion;
use serde::{Deserialize, Serialize};

/// The complete, serializable description of one password request.
///
/// The serialized form is a stable wire schema: field names are the
/// deliberately short keys below, unknown fields are ignored on read,
/// and missing fields take the documented defaults. Field declaration
/// order is the canonical serialization order used by the blob codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenOpts {
    #[serde(rename = "d")]
    pub domain: String,
    #[serde(rename = "u")]
    pub username: String,
    #[serde(rename = "i", default)]
    pub iteration: u64,
    #[serde(rename = "c", default = "default_length")]
    pub length: u32,
    #[serde(rename = "pwv", default = "default_version")]
    pub gen_version: u32,
    #[serde(rename = "n", default)]
    pub digits: u32,
    #[serde(rename = "mn", default = "default_max")]
    pub max_digits: i32,
    #[serde(rename = "U", default)]
    pub uppers: u32,
    #[serde(rename = "mU", default = "default_max")]
    pub max_uppers: i32,
    #[serde(rename = "l", default)]
    pub lowers: u32,
    #[serde(rename = "ml", default = "default_max")]
    pub max_lowers: i32,
    #[serde(rename = "s", default)]
    pub symbols: u32,
    #[serde(rename = "ms", default = "default_max")]
    pub max_symbols: i32,
    #[serde(rename = "ss", default = "default_symbol_set")]
    pub symbol_set: String,
}

fn default_length() -> u32 {
    DEFAULT_LENGTH
}

fn default_version() -> u32 {
    LATEST_GEN_VERSION
}

fn default_max() -> i32 {
    DEFAULT_MAX
}

fn default_symbol_set() -> String {
    DEFAULT_SYMBOL_SET.to_string()
}

impl GenOpts {
    /// Default options for a domain/username pair: length 24, latest
    /// generator version, no class minimums, no class caps.
    pub fn new(username: &str, domain: &str, config: &CoreConfig) -> Self {
        Self {
            domain: domain.to_string(),
            username: username.to_string(),
            iteration: 0,
            length: config.default_length,
            gen_version: LATEST_GEN_VERSION,
            digits: 0,
            max_digits: DEFAULT_MAX,
            uppers: 0,
            max_uppers: DEFAULT_MAX,
            lowers: 0,
            max_lowers: DEFAULT_MAX,
            symbols: 0,
            max_symbols: DEFAULT_MAX,
            symbol_set: config.default_symbol_set.to_string(),
        }
    }

    /// Checks every invariant that can be checked without touching the
    /// secret, and resolves the generator version. Runs before any
    /// hashing on every generation path.
    pub fn validate(&self) -> Result<GeneratorVersion> {
        let version = GeneratorVersion::from_wire(self.gen_version)?;
        if self.domain.is_empty() {
            return Err(Error::Validation("domain must not be empty".into()));
        }
        if self.username.is_empty() {
            return Err(Error::Validation("username must not be empty".into()));
        }
        if self.length == 0 {
            return Err(Error::Validation("length must be positive".into()));
        }
        Charsets::build(self)?;
        Ok(version)
    }

    /// Canonical serialization: JSON with the short wire keys in
    /// declaration order.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| Error::Validation(format!("options not serializable: {e}")))
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data)
            .map_err(|e| Error::Validation(format!("malformed options: {e}")))
    }
}
