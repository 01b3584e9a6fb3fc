pub mod blob;
mod charset;
pub mod config;
pub mod error;
pub mod generator;
pub mod kdf;
pub mod options;
pub mod stream;

pub use config::{CoreConfig, LATEST_GEN_VERSION, ScryptConfig};
pub use error::{Error, Result};
pub use generator::{GeneratorVersion, generate, generate_with_master};
pub use kdf::{MasterSecret, derive_master_secret, derive_seed};
pub use options::GenOpts;
