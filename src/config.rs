pub const LATEST_GEN_VERSION: u32 = 1;

pub const DEFAULT_LENGTH: u32 = 24;
pub const DEFAULT_MAX: i32 = -1;
pub const DEFAULT_SYMBOL_SET: &str = "~!@#$%^&*()_+-=;,./?";

/// Fixed application-level salt. Statelessness requires a reproducible
/// salt, so it is hard-coded rather than stored per user; an attacker
/// has to target this scheme specifically to precompute against it.
pub const APP_SALT: &[u8] = b"repass/fixed-salt/v1";

/// scrypt cost parameters. All three knobs feed straight into
/// `scrypt::Params`; changing them changes every derived password, so
/// callers that care about reproducibility must pin a config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScryptConfig {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

impl ScryptConfig {
    pub const STANDARD: Self = Self {
        log_n: 15,
        r: 8,
        p: 1,
    };

    pub const PARANOID: Self = Self {
        log_n: 17,
        r: 8,
        p: 1,
    };

    pub fn memory_mib(&self) -> u32 {
        ((128 * self.r) << self.log_n) >> 20
    }
}

/// Immutable knobs for one generation pipeline. Replaces package-level
/// globals so that nothing in the core reads hidden process-wide state.
#[derive(Debug, Clone, Copy)]
pub struct CoreConfig {
    pub app_salt: &'static [u8],
    pub default_length: u32,
    pub default_symbol_set: &'static str,
    pub kdf: ScryptConfig,
}

impl CoreConfig {
    pub const DEFAULT: Self = Self {
        app_salt: APP_SALT,
        default_length: DEFAULT_LENGTH,
        default_symbol_set: DEFAULT_SYMBOL_SET,
        kdf: ScryptConfig::STANDARD,
    };
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
