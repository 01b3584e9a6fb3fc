use crate::config::CoreConfig;
use crate::error::{Error, Result};
use scrypt::Params;
use sha2::{Digest, Sha512_256};
use zeroize::{Zeroize, Zeroizing};

pub const MASTER_SECRET_LEN: usize = 64;
pub const SEED_LEN: usize = 32;

/// 512 bits of scrypt output. Wide enough to slice for seeding and for
/// blob keys without reusing key material across unrelated algorithms.
/// Held only in memory and never serialized.
pub struct MasterSecret(Zeroizing<[u8; MASTER_SECRET_LEN]>);

impl MasterSecret {
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &*self.0
    }

    #[cfg(test)]
    pub(crate) fn from_raw(bytes: [u8; MASTER_SECRET_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }
}

/// Stretches the caller's plaintext secret into a [`MasterSecret`]
/// using scrypt under the fixed application salt.
///
/// The plaintext buffer is zeroed before this function returns, on
/// success and on error alike.
pub fn derive_master_secret(secret: &mut [u8], config: &CoreConfig) -> Result<MasterSecret> {
    let result = run_scrypt(secret, config);
    secret.zeroize();
    result
}

fn run_scrypt(secret: &[u8], config: &CoreConfig) -> Result<MasterSecret> {
    let params = Params::new(
        config.kdf.log_n,
        config.kdf.r,
        config.kdf.p,
        MASTER_SECRET_LEN,
    )
    .map_err(|e| Error::Crypto(format!("invalid scrypt parameters: {e}")))?;

    let mut output = Zeroizing::new([0u8; MASTER_SECRET_LEN]);
    scrypt::scrypt(secret, config.app_salt, &params, &mut *output)
        .map_err(|e| Error::Crypto(format!("scrypt derivation failed: {e}")))?;

    Ok(MasterSecret(output))
}

/// Derives the per-request stream seed:
/// `Sha512_256(master ‖ domain ‖ username ‖ iteration_be)`.
///
/// Domain and username are both required; without them two different
/// sites would collide on the same password.
pub fn derive_seed(
    master: &MasterSecret,
    domain: &str,
    username: &str,
    iteration: u64,
) -> Result<[u8; SEED_LEN]> {
    if domain.is_empty() {
        return Err(Error::Validation("domain must not be empty".into()));
    }
    if username.is_empty() {
        return Err(Error::Validation("username must not be empty".into()));
    }

    let mut hasher = Sha512_256::new();
    hasher.update(master.as_bytes());
    hasher.update(domain.as_bytes());
    hasher.update(username.as_bytes());
    hasher.update(iteration.to_be_bytes());
    Ok(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScryptConfig;

    fn fast_config() -> CoreConfig {
        CoreConfig {
            kdf: ScryptConfig {
                log_n: 10,
                r: 8,
                p: 1,
            },
            ..CoreConfig::DEFAULT
        }
    }

    #[test]
    fn test_deterministic_derivation() {
        let config = fast_config();
        let mut secret1 = b"test master secret".to_vec();
        let mut secret2 = b"test master secret".to_vec();

        let key1 = derive_master_secret(&mut secret1, &config).unwrap();
        let key2 = derive_master_secret(&mut secret2, &config).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
        assert_eq!(key1.as_bytes().len(), MASTER_SECRET_LEN);
    }

    #[test]
    fn test_different_secrets_different_keys() {
        let config = fast_config();
        let mut secret1 = b"secret one".to_vec();
        let mut secret2 = b"secret two".to_vec();

        let key1 = derive_master_secret(&mut secret1, &config).unwrap();
        let key2 = derive_master_secret(&mut secret2, &config).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_plaintext_zeroed_on_success() {
        let config = fast_config();
        let mut secret = b"sensitive".to_vec();
        derive_master_secret(&mut secret, &config).unwrap();
        assert!(secret.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_plaintext_zeroed_on_error() {
        let mut config = fast_config();
        config.kdf.r = 0;
        let mut secret = b"sensitive".to_vec();
        let result = derive_master_secret(&mut secret, &config);
        assert!(matches!(result, Err(Error::Crypto(_))));
        assert!(secret.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_seed_vector() {
        let master = MasterSecret::from_raw([7u8; MASTER_SECRET_LEN]);
        let seed = derive_seed(&master, "example.com", "alice", 3).unwrap();
        assert_eq!(
            seed.as_slice(),
            &[
                0xd6, 0x22, 0xec, 0x46, 0x78, 0xe7, 0x4f, 0xcc, 0x0b, 0xda, 0x99, 0x72, 0x99,
                0x91, 0x00, 0x16, 0xd7, 0x87, 0x5b, 0xe2, 0xb0, 0x67, 0xbf, 0x38, 0x77, 0x1a,
                0xc8, 0xd0, 0x81, 0x3e, 0x47, 0x36,
            ]
        );
    }

    #[test]
    fn test_seed_sensitivity() {
        let master = MasterSecret::from_raw([7u8; MASTER_SECRET_LEN]);
        let base = derive_seed(&master, "example.com", "alice", 0).unwrap();
        assert_ne!(base, derive_seed(&master, "example.org", "alice", 0).unwrap());
        assert_ne!(base, derive_seed(&master, "example.com", "bob", 0).unwrap());
        assert_ne!(base, derive_seed(&master, "example.com", "alice", 1).unwrap());
    }

    #[test]
    fn test_seed_requires_identifying_inputs() {
        let master = MasterSecret::from_raw([7u8; MASTER_SECRET_LEN]);
        assert!(matches!(
            derive_seed(&master, "", "alice", 0),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            derive_seed(&master, "example.com", "", 0),
            Err(Error::Validation(_))
        ));
    }
}
