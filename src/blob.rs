use crate::error::{Error, Result};
use crate::kdf::MasterSecret;
use crate::options::GenOpts;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use blake2::{Blake2b512, Digest};
use bzip2::Compression;
use bzip2::read::{BzDecoder, BzEncoder};
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use std::io::Read;
use zeroize::Zeroizing;

const NONCE_LEN: usize = 24;
const KEY_LEN: usize = 32;
const INDEX_DOMAIN_LEN: usize = 16;
const INDEX_OPTS_LEN: usize = 4;

const DECRYPT_FAILED: &str = "wrong secret/domain or corrupted blob";

/// Encrypts the generation options (never the password) for storage.
///
/// The canonical serialization is compressed, then sealed with
/// XChaCha20-Poly1305 under a key derived from the master secret and
/// the options' domain. The nonce is freshly random per call and
/// prepended to the ciphertext; the whole blob is returned as base64.
pub fn encrypt(opts: &GenOpts, master: &MasterSecret) -> Result<String> {
    let plain = Zeroizing::new(opts.to_json()?);
    let compressed = Zeroizing::new(compress(&plain)?);

    let key = domain_key(master, &opts.domain);
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_slice()));
    let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, compressed.as_slice())
        .map_err(|_| Error::Crypto("blob encryption failed".into()))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(blob))
}

/// Recovers the options from an encrypted blob.
///
/// Any failure along the way (encoding, truncation, authentication,
/// decompression, deserialization) reports the same error: wrong
/// secret/domain or a corrupted blob. A tampered blob never partially
/// decrypts.
pub fn decrypt(blob: &str, master: &MasterSecret, domain: &str) -> Result<GenOpts> {
    let raw = STANDARD
        .decode(blob)
        .map_err(|_| Error::Crypto(DECRYPT_FAILED.into()))?;
    if raw.len() < NONCE_LEN {
        return Err(Error::Crypto(DECRYPT_FAILED.into()));
    }
    let (nonce, ciphertext) = raw.split_at(NONCE_LEN);

    let key = domain_key(master, domain);
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_slice()));
    let compressed = Zeroizing::new(
        cipher
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|_| Error::Crypto(DECRYPT_FAILED.into()))?,
    );

    let plain = Zeroizing::new(decompress(&compressed)?);
    GenOpts::from_json(&plain)
}

/// Derives the non-secret index string for a blob: a hash of the
/// domain key followed by a short hash of the canonical serialization.
/// A store can group blobs by domain/secret pair and tell entries
/// apart without decrypting anything, and the index reveals neither
/// the secret nor the options.
pub fn index(opts: &GenOpts, master: &MasterSecret) -> Result<String> {
    // Double-hashing keeps the blob-encryption key material out of the
    // public index value.
    let key = domain_key(master, &opts.domain);
    let domain_part = Blake2b512::digest(key.as_slice());

    let canonical = Zeroizing::new(opts.to_json()?);
    let opts_part = Blake2b512::digest(&*canonical);

    let mut out = URL_SAFE_NO_PAD.encode(&domain_part[..INDEX_DOMAIN_LEN]);
    out.push_str(&URL_SAFE_NO_PAD.encode(&opts_part[..INDEX_OPTS_LEN]));
    Ok(out)
}

/// Blob key: `Blake2b512(master ‖ domain)` truncated to the cipher key
/// size. Distinct from the stream seed derivation, so the two uses of
/// the master secret never share key material.
fn domain_key(master: &MasterSecret, domain: &str) -> Zeroizing<[u8; KEY_LEN]> {
    let mut hasher = Blake2b512::new();
    hasher.update(master.as_bytes());
    hasher.update(domain.as_bytes());
    let digest = hasher.finalize();

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    key.copy_from_slice(&digest[..KEY_LEN]);
    key
}

fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = BzEncoder::new(data, Compression::default());
    let mut out = Vec::new();
    encoder
        .read_to_end(&mut out)
        .map_err(|e| Error::Crypto(format!("blob compression failed: {e}")))?;
    Ok(out)
}

fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = BzDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|_| Error::Crypto(DECRYPT_FAILED.into()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use crate::kdf::MASTER_SECRET_LEN;

    fn master() -> MasterSecret {
        MasterSecret::from_raw([11u8; MASTER_SECRET_LEN])
    }

    fn opts() -> GenOpts {
        GenOpts::new("foo", "foo.com", &CoreConfig::DEFAULT)
    }

    #[test]
    fn test_round_trip() {
        let mut o = opts();
        o.iteration = 4;
        o.digits = 2;
        o.max_symbols = 3;
        let blob = encrypt(&o, &master()).unwrap();
        let decoded = decrypt(&blob, &master(), "foo.com").unwrap();
        assert_eq!(o, decoded);
    }

    #[test]
    fn test_nonce_is_fresh_per_call() {
        let o = opts();
        let blob1 = encrypt(&o, &master()).unwrap();
        let blob2 = encrypt(&o, &master()).unwrap();
        assert_ne!(blob1, blob2);
        // Both still decrypt to the same options.
        assert_eq!(
            decrypt(&blob1, &master(), "foo.com").unwrap(),
            decrypt(&blob2, &master(), "foo.com").unwrap()
        );
    }

    #[test]
    fn test_wrong_domain_fails() {
        let blob = encrypt(&opts(), &master()).unwrap();
        assert!(matches!(
            decrypt(&blob, &master(), "bar.com"),
            Err(Error::Crypto(_))
        ));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let blob = encrypt(&opts(), &master()).unwrap();
        let other = MasterSecret::from_raw([12u8; MASTER_SECRET_LEN]);
        assert!(matches!(
            decrypt(&blob, &other, "foo.com"),
            Err(Error::Crypto(_))
        ));
    }

    #[test]
    fn test_tamper_detection() {
        let blob = encrypt(&opts(), &master()).unwrap();
        let mut raw = STANDARD.decode(&blob).unwrap();
        for i in 0..raw.len() {
            raw[i] ^= 0x01;
            let tampered = STANDARD.encode(&raw);
            assert!(
                matches!(decrypt(&tampered, &master(), "foo.com"), Err(Error::Crypto(_))),
                "tampered byte {i} was not rejected"
            );
            raw[i] ^= 0x01;
        }
    }

    #[test]
    fn test_truncated_blob_fails() {
        assert!(matches!(
            decrypt("AAAA", &master(), "foo.com"),
            Err(Error::Crypto(_))
        ));
        assert!(matches!(
            decrypt("not base64 !!!", &master(), "foo.com"),
            Err(Error::Crypto(_))
        ));
    }

    #[test]
    fn test_index_shape() {
        let idx = index(&opts(), &master()).unwrap();
        assert_eq!(idx.len(), 22 + 6);
        assert!(idx.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_index_groups_by_domain_and_secret() {
        let idx = index(&opts(), &master()).unwrap();

        // Same domain/secret, different options: same prefix, new suffix.
        let mut rerolled = opts();
        rerolled.iteration = 9;
        let idx2 = index(&rerolled, &master()).unwrap();
        assert_eq!(idx[..22], idx2[..22]);
        assert_ne!(idx, idx2);

        // Different domain or secret: different prefix.
        let other_domain = GenOpts::new("foo", "bar.com", &CoreConfig::DEFAULT);
        let idx3 = index(&other_domain, &master()).unwrap();
        assert_ne!(idx[..22], idx3[..22]);

        let other_secret = MasterSecret::from_raw([13u8; MASTER_SECRET_LEN]);
        let idx4 = index(&opts(), &other_secret).unwrap();
        assert_ne!(idx[..22], idx4[..22]);
    }

    #[test]
    fn test_index_is_stable() {
        assert_eq!(
            index(&opts(), &master()).unwrap(),
            index(&opts(), &master()).unwrap()
        );
    }
}
