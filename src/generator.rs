use crate::charset::{CLASS_COUNT, Charsets};
use crate::config::{CoreConfig, LATEST_GEN_VERSION};
use crate::error::{Error, Result};
use crate::kdf::{self, MasterSecret};
use crate::options::GenOpts;
use crate::stream::HashStream;
use zeroize::{Zeroize, Zeroizing};

/// A known generation algorithm revision. The wire schema carries the
/// version number so passwords generated under an older revision keep
/// reproducing after the algorithm moves on; a request for a version
/// newer than this build knows fails closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorVersion {
    V1,
}

impl GeneratorVersion {
    pub fn from_wire(version: u32) -> Result<Self> {
        match version {
            1 => Ok(Self::V1),
            other => Err(Error::Validation(format!(
                "unknown generator version {other}, latest supported is {LATEST_GEN_VERSION}"
            ))),
        }
    }
}

/// Derives a password from the options and the caller's plaintext
/// secret. The secret buffer is zeroed before this returns, on every
/// exit path. Identical inputs always produce an identical password.
pub fn generate(
    opts: &GenOpts,
    secret: &mut [u8],
    config: &CoreConfig,
) -> Result<Zeroizing<String>> {
    // Options problems are caught before the expensive KDF runs.
    if let Err(e) = opts.validate() {
        secret.zeroize();
        return Err(e);
    }
    let master = kdf::derive_master_secret(secret, config)?;
    generate_with_master(opts, &master)
}

/// Same as [`generate`] but reuses an already-derived master secret.
/// Lets bulk callers pay the KDF cost once across many requests.
pub fn generate_with_master(opts: &GenOpts, master: &MasterSecret) -> Result<Zeroizing<String>> {
    let version = opts.validate()?;
    let seed = kdf::derive_seed(master, &opts.domain, &opts.username, opts.iteration)?;
    let mut stream = HashStream::new(seed);
    match version {
        GeneratorVersion::V1 => assemble_v1(opts, &mut stream),
    }
}

/// Version 1 assembly: fill-order permutation, primary fill from the
/// shrinking pool, then backfill for unmet class minimums.
fn assemble_v1(opts: &GenOpts, stream: &mut HashStream) -> Result<Zeroizing<String>> {
    let mut sets = Charsets::build(opts)?;
    let length = opts.length as usize;

    // Positions are filled in a pseudo-random order so that capped
    // classes are not biased toward the beginning of the password.
    let order = fill_order(length, stream);

    let mut password: Vec<char> = vec!['\0'; length];
    for &pos in &order {
        if sets.pool_len() == 0 {
            return Err(Error::Unsatisfiable);
        }
        let idx = stream.next(sets.pool_len() as u64) as usize;
        let ch = sets.pool_char(idx);
        password[pos] = ch;
        sets.note_char(ch)?;
    }

    // Walk classes in fixed order, overwriting fill-order positions
    // from the start until every minimum is met. One cursor is shared
    // across classes so each position is consumed at most once.
    let mut cursor = 0;
    for class_idx in 0..CLASS_COUNT {
        while sets.class(class_idx).below_min() {
            if cursor >= order.len() {
                return Err(Error::Unsatisfiable);
            }
            let pos = order[cursor];
            let idx = stream.next(sets.class(class_idx).len() as u64) as usize;
            let ch = sets.class(class_idx).char_at(idx);
            password[pos] = ch;
            sets.note_char(ch)?;
            cursor += 1;
        }
    }

    let rendered: String = password.iter().collect();
    password.zeroize();
    Ok(Zeroizing::new(rendered))
}

/// Reservoir-style permutation of `[0, length)`: draw against the
/// shrinking list of unordered positions and remove each draw.
fn fill_order(length: usize, stream: &mut HashStream) -> Vec<usize> {
    let mut remaining: Vec<usize> = (0..length).collect();
    let mut order = Vec::with_capacity(length);
    for _ in 0..length {
        let idx = stream.next(remaining.len() as u64) as usize;
        order.push(remaining.remove(idx));
    }
    order
}
