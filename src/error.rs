use thiserror::Error;

/// Errors surfaced by the generation and blob pipelines.
///
/// Every operation in this crate is deterministic, so none of these are
/// worth retrying with the same inputs.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed options: missing domain/username, class min > max,
    /// minimums exceeding the length, or an unknown generator version.
    /// Always raised before any hashing begins.
    #[error("invalid options: {0}")]
    Validation(String),

    /// The configuration is consistent but impossible to satisfy: the
    /// character pool ran dry during fill, or the backfill ran out of
    /// positions before every class reached its minimum.
    #[error("character requirements cannot be satisfied")]
    Unsatisfiable,

    /// KDF parameter failure, or an authentication failure on blob
    /// decrypt. The latter is deliberately not broken down further:
    /// wrong secret, wrong domain and a corrupted blob are all reported
    /// the same way.
    #[error("crypto failure: {0}")]
    Crypto(String),

    /// A class fill counter passed its maximum after the removal rule.
    /// Unreachable by construction; surfaced as a defect if it fires.
    #[error("internal invariant violated: {0}")]
    Invariant(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
