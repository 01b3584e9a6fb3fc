use anyhow::{Context, Result};
use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use repass::GenOpts;
use rpassword::read_password;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

pub const MAX_SECRET_BYTES: usize = 1024 * 1024;

/// Prompts for the master secret without echo. The typed secret is
/// trimmed and NFC-normalized so the same passphrase typed on
/// different keyboards derives the same passwords.
pub fn prompt_master_secret() -> Result<Zeroizing<Vec<u8>>> {
    print!("Master secret: ");
    io::stdout().flush()?;

    let password = Zeroizing::new(read_password().context("Failed to read master secret")?);
    let normalized: Zeroizing<String> = Zeroizing::new(password.trim().nfc().collect());

    if normalized.is_empty() {
        anyhow::bail!("Master secret cannot be empty");
    }
    if normalized.len() > MAX_SECRET_BYTES {
        anyhow::bail!(
            "Master secret too long ({} bytes, maximum is {})",
            normalized.len(),
            MAX_SECRET_BYTES
        );
    }

    Ok(Zeroizing::new(normalized.as_bytes().to_vec()))
}

/// Runs the closure behind a spinner; the KDF call inside is slow by
/// design and the terminal would otherwise look hung.
pub fn show_progress<F, T>(f: F) -> Result<(T, Duration)>
where
    F: FnOnce() -> Result<T>,
{
    let term = Term::stdout();
    term.hide_cursor().ok();

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("-\\|/-"),
    );
    pb.set_message("Deriving key...");
    pb.enable_steady_tick(Duration::from_millis(80));

    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();

    pb.finish_and_clear();
    term.show_cursor().ok();

    result.map(|r| (r, elapsed))
}

pub fn display_password(password: &str, opts: &GenOpts, elapsed: Duration, quiet: bool) {
    if quiet {
        println!("{password}");
        return;
    }

    let dim = Style::new().dim();
    println!("{password}\n");
    println!(
        "{}",
        dim.apply_to(format!(
            "{} @ {} (iteration {}, {} chars, v{})",
            opts.username, opts.domain, opts.iteration, opts.length, opts.gen_version
        ))
    );
    println!("{}", dim.apply_to(format!("derived in {:.2?}", elapsed)));
}

pub fn display_blob(index: &str, blob: &str) {
    let label = Style::new().bold();
    println!("\n{} {}", label.apply_to("Index:"), index);
    println!("{}  {}", label.apply_to("Blob:"), blob);
}
