mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use repass::config::{CoreConfig, DEFAULT_LENGTH, DEFAULT_MAX, DEFAULT_SYMBOL_SET, LATEST_GEN_VERSION};
use repass::{GenOpts, blob, generator, kdf};

#[derive(Parser)]
#[command(
    name = "repass",
    version,
    about = "Stateless deterministic password generator"
)]
struct Cli {
    /// Domain to create a password for
    #[arg(short, long)]
    domain: String,

    /// Username for the domain
    #[arg(short, long)]
    username: String,

    /// Iteration of the password, for re-rolling without changing other inputs
    #[arg(short, long, default_value_t = 0)]
    iteration: u64,

    /// Number of characters in the password
    #[arg(short = 'c', long = "characters", default_value_t = DEFAULT_LENGTH)]
    characters: u32,

    /// Version of the generation algorithm to use
    #[arg(long = "pw-version", default_value_t = LATEST_GEN_VERSION)]
    pw_version: u32,

    /// Minimum number of digits
    #[arg(short = 'n', long, default_value_t = 0)]
    numbers: u32,

    /// Maximum number of digits; -1 means no cap, 0 disables digits
    #[arg(long, default_value_t = DEFAULT_MAX, allow_hyphen_values = true)]
    max_numbers: i32,

    /// Minimum number of uppercase letters
    #[arg(short = 'U', long, default_value_t = 0)]
    uppers: u32,

    /// Maximum number of uppercase letters; -1 means no cap
    #[arg(long, default_value_t = DEFAULT_MAX, allow_hyphen_values = true)]
    max_uppers: i32,

    /// Minimum number of lowercase letters
    #[arg(short = 'l', long, default_value_t = 0)]
    lowers: u32,

    /// Maximum number of lowercase letters; -1 means no cap
    #[arg(long, default_value_t = DEFAULT_MAX, allow_hyphen_values = true)]
    max_lowers: i32,

    /// Minimum number of symbols
    #[arg(short = 's', long, default_value_t = 0)]
    symbols: u32,

    /// Maximum number of symbols; -1 means no cap, 0 disables symbols
    #[arg(long, default_value_t = DEFAULT_MAX, allow_hyphen_values = true)]
    max_symbols: i32,

    /// Set of symbols to draw from
    #[arg(long, default_value = DEFAULT_SYMBOL_SET)]
    symbol_set: String,

    /// Also print the blob index and encrypted options blob
    #[arg(long)]
    export: bool,

    /// Decrypt an options blob for the given domain and generate from
    /// the recovered options, ignoring the other option flags
    #[arg(long, value_name = "BLOB", conflicts_with = "export")]
    import: Option<String>,

    /// Print only the password
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn to_opts(&self, config: &CoreConfig) -> GenOpts {
        let mut opts = GenOpts::new(&self.username, &self.domain, config);
        opts.iteration = self.iteration;
        opts.length = self.characters;
        opts.gen_version = self.pw_version;
        opts.digits = self.numbers;
        opts.max_digits = self.max_numbers;
        opts.uppers = self.uppers;
        opts.max_uppers = self.max_uppers;
        opts.lowers = self.lowers;
        opts.max_lowers = self.max_lowers;
        opts.symbols = self.symbols;
        opts.max_symbols = self.max_symbols;
        opts.symbol_set = self.symbol_set.clone();
        opts
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CoreConfig::DEFAULT;

    let mut secret = ui::prompt_master_secret()?;

    let ((opts, password, exported), elapsed) = ui::show_progress(|| {
        let master = kdf::derive_master_secret(&mut secret, &config)?;

        let opts = match &cli.import {
            Some(blob) => blob::decrypt(blob, &master, &cli.domain)
                .context("Failed to decrypt options blob")?,
            None => {
                let opts = cli.to_opts(&config);
                opts.validate().context("Invalid options")?;
                opts
            }
        };

        let password = generator::generate_with_master(&opts, &master)?;

        let exported = if cli.export {
            Some((blob::index(&opts, &master)?, blob::encrypt(&opts, &master)?))
        } else {
            None
        };

        Ok((opts, password, exported))
    })?;

    ui::display_password(&password, &opts, elapsed, cli.quiet);
    if let Some((index, blob)) = exported {
        ui::display_blob(&index, &blob);
    }

    Ok(())
}
