use crate::error::{Error, Result};
use crate::options::GenOpts;

/// Class order is fixed: digits, uppercase, lowercase, symbols. The
/// backfill pass and the wire schema both depend on it.
pub(crate) const CLASS_COUNT: usize = 4;

/// One of the four character classes with its occurrence constraints
/// and a running fill counter.
#[derive(Debug)]
pub(crate) struct CharClass {
    name: &'static str,
    chars: Vec<char>,
    min: u32,
    max: u32,
    cur: u32,
}

impl CharClass {
    fn from_range(name: &'static str, lo: char, hi: char, min: u32, max: i32, length: u32) -> Self {
        Self {
            name,
            chars: (lo..=hi).collect(),
            min,
            max: resolve_max(max, length),
            cur: 0,
        }
    }

    fn from_symbols(name: &'static str, set: &str, min: u32, max: i32, length: u32) -> Self {
        let mut chars = Vec::new();
        for ch in set.chars() {
            if !chars.contains(&ch) {
                chars.push(ch);
            }
        }
        Self {
            name,
            chars,
            min,
            max: resolve_max(max, length),
            cur: 0,
        }
    }

    pub(crate) fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    pub(crate) fn len(&self) -> usize {
        self.chars.len()
    }

    pub(crate) fn char_at(&self, idx: usize) -> char {
        self.chars[idx]
    }

    pub(crate) fn below_min(&self) -> bool {
        self.cur < self.min
    }
}

/// A negative or over-length configured maximum means "uncapped within
/// the password length".
fn resolve_max(max: i32, length: u32) -> u32 {
    if max < 0 || max as u32 > length {
        length
    } else {
        max as u32
    }
}

/// The four character classes plus the global pool they feed.
///
/// The pool owns its own storage; removing an exhausted class is a
/// mark-and-compact pass over the pool, never a splice of the class's
/// backing array.
#[derive(Debug)]
pub(crate) struct Charsets {
    classes: [CharClass; CLASS_COUNT],
    pool: Vec<char>,
}

impl Charsets {
    /// Builds and validates the classes for one generation run.
    /// A class capped at zero is excluded from the pool entirely.
    pub(crate) fn build(opts: &GenOpts) -> Result<Self> {
        let length = opts.length;
        let classes = [
            CharClass::from_range("digits", '0', '9', opts.digits, opts.max_digits, length),
            CharClass::from_range("uppercase", 'A', 'Z', opts.uppers, opts.max_uppers, length),
            CharClass::from_range("lowercase", 'a', 'z', opts.lowers, opts.max_lowers, length),
            CharClass::from_symbols("symbols", &opts.symbol_set, opts.symbols, opts.max_symbols, length),
        ];

        let mut total_min: u64 = 0;
        for class in &classes {
            if class.min > class.max {
                return Err(Error::Validation(format!(
                    "{} minimum {} exceeds maximum {}",
                    class.name, class.min, class.max
                )));
            }
            if class.min > 0 && class.chars.is_empty() {
                return Err(Error::Validation(format!(
                    "{} class is empty but a minimum of {} is set",
                    class.name, class.min
                )));
            }
            total_min += u64::from(class.min);
        }
        if total_min > u64::from(length) {
            return Err(Error::Validation(format!(
                "minimum character requirements ({total_min}) exceed the length ({length})"
            )));
        }

        let mut pool = Vec::new();
        for class in &classes {
            if class.max == 0 {
                continue;
            }
            pool.extend_from_slice(&class.chars);
        }

        Ok(Self { classes, pool })
    }

    pub(crate) fn class(&self, idx: usize) -> &CharClass {
        &self.classes[idx]
    }

    pub(crate) fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub(crate) fn pool_char(&self, idx: usize) -> char {
        self.pool[idx]
    }

    /// Records one placed character: bumps the counter of every class
    /// containing it and compacts the pool when a class reaches its
    /// maximum, so later draws cannot select an exhausted class.
    pub(crate) fn note_char(&mut self, ch: char) -> Result<()> {
        for idx in 0..CLASS_COUNT {
            if !self.classes[idx].contains(ch) {
                continue;
            }
            self.classes[idx].cur += 1;
            if self.classes[idx].cur == self.classes[idx].max {
                let exhausted = &self.classes[idx].chars;
                self.pool.retain(|c| !exhausted.contains(c));
            }
            if self.classes[idx].cur > self.classes[idx].max {
                return Err(Error::Invariant("class fill counter passed its maximum"));
            }
        }
        Ok(())
    }
}
