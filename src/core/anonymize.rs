//! Replacing participant names with random pseudonyms.
//!
//! Pseudonyms are fixed-length alphabetic strings. Each distinct author gets
//! one pseudonym for the whole sequence, no two authors share one, and no
//! pseudonym equals a real author name anywhere in the sequence. The
//! sentinel authors `System` and `???` are never replaced. Names mentioned
//! inside message bodies are left as they are.
//!
//! This is not a privacy guarantee; it only hides names in the author column.
//!
//! # Example
//!
//! ```rust
//! use whatshappened::config::ParserConfig;
//! use whatshappened::core::anonymize::Anonymizer;
//! use whatshappened::parser::parse_str;
//!
//! let export = "01.02.21 um 09:15 - Alice: Hi\n\
//!               01.02.21 um 09:16 - Bob left\n";
//! let records = parse_str(export, &ParserConfig::new())?;
//!
//! let mut anonymizer = Anonymizer::with_seed(7);
//! let records = anonymizer.anonymize(records);
//!
//! assert_ne!(records[0].author, "Alice");
//! assert_eq!(records[0].author.len(), 8);
//! assert_eq!(records[1].author, "System");
//! # Ok::<(), whatshappened::WhatsHappenedError>(())
//! ```

use std::collections::{BTreeMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::record::{Record, SYSTEM_AUTHOR, UNKNOWN_AUTHOR};

/// Default pseudonym length.
pub const DEFAULT_NAME_LEN: usize = 8;

/// Shortest allowed pseudonym; keeps the name space large enough that
/// collision rejection always terminates quickly.
pub const MIN_NAME_LEN: usize = 4;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Assigns stable random pseudonyms to author names.
#[derive(Debug, Clone)]
pub struct Anonymizer {
    rng: StdRng,
    name_len: usize,
    assigned: BTreeMap<String, String>,
    used: HashSet<String>,
}

impl Default for Anonymizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Anonymizer {
    /// Creates an anonymizer seeded from system entropy.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Creates a deterministic anonymizer.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            name_len: DEFAULT_NAME_LEN,
            assigned: BTreeMap::new(),
            used: HashSet::from([SYSTEM_AUTHOR.to_string(), UNKNOWN_AUTHOR.to_string()]),
        }
    }

    /// Sets the pseudonym length, raised to at least [`MIN_NAME_LEN`].
    #[must_use]
    pub fn with_name_len(mut self, len: usize) -> Self {
        self.name_len = len.max(MIN_NAME_LEN);
        self
    }

    /// Keeps `names` out of the pseudonym pool.
    ///
    /// [`anonymize`](Self::anonymize) reserves every author of its input
    /// before drawing, so no pseudonym equals a participant seen later.
    pub fn reserve<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        self.used.extend(names.into_iter().map(str::to_owned));
    }

    /// Returns the pseudonym for `name`, drawing a new one on first use.
    ///
    /// Sentinel authors are returned unchanged.
    pub fn pseudonym(&mut self, name: &str) -> String {
        if name == SYSTEM_AUTHOR || name == UNKNOWN_AUTHOR {
            return name.to_string();
        }
        if let Some(existing) = self.assigned.get(name) {
            return existing.clone();
        }

        let mut candidate = self.draw();
        while self.used.contains(&candidate) || self.assigned.contains_key(&candidate) {
            candidate = self.draw();
        }
        self.used.insert(candidate.clone());
        self.assigned.insert(name.to_string(), candidate.clone());
        candidate
    }

    fn draw(&mut self) -> String {
        (0..self.name_len)
            .map(|_| char::from(ALPHABET[self.rng.gen_range(0..ALPHABET.len())]))
            .collect()
    }

    /// Returns every assignment made so far, real name to pseudonym.
    pub fn mapping(&self) -> &BTreeMap<String, String> {
        &self.assigned
    }

    /// Replaces the author of every record that names a participant.
    pub fn anonymize(&mut self, records: Vec<Record>) -> Vec<Record> {
        self.reserve(
            records
                .iter()
                .filter(|record| !record.has_sentinel_author())
                .map(|record| record.author.as_str()),
        );
        records
            .into_iter()
            .map(|mut record| {
                if !record.has_sentinel_author() {
                    record.author = self.pseudonym(&record.author);
                }
                record
            })
            .collect()
    }
}

/// Anonymizes `records`, deterministically when `seed` is given.
pub fn anonymize(records: Vec<Record>, seed: Option<u64>) -> Vec<Record> {
    let mut anonymizer = match seed {
        Some(seed) => Anonymizer::with_seed(seed),
        None => Anonymizer::new(),
    };
    anonymizer.anonymize(records)
}
