//! Compressor configuration.

use crate::induction::DEFAULT_MAX_PROBES;
use crate::policy::{BestCandidate, NgramSet, Selector};

/// Compression level, 0 through 9.
///
/// Level 0 stores the input without induction. Higher levels mine longer
/// windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    pub const STORE: CompressionLevel = CompressionLevel(0);
    pub const FASTEST: CompressionLevel = CompressionLevel(1);
    pub const DEFAULT: CompressionLevel = CompressionLevel(2);
    pub const BEST: CompressionLevel = CompressionLevel(9);

    /// Create from numeric level, clamping anything above 9.
    pub fn from_level(level: u8) -> Self {
        CompressionLevel(level.min(9))
    }

    pub fn to_level(self) -> u8 {
        self.0
    }

    /// Longest pattern the miner builds at this level: 2 + level / 2,
    /// kept within 2..=6.
    pub fn max_window(self) -> usize {
        (2 + usize::from(self.0) / 2).clamp(2, 6)
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::DEFAULT
    }
}

/// Candidate selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Policy {
    /// One best-scoring pattern per pass.
    #[default]
    BestCandidate,
    /// Every frequent bigram per pass.
    NgramSet,
}

/// What to do with input in which nothing repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Incompressible {
    /// Emit the input as a rule-less grammar.
    #[default]
    Store,
    /// Report [`Error::NothingToCompress`](crate::Error::NothingToCompress).
    Fail,
}

/// Compressor settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub level: CompressionLevel,
    pub policy: Policy,
    /// Stop best-candidate induction once a pass saves less than half of
    /// the previous one.
    pub decay: bool,
    pub incompressible: Incompressible,
    /// Decode and expand the output before returning it.
    pub verify: bool,
    /// Ranked candidates tried per pass before giving up.
    pub max_probes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: CompressionLevel::default(),
            policy: Policy::default(),
            decay: true,
            incompressible: Incompressible::default(),
            verify: true,
            max_probes: DEFAULT_MAX_PROBES,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = CompressionLevel::from_level(level);
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_decay(mut self, decay: bool) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_incompressible(mut self, incompressible: Incompressible) -> Self {
        self.incompressible = incompressible;
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_max_probes(mut self, max_probes: usize) -> Self {
        self.max_probes = max_probes;
        self
    }

    /// Builds the selector this configuration describes.
    pub fn selector(&self) -> Box<dyn Selector> {
        match self.policy {
            Policy::BestCandidate => Box::new(BestCandidate {
                max_window: self.level.max_window(),
                decay: self.decay,
            }),
            Policy::NgramSet => Box::new(NgramSet::default()),
        }
    }
}
