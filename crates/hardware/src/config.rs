//! Configuration system for the execution core.
//!
//! This module defines the configuration structures used to parameterize a hart.
//! It provides:
//! 1. **Defaults:** Baseline ISA widths, reset PC and icache geometry.
//! 2. **Structures:** Hierarchical config for general, ISA and trace settings.
//! 3. **Loading:** JSON deserialization and validation.
//!
//! The trace toggles replace build-time switches: each one selects between the
//! active and the no-op implementation of its sink at hart construction.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Default configuration constants for the core.
mod defaults {
    /// Reset program counter (base of RAM on most RISC-V platforms).
    pub const START_PC: u64 = 0x8000_0000;

    /// Icache slot count. Must be a power of two.
    pub const ICACHE_ENTRIES: usize = crate::common::constants::ICACHE_ENTRIES;

    /// Integer register width in bits.
    pub const XLEN: u32 = 64;

    /// Floating-point register width in bits.
    pub const FLEN: u32 = 64;

    /// Vector register width in bits.
    pub const VLEN: u32 = 128;

    /// Widest supported vector element in bits.
    pub const ELEN: u32 = 64;
}

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document is malformed or has mistyped fields.
    #[error("invalid configuration JSON")]
    Parse(#[from] serde_json::Error),

    /// XLEN other than 32 or 64.
    #[error("unsupported XLEN {0} (expected 32 or 64)")]
    Xlen(u32),

    /// FLEN other than 32 or 64.
    #[error("unsupported FLEN {0} (expected 32 or 64)")]
    Flen(u32),

    /// VLEN that is not a power of two of at least 64 bits.
    #[error("VLEN {0} must be a power of two of at least 64")]
    Vlen(u32),

    /// ELEN other than 32 or 64, or wider than VLEN.
    #[error("ELEN {elen} must be 32 or 64 and not exceed VLEN {vlen}")]
    Elen {
        /// Requested ELEN.
        elen: u32,
        /// Configured VLEN.
        vlen: u32,
    },

    /// Icache slot count that is zero or not a power of two.
    #[error("icache entry count {0} must be a non-zero power of two")]
    IcacheEntries(usize),

    /// The commit-log file could not be created.
    #[error("cannot create commit log")]
    CommitLog(#[source] std::io::Error),

    /// The instruction-trace file could not be created.
    #[error("cannot create instruction trace")]
    InstructionTrace(#[source] std::io::Error),
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use rvx_core::config::Config;
///
/// let config = Config::default();
/// assert!(!config.trace.commit_log);
/// assert_eq!(config.isa.vlen, 128);
/// ```
///
/// Loading from JSON; omitted sections and fields keep their defaults:
///
/// ```
/// use rvx_core::config::Config;
///
/// let json = r#"{
///     "general": { "hart_id": 2, "start_pc": 4096 },
///     "isa": { "vlen": 256 },
///     "trace": { "commit_log": true, "histogram": true }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.general.hart_id, 2);
/// assert_eq!(config.general.start_pc, 0x1000);
/// assert_eq!(config.isa.vlen, 256);
/// assert_eq!(config.isa.xlen, 64);
/// assert!(config.trace.commit_log);
/// assert!(!config.trace.instruction_trace);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Hart identity, reset state and front-end geometry.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Register widths.
    #[serde(default)]
    pub isa: IsaConfig,
    /// Trace sink toggles.
    #[serde(default)]
    pub trace: TraceConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON, or the validation error of
    /// the first offending field.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks field combinations the hart cannot be built with.
    ///
    /// # Errors
    ///
    /// The first [`ConfigError`] found, checking ISA widths before the icache.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let isa = &self.isa;
        if !matches!(isa.xlen, 32 | 64) {
            return Err(ConfigError::Xlen(isa.xlen));
        }
        if !matches!(isa.flen, 32 | 64) {
            return Err(ConfigError::Flen(isa.flen));
        }
        if isa.vlen < 64 || !isa.vlen.is_power_of_two() {
            return Err(ConfigError::Vlen(isa.vlen));
        }
        if !matches!(isa.elen, 32 | 64) || isa.elen > isa.vlen {
            return Err(ConfigError::Elen {
                elen: isa.elen,
                vlen: isa.vlen,
            });
        }
        let entries = self.general.icache_entries;
        if entries == 0 || !entries.is_power_of_two() {
            return Err(ConfigError::IcacheEntries(entries));
        }
        Ok(())
    }
}

/// Hart identity and reset settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Hart id; printed on every commit-log line.
    #[serde(default)]
    pub hart_id: u32,

    /// Reset program counter.
    #[serde(default = "GeneralConfig::default_start_pc")]
    pub start_pc: u64,

    /// Interactive debugging: forces the slow path and disassembles every
    /// instruction to the log.
    #[serde(default)]
    pub interactive_debug: bool,

    /// Icache slot count (power of two).
    #[serde(default = "GeneralConfig::default_icache_entries")]
    pub icache_entries: usize,
}

impl GeneralConfig {
    fn default_start_pc() -> u64 {
        defaults::START_PC
    }

    fn default_icache_entries() -> usize {
        defaults::ICACHE_ENTRIES
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            hart_id: 0,
            start_pc: defaults::START_PC,
            interactive_debug: false,
            icache_entries: defaults::ICACHE_ENTRIES,
        }
    }
}

/// Register widths of the modelled ISA.
#[derive(Debug, Clone, Deserialize)]
pub struct IsaConfig {
    /// Integer register width (32 or 64).
    #[serde(default = "IsaConfig::default_xlen")]
    pub xlen: u32,
    /// Floating-point register width (32 or 64).
    #[serde(default = "IsaConfig::default_flen")]
    pub flen: u32,
    /// Vector register width in bits (power of two, at least 64).
    #[serde(default = "IsaConfig::default_vlen")]
    pub vlen: u32,
    /// Widest vector element in bits (32 or 64).
    #[serde(default = "IsaConfig::default_elen")]
    pub elen: u32,
}

impl IsaConfig {
    fn default_xlen() -> u32 {
        defaults::XLEN
    }

    fn default_flen() -> u32 {
        defaults::FLEN
    }

    fn default_vlen() -> u32 {
        defaults::VLEN
    }

    fn default_elen() -> u32 {
        defaults::ELEN
    }
}

impl Default for IsaConfig {
    fn default() -> Self {
        Self {
            xlen: defaults::XLEN,
            flen: defaults::FLEN,
            vlen: defaults::VLEN,
            elen: defaults::ELEN,
        }
    }
}

/// Trace sink toggles.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TraceConfig {
    /// Write one commit-log line per retired instruction.
    #[serde(default)]
    pub commit_log: bool,

    /// Commit-log destination. Standard error when unset.
    #[serde(default)]
    pub commit_log_path: Option<PathBuf>,

    /// Count executions per PC.
    #[serde(default)]
    pub histogram: bool,

    /// Emit per-micro-op instruction trace events.
    ///
    /// Without `instruction_trace_path` they are kept in memory and read back
    /// with `Tracer::recorded_events`.
    #[serde(default)]
    pub instruction_trace: bool,

    /// Binary instruction-trace destination, decodable with
    /// `trace::sink::read_events`.
    #[serde(default)]
    pub instruction_trace_path: Option<PathBuf>,
}
