//! Per-instruction trace producers and sinks.
//!
//! # Structure
//!
//! - `commit_log`: Text line per retired instruction.
//! - `sink`: Binary instruction-trace sinks.
//! - `raw_op`: Splits vector encodings into per-micro-op trace records.
//! - `access_period`: Per-address access-interval history.
//! - `histogram`: Per-PC execution counts.
//!
//! [`Tracer`] bundles the ones a hart is configured with. Disabled producers
//! are either absent (`None`) or the no-op sink, chosen at construction.

/// Per-address access-interval history.
pub mod access_period;
/// Commit-log text sink.
pub mod commit_log;
/// Per-PC execution counts.
pub mod histogram;
/// Per-micro-op trace reconstruction.
pub mod raw_op;
/// Instruction-trace sinks.
pub mod sink;

use std::fmt;
use std::fs::File;
use std::io::BufWriter;

use self::access_period::AccessPeriodTracker;
use self::commit_log::CommitLog;
use self::histogram::PcHistogram;
use self::sink::{NullTraceSink, StreamTraceSink, TraceEvent, TraceSink, VecTraceSink};
use crate::common::SimError;
use crate::config::{ConfigError, TraceConfig};

/// Trace producers owned by one hart.
pub struct Tracer {
    /// Commit-log sink; `None` when commit logging is off.
    pub commit_log: Option<CommitLog>,
    /// Instruction-trace sink.
    pub sink: Box<dyn TraceSink>,
    /// Access-period history; always maintained.
    pub access_periods: AccessPeriodTracker,
    /// PC histogram; `None` when disabled.
    pub histogram: Option<PcHistogram>,
    recorded: Option<VecTraceSink>,
}

impl Tracer {
    /// Builds the producers selected by `config`.
    ///
    /// # Errors
    ///
    /// `ConfigError::CommitLog` or `ConfigError::InstructionTrace` when the
    /// corresponding file cannot be created.
    pub fn from_config(config: &TraceConfig) -> Result<Self, ConfigError> {
        let commit_log = match (config.commit_log, &config.commit_log_path) {
            (false, _) => None,
            (true, None) => Some(CommitLog::stderr()),
            (true, Some(path)) => Some(CommitLog::create(path).map_err(ConfigError::CommitLog)?),
        };
        let mut recorded = None;
        let sink: Box<dyn TraceSink> =
            match (config.instruction_trace, &config.instruction_trace_path) {
                (false, _) => Box::new(NullTraceSink),
                (true, None) => {
                    let vec = VecTraceSink::new();
                    recorded = Some(vec.clone());
                    Box::new(vec)
                }
                (true, Some(path)) => {
                    let file = File::create(path).map_err(ConfigError::InstructionTrace)?;
                    Box::new(StreamTraceSink::new(BufWriter::new(file)))
                }
            };
        Ok(Self {
            commit_log,
            sink,
            access_periods: AccessPeriodTracker::new(),
            histogram: config.histogram.then(PcHistogram::new),
            recorded,
        })
    }

    /// Replaces the instruction-trace sink, dropping any in-memory recording.
    pub fn set_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sink = sink;
        self.recorded = None;
    }

    /// Events recorded in memory when the instruction trace is enabled
    /// without a destination file. `None` otherwise.
    pub fn recorded_events(&self) -> Option<Vec<TraceEvent>> {
        self.recorded.as_ref().map(VecTraceSink::events)
    }

    /// Flushes the commit log and the instruction-trace sink.
    ///
    /// # Errors
    ///
    /// The first I/O failure.
    pub fn flush(&mut self) -> Result<(), SimError> {
        if let Some(log) = self.commit_log.as_mut() {
            log.flush()?;
        }
        self.sink.flush().map_err(SimError::TraceSink)
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self {
            commit_log: None,
            sink: Box::new(NullTraceSink),
            access_periods: AccessPeriodTracker::new(),
            histogram: None,
            recorded: None,
        }
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("commit_log", &self.commit_log.is_some())
            .field("access_periods", &self.access_periods.len())
            .field("histogram", &self.histogram.as_ref().map(PcHistogram::len))
            .finish_non_exhaustive()
    }
}
