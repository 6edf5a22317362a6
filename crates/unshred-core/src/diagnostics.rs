//! Reconstruction diagnostics: timing and counts for each stage.
//!
//! [`reconstruct_with_diagnostics`] runs the same stages as
//! [`crate::reconstruct_bytes`] and records how long each took and what
//! it produced. Time is read through the [`Clock`] trait so the core
//! stays free of platform timing APIs; callers supply the clock.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chain::MatcherKind;
use crate::composite::{fingerprint, stack_vertically, validate_widths};
use crate::decode::decode_strips;
use crate::sequence::SequenceBuilder;
use crate::types::{Dimensions, ReconstructConfig, ReconstructError, Reconstruction, Strip};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Source of monotonic time for stage measurements.
pub trait Clock {
    /// Opaque point in time.
    type Instant;

    /// Current time.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Diagnostics collected from a single reconstruction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconstructDiagnostics {
    /// Stage 0: strip decoding.
    pub decode: StageDiagnostics,
    /// Stage 1: width validation (only when `config.check_widths == true`).
    pub validate: Option<StageDiagnostics>,
    /// Stage 2: bottom strip selection.
    pub anchor: StageDiagnostics,
    /// Stage 3: upward chaining.
    pub chain: StageDiagnostics,
    /// Stage 4: vertical compositing.
    pub composite: StageDiagnostics,
    /// Total wall-clock duration of the run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: ReconstructSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Strip decoding metrics.
    Decode {
        /// Total size of all input buffers.
        input_bytes: usize,
        /// Number of strips decoded.
        strip_count: usize,
        /// Sum of decoded strip heights.
        total_height: u64,
    },
    /// Width validation metrics.
    Validate {
        /// The common strip width.
        width: u32,
    },
    /// Bottom strip selection metrics.
    Anchor {
        /// Input index of the anchor.
        index: usize,
        /// The anchor's best match below (`None` for a single strip).
        best_match: Option<u64>,
        /// Row comparisons made (`n * (n - 1)`).
        comparisons: usize,
    },
    /// Upward chaining metrics.
    Chain {
        /// Which matcher was used.
        matcher: MatcherKind,
        /// Strips placed, anchor included.
        placed: usize,
        /// Strips left unplaced.
        dropped: usize,
        /// Row comparisons made.
        comparisons: usize,
    },
    /// Vertical compositing metrics.
    Composite {
        /// Output width in pixels.
        width: u32,
        /// Output height in pixels.
        height: u32,
        /// [`fingerprint`] of the output image.
        fingerprint: u64,
    },
}

/// High-level summary for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconstructSummary {
    /// Number of input strips.
    pub strip_count: usize,
    /// Input indices from top to bottom.
    pub order: Vec<usize>,
    /// Input indices never placed.
    pub dropped: Vec<usize>,
    /// Output image dimensions.
    pub dimensions: Dimensions,
    /// Output image fingerprint.
    pub fingerprint: u64,
}

impl ReconstructDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Reconstruction Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Strips: {}  |  Output: {}x{}",
            self.summary.strip_count, self.summary.dimensions.width, self.summary.dimensions.height,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);

        let mut stages = vec![("Decode", &self.decode)];
        if let Some(ref v) = self.validate {
            stages.push(("Validate", v));
        }
        stages.push(("Anchor", &self.anchor));
        stages.push(("Chain", &self.chain));
        stages.push(("Composite", &self.composite));

        for (name, diag) in &stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!("Order (top to bottom): {:?}", self.summary.order));
        if !self.summary.dropped.is_empty() {
            lines.push(format!(
                "Dropped: {} strips {:?}",
                self.summary.dropped.len(),
                self.summary.dropped,
            ));
        }
        lines.push(format!("Fingerprint: {:016x}", self.summary.fingerprint));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Decode {
            input_bytes,
            strip_count,
            total_height,
        } => format!("{input_bytes} bytes -> {strip_count} strips, {total_height} rows"),
        StageMetrics::Validate { width } => format!("width={width}"),
        StageMetrics::Anchor {
            index,
            best_match,
            comparisons,
        } => match best_match {
            Some(score) => format!("strip {index} (best below={score}) {comparisons} cmp"),
            None => format!("strip {index} (single strip)"),
        },
        StageMetrics::Chain {
            matcher,
            placed,
            dropped,
            comparisons,
        } => format!("{matcher} placed={placed} dropped={dropped} {comparisons} cmp"),
        StageMetrics::Composite {
            width,
            height,
            fingerprint,
        } => format!("{width}x{height} fp={fingerprint:016x}"),
    }
}

/// Decode, order, and composite strips while recording diagnostics.
///
/// # Errors
///
/// Same as [`crate::reconstruct_bytes`].
pub fn reconstruct_with_diagnostics<B, C>(
    sources: &[B],
    config: &ReconstructConfig,
    clock: &C,
) -> Result<(Reconstruction, ReconstructDiagnostics), ReconstructError>
where
    B: AsRef<[u8]>,
    C: Clock,
{
    let run_start = clock.now();

    // 0. Decode.
    let start = clock.now();
    let strips = decode_strips(sources)?;
    let decode = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Decode {
            input_bytes: sources.iter().map(|s| s.as_ref().len()).sum(),
            strip_count: strips.len(),
            total_height: strips.iter().map(|s| u64::from(s.height())).sum(),
        },
    };

    // 1. Optional width validation.
    let validate = if config.check_widths {
        let start = clock.now();
        let width = validate_widths(&strips)?;
        Some(StageDiagnostics {
            duration: clock.elapsed(&start),
            metrics: StageMetrics::Validate { width },
        })
    } else {
        None
    };

    // 2. Anchor selection.
    let start = clock.now();
    let builder = SequenceBuilder::new(&strips, config.matcher)?;
    let anchor_choice = builder.anchor();
    let anchor = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Anchor {
            index: anchor_choice.index,
            best_match: anchor_choice.best_match,
            comparisons: anchor_comparisons(strips.len()),
        },
    };

    // 3. Upward chaining.
    let start = clock.now();
    let ordering = builder.grow_upward();
    let chain = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Chain {
            matcher: config.matcher,
            placed: ordering.order.len(),
            dropped: ordering.dropped.len(),
            comparisons: ordering.comparisons,
        },
    };

    // 4. Compositing.
    let start = clock.now();
    let ordered: Vec<&Strip> = ordering.order.iter().map(|&i| &strips[i]).collect();
    let image = stack_vertically(&ordered)?;
    let digest = fingerprint(&image);
    let dimensions = Dimensions {
        width: image.width(),
        height: image.height(),
    };
    let composite = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Composite {
            width: dimensions.width,
            height: dimensions.height,
            fingerprint: digest,
        },
    };

    let diagnostics = ReconstructDiagnostics {
        decode,
        validate,
        anchor,
        chain,
        composite,
        total_duration: clock.elapsed(&run_start),
        summary: ReconstructSummary {
            strip_count: strips.len(),
            order: ordering.order.clone(),
            dropped: ordering.dropped.clone(),
            dimensions,
            fingerprint: digest,
        },
    };

    let reconstruction = Reconstruction {
        image,
        order: ordering.order,
        dropped: ordering.dropped,
        dimensions,
    };

    Ok((reconstruction, diagnostics))
}

/// Row comparisons made by anchor selection over `n` strips.
const fn anchor_comparisons(n: usize) -> usize {
    if n < 2 { 0 } else { n * (n - 1) }
}
