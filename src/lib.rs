use std::path::PathBuf;

pub mod cli;
pub mod config;
pub mod figure;
pub mod plot;
pub mod presets;
pub mod present;
pub mod style;
pub mod table;

pub use figure::{ColumnRef, Coordinates, Figure, ResolvedFigure, ResolvedSeries, SeriesSpec};
pub use present::{render_all, Presenter, RenderReport, SaveToDir, SkippedFigure, Viewer};
pub use style::{Color, LineDash, LineStyle};
pub use table::{ResultTable, TableSet};

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// chrono format used to stamp the default output directory
pub const OUTDIR_STAMP: &str = "%Y%m%d_%H%M%S";

pub type CompareResult<T> = Result<T, CompareError>;

#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("malformed table {source_name}, line {line}: {reason}")]
    MalformedTable {
        source_name: String,
        line: usize,
        reason: String,
    },

    #[error("series '{label}': x has {x_len} samples but y has {y_len}")]
    LengthMismatch {
        label: String,
        x_len: usize,
        y_len: usize,
    },

    #[error("figure '{title}' has no series to render")]
    EmptyFigure { title: String },

    #[error("column {index} out of range for {source_name} ({width} columns)")]
    ColumnOutOfRange {
        source_name: String,
        index: usize,
        width: usize,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("rendering failed: {0}")]
    Render(String),
}

impl CompareError {
    /// An unreadable file system stops the whole batch,
    /// everything else only skips the figure it belongs to.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CompareError::Io { .. })
    }

    pub(crate) fn from_io(path: PathBuf, err: std::io::Error) -> CompareError {
        if err.kind() == std::io::ErrorKind::NotFound {
            CompareError::NotFound { path }
        } else {
            CompareError::Io { path, source: err }
        }
    }
}

/// min and max of the slice, None if it is empty.
/// NAN never wins a comparison, so it is skipped unless it comes first.
pub fn min_and_max<T: std::cmp::PartialOrd + Copy>(s: &[T]) -> Option<(T, T)> {
    let mut self_iter = s.iter();
    let (mut min, mut max) = match self_iter.next() {
        Some(v) => (*v, *v),
        None => return None,
    };
    for es in self_iter {
        if *es > max {
            max = *es
        }
        if *es < min {
            min = *es
        }
    }
    Some((min, max))
}

/// axis bounds stay inside +-AXIS_LIMIT so that the span of any axis is a finite f64
pub const AXIS_LIMIT: f64 = f64::MAX / 4.;

/// widens [min, max] by `fraction` of its span on both sides;
/// a degenerate span is widened by one unit, or by `fraction` of the magnitude when that is larger
pub fn padded_range(min: f64, max: f64, fraction: f64) -> (f64, f64) {
    let min = min.max(-AXIS_LIMIT);
    let max = max.min(AXIS_LIMIT);
    let span = max - min;
    let scale = min.abs().max(max.abs());
    if span <= f64::EPSILON * scale {
        let pad = (scale * fraction).max(1.);
        return (min - pad, max + pad);
    }
    let margin = span * fraction;
    (min - margin, max + margin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_and_max_of_values() {
        assert_eq!(min_and_max(&[3., -1., 2.]), Some((-1., 3.)));
        assert_eq!(min_and_max::<f64>(&[]), None);
    }

    #[test]
    fn padded_range_handles_flat_data() {
        assert_eq!(padded_range(2., 2., 0.05), (1., 3.));
        let (lo, hi) = padded_range(0., 10., 0.1);
        assert!((lo + 1.).abs() < 1e-12);
        assert!((hi - 11.).abs() < 1e-12);
    }

    #[test]
    fn padded_range_keeps_tiny_spans() {
        let (lo, hi) = padded_range(1e-17, 3e-17, 0.05);
        assert!(lo < 1e-17 && lo > 0.);
        assert!(hi > 3e-17 && hi < 4e-17);
    }

    #[test]
    fn padded_range_stays_finite_on_extreme_values() {
        let (lo, hi) = padded_range(-1e308, 1e308, 0.05);
        assert!(lo.is_finite() && hi.is_finite());
        assert!((hi - lo).is_finite());
        assert!(lo < 0. && hi > 0.);

        let (lo, hi) = padded_range(f64::MAX, f64::MAX, 0.05);
        assert!((hi - lo).is_finite() && hi > lo);
    }

    #[test]
    fn only_io_errors_are_fatal() {
        let missing = CompareError::from_io(
            PathBuf::from("nope.txt"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(missing, CompareError::NotFound { .. }));
        assert!(!missing.is_fatal());
        let denied = CompareError::from_io(
            PathBuf::from("locked.txt"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(denied.is_fatal());
    }
}
