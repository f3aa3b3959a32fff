//! The measurement oracle seam.
//!
//! The paginator never computes sizes itself. Every height comes from a
//! [`MeasurementOracle`]: a headless browser, a font-metrics engine or the
//! built-in [`TextMetricsOracle`](super::TextMetricsOracle) can all sit
//! behind this trait.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::LayoutConfig;
use crate::error::Result;
use crate::model::Block;

/// Something that can report the rendered height of a candidate page.
///
/// Implementations must be deterministic for identical inputs within one
/// run, and must follow the same rendering rules as the final export.
pub trait MeasurementOracle {
    /// Measure the height of `blocks` laid out one after another.
    fn measure(&self, blocks: &[Block], config: &LayoutConfig) -> Result<f32>;
}

impl<T: MeasurementOracle + ?Sized> MeasurementOracle for &T {
    fn measure(&self, blocks: &[Block], config: &LayoutConfig) -> Result<f32> {
        (**self).measure(blocks, config)
    }
}

impl<T: MeasurementOracle + ?Sized> MeasurementOracle for Box<T> {
    fn measure(&self, blocks: &[Block], config: &LayoutConfig) -> Result<f32> {
        (**self).measure(blocks, config)
    }
}

/// Adapts a closure into an oracle.
///
/// ```
/// use notepage::layout::{FnOracle, LayoutConfig, MeasurementOracle};
/// use notepage::Block;
///
/// let oracle = FnOracle(|blocks: &[Block], config: &LayoutConfig| {
///     Ok(blocks.len() as f32 * config.line_height_px())
/// });
/// let height = oracle.measure(&[Block::paragraph("a")], &LayoutConfig::default())?;
/// assert_eq!(height, 24.0);
/// # Ok::<(), notepage::Error>(())
/// ```
pub struct FnOracle<F>(pub F);

impl<F> MeasurementOracle for FnOracle<F>
where
    F: Fn(&[Block], &LayoutConfig) -> Result<f32>,
{
    fn measure(&self, blocks: &[Block], config: &LayoutConfig) -> Result<f32> {
        (self.0)(blocks, config)
    }
}

/// Wraps an oracle and counts how often it is asked.
#[derive(Debug, Default)]
pub struct CountingOracle<O> {
    inner: O,
    calls: AtomicUsize,
}

impl<O> CountingOracle<O> {
    /// Wrap an oracle.
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of measurements made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Unwrap the inner oracle.
    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: MeasurementOracle> MeasurementOracle for CountingOracle<O> {
    fn measure(&self, blocks: &[Block], config: &LayoutConfig) -> Result<f32> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.measure(blocks, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_fn_oracle_error_propagates() {
        let oracle = FnOracle(|_: &[Block], _: &LayoutConfig| -> Result<f32> {
            Err(Error::Measure("boom".to_string()))
        });
        let result = oracle.measure(&[], &LayoutConfig::default());
        assert!(matches!(result, Err(Error::Measure(_))));
    }

    #[test]
    fn test_counting_oracle() {
        let oracle = CountingOracle::new(FnOracle(|_: &[Block], _: &LayoutConfig| Ok(1.0)));
        let config = LayoutConfig::default();
        oracle.measure(&[], &config).unwrap();
        (&oracle).measure(&[], &config).unwrap();
        assert_eq!(oracle.calls(), 2);

        let inner = oracle.into_inner();
        assert_eq!(inner.measure(&[], &config).unwrap(), 1.0);
    }

    #[test]
    fn test_boxed_oracle() {
        let oracle: Box<dyn MeasurementOracle> =
            Box::new(FnOracle(|_: &[Block], _: &LayoutConfig| Ok(7.0)));
        assert_eq!(oracle.measure(&[], &LayoutConfig::default()).unwrap(), 7.0);
    }
}
