//! Page geometry and the measurement oracle.

mod config;
mod metrics;
mod oracle;

pub use config::{
    LayoutConfig, PageChrome, PageFrame, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE,
    DEFAULT_LINE_HEIGHT,
};
pub use metrics::{TextMetrics, TextMetricsOracle};
pub use oracle::{CountingOracle, FnOracle, MeasurementOracle};
