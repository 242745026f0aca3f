//! Result summarizer: turns finishing positions into statistics and a histogram.

mod stats;

pub use stats::{summarize, PositionStats};
