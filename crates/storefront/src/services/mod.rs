//! Services used by the route handlers.
//!
//! - `images` - preview image lookup with fallback to the model photo
//! - `sweeper` - periodic expiry sweep

pub mod images;
pub mod sweeper;

pub use images::PreviewImages;
pub use sweeper::{SweepMetrics, SweeperConfig, run_sweeper};
