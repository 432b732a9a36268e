//! Text renderings of lists, cards, badges and chart data.
//!
//! Everything here is pure: data in, `String` out. The CLI prints these
//! directly and the web dashboard reuses the badge classifications.

pub mod badges;
pub mod cards;
pub mod charts;
pub mod format;
pub mod table;

// Re-export commonly used items
pub use badges::{BatteryIcon, BatteryLevel, Badge, Tone};
pub use charts::{DistributionRow, Kpi, SeriesPoint, Slice};
pub use table::{Column, PageIndicator, TableView};
