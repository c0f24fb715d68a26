pub mod badge;
pub mod calendar;
pub mod config;
pub mod error;
pub mod error_utils;
pub mod feed;
pub mod normalize;
pub mod partition;
pub mod selection;
pub mod summary;
pub mod types;

pub use badge::{BadgePalette, BadgeTone, Rgb};
pub use calendar::CalendarDay;
pub use config::AppConfig;
pub use error::*;
pub use error_utils::*;
pub use feed::{CategoryFilter, FeedState, FeedStatus, LoadOutcome};
pub use normalize::{normalize_batch, normalize_batch_in, normalize_item};
pub use partition::{partition_by_day, DayPartition};
pub use selection::{NewsletterSelection, SaveState, ScanState};
pub use summary::{format_long_summary, SummaryBlock, SummaryBody};
pub use types::*;
