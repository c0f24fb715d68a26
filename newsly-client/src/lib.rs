pub mod api;
pub mod feed;
pub mod metrics;

mod tests;

pub use api::{extract_error_message, validate_signup, ApiClient, Service};
pub use feed::{guarded, FeedLoader, LoadGuard};
pub use metrics::{ApiMetrics, EndpointMetrics, MetricsCollector, RequestMetrics};
