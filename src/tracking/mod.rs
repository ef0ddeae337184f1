pub mod client;
pub mod dedupe;
pub mod tracker;

pub use client::{AnalyticsClient, Delivery, NoopAnalytics, RelayAnalytics};
pub use dedupe::SeenEvents;
pub use tracker::{SelectedItems, TrackOutcome, Tracker};
