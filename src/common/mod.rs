pub mod envelope;
pub mod events;
pub mod json_clean;
