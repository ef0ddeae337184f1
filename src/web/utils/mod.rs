pub mod client_meta;
pub mod errors;
