pub mod common;
pub mod config;
pub mod relay;
pub mod storefront;
pub mod tracking;
pub mod web;
