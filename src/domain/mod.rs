//! Core domain types and the analysis pipeline.

pub mod price_series;
pub mod alignment;
pub mod resample;
pub mod weights;
pub mod rebalance;
pub mod portfolio;
pub mod metrics;
pub mod analysis;
pub mod universe;
pub mod config_validation;
pub mod error;
