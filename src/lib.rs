//! Synthetic thrust curve generation, anomaly screening and summary metrics.
//!
//! The computational core ([`source`], [`detector`], [`metrics`]) is pure and
//! independent of any display; plotting lives behind [`render::Renderer`].

pub mod config;
pub mod detector;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod source;
pub mod stats;
