// ABOUTME: Shared configuration for the tiler layout engine.
// ABOUTME: Defines per-tree layout options and config file handling.

pub mod config;

pub use config::{Config, ConfigError, HandleGeometry, LayoutOptions};
