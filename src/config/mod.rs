//! Configuration management for the logic-grid solver

pub mod settings;

pub use settings::{
    CliOverrides, DisplayConfig, EngineConfig, InputConfig, OutputConfig, OutputFormat, Settings,
    ViewKind,
};
