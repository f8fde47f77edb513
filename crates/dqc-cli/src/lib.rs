//! CLI library components for the DICOM QC tool.

pub mod cli;
pub mod commands;
pub mod input;
pub mod logging;
pub mod render;
pub mod resolver;
