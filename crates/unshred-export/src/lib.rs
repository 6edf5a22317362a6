//! unshred-export: Pure raster encoders (sans-IO)
//!
//! Encodes reconstructed images into output file formats. Currently
//! supports BMP and PNG.

pub mod raster;

pub use raster::{ExportError, OutputFormat, encode};
