//! DSP — sample-level processing shared by the conversion and export paths.
//!
//! Everything here is pure and synchronous: inputs are borrowed, outputs
//! are freshly allocated, and no state survives between calls.

pub mod resample;
pub mod wav;
