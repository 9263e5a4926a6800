#![no_std]

//! Pixel synthesis for the LED matrix: three fixed visualization modes,
//! palette resolution and the serpentine lane layout.

extern crate alloc;

#[allow(unused_imports)]
use micromath::F32Ext;

pub mod bars;
pub mod blur;
pub mod engine;
pub mod error;
pub mod fire;
pub mod layout;
pub mod palette;
pub mod spectrum;
pub mod ws2812;

pub use engine::{
    PaletteId, VisualizationConfig, VisualizationEngine, VisualizationMode, VisualizationState,
};
pub use error::VizError;
pub use layout::LaneLayout;
pub use palette::Palette;

/// One lane per band.
pub const N_LANES: usize = micro_dsp::N_BANDS;

/// Map a normalized level onto the 8-bit palette index range.
pub fn level_to_index(level: f32) -> u8 {
    (level.clamp(0.0, 1.0) * 255.0).round() as u8
}
