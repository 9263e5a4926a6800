use alloc::{vec, vec::Vec};
use embedded_graphics::pixelcolor::Rgb888;
#[allow(unused_imports)]
use micromath::F32Ext;
use micro_dsp::Bands;

use crate::{blur::gaussian_blur, layout::LaneLayout, palette::Palette, N_LANES};

/// Multiplier applied to heat as it moves one position up the lane.
pub const FIRE_COOLING: f32 = 0.975;

/// Heat rises from the base of every lane, cools as it climbs and is blurred
/// across neighbouring lanes before it is shown.
#[derive(Clone, Debug, PartialEq)]
pub struct FireState {
    heat: Vec<f32>,
    intensity: Vec<f32>,
    depth: usize,
}

impl FireState {
    pub fn new(layout: &LaneLayout) -> Self {
        let cells = N_LANES * layout.depth();
        Self {
            heat: vec![0.0; cells],
            intensity: vec![0.0; cells],
            depth: layout.depth(),
        }
    }

    pub fn heat(&self, lane: usize, position: usize) -> f32 {
        self.heat[lane * self.depth + position]
    }

    pub fn intensity(&self, lane: usize, position: usize) -> f32 {
        self.intensity[lane * self.depth + position]
    }

    pub fn update(&mut self, levels: &Bands, layout: &LaneLayout) {
        for (lane, &level) in levels.iter().enumerate() {
            let length = layout.lane_length(lane);
            if length == 0 {
                continue;
            }
            let start = lane * self.depth;
            let column = &mut self.heat[start..start + length];
            let base = column[0];
            for position in (1..length).rev() {
                column[position] = column[position - 1] * FIRE_COOLING;
            }
            column[0] = (base + level.clamp(0.0, 1.0) * 255.0) / 2.0;
        }
        gaussian_blur(&self.heat, &mut self.intensity, layout.lengths(), self.depth);
    }

    pub fn render(&self, layout: &LaneLayout, palette: &Palette, brightness: u8, pixels: &mut [Rgb888]) {
        for lane in 0..N_LANES {
            for position in 0..layout.lane_length(lane) {
                if let Some(led) = layout.led_index(lane, position) {
                    let index = self.intensity(lane, position).round().clamp(0.0, 255.0) as u8;
                    pixels[led] = palette.resolve(index, brightness);
                }
            }
        }
    }
}
