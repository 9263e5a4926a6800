use alloc::{vec, vec::Vec};
use embedded_graphics::pixelcolor::Rgb888;
use micro_dsp::Bands;

use crate::{layout::LaneLayout, level_to_index, palette::Palette, N_LANES};

/// Scrolling per-lane history of color indices. New values enter at the base.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectrumState {
    cells: Vec<u8>,
    depth: usize,
}

impl SpectrumState {
    pub fn new(layout: &LaneLayout) -> Self {
        Self {
            cells: vec![0; N_LANES * layout.depth()],
            depth: layout.depth(),
        }
    }

    pub fn cell(&self, lane: usize, position: usize) -> u8 {
        self.cells[lane * self.depth + position]
    }

    pub fn update(&mut self, levels: &Bands, layout: &LaneLayout) {
        for (lane, &level) in levels.iter().enumerate() {
            let length = layout.lane_length(lane);
            if length == 0 {
                continue;
            }
            let start = lane * self.depth;
            let column = &mut self.cells[start..start + length];
            column.copy_within(0..length - 1, 1);
            column[0] = level_to_index(level);
        }
    }

    pub fn render(&self, layout: &LaneLayout, palette: &Palette, brightness: u8, pixels: &mut [Rgb888]) {
        for lane in 0..N_LANES {
            for position in 0..layout.lane_length(lane) {
                if let Some(led) = layout.led_index(lane, position) {
                    pixels[led] = palette.resolve(self.cell(lane, position), brightness);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use micro_dsp::N_BANDS;

    #[test]
    fn test_history_scrolls_away_from_base() {
        let layout = LaneLayout::default();
        let mut spectrum = SpectrumState::new(&layout);
        let mut levels = [0.0; N_BANDS];

        levels[4] = 1.0;
        spectrum.update(&levels, &layout);
        levels[4] = 0.5;
        spectrum.update(&levels, &layout);
        levels[4] = 0.0;
        spectrum.update(&levels, &layout);

        assert_eq!(spectrum.cell(4, 0), 0);
        assert_eq!(spectrum.cell(4, 1), 128);
        assert_eq!(spectrum.cell(4, 2), 255);
        assert_eq!(spectrum.cell(4, 3), 0);
        assert_eq!(spectrum.cell(3, 2), 0);
    }

    #[test]
    fn test_values_fall_off_the_lane_end() {
        let layout = LaneLayout::default();
        let mut spectrum = SpectrumState::new(&layout);
        let mut levels = [0.0; N_BANDS];
        levels[0] = 1.0;
        spectrum.update(&levels, &layout);
        levels[0] = 0.0;
        for _ in 0..18 {
            spectrum.update(&levels, &layout);
        }
        assert_eq!(spectrum.cell(0, 18), 255);
        spectrum.update(&levels, &layout);
        assert!((0..19).all(|p| spectrum.cell(0, p) == 0));
        // Lane 0 is short, the unused tail of its column never fills.
        assert_eq!(spectrum.cell(0, 19), 0);
    }
}
