use embedded_graphics::{pixelcolor::Rgb888, prelude::RgbColor};
#[allow(unused_imports)]
use micromath::F32Ext;
use micro_dsp::Bands;

use crate::{layout::LaneLayout, palette::Palette, N_LANES};

/// Per-frame decay of a bar that is no longer driven up.
pub const BAR_DECAY: f32 = 0.94;

/// Bars that jump up to a new peak and fall back slowly.
#[derive(Clone, Debug, PartialEq)]
pub struct BarsState {
    persistence: [f32; N_LANES],
}

impl Default for BarsState {
    fn default() -> Self {
        Self::new()
    }
}

impl BarsState {
    pub fn new() -> Self {
        Self {
            persistence: [0.0; N_LANES],
        }
    }

    pub fn persistence(&self) -> &[f32; N_LANES] {
        &self.persistence
    }

    pub fn update(&mut self, levels: &Bands, layout: &LaneLayout) {
        for (lane, (held, &level)) in self.persistence.iter_mut().zip(levels.iter()).enumerate() {
            let target = (level.clamp(0.0, 1.0) * layout.lane_length(lane) as f32).round();
            *held = target.max(*held * BAR_DECAY);
        }
    }

    /// Number of lit positions in `lane`.
    pub fn lit(&self, lane: usize, layout: &LaneLayout) -> usize {
        (self.persistence[lane].round() as usize).min(layout.lane_length(lane))
    }

    /// Lit positions take the palette gradient from base to tip.
    pub fn render(&self, layout: &LaneLayout, palette: &Palette, brightness: u8, pixels: &mut [Rgb888]) {
        for lane in 0..N_LANES {
            let length = layout.lane_length(lane);
            let lit = self.lit(lane, layout);
            let span = length.max(2) - 1;
            for position in 0..length {
                let Some(led) = layout.led_index(lane, position) else {
                    continue;
                };
                pixels[led] = if position < lit {
                    palette.resolve((position * 255 / span) as u8, brightness)
                } else {
                    Rgb888::BLACK
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::BARS_WARM;
    use alloc::vec;
    use micro_dsp::N_BANDS;

    fn lit_leds(pixels: &[Rgb888], layout: &LaneLayout, lane: usize) -> usize {
        (0..layout.lane_length(lane))
            .filter(|&p| pixels[layout.led_index(lane, p).unwrap()] != Rgb888::BLACK)
            .count()
    }

    #[test]
    fn test_full_band_lights_whole_lane() {
        let layout = LaneLayout::default();
        let mut bars = BarsState::new();
        let mut levels = [0.0; N_BANDS];
        levels[0] = 1.0;
        levels[5] = 1.0;
        bars.update(&levels, &layout);

        let mut pixels = vec![Rgb888::BLACK; layout.total_leds()];
        bars.render(&layout, &BARS_WARM, 255, &mut pixels);

        assert_eq!(lit_leds(&pixels, &layout, 0), 19);
        assert_eq!(lit_leds(&pixels, &layout, 5), 23);
        assert_eq!(lit_leds(&pixels, &layout, 1), 0);
    }

    #[test]
    fn test_lit_count_rounds() {
        let layout = LaneLayout::default();
        let mut bars = BarsState::new();
        let mut levels = [0.0; N_BANDS];
        levels[3] = 0.5; // 11.5 of 23
        bars.update(&levels, &layout);
        assert_eq!(bars.lit(3, &layout), 12);
    }

    #[test]
    fn test_bars_rise_instantly_and_decay_slowly() {
        let layout = LaneLayout::default();
        let mut bars = BarsState::new();
        let mut levels = [0.0; N_BANDS];
        levels[2] = 1.0;
        bars.update(&levels, &layout);
        assert_eq!(bars.persistence()[2], 23.0);

        levels[2] = 0.0;
        bars.update(&levels, &layout);
        assert_eq!(bars.persistence()[2], 23.0 * BAR_DECAY);
        bars.update(&levels, &layout);
        assert_eq!(bars.persistence()[2], 23.0 * BAR_DECAY * BAR_DECAY);
        assert_eq!(bars.lit(2, &layout), 20);

        levels[2] = 1.0;
        bars.update(&levels, &layout);
        assert_eq!(bars.lit(2, &layout), 23);
    }

    #[test]
    fn test_odd_lane_grows_from_its_base() {
        let layout = LaneLayout::default();
        let mut bars = BarsState::new();
        let mut levels = [0.0; N_BANDS];
        levels[1] = 2.0 / 23.0;
        bars.update(&levels, &layout);

        let mut pixels = vec![Rgb888::BLACK; layout.total_leds()];
        bars.render(&layout, &BARS_WARM, 255, &mut pixels);
        // Lane 1 is reversed, so its base is the last LED of its run.
        assert_ne!(pixels[19 + 22], Rgb888::BLACK);
        assert_ne!(pixels[19 + 21], Rgb888::BLACK);
        assert_eq!(pixels[19 + 20], Rgb888::BLACK);
        assert_eq!(pixels[19 + 22], BARS_WARM.resolve(0, 255));
    }
}
