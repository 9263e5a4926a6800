//! 16-stop gradient palettes and the per-mode palette sets.

use embedded_graphics::pixelcolor::Rgb888;
#[allow(unused_imports)]
use micromath::F32Ext;

use crate::engine::VisualizationMode;

pub const PALETTE_STOPS: usize = 16;

/// A gradient of 16 evenly spaced color stops addressed by an 8-bit index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    name: &'static str,
    stops: [[u8; 3]; PALETTE_STOPS],
}

impl Palette {
    pub const fn new(name: &'static str, stops: [[u8; 3]; PALETTE_STOPS]) -> Self {
        Self { name, stops }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn stop(&self, i: usize) -> Rgb888 {
        let [r, g, b] = self.stops[i.min(PALETTE_STOPS - 1)];
        Rgb888::new(r, g, b)
    }

    /// Color for `index`, interpolated linearly between the two nearest stops
    /// and scaled by `brightness / 255`.
    pub fn resolve(&self, index: u8, brightness: u8) -> Rgb888 {
        let position = index as f32 * (PALETTE_STOPS - 1) as f32 / 255.0;
        let lower = (position as usize).min(PALETTE_STOPS - 1);
        let upper = (lower + 1).min(PALETTE_STOPS - 1);
        let frac = position - lower as f32;
        let scale = brightness as f32 / 255.0;

        let a = self.stops[lower];
        let b = self.stops[upper];
        let mut out = [0u8; 3];
        for (o, (&from, &to)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
            let value = from as f32 + (to as f32 - from as f32) * frac;
            *o = (value * scale).round().clamp(0.0, 255.0) as u8;
        }
        Rgb888::new(out[0], out[1], out[2])
    }
}

/// Palettes available to `mode`, in cycle order.
pub fn palettes(mode: VisualizationMode) -> &'static [Palette] {
    match mode {
        VisualizationMode::Bars => &BARS_PALETTES,
        VisualizationMode::Spectrum => &SPECTRUM_PALETTES,
        VisualizationMode::Fire => &FIRE_PALETTES,
    }
}

pub const BARS_WARM: Palette = Palette::new(
    "warm",
    [
        [255, 200, 0], [255, 190, 0], [255, 178, 0], [255, 166, 0],
        [255, 152, 0], [255, 138, 0], [255, 124, 0], [255, 110, 0],
        [255, 96, 0], [255, 82, 0], [255, 68, 0], [255, 54, 0],
        [255, 40, 0], [255, 28, 0], [255, 14, 0], [255, 0, 0],
    ],
);

pub const BARS_GREEN: Palette = Palette::new(
    "green",
    [
        [0, 80, 0], [0, 96, 0], [0, 112, 0], [0, 128, 0],
        [0, 144, 0], [0, 160, 0], [0, 176, 0], [0, 192, 0],
        [0, 208, 0], [0, 224, 0], [0, 240, 0], [0, 255, 0],
        [48, 255, 0], [96, 255, 0], [144, 255, 0], [192, 255, 0],
    ],
);

pub const BARS_BLUE: Palette = Palette::new(
    "blue",
    [
        [0, 0, 80], [0, 0, 96], [0, 0, 112], [0, 0, 128],
        [0, 0, 144], [0, 0, 160], [0, 0, 176], [0, 0, 192],
        [0, 0, 208], [0, 0, 224], [0, 0, 240], [0, 0, 255],
        [0, 48, 255], [0, 96, 255], [0, 144, 255], [0, 192, 255],
    ],
);

pub const SPECTRUM_HEATMAP_GREEN: Palette = Palette::new(
    "heatmap green",
    [
        [0, 0, 0], [0, 16, 0], [0, 32, 0], [0, 56, 0],
        [0, 80, 0], [0, 108, 0], [0, 136, 0], [0, 168, 0],
        [0, 200, 0], [0, 232, 0], [64, 255, 0], [128, 255, 0],
        [192, 255, 0], [255, 255, 0], [255, 255, 128], [255, 255, 255],
    ],
);

pub const SPECTRUM_HEATMAP_BLUE: Palette = Palette::new(
    "heatmap blue",
    [
        [0, 0, 0], [0, 0, 16], [0, 0, 32], [0, 0, 56],
        [0, 0, 80], [0, 0, 108], [0, 0, 136], [0, 0, 168],
        [0, 0, 200], [0, 0, 232], [0, 64, 255], [0, 128, 255],
        [0, 192, 255], [0, 255, 255], [128, 255, 255], [255, 255, 255],
    ],
);

pub const SPECTRUM_MAGMA_PINK: Palette = Palette::new(
    "magma pink",
    [
        [0, 0, 0], [4, 2, 16], [16, 8, 40], [36, 12, 72],
        [60, 12, 100], [88, 16, 112], [114, 28, 116], [140, 36, 116],
        [168, 44, 112], [196, 56, 104], [222, 72, 96], [240, 100, 96],
        [250, 132, 112], [254, 168, 136], [254, 204, 170], [252, 236, 210],
    ],
);

pub const FIRE_RED: Palette = Palette::new(
    "fire red",
    [
        [0, 0, 0], [32, 0, 0], [64, 0, 0], [96, 0, 0],
        [128, 0, 0], [160, 0, 0], [192, 0, 0], [224, 0, 0],
        [255, 0, 0], [255, 32, 0], [255, 64, 0], [255, 96, 0],
        [255, 128, 0], [255, 160, 0], [255, 200, 0], [255, 255, 64],
    ],
);

pub const FIRE_BLUE: Palette = Palette::new(
    "fire blue",
    [
        [0, 0, 0], [0, 0, 32], [0, 0, 64], [0, 0, 96],
        [0, 0, 128], [0, 0, 160], [0, 0, 192], [0, 0, 224],
        [0, 0, 255], [0, 32, 255], [0, 64, 255], [0, 96, 255],
        [0, 128, 255], [0, 160, 255], [0, 200, 255], [64, 255, 255],
    ],
);

pub const FIRE_GREEN: Palette = Palette::new(
    "fire green",
    [
        [0, 0, 0], [0, 32, 0], [0, 64, 0], [0, 96, 0],
        [0, 128, 0], [0, 160, 0], [0, 192, 0], [0, 224, 0],
        [0, 255, 0], [32, 255, 0], [64, 255, 0], [96, 255, 0],
        [128, 255, 0], [160, 255, 0], [200, 255, 0], [255, 255, 64],
    ],
);

pub const BARS_PALETTES: [Palette; 3] = [BARS_WARM, BARS_GREEN, BARS_BLUE];
pub const SPECTRUM_PALETTES: [Palette; 3] = [
    SPECTRUM_HEATMAP_GREEN,
    SPECTRUM_HEATMAP_BLUE,
    SPECTRUM_MAGMA_PINK,
];
pub const FIRE_PALETTES: [Palette; 3] = [FIRE_RED, FIRE_BLUE, FIRE_GREEN];
