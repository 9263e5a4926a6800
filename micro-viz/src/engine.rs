use alloc::{vec, vec::Vec};
use embedded_graphics::{pixelcolor::Rgb888, prelude::RgbColor};
use micro_dsp::Bands;

#[cfg(feature = "logging")]
use defmt::info;

use crate::{
    bars::BarsState,
    error::VizError,
    fire::FireState,
    layout::LaneLayout,
    palette::{palettes, Palette},
    spectrum::SpectrumState,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VisualizationMode {
    #[default]
    Bars,
    Spectrum,
    Fire,
}

impl VisualizationMode {
    pub const ALL: [VisualizationMode; 3] = [
        VisualizationMode::Bars,
        VisualizationMode::Spectrum,
        VisualizationMode::Fire,
    ];

    pub fn next(self) -> Self {
        match self {
            VisualizationMode::Bars => VisualizationMode::Spectrum,
            VisualizationMode::Spectrum => VisualizationMode::Fire,
            VisualizationMode::Fire => VisualizationMode::Bars,
        }
    }

    pub fn palette_count(self) -> u8 {
        palettes(self).len() as u8
    }
}

/// Index into the palette set of the active mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PaletteId(pub u8);

impl PaletteId {
    /// Next palette of `mode`, wrapping around.
    pub fn next(self, mode: VisualizationMode) -> Self {
        PaletteId(self.0.wrapping_add(1) % mode.palette_count())
    }
}

/// Mode tag plus the buffers private to that mode.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum VisualizationState {
    #[default]
    Inactive,
    Bars(BarsState),
    Spectrum(SpectrumState),
    Fire(FireState),
}

impl VisualizationState {
    fn fresh(mode: VisualizationMode, layout: &LaneLayout) -> Self {
        match mode {
            VisualizationMode::Bars => VisualizationState::Bars(BarsState::new()),
            VisualizationMode::Spectrum => VisualizationState::Spectrum(SpectrumState::new(layout)),
            VisualizationMode::Fire => VisualizationState::Fire(FireState::new(layout)),
        }
    }

    pub fn mode(&self) -> Option<VisualizationMode> {
        match self {
            VisualizationState::Inactive => None,
            VisualizationState::Bars(_) => Some(VisualizationMode::Bars),
            VisualizationState::Spectrum(_) => Some(VisualizationMode::Spectrum),
            VisualizationState::Fire(_) => Some(VisualizationMode::Fire),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisualizationConfig {
    pub layout: LaneLayout,
    /// Global brightness applied on top of every palette lookup.
    pub brightness: u8,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            layout: LaneLayout::default(),
            brightness: 255,
        }
    }
}

/// Owns the pixel buffer and the active mode.
pub struct VisualizationEngine {
    config: VisualizationConfig,
    state: VisualizationState,
    palette: PaletteId,
    pixels: Vec<Rgb888>,
}

impl VisualizationEngine {
    pub fn new(config: VisualizationConfig) -> Self {
        let pixels = vec![Rgb888::BLACK; config.layout.total_leds()];
        Self {
            config,
            state: VisualizationState::Inactive,
            palette: PaletteId::default(),
            pixels,
        }
    }

    pub fn layout(&self) -> &LaneLayout {
        &self.config.layout
    }

    pub fn state(&self) -> &VisualizationState {
        &self.state
    }

    pub fn mode(&self) -> Option<VisualizationMode> {
        self.state.mode()
    }

    pub fn palette(&self) -> PaletteId {
        self.palette
    }

    pub fn pixels(&self) -> &[Rgb888] {
        &self.pixels
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.config.brightness = brightness;
    }

    /// Start `mode` with zeroed buffers and its first palette.
    pub fn activate(&mut self, mode: VisualizationMode) -> Result<(), VizError> {
        if let Some(active) = self.state.mode() {
            return Err(VizError::AlreadyActive(active));
        }
        self.state = VisualizationState::fresh(mode, &self.config.layout);
        self.palette = PaletteId::default();
        #[cfg(feature = "logging")]
        info!("visualization {} active", mode);
        Ok(())
    }

    pub fn deactivate(&mut self) {
        self.state = VisualizationState::Inactive;
        self.palette = PaletteId::default();
        self.pixels.fill(Rgb888::BLACK);
    }

    pub fn switch_mode(&mut self, mode: VisualizationMode) -> Result<(), VizError> {
        self.deactivate();
        self.activate(mode)
    }

    pub fn set_palette(&mut self, palette: PaletteId) -> Result<(), VizError> {
        let mode = self.state.mode().ok_or(VizError::Inactive)?;
        if palette.0 >= mode.palette_count() {
            return Err(VizError::InvalidPalette {
                mode,
                palette: palette.0,
            });
        }
        self.palette = palette;
        Ok(())
    }

    fn active_palette(&self) -> Option<&'static Palette> {
        let mode = self.state.mode()?;
        palettes(mode).get(self.palette.0 as usize)
    }

    /// Advance the active mode by one frame and redraw the pixel buffer.
    pub fn render(&mut self, levels: &Bands) -> &[Rgb888] {
        let Some(palette) = self.active_palette() else {
            self.pixels.fill(Rgb888::BLACK);
            return &self.pixels;
        };
        let layout = &self.config.layout;
        let brightness = self.config.brightness;
        match &mut self.state {
            VisualizationState::Inactive => self.pixels.fill(Rgb888::BLACK),
            VisualizationState::Bars(bars) => {
                bars.update(levels, layout);
                bars.render(layout, palette, brightness, &mut self.pixels);
            }
            VisualizationState::Spectrum(spectrum) => {
                spectrum.update(levels, layout);
                spectrum.render(layout, palette, brightness, &mut self.pixels);
            }
            VisualizationState::Fire(fire) => {
                fire.update(levels, layout);
                fire.render(layout, palette, brightness, &mut self.pixels);
            }
        }
        &self.pixels
    }
}
