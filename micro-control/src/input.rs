//! Button handling on the input task side.

use micro_dsp::AudioSource;
use micro_viz::{PaletteId, VisualizationMode};

use crate::{command::Command, debounce::Debouncer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    AudioSource,
    VisualizationMode,
    Palette,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::AudioSource, Button::VisualizationMode, Button::Palette];

    fn index(self) -> usize {
        match self {
            Button::AudioSource => 0,
            Button::VisualizationMode => 1,
            Button::Palette => 2,
        }
    }
}

/// Tracks what the pipeline has been asked to show and turns button
/// releases into commands.
#[derive(Clone, Debug)]
pub struct InputController {
    source: AudioSource,
    mode: VisualizationMode,
    palette: PaletteId,
    debouncers: [Debouncer; 3],
}

impl Default for InputController {
    fn default() -> Self {
        Self::new(AudioSource::default(), VisualizationMode::default())
    }
}

impl InputController {
    pub fn new(source: AudioSource, mode: VisualizationMode) -> Self {
        Self {
            source,
            mode,
            palette: PaletteId::default(),
            debouncers: [Debouncer::default(); 3],
        }
    }

    pub fn source(&self) -> AudioSource {
        self.source
    }

    pub fn mode(&self) -> VisualizationMode {
        self.mode
    }

    pub fn palette(&self) -> PaletteId {
        self.palette
    }

    /// Feed one raw reading of `button`. Yields a command on a debounced release.
    pub fn poll(&mut self, button: Button, is_high: bool, now_ms: u64) -> Option<Command> {
        if self.debouncers[button.index()].update(is_high, now_ms) {
            Some(self.on_release(button))
        } else {
            None
        }
    }

    pub fn on_release(&mut self, button: Button) -> Command {
        match button {
            Button::AudioSource => {
                self.source = self.source.next();
                Command::SetAudioSource(self.source)
            }
            Button::VisualizationMode => {
                self.mode = self.mode.next();
                self.palette = PaletteId::default();
                Command::SetVisualizationMode(self.mode)
            }
            Button::Palette => {
                self.palette = self.palette.next(self.mode);
                Command::SetPalette(self.palette)
            }
        }
    }
}
