//! Desktop preview of the visualizations.
//!
//! A synthetic sweep plus kick drum runs through the real band extractor and
//! gain controller, and the engine output is drawn lane by lane.
//! `M` switches mode, `P` switches palette, `Space` toggles the kick.

use std::{error::Error, thread, time::Duration};

use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};
use embedded_graphics_simulator::{
    sdl2::Keycode, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};
use micro_dsp::{
    BandExtractor, ExtractorConfig, GainConfig, GainController, SampleFrame, N_SAMPLES,
    SAMPLE_RATE_HZ,
};
use micro_viz::{VisualizationConfig, VisualizationEngine, VisualizationMode, N_LANES};

// One LED is drawn as a CELL x CELL square.
pub const CELL: u32 = 12;
pub const FRAME_DELAY_MS: u64 = 23; // One frame of audio at 44.1 kHz

const SWEEP_LOW_HZ: f32 = 60.0;
const SWEEP_HIGH_HZ: f32 = 16_000.0;
const SWEEP_FRAMES: f32 = 400.0;
const KICK_PERIOD: u32 = 22;

/// Synthetic input: an exponential sine sweep with an optional decaying kick.
struct Synth {
    frame: u32,
    phase: f32,
    kick: bool,
}

impl Synth {
    fn new() -> Self {
        Self {
            frame: 0,
            phase: 0.0,
            kick: true,
        }
    }

    fn next_frame(&mut self, out: &mut SampleFrame) {
        let position = (self.frame as f32 % SWEEP_FRAMES) / SWEEP_FRAMES;
        let frequency = SWEEP_LOW_HZ * (SWEEP_HIGH_HZ / SWEEP_LOW_HZ).powf(position);
        let step = 2.0 * core::f32::consts::PI * frequency / SAMPLE_RATE_HZ as f32;
        let kick_age = self.frame % KICK_PERIOD;

        for (i, sample) in out.iter_mut().enumerate() {
            let mut value = self.phase.sin() * 400_000.0;
            self.phase = (self.phase + step) % (2.0 * core::f32::consts::PI);

            if self.kick && kick_age < 3 {
                let t = (kick_age as usize * N_SAMPLES + i) as f32 / SAMPLE_RATE_HZ as f32;
                let envelope = (-t * 40.0).exp();
                value += (2.0 * core::f32::consts::PI * 55.0 * t).sin() * envelope * 2_000_000.0;
            }
            *sample = value as i32;
        }
        self.frame = self.frame.wrapping_add(1);
    }
}

fn draw(
    engine: &VisualizationEngine,
    display: &mut SimulatorDisplay<Rgb888>,
) -> Result<(), Box<dyn Error>> {
    let layout = engine.layout();
    let pixels = engine.pixels();
    let depth = layout.depth() as i32;
    for lane in 0..N_LANES {
        for position in 0..layout.lane_length(lane) {
            let Some(index) = layout.led_index(lane, position) else {
                continue;
            };
            let top_left = Point::new(
                lane as i32 * CELL as i32,
                (depth - 1 - position as i32) * CELL as i32,
            );
            Rectangle::new(top_left, Size::new(CELL - 1, CELL - 1))
                .into_styled(PrimitiveStyle::with_fill(pixels[index]))
                .draw(display)?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut extractor = BandExtractor::new(ExtractorConfig::default())?;
    let mut gain = GainController::new(GainConfig::default())?;
    let mut engine = VisualizationEngine::new(VisualizationConfig::default());
    engine.activate(VisualizationMode::default())?;

    let size = Size::new(
        N_LANES as u32 * CELL,
        engine.layout().depth() as u32 * CELL,
    );
    let mut display: SimulatorDisplay<Rgb888> = SimulatorDisplay::new(size);
    let mut window = Window::new(
        "MicroViz Simulator",
        &OutputSettingsBuilder::new().scale(1).build(),
    );

    let mut synth = Synth::new();
    let mut frame = [0; N_SAMPLES];

    'running: loop {
        synth.next_frame(&mut frame);
        let bands = extractor.process(&frame);
        let levels = gain.process(&bands);
        engine.render(&levels);

        display.clear(Rgb888::BLACK)?;
        draw(&engine, &mut display)?;
        window.update(&display);

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::M => {
                        if let Some(mode) = engine.mode() {
                            engine.switch_mode(mode.next())?;
                            println!("mode: {:?}", mode.next());
                        }
                    }
                    Keycode::P => {
                        if let Some(mode) = engine.mode() {
                            let palette = engine.palette().next(mode);
                            engine.set_palette(palette)?;
                            println!("palette: {}", palette.0);
                        }
                    }
                    Keycode::Space => synth.kick = !synth.kick,
                    _ => {}
                },
                _ => {}
            }
        }

        thread::sleep(Duration::from_millis(FRAME_DELAY_MS));
    }

    Ok(())
}
