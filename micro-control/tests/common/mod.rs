#![allow(dead_code)]

use std::collections::VecDeque;
use std::vec::Vec;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use micro_control::{CaptureError, CaptureStatus, PixelSink, SampleSource};
use micro_dsp::{bin_frequency, AudioSource, SampleFrame, N_SAMPLES, SAMPLE_RATE_HZ};
use wavegen::{sine, wf};

/// Replays scripted frames and fails with `Delivery` once they run out.
///
/// `status` stands in for capture drivers dying in the background: the
/// selected input is checked on every switch and every frame.
#[derive(Default)]
pub struct ScriptedSource {
    pub frames: VecDeque<SampleFrame>,
    pub reconfigured: Vec<AudioSource>,
    pub fail_reconfigure: bool,
    pub status: CaptureStatus<NoopRawMutex>,
}

impl ScriptedSource {
    pub fn with_frames(frames: impl IntoIterator<Item = SampleFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl SampleSource for ScriptedSource {
    async fn next_frame(&mut self, frame: &mut SampleFrame) -> Result<(), CaptureError> {
        if let Some(&active) = self.reconfigured.last() {
            self.status.check(active)?;
        }
        let next = self.frames.pop_front().ok_or(CaptureError::Delivery)?;
        frame.copy_from_slice(&next);
        Ok(())
    }

    fn reconfigure(&mut self, source: AudioSource) -> Result<(), CaptureError> {
        if self.fail_reconfigure {
            return Err(CaptureError::Setup(source));
        }
        self.reconfigured.push(source);
        self.status.check(source)
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub presented: usize,
    pub last: Vec<Rgb888>,
    pub fail: bool,
}

impl PixelSink for RecordingSink {
    type Error = ();

    fn present(&mut self, pixels: &[Rgb888]) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.presented += 1;
        self.last = pixels.to_vec();
        Ok(())
    }
}

impl RecordingSink {
    pub fn lit(&self) -> usize {
        self.last.iter().filter(|&&p| p != Rgb888::BLACK).count()
    }
}

pub fn tone(bin: usize) -> SampleFrame {
    let frequency = bin_frequency(bin, SAMPLE_RATE_HZ as f32);
    let waveform = wf!(f32, SAMPLE_RATE_HZ as f32, sine!(frequency, 1_000_000.0));
    let mut frame = [0i32; N_SAMPLES];
    for (s, v) in frame.iter_mut().zip(waveform.iter()) {
        *s = v as i32;
    }
    frame
}

pub fn silence() -> SampleFrame {
    [0; N_SAMPLES]
}
