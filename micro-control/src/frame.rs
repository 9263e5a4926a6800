//! Assembly of mono sample frames from raw 32-bit stereo I2S data.

use micro_dsp::{SampleFrame, N_SAMPLES};

/// Two 32-bit little-endian slots, left then right.
pub const BYTES_PER_STEREO_SAMPLE: usize = 8;
/// 32-bit I2S slots carry 20 useful bits.
pub const SAMPLE_SHIFT: u32 = 12;

/// Convert one stereo slot pair into a mono sample: both channels scaled
/// down by [`SAMPLE_SHIFT`] and summed.
pub fn stereo_to_mono(slot: &[u8; BYTES_PER_STEREO_SAMPLE]) -> i32 {
    let left = i32::from_le_bytes([slot[0], slot[1], slot[2], slot[3]]) >> SAMPLE_SHIFT;
    let right = i32::from_le_bytes([slot[4], slot[5], slot[6], slot[7]]) >> SAMPLE_SHIFT;
    left + right
}

/// Collects DMA chunks of any length into whole frames.
///
/// A stereo sample split across two chunks is carried over, so the
/// left/right pairing never drifts.
pub struct StereoFrameAssembler {
    frame: SampleFrame,
    filled: usize,
    pending: [u8; BYTES_PER_STEREO_SAMPLE],
    pending_len: usize,
}

impl Default for StereoFrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl StereoFrameAssembler {
    pub const fn new() -> Self {
        Self {
            frame: [0; N_SAMPLES],
            filled: 0,
            pending: [0; BYTES_PER_STEREO_SAMPLE],
            pending_len: 0,
        }
    }

    /// Samples collected towards the current frame.
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Drop the partially collected frame. Byte alignment is kept.
    pub fn restart_frame(&mut self) {
        self.filled = 0;
    }

    /// Feed raw bytes, calling `on_frame` for every frame completed.
    pub fn extend(&mut self, mut bytes: &[u8], mut on_frame: impl FnMut(&SampleFrame)) {
        if self.pending_len > 0 {
            let take = (BYTES_PER_STEREO_SAMPLE - self.pending_len).min(bytes.len());
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&bytes[..take]);
            self.pending_len += take;
            bytes = &bytes[take..];
            if self.pending_len < BYTES_PER_STEREO_SAMPLE {
                return;
            }
            self.pending_len = 0;
            let slot = self.pending;
            self.push(stereo_to_mono(&slot), &mut on_frame);
        }

        let mut slots = bytes.chunks_exact(BYTES_PER_STEREO_SAMPLE);
        for slot in &mut slots {
            let mut pair = [0u8; BYTES_PER_STEREO_SAMPLE];
            pair.copy_from_slice(slot);
            self.push(stereo_to_mono(&pair), &mut on_frame);
        }
        let rest = slots.remainder();
        self.pending[..rest.len()].copy_from_slice(rest);
        self.pending_len = rest.len();
    }

    fn push(&mut self, sample: i32, on_frame: &mut impl FnMut(&SampleFrame)) {
        self.frame[self.filled] = sample;
        self.filled += 1;
        if self.filled == N_SAMPLES {
            self.filled = 0;
            on_frame(&self.frame);
        }
    }
}
