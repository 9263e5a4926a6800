//! Physical lane layout of the LED matrix.
//!
//! Every band owns one lane. The strip is wired back and forth, so even lanes
//! run forward along the strip and odd lanes run in reverse. Position 0 is
//! always the base of the lane, whatever its wiring direction.

use crate::{error::VizError, N_LANES};

pub const DEFAULT_LANE_LENGTH: usize = 23;
/// LEDs at the start of the strip that are physically dead.
pub const DEAD_PIXELS: usize = 4;

/// Lane lengths plus the strip offsets derived from them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaneLayout {
    /// Usable LEDs per lane. A zero-length lane is skipped entirely.
    lengths: [usize; N_LANES],
    /// Strip index of the first LED of each lane, in wiring order.
    offsets: [usize; N_LANES],
    /// Longest lane length.
    depth: usize,
    /// Sum of all lane lengths, i.e. the strip length.
    total: usize,
}

impl Default for LaneLayout {
    fn default() -> Self {
        let mut lengths = [DEFAULT_LANE_LENGTH; N_LANES];
        lengths[0] -= DEAD_PIXELS;
        Self::from_lengths(lengths)
    }
}

impl LaneLayout {
    /// Build a layout from per-lane lengths.
    ///
    /// # Arguments
    ///
    /// * `lengths` - Usable LEDs of each lane, lane 0 first.
    ///
    /// Fails with [`VizError::EmptyLayout`] when every lane is empty.
    pub fn new(lengths: [usize; N_LANES]) -> Result<Self, VizError> {
        if lengths.iter().all(|&l| l == 0) {
            return Err(VizError::EmptyLayout);
        }
        Ok(Self::from_lengths(lengths))
    }

    /// Every lane `length` LEDs long.
    pub fn uniform(length: usize) -> Result<Self, VizError> {
        Self::new([length; N_LANES])
    }

    fn from_lengths(lengths: [usize; N_LANES]) -> Self {
        let mut offsets = [0; N_LANES];
        let mut total = 0;
        for (offset, &length) in offsets.iter_mut().zip(lengths.iter()) {
            *offset = total;
            total += length;
        }
        let depth = lengths.iter().copied().max().unwrap_or(0);
        Self {
            lengths,
            offsets,
            depth,
            total,
        }
    }

    /// Usable LEDs of every lane, in lane order.
    pub fn lengths(&self) -> &[usize; N_LANES] {
        &self.lengths
    }

    pub fn lane_length(&self, lane: usize) -> usize {
        self.lengths[lane]
    }

    /// Longest lane. Mode buffers are `N_LANES × depth` grids.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn total_leds(&self) -> usize {
        self.total
    }

    /// Strip index of `position` within `lane`, or `None` past the lane end.
    pub fn led_index(&self, lane: usize, position: usize) -> Option<usize> {
        let length = *self.lengths.get(lane)?;
        if position >= length {
            return None;
        }
        let offset = self.offsets[lane];
        if lane % 2 == 0 {
            Some(offset + position)
        } else {
            Some(offset + length - 1 - position)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_default_layout_has_short_first_lane() {
        let layout = LaneLayout::default();
        assert_eq!(layout.lane_length(0), 19);
        assert_eq!(layout.lane_length(1), 23);
        assert_eq!(layout.depth(), 23);
        assert_eq!(layout.total_leds(), 364);
    }

    #[test]
    fn test_serpentine_alternates_direction() {
        let layout = LaneLayout::default();
        assert_eq!(layout.led_index(0, 0), Some(0));
        assert_eq!(layout.led_index(0, 18), Some(18));
        assert_eq!(layout.led_index(0, 19), None);
        // Lane 1 starts at 19 and runs backwards.
        assert_eq!(layout.led_index(1, 0), Some(19 + 22));
        assert_eq!(layout.led_index(1, 22), Some(19));
        assert_eq!(layout.led_index(2, 0), Some(19 + 23));
        assert_eq!(layout.led_index(N_LANES, 0), None);
    }

    #[test]
    fn test_mapping_covers_every_led_once() {
        let mut lengths = [5; N_LANES];
        lengths[3] = 2;
        lengths[8] = 0;
        let layout = LaneLayout::new(lengths).unwrap();

        let mut seen = vec![false; layout.total_leds()];
        for lane in 0..N_LANES {
            for position in 0..layout.lane_length(lane) {
                let i = layout.led_index(lane, position).unwrap();
                assert!(!seen[i], "led {} mapped twice", i);
                seen[i] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
        // Lane 9 follows the empty lane 8 and is still reversed.
        assert_eq!(layout.led_index(9, 0), layout.led_index(9, 4).map(|i| i + 4));
    }

    #[test]
    fn test_empty_layout_is_rejected() {
        assert_eq!(LaneLayout::uniform(0), Err(VizError::EmptyLayout));
    }
}
