use microdsp::common::{apply_window_function, WindowFunctionType};

use crate::N_SAMPLES;

/// Window applied to every frame before the FFT.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WindowFunction {
    Rectangular,
    Hann,
    /// 4-term Blackman-Harris raised to the power 1/8.
    ///
    /// Keeps most of a short transient near the frame edges intact while
    /// still suppressing leakage between neighbouring bands.
    BlackmanHarrisSquarified,
}

impl Default for WindowFunction {
    fn default() -> Self {
        WindowFunction::BlackmanHarrisSquarified
    }
}

const BLACKMAN_HARRIS: [f32; 4] = [0.35875, 0.48829, 0.14128, 0.01168];

/// Precomputed window coefficients for one frame length.
pub struct Window {
    function: WindowFunction,
    coefficients: [f32; N_SAMPLES],
}

impl Window {
    pub fn new(function: WindowFunction) -> Self {
        let mut coefficients = [1.0; N_SAMPLES];
        match function {
            WindowFunction::Rectangular => {}
            WindowFunction::Hann => apply_window_function(WindowFunctionType::Hann, &mut coefficients),
            WindowFunction::BlackmanHarrisSquarified => {
                let denom = (N_SAMPLES - 1) as f32;
                for (i, c) in coefficients.iter_mut().enumerate() {
                    let phase = 2.0 * core::f32::consts::PI * i as f32 / denom;
                    let w = BLACKMAN_HARRIS[0] - BLACKMAN_HARRIS[1] * libm::cosf(phase)
                        + BLACKMAN_HARRIS[2] * libm::cosf(2.0 * phase)
                        - BLACKMAN_HARRIS[3] * libm::cosf(3.0 * phase);
                    // w^(1/8)
                    *c = libm::sqrtf(libm::sqrtf(libm::sqrtf(w.max(0.0))));
                }
            }
        }
        Self {
            function,
            coefficients,
        }
    }

    pub fn function(&self) -> WindowFunction {
        self.function
    }

    pub fn coefficients(&self) -> &[f32; N_SAMPLES] {
        &self.coefficients
    }

    pub fn apply(&self, samples: &mut [f32; N_SAMPLES]) {
        for (s, &c) in samples.iter_mut().zip(self.coefficients.iter()) {
            *s *= c;
        }
    }
}
