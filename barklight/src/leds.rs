//! WS2812 output over the SPI data line.

use defmt::{info, warn};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_hal_async::spi::SpiBus;
use esp_hal::{
    spi::{master::Spi, Error as SpiError},
    Async,
};
use micro_control::PixelSink;
use micro_viz::ws2812;

use crate::config::{LED_BUFFER_SIZE, N_LEDS};

pub static PIXELS: Signal<CriticalSectionRawMutex, [Rgb888; N_LEDS]> = Signal::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct LengthMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// Hands finished frames to [`led_task`]. An unsent frame is replaced by a newer one.
pub struct SignalSink;

impl PixelSink for SignalSink {
    type Error = LengthMismatch;

    fn present(&mut self, pixels: &[Rgb888]) -> Result<(), Self::Error> {
        let frame: [Rgb888; N_LEDS] = pixels.try_into().map_err(|_| LengthMismatch {
            expected: N_LEDS,
            actual: pixels.len(),
        })?;
        PIXELS.signal(frame);
        Ok(())
    }
}

#[embassy_executor::task]
pub async fn led_task(mut spi: Spi<'static, Async>, buffer: &'static mut [u8; LED_BUFFER_SIZE]) {
    info!("Starting LED task");
    loop {
        let pixels = PIXELS.wait().await;
        let len = match ws2812::encode(&pixels, buffer) {
            Ok(len) => len,
            Err(e) => {
                warn!("LED encoding failed: {}", e);
                continue;
            }
        };
        if let Err(e) = transmit_data(&mut spi, &buffer[..len]).await {
            warn!("LED write failed: {:?}", e);
        }
    }
}

/// Write one encoded frame. The strip latches on the trailing zero bytes.
async fn transmit_data(spi: &mut Spi<'_, Async>, data: &[u8]) -> Result<(), SpiError> {
    SpiBus::write(spi, data).await?;
    SpiBus::flush(spi).await
}
