use embassy_time::Duration;

// --- Audio Config ---
pub const SAMPLE_RATE_HZ: u32 = micro_dsp::SAMPLE_RATE_HZ;
pub const DMA_BUFFER_SIZE: usize = 4096 * 3;
pub const DMA_CHUNK_SIZE: usize = 4096;

// --- LED Config ---
pub const N_LEDS: usize = 364; // 16 lanes, first lane shortened by the dead pixels
pub const LED_BRIGHTNESS: u8 = 96; // Keeps current draw within a USB supply
pub const LED_BUFFER_SIZE: usize = micro_viz::ws2812::buffer_len(N_LEDS);

// --- Input Config ---
pub const BUTTON_POLL_INTERVAL: Duration = Duration::from_millis(5);
pub const COMMAND_ENQUEUE_TIMEOUT: Duration = Duration::from_millis(200);

// --- System Config ---
pub const HEAP_SIZE: usize = 32 * 1024;
