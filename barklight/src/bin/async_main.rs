#![no_std]
#![no_main]

use core::{convert::Infallible, mem::MaybeUninit};

use defmt::{error, info};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_time::Timer;
use esp_backtrace as _;
use esp_hal::{
    dma_buffers,
    gpio::{Input, InputConfig, Pull},
    i2s::master::{DataFormat, I2s, Standard},
    spi::{
        master::{Config as SpiConfig, Spi},
        Mode,
    },
    time::Rate,
    timer::timg::TimerGroup,
};
use micro_control::{InputController, Pipeline, PipelineSettings};
use micro_dsp::AudioSource;
use micro_viz::{ws2812::WS2812_SPI_HZ, VisualizationConfig};

use barklight::{
    capture::{capture_task, SignalSource},
    config::{DMA_BUFFER_SIZE, HEAP_SIZE, LED_BRIGHTNESS, LED_BUFFER_SIZE, SAMPLE_RATE_HZ},
    input::{input_task, Buttons, Commands},
    leds::{led_task, SignalSink},
};

type Controller = Pipeline<SignalSource, SignalSink>;

static COMMANDS: Commands = Commands::new();

/// Macro to create static variables
macro_rules! mk_static {
    ($t:ty,$val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write(($val));
        x
    }};
}

fn init_heap() {
    static mut HEAP: MaybeUninit<[u8; HEAP_SIZE]> = MaybeUninit::uninit();

    unsafe {
        esp_alloc::HEAP.add_region(esp_alloc::HeapRegion::new(
            core::ptr::addr_of_mut!(HEAP) as *mut u8,
            HEAP_SIZE,
            esp_alloc::MemoryCapability::Internal.into(),
        ));
    }
}

/// Park the calling task for good after a fatal error.
async fn halt() -> ! {
    loop {
        Timer::after_secs(60).await;
    }
}

#[embassy_executor::task]
async fn pipeline_task(pipeline: &'static mut Controller) {
    info!("Starting pipeline task");
    let result: Result<Infallible, _> = pipeline.run(&COMMANDS).await;
    if let Err(e) = result {
        error!("pipeline halted: {}", e);
    }
    halt().await
}

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    info!("Init!");

    init_heap();

    let peripherals = esp_hal::init(esp_hal::Config::default());

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);

    // Microphone (INMP441): I2S0, BCLK 4, WS 5, DIN 6.
    let (mic_buffer, mic_rx_descriptors, _, mic_tx_descriptors) = dma_buffers!(DMA_BUFFER_SIZE, 0);
    let microphone = I2s::new(
        peripherals.I2S0,
        Standard::Philips,
        DataFormat::Data32Channel32,
        Rate::from_hz(SAMPLE_RATE_HZ),
        peripherals.DMA_CH0,
        mic_rx_descriptors,
        mic_tx_descriptors,
    )
    .into_async();
    let microphone = microphone
        .i2s_rx
        .with_bclk(peripherals.GPIO4)
        .with_ws(peripherals.GPIO5)
        .with_din(peripherals.GPIO6)
        .build();

    // Line-in ADC (PCM1808): I2S1 with MCLK on 15, BCLK 16, WS 17, DIN 18.
    let (line_buffer, line_rx_descriptors, _, line_tx_descriptors) = dma_buffers!(DMA_BUFFER_SIZE, 0);
    let line_in = I2s::new(
        peripherals.I2S1,
        Standard::Philips,
        DataFormat::Data32Channel32,
        Rate::from_hz(SAMPLE_RATE_HZ),
        peripherals.DMA_CH1,
        line_rx_descriptors,
        line_tx_descriptors,
    )
    .with_mclk(peripherals.GPIO15)
    .into_async();
    let line_in = line_in
        .i2s_rx
        .with_bclk(peripherals.GPIO16)
        .with_ws(peripherals.GPIO17)
        .with_din(peripherals.GPIO18)
        .build();

    // WS2812 data on GPIO 38, driven by SPI2 MOSI.
    let spi = match Spi::new(
        peripherals.SPI2,
        SpiConfig::default()
            .with_frequency(Rate::from_hz(WS2812_SPI_HZ))
            .with_mode(Mode::_0),
    ) {
        Ok(spi) => spi.with_mosi(peripherals.GPIO38).into_async(),
        Err(e) => {
            error!("SPI config rejected: {:?}", e);
            halt().await
        }
    };

    // Buttons pull to ground when pressed.
    let config_in = InputConfig::default().with_pull(Pull::Up);
    let buttons = Buttons {
        pins: [
            Input::new(peripherals.GPIO1, config_in),
            Input::new(peripherals.GPIO2, config_in),
            Input::new(peripherals.GPIO3, config_in),
        ],
    };

    let settings = PipelineSettings {
        visualization: VisualizationConfig {
            brightness: LED_BRIGHTNESS,
            ..VisualizationConfig::default()
        },
        ..PipelineSettings::default()
    };
    let controller = InputController::new(settings.source, settings.mode);
    let pipeline = match Pipeline::new(settings, SignalSource::new(), SignalSink) {
        Ok(pipeline) => mk_static!(Controller, pipeline),
        Err(e) => {
            error!("pipeline setup failed: {}", e);
            halt().await
        }
    };

    let led_buffer = mk_static!([u8; LED_BUFFER_SIZE], [0u8; LED_BUFFER_SIZE]);

    spawner.must_spawn(capture_task(AudioSource::Microphone, microphone, mic_buffer));
    spawner.must_spawn(capture_task(AudioSource::LineIn, line_in, line_buffer));
    spawner.must_spawn(led_task(spi, led_buffer));
    spawner.must_spawn(input_task(buttons, controller, &COMMANDS));
    spawner.must_spawn(pipeline_task(pipeline));
}
