use defmt::{info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{with_timeout, Instant, Ticker};
use esp_hal::gpio::Input;
use micro_control::{Button, CommandQueue, InputController};

use crate::config::{BUTTON_POLL_INTERVAL, COMMAND_ENQUEUE_TIMEOUT};

pub type Commands = CommandQueue<CriticalSectionRawMutex>;

/// Buttons in [`Button::ALL`] order: source, mode, palette.
pub struct Buttons {
    pub pins: [Input<'static>; 3],
}

#[embassy_executor::task]
pub async fn input_task(buttons: Buttons, mut controller: InputController, commands: &'static Commands) {
    info!("Starting input task");
    let mut ticker = Ticker::every(BUTTON_POLL_INTERVAL);
    loop {
        let now_ms = Instant::now().as_millis();
        for (&button, pin) in Button::ALL.iter().zip(buttons.pins.iter()) {
            let Some(command) = controller.poll(button, pin.is_high(), now_ms) else {
                continue;
            };
            info!("{} released: {}", button, command);
            if with_timeout(COMMAND_ENQUEUE_TIMEOUT, commands.enqueue(command))
                .await
                .is_err()
            {
                warn!("command queue full, dropped {}", command);
            }
        }
        ticker.next().await;
    }
}
