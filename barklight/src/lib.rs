#![no_std]

//! ESP32-S3 glue: I2S capture, button polling and WS2812 output around the
//! `micro-control` pipeline.

pub mod capture;
pub mod config;
pub mod input;
pub mod leds;
