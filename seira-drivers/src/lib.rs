//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in seira-core for the display hardware:
//!
//! - MAX7219 cascaded LED driver chain over SPI

#![no_std]
#![deny(unsafe_code)]

pub mod max7219;
