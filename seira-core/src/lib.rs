//! Board-agnostic core logic for the Seira LED matrix display
//!
//! This crate contains all display logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (transport, glyph source)
//! - Frame buffer and rotation transform
//! - Text layout (alignment math, glyph placement)
//! - Scroll/oscillation state machine
//! - Display facade tying the pieces together
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod display;
pub mod font;
pub mod frame;
pub mod layout;
pub mod scroll;
pub mod traits;
