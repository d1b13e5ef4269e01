//! Background tasks

pub mod tick;
