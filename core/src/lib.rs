#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod app;
pub mod application;
pub mod config;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod fs;
pub mod input;
pub mod keyboard;
pub mod text;
pub mod ui;

#[cfg(test)]
mod testing;

pub use application::Application;
pub use config::Config;
