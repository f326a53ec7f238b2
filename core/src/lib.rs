#![no_std]

pub mod activities;
pub mod application;
pub mod battery;
pub mod clock;
pub mod config;
pub mod display;
pub mod framebuffer;
pub mod input;
pub mod menu;
pub mod widgets;

extern crate alloc;
