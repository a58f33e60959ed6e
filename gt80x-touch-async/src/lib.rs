//! An asynchronous, `no_std` driver for the Goodix GT80x multi-touch controller.
//!
//! This driver provides a [`Gt80x`] device that brings the controller up over
//! I2C, services its interrupt line and reports up to five tracked contacts to
//! a [`TouchSink`].
//!
//! # Usage
//!
//! To use this driver, you need an I2C peripheral implementation that satisfies the
//! `embedded-hal-async::i2c::I2c` trait, two output pins for the power and shutdown
//! lines, an input pin implementing `embedded-hal-async::digital::Wait` for the
//! interrupt line, and an async delay.
//!
//! The interrupt pin is watched by one task, which only forwards edges to a
//! [`Dispatcher`]. A second task owns the device and does all the bus work.
//!
//! ```ignore
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use embassy_sync::channel::Channel;
//! use gt80x_touch_async::{
//!     watch_edges, ChannelSink, Config, Dispatcher, Gt80x, I2cTransport, InputReport, PinBoard,
//! };
//!
//! static TOUCH: Dispatcher<CriticalSectionRawMutex> = Dispatcher::new();
//! static REPORTS: Channel<CriticalSectionRawMutex, InputReport, 16> = Channel::new();
//!
//! #[embassy_executor::task]
//! async fn touch_irq(mut irq: Input<'static>) {
//!     let _ = watch_edges(&mut irq, &TOUCH).await;
//! }
//!
//! #[embassy_executor::task]
//! async fn touch(i2c: I2c<'static, Async>, pwr: Output<'static>, shdn: Output<'static>) {
//!     let config = Config::default().with_swap_xy(true);
//!     let bus = I2cTransport::new(i2c, config.address);
//!     let board = PinBoard::new(pwr, shdn);
//!     match Gt80x::probe(bus, board, embassy_time::Delay, ChannelSink::new(&REPORTS), config).await {
//!         Ok(mut device) => device.run(&TOUCH).await,
//!         Err(err) => log::error!("Touch controller not available: {err}"),
//!     }
//! }
//! ```
//!
//! Suspend and resume are requested through [`Dispatcher::request_suspend`]
//! and [`Dispatcher::request_resume`]; the device task handles them between
//! two service cycles.

#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod bringup;
pub mod config;
pub mod decode;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod regmap;
pub mod tracker;
pub mod transport;

#[cfg(test)]
mod testing;

pub use board::{Board, PinBoard};
pub use config::{Config, Orientation};
pub use device::Gt80x;
pub use dispatch::{watch_edges, DispatchState, Dispatcher, PowerRequest};
pub use error::{BringupError, BusError, DecodeError, ServiceError};
pub use event::{ChannelSink, InputReport, Phase, TouchEvent, TouchSink};
pub use tracker::ContactState;
pub use transport::{I2cTransport, RegisterBus};
