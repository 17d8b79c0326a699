#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod board;
mod common;
mod config;
mod game;
mod grid;
pub mod protocol;
mod remote;
mod ship;
mod targeting;

#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod transport;
#[cfg(feature = "std")]
mod ui;

pub use board::*;
pub use common::*;
pub use config::*;
pub use game::*;
pub use grid::*;
pub use protocol::{ChannelClosed, Message, PeerChannel};
pub use remote::*;
pub use ship::*;
pub use targeting::*;

#[cfg(feature = "std")]
pub use logging::init_logging;
#[cfg(feature = "std")]
pub use transport::PeerLink;
#[cfg(feature = "std")]
pub use ui::*;
