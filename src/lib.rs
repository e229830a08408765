//! Core library for the `watchline` binary.
//!
//! Watched coverage of a video is a normalized set of intervals
//! ([`intervals`]) kept per video id in a [`store`]. Clients turn playback
//! into interval submissions with [`session`] and exchange them with the
//! server over [`sync`].
pub mod args;
pub mod config;
pub mod error;
pub mod intervals;
pub mod session;
pub mod shutdown;
pub mod shutdown_handlers;
pub mod store;
pub mod sync;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
