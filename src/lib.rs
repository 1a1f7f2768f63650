//! A tick-driven snake engine and the terminal front end that hosts it.
//!
//! [`session::GameSession`] holds the rules. [`clock::GameClock`] decides when
//! the next tick is due, and [`render::Renderer`] turns a
//! [`session::Snapshot`] into drawing calls. [`game::Game`] wires them to a
//! crossterm terminal.

pub mod clock;
pub mod collision;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod game;
pub mod grid;
pub mod input;
pub mod render;
pub mod score_store;
pub mod session;
