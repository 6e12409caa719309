//! Snake on a wrapping board.
//!
//! The game rules live here and know nothing about terminals: a front end
//! feeds [`snake::Direction`]s into [`logic::GameLogic::handle_control`],
//! calls [`logic::GameLogic::tick`] once per frame and draws the
//! [`logic::Snapshot`] it gets back.

pub mod actor;
pub mod error;
pub mod logic;
pub mod render;
pub mod settings;
pub mod snake;
pub mod store;
pub mod swipe;
