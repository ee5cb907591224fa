//! LetrasGo - a literacy game
//!
//! Players drag syllables into a target zone to build a word, or words to
//! build a sentence. Solving a chapter earns points and unlocks the next one.
//!
//! ## Layout
//!
//! - [`puzzle`]: client-side matcher, puzzle session and screen flow
//! - [`unlock`]: server-side score and chapter unlock transition
//! - [`store`]: SQLite persistence for accounts, sessions and puzzle content
//! - [`http_server`]: JSON API and static files for the browser client
//! - [`client`]: blocking API client used by the terminal player

pub mod client;
pub mod config;
pub mod domain;
pub mod http_server;
pub mod puzzle;
pub mod store;
pub mod unlock;

pub use domain::*;
