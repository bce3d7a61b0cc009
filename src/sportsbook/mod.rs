//! Sportsbook API integration
//!
//! Game lists and bet placement go over REST; game updates arrive as
//! `gameUpdate` pushes on the WebSocket.

pub mod client;
pub mod messages;
pub mod rest;
pub mod websocket;

pub use client::SportsbookClient;
pub use rest::{SortOrder, SportsbookRestClient};
pub use websocket::{ReconnectBackoff, SportsbookWebSocketClient};
