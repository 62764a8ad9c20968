//! State Management
//!
//! Global application state and WebSocket connection management.

pub mod global;
pub mod websocket;
