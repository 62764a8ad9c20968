//! Connection status and reconnect policy

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::config::StreamConfig;

/// Where the stream connection currently stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connecting,
    Connected { connection_id: String },
    Reconnecting { attempt: u32, delay_ms: u64 },
    Disconnected { reason: String },
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected { .. })
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connecting => write!(f, "connecting"),
            ConnectionStatus::Connected { connection_id } => {
                write!(f, "connected ({})", connection_id)
            }
            ConnectionStatus::Reconnecting { attempt, delay_ms } => {
                write!(f, "reconnecting (attempt {} in {}ms)", attempt, delay_ms)
            }
            ConnectionStatus::Disconnected { reason } => write!(f, "disconnected: {}", reason),
        }
    }
}

/// Exponential backoff between reconnect attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub enabled: bool,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// 0 means unlimited
    pub max_attempts: u32,
}

impl ReconnectPolicy {
    /// Connect once, never retry
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            initial_backoff_ms: 0,
            max_backoff_ms: 0,
            max_attempts: 0,
        }
    }

    /// Delay before reconnect `attempt` (0-based): `initial * 2^attempt`, capped
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let delay = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(delay)
    }

    /// Whether another attempt is allowed after `attempts` consecutive failures
    pub fn allows(&self, attempts: u32) -> bool {
        self.enabled && (self.max_attempts == 0 || attempts < self.max_attempts)
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::from(&StreamConfig::default())
    }
}

impl From<&StreamConfig> for ReconnectPolicy {
    fn from(config: &StreamConfig) -> Self {
        Self {
            enabled: config.reconnect,
            initial_backoff_ms: config.initial_backoff_ms,
            max_backoff_ms: config.max_backoff_ms,
            max_attempts: config.max_reconnect_attempts,
        }
    }
}
