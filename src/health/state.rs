//! Service health state.
//!
//! # States
//! - UNKNOWN: the service reported an undefined state
//! - RUNNING: the service is up and streaming
//! - IDLE: the service is up and not streaming
//! - UNAVAILABLE: the service could not be reached
//! - ERROR: the service reports an internal error
//!
//! # Design Decisions
//! - Ordinals match the `ServiceState` wire enumeration
//! - Default is UNAVAILABLE; UNKNOWN is reserved for reported states

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Health classification of a remote service.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthState {
    Unknown = 0,
    Running = 1,
    Idle = 2,
    #[default]
    Unavailable = 3,
    Error = 4,
}

/// Descriptor table, indexed by ordinal.
static DESCRIPTORS: [(HealthState, &str); 5] = [
    (HealthState::Unknown, "UNKNOWN"),
    (HealthState::Running, "RUNNING"),
    (HealthState::Idle, "IDLE"),
    (HealthState::Unavailable, "UNAVAILABLE"),
    (HealthState::Error, "ERROR"),
];

impl HealthState {
    /// All variants in ordinal order.
    pub const ALL: [HealthState; 5] = [
        HealthState::Unknown,
        HealthState::Running,
        HealthState::Idle,
        HealthState::Unavailable,
        HealthState::Error,
    ];

    /// Map a wire ordinal onto a health state.
    ///
    /// Ordinals outside the enumeration classify as `Unknown`.
    pub fn from_wire(ordinal: i32) -> Self {
        usize::try_from(ordinal)
            .ok()
            .and_then(|idx| DESCRIPTORS.get(idx))
            .map(|(state, _)| *state)
            .unwrap_or(HealthState::Unknown)
    }

    /// Returns the state ordinal.
    pub fn value(self) -> i32 {
        self as i32
    }

    /// Returns the state name.
    pub fn name(self) -> &'static str {
        DESCRIPTORS[self as usize].1
    }

    /// True when the service is up, streaming or not.
    pub fn is_ready(self) -> bool {
        matches!(self, HealthState::Running | HealthState::Idle)
    }
}

impl From<i32> for HealthState {
    fn from(ordinal: i32) -> Self {
        Self::from_wire(ordinal)
    }
}

impl From<HealthState> for i32 {
    fn from(state: HealthState) -> Self {
        state.value()
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HealthState: ({}, {})", self.value(), self.name())
    }
}

/// Error returned when parsing an unrecognized state name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown health state name: {0}")]
pub struct ParseHealthStateError(pub String);

impl FromStr for HealthState {
    type Err = ParseHealthStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DESCRIPTORS
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s.trim()))
            .map(|(state, _)| *state)
            .ok_or_else(|| ParseHealthStateError(s.to_string()))
    }
}
