use tracing::debug;
use crate::config::TravelPolicySettings;
use crate::errors::{DoorSensorError, DoorSensorResult};

/// Answers where the passenger wants to travel to
pub trait LevelResolver: Send + Sync {
    /// Computes the destination level from the panic flag. Deterministic for a given flag and policy.
    fn resolve(&self, in_panic_mode: bool) -> DoorSensorResult<i32>;
}

/// Resolves destination levels from the configured travel policy
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyLevelResolver {
    normal_level: Option<i32>,
    panic_level: Option<i32>,
    panic_mode_enabled: bool,
}

impl PolicyLevelResolver {
    /// Creates a resolver.
    ///
    /// # Arguments
    ///
    /// * `normal_level` - The destination while no black hole has been detected
    /// * `panic_level` - The destination once a black hole has been detected
    /// * `panic_mode_enabled` - When `false`, the panic flag is disregarded and the normal level is used
    pub fn new(normal_level: Option<i32>, panic_level: Option<i32>, panic_mode_enabled: bool) -> Self {
        Self { normal_level, panic_level, panic_mode_enabled }
    }

    pub fn from_settings(settings: &TravelPolicySettings) -> Self {
        Self::new(settings.normal_level, settings.panic_level, settings.panic_mode_enabled)
    }
}

impl LevelResolver for PolicyLevelResolver {
    fn resolve(&self, in_panic_mode: bool) -> DoorSensorResult<i32> {
        let use_panic_level = in_panic_mode && self.panic_mode_enabled;
        let (level, name) = if use_panic_level {
            (self.panic_level, "panic")
        } else {
            (self.normal_level, "normal")
        };
        debug!("Resolving {} level (in panic mode: {})", name, in_panic_mode);
        level.ok_or_else(|| DoorSensorError::ResolutionError(format!("no {} level configured", name)))
    }
}
