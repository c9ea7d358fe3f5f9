//! Session configuration.
use std::env;

use gameplay_core::{CharacterVariant, GameplayConfig, ValidationPolicy};

use crate::error::{Result, RuntimeError};

/// Session-level settings on top of the gameplay rules.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub gameplay: GameplayConfig,
    /// Fixed simulation steps per second.
    pub tick_rate: f32,
    /// Events kept per topic for polling.
    pub event_history: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            gameplay: GameplayConfig::default(),
            tick_rate: 60.0,
            event_history: 256,
        }
    }
}

impl RuntimeConfig {
    pub fn new(gameplay: GameplayConfig) -> Self {
        Self {
            gameplay,
            ..Self::default()
        }
    }

    /// Overrides fields from environment variables.
    ///
    /// Environment variables:
    /// - `SIM_TICK_RATE` - Simulation steps per second (default: 60)
    /// - `SIM_VALIDATION` - `strict` or `accept_all`
    /// - `SIM_VARIANT` - `third_person` or `top_down`
    pub fn from_env(mut self) -> Self {
        if let Some(rate) = read_env::<f32>("SIM_TICK_RATE") {
            self.tick_rate = rate;
        }
        if let Some(policy) = read_env::<ValidationPolicy>("SIM_VALIDATION") {
            self.gameplay.validation = policy;
        }
        if let Some(variant) = read_env::<CharacterVariant>("SIM_VARIANT") {
            self.gameplay.variant = variant;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.tick_rate) {
            return Err(RuntimeError::InvalidTickRate(self.tick_rate));
        }
        self.gameplay.validate()?;
        Ok(())
    }

    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
