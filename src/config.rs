use serde::{Deserialize, Serialize};

use crate::decimal::Rate;

/// engine configuration
///
/// The prime reference rate is the single external benchmark shared by
/// every prime-indexed loan. It is injected by the calling layer, never
/// hardcoded inside the engine, so the same loan set can be simulated
/// against different benchmark readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub prime_reference_rate: Rate,
}

impl EngineConfig {
    pub fn new(prime_reference_rate: Rate) -> Self {
        Self {
            prime_reference_rate,
        }
    }
}
