//! Complexity-adaptive call parameters.

use crate::labels::Complexity;

/// Floor for the token budget of the default (cheap) row.
pub const MIN_DEFAULT_TOKENS: u32 = 128;

/// Temperature and token budget for a reasoning call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CallParams {
    /// Derive parameters from complexity and a caller-supplied base budget.
    ///
    /// | complexity       | temperature | tokens              |
    /// |------------------|-------------|---------------------|
    /// | extremely hard   | 0.5         | 2.0 × base          |
    /// | hard             | 0.4         | 1.5 × base          |
    /// | medium           | 0.25        | 1.0 × base          |
    /// | easy, absent     | 0.0         | max(128, 0.5 × base)|
    ///
    /// # Example
    ///
    /// ```
    /// use reckon_core::{CallParams, Complexity};
    ///
    /// let params = CallParams::for_complexity(Some(Complexity::Hard), 1000);
    /// assert_eq!(params.temperature, 0.4);
    /// assert_eq!(params.max_tokens, 1500);
    /// ```
    pub fn for_complexity(complexity: Option<Complexity>, base_tokens: u32) -> Self {
        let (temperature, factor) = match complexity {
            Some(Complexity::ExtremelyHard) => (0.5, 2.0),
            Some(Complexity::Hard) => (0.4, 1.5),
            Some(Complexity::Medium) => (0.25, 1.0),
            Some(Complexity::Easy) | None => {
                return Self {
                    temperature: 0.0,
                    max_tokens: scale(base_tokens, 0.5).max(MIN_DEFAULT_TOKENS),
                };
            }
        };
        Self {
            temperature,
            max_tokens: scale(base_tokens, factor),
        }
    }
}

fn scale(base: u32, factor: f64) -> u32 {
    (base as f64 * factor).round().min(u32::MAX as f64) as u32
}
