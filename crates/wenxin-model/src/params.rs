use serde::{Deserialize, Serialize};

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.8;
/// Default nucleus sampling threshold.
pub const DEFAULT_TOP_P: f64 = 0.8;
/// Default repetition penalty.
pub const DEFAULT_PENALTY_SCORE: f64 = 1.0;
/// Default output length of single-shot requests.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;
/// Default output length of streaming requests.
pub const DEFAULT_STREAM_MAX_OUTPUT_TOKENS: u32 = 2048;

/// Names one of the sampling parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// `temperature`, accepted range `(0, 1.0]`.
    Temperature,
    /// `top_p`, accepted range `[0, 1.0]`.
    TopP,
    /// `penalty_score`, accepted range `[1.0, 2.0]`.
    PenaltyScore,
    /// `max_output_tokens`, accepted range `[2, 2048]`.
    MaxOutputTokens,
}

impl Parameter {
    /// Returns the wire name of the parameter.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Parameter::Temperature => "temperature",
            Parameter::TopP => "top_p",
            Parameter::PenaltyScore => "penalty_score",
            Parameter::MaxOutputTokens => "max_output_tokens",
        }
    }

    /// Returns the accepted range in interval notation.
    #[inline]
    pub fn range(&self) -> &'static str {
        match self {
            Parameter::Temperature => "(0, 1.0]",
            Parameter::TopP => "[0, 1.0]",
            Parameter::PenaltyScore => "[1.0, 2.0]",
            Parameter::MaxOutputTokens => "[2, 2048]",
        }
    }

    /// Returns whether `value` lies inside the accepted range.
    ///
    /// `NaN` is never accepted.
    #[inline]
    pub fn accepts(&self, value: f64) -> bool {
        match self {
            Parameter::Temperature => value > 0.0 && value <= 1.0,
            Parameter::TopP => (0.0..=1.0).contains(&value),
            Parameter::PenaltyScore => (1.0..=2.0).contains(&value),
            Parameter::MaxOutputTokens => (2.0..=2048.0).contains(&value),
        }
    }
}

/// The sampling parameters sent along with every request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplingParameters {
    /// Randomness of the output.
    pub temperature: f64,
    /// Diversity of the candidate tokens.
    pub top_p: f64,
    /// Penalty applied to repeated tokens.
    pub penalty_score: f64,
    /// Upper bound of the generated tokens.
    pub max_output_tokens: u32,
}

impl SamplingParameters {
    /// Returns the defaults used by streaming requests.
    #[inline]
    pub fn streaming() -> Self {
        Self {
            max_output_tokens: DEFAULT_STREAM_MAX_OUTPUT_TOKENS,
            ..Self::default()
        }
    }

    /// Iterates over all parameters in validation order.
    pub fn values(&self) -> [(Parameter, f64); 4] {
        [
            (Parameter::Temperature, self.temperature),
            (Parameter::TopP, self.top_p),
            (Parameter::PenaltyScore, self.penalty_score),
            (Parameter::MaxOutputTokens, self.max_output_tokens.into()),
        ]
    }

    /// Checks every parameter against its range.
    ///
    /// Same as [`validate_parameters`](crate::validate::validate_parameters).
    #[inline]
    pub fn validate(&self) -> Result<(), crate::Error> {
        crate::validate::validate_parameters(self)
    }
}

impl Default for SamplingParameters {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            penalty_score: DEFAULT_PENALTY_SCORE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = SamplingParameters::default();
        assert_eq!(params.temperature, 0.8);
        assert_eq!(params.top_p, 0.8);
        assert_eq!(params.penalty_score, 1.0);
        assert_eq!(params.max_output_tokens, 1024);
        assert_eq!(SamplingParameters::streaming().max_output_tokens, 2048);
    }

    #[test]
    fn test_range_bounds() {
        assert!(!Parameter::Temperature.accepts(0.0));
        assert!(Parameter::Temperature.accepts(1.0));
        assert!(Parameter::TopP.accepts(0.0));
        assert!(!Parameter::TopP.accepts(1.01));
        assert!(Parameter::PenaltyScore.accepts(2.0));
        assert!(!Parameter::PenaltyScore.accepts(0.99));
        assert!(!Parameter::MaxOutputTokens.accepts(1.0));
        assert!(Parameter::MaxOutputTokens.accepts(2048.0));
        assert!(!Parameter::TopP.accepts(f64::NAN));
    }
}
