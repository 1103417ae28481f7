use wenxin_model::SamplingParameters;

/// Per-call options of a chat request.
///
/// Unset sampling parameters fall back to the defaults of the client.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatOptions {
    /// Overrides `temperature`.
    pub temperature: Option<f64>,
    /// Overrides `top_p`.
    pub top_p: Option<f64>,
    /// Overrides `penalty_score`.
    pub penalty_score: Option<f64>,
    /// Overrides `max_output_tokens`.
    pub max_output_tokens: Option<u32>,
    /// Whether the service should use its system memory.
    pub enable_system_memory: bool,
    /// The system memory to use. Only sent when memory is enabled.
    pub system_memory_id: Option<String>,
}

impl ChatOptions {
    /// Sets `temperature`.
    #[inline]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets `top_p`.
    #[inline]
    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Sets `penalty_score`.
    #[inline]
    pub fn with_penalty_score(mut self, penalty_score: f64) -> Self {
        self.penalty_score = Some(penalty_score);
        self
    }

    /// Sets `max_output_tokens`.
    #[inline]
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    /// Enables the system memory identified by `id`.
    #[inline]
    pub fn with_system_memory<S: Into<String>>(mut self, id: S) -> Self {
        self.enable_system_memory = true;
        self.system_memory_id = Some(id.into());
        self
    }

    /// Fills the unset parameters from `defaults`.
    pub fn resolve(&self, defaults: &SamplingParameters) -> SamplingParameters {
        SamplingParameters {
            temperature: self.temperature.unwrap_or(defaults.temperature),
            top_p: self.top_p.unwrap_or(defaults.top_p),
            penalty_score: self.penalty_score.unwrap_or(defaults.penalty_score),
            max_output_tokens: self
                .max_output_tokens
                .unwrap_or(defaults.max_output_tokens),
        }
    }
}
