use serde::Deserialize;

/// Unified enum to wrap different provider configurations
#[derive(Debug, Clone, Deserialize)]
pub enum ProviderConfig {
    OpenAi(OpenAiProviderConfig),
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
    /// Request timeout in seconds; the model call dominates turn latency
    pub timeout_secs: Option<u64>,
}
