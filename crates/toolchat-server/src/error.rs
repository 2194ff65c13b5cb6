use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Other(#[from] config::ConfigError),
}

/// Map a settings field path to the environment variable that supplies it.
/// Bare field names come from the provider section, which is where every
/// required setting lives.
pub fn to_env_var(field: &str) -> String {
    let path = field.replace('.', "__").to_uppercase();
    if path.contains("__") {
        format!("TOOLCHAT_{path}")
    } else {
        format!("TOOLCHAT_PROVIDER__{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_env_var() {
        assert_eq!(to_env_var("server.port"), "TOOLCHAT_SERVER__PORT");
        assert_eq!(to_env_var("api_key"), "TOOLCHAT_PROVIDER__API_KEY");
        assert_eq!(to_env_var("type"), "TOOLCHAT_PROVIDER__TYPE");
    }
}
