use crate::types::PlaygroundConfig;
use crate::ConfigError;

impl PlaygroundConfig {
    /// Validate the configuration and return every problem found.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.host.trim().is_empty() {
            errors.push(ConfigError::InvalidConfig(
                "server.host must not be empty".to_string(),
            ));
        }

        if self.server.port == 0 {
            errors.push(ConfigError::InvalidConfig(
                "server.port must be between 1 and 65535".to_string(),
            ));
        }

        // The default document is joined onto the public dir, so it must be a bare file name.
        let doc = &self.server.default_document;
        if doc.is_empty() {
            errors.push(ConfigError::InvalidDefaultDocument(
                doc.clone(),
                "must not be empty".to_string(),
            ));
        } else if doc.contains('/') || doc.contains('\\') || doc == "." || doc == ".." {
            errors.push(ConfigError::InvalidDefaultDocument(
                doc.clone(),
                "must be a plain file name".to_string(),
            ));
        }

        if self.server.concurrency_limit == 0 {
            errors.push(ConfigError::InvalidConfig(
                "server.concurrency_limit must be at least 1".to_string(),
            ));
        }

        if self.server.request_timeout.as_duration().is_zero() {
            errors.push(ConfigError::InvalidConfig(
                "server.request_timeout must be greater than zero".to_string(),
            ));
        }

        if self.compare.max_slots == 0 {
            errors.push(ConfigError::InvalidConfig(
                "compare.max_slots must be at least 1".to_string(),
            ));
        }

        for id in self.analysis.latency_overrides.keys() {
            if id.trim().is_empty() {
                errors.push(ConfigError::InvalidConfig(
                    "analysis.latency_overrides contains an empty agent id".to_string(),
                ));
            }
        }

        errors
    }

    /// Validate and return the first error, if any.
    pub fn validate_or_err(&self) -> Result<(), ConfigError> {
        match self.validate().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
