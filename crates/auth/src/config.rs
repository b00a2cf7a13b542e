//! Authentication configuration

/// Authentication configuration.
///
/// Holds the process-wide symmetric signing secret, loaded once at
/// startup. The `Debug` impl redacts it so the secret cannot leak
/// through tracing output.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[redacted]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_output_redacts_secret() {
        let config = AuthConfig {
            jwt_secret: "super-secret-value".to_string(),
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("[redacted]"));
    }
}
