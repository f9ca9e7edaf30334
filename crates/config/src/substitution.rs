use anyhow::Result;
use regex::Regex;
use std::env;
use tracing::{debug, warn};

const ENV_VAR_PATTERN: &str = r"\$\{(\w+)\}|\$(\w+)";

/// Substitute environment variables in the format ${VAR_NAME} or $VAR_NAME
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(ENV_VAR_PATTERN)?;
    let mut result = content.to_string();
    let mut missing_vars = Vec::new();

    for caps in re.captures_iter(content) {
        let Some(var_name) = caps.get(1).or(caps.get(2)).map(|m| m.as_str()) else {
            continue;
        };
        let Some(placeholder) = caps.get(0).map(|m| m.as_str()) else {
            continue;
        };

        match env::var(var_name) {
            Ok(value) => {
                debug!("Substituting environment variable: {} = \"{}\"", var_name, value);
                result = result.replace(placeholder, &value);
            }
            Err(_) => {
                warn!("Environment variable '{}' not set", var_name);
                // Placeholder stays; the validator reports it
                missing_vars.push(var_name.to_string());
            }
        }
    }

    if !missing_vars.is_empty() {
        debug!(
            "Environment variables not set (may use defaults or fail validation): {:?}",
            missing_vars
        );
    }

    Ok(result)
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    Regex::new(ENV_VAR_PATTERN)
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_set_variable() {
        env::set_var("OPENX_TEST_WALLET", "abc123");
        let out = substitute_env_vars("wallet_address: ${OPENX_TEST_WALLET}").unwrap();
        assert_eq!(out, "wallet_address: abc123");
    }

    #[test]
    fn test_keeps_missing_placeholder() {
        let out = substitute_env_vars("seed: ${OPENX_TEST_DEFINITELY_UNSET}").unwrap();
        assert_eq!(out, "seed: ${OPENX_TEST_DEFINITELY_UNSET}");
        assert!(has_unresolved_env_vars(&out));
    }
}
