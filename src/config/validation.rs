use crate::config::types::{BudgetConfig, Config, LlmConfig, OutputConfig, RunConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound for the politeness interval
const MAX_REQUEST_INTERVAL_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_run_config(&config.run)?;
    validate_budget_config(&config.budget)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_llm_config(&config.llm)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the run target
fn validate_run_config(config: &RunConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", config.start_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Start URL '{}' must use http or https",
            config.start_url
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' has no host",
            config.start_url
        )));
    }

    if config.goal.trim().is_empty() {
        return Err(ConfigError::Validation("goal cannot be empty".to_string()));
    }

    if config.max_records < 1 {
        return Err(ConfigError::Validation(format!(
            "max_records must be >= 1, got {}",
            config.max_records
        )));
    }

    Ok(())
}

/// Validates budget limits
fn validate_budget_config(config: &BudgetConfig) -> Result<(), ConfigError> {
    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    if config.max_errors < 1 {
        return Err(ConfigError::Validation(format!(
            "max_errors must be >= 1, got {}",
            config.max_errors
        )));
    }

    if config.detail_lookahead < 1 {
        return Err(ConfigError::Validation(format!(
            "detail_lookahead must be >= 1, got {}",
            config.detail_lookahead
        )));
    }

    if config.min_request_interval_ms > MAX_REQUEST_INTERVAL_MS {
        return Err(ConfigError::Validation(format!(
            "min_request_interval_ms must be <= {}ms, got {}ms",
            MAX_REQUEST_INTERVAL_MS, config.min_request_interval_ms
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

/// Validates the language model endpoint
fn validate_llm_config(config: &LlmConfig) -> Result<(), ConfigError> {
    Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid llm base_url: {}", e)))?;

    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation("llm model cannot be empty".to_string()));
    }

    if config.api_key_env.trim().is_empty() {
        return Err(ConfigError::Validation(
            "llm api_key_env cannot be empty".to_string(),
        ));
    }

    if config.page_text_limit < 1 {
        return Err(ConfigError::Validation(
            "llm page_text_limit must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.records_path.is_empty() {
        return Err(ConfigError::Validation(
            "records_path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
