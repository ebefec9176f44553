use std::env;

/// Application-level constants
pub const APP_NAME: &str = "MediFlow";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Local development default for the MediFlow API service.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Environment variable that overrides the API base URL.
pub const API_URL_ENV: &str = "MEDIFLOW_API_URL";

/// Base URL of the MediFlow API: `MEDIFLOW_API_URL` if set, else the local default.
pub fn api_base_url() -> String {
    env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_name_is_mediflow() {
        assert_eq!(APP_NAME, "MediFlow");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn default_log_filter_scopes_to_crate() {
        assert_eq!(default_log_filter(), "mediflow=info");
    }

    #[test]
    fn api_base_url_env_override() {
        // Default, override, and cleanup in one test: the environment is
        // process-global and must not be touched from parallel tests.
        env::remove_var(API_URL_ENV);
        assert_eq!(api_base_url(), DEFAULT_API_BASE_URL);

        env::set_var(API_URL_ENV, "http://clinic.example:9000");
        assert_eq!(api_base_url(), "http://clinic.example:9000");

        env::remove_var(API_URL_ENV);
    }
}
