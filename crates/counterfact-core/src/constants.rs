/// counterfact version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default cap on alternative event assignments tried by a random necessity search.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Environment variable holding the tracing filter directives.
pub const LOG_ENV_VAR: &str = "COUNTERFACT_LOG";

/// Filter used when `COUNTERFACT_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "counterfact=info";

/// Project config file name, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "counterfact.toml";

/// Environment overrides.
pub const ENV_SEED: &str = "COUNTERFACT_SEED";
pub const ENV_MAX_ATTEMPTS: &str = "COUNTERFACT_MAX_ATTEMPTS";
pub const ENV_NECESSITY_SEARCH: &str = "COUNTERFACT_NECESSITY_SEARCH";
