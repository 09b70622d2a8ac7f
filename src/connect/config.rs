/// Path of the authorization endpoint on the Connect host
pub const AUTHORIZE_PATH: &str = "/oauth/authorize";

/// Moip environment the authorization request targets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    /// Base URL of the Connect (authorization) host
    pub fn connect_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => "https://connect-sandbox.moip.com.br",
            Environment::Production => "https://connect.moip.com.br",
        }
    }

    /// Base URL of the REST API host
    pub fn api_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => "https://sandbox.moip.com.br",
            Environment::Production => "https://api.moip.com.br",
        }
    }
}

/// How the boolean permission setters translate into scope tokens.
///
/// `Legacy` keeps the historical behavior where every permission setter
/// requests `RECEIVE_FUNDS`. `Distinct` requests the scope each setter is
/// named after.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScopeMapping {
    #[default]
    Legacy,
    Distinct,
}

/// Connect configuration
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Target environment (default: sandbox)
    pub environment: Environment,
    /// Permission setter behavior (default: legacy)
    pub scope_mapping: ScopeMapping,
}

impl Config {
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            ..Self::default()
        }
    }

    pub fn with_scope_mapping(mut self, scope_mapping: ScopeMapping) -> Self {
        self.scope_mapping = scope_mapping;
        self
    }

    /// Full authorization endpoint for the configured environment
    pub fn authorize_url(&self) -> String {
        format!("{}{}", self.environment.connect_url(), AUTHORIZE_PATH)
    }
}
