//! Moip Connect authorization request builder
//!
//! Collects the client id, redirect URI and permission scopes an application
//! asks for when sending a merchant through the Connect (OAuth 2.0
//! authorization code) flow.
//!
//! # Examples
//!
//! ```no_run
//! use moip_connect::ConnectAuth;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut connect = ConnectAuth::new();
//!     connect
//!         .set_client_id("APP-XXXXXXXXXXXX")
//!         .set_redirect_uri("https://example.com/moip/callback")
//!         .set_receive_funds(true)?
//!         .set_refund(true)?;
//!
//!     println!("Visit: {}", connect.authorize_url()?);
//!     Ok(())
//! }
//! ```

use serde_json::Value;
use url::Url;

mod config;
mod errors;
mod scope;

pub use config::{Config, Environment, ScopeMapping, AUTHORIZE_PATH};
pub use errors::ConnectError;
pub use scope::{Flag, Scope};

use crate::hooks::{Authentication, Hooks};
use scope::value_type_name;

/// OAuth response type requested by the Connect flow
pub const RESPONSE_TYPE: &str = "code";

/// Connect authorization request parameters
#[derive(Clone, Debug, Default)]
pub struct ConnectAuth {
    config: Config,
    client_id: Option<String>,
    redirect_uri: Option<String>,
    scope: Vec<Scope>,
}

impl ConnectAuth {
    /// Create an empty request with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty request with the given configuration
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Unique identifier of the application performing the request
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn set_client_id(&mut self, client_id: impl Into<String>) -> &mut Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Client redirect URI
    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    pub fn set_redirect_uri(&mut self, redirect_uri: impl Into<String>) -> &mut Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Requested scopes, in the order they were added
    pub fn scope(&self) -> &[Scope] {
        &self.scope
    }

    /// Requested scopes as the tokens sent to the authorization server
    pub fn scope_tokens(&self) -> Vec<&'static str> {
        self.scope.iter().map(Scope::as_str).collect()
    }

    /// Append a scope. Duplicates are kept.
    pub fn set_scope(&mut self, scope: Scope) -> &mut Self {
        log::debug!("Requesting Connect scope {}", scope);
        self.scope.push(scope);
        self
    }

    /// Create and query orders, payments, multi orders, multi payments and
    /// customers, and query launches
    pub fn set_receive_funds(&mut self, receive_funds: impl Flag) -> Result<&mut Self, ConnectError> {
        self.set_permission(Scope::ReceiveFunds, receive_funds)
    }

    /// Create and query refunds of orders and payments
    pub fn set_refund(&mut self, refund: impl Flag) -> Result<&mut Self, ConnectError> {
        self.set_permission(Scope::Refund, refund)
    }

    /// Query account registration information
    pub fn set_manage_account_info(
        &mut self,
        manage_account_info: impl Flag,
    ) -> Result<&mut Self, ConnectError> {
        self.set_permission(Scope::ManageAccountInfo, manage_account_info)
    }

    /// Query balance through the accounts endpoint
    pub fn set_retrieve_financial_info(
        &mut self,
        retrieve_financial_info: impl Flag,
    ) -> Result<&mut Self, ConnectError> {
        self.set_permission(Scope::RetrieveFinancialInfo, retrieve_financial_info)
    }

    /// Bank or Moip account transfers through the transfers endpoint
    pub fn set_transfer_funds(&mut self, transfer_funds: impl Flag) -> Result<&mut Self, ConnectError> {
        self.set_permission(Scope::TransferFunds, transfer_funds)
    }

    /// Create, change and delete notification preferences
    pub fn set_define_preferences(
        &mut self,
        define_preferences: impl Flag,
    ) -> Result<&mut Self, ConnectError> {
        self.set_permission(Scope::DefinePreferences, define_preferences)
    }

    /// Request every permission (`true`) or drop all requested scopes (`false`)
    pub fn set_all_scopes(&mut self, scope: impl Flag) -> Result<(), ConnectError> {
        if !scope.into_flag("scope")? {
            log::debug!("Clearing {} requested Connect scope(s)", self.scope.len());
            self.scope.clear();
            return Ok(());
        }

        self.set_receive_funds(true)?
            .set_refund(true)?
            .set_manage_account_info(true)?
            .set_retrieve_financial_info(true)?
            .set_transfer_funds(true)?
            .set_define_preferences(true)?;
        Ok(())
    }

    /// Apply permission flags read from configuration, e.g.
    /// `{"receive_funds": true, "refund": false}`.
    ///
    /// Keys are the permission parameter names, plus `all` which behaves like
    /// [`ConnectAuth::set_all_scopes`] and is applied first. An unknown key is
    /// rejected before anything is applied. Stops at the first non-boolean
    /// value; flags applied before it are kept.
    pub fn apply_permissions(&mut self, permissions: &Value) -> Result<&mut Self, ConnectError> {
        let map = permissions
            .as_object()
            .ok_or(ConnectError::InvalidArgument {
                name: "permissions",
                found: value_type_name(permissions),
            })?;

        if let Some(unknown) = map
            .keys()
            .find(|key| *key != "all" && !Scope::ALL.iter().any(|s| s.param_name() == *key))
        {
            return Err(ConnectError::UnknownPermission(unknown.clone()));
        }

        if let Some(all) = map.get("all") {
            self.set_all_scopes(all)?;
        }

        for scope in Scope::ALL {
            if let Some(flag) = map.get(scope.param_name()) {
                self.set_permission(scope, flag)?;
            }
        }

        Ok(self)
    }

    /// Build the URL the merchant is sent to in order to grant the requested
    /// permissions
    pub fn authorize_url(&self) -> Result<Url, ConnectError> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or(ConnectError::MissingField("client_id"))?;
        let redirect_uri = self
            .redirect_uri
            .as_deref()
            .ok_or(ConnectError::MissingField("redirect_uri"))?;

        let mut url = Url::parse(&self.config.authorize_url())?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("response_type", RESPONSE_TYPE);
            query.append_pair("client_id", client_id);
            query.append_pair("redirect_uri", redirect_uri);
            query.append_pair("scope", &self.scope_tokens().join(","));
        }

        log::debug!("Built Connect authorization URL: {}", url);
        Ok(url)
    }

    fn set_permission(&mut self, scope: Scope, flag: impl Flag) -> Result<&mut Self, ConnectError> {
        if flag.into_flag(scope.param_name())? {
            let requested = match self.config.scope_mapping {
                // Historical behavior: every permission requests RECEIVE_FUNDS
                ScopeMapping::Legacy => Scope::ReceiveFunds,
                ScopeMapping::Distinct => scope,
            };
            self.set_scope(requested);
        }

        Ok(self)
    }
}

impl Authentication for ConnectAuth {
    /// Registers nothing. The Connect parameters only describe the
    /// authorization redirect; API requests are signed by
    /// [`crate::auth::OAuth`] once the code has been exchanged.
    fn register(&self, _hooks: &mut Hooks) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_connect_is_empty() {
        let connect = ConnectAuth::new();
        assert_eq!(connect.client_id(), None);
        assert_eq!(connect.redirect_uri(), None);
        assert!(connect.scope().is_empty());
    }

    #[test]
    fn test_set_scope_keeps_order_and_duplicates() {
        let mut connect = ConnectAuth::new();
        connect
            .set_scope(Scope::Refund)
            .set_scope(Scope::TransferFunds)
            .set_scope(Scope::Refund);
        assert_eq!(
            connect.scope_tokens(),
            vec!["REFUND", "TRANSFER_FUNDS", "REFUND"]
        );
    }

    #[test]
    fn test_distinct_mapping_requests_each_setters_own_scope() {
        let mut connect =
            ConnectAuth::with_config(Config::default().with_scope_mapping(ScopeMapping::Distinct));
        connect.set_all_scopes(true).unwrap();
        assert_eq!(connect.scope(), &Scope::ALL);
    }

    #[test]
    fn test_set_all_scopes_rejects_non_boolean_without_mutation() {
        let mut connect = ConnectAuth::new();
        connect.set_scope(Scope::Refund);

        let err = connect.set_all_scopes(json!("yes")).unwrap_err();
        assert_eq!(err.to_string(), "$scope must be boolean, got string");
        assert_eq!(connect.scope(), &[Scope::Refund]);
    }

    #[test]
    fn test_apply_permissions_all_then_individual_flags() {
        let mut connect =
            ConnectAuth::with_config(Config::default().with_scope_mapping(ScopeMapping::Distinct));
        connect.set_scope(Scope::Refund);
        connect
            .apply_permissions(&json!({"all": false, "transfer_funds": true, "refund": false}))
            .unwrap();
        assert_eq!(connect.scope(), &[Scope::TransferFunds]);
    }

    #[test]
    fn test_apply_permissions_rejects_unknown_key_before_applying() {
        let mut connect = ConnectAuth::new();
        let err = connect
            .apply_permissions(&json!({"receive_funds": true, "refunds": true}))
            .unwrap_err();
        assert!(matches!(err, ConnectError::UnknownPermission(ref key) if key == "refunds"));
        assert!(connect.scope().is_empty());
    }

    #[test]
    fn test_apply_permissions_rejects_non_object() {
        let mut connect = ConnectAuth::new();
        let err = connect.apply_permissions(&json!([true])).unwrap_err();
        assert!(matches!(
            err,
            ConnectError::InvalidArgument { name: "permissions", found: "array" }
        ));
    }

    #[test]
    fn test_register_adds_no_hooks() {
        let mut hooks = Hooks::new();
        ConnectAuth::new().register(&mut hooks);
        assert!(hooks.is_empty());
    }
}
