use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::connect::errors::ConnectError;

/// Permission that can be requested from the Moip authorization server
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    /// Create and query ORDERS, PAYMENTS, MULTI ORDERS, MULTI PAYMENTS and
    /// CUSTOMERS, and query LAUNCHES
    ReceiveFunds,
    /// Create and query refunds of ORDERS and PAYMENTS
    Refund,
    /// Query ACCOUNTS registration information
    ManageAccountInfo,
    /// Query balance through the ACCOUNTS endpoint
    RetrieveFinancialInfo,
    /// Bank or Moip account transfers through the TRANSFERS endpoint
    TransferFunds,
    /// Create, change and delete notification preferences through the
    /// PREFERENCES endpoint
    DefinePreferences,
}

impl Scope {
    /// Every scope, in declaration order
    pub const ALL: [Scope; 6] = [
        Scope::ReceiveFunds,
        Scope::Refund,
        Scope::ManageAccountInfo,
        Scope::RetrieveFinancialInfo,
        Scope::TransferFunds,
        Scope::DefinePreferences,
    ];

    /// Token sent to the authorization server
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::ReceiveFunds => "RECEIVE_FUNDS",
            Scope::Refund => "REFUND",
            Scope::ManageAccountInfo => "MANAGE_ACCOUNT_INFO",
            Scope::RetrieveFinancialInfo => "RETRIEVE_FINANCIAL_INFO",
            Scope::TransferFunds => "TRANSFER_FUNDS",
            Scope::DefinePreferences => "DEFINE_PREFERENCES",
        }
    }

    /// Name of the boolean permission parameter that requests this scope
    pub fn param_name(&self) -> &'static str {
        match self {
            Scope::ReceiveFunds => "receive_funds",
            Scope::Refund => "refund",
            Scope::ManageAccountInfo => "manage_account_info",
            Scope::RetrieveFinancialInfo => "retrieve_financial_info",
            Scope::TransferFunds => "transfer_funds",
            Scope::DefinePreferences => "define_preferences",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = ConnectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| ConnectError::UnknownScope(s.to_string()))
    }
}

/// A value accepted by the boolean permission setters.
///
/// Plain `bool` always converts. JSON values coming from configuration only
/// convert when they hold a boolean.
pub trait Flag {
    fn into_flag(self, name: &'static str) -> Result<bool, ConnectError>;
}

impl Flag for bool {
    fn into_flag(self, _name: &'static str) -> Result<bool, ConnectError> {
        Ok(self)
    }
}

impl Flag for &Value {
    fn into_flag(self, name: &'static str) -> Result<bool, ConnectError> {
        match self {
            Value::Bool(flag) => Ok(*flag),
            other => Err(ConnectError::InvalidArgument {
                name,
                found: value_type_name(other),
            }),
        }
    }
}

impl Flag for Value {
    fn into_flag(self, name: &'static str) -> Result<bool, ConnectError> {
        (&self).into_flag(name)
    }
}

pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NULL",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "double",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
