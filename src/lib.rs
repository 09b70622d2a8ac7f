pub mod auth;
pub mod connect;
pub mod hooks;

pub use auth::{BasicAuth, OAuth};
pub use connect::{
    Config, ConnectAuth, ConnectError, Environment, Flag, Scope, ScopeMapping, RESPONSE_TYPE,
};
pub use hooks::{Authentication, HookEvent, Hooks, Pipeline, PreparedRequest};
