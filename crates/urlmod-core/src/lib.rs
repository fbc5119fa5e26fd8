//! Mutable URL model: parse a URL into components, edit them, and render
//! relative, absolute or protocol-relative output, with a batch "modify"
//! instruction list and an outbound-link guard on top.

pub mod config;
pub mod error;
pub mod logging;
pub mod modify;
pub mod protect;
pub mod provider;
pub mod url_model;

pub use config::UrlConfig;
pub use error::UrlError;
pub use modify::{modify, modify_current, modify_json, Edit, EditValue, ModifySpec};
pub use provider::{
    AliasResolver, AliasTable, CurrentRequestProvider, DigestTokenProvider, Environment,
    StaticRequest, TokenProvider,
};
pub use url_model::{Component, ComponentValue, Mode, QueryParams, QueryValue, UrlModel};
