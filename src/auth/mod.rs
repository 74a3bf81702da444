//! Authentication types for the installation service.
//!
//! - [`ShopDomain`]: a validated `*.myshopify.com` shop identifier
//! - [`AuthScopes`]: the access scopes requested at install
//! - [`InstalledShop`]: the outcome of a completed handshake
//! - [`oauth`]: the handshake itself

mod installation;
pub mod oauth;
mod scopes;
mod shop_domain;

pub use installation::{AccessTokenResponse, InstalledShop};
pub use scopes::AuthScopes;
pub use shop_domain::ShopDomain;
