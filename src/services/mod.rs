pub mod auth;
pub mod bootstrap;
pub mod credentials;
pub mod directory;
pub mod tokens;
