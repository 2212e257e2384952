//! Configuration schema and discovery for certgrab.
//!
//! Every value has a default that reproduces the behavior of the tool with no
//! config file at all; `certgrab.{toml,json}` in the working directory or in
//! `~/.config/certgrab/` overrides them.

pub mod loader;
pub mod schema;

pub use {
    loader::{discover_and_load, load_config},
    schema::CertgrabConfig,
};
