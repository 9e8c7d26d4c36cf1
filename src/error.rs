//! Error types
//!
//! Proxies introduce no runtime error kind; everything here belongs to the
//! build-time side of the shim (registry, configuration, code generation).

use crate::registry::Kind;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShimError>;

#[derive(Debug, Error)]
pub enum ShimError {
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("unknown primitive `{0}`")]
    UnknownPrimitive(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A registry entry the generators cannot express
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("primitive `{0}` is registered more than once")]
    Duplicate(String),

    #[error("primitive `{name}` has arity {arity}; proxies take at most 2 arguments")]
    Arity { name: String, arity: usize },

    #[error("constant `{0}` must denote a runtime value")]
    ConstantKind(String),

    #[error("primitive `{name}` takes a {kind} argument; only runtime values are passed through")]
    ArgumentKind { name: String, kind: Kind },
}
