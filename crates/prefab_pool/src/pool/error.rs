//! Pool error types

use thiserror::Error;

/// Errors raised by pool construction, selection and registry management
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Malformed pool configuration (empty tag or no templates)
    #[error("Invalid pool argument: {0}")]
    InvalidArgument(String),
    
    /// Unknown tag, or a variant missing from both live instances and templates
    #[error("Not found in pool '{tag}'{}", variant_suffix(.variant))]
    NotFound {
        /// Tag that was looked up
        tag: String,
        /// Variant name that was requested, if any
        variant: Option<String>,
    },
    
    /// Growth requested against a pool that has no templates
    #[error("Invalid pool state: {0}")]
    InvalidState(String),
    
    /// A registry is already live in this context
    #[error("A pool registry is already established on this thread")]
    AlreadyEstablished,
}

impl PoolError {
    /// Unknown tag
    pub fn unknown_tag(tag: &str) -> Self {
        PoolError::NotFound {
            tag: tag.to_string(),
            variant: None,
        }
    }
    
    /// Unknown variant inside a known pool
    pub fn unknown_variant(tag: &str, variant: &str) -> Self {
        PoolError::NotFound {
            tag: tag.to_string(),
            variant: Some(variant.to_string()),
        }
    }
}

fn variant_suffix(variant: &Option<String>) -> String {
    variant
        .as_ref()
        .map(|name| format!(" (variant '{}')", name))
        .unwrap_or_default()
}
