//! Pool configuration

use super::error::PoolError;
use super::provider::Template;

/// Description of one pool: its tag, variant templates and starting size
///
/// Built once by the caller and handed to
/// [`PoolRegistry::create_pool`](super::PoolRegistry::create_pool). The
/// configuration is read-only afterwards; the live instance list belongs to
/// the [`Pool`](super::Pool) that takes ownership of it.
#[derive(Debug, Clone)]
pub struct PoolConfig<T> {
    tag: String,
    variants: Vec<T>,
    requested_count: i32,
}

impl<T: Template> PoolConfig<T> {
    /// Create a single-template configuration
    ///
    /// # Arguments
    ///
    /// * `tag` - Unique pool identifier, must not be empty
    /// * `template` - The only variant of this pool
    /// * `requested_count` - Number of instances created up front (zero or negative creates none)
    pub fn new(tag: impl Into<String>, template: T, requested_count: i32) -> Result<Self, PoolError> {
        Self::with_variants(tag, vec![template], requested_count)
    }

    /// Create a multi-template configuration
    ///
    /// Variants are kept in declaration order; that order decides which
    /// template wins when two share a name.
    pub fn with_variants(
        tag: impl Into<String>,
        variants: Vec<T>,
        requested_count: i32,
    ) -> Result<Self, PoolError> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(PoolError::InvalidArgument("pool tag is empty".to_string()));
        }
        if variants.is_empty() {
            return Err(PoolError::InvalidArgument(format!(
                "pool '{}' has no templates",
                tag
            )));
        }

        Ok(Self {
            tag,
            variants,
            requested_count,
        })
    }

    /// First template whose name matches `name`
    pub fn find_variant(&self, name: &str) -> Option<&T> {
        self.variants.iter().find(|template| template.name() == name)
    }
}

impl<T> PoolConfig<T> {
    /// Pool tag
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Variant templates in declaration order
    pub fn variants(&self) -> &[T] {
        &self.variants
    }

    /// Requested starting size as given by the caller
    pub fn requested_count(&self) -> i32 {
        self.requested_count
    }

    /// Number of instances created eagerly
    pub fn initial_population(&self) -> usize {
        usize::try_from(self.requested_count).unwrap_or(0)
    }
}
