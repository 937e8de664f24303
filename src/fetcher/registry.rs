//! Dependency registry and transitive resolution
//!
//! The registry maps canonical dependency names to their descriptors and
//! answers the "find the usage for this named dependency" query: resolving
//! a name fetches the dependency (if absent) together with its transitive
//! requirements, and returns the composed [`Usage`]. Composition always
//! copies - an upstream descriptor is never handed out for in-place
//! mutation.

use crate::core::DepkitError;
use crate::fetcher::{DependencyDescriptor, FetchEnv, Fetcher, catalog};
use crate::usage::Usage;
use anyhow::Result;
use futures::future::BoxFuture;
use std::collections::HashMap;

/// Maximum edit distance for "did you mean" suggestions.
const SUGGESTION_DISTANCE: usize = 3;

/// Name-keyed collection of dependency descriptors.
pub struct FetcherRegistry {
    descriptors: HashMap<String, DependencyDescriptor>,
}

impl FetcherRegistry {
    /// Empty registry, for callers providing their own descriptors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptors: HashMap::new(),
        }
    }

    /// Registry pre-populated with the built-in catalog.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for descriptor in catalog::builtin_descriptors() {
            registry.register(descriptor);
        }
        registry
    }

    /// Register a descriptor, replacing any previous one of the same name.
    pub fn register(&mut self, descriptor: DependencyDescriptor) {
        self.descriptors.insert(descriptor.name.clone(), descriptor);
    }

    /// Look up a descriptor by canonical name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DependencyDescriptor> {
        self.descriptors.get(name)
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Whether the named dependency's probe directory exists.
    ///
    /// # Errors
    ///
    /// Returns [`DepkitError::DependencyNotFound`] for unknown names.
    pub fn exists(&self, name: &str, env: &FetchEnv) -> Result<bool> {
        let descriptor = self.lookup(name)?;
        Ok(Fetcher::new(descriptor).exists(env))
    }

    /// Ensure the named dependency and its transitive requirements are
    /// installed, returning the composed usage descriptor.
    ///
    /// Requirements are resolved first, in declaration order; their usage is
    /// merged ahead of the dependency's own contribution. Resolution is
    /// recomputed on every call - the registry caches nothing, so both the
    /// first and any subsequent call return identical content.
    pub fn resolve<'a>(&'a self, name: &'a str, env: &'a FetchEnv) -> BoxFuture<'a, Result<Usage>> {
        self.resolve_inner(name.to_string(), env, Vec::new())
    }

    fn resolve_inner<'a>(
        &'a self,
        name: String,
        env: &'a FetchEnv,
        chain: Vec<String>,
    ) -> BoxFuture<'a, Result<Usage>> {
        Box::pin(async move {
            if chain.contains(&name) {
                return Err(DepkitError::Other {
                    message: format!(
                        "circular dependency chain: {} -> {name}",
                        chain.join(" -> ")
                    ),
                }
                .into());
            }

            let descriptor = self.lookup(&name)?;

            let mut chain = chain;
            chain.push(name.clone());

            let mut upstream = Usage::new();
            for required in &descriptor.requires {
                let usage = self.resolve_inner(required.clone(), env, chain.clone()).await?;
                upstream = upstream.merge(&usage);
            }

            Fetcher::new(descriptor).generate(env, &upstream).await
        })
    }

    fn lookup(&self, name: &str) -> Result<&DependencyDescriptor> {
        self.descriptors.get(name).ok_or_else(|| {
            DepkitError::DependencyNotFound {
                name: name.to_string(),
                closest: self.closest(name),
            }
            .into()
        })
    }

    /// Closest registered name within the suggestion distance, if any.
    fn closest(&self, name: &str) -> Option<String> {
        self.descriptors
            .keys()
            .map(|candidate| (strsim::levenshtein(name, candidate), candidate))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, candidate)| candidate.clone())
    }
}

impl Default for FetcherRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
