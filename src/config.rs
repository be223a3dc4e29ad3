use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use tracing::debug;

use crate::payments::types::Provider;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub url_types: Vec<UrlTypeDecl>,
}

/// One declared URL-type record from the host application's packaging
/// metadata: an identifying name plus the scheme strings registered under it.
#[derive(Debug, Clone, Deserialize)]
pub struct UrlTypeDecl {
    pub name: String,
    pub schemes: Vec<String>,
}

impl Config {
    pub fn new(url_types: Vec<UrlTypeDecl>) -> Self {
        Self { url_types }
    }

    pub fn from_env() -> Result<Self> {
        let raw = env::var("UNIPAY_URL_TYPES").context("UNIPAY_URL_TYPES not set")?;

        let url_types: Vec<UrlTypeDecl> = serde_json::from_str(&raw)
            .context("UNIPAY_URL_TYPES must be a JSON array of {name, schemes} records")?;

        let config = Config { url_types };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.url_types.is_empty() {
            return Err(anyhow!("at least one URL-type record is required"));
        }

        for decl in &self.url_types {
            if decl.name.trim().is_empty() {
                return Err(anyhow!("URL-type record with empty name"));
            }
            if decl.schemes.is_empty() {
                return Err(anyhow!("URL-type record '{}' declares no schemes", decl.name));
            }
            if decl.schemes.iter().any(|s| s.trim().is_empty()) {
                return Err(anyhow!(
                    "URL-type record '{}' contains an empty scheme",
                    decl.name
                ));
            }
        }

        Ok(())
    }
}

/// Scheme-to-provider routing table, built once at dispatcher construction
/// and read-only afterwards.
///
/// Only the first scheme of each declared record becomes a registry key,
/// matching how the host's packaging metadata is read. Records whose name is
/// not a known payment provider belong to other integrations and are skipped.
/// Duplicate declarations follow dictionary semantics: a later record
/// overwrites an earlier one.
#[derive(Debug, Clone)]
pub struct SchemeRegistry {
    by_scheme: HashMap<String, Provider>,
    by_provider: HashMap<Provider, String>,
}

impl SchemeRegistry {
    pub fn from_declared(url_types: &[UrlTypeDecl]) -> Self {
        let mut by_scheme = HashMap::new();
        let mut by_provider = HashMap::new();

        for decl in url_types {
            let Some(scheme) = decl.schemes.first() else {
                continue;
            };
            match decl.name.parse::<Provider>() {
                Ok(provider) => {
                    if let Some(previous) = by_provider.insert(provider, scheme.clone()) {
                        by_scheme.remove(&previous);
                    }
                    by_scheme.insert(scheme.clone(), provider);
                }
                Err(_) => {
                    debug!("skipping non-payment URL type '{}'", decl.name);
                }
            }
        }

        let registry = Self {
            by_scheme,
            by_provider,
        };
        debug!("scheme registry: {:?}", registry.by_scheme);
        registry
    }

    /// Which provider owns an inbound URL scheme, if any.
    pub fn provider_for(&self, scheme: &str) -> Option<Provider> {
        self.by_scheme.get(scheme).copied()
    }

    /// Reverse lookup: the scheme declared for a provider, if any.
    pub fn scheme_for(&self, provider: Provider) -> Option<&str> {
        self.by_provider.get(&provider).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_scheme.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_scheme.is_empty()
    }
}
