//! Applications, known services and volumes loaded from the descriptors.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

// ── Alias map ────────────────────────────────────────────────────────────────

/// Application name → ordered list of the services it depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap(BTreeMap<String, Vec<String>>);

impl AliasMap {
    /// Services an application expands to, in declaration order.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, Vec<V>)> for AliasMap {
    fn from_iter<I: IntoIterator<Item = (K, Vec<V>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }
}

// ── Known services ───────────────────────────────────────────────────────────

/// The set of service names declared by the topology descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownServices(BTreeSet<String>);

impl KnownServices {
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for KnownServices {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// ── Catalog ──────────────────────────────────────────────────────────────────

/// Everything the classifier and the auxiliary commands need from the
/// descriptors. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub aliases: AliasMap,
    pub services: KnownServices,
    /// Named volumes declared by the topology, sorted.
    pub volumes: Vec<String>,
}

impl Catalog {
    #[must_use]
    pub fn new(aliases: AliasMap, services: KnownServices, volumes: Vec<String>) -> Self {
        Self {
            aliases,
            services,
            volumes,
        }
    }

    /// Resolve a token to the known services it names.
    ///
    /// An application expands to its dependency list; any other token is a
    /// candidate service name on its own. The result keeps candidate order and
    /// drops names the topology does not declare. Repeats are not removed here.
    #[must_use]
    pub fn resolve<'a>(&'a self, token: &'a str) -> Vec<&'a str> {
        match self.aliases.get(token) {
            Some(deps) => deps
                .iter()
                .map(String::as_str)
                .filter(|s| self.services.contains(s))
                .collect(),
            None if self.services.contains(token) => vec![token],
            None => Vec::new(),
        }
    }

    /// Members of an application that the topology does not declare.
    #[must_use]
    pub fn undeclared_members(&self, alias: &str) -> Vec<&str> {
        self.aliases
            .get(alias)
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .filter(|s| !self.services.contains(s))
            .collect()
    }
}

// ── Descriptor schemas ───────────────────────────────────────────────────────

/// The parts of a compose file this tool reads. Everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Topology {
    pub services: BTreeMap<String, serde_yaml::Value>,
    pub volumes: BTreeMap<String, serde_yaml::Value>,
}

impl Topology {
    /// Split into the known-service set and the sorted volume list.
    #[must_use]
    pub fn into_parts(self) -> (KnownServices, Vec<String>) {
        (
            self.services.into_keys().collect(),
            self.volumes.into_keys().collect(),
        )
    }
}

/// Parse a compose topology document.
///
/// # Errors
///
/// Returns an error if the document is not valid YAML or `services`/`volumes`
/// are not mappings.
pub fn parse_topology(text: &str) -> Result<Topology, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(Topology::default());
    }
    serde_yaml::from_str(text)
}

/// Parse an application alias document (`app: [service, ...]`).
///
/// An application with no value (`app:`) parses as an empty dependency list.
///
/// # Errors
///
/// Returns an error if the document is not a mapping of names to string lists.
pub fn parse_aliases(text: &str) -> Result<AliasMap, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(AliasMap::default());
    }
    let raw: BTreeMap<String, Option<Vec<String>>> = serde_yaml::from_str(text)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| (k, v.unwrap_or_default()))
        .collect())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
