//! Infrastructure implementations of the `ConfigStore` and `CatalogSource` ports.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{CatalogSource, ConfigStore};
use crate::domain::catalog::{parse_aliases, parse_topology};
use crate::domain::error::CatalogError;
use crate::domain::{Catalog, Settings, UserConfig};

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
pub struct YamlConfigStore;

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<UserConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(UserConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(UserConfig::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var("STEVEDORE_CONFIG") {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".stevedore").join("config.yaml"))
    }
}

/// Reads `docker-compose.yml` (or the test variant) and `apps.yml`.
pub struct YamlCatalogSource;

impl CatalogSource for YamlCatalogSource {
    fn load(&self, settings: &Settings) -> Result<Catalog> {
        let topology_path = settings.topology_file();
        let topology_text = match read_optional(topology_path)? {
            Some(text) => text,
            None => return Err(CatalogError::TopologyMissing(topology_path.to_path_buf()).into()),
        };
        let topology = parse_topology(&topology_text).map_err(|source| CatalogError::Malformed {
            path: topology_path.to_path_buf(),
            source,
        })?;

        let alias_path = settings.alias_file();
        let Some(alias_text) = read_optional(&alias_path)? else {
            return Err(CatalogError::AliasFileMissing(alias_path).into());
        };
        let aliases = parse_aliases(&alias_text).map_err(|source| CatalogError::Malformed {
            path: alias_path.clone(),
            source,
        })?;

        let (services, volumes) = topology.into_parts();
        tracing::debug!(
            services = services.len(),
            applications = aliases.len(),
            volumes = volumes.len(),
            "catalog loaded"
        );
        Ok(Catalog::new(aliases, services, volumes))
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, CatalogError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(CatalogError::Unreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}
