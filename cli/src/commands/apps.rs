//! `stevedore apps`: applications and the services they expand to.

use std::collections::BTreeMap;
use std::process::ExitCode;

use anyhow::Result;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::ports::CatalogSource;
use crate::infra::config::YamlCatalogSource;
use crate::output::json;

#[derive(Serialize)]
struct AppsListing<'a> {
    applications: BTreeMap<&'a str, &'a [String]>,
    services: Vec<&'a str>,
}

/// Run `stevedore apps`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let catalog = YamlCatalogSource.load(&app.settings)?;
    if app.is_json() {
        let listing = AppsListing {
            applications: catalog.aliases.iter().collect(),
            services: catalog.services.iter().collect(),
        };
        println!("{}", json::format_value(&listing)?);
    } else {
        app.renderer().render_apps(&catalog);
    }
    Ok(ExitCode::SUCCESS)
}
