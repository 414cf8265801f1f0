//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::application::UpdateInfo;
use crate::application::services::update::VersionReport;
use crate::domain::{Catalog, PortReport};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the version line and, if consulted, the upstream comparison.
    pub fn render_version(&self, report: &VersionReport) {
        let revision = report.revision.as_deref().unwrap_or("unknown");
        println!(
            "stevedore {} {}",
            report.version,
            format!("(rev {revision})").style(self.ctx.styles.dim)
        );
        match &report.update {
            None => {}
            Some(UpdateInfo::UpToDate) => self.ctx.success("Up to date"),
            Some(UpdateInfo::Available { behind, notes }) => {
                self.render_pending(*behind, notes);
                self.ctx.info("Run: stevedore update");
            }
        }
    }

    /// Render the commits an update would bring in.
    pub fn render_pending(&self, behind: u32, notes: &[String]) {
        let plural = if behind == 1 { "" } else { "s" };
        self.ctx
            .warn(&format!("{behind} commit{plural} behind upstream"));
        for note in notes {
            self.ctx.item(note);
        }
    }

    /// Render the published-port table.
    pub fn render_port_report(&self, project: &str, report: &PortReport) {
        if report.rows().next().is_none() {
            self.ctx
                .info(&format!("No published ports for project '{project}'"));
            return;
        }

        let rows: Vec<_> = report.rows().collect();
        let service_w = rows
            .iter()
            .map(|(s, _, _)| s.len())
            .max()
            .unwrap_or(0)
            .max("SERVICE".len());
        let internal_w = rows
            .iter()
            .map(|(_, i, _)| i.len())
            .max()
            .unwrap_or(0)
            .max("INTERNAL".len());

        println!(
            "  {}",
            format!("{:<service_w$}  {:<internal_w$}  PUBLISHED", "SERVICE", "INTERNAL")
                .style(self.ctx.styles.header)
        );
        for (service, internal, published) in rows {
            println!(
                "  {:<service_w$}  {internal:<internal_w$}  {published}",
                service.style(self.ctx.styles.name)
            );
        }
    }

    /// Render applications with their services, then all known services.
    pub fn render_apps(&self, catalog: &Catalog) {
        if catalog.aliases.is_empty() {
            self.ctx.info("No applications defined");
        } else {
            self.ctx.header("Applications:");
            for (app, members) in catalog.aliases.iter() {
                let listed: Vec<String> = members
                    .iter()
                    .map(|m| {
                        if catalog.services.contains(m) {
                            m.clone()
                        } else {
                            format!("{m}?").style(self.ctx.styles.warning).to_string()
                        }
                    })
                    .collect();
                println!(
                    "    {:<16} {}",
                    app.style(self.ctx.styles.name),
                    listed.join(" ")
                );
            }
        }

        println!();
        self.ctx.header("Services:");
        for service in catalog.services.iter() {
            println!("    {service}");
        }
    }
}
