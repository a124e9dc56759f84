//! Filtered listing of project units.

use std::sync::Arc;

use clap::Args;
use tracing::warn;

use obraslayer::filter::{apply_all, FilterSet, GeoHierarchy, GeoLevel};
use obraslayer::mapper::ProjectUnit;
use obraslayer::symbology::{resolve_style, LayerData, LayerDescriptor, StyleContext, Symbology};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Filter and output options for `list`.
#[derive(Debug, Default, Args)]
pub struct ListArgs {
    /// Resource keys to load (defaults to the configured keys)
    pub keys: Vec<String>,

    /// Free-text search over names, places and descriptions
    #[arg(long)]
    pub search: Option<String>,

    /// Status label or key (e.g. "En Ejecución" or EnEjecucion)
    #[arg(long)]
    pub estado: Option<String>,

    /// Responsible office (repeatable)
    #[arg(long = "centro-gestor")]
    pub centro_gestor: Vec<String>,

    /// Comuna (repeatable)
    #[arg(long)]
    pub comuna: Vec<String>,

    /// Barrio; must belong to a selected comuna (repeatable)
    #[arg(long)]
    pub barrio: Vec<String>,

    /// Corregimiento (repeatable)
    #[arg(long)]
    pub corregimiento: Vec<String>,

    /// Vereda; must belong to a selected corregimiento (repeatable)
    #[arg(long)]
    pub vereda: Vec<String>,

    /// Funding source (repeatable)
    #[arg(long)]
    pub fuente: Vec<String>,

    /// Color each unit by the categories of this attribute
    #[arg(long)]
    pub color_by: Option<String>,

    /// Print units as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// Builds the filter, applying child selections through the cascade.
    ///
    /// Children that no selected parent contains are dropped and returned.
    pub fn to_filter_set(&self, hierarchy: &GeoHierarchy) -> (FilterSet, Vec<String>) {
        let mut filters = FilterSet::new();
        if let Some(search) = &self.search {
            filters.search = search.clone();
        }
        if let Some(estado) = &self.estado {
            filters.estado = estado.clone();
        }
        filters.centro_gestor.extend(self.centro_gestor.iter().cloned());
        filters.fuentes_financiamiento.extend(self.fuente.iter().cloned());

        for comuna in &self.comuna {
            filters.select_parent(GeoLevel::Comuna, comuna);
        }
        for corregimiento in &self.corregimiento {
            filters.select_parent(GeoLevel::Corregimiento, corregimiento);
        }

        let mut rejected = Vec::new();
        let children = self
            .barrio
            .iter()
            .map(|b| (GeoLevel::Barrio, b))
            .chain(self.vereda.iter().map(|v| (GeoLevel::Vereda, v)));
        for (level, value) in children {
            if !filters.select_child(hierarchy, level, value) {
                rejected.push(format!("{} '{}'", level, value));
            }
        }

        (filters, rejected)
    }
}

/// Print the units matching the filter flags.
pub async fn run(runner: &CliRunner, args: &ListArgs) -> Result<(), CliError> {
    let snapshot = runner.load(&args.keys).await?;
    let units: Vec<ProjectUnit> = snapshot.units().cloned().collect();

    let hierarchy = GeoHierarchy::from_units(&units);
    let (filters, rejected) = args.to_filter_set(&hierarchy);
    for child in &rejected {
        warn!(child = %child, "Ignoring selection outside the selected parents");
        eprintln!("warning: ignoring {} (not within the selected areas)", child);
    }

    let matched = apply_all(&units, &filters);

    if args.json {
        let json = serde_json::to_string_pretty(&matched).map_err(|e| CliError::Output(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    let colors = args.color_by.as_ref().map(|attribute| {
        let layer = LayerDescriptor::new("list", "list", LayerData::Units(Arc::new(units.clone())))
            .with_symbology(Symbology::Categories {
                attribute: attribute.clone(),
            });
        let ctx = StyleContext::for_layer(&layer, |_| true);
        (layer, ctx)
    });

    for unit in &matched {
        let location = [&unit.comuna, &unit.corregimiento, &unit.barrio, &unit.vereda]
            .into_iter()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join(" / ");
        let color = colors
            .as_ref()
            .map(|(layer, ctx)| format!(" {}", resolve_style(*unit, 0, layer, ctx).fill_color))
            .unwrap_or_default();

        println!(
            "{:<14} {:<15} {:>5.1}%{} {}  [{}]",
            unit.id,
            unit.status.label(),
            unit.progress,
            color,
            unit.name,
            location
        );
    }
    println!();
    println!("{} of {} units", matched.len(), units.len());

    Ok(())
}
