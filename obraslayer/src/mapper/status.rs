//! Project status mapping

use serde::Serialize;
use std::fmt;

/// Lifecycle state of a project unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ProjectStatus {
    EnEjecucion,
    Planificacion,
    Completado,
    Suspendido,
    EnEvaluacion,
}

impl ProjectStatus {
    /// All statuses in display order.
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::EnEjecucion,
        ProjectStatus::Planificacion,
        ProjectStatus::Completado,
        ProjectStatus::Suspendido,
        ProjectStatus::EnEvaluacion,
    ];

    /// Human-readable label, as shown in filters and legends.
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::EnEjecucion => "En Ejecución",
            ProjectStatus::Planificacion => "Planificación",
            ProjectStatus::Completado => "Completado",
            ProjectStatus::Suspendido => "Suspendido",
            ProjectStatus::EnEvaluacion => "En Evaluación",
        }
    }

    /// Stable identifier of the variant.
    pub fn key(&self) -> &'static str {
        match self {
            ProjectStatus::EnEjecucion => "EnEjecucion",
            ProjectStatus::Planificacion => "Planificacion",
            ProjectStatus::Completado => "Completado",
            ProjectStatus::Suspendido => "Suspendido",
            ProjectStatus::EnEvaluacion => "EnEvaluacion",
        }
    }

    /// Returns true if `value` names this status by label or key, ignoring case.
    pub fn matches_name(&self, value: &str) -> bool {
        let value = value.trim().to_lowercase();
        value == self.label().to_lowercase() || value == self.key().to_lowercase()
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered substring rules; the first rule with a matching needle wins.
const STATUS_RULES: &[(&[&str], ProjectStatus)] = &[
    (&["ejecución", "ejecucion"], ProjectStatus::EnEjecucion),
    (
        &["completado", "terminado", "finalizado"],
        ProjectStatus::Completado,
    ),
    (&["suspendido", "pausado"], ProjectStatus::Suspendido),
    (
        &["evaluación", "evaluacion", "revisión"],
        ProjectStatus::EnEvaluacion,
    ),
    (
        &["planificación", "planificacion", "planeación"],
        ProjectStatus::Planificacion,
    ),
];

/// Maps a raw status string to a [`ProjectStatus`].
///
/// A missing or blank status means the unit has not started and maps to
/// `Planificacion`. A present status that matches no rule maps to
/// `EnEjecucion`.
pub fn map_status(raw: Option<&str>) -> ProjectStatus {
    let normalized = match raw.map(|s| s.trim().to_lowercase()) {
        Some(s) if !s.is_empty() => s,
        _ => return ProjectStatus::Planificacion,
    };

    STATUS_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| normalized.contains(needle)))
        .map(|(_, status)| *status)
        .unwrap_or(ProjectStatus::EnEjecucion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_execution_with_accent_and_padding() {
        assert_eq!(map_status(Some("en Ejecución ")), ProjectStatus::EnEjecucion);
        assert_eq!(map_status(Some("EN EJECUCION")), ProjectStatus::EnEjecucion);
    }

    #[test]
    fn test_missing_or_blank_is_planning() {
        assert_eq!(map_status(None), ProjectStatus::Planificacion);
        assert_eq!(map_status(Some("")), ProjectStatus::Planificacion);
        assert_eq!(map_status(Some("   ")), ProjectStatus::Planificacion);
    }

    #[test]
    fn test_unmatched_is_execution() {
        assert_eq!(map_status(Some("activo")), ProjectStatus::EnEjecucion);
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(map_status(Some("Terminado")), ProjectStatus::Completado);
        assert_eq!(map_status(Some("Obra finalizada")), ProjectStatus::EnEjecucion);
        assert_eq!(map_status(Some("Pausado")), ProjectStatus::Suspendido);
        assert_eq!(map_status(Some("En revisión")), ProjectStatus::EnEvaluacion);
        assert_eq!(map_status(Some("Planeación")), ProjectStatus::Planificacion);
        // "ejecucion" is checked before "suspendido"
        assert_eq!(
            map_status(Some("Ejecución suspendida")),
            ProjectStatus::EnEjecucion
        );
    }

    #[test]
    fn test_matches_name() {
        assert!(ProjectStatus::EnEjecucion.matches_name("en ejecución"));
        assert!(ProjectStatus::EnEjecucion.matches_name("EnEjecucion"));
        assert!(!ProjectStatus::EnEjecucion.matches_name("Completado"));
    }

    proptest! {
        /// Property: every input maps to one of the five statuses without panicking.
        #[test]
        fn prop_map_status_is_total(raw in ".*") {
            let status = map_status(Some(&raw));
            prop_assert!(ProjectStatus::ALL.contains(&status));
        }
    }
}
