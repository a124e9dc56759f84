//! Splitting of combined administrative-area fields
//!
//! The datasets store urban and rural areas in shared columns: one column
//! holds either a comuna or a corregimiento, another either a barrio or a
//! vereda.

/// Result of splitting the combined comuna/corregimiento column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComunaCorregimiento {
    pub comuna: Option<String>,
    pub corregimiento: Option<String>,
}

/// Result of splitting the combined barrio/vereda column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarrioVereda {
    pub barrio: Option<String>,
    pub vereda: Option<String>,
}

/// Splits a combined comuna/corregimiento value.
///
/// Values starting with "comuna" are comunas. Everything else, including a
/// bare place name such as "La Buitrera", is a corregimiento. At most one
/// side is ever populated.
pub fn split_comuna_corregimiento(raw: &str) -> ComunaCorregimiento {
    let value = raw.trim();
    if value.is_empty() {
        return ComunaCorregimiento::default();
    }

    if value.to_lowercase().starts_with("comuna") {
        ComunaCorregimiento {
            comuna: Some(value.to_string()),
            corregimiento: None,
        }
    } else {
        ComunaCorregimiento {
            comuna: None,
            corregimiento: Some(value.to_string()),
        }
    }
}

/// Splits a combined barrio/vereda value.
///
/// Only the literal value "vereda" (any case) is treated as a vereda; every
/// other value is a barrio.
pub fn split_barrio_vereda(raw: &str) -> BarrioVereda {
    let value = raw.trim();
    if value.is_empty() {
        return BarrioVereda::default();
    }

    if value.eq_ignore_ascii_case("vereda") {
        BarrioVereda {
            barrio: None,
            vereda: Some(value.to_string()),
        }
    } else {
        BarrioVereda {
            barrio: Some(value.to_string()),
            vereda: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comuna_prefix() {
        let split = split_comuna_corregimiento("Comuna 5");
        assert_eq!(split.comuna.as_deref(), Some("Comuna 5"));
        assert!(split.corregimiento.is_none());
    }

    #[test]
    fn test_corregimiento_prefix() {
        let split = split_comuna_corregimiento("Corregimiento Pance");
        assert!(split.comuna.is_none());
        assert_eq!(split.corregimiento.as_deref(), Some("Corregimiento Pance"));
    }

    #[test]
    fn test_bare_name_is_corregimiento() {
        let split = split_comuna_corregimiento("La Buitrera");
        assert!(split.comuna.is_none());
        assert_eq!(split.corregimiento.as_deref(), Some("La Buitrera"));
    }

    #[test]
    fn test_blank_values_yield_nothing() {
        assert_eq!(split_comuna_corregimiento("  "), ComunaCorregimiento::default());
        assert_eq!(split_barrio_vereda(""), BarrioVereda::default());
    }

    #[test]
    fn test_values_are_trimmed() {
        let split = split_comuna_corregimiento("  comuna 22 ");
        assert_eq!(split.comuna.as_deref(), Some("comuna 22"));
    }

    #[test]
    fn test_barrio_vereda() {
        let split = split_barrio_vereda(" VEREDA ");
        assert_eq!(split.vereda.as_deref(), Some("VEREDA"));
        assert!(split.barrio.is_none());

        let split = split_barrio_vereda("San Fernando");
        assert_eq!(split.barrio.as_deref(), Some("San Fernando"));
        assert!(split.vereda.is_none());
    }
}
