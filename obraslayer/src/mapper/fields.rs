//! Declarative property fallback chains
//!
//! Every domain attribute is read through a [`FieldChain`]: an ordered list
//! of candidate property keys plus an optional default. The chains for the
//! known datasets are the constants at the bottom of this module.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

/// Default start date for units without a usable `fecha_inicio`.
pub const DEFAULT_START_DATE: &str = "2024-01-01";

/// Default end date for units without a usable `fecha_fin`.
pub const DEFAULT_END_DATE: &str = "2024-12-31";

/// Default for responsible-entity fields.
pub const DEFAULT_RESPONSIBLE: &str = "No especificado";

/// Default for free-text classification fields.
pub const DEFAULT_UNSPECIFIED: &str = "Sin especificar";

/// Default BPIN when the unit has none.
pub const DEFAULT_BPIN: &str = "0";

/// Ordered candidate keys for one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldChain {
    keys: &'static [&'static str],
    default: Option<&'static str>,
}

impl FieldChain {
    /// Creates a chain with no default.
    pub const fn new(keys: &'static [&'static str]) -> Self {
        Self {
            keys,
            default: None,
        }
    }

    /// Sets the text default used when no candidate key is present.
    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    /// Candidate keys in lookup order.
    pub fn keys(&self) -> &'static [&'static str] {
        self.keys
    }

    /// Returns the first candidate value that is present and not empty.
    ///
    /// `null`, empty strings and whitespace-only strings count as absent.
    pub fn first_present<'a>(&self, properties: &'a Map<String, Value>) -> Option<&'a Value> {
        self.keys
            .iter()
            .filter_map(|key| properties.get(*key))
            .find(|value| is_present(value))
    }

    /// Resolves the attribute as text, falling back to the chain default.
    pub fn text(&self, properties: &Map<String, Value>) -> Option<String> {
        self.keys
            .iter()
            .filter_map(|key| properties.get(*key))
            .find_map(value_as_text)
            .or_else(|| self.default.map(str::to_string))
    }

    /// Resolves the attribute as text with an explicit fallback.
    pub fn text_or(&self, properties: &Map<String, Value>, fallback: &str) -> String {
        self.text(properties)
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Resolves the first candidate that holds a number.
    ///
    /// Candidates that are present but not numeric are skipped.
    pub fn number(&self, properties: &Map<String, Value>) -> Option<f64> {
        self.keys
            .iter()
            .filter_map(|key| properties.get(*key))
            .find_map(value_as_number)
    }

    /// Resolves a non-negative count, rounding fractional values.
    pub fn integer(&self, properties: &Map<String, Value>) -> Option<u64> {
        self.number(properties)
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n.round() as u64)
    }

    /// Resolves the first candidate that holds a date, as `YYYY-MM-DD`.
    pub fn date(&self, properties: &Map<String, Value>) -> Option<String> {
        self.keys
            .iter()
            .filter_map(|key| properties.get(*key))
            .find_map(value_as_date)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .or_else(|| self.default.map(str::to_string))
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Renders scalar values as trimmed text. Integral numbers lose their `.0`.
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(i.to_string()),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", f as i64)),
            _ => Some(n.to_string()),
        },
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads numbers and numeric strings.
pub fn value_as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Parses a numeric string with optional currency symbol and separators.
///
/// When both `.` and `,` appear, the last one is the decimal separator.
/// Repeated separators are thousands separators. A single comma followed
/// by exactly three digits is a thousands separator, any other single
/// separator is decimal.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ' ' | '\u{a0}' | '%'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let dots = cleaned.matches('.').count();
    let commas = cleaned.matches(',').count();

    let canonical = match (dots, commas) {
        (0, 0) => cleaned,
        (_, 0) if dots > 1 => cleaned.replace('.', ""),
        (_, 0) => cleaned,
        (0, 1) => {
            let after = cleaned.rsplit(',').next().map_or(0, str::len);
            if after == 3 {
                cleaned.replace(',', "")
            } else {
                cleaned.replace(',', ".")
            }
        }
        (0, _) => cleaned.replace(',', ""),
        _ => {
            let last_dot = cleaned.rfind('.').unwrap_or(0);
            let last_comma = cleaned.rfind(',').unwrap_or(0);
            if last_comma > last_dot {
                cleaned.replace('.', "").replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
    };

    canonical.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Reads dates in the formats the datasets use.
///
/// Numbers are epoch milliseconds (ArcGIS exports). Strings may be
/// `YYYY-MM-DD`, RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS`
/// or `DD/MM/YYYY`.
pub fn value_as_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => {
            let millis = n.as_i64()?;
            DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
        }
        Value::String(s) => parse_date(s),
        _ => None,
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%d/%m/%Y").ok()
}

// =============================================================================
// Chains for the known datasets
// =============================================================================

pub const ID: FieldChain = FieldChain::new(&["upid", "identificador", "id_unidad", "id", "objectid"]);
pub const BPIN: FieldChain = FieldChain::new(&["bpin", "BPIN", "codigo_bpin"]).with_default(DEFAULT_BPIN);

/// Name chain for equipment sites: nickname, explicit name, section id.
pub const NAME: FieldChain = FieldChain::new(&["nickname", "nombre_up", "nombre_unidad", "identificador"]);

/// Name chain for road segments: the section identifier comes before the
/// generic identifier since segments rarely carry a nickname.
pub const NAME_VIAL: FieldChain =
    FieldChain::new(&["nickname", "nombre_up", "id_via", "tramo", "identificador"]);

pub const STATUS: FieldChain = FieldChain::new(&["estado", "estado_unidad_proyecto", "status"]);

/// Combined columns whose value must be split by prefix.
pub const COMUNA_CORREGIMIENTO: FieldChain = FieldChain::new(&["comuna_corregimiento"]);
pub const BARRIO_VEREDA: FieldChain = FieldChain::new(&["barrio_vereda"]);

/// Dedicated columns, taken as they are.
pub const COMUNA: FieldChain = FieldChain::new(&["comuna"]);
pub const CORREGIMIENTO: FieldChain = FieldChain::new(&["corregimiento"]);
pub const BARRIO: FieldChain = FieldChain::new(&["barrio"]);
pub const VEREDA: FieldChain = FieldChain::new(&["vereda"]);

pub const BUDGET: FieldChain = FieldChain::new(&["presupuesto_base", "ppto_base", "presupuesto"]);
pub const EXECUTED: FieldChain = FieldChain::new(&["ejecucion_financiera", "ejecutado"]);
pub const PAID: FieldChain = FieldChain::new(&["pagos_realizados", "pagado"]);
pub const BENEFICIARIES: FieldChain =
    FieldChain::new(&["usuarios_beneficiarios", "beneficiarios"]);
pub const PROGRESS: FieldChain = FieldChain::new(&["avance_obra", "avance_fisico"]);

pub const START_DATE: FieldChain =
    FieldChain::new(&["fecha_inicio", "fecha_inicio_real", "fecha_inicio_planeado"])
        .with_default(DEFAULT_START_DATE);
pub const END_DATE: FieldChain =
    FieldChain::new(&["fecha_fin", "fecha_fin_real", "fecha_fin_planeado"])
        .with_default(DEFAULT_END_DATE);

pub const RESPONSIBLE: FieldChain =
    FieldChain::new(&["nombre_centro_gestor", "centro_gestor", "responsable"])
        .with_default(DEFAULT_RESPONSIBLE);
pub const INTERVENTION_TYPE: FieldChain =
    FieldChain::new(&["tipo_intervencion", "intervencion"]).with_default(DEFAULT_UNSPECIFIED);
pub const WORK_CLASS: FieldChain =
    FieldChain::new(&["clase_obra", "clase_up", "tipo_equipamiento"]).with_default(DEFAULT_UNSPECIFIED);
pub const WORK_CLASS_VIAL: FieldChain =
    FieldChain::new(&["clase_obra", "clase_up", "tipo_via"]).with_default(DEFAULT_UNSPECIFIED);

pub const DESCRIPTION: FieldChain =
    FieldChain::new(&["descripcion_intervencion", "descripcion"]);
pub const ADDRESS: FieldChain = FieldChain::new(&["direccion", "direccion_up"]);
pub const FUNDING_SOURCE: FieldChain =
    FieldChain::new(&["fuente_financiacion", "fuente_financiamiento"]);
pub const YEAR: FieldChain = FieldChain::new(&["ano", "anio", "vigencia"]);
