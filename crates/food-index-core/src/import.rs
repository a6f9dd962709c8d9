//! Import from the JSON export of the food composition table.
//!
//! The export is an array of objects keyed in Portuguese:
//!
//! ```json
//! [{ "Numero": 1, "Descricao": "Arroz, integral, cozido", "Umidade": 70.1,
//!    "Energia_kcal": 124, "Proteina": 2.6, "Carboidrato": 25.8,
//!    "Categoria": "Cereais e derivados" }]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{CatalogError, Result};
use crate::food::FoodRecord;

/// One row of the JSON export.
///
/// Numeric columns are read leniently: numbers and numeric strings are
/// accepted, floats are truncated where an integer is expected, and
/// anything else (missing, `null`, markers such as `"Tr"` or `"NA"`) reads
/// as zero.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceRow {
    #[serde(rename = "Numero", default, deserialize_with = "lenient_i32")]
    pub number: i32,
    #[serde(rename = "Descricao")]
    pub description: String,
    #[serde(rename = "Umidade", default, deserialize_with = "lenient_f64")]
    pub moisture: f64,
    #[serde(rename = "Energia_kcal", default, deserialize_with = "lenient_i32")]
    pub energy_kcal: i32,
    #[serde(rename = "Proteina", default, deserialize_with = "lenient_f64")]
    pub protein: f64,
    #[serde(rename = "Carboidrato", default, deserialize_with = "lenient_f64")]
    pub carbohydrate: f64,
    #[serde(rename = "Categoria")]
    pub category: String,
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()).unwrap_or(0.0))
}

fn lenient_i32<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().map(saturate).or_else(|| n.as_f64().map(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .map(saturate)
                .or_else(|| s.parse::<f64>().ok().map(truncate))
        }
        _ => None,
    };
    Ok(number.unwrap_or(0))
}

fn saturate(n: i64) -> i32 {
    n.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Toward zero; `as` saturates out-of-range values and maps NaN to 0.
fn truncate(n: f64) -> i32 {
    n.trunc() as i32
}

impl From<SourceRow> for FoodRecord {
    fn from(row: SourceRow) -> Self {
        FoodRecord::new(
            row.number,
            &row.description,
            row.moisture,
            row.energy_kcal,
            row.protein,
            row.carbohydrate,
            &row.category,
        )
    }
}

/// Parse a JSON export held in memory.
pub fn parse_json_records(content: &str) -> serde_json::Result<Vec<FoodRecord>> {
    let rows: Vec<SourceRow> = serde_json::from_str(content)?;
    Ok(rows.into_iter().map(FoodRecord::from).collect())
}

/// Read and parse a JSON export file.
pub fn read_json_records(path: &Path) -> Result<Vec<FoodRecord>> {
    let content = fs::read_to_string(path)?;
    let records = parse_json_records(&content).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), records = records.len(), "JSON export parsed");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EXPORT: &str = r#"[
        {"Numero": 1, "Descricao": "Arroz, integral, cozido", "Umidade": 70.1,
         "Energia_kcal": 124, "Proteina": 2.6, "Carboidrato": 25.8,
         "Categoria": "Cereais e derivados"},
        {"Numero": 2, "Descricao": "Sal", "Categoria": "Miscelaneas"}
    ]"#;

    #[test]
    fn test_parse_json_records() {
        let records = parse_json_records(EXPORT).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].description, "Arroz, integral, cozido");
        assert_eq!(records[0].energy_kcal, 124);
        assert_eq!(records[0].category, "Cereais e derivados");
        assert_eq!(records[1].energy_kcal, 0);
        assert_eq!(records[1].protein, 0.0);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(parse_json_records(r#"{"Numero": 1}"#).is_err());
    }

    fn single(row: &str) -> FoodRecord {
        let json = format!(
            r#"[{{"Numero": 9, "Descricao": "Ameixa", "Categoria": "Frutas", {row}}}]"#
        );
        let mut records = parse_json_records(&json).unwrap();
        assert_eq!(records.len(), 1);
        records.remove(0)
    }

    #[test]
    fn test_null_numbers_read_as_zero() {
        let record = single(r#""Umidade": null, "Proteina": null"#);
        assert_eq!(record.moisture, 0.0);
        assert_eq!(record.protein, 0.0);
    }

    #[test]
    fn test_fractional_energy_is_truncated() {
        assert_eq!(single(r#""Energia_kcal": 123.5"#).energy_kcal, 123);
        assert_eq!(single(r#""Energia_kcal": -7.9"#).energy_kcal, -7);
    }

    #[test]
    fn test_trace_markers_read_as_zero() {
        let record = single(r#""Proteina": "Tr", "Carboidrato": "NA", "Energia_kcal": "*""#);
        assert_eq!(record.protein, 0.0);
        assert_eq!(record.carbohydrate, 0.0);
        assert_eq!(record.energy_kcal, 0);
    }

    #[test]
    fn test_numeric_strings_are_parsed() {
        let record = single(r#""Umidade": " 83.8", "Energia_kcal": "96", "Proteina": "1.2""#);
        assert_eq!(record.moisture, 83.8);
        assert_eq!(record.energy_kcal, 96);
        assert_eq!(record.protein, 1.2);
        assert_eq!(single(r#""Energia_kcal": "45.6""#).energy_kcal, 45);
    }

    #[test]
    fn test_fractional_or_text_number_field() {
        let json = r#"[
            {"Numero": 12.0, "Descricao": "Pera", "Categoria": "Frutas"},
            {"Numero": "x", "Descricao": "Kiwi", "Categoria": "Frutas"},
            {"Numero": 99999999999, "Descricao": "Lima", "Categoria": "Frutas"}
        ]"#;
        let ids: Vec<i32> = parse_json_records(json).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, [12, 0, i32::MAX]);
    }

    #[test]
    fn test_read_json_records_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dados.json");
        fs::write(&path, "[{").unwrap();

        let err = read_json_records(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Json { .. }));
        assert!(err.to_string().contains("dados.json"));
    }
}
