//! Facility rows and table metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One immutable row of the facility table.
///
/// Identity is `name`; no other key is guaranteed unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityRecord {
    /// Facility name
    pub name: String,
    /// Stored category, e.g. "Art or cultural centre"
    pub facility_type: String,
    /// City as recorded by the provider
    pub city: String,
    /// Province or territory, usually a two-letter code
    pub province_code: String,
    /// Street number
    pub street_number: String,
    /// Street name
    pub street_name: String,
    /// Postal code
    pub postal_code: String,
    /// Data provider
    pub provider: String,
    /// Secondary locality spelling (census subdivision name)
    pub locality: String,
    /// Any other columns, passed through untouched
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl FacilityRecord {
    /// Create a record with the searchable fields set.
    pub fn new(
        name: impl Into<String>,
        facility_type: impl Into<String>,
        city: impl Into<String>,
        province_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            facility_type: facility_type.into(),
            city: city.into(),
            province_code: province_code.into(),
            ..Self::default()
        }
    }

    /// Set the street address.
    pub fn with_address(
        mut self,
        street_number: impl Into<String>,
        street_name: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        self.street_number = street_number.into();
        self.street_name = street_name.into();
        self.postal_code = postal_code.into();
        self
    }

    /// Set the provider.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Set the secondary locality.
    pub fn with_locality(mut self, locality: impl Into<String>) -> Self {
        self.locality = locality.into();
        self
    }

    /// Value of a known column.
    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::Name => &self.name,
            Column::FacilityType => &self.facility_type,
            Column::City => &self.city,
            Column::Province => &self.province_code,
            Column::StreetNumber => &self.street_number,
            Column::StreetName => &self.street_name,
            Column::PostalCode => &self.postal_code,
            Column::Provider => &self.provider,
            Column::Locality => &self.locality,
        }
    }

    /// One-line summary: `Name (Type) in City, PR`.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}) in {}, {}",
            self.name, self.facility_type, self.city, self.province_code
        )
    }

    /// Street address joined for display, empty parts skipped.
    pub fn address(&self) -> String {
        let street = [self.street_number.trim(), self.street_name.trim()]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        [street.as_str(), self.postal_code.trim()]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Multi-line detail block.
    pub fn detail_lines(&self) -> Vec<String> {
        vec![
            format!("Name: {}", self.name),
            format!("Type: {}", self.facility_type),
            format!("Location: {}, {}", self.city, self.province_code),
            format!("Address: {}", self.address()),
            format!("Provider: {}", self.provider),
        ]
    }
}

/// Columns the engine knows by meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Name,
    FacilityType,
    City,
    Province,
    StreetNumber,
    StreetName,
    PostalCode,
    Provider,
    Locality,
}

impl Column {
    /// Column name in the ODCAF table.
    pub fn table_name(&self) -> &'static str {
        match self {
            Column::Name => "facility_name",
            Column::FacilityType => "odcaf_facility_type",
            Column::City => "city",
            Column::Province => "prov_terr",
            Column::StreetNumber => "street_no",
            Column::StreetName => "street_name",
            Column::PostalCode => "postal_code",
            Column::Provider => "provider",
            Column::Locality => "csd_name",
        }
    }

    /// All known columns, in table order.
    pub fn all() -> &'static [Column] {
        &[
            Column::Name,
            Column::FacilityType,
            Column::Provider,
            Column::StreetNumber,
            Column::StreetName,
            Column::PostalCode,
            Column::City,
            Column::Province,
            Column::Locality,
        ]
    }

    /// Look up a column by its table name.
    pub fn from_table_name(name: &str) -> Option<Column> {
        Column::all()
            .iter()
            .copied()
            .find(|c| c.table_name() == name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Declared column types of the underlying table, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<ColumnInfo>,
}

/// A single column declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
}

impl Schema {
    /// Declared type for a column name.
    pub fn declared_type(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.declared_type.as_str())
    }

    /// Column name to declared type, as a map.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.declared_type.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let r = FacilityRecord::new("Royal BC Museum", "Museum", "Victoria", "bc");
        assert_eq!(r.summary(), "Royal BC Museum (Museum) in Victoria, bc");
    }

    #[test]
    fn test_address_skips_empty_parts() {
        let r = FacilityRecord::new("A", "B", "C", "on").with_address("", "Queen St W", "M5V 2Z5");
        assert_eq!(r.address(), "Queen St W, M5V 2Z5");

        let bare = FacilityRecord::new("A", "B", "C", "on");
        assert_eq!(bare.address(), "");
    }

    #[test]
    fn test_column_round_trip_names() {
        for column in Column::all() {
            assert_eq!(Column::from_table_name(column.table_name()), Some(*column));
        }
        assert_eq!(Column::from_table_name("latitude"), None);
    }

    #[test]
    fn test_schema_lookup() {
        let schema = Schema {
            columns: vec![ColumnInfo {
                name: "city".into(),
                declared_type: "TEXT".into(),
            }],
        };
        assert_eq!(schema.declared_type("city"), Some("TEXT"));
        assert_eq!(schema.to_map().len(), 1);
    }
}
