//! Read-only access to the facility table.
//!
//! The engine only needs three primitives from a store: describe the table,
//! walk rows in natural order with an optional pushed-down filter, and list
//! the distinct values of a column. Any SQL or storage detail stays behind
//! [`FacilityStore`].

use crate::error::Result;
use crate::matcher::{city_matches, province_matches};
use crate::normalize::NormalizedString;
use crate::record::{Column, ColumnInfo, FacilityRecord, Schema};
use std::collections::BTreeSet;
use std::ops::ControlFlow;

/// Filters a store evaluates while scanning.
///
/// Both fields are already normalized; `province` is the output of
/// [`crate::resolve_province`]. Absent fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanFilter {
    pub province: Option<NormalizedString>,
    pub city: Option<NormalizedString>,
}

impl ScanFilter {
    /// True when neither filter is set.
    pub fn is_empty(&self) -> bool {
        self.province.is_none() && self.city.is_none()
    }

    /// Evaluate the filter against a record.
    ///
    /// Stores that cannot push the filter into their engine call this; the
    /// SQLite store registers the same matcher functions instead.
    pub fn accepts(&self, record: &FacilityRecord) -> bool {
        let province_ok = self
            .province
            .as_ref()
            .is_none_or(|p| province_matches(p, &record.province_code));
        let city_ok = self.city.as_ref().is_none_or(|c| city_matches(c, record));
        province_ok && city_ok
    }
}

/// Read-only facility table.
///
/// Implementations acquire whatever they need per call and release it on
/// every exit path, so any number of callers may share one store.
pub trait FacilityStore: Send + Sync {
    /// Column declarations of the table.
    fn schema(&self) -> Result<Schema>;

    /// Visit rows accepted by `filter`, in the store's natural order,
    /// until the visitor breaks or rows run out.
    fn scan(
        &self,
        filter: &ScanFilter,
        visit: &mut dyn FnMut(FacilityRecord) -> ControlFlow<()>,
    ) -> Result<()>;

    /// Distinct raw values of a column, any order.
    fn distinct(&self, column: Column) -> Result<Vec<String>>;
}

impl<S: FacilityStore + ?Sized> FacilityStore for &S {
    fn schema(&self) -> Result<Schema> {
        (**self).schema()
    }

    fn scan(
        &self,
        filter: &ScanFilter,
        visit: &mut dyn FnMut(FacilityRecord) -> ControlFlow<()>,
    ) -> Result<()> {
        (**self).scan(filter, visit)
    }

    fn distinct(&self, column: Column) -> Result<Vec<String>> {
        (**self).distinct(column)
    }
}

impl<S: FacilityStore + ?Sized> FacilityStore for std::sync::Arc<S> {
    fn schema(&self) -> Result<Schema> {
        (**self).schema()
    }

    fn scan(
        &self,
        filter: &ScanFilter,
        visit: &mut dyn FnMut(FacilityRecord) -> ControlFlow<()>,
    ) -> Result<()> {
        (**self).scan(filter, visit)
    }

    fn distinct(&self, column: Column) -> Result<Vec<String>> {
        (**self).distinct(column)
    }
}

/// In-memory store over a fixed vector of records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<FacilityRecord>,
}

impl MemoryStore {
    /// Wrap records; their order is the scan order.
    pub fn new(records: Vec<FacilityRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FacilityRecord] {
        &self.records
    }
}

impl FromIterator<FacilityRecord> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = FacilityRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl FacilityStore for MemoryStore {
    fn schema(&self) -> Result<Schema> {
        let mut columns: Vec<ColumnInfo> = Column::all()
            .iter()
            .map(|c| ColumnInfo {
                name: c.table_name().to_string(),
                declared_type: "TEXT".to_string(),
            })
            .collect();

        let extra: BTreeSet<&str> = self
            .records
            .iter()
            .flat_map(|r| r.extra.keys().map(String::as_str))
            .collect();
        columns.extend(extra.into_iter().map(|name| ColumnInfo {
            name: name.to_string(),
            declared_type: "TEXT".to_string(),
        }));

        Ok(Schema { columns })
    }

    fn scan(
        &self,
        filter: &ScanFilter,
        visit: &mut dyn FnMut(FacilityRecord) -> ControlFlow<()>,
    ) -> Result<()> {
        for record in self.records.iter().filter(|r| filter.accepts(r)) {
            if visit(record.clone()).is_break() {
                break;
            }
        }
        Ok(())
    }

    fn distinct(&self, column: Column) -> Result<Vec<String>> {
        let values: BTreeSet<&str> = self.records.iter().map(|r| r.get(column)).collect();
        Ok(values.into_iter().map(String::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::resolve_province;
    use crate::normalize::normalize;

    fn store() -> MemoryStore {
        MemoryStore::new(vec![
            FacilityRecord::new("Royal BC Museum", "Museum", "Victoria", "bc"),
            FacilityRecord::new("Art Gallery of Ontario", "Gallery", "Toronto", "on"),
            FacilityRecord::new("Musée d'art de Joliette", "Museum", "Joliette", "qc"),
        ])
    }

    fn collect(store: &MemoryStore, filter: &ScanFilter) -> Vec<String> {
        let mut names = Vec::new();
        store
            .scan(filter, &mut |r| {
                names.push(r.name);
                ControlFlow::Continue(())
            })
            .unwrap();
        names
    }

    #[test]
    fn test_scan_keeps_order() {
        let names = collect(&store(), &ScanFilter::default());
        assert_eq!(
            names,
            vec!["Royal BC Museum", "Art Gallery of Ontario", "Musée d'art de Joliette"]
        );
    }

    #[test]
    fn test_scan_pushdown() {
        let filter = ScanFilter {
            province: Some(resolve_province("Ontario")),
            city: None,
        };
        assert_eq!(collect(&store(), &filter), vec!["Art Gallery of Ontario"]);

        let filter = ScanFilter {
            province: None,
            city: Some(normalize("JOLIETTE")),
        };
        assert_eq!(collect(&store(), &filter), vec!["Musée d'art de Joliette"]);
    }

    #[test]
    fn test_scan_stops_on_break() {
        let mut seen = 0;
        store()
            .scan(&ScanFilter::default(), &mut |_| {
                seen += 1;
                ControlFlow::Break(())
            })
            .unwrap();
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_schema_includes_extra_columns() {
        let mut record = FacilityRecord::new("A", "Museum", "B", "on");
        record.extra.insert("latitude".into(), "43.6".into());
        let schema = MemoryStore::new(vec![record]).schema().unwrap();
        assert_eq!(schema.declared_type("facility_name"), Some("TEXT"));
        assert_eq!(schema.declared_type("latitude"), Some("TEXT"));
    }
}
