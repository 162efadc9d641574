//! SQLite-backed facility table.
//!
//! Every call opens its own read-only connection and drops it before
//! returning, so the store holds no handle between calls and can be shared
//! across threads. Province and city filters run inside SQLite through
//! scalar functions that call the same matcher code as the in-memory store.

use crate::error::{Result, StoreError};
use odcaf_search::{
    Column, ColumnInfo, FacilityRecord, FacilityStore, ScanFilter, Schema, field_contains,
    normalize, province_matches,
};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row, params_from_iter};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

/// Default table name produced by the ingestion step.
pub const DEFAULT_TABLE: &str = "facilities";

const CONTAINS_FN: &str = "odcaf_contains";
const PROVINCE_FN: &str = "odcaf_province_match";

/// Read-only view of one table in an SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    table: String,
}

impl SqliteStore {
    /// Point at a database file using the default table. No I/O happens
    /// until the first call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// Use a different table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        if !is_identifier(&table) {
            return Err(StoreError::InvalidTable(table));
        }
        self.table = table;
        Ok(self)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Open the database and confirm the table exists.
    pub fn check(&self) -> Result<Schema> {
        let conn = self.connect()?;
        self.read_schema(&conn)
    }

    fn connect(&self) -> Result<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.path, flags)?;
        register_functions(&conn)?;
        Ok(conn)
    }

    fn read_schema(&self, conn: &Connection) -> Result<Schema> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote(&self.table)))?;
        let columns = stmt
            .query_map([], |row| {
                Ok(ColumnInfo {
                    name: row.get("name")?,
                    declared_type: row.get("type")?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if columns.is_empty() {
            return Err(StoreError::MissingTable(self.table.clone()));
        }
        Ok(Schema { columns })
    }

    fn scan_rows(
        &self,
        filter: &ScanFilter,
        visit: &mut dyn FnMut(FacilityRecord) -> ControlFlow<()>,
    ) -> Result<()> {
        let conn = self.connect()?;
        let schema = self.read_schema(&conn)?;

        let mut clauses = Vec::new();
        let mut params = Vec::new();

        if let Some(province) = &filter.province {
            params.push(province.as_str().to_string());
            clauses.push(format!(
                "{PROVINCE_FN}(?{}, {})",
                params.len(),
                column_expr(&schema, Column::Province)
            ));
        }

        if let Some(city) = &filter.city {
            params.push(city.as_str().to_string());
            let n = params.len();
            let any_field = [Column::City, Column::Locality, Column::Provider]
                .iter()
                .map(|c| format!("{CONTAINS_FN}({}, ?{n})", column_expr(&schema, *c)))
                .collect::<Vec<_>>()
                .join(" OR ");
            clauses.push(format!("({any_field})"));
        }

        let mut sql = format!("SELECT * FROM {}", quote(&self.table));
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        tracing::trace!(%sql, "scanning facilities");

        let mut stmt = conn.prepare(&sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query(params_from_iter(params.iter()))?;

        while let Some(row) = rows.next()? {
            if visit(read_record(row, &names)?).is_break() {
                break;
            }
        }
        Ok(())
    }

    fn distinct_values(&self, column: Column) -> Result<Vec<String>> {
        let conn = self.connect()?;
        let schema = self.read_schema(&conn)?;
        if schema.declared_type(column.table_name()).is_none() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT DISTINCT {} FROM {}",
            quote(column.table_name()),
            quote(&self.table)
        );
        let mut stmt = conn.prepare(&sql)?;
        let values = stmt
            .query_map([], |row| Ok(value_to_string(row.get_ref(0)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(values)
    }
}

impl FacilityStore for SqliteStore {
    fn schema(&self) -> odcaf_search::Result<Schema> {
        Ok(self.check()?)
    }

    fn scan(
        &self,
        filter: &ScanFilter,
        visit: &mut dyn FnMut(FacilityRecord) -> ControlFlow<()>,
    ) -> odcaf_search::Result<()> {
        Ok(self.scan_rows(filter, visit)?)
    }

    fn distinct(&self, column: Column) -> odcaf_search::Result<Vec<String>> {
        Ok(self.distinct_values(column)?)
    }
}

fn register_functions(conn: &Connection) -> Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    conn.create_scalar_function(CONTAINS_FN, 2, flags, |ctx| {
        let field = value_to_string(ctx.get_raw(0));
        let needle = normalize(&value_to_string(ctx.get_raw(1)));
        Ok(field_contains(&field, &needle))
    })?;

    conn.create_scalar_function(PROVINCE_FN, 2, flags, |ctx| {
        let wanted = normalize(&value_to_string(ctx.get_raw(0)));
        let stored = value_to_string(ctx.get_raw(1));
        Ok(province_matches(&wanted, &stored))
    })?;

    Ok(())
}

fn read_record(row: &Row<'_>, names: &[String]) -> rusqlite::Result<FacilityRecord> {
    let mut record = FacilityRecord::default();
    for (idx, name) in names.iter().enumerate() {
        let value = value_to_string(row.get_ref(idx)?);
        match Column::from_table_name(name) {
            Some(Column::Name) => record.name = value,
            Some(Column::FacilityType) => record.facility_type = value,
            Some(Column::City) => record.city = value,
            Some(Column::Province) => record.province_code = value,
            Some(Column::StreetNumber) => record.street_number = value,
            Some(Column::StreetName) => record.street_name = value,
            Some(Column::PostalCode) => record.postal_code = value,
            Some(Column::Provider) => record.provider = value,
            Some(Column::Locality) => record.locality = value,
            None => {
                record.extra.insert(name.clone(), value);
            }
        }
    }
    Ok(record)
}

/// Column reference, or an empty literal when the table lacks the column.
fn column_expr(schema: &Schema, column: Column) -> String {
    if schema.declared_type(column.table_name()).is_some() {
        quote(column.table_name())
    } else {
        "''".to_string()
    }
}

/// Text form of any SQLite value; NULL and blobs become empty.
fn value_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use odcaf_search::resolve_province;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, SqliteStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("odcaf.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE facilities (
                "index" INTEGER,
                facility_name TEXT,
                odcaf_facility_type TEXT,
                city TEXT,
                prov_terr TEXT,
                csd_name TEXT,
                latitude REAL
            );
            INSERT INTO facilities VALUES (0, 'Musée McCord', 'museum', 'Montréal', 'qc', 'Montreal', 45.504);
            INSERT INTO facilities VALUES (1, 'Art Gallery of Ontario', 'gallery', 'Toronto', 'on', 'Toronto', NULL);
            INSERT INTO facilities VALUES (2, 'Salle Bourgie', 'theatre/performance and concert hall', '', 'qc', 'Montréal', NULL);
            "#,
        )
        .unwrap();
        (dir, SqliteStore::new(path))
    }

    fn scan_names(store: &SqliteStore, filter: &ScanFilter) -> Vec<String> {
        let mut names = Vec::new();
        store
            .scan_rows(filter, &mut |r| {
                names.push(r.name);
                ControlFlow::Continue(())
            })
            .unwrap();
        names
    }

    #[test]
    fn test_schema_reads_declared_types() {
        let (_dir, store) = fixture();
        let schema = store.check().unwrap();
        assert_eq!(schema.declared_type("facility_name"), Some("TEXT"));
        assert_eq!(schema.declared_type("latitude"), Some("REAL"));
        assert_eq!(schema.columns[0].name, "index");
    }

    #[test]
    fn test_missing_table() {
        let (_dir, store) = fixture();
        let store = store.with_table("nope").unwrap();
        assert!(matches!(store.check(), Err(StoreError::MissingTable(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::new(dir.path().join("absent.db"));
        assert!(matches!(store.check(), Err(StoreError::Sqlite(_))));
    }

    #[test]
    fn test_invalid_table_name() {
        assert!(SqliteStore::new("x.db").with_table("facilities; DROP").is_err());
    }

    #[test]
    fn test_rows_map_to_records() {
        let (_dir, store) = fixture();
        let mut records = Vec::new();
        store
            .scan_rows(&ScanFilter::default(), &mut |r| {
                records.push(r);
                ControlFlow::Continue(())
            })
            .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "Musée McCord");
        assert_eq!(records[0].locality, "Montreal");
        assert_eq!(records[0].extra.get("latitude").map(String::as_str), Some("45.504"));
        assert_eq!(records[1].extra.get("latitude").map(String::as_str), Some(""));
        assert_eq!(records[2].extra.get("index").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_pushdown_filters() {
        let (_dir, store) = fixture();
        let filter = ScanFilter {
            province: Some(resolve_province("Québec")),
            city: Some(normalize("montreal")),
        };
        assert_eq!(scan_names(&store, &filter), vec!["Musée McCord", "Salle Bourgie"]);

        let filter = ScanFilter {
            province: Some(resolve_province("Ontario")),
            city: None,
        };
        assert_eq!(scan_names(&store, &filter), vec!["Art Gallery of Ontario"]);
    }

    #[test]
    fn test_pushdown_city_through_provider_and_named_provinces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("named.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE facilities (facility_name TEXT, city TEXT, prov_terr TEXT, provider TEXT);
             INSERT INTO facilities VALUES ('Fisheries Museum', '', 'Nova Scotia', 'Town of Lunenburg');
             INSERT INTO facilities VALUES ('The Rooms', 'St. John''s', 'Newfoundland and Labrador', 'Province of NL');
             INSERT INTO facilities VALUES ('Beaverbrook', 'Fredericton', 'New Brunswick', 'Beaverbrook Foundation');",
        )
        .unwrap();
        let store = SqliteStore::new(path);

        let filter = ScanFilter {
            province: None,
            city: Some(normalize("lunenburg")),
        };
        assert_eq!(scan_names(&store, &filter), vec!["Fisheries Museum"]);

        let filter = ScanFilter {
            province: Some(resolve_province("Alberta")),
            city: None,
        };
        assert!(scan_names(&store, &filter).is_empty());

        let filter = ScanFilter {
            province: Some(resolve_province("N.-É.")),
            city: None,
        };
        assert_eq!(scan_names(&store, &filter), vec!["Fisheries Museum"]);
    }

    #[test]
    fn test_pushdown_with_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("slim.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE facilities (facility_name TEXT, city TEXT);
             INSERT INTO facilities VALUES ('Hall', 'Regina');",
        )
        .unwrap();
        let store = SqliteStore::new(path);
        let filter = ScanFilter {
            province: None,
            city: Some(normalize("regina")),
        };
        assert_eq!(scan_names(&store, &filter), vec!["Hall"]);
        assert!(store.distinct_values(Column::Provider).unwrap().is_empty());
    }

    #[test]
    fn test_distinct() {
        let (_dir, store) = fixture();
        let mut cities = store.distinct_values(Column::City).unwrap();
        cities.sort();
        assert_eq!(cities, vec!["", "Montréal", "Toronto"]);
    }
}
