//! In-memory field store keyed by record id.

use crate::types::{FieldName, FieldValue, RecordId};
use indexmap::IndexMap;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Fields cached for a single record.
#[derive(Debug, Default)]
struct Record {
    fields: HashMap<FieldName, FieldValue>,
}

impl Record {
    fn has_all(&self, fields: &[FieldName]) -> bool {
        fields.iter().all(|field| self.fields.contains_key(field))
    }
}

/// Shared cache of partial analysis results.
///
/// Records are created on first write and live for the life of the process.
/// Iteration follows record creation order. All access goes through one
/// read/write lock, so readers never observe a half-applied `set`.
#[derive(Debug, Clone, Default)]
pub struct FieldStore {
    records: Arc<RwLock<IndexMap<RecordId, Record>>>,
}

impl FieldStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a field value; `None` for an unknown id or unset field.
    pub fn get(&self, id: &RecordId, field: FieldName) -> Option<FieldValue> {
        self.records
            .read()
            .get(id)
            .and_then(|record| record.fields.get(&field))
            .cloned()
    }

    /// Store a value under its own field, creating the record if needed.
    pub fn set(&self, id: &RecordId, value: FieldValue) {
        let field = value.name();
        let mut records = self.records.write();
        if !records.contains_key(id) {
            debug!("creating record (id={id})");
        }
        records
            .entry(id.clone())
            .or_default()
            .fields
            .insert(field, value);
        debug!("stored field (id={id}, field={field})");
    }

    /// For every record holding all `fields`, in creation order, return the
    /// value of the first listed field. An empty list yields nothing.
    pub fn get_all(&self, fields: &[FieldName]) -> Vec<FieldValue> {
        let Some(first) = fields.first() else {
            return Vec::new();
        };
        self.records
            .read()
            .values()
            .filter(|record| record.has_all(fields))
            .filter_map(|record| record.fields.get(first).cloned())
            .collect()
    }

    /// Read `fields` in order from one consistent view of the record.
    ///
    /// Returns the first absent field on failure.
    pub fn resolve(
        &self,
        id: &RecordId,
        fields: &[FieldName],
    ) -> Result<Vec<FieldValue>, FieldName> {
        let records = self.records.read();
        let record = records.get(id);
        fields
            .iter()
            .map(|field| {
                record
                    .and_then(|record| record.fields.get(field))
                    .cloned()
                    .ok_or(*field)
            })
            .collect()
    }

    /// True when a record exists for `id`.
    pub fn contains(&self, id: &RecordId) -> bool {
        self.records.read().contains_key(id)
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// True when no record has been written yet.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::FieldStore;
    use crate::types::{FieldName, FieldValue, RecordId};
    use askql_rs_protocol::Table;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn question(text: &str) -> FieldValue {
        FieldValue::Question(text.to_string())
    }

    fn sql(text: &str) -> FieldValue {
        FieldValue::Sql(text.to_string())
    }

    #[test]
    fn get_is_absent_until_set_then_last_write_wins() {
        let store = FieldStore::new();
        let id = RecordId::from("id1");
        assert_eq!(store.get(&id, FieldName::Sql), None);
        assert!(!store.contains(&id));

        store.set(&id, sql("SELECT 1"));
        assert_eq!(store.get(&id, FieldName::Sql), Some(sql("SELECT 1")));
        assert_eq!(store.get(&id, FieldName::Question), None);

        store.set(&id, sql("SELECT 2"));
        assert_eq!(store.get(&id, FieldName::Sql), Some(sql("SELECT 2")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_id_is_absent() {
        let store = FieldStore::new();
        store.set(&RecordId::from("known"), sql("SELECT 1"));
        assert_eq!(store.get(&RecordId::from("unknown"), FieldName::Sql), None);
    }

    #[test]
    fn df_is_rewritten_on_rerun() {
        let store = FieldStore::new();
        let id = RecordId::from("id1");
        let first = Arc::new(Table::new(vec!["n".into()], vec![vec![json!(1)]]));
        let second = Arc::new(Table::new(vec!["n".into()], vec![vec![json!(2)]]));
        store.set(&id, FieldValue::Df(first));
        store.set(&id, FieldValue::Df(second.clone()));
        assert_eq!(store.get(&id, FieldName::Df), Some(FieldValue::Df(second)));
    }

    #[test]
    fn get_all_follows_creation_order_and_skips_incomplete_records() {
        let store = FieldStore::new();
        store.set(&RecordId::from("b"), question("second"));
        store.set(&RecordId::from("x"), sql("SELECT 0"));
        store.set(&RecordId::from("a"), question("third"));
        store.set(&RecordId::from("c"), question("first"));
        // Updating an old record keeps its original position.
        store.set(&RecordId::from("b"), sql("SELECT 1"));

        assert_eq!(
            store.get_all(&[FieldName::Question]),
            vec![question("second"), question("third"), question("first")]
        );
    }

    #[test]
    fn get_all_with_several_fields_returns_first_field_of_complete_records() {
        let store = FieldStore::new();
        let full = RecordId::from("full");
        let partial = RecordId::from("partial");
        store.set(&full, question("with sql"));
        store.set(&full, sql("SELECT 1"));
        store.set(&partial, question("without sql"));

        assert_eq!(
            store.get_all(&[FieldName::Question, FieldName::Sql]),
            vec![question("with sql")]
        );
        assert_eq!(
            store.get_all(&[FieldName::Sql, FieldName::Question]),
            vec![sql("SELECT 1")]
        );
        assert!(store.get_all(&[]).is_empty());
    }

    #[test]
    fn resolve_reports_first_missing_field_in_order() {
        let store = FieldStore::new();
        let id = RecordId::from("id1");
        store.set(&id, sql("SELECT 1"));

        assert_eq!(
            store.resolve(&id, &[FieldName::Df, FieldName::Question, FieldName::Sql]),
            Err(FieldName::Df)
        );
        assert_eq!(
            store.resolve(&id, &[FieldName::Sql, FieldName::Question]),
            Err(FieldName::Question)
        );
        assert_eq!(store.resolve(&id, &[FieldName::Sql]), Ok(vec![sql("SELECT 1")]));
        assert_eq!(
            store.resolve(&RecordId::from("missing"), &[FieldName::Sql]),
            Err(FieldName::Sql)
        );
    }

    #[test]
    fn clones_share_records() {
        let store = FieldStore::new();
        let other = store.clone();
        other.set(&RecordId::from("id1"), sql("SELECT 1"));
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }
}
