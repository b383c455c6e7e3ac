//! In-memory name/ID index with create-time name reservations.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use super::error::ManagerError;
use crate::entities::ConfigMap;

#[derive(Debug, Default)]
pub(crate) struct Index {
    /// Records by ID, in creation order.
    records: IndexMap<String, ConfigMap>,
    /// Name → ID.
    names: HashMap<String, String>,
    /// Names claimed by a create whose payload is still being written.
    reserved: HashSet<String>,
}

impl Index {
    pub(crate) fn from_records(records: Vec<ConfigMap>) -> Self {
        let mut index = Index::default();
        for record in records {
            index.names.insert(record.name.clone(), record.id.clone());
            index.records.insert(record.id.clone(), record);
        }
        index
    }

    /// Claim `name` for a create. Returns false if it is taken or reserved.
    pub(crate) fn reserve(&mut self, name: &str) -> bool {
        if self.names.contains_key(name) || self.reserved.contains(name) {
            return false;
        }
        self.reserved.insert(name.to_string());
        true
    }

    pub(crate) fn release(&mut self, name: &str) {
        self.reserved.remove(name);
    }

    /// Turn a reservation into a visible record.
    pub(crate) fn publish(&mut self, record: ConfigMap) {
        self.reserved.remove(&record.name);
        self.names.insert(record.name.clone(), record.id.clone());
        self.records.insert(record.id.clone(), record);
    }

    pub(crate) fn contains_id(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Exact name, then exact ID, then unique ID prefix.
    pub(crate) fn resolve(&self, name_or_id: &str) -> Result<&ConfigMap, ManagerError> {
        if let Some(id) = self.names.get(name_or_id) {
            if let Some(record) = self.records.get(id) {
                return Ok(record);
            }
        }
        if let Some(record) = self.records.get(name_or_id) {
            return Ok(record);
        }
        if name_or_id.is_empty() {
            return Err(ManagerError::NotFound(name_or_id.to_string()));
        }

        let mut matches = self
            .records
            .values()
            .filter(|record| record.id.starts_with(name_or_id));
        match (matches.next(), matches.next()) {
            (Some(record), None) => Ok(record),
            (Some(_), Some(_)) => Err(ManagerError::Ambiguous(name_or_id.to_string())),
            _ => Err(ManagerError::NotFound(name_or_id.to_string())),
        }
    }

    /// Remove by ID, returning the record and its position.
    pub(crate) fn remove(&mut self, id: &str) -> Option<(usize, ConfigMap)> {
        let (position, _, record) = self.records.shift_remove_full(id)?;
        self.names.remove(&record.name);
        Some((position, record))
    }

    /// Put back a record removed by `remove`.
    pub(crate) fn restore(&mut self, position: usize, record: ConfigMap) {
        self.names.insert(record.name.clone(), record.id.clone());
        let position = position.min(self.records.len());
        self.records
            .shift_insert(position, record.id.clone(), record);
    }

    pub(crate) fn records(&self) -> Vec<ConfigMap> {
        self.records.values().cloned().collect()
    }
}
