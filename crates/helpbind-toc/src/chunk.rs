//! Chunk documents: the id → page table.

use std::collections::HashMap;

use log::debug;

use crate::value::Value;

/// Where a TOC id points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// Target path as written in the chunk document (may start with `/`).
    pub path: String,
    /// Entry title.
    pub title: String,
}

/// Merged id → page table for a bundle.
///
/// Chunks are merged in the order they are added; a later chunk that reuses an id replaces the
/// earlier entry.
#[derive(Debug, Default, Clone)]
pub struct IdTable {
    /// Entries keyed by normalized id.
    entries: HashMap<String, PageInfo>,
}

impl IdTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one parsed chunk document into the table.
    ///
    /// A chunk maps each target path to `{i: [ids], t: [titles], b: [...]}`; ids pair
    /// positionally with titles, and ids without a title are ignored. Returns the number of
    /// ids added, or an error message when the document is not an object.
    pub fn merge_chunk(&mut self, chunk: &Value) -> Result<usize, &'static str> {
        let entries = chunk
            .entries()
            .ok_or("chunk document is not an object")?;

        let mut added = 0;
        for (path, info) in entries {
            let ids = info.get("i").map(Value::items).unwrap_or_default();
            let titles = info.get("t").map(Value::items).unwrap_or_default();
            for (id, title) in ids.iter().zip(titles) {
                let Some(id) = id.as_id() else {
                    debug!("ignoring non-scalar id in chunk entry {path}");
                    continue;
                };
                let title = title.as_id().unwrap_or_default();
                self.entries.insert(
                    id,
                    PageInfo {
                        path: path.clone(),
                        title,
                    },
                );
                added += 1;
            }
        }
        Ok(added)
    }

    /// Looks up an id.
    pub fn get(&self, id: &str) -> Option<&PageInfo> {
        self.entries.get(id)
    }

    /// Number of ids in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no ids.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_value;

    #[test]
    fn pairs_ids_with_titles() {
        let chunk = parse_value(
            "{'/Content/a.htm': {i: [0, 3], t: ['A', 'A again'], b: ['']},
              '/Content/b.htm': {i: ['x'], t: ['B']}}",
        )
        .unwrap();
        let mut table = IdTable::new();
        assert_eq!(table.merge_chunk(&chunk), Ok(3));
        assert_eq!(table.get("0").unwrap().path, "/Content/a.htm");
        assert_eq!(table.get("3").unwrap().title, "A again");
        assert_eq!(table.get("x").unwrap().title, "B");
    }

    #[test]
    fn ids_without_titles_are_dropped() {
        let chunk = parse_value("{'/a.htm': {i: [1, 2], t: ['one']}}").unwrap();
        let mut table = IdTable::new();
        assert_eq!(table.merge_chunk(&chunk), Ok(1));
        assert!(table.get("2").is_none());
    }

    #[test]
    fn later_chunks_replace_ids() {
        let mut table = IdTable::new();
        table
            .merge_chunk(&parse_value("{'/a.htm': {i: [1], t: ['A']}}").unwrap())
            .unwrap();
        table
            .merge_chunk(&parse_value("{'/b.htm': {i: [1], t: ['B']}}").unwrap())
            .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("1").unwrap().path, "/b.htm");
    }

    #[test]
    fn rejects_non_object() {
        let mut table = IdTable::new();
        assert!(table.merge_chunk(&Value::Array(vec![])).is_err());
        assert!(table.is_empty());
    }
}
