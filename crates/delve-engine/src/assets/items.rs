use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

/// A purchasable/carryable item.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Base price in currency units.
    pub value: u32,
    /// The `attributes` object merged with every other top-level key.
    pub attributes: BTreeMap<String, Value>,
}

impl Item {
    fn from_entry(id: &str, mut entry: Map<String, Value>) -> Self {
        let name = take_string(&mut entry, "name").unwrap_or_else(|| "Unknown Item".to_string());
        let description = take_string(&mut entry, "description")
            .unwrap_or_else(|| "No description available.".to_string());

        let mut attributes: BTreeMap<String, Value> = match entry.remove("attributes") {
            Some(Value::Object(map)) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        };
        let value = entry
            .get("value")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0);
        attributes.extend(entry);

        Self {
            id: id.to_string(),
            name,
            description,
            value,
            attributes,
        }
    }
}

fn take_string(entry: &mut Map<String, Value>, key: &str) -> Option<String> {
    match entry.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    items: BTreeMap<String, Map<String, Value>>,
}

/// Item definitions keyed by id, loaded from the game data file.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: BTreeMap<String, Item>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{ "items": { "<id>": { ... } } }`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        let items = doc
            .items
            .into_iter()
            .map(|(id, entry)| {
                let item = Item::from_entry(&id, entry);
                (id, item)
            })
            .collect();
        Ok(Self { items })
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
