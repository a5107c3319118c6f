use serde::Deserialize;

use crate::assets::items::ItemCatalog;
use crate::economy::inventory::PlayerData;

/// Why a purchase was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeError {
    /// The item id is not in the catalog.
    UnknownItem(String),
    /// This shop does not sell the item.
    NotStocked(String),
    OutOfStock(String),
    InsufficientFunds { price: u32, balance: u32 },
    /// The NPC index does not name a shopkeeper.
    NoShop(usize),
    /// The shopkeeper exists but its shop is not open.
    NotTrading(usize),
}

impl std::fmt::Display for TradeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeError::UnknownItem(id) => write!(f, "Unknown item: {}", id),
            TradeError::NotStocked(id) => write!(f, "Not sold here: {}", id),
            TradeError::OutOfStock(id) => write!(f, "Out of stock: {}", id),
            TradeError::InsufficientFunds { price, balance } => {
                write!(f, "Insufficient funds: need {}, have {}", price, balance)
            }
            TradeError::NoShop(npc) => write!(f, "NPC {} does not trade", npc),
            TradeError::NotTrading(npc) => write!(f, "Shop of NPC {} is not open", npc),
        }
    }
}

impl std::error::Error for TradeError {}

/// One line of a shop's stock list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StockEntry {
    pub item: String,
    /// Overrides the catalog value when set.
    #[serde(default)]
    pub price: Option<u32>,
    /// `None` means unlimited.
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl StockEntry {
    /// Parse the compact `item[:price[:quantity]]` tag used on level spawns.
    pub fn parse_tag(tag: &str) -> Option<Self> {
        let mut parts = tag.split(':');
        let item = parts.next()?.trim();
        if item.is_empty() {
            return None;
        }
        let price = parts.next().and_then(|p| p.trim().parse().ok());
        let quantity = parts.next().and_then(|q| q.trim().parse().ok());
        Some(Self {
            item: item.to_string(),
            price,
            quantity,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShopStock {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub items: Vec<StockEntry>,
}

impl ShopStock {
    /// Parse `{ "name": ..., "items": [ { "item", "price"?, "quantity"? } ] }`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_tags<'a>(name: impl Into<String>, tags: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            name: name.into(),
            items: tags.into_iter().filter_map(StockEntry::parse_tag).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shop {
    pub stock: ShopStock,
}

impl Shop {
    pub fn new(stock: ShopStock) -> Self {
        Self { stock }
    }

    pub fn name(&self) -> &str {
        &self.stock.name
    }

    /// Price of `item_id` here, if stocked and known.
    pub fn price_of(&self, catalog: &ItemCatalog, item_id: &str) -> Option<u32> {
        let entry = self.stock.items.iter().find(|e| e.item == item_id)?;
        entry.price.or_else(|| catalog.get(item_id).map(|item| item.value))
    }

    /// Sell one `item_id` to the player. Returns the price paid.
    pub fn buy(
        &mut self,
        catalog: &ItemCatalog,
        item_id: &str,
        player: &mut PlayerData,
    ) -> Result<u32, TradeError> {
        let item = catalog
            .get(item_id)
            .ok_or_else(|| TradeError::UnknownItem(item_id.to_string()))?;
        let entry = self
            .stock
            .items
            .iter_mut()
            .find(|e| e.item == item_id)
            .ok_or_else(|| TradeError::NotStocked(item_id.to_string()))?;

        if entry.quantity == Some(0) {
            return Err(TradeError::OutOfStock(item_id.to_string()));
        }
        let price = entry.price.unwrap_or(item.value);
        if !player.wallet.spend(price) {
            return Err(TradeError::InsufficientFunds {
                price,
                balance: player.wallet.balance(),
            });
        }

        if let Some(quantity) = entry.quantity.as_mut() {
            *quantity -= 1;
        }
        player.inventory.add(item_id, 1);
        Ok(price)
    }
}
