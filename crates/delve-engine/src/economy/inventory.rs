use std::collections::BTreeMap;

/// Item id → count. Counts never sit at zero; emptied entries are removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    counts: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: &str, count: u32) {
        if count == 0 {
            return;
        }
        *self.counts.entry(item.to_string()).or_insert(0) += count;
    }

    /// Remove `count` of `item`. Fails without changes if there are fewer.
    pub fn remove(&mut self, item: &str, count: u32) -> bool {
        let Some(have) = self.counts.get_mut(item) else {
            return count == 0;
        };
        if *have < count {
            return false;
        }
        *have -= count;
        if *have == 0 {
            self.counts.remove(item);
        }
        true
    }

    pub fn count(&self, item: &str) -> u32 {
        self.counts.get(item).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(id, n)| (id.as_str(), *n))
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Wallet {
    balance: u32,
}

impl Wallet {
    pub fn new(balance: u32) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> u32 {
        self.balance
    }

    pub fn earn(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Deduct `amount` if affordable.
    pub fn spend(&mut self, amount: u32) -> bool {
        match self.balance.checked_sub(amount) {
            Some(rest) => {
                self.balance = rest;
                true
            }
            None => false,
        }
    }
}

/// Player-owned state touched by NPCs, shops and the inventory screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerData {
    pub wallet: Wallet,
    pub inventory: Inventory,
    /// Control input is ignored while false.
    pub movable: bool,
    pub inventory_open: bool,
}

impl PlayerData {
    pub fn new(currency: u32) -> Self {
        Self {
            wallet: Wallet::new(currency),
            inventory: Inventory::new(),
            movable: true,
            inventory_open: false,
        }
    }

    /// Open/close the inventory screen; movement locks while it is open.
    pub fn toggle_inventory(&mut self) -> bool {
        self.inventory_open = !self.inventory_open;
        self.movable = !self.inventory_open;
        self.inventory_open
    }
}

impl Default for PlayerData {
    fn default() -> Self {
        Self::new(0)
    }
}
