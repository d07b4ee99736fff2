use serde::Serialize;
use std::collections::BTreeMap;

/// 基本地的固定名稱表
pub const BASIC_LAND_NAMES: [&str; 5] = ["Plains", "Island", "Swamp", "Mountain", "Forest"];

/// 基本地堆每種地的張數，視為無限供應
pub const BASIC_LAND_PILE_SIZE: u32 = 999;

/// Multiset of card names.
///
/// Every stored count is positive; operations that would reach zero drop the
/// entry instead. Entries are kept in name order so serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CardList {
    cards: BTreeMap<String, u32>,
}

impl CardList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str) {
        self.add_count(name, 1);
    }

    pub fn add_count(&mut self, name: &str, count: u32) {
        if count == 0 {
            return;
        }
        *self.cards.entry(name.to_string()).or_insert(0) += count;
    }

    /// 多重集合聯集，張數相加
    pub fn add_all(&mut self, other: &CardList) {
        for (name, count) in &other.cards {
            self.add_count(name, *count);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// 不同卡名的數量
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// 全部張數總和
    pub fn total(&self) -> u32 {
        self.cards.values().sum()
    }

    pub fn get(&self, name: &str) -> u32 {
        self.cards.get(name).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.cards.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Returns the shared cards, each at the smaller of the two counts.
    pub fn intersect(&self, other: &CardList) -> CardList {
        let cards = self
            .cards
            .iter()
            .filter_map(|(name, count)| {
                other
                    .cards
                    .get(name)
                    .map(|other_count| (name.clone(), (*count).min(*other_count)))
            })
            .collect();
        CardList { cards }
    }

    /// Returns this list minus `other`. Names only present in `other` are ignored.
    pub fn subtract(&self, other: &CardList) -> CardList {
        let cards = self
            .cards
            .iter()
            .filter_map(|(name, count)| {
                let remaining = count.saturating_sub(other.get(name));
                (remaining > 0).then(|| (name.clone(), remaining))
            })
            .collect();
        CardList { cards }
    }

    pub fn basic_land_pile() -> CardList {
        let mut pile = CardList::new();
        for name in BASIC_LAND_NAMES {
            pile.add_count(name, BASIC_LAND_PILE_SIZE);
        }
        pile
    }

    pub fn basic_land_names() -> &'static [&'static str] {
        &BASIC_LAND_NAMES
    }
}

impl<'a> FromIterator<&'a str> for CardList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut list = CardList::new();
        for name in iter {
            list.add(name);
        }
        list
    }
}

impl<'a> FromIterator<(&'a str, u32)> for CardList {
    fn from_iter<I: IntoIterator<Item = (&'a str, u32)>>(iter: I) -> Self {
        let mut list = CardList::new();
        for (name, count) in iter {
            list.add_count(name, count);
        }
        list
    }
}
