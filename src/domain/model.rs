use crate::core::card_list::CardList;
use crate::core::card_move::CardMove;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 訂單來源標籤，代表需要對外購買
pub const ORDER_SOURCE: &str = "order";
/// 壞掉的代理卡送往的目的地
pub const DISCARD_DEST: &str = "discard";
/// 基本地堆標籤
pub const BASIC_LAND_SOURCE: &str = "basic lands";

/// Kind of decklist as stored by the importer, one directory per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckListType {
    NewBrew,
    OwnedBrew,
    Collection,
    CurrentDeck,
}

impl DeckListType {
    pub const ALL: [DeckListType; 4] = [
        DeckListType::NewBrew,
        DeckListType::OwnedBrew,
        DeckListType::Collection,
        DeckListType::CurrentDeck,
    ];

    pub fn dir_name(&self) -> &'static str {
        match self {
            DeckListType::NewBrew => "BrewingNew",
            DeckListType::OwnedBrew => "BrewingOwned",
            DeckListType::Collection => "Collection",
            DeckListType::CurrentDeck => "DecksCurrent",
        }
    }
}

impl fmt::Display for DeckListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Board {
    #[default]
    Mainboard,
    Sideboard,
    Considering,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckCard {
    pub name: String,
    pub count: u32,
    pub tags: Vec<String>,
    pub board: Board,
}

impl DeckCard {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckList {
    pub name: String,
    pub deck_type: DeckListType,
    pub cards: Vec<DeckCard>,
}

impl DeckList {
    pub fn new(name: impl Into<String>, deck_type: DeckListType) -> Self {
        Self {
            name: name.into(),
            deck_type,
            cards: Vec::new(),
        }
    }

    /// 所有區（主牌、備牌、考慮中）的卡片
    pub fn card_list(&self) -> CardList {
        self.cards
            .iter()
            .map(|card| (card.name.as_str(), card.count))
            .collect()
    }

    /// 帶有指定標籤的卡片，標籤比對不分大小寫
    pub fn cards_tagged(&self, tag: &str) -> CardList {
        self.cards
            .iter()
            .filter(|card| card.has_tag(tag))
            .map(|card| (card.name.as_str(), card.count))
            .collect()
    }

    /// Mainboard plus sideboard, the part of the list that counts toward deck size.
    pub fn deck_size(&self) -> u32 {
        self.cards
            .iter()
            .filter(|card| card.board != Board::Considering)
            .map(|card| card.count)
            .sum()
    }
}

/// Role a pool plays in one planning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolRole {
    NewDeckDemand,
    ModifiedDeckDemand,
    ModifiedDeckExcess,
    DiscardExcess,
    CollectionSupply,
    LandSupply,
    OrderSink,
    TopoffDemand,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    pub name: String,
    pub role: PoolRole,
    pub cards: CardList,
}

impl Pool {
    pub fn new(name: impl Into<String>, role: PoolRole, cards: CardList) -> Self {
        Self {
            name: name.into(),
            role,
            cards,
        }
    }
}

/// Snapshot of everything the planner needs for one run.
#[derive(Debug, Clone, Default)]
pub struct PlanInput {
    pub decks: Vec<DeckList>,
    pub topoff: CardList,
    pub warnings: Vec<PlanWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanWarning {
    UnpairedBrew { deck: String },
    DeckSize { deck: String, count: u32, expected: u32 },
    OrderCapExceeded { ordered: u32, cap: u32 },
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::UnpairedBrew { deck } => write!(
                f,
                "owned brew '{}' has no matching current deck, skipped",
                deck
            ),
            PlanWarning::DeckSize {
                deck,
                count,
                expected,
            } => write!(
                f,
                "deck '{}' has {} cards between mainboard and sideboard, expected {}",
                deck, count, expected
            ),
            PlanWarning::OrderCapExceeded { ordered, cap } => write!(
                f,
                "order size {} exceeds the maximum order size of {}",
                ordered, cap
            ),
        }
    }
}

/// Ordered list of finalized moves produced by one planning run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub moves: Vec<CardMove>,
    pub warnings: Vec<PlanWarning>,
}

impl Plan {
    /// 所有需要下單的卡片合計
    pub fn order_list(&self) -> CardList {
        let mut list = CardList::new();
        for mv in self.moves.iter().filter(|mv| mv.is_from(ORDER_SOURCE)) {
            list.add_all(&mv.items);
        }
        list
    }

    pub fn order_total(&self) -> u32 {
        self.order_list().total()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.moves)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub moves: usize,
    pub ordered_cards: u32,
    pub max_order_size: Option<u32>,
    pub warnings: Vec<PlanWarning>,
}

impl PlanSummary {
    pub fn from_plan(plan: &Plan, max_order_size: Option<u32>) -> Self {
        Self {
            generated_at: chrono::Utc::now(),
            moves: plan.moves.len(),
            ordered_cards: plan.order_total(),
            max_order_size,
            warnings: plan.warnings.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, count: u32, tags: &[&str], board: Board) -> DeckCard {
        DeckCard {
            name: name.to_string(),
            count,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            board,
        }
    }

    #[test]
    fn test_deck_card_lists() {
        let mut deck = DeckList::new("Izzet", DeckListType::CurrentDeck);
        deck.cards.push(card("Shock", 2, &["Bad-Proxy"], Board::Mainboard));
        deck.cards.push(card("Negate", 1, &[], Board::Sideboard));
        deck.cards.push(card("Shock", 1, &[], Board::Considering));

        let all = deck.card_list();
        assert_eq!(all.get("Shock"), 3);
        assert_eq!(all.get("Negate"), 1);

        let tagged = deck.cards_tagged("bad-proxy");
        assert_eq!(tagged.get("Shock"), 2);
        assert_eq!(tagged.len(), 1);

        assert_eq!(deck.deck_size(), 3);
    }

    #[test]
    fn test_plan_order_list_only_counts_order_source() {
        let plan = Plan {
            moves: vec![
                CardMove::transfer(ORDER_SOURCE, "Zoo", [("Wild Nacatl", 2)].into_iter().collect()),
                CardMove::transfer("Collection", "Zoo", [("Wild Nacatl", 2)].into_iter().collect()),
                CardMove::transfer(ORDER_SOURCE, "Collection", [("Wild Nacatl", 1)].into_iter().collect()),
            ],
            warnings: vec![],
        };

        assert_eq!(plan.order_list().get("Wild Nacatl"), 3);
        assert_eq!(plan.order_total(), 3);
    }

    #[test]
    fn test_warning_serialization_is_tagged() {
        let warning = PlanWarning::UnpairedBrew {
            deck: "Zoo".to_string(),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "unpaired_brew", "deck": "Zoo"}));
    }
}
