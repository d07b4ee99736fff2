use crate::core::card_list::CardList;
use crate::core::card_move::CardMove;
use crate::domain::model::{
    DeckList, DeckListType, Plan, PlanInput, PlanWarning, Pool, PoolRole, BASIC_LAND_SOURCE,
    DISCARD_DEST, ORDER_SOURCE,
};
use crate::utils::error::{DiffError, Result};

/// 預設的壞代理卡標籤
pub const DEFAULT_DISCARD_TAG: &str = "bad-proxy";
/// 單次下單的張數上限
pub const DEFAULT_MAX_ORDER_SIZE: u32 = 612;

const TOPOFF_POOL: &str = "topoff";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerSettings {
    pub discard_tag: String,
    pub max_order_size: Option<u32>,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            discard_tag: DEFAULT_DISCARD_TAG.to_string(),
            max_order_size: Some(DEFAULT_MAX_ORDER_SIZE),
        }
    }
}

/// Pools derived from the input decklists, in the order they were produced.
#[derive(Debug, Clone)]
pub struct Classification {
    pub pools: Vec<Pool>,
    pub collection: Pool,
    pub warnings: Vec<PlanWarning>,
}

pub struct Planner {
    settings: PlannerSettings,
}

impl Planner {
    pub fn new(settings: PlannerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    /// Splits the input decklists into demand and supply pools.
    ///
    /// Fails when the input does not hold exactly one collection. Owned brews
    /// without a current deck of the same name (ignoring case) are dropped
    /// with a warning.
    pub fn classify(&self, input: &PlanInput) -> Result<Classification> {
        let collections: Vec<&DeckList> = decks_of(input, DeckListType::Collection).collect();
        let collection = match collections.as_slice() {
            [only] => *only,
            _ => {
                return Err(DiffError::ValidationError {
                    message: format!(
                        "expected exactly one collection, found {}",
                        collections.len()
                    ),
                })
            }
        };

        let mut pools = Vec::new();
        let mut warnings = input.warnings.clone();

        for brew in decks_of(input, DeckListType::OwnedBrew) {
            let key = brew.name.to_lowercase();
            let current = decks_of(input, DeckListType::CurrentDeck)
                .find(|deck| deck.name.to_lowercase() == key);

            let Some(current) = current else {
                tracing::warn!(
                    "⚠️ Found brewing owned deck but no matching current deck, skipping: {}",
                    brew.name
                );
                warnings.push(PlanWarning::UnpairedBrew {
                    deck: brew.name.clone(),
                });
                continue;
            };

            tracing::info!("🔁 Found brewing owned deck: {}", current.name);

            let discard = current.cards_tagged(&self.settings.discard_tag);
            let remaining = current.card_list().subtract(&discard);
            let brew_cards = brew.card_list();
            let demand = brew_cards.subtract(&remaining);
            let excess = remaining.subtract(&brew_cards);

            tracing::debug!(
                "{}: discard {}, add {}, remove {}",
                current.name,
                discard.total(),
                demand.total(),
                excess.total()
            );

            pools.push(Pool::new(&current.name, PoolRole::DiscardExcess, discard));
            pools.push(Pool::new(&current.name, PoolRole::ModifiedDeckDemand, demand));
            pools.push(Pool::new(&current.name, PoolRole::ModifiedDeckExcess, excess));
        }

        for new_deck in decks_of(input, DeckListType::NewBrew) {
            tracing::info!("🆕 Found new deck: {}", new_deck.name);
            pools.push(Pool::new(
                &new_deck.name,
                PoolRole::NewDeckDemand,
                new_deck.card_list(),
            ));
        }

        if !input.topoff.is_empty() {
            pools.push(Pool::new(
                TOPOFF_POOL,
                PoolRole::TopoffDemand,
                input.topoff.clone(),
            ));
        }

        Ok(Classification {
            pools,
            collection: Pool::new(
                &collection.name,
                PoolRole::CollectionSupply,
                collection.card_list(),
            ),
            warnings,
        })
    }

    /// Computes the full transfer plan for one snapshot of decklists.
    pub fn plan(&self, input: &PlanInput) -> Result<Plan> {
        let Classification {
            pools,
            collection,
            warnings,
        } = self.classify(input)?;

        let collection_name = collection.name.clone();
        let mut collection = CardMove::supply(collection.name, collection.cards);

        let mut moves = Vec::new();
        let mut dests = Vec::new();
        let mut sources = Vec::new();
        let mut topoff = CardList::new();

        for pool in pools {
            match pool.role {
                PoolRole::DiscardExcess => {
                    keep(
                        &mut moves,
                        pool.role,
                        CardMove::transfer(pool.name, DISCARD_DEST, pool.cards),
                    );
                }
                PoolRole::ModifiedDeckDemand | PoolRole::NewDeckDemand => {
                    dests.push(CardMove::demand(pool.name, pool.cards));
                }
                PoolRole::ModifiedDeckExcess => {
                    sources.push(CardMove::supply(pool.name, pool.cards));
                }
                PoolRole::TopoffDemand => topoff.add_all(&pool.cards),
                PoolRole::CollectionSupply | PoolRole::LandSupply | PoolRole::OrderSink => {
                    tracing::debug!("ignoring {:?} pool {}", pool.role, pool.name);
                }
            }
        }

        // 每個需求依序從：其他牌組多出的卡 → 基本地堆 → 收藏 → 下單
        for mut dest in dests {
            for source in sources.iter_mut() {
                keep(
                    &mut moves,
                    PoolRole::ModifiedDeckExcess,
                    CardMove::matched(source, &mut dest),
                );
            }

            let mut lands = CardMove::supply(BASIC_LAND_SOURCE, CardList::basic_land_pile());
            keep(
                &mut moves,
                PoolRole::LandSupply,
                CardMove::matched(&mut lands, &mut dest),
            );

            keep(
                &mut moves,
                PoolRole::CollectionSupply,
                CardMove::matched(&mut collection, &mut dest),
            );

            if !dest.is_empty() {
                dest.source = Some(ORDER_SOURCE.to_string());
                keep(&mut moves, PoolRole::OrderSink, dest);
            }
        }

        // 牌組拆下來沒人要的卡：基本地回地堆，其餘回收藏
        for mut source in sources {
            let mut lands = CardMove::demand(BASIC_LAND_SOURCE, CardList::basic_land_pile());
            let returned = CardMove::matched(&mut source, &mut lands);
            if !returned.is_empty() {
                tracing::info!(
                    "🏞️ Returning {} basic lands from {} to the land pile",
                    returned.items.total(),
                    source.source.as_deref().unwrap_or_default()
                );
            }
            keep(&mut moves, PoolRole::LandSupply, returned);

            if !source.is_empty() {
                source.destination = Some(collection_name.clone());
                keep(&mut moves, PoolRole::CollectionSupply, source);
            }
        }

        if !topoff.is_empty() {
            tracing::info!(
                "📦 Topoff cards found! adding {} cards to order",
                topoff.total()
            );
            keep(
                &mut moves,
                PoolRole::TopoffDemand,
                CardMove::transfer(ORDER_SOURCE, &collection_name, topoff),
            );
        }

        let mut plan = Plan { moves, warnings };
        let ordered = plan.order_total();
        if let Some(cap) = self.settings.max_order_size {
            if ordered > cap {
                tracing::warn!(
                    "⚠️ Card count exceeds maximum order size (orderSize={}, max={})",
                    ordered,
                    cap
                );
                plan.warnings
                    .push(PlanWarning::OrderCapExceeded { ordered, cap });
            }
        }

        tracing::info!(
            "🧮 Planned {} moves, {} cards to order",
            plan.moves.len(),
            ordered
        );

        Ok(plan)
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlannerSettings::default())
    }
}

fn decks_of(input: &PlanInput, deck_type: DeckListType) -> impl Iterator<Item = &DeckList> {
    input
        .decks
        .iter()
        .filter(move |deck| deck.deck_type == deck_type)
}

/// 只保留非空的移動
fn keep(moves: &mut Vec<CardMove>, role: PoolRole, mv: CardMove) {
    if mv.is_empty() {
        return;
    }
    tracing::debug!(
        "{:?}: {} -> {} ({} cards)",
        role,
        mv.source.as_deref().unwrap_or("?"),
        mv.destination.as_deref().unwrap_or("?"),
        mv.items.total()
    );
    moves.push(mv);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Board, DeckCard};

    fn deck(name: &str, deck_type: DeckListType, cards: &[(&str, u32)]) -> DeckList {
        let mut deck = DeckList::new(name, deck_type);
        for (card, count) in cards {
            deck.cards.push(DeckCard {
                name: card.to_string(),
                count: *count,
                tags: vec![],
                board: Board::Mainboard,
            });
        }
        deck
    }

    fn list(entries: &[(&str, u32)]) -> CardList {
        entries.iter().copied().collect()
    }

    fn input(decks: Vec<DeckList>) -> PlanInput {
        PlanInput {
            decks,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_deck_pulls_lands_then_collection() {
        let plan = Planner::default()
            .plan(&input(vec![
                deck("Simic", DeckListType::NewBrew, &[("Forest", 2), ("Negate", 1)]),
                deck("Collection", DeckListType::Collection, &[("Negate", 1)]),
            ]))
            .unwrap();

        assert_eq!(
            plan.moves,
            vec![
                CardMove::transfer(BASIC_LAND_SOURCE, "Simic", list(&[("Forest", 2)])),
                CardMove::transfer("Collection", "Simic", list(&[("Negate", 1)])),
            ]
        );
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_bad_proxy_is_discarded_and_still_demanded() {
        let mut current = DeckList::new("Burn", DeckListType::CurrentDeck);
        current.cards.push(DeckCard {
            name: "Shock".to_string(),
            count: 1,
            tags: vec!["bad-proxy".to_string()],
            board: Board::Mainboard,
        });

        let plan = Planner::default()
            .plan(&input(vec![
                current,
                deck("burn", DeckListType::OwnedBrew, &[("Shock", 1)]),
                deck("Collection", DeckListType::Collection, &[]),
            ]))
            .unwrap();

        assert_eq!(
            plan.moves,
            vec![
                CardMove::transfer("Burn", DISCARD_DEST, list(&[("Shock", 1)])),
                CardMove::transfer(ORDER_SOURCE, "Burn", list(&[("Shock", 1)])),
            ]
        );
    }

    #[test]
    fn test_unpaired_owned_brew_only_warns() {
        let plan = Planner::default()
            .plan(&input(vec![
                deck("Zoo", DeckListType::OwnedBrew, &[("Wild Nacatl", 4)]),
                deck("Collection", DeckListType::Collection, &[("Wild Nacatl", 4)]),
            ]))
            .unwrap();

        assert!(plan.moves.is_empty());
        assert_eq!(
            plan.warnings,
            vec![PlanWarning::UnpairedBrew {
                deck: "Zoo".to_string()
            }]
        );
    }

    #[test]
    fn test_collection_count_must_be_exactly_one() {
        let two = input(vec![
            deck("Collection", DeckListType::Collection, &[]),
            deck("Binder", DeckListType::Collection, &[]),
        ]);
        let err = Planner::default().plan(&two).unwrap_err();
        assert!(matches!(err, DiffError::ValidationError { .. }));

        let none = input(vec![deck("Zoo", DeckListType::NewBrew, &[("Forest", 1)])]);
        assert!(matches!(
            Planner::default().plan(&none),
            Err(DiffError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_excess_from_modified_deck_feeds_new_deck_first() {
        let plan = Planner::default()
            .plan(&input(vec![
                deck("Izzet", DeckListType::CurrentDeck, &[("Negate", 2), ("Island", 10)]),
                deck("Izzet", DeckListType::OwnedBrew, &[("Island", 8)]),
                deck("Mono Blue", DeckListType::NewBrew, &[("Negate", 3), ("Island", 2)]),
                deck("Collection", DeckListType::Collection, &[("Negate", 4)]),
            ]))
            .unwrap();

        assert_eq!(
            plan.moves,
            vec![
                CardMove::transfer("Izzet", "Mono Blue", list(&[("Island", 2), ("Negate", 2)])),
                CardMove::transfer("Collection", "Mono Blue", list(&[("Negate", 1)])),
            ]
        );
    }

    #[test]
    fn test_leftover_excess_returns_lands_then_goes_to_collection() {
        let plan = Planner::default()
            .plan(&input(vec![
                deck(
                    "Gruul",
                    DeckListType::CurrentDeck,
                    &[("Forest", 9), ("Mountain", 9), ("Lightning Bolt", 1)],
                ),
                deck("Gruul", DeckListType::OwnedBrew, &[("Forest", 8), ("Mountain", 8)]),
                deck("My Cards", DeckListType::Collection, &[]),
            ]))
            .unwrap();

        assert_eq!(
            plan.moves,
            vec![
                CardMove::transfer(
                    "Gruul",
                    BASIC_LAND_SOURCE,
                    list(&[("Forest", 1), ("Mountain", 1)])
                ),
                CardMove::transfer("Gruul", "My Cards", list(&[("Lightning Bolt", 1)])),
            ]
        );
    }

    #[test]
    fn test_pair_demands_resolve_before_new_decks() {
        let plan = Planner::default()
            .plan(&input(vec![
                deck("New", DeckListType::NewBrew, &[("Negate", 1)]),
                deck("Old", DeckListType::CurrentDeck, &[]),
                deck("Old", DeckListType::OwnedBrew, &[("Negate", 1)]),
                deck("Collection", DeckListType::Collection, &[("Negate", 1)]),
            ]))
            .unwrap();

        assert_eq!(
            plan.moves,
            vec![
                CardMove::transfer("Collection", "Old", list(&[("Negate", 1)])),
                CardMove::transfer(ORDER_SOURCE, "New", list(&[("Negate", 1)])),
            ]
        );
    }

    #[test]
    fn test_topoff_is_ordered_into_collection() {
        let mut snapshot = input(vec![deck(
            "Binder",
            DeckListType::Collection,
            &[("Sol Ring", 1)],
        )]);
        snapshot.topoff = list(&[("Sol Ring", 2)]);

        let plan = Planner::default().plan(&snapshot).unwrap();

        assert_eq!(
            plan.moves,
            vec![CardMove::transfer(
                ORDER_SOURCE,
                "Binder",
                list(&[("Sol Ring", 2)])
            )]
        );
    }

    #[test]
    fn test_order_cap_warning() {
        let settings = PlannerSettings {
            max_order_size: Some(3),
            ..Default::default()
        };
        let plan = Planner::new(settings)
            .plan(&input(vec![
                deck("Zoo", DeckListType::NewBrew, &[("Wild Nacatl", 4)]),
                deck("Collection", DeckListType::Collection, &[]),
            ]))
            .unwrap();

        assert_eq!(
            plan.warnings,
            vec![PlanWarning::OrderCapExceeded { ordered: 4, cap: 3 }]
        );
    }

    #[test]
    fn test_classify_pool_roles_in_production_order() {
        let classification = Planner::default()
            .classify(&input(vec![
                deck("A", DeckListType::CurrentDeck, &[("Shock", 1)]),
                deck("a", DeckListType::OwnedBrew, &[("Negate", 1)]),
                deck("B", DeckListType::NewBrew, &[("Forest", 1)]),
                deck("Collection", DeckListType::Collection, &[]),
            ]))
            .unwrap();

        let roles: Vec<PoolRole> = classification.pools.iter().map(|p| p.role).collect();
        assert_eq!(
            roles,
            vec![
                PoolRole::DiscardExcess,
                PoolRole::ModifiedDeckDemand,
                PoolRole::ModifiedDeckExcess,
                PoolRole::NewDeckDemand,
            ]
        );
        assert_eq!(classification.pools[1].name, "A");
        assert_eq!(classification.collection.role, PoolRole::CollectionSupply);
    }

    #[test]
    fn test_demand_beyond_land_pile_uses_collection_then_order() {
        let plan = Planner::default()
            .plan(&input(vec![
                deck("Forests", DeckListType::NewBrew, &[("Forest", 1200)]),
                deck("Binder", DeckListType::Collection, &[("Forest", 100)]),
            ]))
            .unwrap();

        assert_eq!(
            plan.moves,
            vec![
                CardMove::transfer(BASIC_LAND_SOURCE, "Forests", list(&[("Forest", 999)])),
                CardMove::transfer("Binder", "Forests", list(&[("Forest", 100)])),
                CardMove::transfer(ORDER_SOURCE, "Forests", list(&[("Forest", 101)])),
            ]
        );
        assert_eq!(plan.order_total(), 101);
    }

    #[test]
    fn test_leftover_lands_beyond_pile_go_to_collection() {
        let plan = Planner::default()
            .plan(&input(vec![
                deck("Lands", DeckListType::CurrentDeck, &[("Forest", 1500)]),
                deck("Lands", DeckListType::OwnedBrew, &[]),
                deck("Binder", DeckListType::Collection, &[]),
            ]))
            .unwrap();

        assert_eq!(
            plan.moves,
            vec![
                CardMove::transfer("Lands", BASIC_LAND_SOURCE, list(&[("Forest", 999)])),
                CardMove::transfer("Lands", "Binder", list(&[("Forest", 501)])),
            ]
        );
    }
}
