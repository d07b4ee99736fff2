use crate::core::card_list::CardList;
use serde::Serialize;

/// A planned movement of cards between two named pools.
///
/// Only a destination means unmet demand, only a source means unclaimed
/// supply. A move with both labels is a finished plan entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CardMove {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub items: CardList,
}

impl CardMove {
    pub fn demand(destination: impl Into<String>, items: CardList) -> Self {
        Self {
            source: None,
            destination: Some(destination.into()),
            items,
        }
    }

    pub fn supply(source: impl Into<String>, items: CardList) -> Self {
        Self {
            source: Some(source.into()),
            destination: None,
            items,
        }
    }

    pub fn transfer(
        source: impl Into<String>,
        destination: impl Into<String>,
        items: CardList,
    ) -> Self {
        Self {
            source: Some(source.into()),
            destination: Some(destination.into()),
            items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_finalized(&self) -> bool {
        self.source.is_some() && self.destination.is_some()
    }

    /// 來源是否為指定的池
    pub fn is_from(&self, label: &str) -> bool {
        self.source.as_deref() == Some(label)
    }

    /// Moves every card shared by `source` and `dest` into a new finalized move.
    ///
    /// Both operands shrink by the returned overlap, so the same source or
    /// destination can be matched repeatedly until it runs dry. Disjoint
    /// operands are left untouched and the returned move is empty.
    pub fn matched(source: &mut CardMove, dest: &mut CardMove) -> CardMove {
        let overlap = source.items.intersect(&dest.items);

        if !overlap.is_empty() {
            let source_before = source.items.total();
            let dest_before = dest.items.total();

            source.items = source.items.subtract(&overlap);
            dest.items = dest.items.subtract(&overlap);

            debug_assert_eq!(source_before - source.items.total(), overlap.total());
            debug_assert_eq!(dest_before - dest.items.total(), overlap.total());
        }

        CardMove {
            source: source.source.clone(),
            destination: dest.destination.clone(),
            items: overlap,
        }
    }
}
