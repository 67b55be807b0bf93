use serde::{Deserialize, Serialize};

/// Card rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    Common,
    SemiRare,
    Rare,
}

/// Cards earned so far, by rarity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCounts {
    pub common: u32,
    pub semi_rare: u32,
    pub rare: u32,
}

impl CardCounts {
    pub fn total(&self) -> u32 {
        self.common + self.semi_rare + self.rare
    }
}

/// Running totals for the active session.
///
/// Pure bookkeeping; validation happens upstream in the filters. Nothing
/// here ever decreases within a session except `current_speed_kmh`, which
/// tracks the latest instantaneous reading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub steps: u32,
    pub distance_meters: f64,
    pub top_speed_kmh: f64,
    pub current_speed_kmh: f64,
    pub cards: CardCounts,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn add_distance(&mut self, meters: f64) {
        self.distance_meters += meters;
    }

    pub fn add_step(&mut self) {
        self.steps += 1;
    }

    /// Update the instantaneous speed, raising the session peak if exceeded
    pub fn set_current_speed(&mut self, kmh: f64) {
        self.current_speed_kmh = kmh;
        if kmh > self.top_speed_kmh {
            self.top_speed_kmh = kmh;
        }
    }

    pub fn add_cards(&mut self, kind: CardKind, n: u32) {
        match kind {
            CardKind::Common => self.cards.common += n,
            CardKind::SemiRare => self.cards.semi_rare += n,
            CardKind::Rare => self.cards.rare += n,
        }
    }
}
