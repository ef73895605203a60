use super::TechId;

/// Technologies currently for sale plus the face-down draw pile.
///
/// The deck order is fixed when the game starts (the runtime shuffles it with
/// the application RNG); after that every refill is deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TechMarket {
    pub offered: Vec<TechId>,
    pub deck: Vec<TechId>,
    pub size: usize,
}

impl TechMarket {
    pub fn new(deck: Vec<TechId>, size: usize) -> Self {
        let mut market = Self {
            offered: Vec::new(),
            deck,
            size,
        };
        market.refill();
        market
    }

    pub fn is_offered(&self, tech: &TechId) -> bool {
        self.offered.contains(tech)
    }

    /// Removes a tech from the offer and refills from the deck.
    /// Returns `false` if the tech was not on offer.
    pub fn take(&mut self, tech: &TechId) -> bool {
        let Some(index) = self.offered.iter().position(|t| t == tech) else {
            return false;
        };
        self.offered.remove(index);
        self.refill();
        true
    }

    /// Returns a tech to the bottom of the deck.
    pub fn discard(&mut self, tech: TechId) {
        if !self.offered.contains(&tech) && !self.deck.contains(&tech) {
            self.deck.push(tech);
        }
    }

    fn refill(&mut self) {
        while self.offered.len() < self.size && !self.deck.is_empty() {
            let next = self.deck.remove(0);
            self.offered.push(next);
        }
    }
}
