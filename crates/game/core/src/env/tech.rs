use crate::state::TechId;

/// Static description of a purchasable technology.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TechDefinition {
    pub id: TechId,
    pub name: String,
    /// Price in science before discounts.
    pub cost: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

/// Technology catalogue.
pub trait TechOracle: Send + Sync {
    fn definition(&self, id: &TechId) -> Option<&TechDefinition>;

    /// Every technology, in catalogue order. Used to build the market deck.
    fn all(&self) -> Vec<&TechDefinition>;
}
