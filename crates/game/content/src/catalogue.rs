//! Technology catalogue.

use game_core::{TechDefinition, TechId, TechOracle};

use crate::technologies::ids;

/// In-memory [`TechOracle`] keeping catalogue order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TechCatalogue {
    techs: Vec<TechDefinition>,
}

impl TechCatalogue {
    /// Builds a catalogue; later duplicates of an id are ignored.
    pub fn new(definitions: impl IntoIterator<Item = TechDefinition>) -> Self {
        let mut techs: Vec<TechDefinition> = Vec::new();
        for definition in definitions {
            if !techs.iter().any(|t| t.id == definition.id) {
                techs.push(definition);
            }
        }
        Self { techs }
    }

    /// The eight built-in technologies.
    pub fn standard() -> Self {
        let tech = |id: &str, name: &str, cost: u32, description: &str| TechDefinition {
            id: TechId::new(id),
            name: name.to_string(),
            cost,
            description: description.to_string(),
        };
        Self::new([
            tech(
                ids::FORTIFIED_WORLDS,
                "Fortified Worlds",
                3,
                "Defending planets count 2 extra forces.",
            ),
            tech(
                ids::ASSAULT_DOCTRINE,
                "Assault Doctrine",
                4,
                "Exhaust: an attack counts 2 extra forces.",
            ),
            tech(
                ids::INDUSTRIALIZATION,
                "Industrialization",
                3,
                "Production yields 1 extra force.",
            ),
            tech(
                ids::SALVAGE_OPERATIONS,
                "Salvage Operations",
                2,
                "Exhaust: gain science for forces lost in combat.",
            ),
            tech(
                ids::RESEARCH_GRANTS,
                "Research Grants",
                2,
                "Technologies cost 1 less science.",
            ),
            tech(
                ids::EXPANSIONISM,
                "Expansionism",
                5,
                "Exhaust: gain 1 victory point when capturing a planet.",
            ),
            tech(
                ids::LOGISTICS_NETWORK,
                "Logistics Network",
                3,
                "Gain 1 science at the start of your turn.",
            ),
            tech(
                ids::SCORCHED_EARTH,
                "Scorched Earth",
                2,
                "When you lose a technology, gain 2 science.",
            ),
        ])
    }

    pub fn ids(&self) -> Vec<TechId> {
        self.techs.iter().map(|t| t.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.techs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.techs.is_empty()
    }
}

impl TechOracle for TechCatalogue {
    fn definition(&self, id: &TechId) -> Option<&TechDefinition> {
        self.techs.iter().find(|t| &t.id == id)
    }

    fn all(&self) -> Vec<&TechDefinition> {
        self.techs.iter().collect()
    }
}
