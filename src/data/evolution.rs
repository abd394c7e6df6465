//! Evolution chain parsing

use serde::Deserialize;

use super::{NamedResource, Pokemon};

/// Response from the evolution-chain endpoint
#[derive(Debug, Deserialize)]
pub struct EvolutionChainResponse {
    pub chain: ChainLink,
}

/// One node of an evolution tree
#[derive(Debug, Clone, Deserialize)]
pub struct ChainLink {
    pub species: NamedResource,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

/// A stage of a flattened evolution chain
///
/// `pokemon` is `None` when the stage's record could not be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionStage {
    pub name: String,
    pub pokemon: Option<Pokemon>,
}

/// Flattens an evolution tree into species names in pre-order
///
/// Branching chains (e.g. Eevee) list the base form followed by each branch
/// in the order the API returns them.
pub fn flatten_chain(link: &ChainLink) -> Vec<String> {
    let mut names = vec![link.species.name.clone()];
    for child in &link.evolves_to {
        names.extend(flatten_chain(child));
    }
    names
}
