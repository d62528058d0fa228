use rand::rngs::StdRng;

/// One price component of an offer: display text plus quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    pub item: String,
    pub quantity: u32,
}

/// One (tag, level) attribute instance on a generated item, carrying the
/// localized full name the generator produced for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Stable registry identity, e.g. "minecraft:fortune".
    pub tag: String,
    /// Localized name, usually with a Roman-numeral level suffix.
    pub full_name: String,
    pub level: u32,
}

/// A generated trade offer: the produced item tag, its attributes, and up
/// to two price components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    pub item: String,
    pub attributes: Vec<Attribute>,
    pub cost_a: Price,
    pub cost_b: Option<Price>,
}

/// Source of generated offers, one independent weighted generator per slot.
pub trait OfferSource {
    fn slot_count(&self) -> usize;

    /// Draw the next offer for `slot`. `None` means the slot produced
    /// nothing this trial.
    fn sample(&self, slot: usize, rng: &mut StdRng) -> Option<Offer>;
}

/// Display-text lookup for description keys. A miss is a normal outcome,
/// not an error.
pub trait TextResolver {
    fn resolve(&self, key: &str) -> Option<String>;
}
