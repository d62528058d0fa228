use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::canonical::{description_key, to_roman};
use crate::offer::{Attribute, Offer, OfferSource, Price, TextResolver};

/// Display text for the primary and secondary price components.
pub const EMERALD: &str = "Emerald";
pub const BOOK: &str = "Book";

/// One attribute kind available from an attribute-item slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub id: String,
    pub name: String,
    pub max_level: u32,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub treasure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_weight() -> u32 {
    1
}

/// One merchant slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Listing {
    /// Plain merchandise; never carries attributes.
    Commodity { item: String, price: u32 },
    /// An attribute-bearing item drawn from the weighted attribute table.
    AttributeItem { item: String },
}

/// The weighted generator table consulted once per slot per trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingTable {
    pub slots: Vec<Listing>,
    pub attributes: Vec<AttributeSpec>,
}

impl ListingTable {
    /// Load a table from a TOML file.
    pub fn load(path: &Path) -> Result<ListingTable, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        let table: ListingTable = toml::from_str(&text)?;
        if table.attributes.is_empty() {
            log::warn!("listing table {} has no attributes", path.display());
        }
        Ok(table)
    }

    /// Localized full name for one roll: level suffix only when the
    /// attribute actually has multiple levels.
    fn full_name(spec: &AttributeSpec, level: u32) -> String {
        if spec.max_level <= 1 && level == 1 {
            spec.name.clone()
        } else {
            format!("{} {}", spec.name, to_roman(level))
        }
    }

    /// Weighted pick over the attribute table; `None` when the table is
    /// empty or carries no weight.
    fn roll_attribute(&self, rng: &mut StdRng) -> Option<&AttributeSpec> {
        let total: u32 = self.attributes.iter().map(|a| a.weight).sum();
        if total == 0 {
            return None;
        }
        let mut pick = rng.gen_range(0..total);
        for spec in &self.attributes {
            if pick < spec.weight {
                return Some(spec);
            }
            pick -= spec.weight;
        }
        None
    }
}

/// Book pricing: 2 + rand(0..5 + level*10) + 3*level emeralds, doubled for
/// treasure attributes, capped at 64.
fn book_price(spec: &AttributeSpec, level: u32, rng: &mut StdRng) -> u32 {
    let mut price = 2 + rng.gen_range(0..5 + level * 10) + 3 * level;
    if spec.treasure {
        price *= 2;
    }
    price.min(64)
}

impl OfferSource for ListingTable {
    fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn sample(&self, slot: usize, rng: &mut StdRng) -> Option<Offer> {
        match self.slots.get(slot)? {
            Listing::Commodity { item, price } => Some(Offer {
                item: item.clone(),
                attributes: Vec::new(),
                cost_a: Price {
                    item: EMERALD.to_string(),
                    quantity: *price,
                },
                cost_b: None,
            }),
            Listing::AttributeItem { item } => {
                let spec = self.roll_attribute(rng)?;
                let level = rng.gen_range(1..=spec.max_level.max(1));
                Some(Offer {
                    item: item.clone(),
                    attributes: vec![Attribute {
                        tag: spec.id.clone(),
                        full_name: Self::full_name(spec, level),
                        level,
                    }],
                    cost_a: Price {
                        item: EMERALD.to_string(),
                        quantity: book_price(spec, level, rng),
                    },
                    cost_b: Some(Price {
                        item: BOOK.to_string(),
                        quantity: 1,
                    }),
                })
            }
        }
    }
}

impl Default for ListingTable {
    fn default() -> Self {
        fn spec(
            id: &str,
            name: &str,
            max_level: u32,
            weight: u32,
            treasure: bool,
            description: Option<&str>,
        ) -> AttributeSpec {
            AttributeSpec {
                id: id.to_string(),
                name: name.to_string(),
                max_level,
                weight,
                treasure,
                description: description.map(str::to_string),
            }
        }

        ListingTable {
            slots: vec![
                Listing::Commodity {
                    item: "minecraft:emerald".to_string(),
                    price: 1,
                },
                Listing::AttributeItem {
                    item: "minecraft:enchanted_book".to_string(),
                },
            ],
            attributes: vec![
                spec("minecraft:sharpness", "Sharpness", 5, 10, false, Some("Increases melee damage.")),
                spec("minecraft:protection", "Protection", 4, 10, false, Some("Reduces most types of damage.")),
                spec("minecraft:efficiency", "Efficiency", 5, 10, false, Some("Increases mining speed.")),
                spec("minecraft:unbreaking", "Unbreaking", 3, 8, false, Some("Increases durability.")),
                spec("minecraft:power", "Power", 5, 8, false, Some("Increases arrow damage.")),
                spec("minecraft:fortune", "Fortune", 3, 5, false, Some("Increases block drops.")),
                spec("minecraft:looting", "Looting", 3, 5, false, Some("Mobs drop more loot.")),
                spec("minecraft:fire_aspect", "Fire Aspect", 2, 4, false, Some("Sets targets on fire.")),
                spec("minecraft:silk_touch", "Silk Touch", 1, 3, false, Some("Blocks drop themselves.")),
                spec("minecraft:infinity", "Infinity", 1, 2, false, Some("Arrows are not consumed.")),
                spec("minecraft:mending", "Mending", 1, 2, true, Some("Repairs gear with experience.")),
                spec("minecraft:frost_walker", "Frost Walker", 2, 1, true, None),
                spec("minecraft:binding_curse", "Curse of Binding", 1, 1, true, None),
            ],
        }
    }
}

/// Display-text lookup backed by the listing table's description strings.
#[derive(Debug, Default)]
pub struct LocaleTable {
    texts: HashMap<String, String>,
}

impl LocaleTable {
    pub fn from_table(table: &ListingTable) -> Self {
        let mut texts = HashMap::new();
        for spec in &table.attributes {
            if let Some(desc) = &spec.description {
                texts.insert(description_key(&spec.id), desc.clone());
            }
        }
        LocaleTable { texts }
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.texts.insert(key.into(), text.into());
    }
}

impl TextResolver for LocaleTable {
    fn resolve(&self, key: &str) -> Option<String> {
        self.texts.get(key).cloned()
    }
}
