use rand::rngs::StdRng;
use rand::SeedableRng;

use trade_sim::canonical::{description_key, strip_level_suffix};
use trade_sim::listings::{AttributeSpec, Listing, ListingTable, LocaleTable};
use trade_sim::offer::{OfferSource, TextResolver};

const TEST_SEED: u64 = 42;

fn spec(id: &str, name: &str, max_level: u32, weight: u32) -> AttributeSpec {
    AttributeSpec {
        id: id.to_string(),
        name: name.to_string(),
        max_level,
        weight,
        treasure: false,
        description: None,
    }
}

fn book_table(attributes: Vec<AttributeSpec>) -> ListingTable {
    ListingTable {
        slots: vec![Listing::AttributeItem {
            item: "minecraft:enchanted_book".to_string(),
        }],
        attributes,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Weighted sampling
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn weighted_choice_skews_toward_heavy_attributes() {
    let table = book_table(vec![
        spec("t:common", "Common", 1, 90),
        spec("t:rare", "Rare", 1, 10),
    ]);
    let mut rng = StdRng::seed_from_u64(TEST_SEED);

    let mut common = 0u32;
    let mut rare = 0u32;
    for _ in 0..10_000 {
        let offer = table.sample(0, &mut rng).unwrap();
        match offer.attributes[0].tag.as_str() {
            "t:common" => common += 1,
            "t:rare" => rare += 1,
            other => panic!("unexpected tag {}", other),
        }
    }
    assert!(
        common > rare * 5,
        "90/10 weights should dominate: {} vs {}",
        common,
        rare
    );
}

#[test]
fn zero_weight_table_yields_nothing() {
    let table = book_table(vec![spec("t:ghost", "Ghost", 1, 0)]);
    let mut rng = StdRng::seed_from_u64(TEST_SEED);
    assert!(table.sample(0, &mut rng).is_none());
}

#[test]
fn out_of_range_slot_yields_nothing() {
    let table = ListingTable::default();
    let mut rng = StdRng::seed_from_u64(TEST_SEED);
    assert!(table.sample(99, &mut rng).is_none());
}

// ═══════════════════════════════════════════════════════════════════════
// Pricing and names
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn book_prices_stay_within_merchant_bounds() {
    let table = ListingTable::default();
    let mut rng = StdRng::seed_from_u64(TEST_SEED);
    let book_slot = table
        .slots
        .iter()
        .position(|s| matches!(s, Listing::AttributeItem { .. }))
        .unwrap();

    for _ in 0..5_000 {
        let offer = table.sample(book_slot, &mut rng).unwrap();
        let cost = offer.cost_a.quantity;
        assert!((2..=64).contains(&cost), "cost {} out of range", cost);
        assert!(offer.attributes[0].level >= 1);
        assert_eq!(offer.cost_b.as_ref().unwrap().quantity, 1);
    }
}

#[test]
fn treasure_attributes_cost_double() {
    let mut treasure = spec("t:hoard", "Hoard", 1, 1);
    treasure.treasure = true;
    let table = book_table(vec![treasure]);
    let mut rng = StdRng::seed_from_u64(TEST_SEED);

    for _ in 0..1_000 {
        let offer = table.sample(0, &mut rng).unwrap();
        let cost = offer.cost_a.quantity;
        assert!(cost >= 10, "doubled level-1 price is at least 10, got {}", cost);
        assert_eq!(cost % 2, 0, "doubled prices are even, got {}", cost);
    }
}

#[test]
fn single_level_names_have_no_suffix() {
    let table = book_table(vec![spec("t:mending", "Mending", 1, 1)]);
    let mut rng = StdRng::seed_from_u64(TEST_SEED);
    let offer = table.sample(0, &mut rng).unwrap();
    assert_eq!(offer.attributes[0].full_name, "Mending");
}

#[test]
fn multi_level_names_carry_roman_suffix() {
    let table = book_table(vec![spec("t:power", "Power", 5, 1)]);
    let mut rng = StdRng::seed_from_u64(TEST_SEED);

    for _ in 0..50 {
        let offer = table.sample(0, &mut rng).unwrap();
        let attr = &offer.attributes[0];
        assert!(
            attr.full_name.starts_with("Power "),
            "got {}",
            attr.full_name
        );
        assert_eq!(strip_level_suffix(&attr.full_name), "Power");
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Loading and locale
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn toml_tables_load_with_defaults() {
    let text = r#"
[[slots]]
kind = "commodity"
item = "minecraft:emerald"
price = 1

[[slots]]
kind = "attribute_item"
item = "minecraft:enchanted_book"

[[attributes]]
id = "pack:haste"
name = "Haste"
max_level = 3
weight = 4
description = "Mine faster."

[[attributes]]
id = "pack:gloom"
name = "Gloom"
max_level = 1
"#;
    let path = std::env::temp_dir().join("trade_sim_listings_test.toml");
    std::fs::write(&path, text).unwrap();
    let table = ListingTable::load(&path).expect("table should load");
    let _ = std::fs::remove_file(&path);

    assert_eq!(table.slots.len(), 2);
    assert_eq!(table.attributes.len(), 2);
    assert_eq!(table.attributes[0].weight, 4);
    assert_eq!(table.attributes[1].weight, 1, "weight defaults to 1");
    assert!(!table.attributes[1].treasure);
    assert_eq!(table.attributes[1].description, None);
}

#[test]
fn malformed_toml_is_an_error() {
    let path = std::env::temp_dir().join("trade_sim_listings_bad.toml");
    std::fs::write(&path, "slots = \"not a table\"").unwrap();
    assert!(ListingTable::load(&path).is_err());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn locale_resolves_known_descriptions_and_misses_cleanly() {
    let mut sharp = spec("t:sharp", "Sharpness", 5, 10);
    sharp.description = Some("Extra damage.".to_string());
    let silent = spec("t:silent", "Silent", 1, 1);
    let table = book_table(vec![sharp, silent]);

    let locale = LocaleTable::from_table(&table);
    assert_eq!(
        locale.resolve(&description_key("t:sharp")).as_deref(),
        Some("Extra damage.")
    );
    assert_eq!(locale.resolve(&description_key("t:silent")), None);
}

#[test]
fn locale_accepts_manual_entries() {
    let mut locale = LocaleTable::default();
    locale.insert("attribute.pack.haste.desc", "Mine faster.");
    assert_eq!(
        locale.resolve("attribute.pack.haste.desc").as_deref(),
        Some("Mine faster.")
    );
}
