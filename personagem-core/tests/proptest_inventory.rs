//! Property-Based Tests for the inventory codec and the stores.
//!
//! Uses `proptest` to check that no list of items is lost, reordered or
//! altered on its way into a text column and back.

use proptest::prelude::*;

use personagem_core::codec::{self, CodecError, DelimitedCodec, InventoryCodec, JsonCodec};
use personagem_core::{Character, CharacterStore, MemoryStore, PersonagemConfig, SqliteStore};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Item tokens biased towards the characters the delimited codec cares about.
fn arb_token() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z ]{1,12}",
        "[a-z,\\\\]{1,8}",
        "\\PC{1,16}",
        Just(String::new()),
    ]
}

fn arb_items() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_token(), 0..12)
}

fn arb_character() -> impl Strategy<Value = Character> {
    (
        "\\PC{0,20}",
        "\\PC{0,20}",
        "\\PC{0,12}",
        any::<i32>(),
        arb_items(),
        any::<i32>(),
        any::<i32>(),
    )
        .prop_map(|(name, alias, class, level, items, strength, defense)| {
            let mut c = Character::new();
            c.set_name(name);
            c.set_adventurer_name(alias);
            c.set_class(class);
            c.set_level(level);
            c.set_inventory(items);
            c.set_strength(strength);
            c.set_defense(defense);
            c
        })
}

// ---------------------------------------------------------------------------
// Property: delimited round-trip preserves order and text
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn delimited_round_trip(items in arb_items()) {
        let text = codec::encode(&items).expect("every list encodes");
        prop_assert_eq!(codec::decode(&text).expect("canonical text decodes"), items);
    }
}

// ---------------------------------------------------------------------------
// Property: an unescaped separator never appears inside a token's encoding
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn separator_count_matches_item_count(items in prop::collection::vec(arb_token(), 1..12)) {
        let text = codec::encode(&items).expect("encode");
        let mut separators = 0usize;
        let mut escaped = false;
        for ch in text.chars() {
            if escaped {
                escaped = false;
            } else if ch == DelimitedCodec::ESCAPE {
                escaped = true;
            } else if ch == DelimitedCodec::SEPARATOR {
                separators += 1;
            }
        }
        prop_assert_eq!(separators + 1, items.len());
    }
}

// ---------------------------------------------------------------------------
// Property: decode never panics, and whatever it accepts re-encodes to itself
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn decode_is_total_and_canonical(text in "[a-c_,\\\\]{0,16}") {
        match codec::decode(&text) {
            Ok(items) => prop_assert_eq!(codec::encode(&items).expect("re-encode"), text),
            Err(CodecError::Malformed { position, .. }) => prop_assert!(position <= text.len()),
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }
}

// ---------------------------------------------------------------------------
// Property: an empty token anywhere survives, never silently dropped
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn empty_token_round_trips(mut items in arb_items(), at in any::<prop::sample::Index>()) {
        let index = at.index(items.len() + 1);
        items.insert(index, String::new());
        let text = codec::encode(&items).expect("encode");
        let decoded = codec::decode(&text).expect("decode");
        prop_assert_eq!(decoded.len(), items.len());
        prop_assert_eq!(decoded, items);
    }
}

// ---------------------------------------------------------------------------
// Property: JSON codec round-trips every list, empty tokens included
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn json_round_trip(items in prop::collection::vec("\\PC{0,10}", 0..12)) {
        let text = JsonCodec.encode(&items).expect("encode");
        prop_assert_eq!(JsonCodec.decode(&text).expect("decode"), items);
    }
}

// ---------------------------------------------------------------------------
// Property: stores give back exactly what was saved
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn stores_round_trip_records(mut character in arb_character()) {
        let config = PersonagemConfig::default();
        let sqlite = SqliteStore::open_in_memory(&config).expect("open");
        let memory = MemoryStore::new();

        let store_list: [&dyn CharacterStore; 2] = [&sqlite, &memory];
        for store in store_list {
            character.set_id(None);
            let id = store.save(&mut character).expect("save");
            let loaded = store.get(id).expect("get");
            prop_assert_eq!(&loaded, &character);
        }
    }
}
