//! Literal scenarios S1-S6 from spec.md §8, checked byte-for-byte.

use serde_toon::{decode, encode, value, DecodeOptions, EncodeOptions, ExpandPaths, KeyFolding};

#[test]
fn s1_plain_object_sorts_keys_lexicographically() {
    let v = value!({ "name": "Alice", "age": 30 });
    let toon = encode(&v, &EncodeOptions::new()).unwrap();
    assert_eq!(toon, "age: 30\nname: Alice");
}

#[test]
fn s2_inline_string_array() {
    let v = value!({ "tags": ["elixir", "toon"] });
    let toon = encode(&v, &EncodeOptions::new()).unwrap();
    assert_eq!(toon, "tags[2]: elixir,toon");
}

#[test]
fn s3_tabular_array_of_objects() {
    let v = value!({
        "users": [
            { "id": 1, "name": "A" },
            { "id": 2, "name": "B" }
        ]
    });
    let toon = encode(&v, &EncodeOptions::new()).unwrap();
    assert_eq!(toon, "users[2]{id,name}:\n  1,A\n  2,B");
}

#[test]
fn s4_key_folding_collapses_single_key_chain() {
    let v = value!({ "a": { "b": { "c": 1 } } });
    let opts = EncodeOptions::new().with_key_folding(KeyFolding::Safe);
    let toon = encode(&v, &opts).unwrap();
    assert_eq!(toon, "a.b.c: 1");
}

#[test]
fn s5_list_array_with_nested_sublists() {
    let v = value!({ "items": [[], [42], []] });
    let toon = encode(&v, &EncodeOptions::new()).unwrap();
    assert_eq!(toon, "items[3]:\n  - [0]:\n  - [1]: 42\n  - [0]:");
}

#[test]
fn s6_path_expansion_merges_dotted_keys() {
    let input = "a.b: 1\na.c: 2";
    let opts = DecodeOptions::new().with_expand_paths(ExpandPaths::Safe);
    let decoded = decode(input, &opts).unwrap();
    let expected = value!({ "a": { "b": 1, "c": 2 } });
    assert_eq!(decoded, expected);
}
