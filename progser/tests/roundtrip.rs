use std::str::FromStr;

use progser::{Codec, CodecConfig, CodecError, ListElementPolicy, TypeLibrary, magic::ATTR_TYPE};
use progtree::{
    DynamicValue, Grammar, ProgramTree,
    bigdecimal::BigDecimal,
    tests_utils::{INPUT_SYMBOL, substring_grammar},
};

fn value_roundtrip(codec: &Codec, value: DynamicValue) -> DynamicValue {
    let doc = codec.encode_value(&value).unwrap();
    codec.decode_value(&doc).unwrap()
}

fn homogeneous_codec() -> Codec {
    let mut config = CodecConfig::default();
    config.lists.elements = ListElementPolicy::Homogeneous;
    Codec::new(TypeLibrary::new(), config)
}

fn sample_programs(g: &Grammar) -> Vec<ProgramTree> {
    let k = g.symbol("k");
    let s = g.symbol("s");
    let xs = g.symbol("xs");
    let q = g.symbol("q");
    let v = g.symbol(INPUT_SYMBOL);

    let substring = g
        .rule("Substring")
        .construct(vec![
            ProgramTree::literal(&k, 0i32),
            ProgramTree::literal(&k, 6i32),
        ])
        .unwrap();
    let input = g
        .rule("Input")
        .construct(vec![ProgramTree::variable(&v)])
        .unwrap();
    let greeting = g
        .rule("Concat")
        .construct(vec![
            g.rule("Const")
                .construct(vec![ProgramTree::literal(&s, "Hello, ")])
                .unwrap(),
            g.rule("Upper").construct(vec![input.clone()]).unwrap(),
        ])
        .unwrap();
    let joined = g
        .rule("Join")
        .construct(vec![ProgramTree::literal(
            &xs,
            vec![
                DynamicValue::from("a"),
                DynamicValue::from(1i32),
                DynamicValue::from('c'),
            ],
        )])
        .unwrap();
    let applied = g
        .rule("Apply")
        .construct(vec![ProgramTree::literal(&q, greeting.clone())])
        .unwrap();

    vec![
        ProgramTree::variable(&v),
        ProgramTree::literal(&s, ""),
        substring,
        input,
        greeting,
        joined,
        applied,
    ]
}

#[test]
fn primitive_values_roundtrip() {
    let codec = Codec::default();
    let values = [
        DynamicValue::from(42i32),
        DynamicValue::from("Miller"),
        DynamicValue::from(true),
        DynamicValue::from(BigDecimal::from_str("3.14").unwrap()),
    ];
    for value in values {
        assert_eq!(value_roundtrip(&codec, value.clone()), value);
    }
}

#[test]
fn every_primitive_kind_keeps_its_kind() {
    let codec = Codec::default();
    let values = [
        DynamicValue::Int16(-7),
        DynamicValue::Int32(i32::MIN),
        DynamicValue::Int64(i64::MAX),
        DynamicValue::UInt16(u16::MAX),
        DynamicValue::UInt32(7),
        DynamicValue::UInt64(u64::MAX),
        DynamicValue::Float32(-0.25),
        DynamicValue::Float64(1e-300),
        DynamicValue::Bool(false),
        DynamicValue::Char('é'),
        DynamicValue::Byte(255),
        DynamicValue::SByte(-128),
        DynamicValue::from("  padded  "),
    ];
    for value in values {
        let decoded = value_roundtrip(&codec, value.clone());
        assert_eq!(decoded.kind(), value.kind());
        assert_eq!(decoded, value);
    }
}

#[test]
fn int32_and_int64_are_distinct() {
    let codec = Codec::default();
    let doc = codec.encode_value(&DynamicValue::Int64(42)).unwrap();
    assert_eq!(doc.attribute(ATTR_TYPE), Some("int64"));
    assert_ne!(codec.decode_value(&doc).unwrap(), DynamicValue::Int32(42));
}

#[test]
fn lists_preserve_order_and_length() {
    let codec = Codec::default();
    let list = DynamicValue::from(vec![1i32, 2, 3]);
    let decoded = value_roundtrip(&codec, list.clone());
    assert_eq!(decoded, list);
    assert_eq!(decoded.as_list().map(<[_]>::len), Some(3));

    let empty = DynamicValue::List(vec![]);
    assert_eq!(value_roundtrip(&codec, empty.clone()), empty);
}

#[test]
fn inferred_lists_may_mix_kinds() {
    let codec = Codec::default();
    let mixed = DynamicValue::List(vec![
        DynamicValue::from(1i32),
        DynamicValue::from("two"),
        DynamicValue::from(vec![3u64]),
        DynamicValue::List(vec![]),
    ]);
    let doc = codec.encode_value(&mixed).unwrap();
    assert_eq!(doc.attribute(ATTR_TYPE), Some("list"));
    assert_eq!(codec.decode_value(&doc).unwrap(), mixed);
}

#[test]
fn homogeneous_lists_carry_a_hint() {
    let codec = homogeneous_codec();
    let list = DynamicValue::from(vec!["a", "b"]);
    let doc = codec.encode_value(&list).unwrap();
    assert_eq!(doc.attribute(ATTR_TYPE), Some("list<string>"));
    assert_eq!(codec.decode_value(&doc).unwrap(), list);

    // An inferring codec reads hinted documents too.
    assert_eq!(Codec::default().decode_value(&doc).unwrap(), list);

    let empty = DynamicValue::List(vec![]);
    assert_eq!(value_roundtrip(&codec, empty.clone()), empty);
}

#[test]
fn homogeneous_policy_rejects_mixed_lists() {
    let codec = homogeneous_codec();
    let mixed = DynamicValue::List(vec![DynamicValue::from(1i32), DynamicValue::from(1i64)]);
    match codec.encode_value(&mixed).unwrap_err() {
        CodecError::HeterogeneousList {
            expected, found, path,
        } => {
            assert_eq!(expected, "int32");
            assert_eq!(found, "int64");
            assert_eq!(path.to_string(), "/1");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn hinted_documents_are_validated() {
    let codec = homogeneous_codec();
    let mut doc = codec
        .encode_value(&DynamicValue::from(vec![1i32, 2]))
        .unwrap();
    doc.set_attribute(ATTR_TYPE, "list<bool>");
    assert!(codec.decode_value(&doc).unwrap_err().is_heterogeneous_list());
}

#[test]
fn program_trees_roundtrip() {
    let grammar = substring_grammar();
    let codec = Codec::default();
    for tree in sample_programs(&grammar) {
        let doc = codec.encode(&tree).unwrap();
        let decoded = codec.decode(&doc, &grammar).unwrap();
        assert_eq!(decoded, tree, "round trip of {tree}");
        assert_eq!(decoded.node_count(), tree.node_count());
    }
}

#[test]
fn program_trees_roundtrip_with_homogeneous_lists() {
    let grammar = substring_grammar();
    let codec = homogeneous_codec();
    let xs = grammar.symbol("xs");
    let tree = grammar
        .rule("Join")
        .construct(vec![ProgramTree::literal(&xs, vec!["x", "y", "z"])])
        .unwrap();
    let doc = codec.encode(&tree).unwrap();
    assert_eq!(codec.decode(&doc, &grammar).unwrap(), tree);
}

#[test]
fn nested_program_requires_a_grammar() {
    let grammar = substring_grammar();
    let v = grammar.symbol(INPUT_SYMBOL);
    let nested = DynamicValue::from(
        grammar
            .rule("Input")
            .construct(vec![ProgramTree::variable(&v)])
            .unwrap(),
    );

    let codec = Codec::default();
    let doc = codec.encode_value(&nested).unwrap();
    assert_eq!(doc.attribute(ATTR_TYPE), Some("program"));

    let err = codec.decode_value(&doc).unwrap_err();
    assert!(err.is_missing_grammar_context());

    assert_eq!(codec.decode_value_with(&doc, &grammar).unwrap(), nested);
}
