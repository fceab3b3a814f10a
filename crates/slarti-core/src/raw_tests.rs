use indoc::indoc;
use rowan::{TextRange, TextSize};

use crate::{Ast, BindingValue, Error, Kind, NodeKind};

const LANGUAGE_JSON: &str = indoc! {r##"
    {
        "$type": "Model",
        "elements": [
            {
                "$type": "Language",
                "name": "L",
                "$textRegion": { "offset": 0, "end": 120 },
                "tokens": [
                    { "$type": "Token", "name": "T" }
                ],
                "principles": [
                    {
                        "$type": "Principle",
                        "name": "P1",
                        "relations": [
                            {
                                "$type": "Relation",
                                "name": "test",
                                "subject": [{ "$refText": "T" }],
                                "object": [{ "$refText": "T", "$ref": "#/elements@0/tokens@0" }]
                            }
                        ]
                    },
                    {
                        "$type": "Principle",
                        "name": "P2",
                        "requires": [
                            {
                                "$type": "Require",
                                "principle": {
                                    "$refText": "P1",
                                    "$textRegion": { "offset": 70, "end": 72 }
                                }
                            }
                        ]
                    }
                ]
            }
        ]
    }
"##};

#[test]
fn lowers_language_tree() {
    let ast = Ast::from_json(LANGUAGE_JSON).unwrap();

    let summary: Vec<_> = ast
        .iter()
        .map(|(_, n)| format!("{}({})", n.kind.kind(), n.name().unwrap_or("")))
        .collect();
    insta::assert_snapshot!(summary.join("\n"), @r"
    Model()
    Language(L)
    Token(T)
    Principle(P1)
    Relation(test)
    Principle(P2)
    Require()
    ");
}

#[test]
fn reference_regions_fall_back_to_node_region() {
    let ast = Ast::from_json(LANGUAGE_JSON).unwrap();

    let (_, require) = ast
        .iter()
        .find(|(_, n)| n.kind.kind() == Kind::Require)
        .unwrap();
    let NodeKind::Require(req) = &require.kind else {
        unreachable!()
    };
    assert_eq!(req.principle.text, "P1");
    assert_eq!(req.principle.range, TextRange::new(TextSize::from(70), TextSize::from(72)));

    let (lang_id, _) = ast.iter().nth(1).unwrap();
    assert_eq!(ast[lang_id].range, TextRange::new(TextSize::from(0), TextSize::from(120)));
}

#[test]
fn parent_links_follow_json_nesting() {
    let ast = Ast::from_json(LANGUAGE_JSON).unwrap();

    let (test, _) = ast.iter().find(|(_, n)| n.name() == Some("test")).unwrap();
    let path: Vec<_> = ast
        .ancestors(test)
        .map(|a| ast.name(a).unwrap_or("<model>"))
        .collect();
    assert_eq!(path, ["P1", "L", "<model>"]);
}

#[test]
fn specification_with_literal_bindings() {
    let json = indoc! {r##"
        {
            "$type": "Model",
            "elements": [
                {
                    "$type": "Specification",
                    "name": "Themes",
                    "metadata": [{ "$type": "Metadata", "key": "intro", "value": "Theme specs." }],
                    "uses": [{ "$type": "Use", "language": { "$refText": "Colour" } }],
                    "instances": [
                        {
                            "$type": "Instance",
                            "name": "Light",
                            "of": { "$refText": "Colour.Theme" },
                            "bindings": [
                                {
                                    "$type": "Binding",
                                    "target": { "$refText": "Background" },
                                    "values": [{ "tag": "colour", "value": "#FFFFFF" }]
                                }
                            ]
                        }
                    ]
                }
            ]
        }
    "##};

    let ast = Ast::from_json(json).unwrap();

    let (_, binding) = ast
        .iter()
        .find(|(_, n)| n.kind.kind() == Kind::Binding)
        .unwrap();
    let NodeKind::Binding(binding) = &binding.kind else {
        unreachable!()
    };
    assert_eq!(binding.target.text, "Background");
    assert_eq!(
        binding.values,
        [BindingValue::Literal {
            tag: Some("colour".into()),
            text: "#FFFFFF".into(),
        }]
    );
}

#[test]
fn root_must_be_model() {
    let json = r#"{ "$type": "Token", "name": "T" }"#;

    assert_eq!(Ast::from_json(json), Err(Error::RootNotModel(Kind::Token)));
}

#[test]
fn child_must_match_its_property() {
    let json = indoc! {r#"
        {
            "$type": "Model",
            "elements": [
                {
                    "$type": "Language",
                    "name": "L",
                    "tokens": [{ "$type": "Principle", "name": "P" }]
                }
            ]
        }
    "#};

    assert_eq!(
        Ast::from_json(json),
        Err(Error::UnexpectedChild {
            parent: Kind::Language,
            child: Kind::Principle,
        })
    );
}

#[test]
fn unknown_type_is_malformed() {
    let json = r#"{ "$type": "Model", "elements": [{ "$type": "Grammar", "name": "G" }] }"#;

    let err = Ast::from_json(json).unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn missing_name_is_malformed() {
    let json = r#"{ "$type": "Model", "elements": [{ "$type": "Token" }] }"#;

    let err = Ast::from_json(json).unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}
