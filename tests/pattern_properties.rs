//! Property tests for pattern parsing and matching.

use gateway_core::routing::{parse, validate, PatternMatcher};
use proptest::prelude::*;

/// One generated path segment with the text the path carries for it.
#[derive(Debug, Clone)]
enum Segment {
    /// Literal text, optionally ending in an escaped special character.
    Literal { text: String, escaped: Option<char> },
    Variable(String),
    Wildcard(String),
    /// `(/:v)` followed by a literal; `None` when the path skips the group.
    Optional(Option<String>),
}

/// Segment values start with a digit so they never read as a literal.
fn segment_value() -> impl Strategy<Value = String> {
    "[0-9][A-Za-z0-9_.~-]{0,7}"
}

fn segment() -> impl Strategy<Value = Segment> {
    prop_oneof![
        ("[a-z]{0,3}", prop::option::of(prop::sample::select(vec![':', '(', ')', '*'])))
            .prop_map(|(text, escaped)| Segment::Literal { text, escaped }),
        segment_value().prop_map(Segment::Variable),
        segment_value().prop_map(Segment::Wildcard),
        prop::option::of(segment_value()).prop_map(Segment::Optional),
    ]
}

/// Pattern text assembled from well-formed pieces, optionally grouped.
fn pattern_text() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[a-z0-9.-]{1,4}",
        Just("/".to_string()),
        "[a-z_][a-z0-9_]{0,3}".prop_map(|name| format!(":{name}/")),
        Just("*".to_string()),
        prop_oneof![Just(r"\:"), Just(r"\("), Just(r"\)"), Just(r"\*"), Just(r"\x")].prop_map(str::to_string),
    ];
    let group = prop::collection::vec(piece.clone(), 1..4).prop_map(|p| format!("({})", p.concat()));
    prop::collection::vec(prop_oneof![3 => piece, 1 => group], 0..10).prop_map(|p| p.concat())
}

proptest! {
    #[test]
    fn prop_display_round_trips(pattern in pattern_text()) {
        let node = parse(&pattern).unwrap();
        prop_assert_eq!(parse(&node.to_string()).unwrap(), node);
    }

    #[test]
    fn prop_arbitrary_input_never_panics(pattern in r"[a-c/:()*\\_0-9]{0,24}") {
        if let Ok(node) = parse(&pattern) {
            prop_assert_eq!(parse(&node.to_string()).unwrap(), node);
        }
    }

    #[test]
    fn prop_instantiated_paths_match(
        segments in prop::collection::vec(segment(), 1..6),
        trailing_separator in any::<bool>(),
        suffix in "(/[0-9]{1,4}){0,2}",
    ) {
        // Literals carry their index so no two segments read the same.
        let mut pattern = String::new();
        let mut path = String::new();
        for (i, segment) in segments.iter().enumerate() {
            match segment {
                Segment::Literal { text, escaped } => {
                    pattern.push_str(&format!("/lit{i}-{text}"));
                    path.push_str(&format!("/LIT{i}-{}", text.to_uppercase()));
                    if let Some(c) = escaped {
                        pattern.push('\\');
                        pattern.push(*c);
                        path.push(*c);
                    }
                }
                Segment::Variable(value) => {
                    pattern.push_str(&format!("/:v{i}"));
                    path.push_str(&format!("/{value}"));
                }
                Segment::Wildcard(value) => {
                    pattern.push_str("/*");
                    path.push_str(&format!("/{value}"));
                }
                Segment::Optional(value) => {
                    pattern.push_str(&format!("(/:v{i})/opt{i}-"));
                    if let Some(value) = value {
                        path.push_str(&format!("/{value}"));
                    }
                    path.push_str(&format!("/opt{i}-"));
                }
            }
        }
        if trailing_separator {
            pattern.push('/');
        }
        path.push_str(&suffix);

        let node = parse(&pattern).unwrap();
        validate(&node).unwrap();
        let matcher = PatternMatcher::compile(&node).unwrap();
        let matched = matcher.matches(&path).unwrap();

        let mut declared = 0;
        for (i, segment) in segments.iter().enumerate() {
            let expected = match segment {
                Segment::Variable(value) => value.as_str(),
                Segment::Optional(value) => value.as_deref().unwrap_or(""),
                _ => continue,
            };
            declared += 1;
            prop_assert_eq!(matched.variables.get(&format!("v{i}")).map(String::as_str), Some(expected));
        }
        prop_assert_eq!(matched.variables.len(), declared);
        prop_assert_eq!(matched.suffix, suffix.trim_start_matches('/'));
    }
}
