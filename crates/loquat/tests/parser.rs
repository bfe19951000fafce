//! Parser integration tests.

use loquat::parser::ast::{
    CommentLevel, Entry, Expression, Pattern, PatternElement, Resource, VariantKey,
};
use loquat::parser::{ErrorCode, Parser, ScanMode};

/// Parse with both scan strategies and require identical results.
fn parse_both(source: &str) -> Resource {
    let bulk = Parser::with_scan_mode(source, ScanMode::Bulk).parse();
    let scalar = Parser::with_scan_mode(source, ScanMode::Scalar).parse();
    assert_eq!(bulk, scalar, "scan modes disagree on {source:?}");
    bulk
}

fn text(value: Option<&Pattern>) -> String {
    let mut out = String::new();
    for element in &value.expect("pattern should be present").elements {
        match element {
            PatternElement::Text(t) => out.push_str(t),
            PatternElement::Placeable(_) => out.push_str("{..}"),
        }
    }
    out
}

#[test]
fn scan_modes_agree_across_a_corpus() {
    let corpus = [
        "",
        "hello = Hello, world!\n",
        "a = One\r\nb = Two\r\n",
        "multi =\n    First\n      second\n\n    third\n",
        "-brand = Loquat\nabout = About { -brand }\n",
        "emails =\n    { $count ->\n        [one] One email\n       *[other] { $count } emails\n    }\n",
        "# comment\nfoo = Foo\n## group\n### resource\n",
        "login =\n    .tooltip = Click\n",
        "bad ! entry\nok = fine\n",
        "m = { \"a\\\"b\\u0041\" }\n",
        "broken = { $x\nnext = ok\n",
        "stray = oops } here\n",
    ];
    for source in corpus {
        parse_both(source);
    }
}

#[test]
fn parses_a_simple_message() {
    let resource = parse_both("hello = Hello, world!\n");
    assert!(resource.errors.is_empty());
    assert_eq!(resource.entries.len(), 1);
    let Entry::Message(message) = &resource.entries[0] else {
        panic!("expected a message");
    };
    assert_eq!(message.id, "hello");
    assert_eq!(text(message.value.as_ref()), "Hello, world!");
    assert!(message.attributes.is_empty());
}

#[test]
fn one_malformed_entry_does_not_poison_the_rest() {
    let resource = parse_both("one = One\ntwo Two\nthree = Three\n");
    assert_eq!(resource.errors.len(), 1);
    assert_eq!(resource.errors[0].code, ErrorCode::ExpectedToken('='));
    assert_eq!(resource.errors[0].line, 2);
    let kinds: Vec<&str> = resource
        .entries
        .iter()
        .map(|entry| match entry {
            Entry::Message(_) => "message",
            Entry::Junk { .. } => "junk",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, ["message", "junk", "message"]);
    let Entry::Junk { content } = &resource.entries[1] else {
        panic!("expected junk");
    };
    assert_eq!(content, "two Two\n");
}

#[test]
fn junk_spans_extend_to_the_next_entry_head() {
    let resource = parse_both("!!! not ftl\n  continued garbage\nok = fine\n");
    assert_eq!(resource.errors.len(), 1);
    assert_eq!(resource.errors[0].code, ErrorCode::ExpectedEntry);
    let Entry::Junk { content } = &resource.entries[0] else {
        panic!("expected junk first");
    };
    assert_eq!(content, "!!! not ftl\n  continued garbage\n");
    assert!(matches!(&resource.entries[1], Entry::Message(m) if m.id == "ok"));
}

#[test]
fn multiline_patterns_strip_common_indentation() {
    let resource = parse_both("multi =\n    First line\n      indented more\n\n    after blank\n");
    assert!(resource.errors.is_empty());
    let Entry::Message(message) = &resource.entries[0] else {
        panic!("expected a message");
    };
    assert_eq!(
        text(message.value.as_ref()),
        "First line\n  indented more\n\nafter blank"
    );
}

#[test]
fn leading_blank_lines_are_dropped_and_trailing_space_trimmed() {
    let resource = parse_both("a =\n\n    text\nb = padded   \n");
    let Entry::Message(a) = &resource.entries[0] else {
        panic!("expected a message");
    };
    assert_eq!(text(a.value.as_ref()), "text");
    let Entry::Message(b) = &resource.entries[1] else {
        panic!("expected a message");
    };
    assert_eq!(text(b.value.as_ref()), "padded");
}

#[test]
fn attributes_parse_after_the_value() {
    let resource = parse_both("login = Login\n    .tooltip = Click here\n    .title = Sign in\n");
    assert!(resource.errors.is_empty());
    let Entry::Message(message) = &resource.entries[0] else {
        panic!("expected a message");
    };
    assert_eq!(text(message.value.as_ref()), "Login");
    assert_eq!(message.attributes.len(), 2);
    assert_eq!(message.attributes[0].id, "tooltip");
    assert_eq!(text(message.attribute("title")), "Sign in");
}

#[test]
fn unindented_attribute_lines_do_not_attach() {
    let resource = parse_both("key = Value\n.tooltip = x\n");
    assert_eq!(resource.errors.len(), 1);
    assert_eq!(resource.errors[0].code, ErrorCode::ExpectedEntry);
    assert_eq!(resource.errors[0].line, 2);
    let Entry::Message(message) = &resource.entries[0] else {
        panic!("expected a message");
    };
    assert!(message.attributes.is_empty());
    assert!(matches!(
        &resource.entries[1],
        Entry::Junk { content } if content == ".tooltip = x\n"
    ));
}

#[test]
fn attributes_only_message_is_valid_but_empty_message_is_not() {
    let resource = parse_both("login =\n    .tooltip = Click\n");
    assert!(resource.errors.is_empty());
    let Entry::Message(message) = &resource.entries[0] else {
        panic!("expected a message");
    };
    assert!(message.value.is_none());
    assert_eq!(message.attributes.len(), 1);

    let resource = parse_both("empty =\n");
    assert_eq!(resource.errors.len(), 1);
    assert!(matches!(
        resource.errors[0].code,
        ErrorCode::ExpectedMessageField(_)
    ));
}

#[test]
fn terms_require_a_value() {
    let resource = parse_both("-brand = Loquat\n");
    assert!(resource.errors.is_empty());
    assert!(matches!(&resource.entries[0], Entry::Term(t) if t.id == "brand"));

    let resource = parse_both("-empty =\n    .attr = x\n");
    assert_eq!(resource.errors.len(), 1);
    assert!(matches!(
        resource.errors[0].code,
        ErrorCode::ExpectedTermField(_)
    ));
}

#[test]
fn standalone_comments_attach_to_the_next_entry() {
    let resource = parse_both("# attached\nfoo = Foo\n");
    let Entry::Message(message) = &resource.entries[0] else {
        panic!("expected a message");
    };
    let comment = message.comment.as_ref().expect("comment should attach");
    assert_eq!(comment.level, CommentLevel::Standalone);
    assert_eq!(comment.content, ["attached"]);
}

#[test]
fn detached_and_leveled_comments_stay_standalone_entries() {
    let resource = parse_both("# detached\n\nfoo = Foo\n## group\n### resource\n");
    assert!(matches!(
        &resource.entries[0],
        Entry::Comment(c) if c.level == CommentLevel::Standalone
    ));
    let Entry::Message(message) = &resource.entries[1] else {
        panic!("expected a message");
    };
    assert!(message.comment.is_none());
    assert!(matches!(
        &resource.entries[2],
        Entry::Comment(c) if c.level == CommentLevel::Group
    ));
    assert!(matches!(
        &resource.entries[3],
        Entry::Comment(c) if c.level == CommentLevel::Resource
    ));
}

#[test]
fn string_literals_resolve_escapes() {
    let resource = parse_both("m = { \"a\\\"b\\\\c\\u0041\\U01F602\" }\n");
    assert!(resource.errors.is_empty(), "{:?}", resource.errors);
    let Entry::Message(message) = &resource.entries[0] else {
        panic!("expected a message");
    };
    let pattern = message.value.as_ref().unwrap();
    let PatternElement::Placeable(Expression::StringLiteral(value)) = &pattern.elements[0] else {
        panic!("expected a string literal placeable");
    };
    assert_eq!(value, "a\"b\\cA\u{1F602}");
}

#[test]
fn bad_escapes_are_rejected() {
    let resource = parse_both("m = { \"\\x\" }\n");
    assert_eq!(
        resource.errors[0].code,
        ErrorCode::UnknownEscapeSequence("\\x".to_string())
    );

    let resource = parse_both("m = { \"\\u00ZZ\" }\n");
    assert!(matches!(
        resource.errors[0].code,
        ErrorCode::InvalidUnicodeEscapeSequence(_)
    ));

    let resource = parse_both("m = { \"unterminated }\n");
    assert_eq!(
        resource.errors[0].code,
        ErrorCode::UnterminatedStringLiteral
    );
}

#[test]
fn select_expressions_record_the_default_variant() {
    let source =
        "emails =\n    { $count ->\n        [one] One email\n        [1.5] Odd\n       *[other] { $count } emails\n    }\n";
    let resource = parse_both(source);
    assert!(resource.errors.is_empty(), "{:?}", resource.errors);
    let Entry::Message(message) = &resource.entries[0] else {
        panic!("expected a message");
    };
    let pattern = message.value.as_ref().unwrap();
    let PatternElement::Placeable(Expression::Select {
        selector,
        variants,
        default,
    }) = &pattern.elements[0]
    else {
        panic!("expected a select placeable");
    };
    assert!(matches!(&**selector, Expression::VariableReference { name } if name == "count"));
    assert_eq!(variants.len(), 3);
    assert!(matches!(&variants[0].key, VariantKey::Identifier(k) if k == "one"));
    assert!(matches!(&variants[1].key, VariantKey::Number(n) if n.raw() == "1.5"));
    assert_eq!(*default, 2);
}

#[test]
fn select_default_marker_is_mandatory_and_unique() {
    let resource = parse_both("s = { $n ->\n    [one] A\n}\n");
    assert_eq!(resource.errors[0].code, ErrorCode::MissingDefaultVariant);

    let resource = parse_both("s = { $n ->\n   *[a] A\n   *[b] B\n}\n");
    assert_eq!(resource.errors[0].code, ErrorCode::MultipleDefaultVariants);

    let resource = parse_both("s = { $n ->\n}\n");
    assert_eq!(resource.errors[0].code, ErrorCode::MissingVariants);
}

#[test]
fn invalid_selectors_are_rejected() {
    let resource = parse_both("s = { foo ->\n   *[other] O\n}\n");
    assert_eq!(
        resource.errors[0].code,
        ErrorCode::MessageReferenceAsSelector
    );

    let resource = parse_both("s = { foo.attr ->\n   *[other] O\n}\n");
    assert_eq!(
        resource.errors[0].code,
        ErrorCode::MessageAttributeAsSelector
    );

    let resource = parse_both("s = { -term ->\n   *[other] O\n}\n");
    assert_eq!(resource.errors[0].code, ErrorCode::TermReferenceAsSelector);
}

#[test]
fn term_attributes_cannot_be_placeables() {
    let resource = parse_both("m = { -brand.short }\n");
    assert_eq!(resource.errors[0].code, ErrorCode::TermAttributeAsPlaceable);
}

#[test]
fn call_argument_rules_are_enforced() {
    let resource = parse_both("m = { -term(\"x\") }\n");
    assert_eq!(resource.errors[0].code, ErrorCode::PositionalArgumentInTerm);

    let resource = parse_both("m = { NUMBER(a: 1, a: 2) }\n");
    assert_eq!(
        resource.errors[0].code,
        ErrorCode::DuplicatedNamedArgument("a".to_string())
    );

    let resource = parse_both("m = { NUMBER(a: 1, $x) }\n");
    assert_eq!(
        resource.errors[0].code,
        ErrorCode::PositionalArgumentFollowsNamed
    );

    let resource = parse_both("m = { NUMBER(a: $x) }\n");
    assert_eq!(resource.errors[0].code, ErrorCode::ExpectedLiteral);
}

#[test]
fn braces_must_balance_and_not_nest() {
    let resource = parse_both("m = text } more\n");
    assert_eq!(resource.errors[0].code, ErrorCode::UnbalancedClosingBrace);

    let resource = parse_both("m = { { $x } }\n");
    assert_eq!(resource.errors[0].code, ErrorCode::NestedPlaceable);
}

#[test]
fn crlf_sources_parse_like_lf_sources() {
    let resource = parse_both("a = One\r\nb = Two\r\n");
    assert!(resource.errors.is_empty());
    let Entry::Message(a) = &resource.entries[0] else {
        panic!("expected a message");
    };
    assert_eq!(text(a.value.as_ref()), "One");
    assert!(matches!(&resource.entries[1], Entry::Message(m) if m.id == "b"));
}

#[test]
fn resources_serialize_to_json() {
    let resource = parse_both("hello = Hi {$name}\n");
    let json = serde_json::to_value(&resource).unwrap();
    assert_eq!(json["entries"][0]["Message"]["id"], "hello");
    assert!(json["errors"].as_array().unwrap().is_empty());
}

#[test]
fn resources_iterate_messages_and_terms() {
    let resource = parse_both("a = A\n-t = T\nb = B\n");
    let ids: Vec<&str> = resource.messages().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
    let terms: Vec<&str> = resource.terms().map(|t| t.id.as_str()).collect();
    assert_eq!(terms, ["t"]);
}
