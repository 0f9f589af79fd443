//! End-to-end engine tests over the public library surface.
//!
//! Exercises the full decode -> plan -> compose -> encode pipeline the
//! way a tool caller would: raw bytes in, raw bytes out.

use linepatch::{apply, fingerprint, ApplyError, EditRequest, Tag};

fn tag_for(raw: &[u8], index: usize) -> String {
    let doc = linepatch::Document::decode(raw);
    Tag::new(index, &doc.lines[index - 1]).to_string()
}

fn content(items: &[&str]) -> Vec<String> {
    items.iter().map(|l| l.to_string()).collect()
}

#[test]
fn empty_batch_returns_identical_bytes() {
    let raw: &[u8] = b"alpha\nbeta\ngamma\n";
    let outcome = apply(raw, &[]).unwrap();
    assert_eq!(outcome.bytes, raw);
    assert_eq!(outcome.first_changed_line, None);
    assert!(outcome.noop_edits.is_empty());
}

#[test]
fn empty_batch_round_trips_bom_and_crlf() {
    let raw: &[u8] = b"\xef\xbb\xbfalpha\r\nbeta\r\n";
    let outcome = apply(raw, &[]).unwrap();
    assert_eq!(outcome.bytes, raw);
}

#[test]
fn stale_tag_is_rejected_with_details() {
    // Tag taken when line 2 still read "hello"; the file has moved on.
    let raw: &[u8] = b"one\nworld\nthree\n";
    let edits = vec![EditRequest::Set {
        tag: Tag::new(2, "hello").to_string(),
        content: content(&["X"]),
    }];

    match apply(raw, &edits) {
        Err(ApplyError::Validation(e)) => {
            let msg = e.to_string();
            assert!(msg.contains("line 2"), "message: {msg}");
            assert!(msg.contains(&fingerprint("hello")), "message: {msg}");
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn conflicting_batch_applies_nothing() {
    let raw: &[u8] = b"l1\nl2\nl3\nl4\nl5\n";
    let edits = vec![
        EditRequest::Replace {
            first: tag_for(raw, 2),
            last: tag_for(raw, 4),
            content: content(&["X"]),
        },
        EditRequest::Set {
            tag: tag_for(raw, 3),
            content: content(&["Y"]),
        },
    ];

    assert!(matches!(apply(raw, &edits), Err(ApplyError::Conflict(_))));
    // The input is untouched by construction: apply never mutates its
    // argument, so a caller that only persists on Ok loses nothing.
}

#[test]
fn validation_is_order_independent() {
    let raw: &[u8] = b"l1\nl2\nl3\nl4\nl5\n";
    let forward = vec![
        EditRequest::Set {
            tag: tag_for(raw, 2),
            content: content(&["TWO"]),
        },
        EditRequest::Set {
            tag: tag_for(raw, 4),
            content: content(&["FOUR"]),
        },
    ];
    let reversed: Vec<EditRequest> = forward.iter().rev().cloned().collect();

    let a = apply(raw, &forward).unwrap();
    let b = apply(raw, &reversed).unwrap();
    assert_eq!(a.bytes, b.bytes);
    assert_eq!(a.first_changed_line, b.first_changed_line);
}

#[test]
fn noop_edit_is_reported() {
    let raw: &[u8] = b"one\ntwo\nthree\n";
    let edits = vec![EditRequest::Set {
        tag: tag_for(raw, 2),
        content: content(&["two"]),
    }];

    let outcome = apply(raw, &edits).unwrap();
    assert_eq!(outcome.noop_edits, vec![0]);
    assert_eq!(outcome.first_changed_line, None);
    assert_eq!(outcome.bytes, raw);
}

#[test]
fn anchorless_append_lands_at_eof() {
    let raw: &[u8] = b"one\ntwo\n";
    let edits = vec![EditRequest::Append {
        after: None,
        content: content(&["tail"]),
    }];

    let outcome = apply(raw, &edits).unwrap();
    assert_eq!(outcome.lines, vec!["one", "two", "tail"]);
    assert_eq!(outcome.bytes, b"one\ntwo\ntail\n");
}

#[test]
fn anchorless_prepend_lands_at_bof() {
    let raw: &[u8] = b"one\ntwo\n";
    let edits = vec![EditRequest::Prepend {
        before: None,
        content: content(&["head"]),
    }];

    let outcome = apply(raw, &edits).unwrap();
    assert_eq!(outcome.lines, vec!["head", "one", "two"]);
    assert_eq!(outcome.first_changed_line, Some(1));
}

#[test]
fn bom_and_crlf_survive_an_edit() {
    let raw: &[u8] = b"\xef\xbb\xbffirst\r\nsecond\r\nthird\r\n";
    let edits = vec![EditRequest::Set {
        tag: tag_for(raw, 2),
        content: content(&["SECOND"]),
    }];

    let outcome = apply(raw, &edits).unwrap();
    assert_eq!(outcome.bytes, b"\xef\xbb\xbffirst\r\nSECOND\r\nthird\r\n");
}

#[test]
fn insert_between_anchors_places_after_the_first() {
    let raw: &[u8] = b"one\ntwo\nthree\n";
    let edits = vec![EditRequest::Insert {
        after: tag_for(raw, 1),
        before: tag_for(raw, 2),
        content: content(&["between"]),
    }];

    let outcome = apply(raw, &edits).unwrap();
    assert_eq!(outcome.lines, vec!["one", "between", "two", "three"]);
    assert_eq!(outcome.first_changed_line, Some(2));
}

#[test]
fn insert_with_drifted_before_anchor_fails() {
    let raw: &[u8] = b"one\nworld\nthree\n";
    let edits = vec![EditRequest::Insert {
        after: tag_for(raw, 1),
        // Anchor taken when line 2 still read "hello".
        before: Tag::new(2, "hello").to_string(),
        content: content(&["between"]),
    }];

    assert!(matches!(apply(raw, &edits), Err(ApplyError::Validation(_))));
}

#[test]
fn range_replace_with_growth() {
    let raw: &[u8] = b"a\nb\nc\nd\n";
    let edits = vec![EditRequest::Replace {
        first: tag_for(raw, 2),
        last: tag_for(raw, 3),
        content: content(&["x", "y", "z"]),
    }];

    let outcome = apply(raw, &edits).unwrap();
    assert_eq!(outcome.lines, vec!["a", "x", "y", "z", "d"]);
    assert_eq!(outcome.first_changed_line, Some(2));
}

#[test]
fn delete_a_range_entirely() {
    let raw: &[u8] = b"a\nb\nc\nd\n";
    let edits = vec![EditRequest::Replace {
        first: tag_for(raw, 2),
        last: tag_for(raw, 3),
        content: vec![],
    }];

    let outcome = apply(raw, &edits).unwrap();
    assert_eq!(outcome.lines, vec!["a", "d"]);
}

#[test]
fn wire_format_deserializes_and_applies() {
    let raw: &[u8] = b"one\ntwo\nthree\n";
    let json = format!(
        r#"[
            {{"op": "set", "tag": "{}", "content": ["TWO"]}},
            {{"op": "append", "content": ["tail"]}}
        ]"#,
        tag_for(raw, 2)
    );

    let edits: Vec<EditRequest> = serde_json::from_str(&json).unwrap();
    let outcome = apply(raw, &edits).unwrap();
    assert_eq!(outcome.lines, vec!["one", "TWO", "three", "tail"]);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn line_strategy() -> impl Strategy<Value = String> {
        // Printable content without terminators; the engine owns those.
        "[ -~]{0,40}"
    }

    proptest! {
        #[test]
        fn empty_batch_always_round_trips(
            lines in proptest::collection::vec(line_strategy(), 0..20),
            trailing in proptest::bool::ANY,
        ) {
            let mut text = lines.join("\n");
            if trailing && !text.is_empty() {
                text.push('\n');
            }
            let outcome = apply(text.as_bytes(), &[]).unwrap();
            prop_assert_eq!(outcome.bytes, text.as_bytes());
            prop_assert_eq!(outcome.first_changed_line, None);
        }

        #[test]
        fn valid_set_always_applies(
            lines in proptest::collection::vec(line_strategy(), 1..20),
            replacement in line_strategy(),
        ) {
            let text = format!("{}\n", lines.join("\n"));
            let index = 1 + lines.len() / 2;
            let edits = vec![EditRequest::Set {
                tag: Tag::new(index, &lines[index - 1]).to_string(),
                content: vec![replacement.clone()],
            }];

            let outcome = apply(text.as_bytes(), &edits).unwrap();
            prop_assert_eq!(&outcome.lines[index - 1], &replacement);
            prop_assert_eq!(outcome.lines.len(), lines.len());
        }

        #[test]
        fn tags_from_render_always_validate(
            lines in proptest::collection::vec(line_strategy(), 1..20),
        ) {
            let rendered = linepatch::render_lines(&lines, 1);
            for row in rendered.split('\n') {
                let (tag_text, _) = row.split_once('|').unwrap();
                let tag = Tag::parse(tag_text).unwrap();
                prop_assert!(tag.validate(&lines).is_ok());
            }
        }
    }
}
