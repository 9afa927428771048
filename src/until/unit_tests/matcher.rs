use crate::until::matcher::ChunkMatcher;

#[test]
fn finds_substring() {
    let matcher = ChunkMatcher::new("Server listening");
    assert!(matcher.is_match(b"2024 Server listening on port 3000\n"));
    assert!(matcher.is_match(b"Server listening"));
}

#[test]
fn case_sensitive() {
    let matcher = ChunkMatcher::new("ready");
    assert!(!matcher.is_match(b"READY\n"));
    assert!(!matcher.is_match(b"Ready\n"));
}

#[test]
fn does_not_span_chunks() {
    let matcher = ChunkMatcher::new("listening");
    assert!(!matcher.is_match(b"server is listen"));
    assert!(!matcher.is_match(b"ing on 3000\n"));
}

#[test]
fn short_and_empty_input() {
    let matcher = ChunkMatcher::new("ready");
    assert!(!matcher.is_match(b""));
    assert!(!matcher.is_match(b"rea"));

    let empty = ChunkMatcher::new("");
    assert!(!empty.is_match(b"anything"));
}

#[test]
fn non_utf8_chunks() {
    let matcher = ChunkMatcher::new("ok");
    assert!(matcher.is_match(&[0xff, 0xfe, b'o', b'k', 0x00]));
    assert_eq!(matcher.pattern(), b"ok");
}
