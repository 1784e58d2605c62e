use support_relay::entities::StreamChunk;
use support_relay::service::reducer::{classify_line, SseLine, StreamReducer, Utf8Decoder};

fn data_line(content: &str) -> String {
    let chunk = StreamChunk::with_content(content);
    format!("data: {}\n\n", serde_json::to_string(&chunk).unwrap())
}

fn sse_body(fragments: &[&str]) -> String {
    let mut body = String::from(": keep-alive\n\n");
    for fragment in fragments {
        body.push_str(&data_line(fragment));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn reduce(chunks: &[&[u8]]) -> String {
    let mut reducer = StreamReducer::new();
    for chunk in chunks {
        reducer.feed(chunk);
    }
    reducer.finish();
    reducer.into_content()
}

#[test]
fn test_fragments_concatenate_in_order() {
    let body = sse_body(&["Hel", "lo ", "wor", "ld"]);
    assert_eq!(reduce(&[body.as_bytes()]), "Hello world");
}

#[test]
fn test_feed_returns_fragments_as_completed() {
    let body = sse_body(&["Hel", "lo"]);
    let mut reducer = StreamReducer::new();
    let fragments = reducer.feed(body.as_bytes());
    assert_eq!(fragments, vec!["Hel".to_string(), "lo".to_string()]);
    assert!(reducer.is_done());
}

#[test]
fn test_every_single_split_point_gives_same_text() {
    let body = sse_body(&["Café ", "☕ and ", "🚀 VADER ", "808", " \"quoted\"\\n"]);
    let bytes = body.as_bytes();
    let expected = reduce(&[bytes]);
    assert_eq!(expected, "Café ☕ and 🚀 VADER 808 \"quoted\"\\n");

    for split in 0..=bytes.len() {
        let (head, tail) = bytes.split_at(split);
        assert_eq!(reduce(&[head, tail]), expected, "split at byte {}", split);
    }
}

#[test]
fn test_every_pair_of_split_points_gives_same_text() {
    let body = sse_body(&["ñ", "日本", "🙂"]);
    let bytes = body.as_bytes();
    let expected = reduce(&[bytes]);

    for first in 0..=bytes.len() {
        for second in first..=bytes.len() {
            let parts = [&bytes[..first], &bytes[first..second], &bytes[second..]];
            assert_eq!(reduce(&parts), expected, "splits at {} and {}", first, second);
        }
    }
}

#[test]
fn test_byte_at_a_time() {
    let body = sse_body(&["Check the ", "emergency stop ", "button."]);
    let chunks: Vec<&[u8]> = body.as_bytes().chunks(1).collect();
    assert_eq!(reduce(&chunks), "Check the emergency stop button.");
}

#[test]
fn test_done_ignores_trailing_bytes() {
    let mut body = sse_body(&["final"]);
    body.push_str(&data_line(" ignored"));

    let mut reducer = StreamReducer::new();
    reducer.feed(body.as_bytes());
    assert!(reducer.is_done());
    assert!(reducer.feed(data_line("more").as_bytes()).is_empty());
    assert_eq!(reducer.content(), "final");
}

#[test]
fn test_comments_blank_and_foreign_lines_are_noops() {
    let body = format!(
        ": ping\n\r\n   \nevent: message\nid: 7\n{}: another comment\ndata: [DONE]\n",
        data_line("only")
    );
    assert_eq!(reduce(&[body.as_bytes()]), "only");
}

#[test]
fn test_crlf_line_endings() {
    let body = "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\r\n\r\n\
                data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\r\n\r\n\
                data: [DONE]\r\n";
    assert_eq!(reduce(&[body.as_bytes()]), "ab");
}

#[test]
fn test_role_only_and_empty_deltas_add_nothing() {
    let body = "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\
                data: {\"choices\":[{\"delta\":{\"content\":\"\"}}]}\n\
                data: {\"choices\":[]}\n\
                data: 42\n\
                data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n";
    let mut reducer = StreamReducer::new();
    let fragments = reducer.feed(body.as_bytes());
    assert_eq!(fragments, vec!["x".to_string()]);
    assert_eq!(reducer.anomalies(), 0);
}

#[test]
fn test_zero_content_stream_yields_empty_text() {
    let body = sse_body(&[]);
    assert_eq!(reduce(&[body.as_bytes()]), "");
}

#[test]
fn test_unterminated_last_line_is_flushed_on_finish() {
    let body = "data: {\"choices\":[{\"delta\":{\"content\":\"tail\"}}]}";
    let mut reducer = StreamReducer::new();
    assert!(reducer.feed(body.as_bytes()).is_empty());
    assert_eq!(reducer.finish(), vec!["tail".to_string()]);
    assert_eq!(reducer.content(), "tail");
}

#[test]
fn test_unparseable_line_is_held_until_more_bytes() {
    let mut reducer = StreamReducer::new();
    // a complete line that is not JSON stays buffered while nothing follows it
    assert!(reducer.feed(b"data: {\"choices\":\n").is_empty());
    assert_eq!(reducer.anomalies(), 0);

    // once another complete line arrives the held line cannot resolve
    let fragments = reducer.feed(data_line("next").as_bytes());
    assert_eq!(fragments, vec!["next".to_string()]);
    assert_eq!(reducer.anomalies(), 1);
    assert_eq!(reducer.content(), "next");
}

#[test]
fn test_unparseable_line_at_end_of_stream_is_dropped() {
    let mut reducer = StreamReducer::new();
    reducer.feed(data_line("kept").as_bytes());
    reducer.feed(b"data: {broken\n");
    assert!(reducer.finish().is_empty());
    assert_eq!(reducer.anomalies(), 1);
    assert_eq!(reducer.content(), "kept");
}

#[test]
fn test_classify_line() {
    assert_eq!(classify_line(""), SseLine::Skip);
    assert_eq!(classify_line("\r"), SseLine::Skip);
    assert_eq!(classify_line(": comment"), SseLine::Skip);
    assert_eq!(classify_line("event: ping"), SseLine::Skip);
    assert_eq!(classify_line("data:{}"), SseLine::Skip);
    assert_eq!(classify_line("data: [DONE]"), SseLine::Done);
    assert_eq!(classify_line("data: [DONE]\r"), SseLine::Done);
    assert_eq!(classify_line("data:  {\"a\":1} \r"), SseLine::Data("{\"a\":1}"));
}

#[test]
fn test_decoder_holds_split_code_point() {
    let snowman = "☃".as_bytes();
    let mut decoder = Utf8Decoder::new();
    assert_eq!(decoder.decode(&snowman[..1]), "");
    assert!(decoder.has_pending());
    assert_eq!(decoder.decode(&snowman[1..2]), "");
    assert_eq!(decoder.decode(&snowman[2..]), "☃");
    assert!(!decoder.has_pending());
}

#[test]
fn test_decoder_replaces_invalid_bytes() {
    let mut decoder = Utf8Decoder::new();
    assert_eq!(decoder.decode(b"a\xffb"), "a\u{FFFD}b");
    assert_eq!(decoder.decode(&[0xE2, 0x98]), "");
    assert_eq!(decoder.finish(), "\u{FFFD}");
}
