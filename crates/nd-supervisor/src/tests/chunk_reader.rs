use crate::ChunkReader;

use googletest::assert_that;
use googletest::prelude::{eq, none, ok, some};
use tokio::io::AsyncWriteExt;

#[tokio::test]
async fn given_multibyte_char_split_across_writes_when_read_then_decoded_whole() {
    // Given: "é" is 0xC3 0xA9
    let (mut writer, reader) = tokio::io::duplex(64);
    let mut chunks = ChunkReader::new(reader);

    // When
    writer.write_all(b"caf\xC3").await.unwrap();
    let first = chunks.next_chunk().await.unwrap();
    writer.write_all(b"\xA9\n").await.unwrap();
    drop(writer);
    let second = chunks.next_chunk().await.unwrap();

    // Then
    assert_that!(first, some(eq("caf")));
    assert_that!(second, some(eq("é\n")));
    assert_that!(chunks.next_chunk().await, ok(none()));
}

#[tokio::test]
async fn given_invalid_bytes_when_read_then_replacement_character() {
    let input: &[u8] = b"ok \xFF done";
    let chunks = ChunkReader::new(input);

    let text = chunks.read_to_end().await.unwrap();

    assert_that!(text, eq("ok \u{FFFD} done"));
}

#[tokio::test]
async fn given_truncated_sequence_at_eof_when_read_then_lossy_tail() {
    let input: &[u8] = b"end\xE2\x82";
    let chunks = ChunkReader::new(input);

    let text = chunks.read_to_end().await.unwrap();

    assert!(text.starts_with("end"));
    assert!(text.ends_with('\u{FFFD}'));
}

#[tokio::test]
async fn given_empty_stream_when_read_then_none() {
    let input: &[u8] = b"";
    let mut chunks = ChunkReader::new(input);

    assert_that!(chunks.next_chunk().await, ok(none()));
}
