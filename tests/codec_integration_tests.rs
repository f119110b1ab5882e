//! End-to-end tests: file-backed streams, textual tables and the full
//! count -> build -> derive -> encode -> render -> parse -> decode pipeline.

use std::io::{BufReader, Cursor, Seek, SeekFrom, Write};

use huffcode::io::{read_bits, read_decode_table, write_bits, write_encode_table};
use huffcode::{
    count_frequencies, decode, encode, CharStream, CodecConfig, EncodeTable, FrequencyTable,
    HuffError, HuffmanCodec, HuffmanTree, SymbolStream,
};
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// The aaabbc scenario through every stage
#[test]
fn test_aaabbc_pipeline() {
    let mut stream = CharStream::from_text("aaabbc", false);

    let freq = count_frequencies(&mut stream).unwrap();
    assert_eq!(freq, FrequencyTable::from_counts([('a', 3), ('b', 2), ('c', 1)]).unwrap());

    let tree = HuffmanTree::build(&freq).unwrap();
    let encode_table = EncodeTable::from_tree(&tree);
    let decode_table = encode_table.invert();

    let a = encode_table.get(&'a').unwrap().len();
    let c = encode_table.get(&'c').unwrap().len();
    assert!(a <= c);

    stream.rewind().unwrap();
    let bits = encode(&mut stream, &encode_table).unwrap();
    let decoded: String = decode(bits.iter(), &decode_table).unwrap().into_iter().collect();
    assert_eq!(decoded, "aaabbc");
}

/// Encode a file, render the output like the CLI, parse it back and decode
#[test]
fn test_file_to_text_and_back() {
    let source = write_temp("It was the best of times,\nit was the worst of times.\n");
    let config = CodecConfig::default();

    let mut input = CharStream::open(source.path(), config.skip_whitespace).unwrap();
    let codec = HuffmanCodec::from_stream(&mut input).unwrap();

    let mut encoded = NamedTempFile::new().unwrap();
    write_encode_table(&mut encoded, codec.encode_table(), &config).unwrap();
    let bits = codec.encode(&mut input).unwrap();
    write_bits(&mut encoded, &bits).unwrap();
    encoded.flush().unwrap();

    let file = encoded.reopen().unwrap();
    let mut reader = BufReader::new(file);
    let table = read_decode_table(&mut reader, &config).unwrap();
    assert_eq!(&table, codec.decode_table());

    let parsed_bits = read_bits(&mut reader).unwrap();
    assert_eq!(parsed_bits, bits);

    let text: String = decode(parsed_bits.iter(), &table).unwrap().into_iter().collect();
    assert_eq!(text, "Itwasthebestoftimes,itwastheworstoftimes.");
}

/// Whitespace is preserved when it is not skipped
#[test]
fn test_verbatim_round_trip() {
    let text = "line one\n\tline two\r\n";
    let config = CodecConfig::verbatim_preset();
    let mut input = CharStream::from_text(text, config.skip_whitespace);

    let codec = HuffmanCodec::from_stream(&mut input).unwrap();
    let bits = codec.encode(&mut input).unwrap();
    let decoded: String = codec.decode(&bits).unwrap().into_iter().collect();
    assert_eq!(decoded, text);
}

/// A table from one input cannot encode another input with new symbols
#[test]
fn test_unknown_symbol_from_foreign_input() {
    let codec = HuffmanCodec::from_symbols("abc".chars()).unwrap();
    let mut other = CharStream::from_text("abcd", false);
    let err = codec.encode(&mut other).unwrap_err();
    assert!(matches!(err, HuffError::UnknownSymbol { .. }));
    assert!(!err.is_recoverable());
}

/// Parsed bits with stray characters are a distinct error
#[test]
fn test_malformed_bits_in_file() {
    let encoded = write_temp("a: 0\nb: 1\nEND\n01012\n");
    let mut reader = BufReader::new(encoded.reopen().unwrap());
    let table = read_decode_table(&mut reader, &CodecConfig::default()).unwrap();
    assert_eq!(table.len(), 2);

    let err = read_bits(&mut reader).unwrap_err();
    assert!(matches!(err, HuffError::MalformedCode { .. }));
    assert_eq!(err.category(), "malformed");
}

/// Truncated encoded data is detected after parsing
#[test]
fn test_truncated_file() {
    let codec = HuffmanCodec::from_symbols("aaabbc".chars()).unwrap();
    let mut out = Vec::new();
    write_encode_table(&mut out, codec.encode_table(), &CodecConfig::default()).unwrap();
    out.extend_from_slice(b"0001\n");

    let mut reader = Cursor::new(out);
    let table = read_decode_table(&mut reader, &CodecConfig::default()).unwrap();
    let bits = read_bits(&mut reader).unwrap();
    let err = decode(bits.iter(), &table).unwrap_err();
    assert!(matches!(err, HuffError::TruncatedStream { pending_bits: 1 }));
}

/// The stream starts wherever the reader was positioned
#[test]
fn test_stream_from_offset() {
    let source = write_temp("HEADERabab");
    let mut file = source.reopen().unwrap();
    file.seek(SeekFrom::Start(6)).unwrap();

    let mut input = CharStream::new(file, false).unwrap();
    let codec = HuffmanCodec::from_stream(&mut input).unwrap();
    assert_eq!(codec.frequencies().total(), 4);

    let bits = codec.encode(&mut input).unwrap();
    assert_eq!(bits.to_string(), "0101");
}

/// An empty input yields an empty table and tree construction refuses it
#[test]
fn test_empty_file() {
    let source = write_temp("");
    let mut input = CharStream::open(source.path(), true).unwrap();
    let freq = count_frequencies(&mut input).unwrap();
    assert!(freq.is_empty());

    let err = HuffmanTree::build(&freq).unwrap_err();
    assert!(matches!(err, HuffError::InvalidInput { .. }));
}

/// Codes for a tied input never change between runs
#[test]
fn test_tied_input_codes_are_stable() {
    let expected = {
        let codec = HuffmanCodec::from_symbols("abcdefgh".chars()).unwrap();
        let mut out = Vec::new();
        write_encode_table(&mut out, codec.encode_table(), &CodecConfig::default()).unwrap();
        String::from_utf8(out).unwrap()
    };
    assert_eq!(
        expected,
        "a: 000\nb: 001\nc: 010\nd: 011\ne: 100\nf: 101\ng: 110\nh: 111\nEND\n"
    );

    for _ in 0..20 {
        let codec = HuffmanCodec::from_symbols("hgfedcba".chars()).unwrap();
        let mut out = Vec::new();
        write_encode_table(&mut out, codec.encode_table(), &CodecConfig::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }
}
