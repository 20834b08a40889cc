//! Pack tests: framing, skip policy, decoding and file-based conversion.

use flowpack::pack::pack_name;
use flowpack::{
    decode_pack, encode_level, encode_pack, CodecError, LevelError, LevelPack, PackError,
    PackOptions, ParseError, SkipReason,
};
use std::io::{BufReader, Cursor, Write};

const PACK: &str = "\
5,0,1,1;0,1,2
X 5,0,2,1;0,1

5,0,3,1;7
W 4,0,4,2,,5,0|12;0,3;8,15
";

#[test]
fn lenient_pack_skips_and_reports() {
    let report = encode_pack(Cursor::new(PACK), PackOptions::default()).expect("pack");
    assert_eq!(report.pack.len(), 2);
    assert_eq!(report.skipped.len(), 2);

    assert_eq!(report.skipped[0].line, 2);
    assert!(matches!(report.skipped[0].reason, SkipReason::Hexagonal));
    assert_eq!(report.skipped[1].line, 4);
    assert!(matches!(
        report.skipped[1].reason,
        SkipReason::Malformed(LevelError::Parse(ParseError::SinglePointPath { color: 0 }))
    ));
}

#[test]
fn strict_pack_fails_on_first_malformed_line() {
    let err = encode_pack(Cursor::new(PACK), PackOptions { strict: true }).unwrap_err();
    match err {
        PackError::Level { line, source } => {
            assert_eq!(line, 4);
            assert!(matches!(source, LevelError::Parse(ParseError::SinglePointPath { .. })));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn strict_pack_still_skips_hex_levels() {
    let src = "X 5,0,1,1;0,1\n5,0,2,1;0,4\n";
    let report = encode_pack(Cursor::new(src), PackOptions { strict: true }).expect("pack");
    assert_eq!(report.pack.len(), 1);
    assert!(matches!(report.skipped[0].reason, SkipReason::Hexagonal));
}

#[test]
fn pack_framing() {
    let report = encode_pack(Cursor::new(PACK), PackOptions::default()).expect("pack");
    let bytes = report.pack.to_bytes().expect("bytes");
    assert_eq!(bytes.len(), report.pack.encoded_len());
    assert_eq!(u32::from_le_bytes(bytes[0..4].try_into().unwrap()), 2);

    let first = encode_level("5,0,1,1;0,1,2", 0).expect("encode");
    let first_len = u32::from_le_bytes(bytes[4..8].try_into().unwrap()) as usize;
    assert_eq!(first_len, first.len());
    assert_eq!(&bytes[8..8 + first_len], first.as_slice());

    let mut written = Vec::new();
    let n = report.pack.write_to(&mut written).expect("write");
    assert_eq!(n, bytes.len());
    assert_eq!(written, bytes);
}

#[test]
fn decode_pack_round_trip() {
    let report = encode_pack(Cursor::new(PACK), PackOptions::default()).expect("pack");
    let levels = decode_pack(&report.pack.to_bytes().expect("bytes")).expect("decode");
    assert_eq!(levels.len(), 2);
    assert_eq!((levels[0].width, levels[0].height, levels[0].warp), (5, 5, false));
    assert_eq!((levels[1].width, levels[1].height, levels[1].warp), (4, 4, true));
    assert_eq!(levels[1].colors.len(), 2);
    assert_eq!(levels[1].holes, vec![5]);
}

#[test]
fn empty_records_are_not_pushed() {
    let mut pack = LevelPack::new();
    pack.push(Vec::new());
    assert!(pack.is_empty());
    let bytes = pack.to_bytes().expect("bytes");
    assert_eq!(bytes, vec![0, 0, 0, 0]);
    assert!(decode_pack(&bytes).expect("decode").is_empty());
}

#[test]
fn decode_pack_rejects_bad_framing() {
    let mut pack = LevelPack::new();
    pack.push(encode_level("3,0,1,1;0,8", 0).expect("encode"));
    let bytes = pack.to_bytes().expect("bytes");

    assert!(matches!(decode_pack(&bytes[..bytes.len() - 1]), Err(PackError::Truncated(_))));
    assert!(matches!(decode_pack(&bytes[..2]), Err(PackError::Truncated(_))));
    assert!(matches!(decode_pack(&bytes[..6]), Err(PackError::Truncated(_))));

    let mut trailing = bytes.clone();
    trailing.extend_from_slice(&[0, 0]);
    assert!(matches!(decode_pack(&trailing), Err(PackError::TrailingBytes(2))));

    let mut long = bytes.clone();
    long[4] += 4;
    long.extend_from_slice(&[0; 4]);
    assert!(matches!(decode_pack(&long), Err(PackError::RecordLength { index: 0, .. })));

    let mut magic = bytes;
    magic[8] = b'Z';
    assert!(matches!(decode_pack(&magic), Err(PackError::Codec(_))));
}

#[test]
fn record_length_must_cover_padding() {
    // 42 bytes of content, padded to 44.
    let record = encode_level("3,0,1,1,4;0,8", 0).expect("encode");
    assert_eq!(record.len(), 44);

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&42u32.to_le_bytes());
    bytes.extend_from_slice(&record[..42]);
    assert!(matches!(
        decode_pack(&bytes),
        Err(PackError::Codec(CodecError::MissingPadding(2)))
    ));
}

#[test]
fn invalid_utf8_line_is_skipped() {
    let mut src = Vec::new();
    src.extend_from_slice(b"5,0,1,1;0,1,2\n");
    src.extend_from_slice(b"5,0,2,1;0,\xff\n");
    src.extend_from_slice(b"5,0,3,1;0,4\r\n");
    let report = encode_pack(Cursor::new(&src), PackOptions::default()).expect("pack");
    assert_eq!(report.pack.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].line, 2);
    assert!(matches!(
        report.skipped[0].reason,
        SkipReason::Malformed(LevelError::Utf8(_))
    ));

    let err = encode_pack(Cursor::new(&src), PackOptions { strict: true }).unwrap_err();
    assert!(matches!(
        err,
        PackError::Level {
            line: 2,
            source: LevelError::Utf8(_)
        }
    ));
}

#[test]
fn convert_pack_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("levelpack_classic.txt");
    {
        let mut f = std::fs::File::create(&path).expect("create");
        f.write_all(PACK.as_bytes()).expect("write");
    }
    let file = std::fs::File::open(&path).expect("open");
    let report = encode_pack(BufReader::new(file), PackOptions::default()).expect("pack");
    assert_eq!(report.pack.len(), 2);

    let name = pack_name(path.file_name().unwrap().to_str().unwrap());
    assert_eq!(name, "classic");
    let out_path = dir.path().join(format!("{}.bin", name));
    std::fs::write(&out_path, report.pack.to_bytes().expect("bytes")).expect("write bin");
    let levels = decode_pack(&std::fs::read(&out_path).expect("read bin")).expect("decode");
    assert_eq!(levels.len(), 2);
}

#[test]
fn pack_names() {
    assert_eq!(pack_name("levelpack_bonus.txt"), "bonus");
    assert_eq!(pack_name("extreme.pack.txt"), "extreme");
    assert_eq!(pack_name("plain"), "plain");
}
