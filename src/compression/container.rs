//! The framed byte container: magic, version, counts, dictionary, and the
//! entropy-coded symbol stream.
//!
//! Three versions exist in the wild. Version 4 front-codes the sorted
//! dictionary and arithmetic-codes the RUNA/RUNB symbol stream directly.
//! Version 3 stored the dictionary plainly and arithmetic-coded a byte
//! stream of varint-packed runs and literals; version 2 stored that byte
//! stream raw. New frames are always written as version 4; all three still
//! decode, byte for byte, so old notes keep opening.

use log::{debug, trace};

use crate::bitstream::bytes::{push_u32_le, push_varint, ByteReader};
use crate::entropy::arith::{Decoder, Encoder};
use crate::error::{Error, Result};
use crate::tools::rle2::{legacy_unpack, mtf_to_symbols, symbols_to_mtf};

use super::compress::Payload;

/// "TWBW" as a little-endian u32.
pub const MAGIC: u32 = 0x5742_5754;
/// The only version written.
pub const VERSION: u32 = 4;

/// Counts above this are rejected outright.
const MAX_COUNT: u64 = 1 << 31;
/// Alphabet of the byte-oriented coder inside version 3 frames.
const BYTE_ALPHABET: usize = 256;
/// Bits a well-formed stream may pull past its end: the decoder's register.
const CODER_TAIL_BITS: usize = 32;

/// Serialize a payload as a version 4 frame.
pub fn serialize(payload: &Payload) -> Vec<u8> {
    let mut buf = Vec::new();
    push_u32_le(MAGIC, &mut buf);
    push_u32_le(VERSION, &mut buf);
    push_varint(payload.dictionary.len() as u64, &mut buf);
    push_varint(payload.mtf.len() as u64, &mut buf);
    push_varint(payload.primary_index as u64, &mut buf);

    let symbols = mtf_to_symbols(&payload.mtf);
    push_varint(symbols.len() as u64, &mut buf);

    push_front_coded(&payload.dictionary, &mut buf);

    let mut coder = Encoder::new(payload.dictionary.len() + 2);
    for &sym in &symbols {
        coder.encode(sym);
    }
    buf.extend_from_slice(&coder.finish());

    debug!(
        "serialized {} mtf values as {} symbols in a {} byte frame",
        payload.mtf.len(),
        symbols.len(),
        buf.len()
    );
    buf
}

/// Deserialize a frame of any supported version back into a payload.
pub fn deserialize(bytes: &[u8]) -> Result<Payload> {
    let mut reader = ByteReader::new(bytes);
    if reader.u32_le()? != MAGIC {
        return Err(Error::InvalidMagic);
    }
    let version = reader.u32_le()?;
    if !(2..=4).contains(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    let dict_count = read_count(&mut reader, "dictionary count out of range")?;
    let token_count = read_count(&mut reader, "token count out of range")?;
    let primary_index = read_count(&mut reader, "primary index out of range")?;
    trace!(
        "version {} frame: {} entries, {} tokens",
        version,
        dict_count,
        token_count
    );

    match version {
        4 => read_v4(reader, dict_count, token_count, primary_index),
        3 => read_v3(reader, dict_count, token_count, primary_index),
        _ => read_v2(reader, dict_count, token_count, primary_index),
    }
}

fn read_count(reader: &mut ByteReader<'_>, what: &'static str) -> Result<usize> {
    let value = reader.varint()?;
    if value >= MAX_COUNT {
        return Err(Error::CorruptFrame(what));
    }
    Ok(value as usize)
}

fn read_v4(
    mut reader: ByteReader<'_>,
    dict_count: usize,
    token_count: usize,
    primary_index: usize,
) -> Result<Payload> {
    let symbol_count = read_count(&mut reader, "symbol count out of range")?;
    // Run digits never outnumber the zeros they stand for, so a valid
    // symbol stream is at most as long as the mtf stream.
    if symbol_count > token_count {
        return Err(Error::CorruptFrame("symbol count exceeds token count"));
    }
    let dictionary = read_front_coded(&mut reader, dict_count)?;

    let mtf = if symbol_count == 0 {
        if token_count != 0 {
            return Err(Error::CorruptFrame("token count without symbols"));
        }
        Vec::new()
    } else {
        let mut coder = Decoder::new(dict_count + 2, reader.rest());
        let mut symbols = Vec::with_capacity(symbol_count.min(1 << 20));
        for _ in 0..symbol_count {
            symbols.push(coder.decode());
        }
        if coder.overrun() > CODER_TAIL_BITS {
            return Err(Error::CorruptFrame("symbol stream truncated"));
        }
        symbols_to_mtf(&symbols, token_count)?
    };

    Ok(Payload {
        dictionary,
        primary_index: primary_index as u32,
        mtf,
    })
}

fn read_v3(
    mut reader: ByteReader<'_>,
    dict_count: usize,
    token_count: usize,
    primary_index: usize,
) -> Result<Payload> {
    let dictionary = read_plain(&mut reader, dict_count)?;
    let packed_len = read_count(&mut reader, "packed length out of range")?;

    let mut coder = Decoder::new(BYTE_ALPHABET, reader.rest());
    let mut packed = Vec::with_capacity(packed_len.min(1 << 20));
    for _ in 0..packed_len {
        packed.push(coder.decode() as u8);
    }
    // A short frame keeps feeding the coder zeros well past the register
    // tail it is allowed to consume; don't let it decode to quiet garbage.
    if coder.overrun() > CODER_TAIL_BITS {
        return Err(Error::CorruptFrame("packed stream truncated"));
    }

    let mtf = legacy_unpack(&packed, token_count)?;
    Ok(Payload {
        dictionary,
        primary_index: primary_index as u32,
        mtf,
    })
}

fn read_v2(
    mut reader: ByteReader<'_>,
    dict_count: usize,
    token_count: usize,
    primary_index: usize,
) -> Result<Payload> {
    let dictionary = read_plain(&mut reader, dict_count)?;
    let mtf = legacy_unpack(reader.rest(), token_count)?;
    Ok(Payload {
        dictionary,
        primary_index: primary_index as u32,
        mtf,
    })
}

/// Write the sorted dictionary as (prefixLen, suffixLen, suffix) triples,
/// sharing each entry's longest common byte prefix with its predecessor.
fn push_front_coded(dictionary: &[String], buf: &mut Vec<u8>) {
    let mut prev: &[u8] = b"";
    for entry in dictionary {
        let bytes = entry.as_bytes();
        let shared = prev
            .iter()
            .zip(bytes)
            .take_while(|(a, b)| a == b)
            .count();
        push_varint(shared as u64, buf);
        push_varint((bytes.len() - shared) as u64, buf);
        buf.extend_from_slice(&bytes[shared..]);
        prev = bytes;
    }
}

fn read_front_coded(reader: &mut ByteReader<'_>, dict_count: usize) -> Result<Vec<String>> {
    // Every entry takes at least its two length varints.
    if dict_count > reader.remaining() / 2 {
        return Err(Error::CorruptFrame("dictionary count exceeds frame"));
    }
    let mut dictionary = Vec::with_capacity(dict_count);
    let mut prev = String::new();
    for _ in 0..dict_count {
        let shared = reader.varint()? as usize;
        let suffix_len = reader.varint()? as usize;
        if shared > prev.len() {
            return Err(Error::CorruptFrame("dictionary prefix exceeds previous entry"));
        }
        let suffix = reader.take(suffix_len)?;
        let mut bytes = Vec::with_capacity(shared + suffix_len);
        bytes.extend_from_slice(&prev.as_bytes()[..shared]);
        bytes.extend_from_slice(suffix);
        prev = String::from_utf8(bytes)
            .map_err(|_| Error::CorruptFrame("dictionary entry is not UTF-8"))?;
        dictionary.push(prev.clone());
    }
    Ok(dictionary)
}

/// Plain (varint length, bytes) dictionary entries, as versions 2 and 3
/// stored them.
fn read_plain(reader: &mut ByteReader<'_>, dict_count: usize) -> Result<Vec<String>> {
    if dict_count > reader.remaining() {
        return Err(Error::CorruptFrame("dictionary count exceeds frame"));
    }
    let mut dictionary = Vec::with_capacity(dict_count);
    for _ in 0..dict_count {
        let len = reader.varint()? as usize;
        let bytes = reader.take(len)?;
        let entry = std::str::from_utf8(bytes)
            .map_err(|_| Error::CorruptFrame("dictionary entry is not UTF-8"))?;
        dictionary.push(entry.to_string());
    }
    Ok(dictionary)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compression::compress::compress;

    #[test]
    fn frame_fields_survive_the_roundtrip() {
        for text in [
            "a",
            "Hello HELLO hello\n",
            "the quick brown fox jumps over the lazy dog",
            "line one\nline two\n\nline four\t\tend",
        ] {
            let payload = compress(text);
            let frame = serialize(&payload);
            let back = deserialize(&frame).unwrap();
            assert_eq!(back, payload, "text {:?}", text);
        }
    }

    #[test]
    fn empty_payload_layout() {
        let frame = serialize(&compress(""));
        // magic, version, four zero varints, and the coder's finish byte.
        assert_eq!(&frame[0..4], &[0x54, 0x57, 0x42, 0x57]);
        assert_eq!(&frame[4..8], &[4, 0, 0, 0]);
        assert_eq!(&frame[8..12], &[0, 0, 0, 0]);
        assert_eq!(frame.len(), 13);
        let payload = deserialize(&frame).unwrap();
        assert!(payload.dictionary.is_empty());
        assert!(payload.mtf.is_empty());
    }

    #[test]
    fn front_coding_shares_prefixes() {
        let mut buf = Vec::new();
        let dictionary = vec![
            "apple".to_string(),
            "applet".to_string(),
            "apply".to_string(),
        ];
        push_front_coded(&dictionary, &mut buf);
        // "apple" whole, then (5, 1, "t"), then (4, 1, "y").
        assert_eq!(buf.len(), 2 + 5 + 3 + 3);
        let mut reader = ByteReader::new(&buf);
        assert_eq!(read_front_coded(&mut reader, 3).unwrap(), dictionary);
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut frame = serialize(&compress("abc"));
        frame[0] ^= 0xFF;
        assert_eq!(deserialize(&frame), Err(Error::InvalidMagic));
    }

    #[test]
    fn unknown_versions_are_rejected() {
        for version in [0_u32, 1, 5, 99] {
            let mut frame = serialize(&compress("abc"));
            frame[4..8].copy_from_slice(&version.to_le_bytes());
            assert_eq!(
                deserialize(&frame),
                Err(Error::UnsupportedVersion(version))
            );
        }
    }

    #[test]
    fn truncated_frames_are_rejected() {
        let frame = serialize(&compress("several words of text here"));
        for cut in [0, 1, 4, 7, 9, 11] {
            assert!(deserialize(&frame[..cut]).is_err(), "cut {}", cut);
        }
    }
}
