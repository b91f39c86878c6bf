//! Zero-run coding between the Move-To-Front stage and the entropy coder.
//!
//! The move-to-front stream is heavily zero-biased, so runs of zeros are
//! collapsed into bijective base-2 digits over a two-symbol sub-alphabet
//! (RUNA/RUNB, as in bzip2's RLE2 stage). A run of length r costs only
//! ceil(log2(r+1)) symbols, which the arithmetic coder then squeezes to
//! nearly its entropy. Non-zero values v shift up to symbol v+1 to make
//! room for the two run digits.
//!
//! The legacy varint packing at the bottom of this module is the
//! pre-arithmetic representation still found inside version 2 and 3 frames.

use crate::bitstream::bytes::ByteReader;
use crate::error::{Error, Result};

pub const RUNA: u32 = 0;
pub const RUNB: u32 = 1;

/// Collapse zero runs: a run of length r becomes its bijective base-2
/// digits (RUNA counts 1, RUNB counts 2), least-significant digit first; a
/// non-zero value v becomes the symbol v+1.
pub fn mtf_to_symbols(mtf: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(mtf.len());
    let mut zeros = 0_u32;
    for &v in mtf {
        if v == 0 {
            zeros += 1;
            continue;
        }
        push_zero_run(zeros, &mut out);
        zeros = 0;
        out.push(v + 1);
    }
    // Write any trailing run.
    push_zero_run(zeros, &mut out);
    out
}

/// Emit the unique RUNA/RUNB digits for a run of `r` zeros.
fn push_zero_run(r: u32, out: &mut Vec<u32>) {
    if r == 0 {
        return;
    }
    let mut n = r - 1;
    loop {
        out.push(n & 1);
        if n < 2 {
            break;
        }
        n = (n - 2) >> 1;
    }
}

/// Expand RUNA/RUNB digits back into the mtf stream. `token_count` is the
/// expected output length; anything that cannot reach exactly that length
/// is a damaged frame.
pub fn symbols_to_mtf(symbols: &[u32], token_count: usize) -> Result<Vec<u32>> {
    let mut out = Vec::with_capacity(token_count.min(1 << 20));
    let mut zeros = 0_usize;
    let mut bit_multiplier = 1_usize;
    for &sym in symbols {
        match sym {
            RUNA | RUNB => {
                // RUNA contributes the multiplier, RUNB twice that.
                zeros += bit_multiplier << sym;
                bit_multiplier <<= 1;
                if zeros > token_count {
                    return Err(Error::CorruptFrame("zero run exceeds token count"));
                }
            }
            v => {
                out.resize(out.len() + zeros, 0);
                zeros = 0;
                bit_multiplier = 1;
                if out.len() >= token_count {
                    return Err(Error::CorruptFrame("mtf length exceeds token count"));
                }
                out.push(v - 1);
            }
        }
    }
    // Flush the trailing zero accumulator.
    out.resize(out.len() + zeros, 0);
    if out.len() != token_count {
        return Err(Error::CorruptFrame("mtf length mismatch"));
    }
    Ok(out)
}

/// Decode the packed stream of container versions 2 and 3: a sequence of
/// varints whose low bit selects a zero run `(r<<1)` or a literal value
/// `(v<<1)|1`.
pub fn legacy_unpack(packed: &[u8], token_count: usize) -> Result<Vec<u32>> {
    let mut reader = ByteReader::new(packed);
    let mut out = Vec::with_capacity(token_count.min(1 << 20));
    while out.len() < token_count && !reader.is_empty() {
        let word = reader.varint()?;
        if word & 1 == 0 {
            let run = (word >> 1) as usize;
            if out.len() + run > token_count {
                return Err(Error::CorruptFrame("zero run exceeds token count"));
            }
            out.resize(out.len() + run, 0);
        } else {
            let value = word >> 1;
            if value > u32::MAX as u64 {
                return Err(Error::CorruptFrame("mtf value out of range"));
            }
            out.push(value as u32);
        }
    }
    if out.len() != token_count || !reader.is_empty() {
        return Err(Error::CorruptFrame("legacy mtf length mismatch"));
    }
    Ok(out)
}
