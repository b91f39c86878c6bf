//! Move-To-Front transform over the BWT id alphabet.
//!
//! The transform maps each symbol to its position in a recency list, which
//! turns the clustered BWT output into a stream dominated by small values
//! (mostly zeros). The list is rebuilt per call; no state is shared between
//! compressions.

use crate::error::{Error, Result};

/// Encode ids using the Move To Front transform over the identity list
/// 0..alphabet.
pub fn mtf_encode(data: &[u32], alphabet: usize) -> Vec<u32> {
    let mut index = (0..alphabet as u32).collect::<Vec<u32>>();
    let mut out = Vec::with_capacity(data.len());
    for &sym in data {
        let idx = index.iter().position(|c| *c == sym).unwrap();
        out.push(idx as u32);
        // Shift everything in front of the symbol back one, then put the
        // symbol at the front of the index.
        index[..=idx].rotate_right(1);
    }
    out
}

/// Decode Move To Front positions back into ids. Positions outside the
/// alphabet mean the frame is damaged.
pub fn mtf_decode(data: &[u32], alphabet: usize) -> Result<Vec<u32>> {
    let mut index = (0..alphabet as u32).collect::<Vec<u32>>();
    let mut out = Vec::with_capacity(data.len());
    for &pos in data {
        let idx = pos as usize;
        if idx >= alphabet {
            return Err(Error::CorruptFrame("mtf value outside alphabet"));
        }
        out.push(index[idx]);
        index[..=idx].rotate_right(1);
    }
    Ok(out)
}
