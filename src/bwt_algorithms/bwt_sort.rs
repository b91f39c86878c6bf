//! Forward and inverse cyclic Burrows-Wheeler Transform over u32 id arrays.

use crate::error::{Error, Result};
use crate::tools::freq_count::id_freqs;
use rayon::prelude::*;

/// Above this many ids the rotation sort moves to rayon.
const PAR_SORT_THRESHOLD: usize = 40_000;

/// Burrows-Wheeler-Transform of an id array whose last element is the
/// unique sentinel 0. Returns the primary index (the sorted row holding the
/// rotation that starts at offset 0) and the last column L.
///
/// Ids are compared as unsigned values. The sentinel is the unique minimum
/// and sits at the end of the array, so comparing plain suffixes settles
/// the cyclic rotation order before any comparison would need to wrap.
pub fn bwt_encode(ids: &[u32]) -> (u32, Vec<u32>) {
    let n = ids.len();
    if n <= 1 {
        return (0, ids.to_vec());
    }

    // Create an index into the id array. u32 is more than enough.
    let mut index = (0_u32..n as u32).collect::<Vec<u32>>();

    if n > PAR_SORT_THRESHOLD {
        index.par_sort_unstable_by(|&a, &b| ids[a as usize..].cmp(&ids[b as usize..]));
    } else {
        index.sort_unstable_by(|&a, &b| ids[a as usize..].cmp(&ids[b as usize..]));
    }

    // Get the key and the last column.
    let mut key = 0_u32;
    let mut bwt = vec![0_u32; n];
    for i in 0..n {
        if index[i] == 0 {
            key = i as u32;
            bwt[i] = ids[n - 1];
        } else {
            bwt[i] = ids[index[i] as usize - 1];
        }
    }
    (key, bwt)
}

/// Decode a Burrows-Wheeler-Transform: rebuild the id array from the last
/// column, the primary index, and the alphabet size.
///
/// Counts each symbol's occurrences to place per-symbol start offsets, maps
/// each sorted row to the row holding its cyclic predecessor, then walks
/// that chain from the primary row filling the output back to front.
pub fn bwt_decode(key: u32, bwt_in: &[u32], alphabet: usize) -> Result<Vec<u32>> {
    let n = bwt_in.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if key as usize >= n {
        return Err(Error::CorruptFrame("primary index out of range"));
    }
    if n == 1 {
        return Ok(bwt_in.to_vec());
    }

    let freq = id_freqs(bwt_in, alphabet);

    // Convert the frequency count to per-symbol start offsets.
    let mut starts = vec![0_u32; alphabet];
    let mut sum = 0_u32;
    for (s, f) in freq.iter().enumerate() {
        starts[s] = sum;
        sum += f;
    }

    // Build the transformation vector linking each row to its predecessor.
    let mut occ = starts;
    let mut next = vec![0_u32; n];
    for (i, &s) in bwt_in.iter().enumerate() {
        next[occ[s as usize] as usize] = i as u32;
        occ[s as usize] += 1;
    }

    // Walk from the primary row, filling the output back to front.
    let mut out = vec![0_u32; n];
    let mut row = key;
    for k in (0..n).rev() {
        out[k] = bwt_in[row as usize];
        row = next[row as usize];
    }
    Ok(out)
}
