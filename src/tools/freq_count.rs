//! Optimized id frequency counting over a slice of dictionary ids.
//!
//! Builds a vec of `alphabet` u32 counts holding the frequency of each id
//! in the block of data given to the `id_freqs` function.
//!
//! NOTE: This will use multi-threading when the data is over 64k ids long.

use rayon::prelude::*;

/// Returns a frequency count of the input ids. Every id must be below
/// `alphabet`.
pub fn id_freqs(data: &[u32], alphabet: usize) -> Vec<u32> {
    if data.len() > 64_000 {
        // 16k is pretty much the sweet spot for chunk size.
        data.par_chunks(16_000)
            .fold(
                || vec![0_u32; alphabet],
                |mut freqs, chunk| {
                    chunk.iter().for_each(|&el| freqs[el as usize] += 1);
                    freqs
                },
            )
            .reduce(
                || vec![0_u32; alphabet],
                |mut acc, freqs| {
                    for (a, f) in acc.iter_mut().zip(&freqs) {
                        *a += f;
                    }
                    acc
                },
            )
    } else {
        let mut freqs = vec![0_u32; alphabet];
        data.iter().for_each(|&el| freqs[el as usize] += 1);
        freqs
    }
}
