//! The text side of the pipeline: text to payload and payload to text.

use log::debug;

use crate::bwt_algorithms::bwt_sort::{bwt_decode, bwt_encode};
use crate::error::{Error, Result};
use crate::tools::dictionary::build_dictionary;
use crate::tools::mtf::{mtf_decode, mtf_encode};
use crate::tools::tokenizer::{normalize, render_tokens, tokenize};

/// Bound the reference embedding places on the compression side.
pub const MAX_NOTE_CHARS: usize = 20_000;

/// A compressed note: the sorted token dictionary, the BWT primary index,
/// and the move-to-front stream. The BWT length (token count plus sentinel)
/// is implicit as `mtf.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub dictionary: Vec<String>,
    pub primary_index: u32,
    pub mtf: Vec<u32>,
}

/// Compress text into a payload. Pure and infallible; each call builds
/// fresh state.
pub fn compress(text: &str) -> Payload {
    let tokens = tokenize(text);
    let normalized = normalize(&tokens);
    if normalized.is_empty() {
        // Canonical empty form: no dictionary, no mtf.
        return Payload {
            dictionary: Vec::new(),
            primary_index: 0,
            mtf: Vec::new(),
        };
    }

    let (dictionary, mut ids) = build_dictionary(&normalized);
    ids.push(0); // sentinel row
    let alphabet = dictionary.len() + 1;

    let (primary_index, last_column) = bwt_encode(&ids);
    let mtf = mtf_encode(&last_column, alphabet);

    debug!(
        "compressed {} raw tokens into {} ids over {} dictionary entries",
        tokens.len(),
        ids.len(),
        dictionary.len()
    );
    Payload {
        dictionary,
        primary_index,
        mtf,
    }
}

/// Decompress a payload back into text. An empty dictionary or mtf stream
/// decodes to the empty string.
pub fn decompress(payload: &Payload) -> Result<String> {
    if payload.dictionary.is_empty() || payload.mtf.is_empty() {
        return Ok(String::new());
    }
    let alphabet = payload.dictionary.len() + 1;

    let last_column = mtf_decode(&payload.mtf, alphabet)?;
    let ids = bwt_decode(payload.primary_index, &last_column, alphabet)?;

    if ids.last() != Some(&0) {
        return Err(Error::CorruptFrame("missing trailing sentinel"));
    }
    let body = &ids[..ids.len() - 1];
    let mut tokens = Vec::with_capacity(body.len());
    for &id in body {
        if id == 0 {
            return Err(Error::CorruptFrame("interior sentinel id"));
        }
        tokens.push(payload.dictionary[id as usize - 1].clone());
    }
    debug!("decompressed {} ids back into tokens", ids.len());
    render_tokens(&tokens)
}
