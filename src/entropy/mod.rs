//! The entropy module generates and consumes the compressed bitstream of
//! the WBWT codec.
//!
//! Arithmetic coding is used in lieu of huffman coding: the symbol streams
//! here are short and heavily skewed toward the RUNA/RUNB sub-alphabet, and
//! an adaptive model reaches the stream's entropy without shipping any code
//! tables. The model is a Fenwick tree over symbol frequencies, mutated in
//! lock-step by the encoder and decoder so that no statistics ever appear
//! in the frame.
//!
//! The process of encoding and decoding a stream is inherently sequential
//! and does not benefit from multithreading.

pub mod arith;
pub mod fenwick;
