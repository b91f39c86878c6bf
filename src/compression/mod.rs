//! The compression module manages both directions of the WBWT pipeline.
//!
//! Compression happens in the following steps:
//! - Tokenize and normalize: split text into whole-word tokens and fold
//!   case, digit, and whitespace variants behind control markers.
//! - Dictionary: assign each distinct token a sorted, stable id.
//! - Burrows Wheeler Transform: sort the cyclic rotations of the id array
//!   (with a trailing sentinel) to gather repeated contexts together.
//! - Move To Front transform: turn the clustered BWT output into a stream
//!   dominated by zeros.
//! - RUNA/RUNB: collapse the zero runs into bijective base-2 digits.
//! - Arithmetic coding: squeeze the symbol stream down to its entropy with
//!   an adaptive Fenwick model.
//!
//! Decompression follows the inverse of the process. The framed byte layout
//! lives in `container`, which still reads the two older container versions
//! alongside the current one.

pub mod compress;
pub mod container;
