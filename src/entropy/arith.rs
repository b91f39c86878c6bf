//! Adaptive binary arithmetic coder over a Fenwick frequency model.
//!
//! This is the classic Witten, Neal and Cleary coder (CACM, June 1987) with
//! a 32-bit window. The encoder and decoder update the shared model shape
//! in lock-step after every symbol, so the decoder always sees the exact
//! statistics the encoder used. All interval products go through 64-bit
//! intermediates: range is at most 2^32 and the total is capped at 2^15 by
//! the model's rescale, which keeps every product inside 47 bits.

use super::fenwick::{FenwickModel, ENTROPY_MAX_TOTAL};
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;

const TOP: u32 = 0xFFFF_FFFF;
const HALF: u32 = 0x8000_0000;
const Q1: u32 = 0x4000_0000;
const Q3: u32 = 0xC000_0000;

/// Encodes a symbol stream into packed bits.
pub struct Encoder {
    low: u32,
    high: u32,
    pending: u32,
    model: FenwickModel,
    bits: BitWriter,
}

impl Encoder {
    /// Create an encoder over an alphabet of `symbols` values (0-based).
    pub fn new(symbols: usize) -> Self {
        Self {
            low: 0,
            high: TOP,
            pending: 0,
            model: FenwickModel::new(symbols),
            bits: BitWriter::new(64),
        }
    }

    /// Encode one symbol and update the model.
    pub fn encode(&mut self, symbol: u32) {
        let idx = symbol as usize + 1;
        let range = (self.high - self.low) as u64 + 1;
        let total = self.model.total() as u64;
        let low_cum = self.model.sum(idx - 1) as u64;
        let high_cum = low_cum + self.model.freq(idx) as u64;

        let low64 = self.low as u64;
        self.high = (low64 + range * high_cum / total - 1) as u32;
        self.low = (low64 + range * low_cum / total) as u32;

        loop {
            if self.high < HALF {
                self.emit(0);
            } else if self.low >= HALF {
                self.emit(1);
                self.low -= HALF;
                self.high -= HALF;
            } else if self.low >= Q1 && self.high < Q3 {
                self.pending += 1;
                self.low -= Q1;
                self.high -= Q1;
            } else {
                break;
            }
            self.low <<= 1;
            self.high = (self.high << 1) | 1;
        }

        self.model.add(idx, 1);
        if self.model.total() >= ENTROPY_MAX_TOTAL {
            self.model.rescale();
        }
    }

    /// Write `bit` followed by any pending underflow bits of the opposite
    /// polarity.
    fn emit(&mut self, bit: u32) {
        self.bits.out_bit(bit);
        while self.pending > 0 {
            self.bits.out_bit(bit ^ 1);
            self.pending -= 1;
        }
    }

    /// Flush the terminating bits and return the packed stream.
    pub fn finish(mut self) -> Vec<u8> {
        self.pending += 1;
        if self.low < Q1 {
            self.emit(0);
        } else {
            self.emit(1);
        }
        self.bits.finish()
    }
}

/// Decodes the symbol stream an `Encoder` produced. The caller knows how
/// many symbols to pull; the stream itself carries no terminator.
pub struct Decoder<'a> {
    low: u32,
    high: u32,
    value: u32,
    model: FenwickModel,
    bits: BitReader<'a>,
}

impl<'a> Decoder<'a> {
    /// Create a decoder over the same alphabet size the encoder used.
    pub fn new(symbols: usize, stream: &'a [u8]) -> Self {
        let mut bits = BitReader::new(stream);
        let value = bits.bint(32);
        Self {
            low: 0,
            high: TOP,
            value,
            model: FenwickModel::new(symbols),
            bits,
        }
    }

    /// Decode one symbol and update the model.
    pub fn decode(&mut self) -> u32 {
        let range = (self.high - self.low) as u64 + 1;
        let total = self.model.total() as u64;
        let target = (((self.value - self.low) as u64 + 1) * total - 1) / range;
        let idx = self.model.find_by_cumulative(target as u32);
        let low_cum = self.model.sum(idx - 1) as u64;
        let high_cum = low_cum + self.model.freq(idx) as u64;

        let low64 = self.low as u64;
        self.high = (low64 + range * high_cum / total - 1) as u32;
        self.low = (low64 + range * low_cum / total) as u32;

        loop {
            if self.high < HALF {
                // Nothing to remove; just shift.
            } else if self.low >= HALF {
                self.value -= HALF;
                self.low -= HALF;
                self.high -= HALF;
            } else if self.low >= Q1 && self.high < Q3 {
                self.value -= Q1;
                self.low -= Q1;
                self.high -= Q1;
            } else {
                break;
            }
            self.low <<= 1;
            self.high = (self.high << 1) | 1;
            self.value = (self.value << 1) | self.bits.bit();
        }

        self.model.add(idx, 1);
        if self.model.total() >= ENTROPY_MAX_TOTAL {
            self.model.rescale();
        }
        (idx - 1) as u32
    }

    /// Bits the underlying reader served past the end of the stream. A
    /// well-formed stream never needs more than the 32-bit register tail.
    pub fn overrun(&self) -> usize {
        self.bits.overrun()
    }
}

#[cfg(test)]
mod test {
    use super::{Decoder, Encoder};

    fn roundtrip(symbols: &[u32], alphabet: usize) {
        let mut encoder = Encoder::new(alphabet);
        for &sym in symbols {
            encoder.encode(sym);
        }
        let packed = encoder.finish();

        let mut decoder = Decoder::new(alphabet, &packed);
        let decoded = (0..symbols.len())
            .map(|_| decoder.decode())
            .collect::<Vec<u32>>();
        assert_eq!(decoded, symbols);
        assert!(decoder.overrun() <= 32, "overrun {}", decoder.overrun());
    }

    #[test]
    fn empty_stream() {
        let encoder = Encoder::new(2);
        let packed = encoder.finish();
        assert_eq!(packed.len(), 1);
    }

    #[test]
    fn single_symbol() {
        roundtrip(&[0], 2);
        roundtrip(&[1], 2);
    }

    #[test]
    fn skewed_stream() {
        let mut symbols = vec![0_u32; 500];
        symbols.extend([1, 2, 1, 0, 2]);
        symbols.extend(vec![0_u32; 500]);
        roundtrip(&symbols, 3);
    }

    #[test]
    fn all_symbols_of_a_wide_alphabet() {
        let symbols = (0..256_u32).chain((0..256).rev()).collect::<Vec<u32>>();
        roundtrip(&symbols, 256);
    }

    #[test]
    fn widest_supported_alphabet() {
        // At 2^16 symbols the uniform prior already sits above the rescale
        // threshold, so the model halves after every update. The coder must
        // stay in lock-step regardless.
        let symbols = (0..400_u32).map(|i| (i * 163) % 65_536).collect::<Vec<u32>>();
        roundtrip(&symbols, 65_536);
    }

    #[test]
    fn long_stream_crosses_rescale() {
        // More than 2^15 updates forces several model rescales.
        let symbols = (0..40_000_u32).map(|i| i % 7).collect::<Vec<u32>>();
        roundtrip(&symbols, 7);
    }

    #[test]
    fn skewed_runs_compress() {
        let symbols = vec![0_u32; 4_000];
        let mut encoder = Encoder::new(16);
        for &sym in &symbols {
            encoder.encode(sym);
        }
        let packed = encoder.finish();
        // 4000 near-certain symbols should take far less than a bit each.
        assert!(packed.len() < 200, "packed {} bytes", packed.len());
    }
}
