//! Reversible tokenization for the word model.
//!
//! Raw text splits into word tokens, single-class whitespace runs, and runs
//! of everything else; concatenating the raw tokens always reproduces the
//! input. Normalization then rewrites case variants, digit strings and
//! whitespace runs behind two-character control markers so that repeated
//! word shapes ("hello", "Hello", "HELLO") share one dictionary entry, and
//! drops the single space between two words entirely - the renderer puts it
//! back. Rendering is a small state machine that reverses all of this
//! exactly.

use crate::error::{Error, Result};

/// Marker prefix for normalized-token metadata.
pub const CONTROL: char = '\u{1F}';

const MARK_SPACE: &str = "\u{1F}s";
const MARK_NEWLINE: &str = "\u{1F}n";
const MARK_TAB: &str = "\u{1F}t";
const MARK_DIGITS: &str = "\u{1F}d";
const MARK_UPPER: &str = "\u{1F}u";
const MARK_CAPITAL: &str = "\u{1F}c";
const MARK_ESCAPE: &str = "\u{1F}e";

/// Cap on a rendered whitespace run. Far beyond anything the bounded
/// compression side can produce; a longer claim is a damaged frame.
const RUN_BOMB: usize = 1 << 20;

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

fn is_space_char(c: char) -> bool {
    c == ' ' || c == '\n' || c == '\t'
}

/// A token is word-shaped when it starts with an ASCII alphanumeric; word
/// tokens both start and end that way, and no other token class contains
/// one at all.
fn is_word_token(tok: &str) -> bool {
    tok.chars().next().map_or(false, is_word_char)
}

/// Split text into word tokens, single-class whitespace runs, and maximal
/// runs of other characters. Greedy, single pass, word rule first.
pub fn tokenize(text: &str) -> Vec<String> {
    let chars = text.chars().collect::<Vec<char>>();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let start = i;
        if is_word_char(c) {
            i += 1;
            while i < chars.len() && is_word_char(chars[i]) {
                i += 1;
            }
            // Apostrophes and hyphens join word parts only when another
            // alphanumeric follows.
            while i + 1 < chars.len()
                && (chars[i] == '\'' || chars[i] == '-')
                && is_word_char(chars[i + 1])
            {
                i += 2;
                while i < chars.len() && is_word_char(chars[i]) {
                    i += 1;
                }
            }
        } else if is_space_char(c) {
            // Whitespace runs never mix classes.
            i += 1;
            while i < chars.len() && chars[i] == c {
                i += 1;
            }
        } else {
            i += 1;
            while i < chars.len() && !is_word_char(chars[i]) && !is_space_char(chars[i]) {
                i += 1;
            }
        }
        tokens.push(chars[start..i].iter().collect());
    }
    tokens
}

/// Map each raw token to 0-2 normalized tokens.
pub fn normalize(tokens: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    for (i, tok) in tokens.iter().enumerate() {
        // A lone space between two word tokens is implicit; the renderer
        // restores it.
        if tok == " "
            && i > 0
            && i + 1 < tokens.len()
            && is_word_token(&tokens[i - 1])
            && is_word_token(&tokens[i + 1])
        {
            continue;
        }
        if tok.starts_with(CONTROL) {
            out.push(MARK_ESCAPE.to_string());
            out.push(tok.clone());
            continue;
        }
        let first = match tok.chars().next() {
            Some(c) => c,
            None => continue,
        };
        if is_space_char(first) {
            let mark = match first {
                ' ' => MARK_SPACE,
                '\n' => MARK_NEWLINE,
                _ => MARK_TAB,
            };
            out.push(mark.to_string());
            out.push(base36(tok.chars().count()));
            continue;
        }
        if is_word_token(tok) {
            if tok.chars().all(|c| c.is_ascii_digit()) {
                out.push(MARK_DIGITS.to_string());
                out.push(tok.clone());
                continue;
            }
            let has_upper = tok.chars().any(|c| c.is_ascii_uppercase());
            let has_lower = tok.chars().any(|c| c.is_ascii_lowercase());
            if has_upper && !has_lower {
                out.push(MARK_UPPER.to_string());
                out.push(tok.to_ascii_lowercase());
                continue;
            }
            if first.is_ascii_uppercase() && !tok[1..].chars().any(|c| c.is_ascii_uppercase()) {
                out.push(MARK_CAPITAL.to_string());
                out.push(tok.to_ascii_lowercase());
                continue;
            }
        }
        out.push(tok.clone());
    }
    out
}

/// Rebuild the original text from a normalized token stream.
pub fn render_tokens(tokens: &[String]) -> Result<String> {
    let mut out = String::new();
    // Marker mode awaiting its payload token.
    let mut pending: Option<char> = None;
    // Whether the last emitted chunk was word-shaped.
    let mut last_word = false;
    for tok in tokens {
        if let Some(mode) = pending.take() {
            let chunk = apply_marker(mode, tok)?;
            push_chunk(&mut out, &chunk, &mut last_word);
            continue;
        }
        if let Some(mode) = marker_mode(tok) {
            pending = Some(mode);
            continue;
        }
        push_chunk(&mut out, tok, &mut last_word);
    }
    if pending.is_some() {
        return Err(Error::CorruptFrame("control marker at end of stream"));
    }
    Ok(out)
}

/// The mode character of a well-formed two-character control marker.
fn marker_mode(tok: &str) -> Option<char> {
    let mut chars = tok.chars();
    if chars.next() != Some(CONTROL) {
        return None;
    }
    let mode = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    matches!(mode, 's' | 'n' | 't' | 'd' | 'u' | 'c' | 'e').then_some(mode)
}

/// Expand a marker payload into the text chunk it stands for.
fn apply_marker(mode: char, payload: &str) -> Result<String> {
    match mode {
        's' | 'n' | 't' => {
            let len = usize::from_str_radix(payload, 36)
                .map_err(|_| Error::CorruptFrame("bad whitespace run length"))?;
            if len > RUN_BOMB {
                return Err(Error::CorruptFrame("whitespace run too long"));
            }
            let ch = match mode {
                's' => ' ',
                'n' => '\n',
                _ => '\t',
            };
            Ok(std::iter::repeat(ch).take(len).collect())
        }
        'd' => Ok(payload.to_string()),
        'u' => Ok(payload.to_ascii_uppercase()),
        'c' => {
            let mut chars = payload.chars();
            Ok(match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            })
        }
        // 'e': the escaped literal, emitted untouched.
        _ => Ok(payload.to_string()),
    }
}

/// Append a chunk, restoring the implicit single space between two
/// word-shaped chunks.
fn push_chunk(out: &mut String, chunk: &str, last_word: &mut bool) {
    let starts_word = is_word_token(chunk);
    if *last_word && starts_word {
        out.push(' ');
    }
    out.push_str(chunk);
    if !chunk.is_empty() {
        *last_word = starts_word;
    }
}

/// Format `n` in base 36 with lowercase digits.
fn base36(mut n: usize) -> String {
    let mut buf = [0_u8; 16];
    let mut i = buf.len();
    loop {
        let d = (n % 36) as u8;
        i -= 1;
        buf[i] = if d < 10 { b'0' + d } else { b'a' + d - 10 };
        n /= 36;
        if n == 0 {
            break;
        }
    }
    String::from_utf8_lossy(&buf[i..]).into_owned()
}

#[cfg(test)]
mod test {
    use super::*;

    fn roundtrip(text: &str) {
        let tokens = tokenize(text);
        assert_eq!(tokens.concat(), text, "tokenize must cover the input");
        let normalized = normalize(&tokens);
        assert_eq!(render_tokens(&normalized).unwrap(), text);
    }

    #[test]
    fn tokenize_splits_words_and_runs() {
        let tokens = tokenize("don't stop -- ever\n\n\tok");
        assert_eq!(
            tokens,
            vec!["don't", " ", "stop", " ", "--", " ", "ever", "\n\n", "\t", "ok"]
        );
    }

    #[test]
    fn whitespace_classes_never_mix() {
        assert_eq!(tokenize(" \n\t "), vec![" ", "\n", "\t", " "]);
    }

    #[test]
    fn case_variants_share_one_entry() {
        let normalized = normalize(&tokenize("Hello HELLO hello\n"));
        assert_eq!(
            normalized,
            vec![
                "\u{1F}c", "hello", "\u{1F}u", "hello", "hello", "\u{1F}n", "1"
            ]
        );
    }

    #[test]
    fn digits_get_their_own_marker() {
        let normalized = normalize(&tokenize("v2 42"));
        assert_eq!(normalized, vec!["v2", "\u{1F}d", "42"]);
    }

    #[test]
    fn control_bytes_are_escaped() {
        let normalized = normalize(&tokenize("\u{1F}\u{1F}\u{1F}"));
        assert_eq!(normalized, vec!["\u{1F}e", "\u{1F}\u{1F}\u{1F}"]);
    }

    #[test]
    fn single_space_between_words_is_implicit() {
        assert_eq!(normalize(&tokenize("a b")), vec!["a", "b"]);
        // Next to punctuation or the ends of the text it stays explicit.
        assert_eq!(
            normalize(&tokenize("a, b")),
            vec!["a", ",", "\u{1F}s", "1", "b"]
        );
        assert_eq!(normalize(&tokenize(" a")), vec!["\u{1F}s", "1", "a"]);
        assert_eq!(normalize(&tokenize("a ")), vec!["a", "\u{1F}s", "1"]);
    }

    #[test]
    fn renders_exactly() {
        for text in [
            "",
            "a",
            "Hello HELLO hello\n",
            "word word word word",
            "a, b c.\n\nnew  paragraph\t\tdone",
            "don't-stop 'quoted' A1-B2 42",
            "  leading and trailing  ",
            "\u{1F}\u{1F}\u{1F}",
            "x \u{1F}s y",
            "mixed ünïcode — em dash § and 日本語 text",
            "\tTabs\tand\nnewlines \n \t mixed",
            "MiXeD cAsE stays As-Is",
        ] {
            roundtrip(text);
        }
    }

    #[test]
    fn marker_at_end_of_stream_is_an_error() {
        let tokens = vec!["\u{1F}s".to_string()];
        assert!(render_tokens(&tokens).is_err());
    }

    #[test]
    fn bad_run_length_is_an_error() {
        let tokens = vec!["\u{1F}s".to_string(), "!!".to_string()];
        assert!(render_tokens(&tokens).is_err());
    }

    #[test]
    fn base36_lengths() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(1), "1");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(47), "1b");
    }

    #[test]
    fn long_runs_use_base36() {
        let text = " ".repeat(47);
        let normalized = normalize(&tokenize(&text));
        assert_eq!(normalized, vec!["\u{1F}s", "1b"]);
        assert_eq!(render_tokens(&normalized).unwrap(), text);
    }
}
