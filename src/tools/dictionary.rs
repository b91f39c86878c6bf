//! Dictionary construction: collect the distinct normalized tokens, sort
//! them lexicographically, and map the token stream onto stable ids.
//!
//! Sorting is not required by the transform itself, but it makes the id
//! assignment a pure function of the token set: two notes with the same
//! vocabulary get the same dictionary regardless of word order, and the
//! sorted list front-codes well in the container.

use std::collections::HashMap;

/// Assign sorted dictionary ids to a normalized token stream. Id 0 is
/// reserved for the sentinel; entries receive 1..=len in code-point order.
/// Returns the sorted dictionary and the id stream.
pub fn build_dictionary(tokens: &[String]) -> (Vec<String>, Vec<u32>) {
    // First pass: incrementing ids in first-seen order.
    let mut first_seen: HashMap<&str, u32> = HashMap::new();
    let mut entries: Vec<&str> = Vec::new();
    let mut ids = Vec::with_capacity(tokens.len());
    for tok in tokens {
        let id = match first_seen.get(tok.as_str()) {
            Some(&id) => id,
            None => {
                let id = entries.len() as u32;
                entries.push(tok.as_str());
                first_seen.insert(tok.as_str(), id);
                id
            }
        };
        ids.push(id);
    }

    // Sort the entries and remap the ids so the result depends only on the
    // token set, not on first-seen order.
    let mut order = (0..entries.len() as u32).collect::<Vec<u32>>();
    order.sort_unstable_by(|&a, &b| entries[a as usize].cmp(entries[b as usize]));

    let mut remap = vec![0_u32; entries.len()];
    let mut dictionary = Vec::with_capacity(entries.len());
    for (rank, &old) in order.iter().enumerate() {
        remap[old as usize] = rank as u32 + 1;
        dictionary.push(entries[old as usize].to_string());
    }
    for id in ids.iter_mut() {
        *id = remap[*id as usize];
    }
    (dictionary, ids)
}

#[cfg(test)]
mod test {
    use super::build_dictionary;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ids_follow_sorted_order() {
        let tokens = strings(&["zebra", "apple", "zebra", "mango"]);
        let (dictionary, ids) = build_dictionary(&tokens);
        assert_eq!(dictionary, vec!["apple", "mango", "zebra"]);
        assert_eq!(ids, vec![3, 1, 3, 2]);
    }

    #[test]
    fn dictionary_is_strictly_increasing() {
        let tokens = strings(&["b", "a", "c", "a", "b", "\u{1F}s", "1"]);
        let (dictionary, _) = build_dictionary(&tokens);
        for pair in dictionary.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn empty_stream() {
        let (dictionary, ids) = build_dictionary(&[]);
        assert!(dictionary.is_empty());
        assert!(ids.is_empty());
    }

    #[test]
    fn ids_map_back_to_entries() {
        let tokens = strings(&["one", "two", "two", "three", "one"]);
        let (dictionary, ids) = build_dictionary(&tokens);
        for (tok, id) in tokens.iter().zip(&ids) {
            assert_eq!(&dictionary[*id as usize - 1], tok);
        }
    }
}
