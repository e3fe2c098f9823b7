//! Token normalization shared by the index and by queries.
//!
//! Normalization is fixed:
//! 1. lower-case (Unicode aware, so "Evaluación" → "evaluación")
//! 2. apostrophes are removed ("Crohn's" → "crohns")
//! 3. every other non-alphanumeric character separates tokens
//!    ("chronic-disease" → "chronic", "disease")
//!
//! Splitting on punctuation, not only whitespace, keeps a hyphenated or
//! slashed word ("chronic-disease", "ACE-I/ARB") findable by each of its
//! parts, so a word that appeared inside a field as a plain substring is
//! still a token match.
//!
//! There is no stemming, stop-word removal or fuzzy matching.

/// Characters dropped without splitting the surrounding word.
const APOSTROPHES: [char; 3] = ['\'', '\u{2019}', '`'];

/// Splits text into normalized tokens, in order, duplicates kept.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if APOSTROPHES.contains(&c) {
            continue;
        }
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Tokens of a query, de-duplicated, keeping first occurrence order.
pub fn query_tokens(query: &str) -> Vec<String> {
    let mut tokens = tokenize(query);
    let mut seen = std::collections::HashSet::new();
    tokens.retain(|t| seen.insert(t.clone()));
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_whitespace() {
        assert_eq!(tokenize("Acute  Wheezing\tDyspnea"), vec!["acute", "wheezing", "dyspnea"]);
    }

    #[test]
    fn test_punctuation_splits() {
        assert_eq!(
            tokenize("chronic-disease, (COPD)/GOLD."),
            vec!["chronic", "disease", "copd", "gold"]
        );
    }

    #[test]
    fn test_apostrophes_join() {
        assert_eq!(tokenize("Crohn's disease"), vec!["crohns", "disease"]);
        assert_eq!(tokenize("Crohn\u{2019}s"), vec!["crohns"]);
    }

    #[test]
    fn test_unicode_letters_kept() {
        assert_eq!(
            tokenize("Evaluación del dolor torácico"),
            vec!["evaluación", "del", "dolor", "torácico"]
        );
    }

    #[test]
    fn test_numbers_are_tokens() {
        assert_eq!(tokenize("SpO2 < 90%"), vec!["spo2", "90"]);
    }

    #[test]
    fn test_empty_and_symbols_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" -- !! ").is_empty());
    }

    #[test]
    fn test_query_tokens_dedup() {
        assert_eq!(
            query_tokens("Wheezing wheezing emergency WHEEZING"),
            vec!["wheezing", "emergency"]
        );
    }
}
