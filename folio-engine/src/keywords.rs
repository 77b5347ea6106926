//! Stop-word filtered keyword extraction.

/// Common English function words plus chat filler. Tokens in this set never
/// become keywords.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "am", "do", "does",
    "did", "have", "has", "had", "will", "would", "can", "could", "shall", "should", "may",
    "might", "must", "what", "which", "who", "whom", "whose", "this", "that", "these", "those",
    "i", "you", "your", "yours", "me", "my", "mine", "we", "us", "our", "he", "she", "it",
    "its", "they", "them", "their", "of", "in", "on", "at", "to", "for", "with", "from", "by",
    "as", "about", "into", "over", "under", "and", "or", "but", "if", "then", "else", "when",
    "where", "why", "how", "not", "no", "yes", "so", "too", "very", "just", "there", "here",
    "some", "any", "all", "please", "hello", "hi", "hey", "thanks", "thank", "tell", "show",
    "give", "know", "like", "want", "get", "got",
];

/// Lowercases the query, treats punctuation as whitespace, drops one-char
/// tokens and stop words, and deduplicates preserving first-seen order.
pub fn extract_keywords(query: &str) -> Vec<String> {
    let lowered = query.to_lowercase();
    let mut keywords: Vec<String> = Vec::new();
    for token in lowered.split(|c: char| !c.is_alphanumeric()) {
        if token.len() <= 1 || STOP_WORDS.contains(&token) {
            continue;
        }
        if !keywords.iter().any(|k| k == token) {
            keywords.push(token.to_string());
        }
    }
    keywords
}
