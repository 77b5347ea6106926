//! Read-only, categorized knowledge about one person, with scored keyword search.
//!
//! The knowledge base is constructed once from a typed [`Profile`] and never
//! mutated afterwards. Lookups are case-insensitive on category name and all
//! public methods degrade to `None`/empty rather than failing.

mod profile;
mod search;

pub use profile::{
    AwardEntry, Category, CertificationEntry, ContactCard, ExperienceEntry, PersonalSummary,
    Profile, ProjectEntry, SkillGroup,
};
pub use search::{SearchOptions, SearchResult};

use serde_json::Value;

/// Relevance at or above this stops the cross-category scan early.
pub const DEFAULT_HIGH_CONFIDENCE: f32 = 0.85;

/// Categorized, immutable knowledge store with scored keyword search.
pub struct KnowledgeBase {
    profile: Profile,
    /// One JSON document per category, rendered once at construction so the
    /// scoring path never re-serializes typed entries.
    documents: Vec<(Category, Value)>,
    high_confidence: f32,
}

impl KnowledgeBase {
    pub fn new(profile: Profile) -> Self {
        Self::with_threshold(profile, DEFAULT_HIGH_CONFIDENCE)
    }

    /// Builds the knowledge base with a custom early-termination threshold.
    pub fn with_threshold(profile: Profile, high_confidence: f32) -> Self {
        let documents = Category::all()
            .iter()
            .map(|category| (*category, category_doc(&profile, *category)))
            .collect();
        Self {
            profile,
            documents,
            high_confidence,
        }
    }

    /// Typed view of the underlying profile, for formatters.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Category keys, fixed at construction.
    pub fn categories(&self) -> Vec<&'static str> {
        Category::all().iter().map(|c| c.key()).collect()
    }

    /// Case-insensitive category lookup. Returns `None` for unknown, empty,
    /// or otherwise malformed names.
    pub fn get_by_category(&self, name: &str) -> Option<&Value> {
        let category = Category::from_name(name)?;
        self.document(category)
    }

    /// Scored search restricted to one category. Unknown category returns an
    /// empty sequence; empty keywords return every entry with relevance 1.0.
    pub fn query(&self, name: &str, keywords: &[String]) -> Vec<SearchResult> {
        let Some(category) = Category::from_name(name) else {
            return Vec::new();
        };
        let Some(doc) = self.document(category) else {
            return Vec::new();
        };

        if keywords.iter().all(|k| k.trim().is_empty()) {
            return wrap_all_entries(category.key(), doc);
        }

        let mut results = search::score_category(category.key(), doc, keywords);
        sort_by_relevance(&mut results);
        results
    }

    /// Scored search across every category, sorted by relevance descending.
    ///
    /// The scan stops as soon as a category yields a hit at or above the
    /// high-confidence threshold. Results accumulated up to that point are
    /// returned sorted, so the early exit only ever trims trailing
    /// lower-priority categories, never reorders what is returned.
    pub fn search(&self, keywords: &[String], options: &SearchOptions) -> Vec<SearchResult> {
        let mut results = Vec::new();
        for (category, doc) in &self.documents {
            let hits = search::score_category(category.key(), doc, keywords);
            let confident = hits.iter().any(|r| r.relevance >= self.high_confidence);
            results.extend(hits);
            if confident {
                tracing::debug!(
                    target: "folio::knowledge",
                    category = category.key(),
                    threshold = self.high_confidence,
                    "high-confidence hit, stopping category scan"
                );
                break;
            }
        }
        sort_by_relevance(&mut results);
        if let Some(limit) = options.limit {
            results.truncate(limit);
        }
        results
    }

    fn document(&self, category: Category) -> Option<&Value> {
        self.documents
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, doc)| doc)
            .filter(|doc| !doc.is_null())
    }
}

fn category_doc(profile: &Profile, category: Category) -> Value {
    let rendered = match category {
        Category::Experience => serde_json::to_value(&profile.experience),
        Category::Skills => serde_json::to_value(&profile.skills),
        Category::Projects => serde_json::to_value(&profile.projects),
        Category::Awards => serde_json::to_value(&profile.awards),
        Category::Certifications => serde_json::to_value(&profile.certifications),
        Category::Contact => serde_json::to_value(&profile.contact),
        Category::Personal => serde_json::to_value(&profile.personal),
    };
    rendered.unwrap_or(Value::Null)
}

fn wrap_all_entries(category: &str, doc: &Value) -> Vec<SearchResult> {
    match doc {
        Value::Array(entries) => entries
            .iter()
            .map(|entry| SearchResult {
                data: entry.clone(),
                relevance: 1.0,
                category: category.to_string(),
                field: None,
            })
            .collect(),
        Value::Object(_) => vec![SearchResult {
            data: doc.clone(),
            relevance: 1.0,
            category: category.to_string(),
            field: None,
        }],
        _ => Vec::new(),
    }
}

fn sort_by_relevance(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::new(Profile::demo())
    }

    #[test]
    fn category_lookup_is_case_insensitive_and_total() {
        let kb = kb();
        assert!(kb.get_by_category("SKILLS").is_some());
        assert!(kb.get_by_category(" experience ").is_some());
        assert!(kb.get_by_category("education").is_none());
        assert!(kb.get_by_category("").is_none());
    }

    #[test]
    fn query_with_empty_keywords_wraps_every_entry() {
        let kb = kb();
        let results = kb.query("experience", &[]);
        assert_eq!(results.len(), kb.profile().experience.len());
        assert!(results.iter().all(|r| r.relevance == 1.0));
        assert!(results.iter().all(|r| r.category == "experience"));
    }

    #[test]
    fn query_unknown_category_is_empty() {
        assert!(kb().query("degrees", &["selenium".to_string()]).is_empty());
    }

    #[test]
    fn search_results_are_sorted_descending() {
        let kb = kb();
        let results = kb.search(
            &["selenium".to_string(), "playwright".to_string()],
            &SearchOptions::default(),
        );
        assert!(!results.is_empty());
        for pair in results.windows(2) {
            assert!(pair[0].relevance >= pair[1].relevance);
        }
        for r in &results {
            assert!((0.0..=1.0).contains(&r.relevance));
        }
    }

    #[test]
    fn early_termination_keeps_the_confident_hit() {
        // threshold 2.0 can never trigger, so this scan covers all categories
        let full = KnowledgeBase::with_threshold(Profile::demo(), 2.0);
        let all = full.search(&["selenium".to_string()], &SearchOptions::default());

        let short = kb().search(&["selenium".to_string()], &SearchOptions::default());
        assert!(!short.is_empty());
        // the early exit may drop trailing categories but never the best hit
        assert_eq!(short[0].relevance, all[0].relevance);
        for pair in short.windows(2) {
            assert!(pair[0].relevance >= pair[1].relevance);
        }
    }

    #[test]
    fn search_limit_truncates_after_sorting() {
        let kb = kb();
        let results = kb.search(
            &["testing".to_string(), "automation".to_string()],
            &SearchOptions { limit: Some(2) },
        );
        assert!(results.len() <= 2);
    }

    #[test]
    fn category_purity_of_query_results() {
        let kb = kb();
        for r in kb.query("projects", &["playwright".to_string()]) {
            assert_eq!(r.category, "projects");
        }
    }
}
