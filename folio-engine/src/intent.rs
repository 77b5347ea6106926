//! Weighted keyword-pattern intent classifier.
//!
//! Each topical category carries two priority tiers of patterns. High
//! patterns score 5 on a phrase (substring) match, else 4 on a whole-word
//! match; the phrase match takes precedence and skips the word check.
//! Medium patterns score 2 on a whole-word match, else 1 on a substring
//! match. The strictly highest aggregate wins; ties keep the category that
//! comes first in iteration order.

use folio_shared::Intent;
use regex::Regex;

const HIGH_PHRASE_POINTS: i32 = 5;
const HIGH_WORD_POINTS: i32 = 4;
const MEDIUM_WORD_POINTS: i32 = 2;
const MEDIUM_SUBSTRING_POINTS: i32 = 1;

/// Aggregate score below this classifies as `Intent::General`.
pub(crate) const CONFIDENCE_FLOOR: i32 = 2;

struct IntentPatterns {
    intent: Intent,
    high: &'static [&'static str],
    medium: &'static [&'static str],
}

const PATTERNS: &[IntentPatterns] = &[
    IntentPatterns {
        intent: Intent::Experience,
        high: &[
            "work experience",
            "experience",
            "employment",
            "career",
            "work history",
        ],
        medium: &["job", "company", "worked", "role", "position", "background"],
    },
    IntentPatterns {
        intent: Intent::Skills,
        high: &["skills", "skill set", "technologies", "tech stack", "technology"],
        medium: &[
            "tools",
            "languages",
            "frameworks",
            "programming",
            "automation",
            "testing",
            "know",
        ],
    },
    IntentPatterns {
        intent: Intent::Projects,
        high: &["projects", "portfolio"],
        medium: &["project", "built", "developed", "created", "showcase"],
    },
    IntentPatterns {
        intent: Intent::Awards,
        high: &["awards", "achievements", "recognition"],
        medium: &["award", "achievement", "honors", "won"],
    },
    IntentPatterns {
        intent: Intent::Contact,
        high: &["contact", "get in touch", "reach you", "email"],
        medium: &["linkedin", "github", "hire", "connect", "phone"],
    },
    IntentPatterns {
        intent: Intent::Certifications,
        high: &["certifications", "certificates", "certified"],
        medium: &["certification", "certificate", "credentials", "qualified"],
    },
    IntentPatterns {
        intent: Intent::Personal,
        high: &[
            "about you",
            "who are you",
            "tell me about yourself",
            "introduce yourself",
        ],
        medium: &["about", "yourself", "summary", "bio", "name"],
    },
];

/// Classifies a raw query. Returns the winning intent and its aggregate score
/// (0 for `General` when nothing matched at all).
pub(crate) fn classify(query: &str) -> (Intent, i32) {
    let query = query.to_lowercase();
    let mut winner = Intent::General;
    let mut best = 0;

    for patterns in PATTERNS {
        let mut score = 0;
        for phrase in patterns.high {
            if query.contains(phrase) {
                score += HIGH_PHRASE_POINTS;
            } else if contains_word(&query, phrase) {
                score += HIGH_WORD_POINTS;
            }
        }
        for pattern in patterns.medium {
            if contains_word(&query, pattern) {
                score += MEDIUM_WORD_POINTS;
            } else if query.contains(pattern) {
                score += MEDIUM_SUBSTRING_POINTS;
            }
        }
        // strict comparison: ties keep the earlier category
        if score > best {
            best = score;
            winner = patterns.intent;
        }
    }

    if best < CONFIDENCE_FLOOR {
        (Intent::General, best)
    } else {
        (winner, best)
    }
}

fn contains_word(text: &str, word: &str) -> bool {
    let pattern = format!(r"\b{}\b", regex::escape(word));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(text),
        Err(_) => text.contains(word),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technologies_question_classifies_as_skills() {
        let (intent, score) = classify("What technologies do you know?");
        assert_eq!(intent, Intent::Skills);
        assert!(score >= CONFIDENCE_FLOOR);
    }

    #[test]
    fn work_history_classifies_as_experience() {
        assert_eq!(classify("Tell me about your work experience").0, Intent::Experience);
        assert_eq!(classify("what was your career path").0, Intent::Experience);
    }

    #[test]
    fn gibberish_classifies_as_general_with_zero_score() {
        let (intent, score) = classify("asdkjfh qwoiuer");
        assert_eq!(intent, Intent::General);
        assert_eq!(score, 0);
    }

    #[test]
    fn phrase_match_outscores_word_match() {
        // "work experience" (phrase, 5) plus "experience" (phrase, 5)
        let (_, phrase_score) = classify("work experience");
        let (_, word_score) = classify("experience only");
        assert!(phrase_score > word_score);
    }

    #[test]
    fn contact_and_certifications_are_distinguished() {
        assert_eq!(classify("how can I get in touch?").0, Intent::Contact);
        assert_eq!(classify("do you hold any certifications?").0, Intent::Certifications);
    }

    #[test]
    fn about_yourself_classifies_as_personal() {
        assert_eq!(classify("tell me about yourself").0, Intent::Personal);
    }

    #[test]
    fn single_weak_hit_stays_general() {
        // "like" matches nothing; "so" matches nothing; below the floor
        let (intent, score) = classify("ok so anyway");
        assert_eq!(intent, Intent::General);
        assert!(score < CONFIDENCE_FLOOR);
    }
}
