//! Query pipeline: classify the intent of a visitor question, extract its
//! keywords, and render a templated natural-language answer with follow-up
//! suggestions.
//!
//! The pipeline itself is synchronous; [`QueryProcessor::process_query_with_timeout`]
//! races it against a reply budget on the tokio runtime.

mod intent;
mod keywords;
mod respond;

pub use keywords::extract_keywords;

use async_trait::async_trait;
use folio_knowledge::{KnowledgeBase, SearchOptions};
use folio_memory::Message;
use folio_shared::{Intent, Sender};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Default reply budget for [`QueryProcessor::process_query_with_timeout`].
pub const DEFAULT_REPLY_TIMEOUT_MS: u64 = 2000;

/// Classifies a raw query. Returns the winning intent and its aggregate
/// pattern score (0 when nothing matched).
pub fn classify(query: &str) -> (Intent, i32) {
    intent::classify(query)
}

/// The default suggestion list shown alongside topic-agnostic replies.
pub fn default_suggestions() -> Vec<String> {
    respond::suggestions_for(Intent::General)
}

/// A rendered answer.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub response: String,
    pub suggestions: Vec<String>,
    pub intent: Intent,
}

/// An answer produced under a reply budget.
#[derive(Debug, Clone, Serialize)]
pub struct TimedAnswer {
    pub response: String,
    pub suggestions: Vec<String>,
    pub intent: Intent,
    /// True when the budget elapsed and a quick canned reply was substituted.
    pub timed_out: bool,
    /// True when processing itself failed and the generic fallback was used.
    pub error: bool,
}

/// Seam between the gateway and the concrete query pipeline.
#[async_trait]
pub trait QueryAnswerer: Send + Sync {
    /// Full processing without a deadline.
    fn answer(&self, query: &str, context: &[Message]) -> Answer;

    /// Processing raced against a reply budget in milliseconds.
    async fn answer_with_deadline(
        &self,
        query: &str,
        context: &[Message],
        timeout_ms: u64,
    ) -> TimedAnswer;
}

/// Turns raw visitor questions into templated answers over a read-only
/// knowledge base.
pub struct QueryProcessor {
    knowledge: Arc<KnowledgeBase>,
    rng: Mutex<StdRng>,
}

impl QueryProcessor {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            knowledge,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seeded constructor so fallback selection is deterministic in tests.
    pub fn with_seed(knowledge: Arc<KnowledgeBase>, seed: u64) -> Self {
        Self {
            knowledge,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Processes one query against the recent-message window.
    pub fn process_query(&self, query: &str, context: &[Message]) -> Answer {
        render_answer(&self.knowledge, query, context, self.next_fallback())
    }

    /// Races processing against the reply budget. Resolves within the budget
    /// plus scheduling overhead: the timer winning yields an intent-keyed
    /// quick reply, a failed processing task yields the generic error
    /// fallback, and the losing side of the race is discarded.
    pub async fn process_query_with_timeout(
        &self,
        query: &str,
        context: &[Message],
        timeout_ms: u64,
    ) -> TimedAnswer {
        if query.trim().is_empty() {
            return done(render_answer(&self.knowledge, query, context, String::new()));
        }

        // the quick reply is keyed by intent, so detect it before the race
        let (intent, _) = intent::classify(query);
        let knowledge = Arc::clone(&self.knowledge);
        // drawn up front: the blocking task stays free of shared state
        let fallback = self.next_fallback();
        let query = query.to_string();
        let context = context.to_vec();
        let task =
            tokio::task::spawn_blocking(move || render_answer(&knowledge, &query, &context, fallback));

        match tokio::time::timeout(Duration::from_millis(timeout_ms), task).await {
            Ok(Ok(answer)) => done(answer),
            Ok(Err(join_error)) => {
                tracing::error!(
                    target: "folio::engine",
                    error = %join_error,
                    "query processing task failed"
                );
                TimedAnswer {
                    response: respond::ERROR_RESPONSE.to_string(),
                    suggestions: respond::suggestions_for(Intent::General),
                    intent: Intent::General,
                    timed_out: false,
                    error: true,
                }
            }
            Err(_elapsed) => {
                tracing::warn!(
                    target: "folio::engine",
                    timeout_ms,
                    intent = %intent,
                    "reply budget exceeded, substituting quick response"
                );
                TimedAnswer {
                    response: respond::quick_response(intent),
                    suggestions: respond::suggestions_for(intent),
                    intent,
                    timed_out: true,
                    error: false,
                }
            }
        }
    }

    fn next_fallback(&self) -> String {
        let ix = self
            .rng
            .lock()
            .map(|mut rng| rng.gen_range(0..respond::FALLBACK_RESPONSES.len()))
            .unwrap_or(0);
        respond::FALLBACK_RESPONSES[ix].to_string()
    }
}

#[async_trait]
impl QueryAnswerer for QueryProcessor {
    fn answer(&self, query: &str, context: &[Message]) -> Answer {
        self.process_query(query, context)
    }

    async fn answer_with_deadline(
        &self,
        query: &str,
        context: &[Message],
        timeout_ms: u64,
    ) -> TimedAnswer {
        self.process_query_with_timeout(query, context, timeout_ms).await
    }
}

fn done(answer: Answer) -> TimedAnswer {
    TimedAnswer {
        response: answer.response,
        suggestions: answer.suggestions,
        intent: answer.intent,
        timed_out: false,
        error: false,
    }
}

/// The full synchronous pipeline. `fallback` is the pre-drawn member of the
/// fixed fallback set, used when the intent is `General` or the category
/// holds no data.
fn render_answer(
    knowledge: &KnowledgeBase,
    query: &str,
    context: &[Message],
    fallback: String,
) -> Answer {
    if query.trim().is_empty() {
        return Answer {
            response: respond::EMPTY_QUERY_RESPONSE.to_string(),
            suggestions: respond::suggestions_for(Intent::General),
            intent: Intent::General,
        };
    }

    let (intent, score) = intent::classify(query);
    let keywords = keywords::extract_keywords(query);
    tracing::debug!(
        target: "folio::engine",
        intent = %intent,
        score,
        ?keywords,
        "classified query"
    );

    if intent == Intent::General {
        if !keywords.is_empty() {
            // diagnostic only: log the nearest category so off-topic phrasing
            // can be mined for new patterns later
            let near = knowledge.search(&keywords, &SearchOptions { limit: Some(1) });
            if let Some(best) = near.first() {
                tracing::debug!(
                    target: "folio::engine",
                    category = %best.category,
                    relevance = best.relevance,
                    "no confident intent, nearest category by keywords"
                );
            }
        }
        return Answer {
            response: fallback,
            suggestions: respond::suggestions_for(Intent::General),
            intent: Intent::General,
        };
    }

    let repeat = repeat_topic(context, query, intent);
    match respond::render_category(knowledge, intent, repeat) {
        Some(response) => Answer {
            response,
            suggestions: respond::suggestions_for(intent),
            intent,
        },
        None => Answer {
            response: fallback,
            suggestions: respond::suggestions_for(intent),
            intent,
        },
    }
}

/// True when the most recent prior user message in the window classifies to
/// the same intent as the current query.
fn repeat_topic(context: &[Message], query: &str, intent: Intent) -> bool {
    context
        .iter()
        .rev()
        .filter(|m| m.sender == Sender::User)
        .find(|m| m.content != query)
        .map(|m| intent::classify(&m.content).0 == intent)
        .unwrap_or(false)
}
