//! Operations that span more than one backend call.

use spacebio_common::session::SessionCache;
use spacebio_common::{AnswerPayload, KeyValueStore, Result, SearchResult};
use spacebio_kg::{build_from_results, build_from_stats, ConceptGraph, GraphOrigin};
use tracing::{debug, instrument, warn};

use crate::api::KnowledgeClient;

#[derive(Debug, Clone, PartialEq)]
pub struct AskOutcome {
    pub answer: AnswerPayload,
    pub results: Vec<SearchResult>,
}

/// Run the answer and the raw search for `question` concurrently. Either
/// network failure fails the whole operation. On success both are cached;
/// a cache write failure is logged and does not lose the answer.
#[instrument(skip(client, session))]
pub async fn ask_with_results<S: KeyValueStore>(
    client: &KnowledgeClient,
    session: &SessionCache<S>,
    question: &str,
) -> Result<AskOutcome> {
    let (answer, results) = tokio::try_join!(client.ask_simple(question), client.search(question, None))?;

    let cached = session
        .remember_answer(question, &answer)
        .and_then(|()| session.remember_search(question, &results));
    if let Err(e) = cached {
        warn!(error = %e, "Could not cache answer");
    }
    Ok(AskOutcome { answer, results })
}

/// Concept graph for `query`: from a live search when it returns anything,
/// otherwise from corpus statistics.
#[instrument(skip(client))]
pub async fn concept_graph_for(
    client: &KnowledgeClient,
    query: Option<&str>,
) -> Result<(ConceptGraph, GraphOrigin)> {
    if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
        let results = client.search(q, None).await?;
        if !results.is_empty() {
            return Ok((build_from_results(Some(q), &results), GraphOrigin::LiveResults));
        }
        debug!("Search returned nothing, using corpus stats");
    }
    let stats = client.stats().await?;
    Ok((build_from_stats(query, &stats), GraphOrigin::CorpusStats))
}
