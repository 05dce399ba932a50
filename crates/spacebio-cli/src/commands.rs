//! Subcommand handlers. Each one makes its backend calls, then hands the
//! normalised result to `render`.

use anyhow::{bail, Context};
use spacebio_client::{ask_with_results, concept_graph_for, KnowledgeClient, StoryRequest};
use spacebio_common::bookmarks::BookmarkBook;
use spacebio_common::session::SessionCache;
use spacebio_common::FileStore;
use spacebio_config::Config;
use spacebio_library::{Accepted, LibraryComposer, LibraryRequest, Transition};
use tracing::{debug, info};

use crate::cli::{BookmarkCommand, Cli, Command, LibraryArgs};
use crate::render::Output;

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let out = Output::new(cli.json);
    let store = FileStore::new(config.storage.resolved_path());
    debug!(dir = %store.dir().display(), "Local storage");

    let client = KnowledgeClient::from_config(&config)
        .with_context(|| format!("Could not create client for {}", config.backend.base_url))?;

    match cli.command {
        Command::Ping => out.ping(&client.ping().await?),
        Command::Stats => out.stats(&client.stats().await?),
        Command::Search { query, top_k } => {
            let results = client.search(&query, top_k).await?;
            SessionCache::new(&store).remember_search(&query, &results)?;
            out.search_results(&results)
        }
        Command::Ask { question, facets } => {
            let facets = facets.to_facets();
            let session = SessionCache::new(&store);
            if facets.is_empty() {
                let outcome = ask_with_results(&client, &session, &question).await?;
                out.answer(&outcome.answer, Some(&outcome.results))
            } else {
                let answer = client.ask(&question, &facets).await?;
                session.remember_answer(&question, &answer)?;
                out.answer(&answer, None)
            }
        }
        Command::Library(args) => library(&client, args, config.library.page_size, &out).await,
        Command::Graph { query } => {
            let (graph, origin) = concept_graph_for(&client, query.as_deref()).await?;
            out.graph(&graph, origin)
        }
        Command::Mindmap { question, top_k, facets } => {
            let mut request = client.mindmap_request(question);
            if let Some(top_k) = top_k {
                request.top_k = top_k;
            }
            request.facets = facets.to_facets();
            out.mindmap(&client.mindmap(&request).await?)
        }
        Command::Story { question, mode, length, facets } => {
            let mut request = StoryRequest::from_config(client.story_config(), question);
            if let Some(mode) = mode {
                request.mode = mode;
            }
            if let Some(length) = length {
                request.length = length;
            }
            request.facets = facets.to_facets();
            out.story(&client.story(&request).await?)
        }
        Command::Tts { text, voice } => out.tts(&client.tts(&text, voice.as_deref()).await?),
        Command::Voices => out.voices(&client.voices().await?),
        Command::Stt { file } => out.transcript(&client.stt(&file).await?),
        Command::Login { password } => {
            let token = client.login(&password).await?;
            info!("Token obtained; set SPACEBIO_TOKEN to reuse it");
            out.token(&token)
        }
        Command::Bookmarks { action } => bookmarks(&action, &store, &out),
    }
}

/// Issue the query the flags describe as one request, and re-issue once
/// with a clamped page if the requested one was past the end.
async fn library(
    client: &KnowledgeClient,
    args: LibraryArgs,
    default_page_size: u32,
    out: &Output,
) -> anyhow::Result<()> {
    let mut composer = LibraryComposer::with_state(args.query_state(default_page_size));
    let request = composer.apply(Transition::Refresh);

    fetch_into(client, &mut composer, request).await?;
    if composer.page_count().is_some_and(|pages| args.page > pages) {
        let request = composer.apply(Transition::GoToPage(args.page));
        fetch_into(client, &mut composer, request).await?;
    }

    match composer.current() {
        Some(page) => out.library(page, composer.page_count()),
        None => bail!("library query produced no page"),
    }
}

async fn fetch_into(
    client: &KnowledgeClient,
    composer: &mut LibraryComposer,
    request: LibraryRequest,
) -> anyhow::Result<()> {
    let page = client.library(&request.query).await?;
    if composer.accept(request.seq, page) == Accepted::Stale {
        debug!(seq = request.seq, "Library response superseded");
    }
    Ok(())
}

fn bookmarks(action: &BookmarkCommand, store: &FileStore, out: &Output) -> anyhow::Result<()> {
    let book = BookmarkBook::new(store);
    match action {
        BookmarkCommand::List => out.bookmarks(&book.list()?),
        BookmarkCommand::Add => {
            let session = SessionCache::new(store);
            let (Some(question), Some(answer)) = (session.last_question()?, session.last_answer()?) else {
                bail!("No answer to bookmark yet; run `spacebio ask` first");
            };
            let record = book.add(question, answer.answer, answer.sources.len())?;
            out.bookmarks(std::slice::from_ref(&record))
        }
        BookmarkCommand::Remove { id } => {
            if !book.remove(id)? {
                bail!("No bookmark with id {id}");
            }
            Ok(())
        }
        BookmarkCommand::Clear => Ok(book.clear()?),
    }
}
