//! Argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use spacebio_common::{FacetKind, Facets};
use spacebio_library::{LibraryQueryState, SortField, SortOrder};

#[derive(Parser)]
#[command(name = "spacebio", author, version, about = "Query the space biology knowledge engine")]
pub struct Cli {
    /// Backend base URL. Overrides spacebio.toml and SPACEBIO_API_BASE.
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Print raw JSON instead of formatted text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check that the backend is up and its index is loaded.
    Ping,

    /// Corpus statistics: top organisms, stressors and platforms.
    Stats,

    /// Raw passage search.
    Search {
        query: String,
        #[arg(long)]
        top_k: Option<u32>,
    },

    /// Ask a question. Without facet filters the answer and raw search run
    /// together and both are cached for `bookmarks add`.
    Ask {
        question: String,
        #[command(flatten)]
        facets: FacetArgs,
    },

    /// Browse the corpus page by page.
    Library(LibraryArgs),

    /// Concept star graph for a query, or for the whole corpus.
    Graph { query: Option<String> },

    /// Backend-generated concept map.
    Mindmap {
        question: Option<String>,
        #[arg(long)]
        top_k: Option<u32>,
        #[command(flatten)]
        facets: FacetArgs,
    },

    /// Generated narrative with inline citations.
    Story {
        question: Option<String>,
        /// scientific | public | chronological | thematic
        #[arg(long)]
        mode: Option<String>,
        /// short | medium | long
        #[arg(long)]
        length: Option<String>,
        #[command(flatten)]
        facets: FacetArgs,
    },

    /// Synthesise speech for a piece of text.
    Tts {
        text: String,
        #[arg(long)]
        voice: Option<String>,
    },

    /// List available TTS voices.
    Voices,

    /// Transcribe an audio file.
    Stt { file: PathBuf },

    /// Exchange a password for a bearer token.
    Login {
        #[arg(long, env = "SPACEBIO_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Saved question/answer pairs.
    Bookmarks {
        #[command(subcommand)]
        action: BookmarkCommand,
    },
}

#[derive(Subcommand)]
pub enum BookmarkCommand {
    List,
    /// Bookmark the most recent answer.
    Add,
    Remove { id: String },
    Clear,
}

#[derive(Args, Debug, Default, Clone)]
pub struct FacetArgs {
    #[arg(long)]
    pub organism: Option<String>,
    #[arg(long)]
    pub stressor: Option<String>,
    #[arg(long)]
    pub platform: Option<String>,
}

impl FacetArgs {
    pub fn to_facets(&self) -> Facets {
        let mut facets = Facets::default();
        facets.set(FacetKind::Organism, self.organism.clone());
        facets.set(FacetKind::Stressor, self.stressor.clone());
        facets.set(FacetKind::Platform, self.platform.clone());
        facets
    }
}

#[derive(Args, Debug)]
pub struct LibraryArgs {
    /// Free-text filter on title, text and path.
    #[arg(long)]
    pub q: Option<String>,
    #[command(flatten)]
    pub facets: FacetArgs,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long)]
    pub page_size: Option<u32>,
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,
    #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
    pub order: OrderArg,
}

impl LibraryArgs {
    /// The query these flags describe, with the page as requested.
    pub fn query_state(&self, default_page_size: u32) -> LibraryQueryState {
        let mut state = LibraryQueryState::new(self.page_size.unwrap_or(default_page_size));
        state.q = self.q.as_deref().map(str::trim).unwrap_or_default().to_string();
        state.facets = self.facets.to_facets();
        state.page = self.page.max(1);
        state.sort = self.sort.map(SortField::from);
        state.order = self.order.into();
        state
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SortArg {
    Year,
    Path,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Year => SortField::Year,
            SortArg::Path => SortField::Path,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_library_args() {
        let cli = Cli::parse_from([
            "spacebio", "library", "--organism", "Mouse", "--page", "3", "--sort", "year", "--order", "asc",
        ]);
        let Command::Library(args) = cli.command else {
            panic!("expected library command");
        };
        assert_eq!(args.page, 3);
        assert_eq!(args.facets.to_facets().get(FacetKind::Organism), Some("Mouse"));
        assert!(matches!(args.sort, Some(SortArg::Year)));
        assert_eq!(args.order, OrderArg::Asc);
    }

    #[test]
    fn test_library_args_query_state() {
        let cli = Cli::parse_from(["spacebio", "library", "--q", " bone ", "--stressor", "Radiation", "--page", "2"]);
        let Command::Library(args) = cli.command else {
            panic!("expected library command");
        };
        let mut expected = LibraryQueryState::new(50);
        expected.q = "bone".into();
        expected.facets = Facets { stressor: Some("Radiation".into()), ..Default::default() };
        expected.page = 2;
        assert_eq!(args.query_state(50), expected);
    }

    #[test]
    fn test_empty_facet_flag_is_absent() {
        let facets = FacetArgs { organism: Some(String::new()), ..Default::default() }.to_facets();
        assert!(facets.is_empty());
    }
}
