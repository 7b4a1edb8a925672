use crate::{load_documents, load_settings, run_repl, write_results, OutputOptions, Settings};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sift_core::{DocId, DocumentStatus, SearchServer};
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(about = "Rank documents against plus/minus queries with TF-IDF", long_about = None)]
pub struct Cli {
    /// Input documents: a .json/.jsonl file or a directory of them
    #[arg(long, global = true)]
    pub docs: Option<PathBuf>,
    /// Space-separated stop words (added to any from --config)
    #[arg(long, global = true, default_value = "")]
    pub stop_words: String,
    /// JSON settings file with stop_words, search and requests sections
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Maximum number of documents per query
    #[arg(long, global = true)]
    pub max_results: Option<usize>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print the top documents for one query
    Search {
        query: String,
        /// Only documents with this status (actual, irrelevant, banned, removed)
        #[arg(long, default_value = "actual")]
        status: DocumentStatus,
        /// Documents per page
        #[arg(long, default_value_t = usize::MAX)]
        page_size: usize,
        /// Print results as a JSON array
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show which query terms a document matches
    Match {
        /// Document id
        #[arg(long)]
        id: DocId,
        query: String,
    },
    /// Read queries from stdin, one per line, and report empty-result requests
    Repl {
        /// Documents per page
        #[arg(long, default_value_t = usize::MAX)]
        page_size: usize,
        /// Request window size
        #[arg(long)]
        window: Option<usize>,
    },
}

impl Cli {
    /// Settings file (if any) with command-line overrides applied.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => load_settings(path)?,
            None => Settings::default(),
        };
        if let Some(max_results) = self.max_results {
            settings.search.max_results = max_results;
        }
        if let Commands::Repl { window: Some(capacity), .. } = self.command {
            settings.requests.capacity = capacity;
        }
        settings.stop_words.extend(self.stop_words.split(' ').filter(|w| !w.is_empty()).map(String::from));
        Ok(settings)
    }

    /// Empty server configured from `settings`.
    pub fn build_server(settings: &Settings) -> Result<SearchServer> {
        SearchServer::with_config(&settings.stop_words, settings.search).context("invalid stop words")
    }

    /// Load the corpus, then run the subcommand, reading queries from `input` for `repl`.
    pub fn run<R: BufRead, W: Write>(self, input: R, out: &mut W) -> Result<()> {
        let settings = self.settings()?;
        let docs = self.docs.context("--docs is required")?;
        let mut server = Self::build_server(&settings)?;
        load_documents(&mut server, &docs)?;

        match self.command {
            Commands::Search { query, status, page_size, json } => {
                let found = server.find_top_documents_with_status(&query, status)?;
                write_results(out, &found, OutputOptions { page_size, json })?;
            }
            Commands::Match { id, query } => {
                let (words, status) = server.match_document(&query, id)?;
                writeln!(out, "{{ document_id = {id}, status = {status}, words = {} }}", words.join(" "))?;
            }
            Commands::Repl { page_size, .. } => {
                run_repl(&server, input, out, settings.requests, OutputOptions { page_size, json: false })?;
            }
        }
        out.flush()?;
        Ok(())
    }
}
