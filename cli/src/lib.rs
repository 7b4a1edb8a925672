use anyhow::{Context, Result};
use serde::Deserialize;
use sift_core::{DocId, Document, DocumentStatus, Rating, RequestQueue, RequestQueueConfig, SearchConfig, SearchServer};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub mod args;

pub use args::{Cli, Commands};

/// One input document, a line of a `.jsonl` file or an element of a `.json` array.
#[derive(Debug, Clone, Deserialize)]
pub struct InputDoc {
    pub id: DocId,
    pub text: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub ratings: Vec<Rating>,
}

/// Settings file accepted by `--config`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub stop_words: Vec<String>,
    pub search: SearchConfig,
    pub requests: RequestQueueConfig,
}

pub fn load_settings(path: &Path) -> Result<Settings> {
    let f = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let settings = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(settings)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub added: usize,
    pub skipped: usize,
}

/// Collect `.json`/`.jsonl` files under `input` (or `input` itself), sorted by path.
pub fn input_files(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
        files.sort();
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

/// Read every input document into `server`.
///
/// Malformed JSON aborts the load. Documents the index rejects (bad id,
/// control characters) are logged and skipped.
pub fn load_documents(server: &mut SearchServer, input: &Path) -> Result<LoadStats> {
    let files = input_files(input);
    if files.is_empty() {
        anyhow::bail!("no .json or .jsonl documents found at {}", input.display());
    }
    let mut stats = LoadStats::default();
    for file in files {
        let docs = read_docs(&file)?;
        for doc in docs {
            match server.add_document(doc.id, &doc.text, doc.status, &doc.ratings) {
                Ok(()) => stats.added += 1,
                Err(err) => {
                    tracing::warn!(file = %file.display(), id = doc.id, %err, "skipping document");
                    stats.skipped += 1;
                }
            }
        }
    }
    tracing::info!(added = stats.added, skipped = stats.skipped, "loaded documents");
    Ok(stats)
}

fn read_docs(file: &Path) -> Result<Vec<InputDoc>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        let mut docs = Vec::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("{}:{}: reading line", file.display(), lineno + 1))?;
            if line.trim().is_empty() {
                continue;
            }
            let doc: InputDoc = serde_json::from_str(&line)
                .with_context(|| format!("{}:{}: invalid document", file.display(), lineno + 1))?;
            docs.push(doc);
        }
        return Ok(docs);
    }
    let json: serde_json::Value =
        serde_json::from_reader(reader).with_context(|| format!("parsing {}", file.display()))?;
    let docs = match json {
        serde_json::Value::Array(_) => serde_json::from_value(json)?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => Vec::new(),
    };
    Ok(docs)
}

/// Split results into pages of `page_size` (at least one per page).
pub fn paginate<T>(items: &[T], page_size: usize) -> impl Iterator<Item = &[T]> {
    items.chunks(page_size.max(1))
}

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub page_size: usize,
    pub json: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        OutputOptions { page_size: usize::MAX, json: false }
    }
}

pub fn write_results<W: Write>(out: &mut W, docs: &[Document], opts: OutputOptions) -> Result<()> {
    if opts.json {
        serde_json::to_writer(&mut *out, docs)?;
        writeln!(out)?;
        return Ok(());
    }
    for page in paginate(docs, opts.page_size) {
        for doc in page {
            writeln!(out, "{doc}")?;
        }
        if opts.page_size < docs.len() {
            writeln!(out, "Page break")?;
        }
    }
    Ok(())
}

/// Answer one query per input line, tracking empty results in a request window.
///
/// Invalid queries are reported and skipped. Returns the number of
/// no-result requests left in the window at end of input.
pub fn run_repl<R, W>(
    server: &SearchServer,
    input: R,
    out: &mut W,
    window: RequestQueueConfig,
    opts: OutputOptions,
) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut queue = RequestQueue::with_config(server, window);
    for line in input.lines() {
        let line = line?;
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        match queue.add_find_request(query) {
            Ok(found) => {
                writeln!(out, "Results for request: {query}")?;
                write_results(out, &found, opts)?;
            }
            Err(err) => {
                tracing::warn!(query, %err, "skipping query");
                writeln!(out, "Error in request {query:?}: {err}")?;
            }
        }
    }
    let empty = queue.no_result_requests();
    writeln!(out, "Total empty requests: {empty}")?;
    Ok(empty)
}
