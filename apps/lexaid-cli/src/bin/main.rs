use std::{env, path::PathBuf, sync::Arc};
use lexaid_agents::{CaseDiscoveryAgent, LegalAidAgent};
use lexaid_assistant::{Decomposer, KeywordDecomposer, Orchestrator};
use lexaid_core::config::{expand_path, Config, Settings};
use lexaid_core::traits::{AttachmentPreprocessor, Generator};
use lexaid_embed::embedder_from_settings;
use lexaid_generate::OllamaGenerator;
use lexaid_preprocess::FilePreprocessor;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage:\n  lexaid ask [--attachment PATH] [QUERY...]\n  lexaid decompose [--attachment PATH] [QUERY...]\n  lexaid index";

struct Request { query: Option<String>, attachment: Option<PathBuf> }

fn parse_request(args: &[String]) -> anyhow::Result<Request> {
    let mut words = Vec::new(); let mut attachment = None;
    let mut i = 0; while i < args.len() { match args[i].as_str() {
        "--attachment" | "-a" => { if i + 1 < args.len() { attachment = Some(expand_path(&args[i + 1])); i += 1; } else { anyhow::bail!("--attachment requires a path"); } }
        _ => words.push(args[i].clone()) } i += 1; }
    let query = if words.is_empty() { None } else { Some(words.join(" ")) };
    if query.is_none() && attachment.is_none() { anyhow::bail!("nothing to do: give a query, an attachment, or both\n{}", USAGE); }
    Ok(Request { query, attachment })
}

fn generator(settings: &Settings) -> anyhow::Result<Arc<dyn Generator>> { Ok(Arc::new(OllamaGenerator::from_settings(&settings.generation)?)) }

fn ask(settings: &Settings, req: Request) -> anyhow::Result<()> {
    let mut orchestrator = Orchestrator::from_settings(settings, generator(settings)?)?;
    println!("{}", orchestrator.handle(req.query.as_deref(), req.attachment.as_deref()));
    Ok(())
}

fn decompose(req: Request) -> anyhow::Result<()> {
    let intent = KeywordDecomposer::new(Arc::new(FilePreprocessor::new())).decompose(req.query.as_deref(), req.attachment.as_deref());
    println!("{}", intent.to_json_pretty()?);
    Ok(())
}

fn index(settings: &Settings) -> anyhow::Result<()> {
    let embedder = embedder_from_settings(&settings.embedding, settings.retrieval.dimension)?;
    let preprocessor: Arc<dyn AttachmentPreprocessor> = Arc::new(FilePreprocessor::new());
    let generator = generator(settings)?;
    println!("Corpus directory: {}", expand_path(&settings.data.corpus_dir).display());
    let mut case_discovery = CaseDiscoveryAgent::from_settings(settings, embedder.clone(), preprocessor, generator.clone())?;
    let report = case_discovery.build_index()?;
    println!("case discovery: +{} documents ({} duplicates, {} failed), {} vectors in {}", report.added, report.duplicates, report.failed, case_discovery.store().index().len(), case_discovery.store().index_path().display());
    let mut legal_aid = LegalAidAgent::from_settings(settings, embedder, generator)?;
    let report = legal_aid.build_index()?;
    println!("legal aid: +{} documents ({} duplicates, {} failed), {} vectors in {}", report.added, report.duplicates, report.failed, legal_aid.store().index().len(), legal_aid.store().index_path().display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))).with_writer(std::io::stderr).init();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    tracing::debug!(env = config.env_name(), "configuration loaded");
    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("ask") => ask(&settings, parse_request(&args[1..])?),
        Some("decompose") => decompose(parse_request(&args[1..])?),
        Some("index") => index(&settings),
        Some("--help") | Some("-h") | None => { println!("{}", USAGE); Ok(()) }
        Some(other) => { eprintln!("Unknown command: {}\n{}", other, USAGE); std::process::exit(2); }
    }
}
