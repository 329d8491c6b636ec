//! Linha de comando do FoodIE: extrai entidades de alimentos de um post,
//! de documentos pré-anotados (JSON) ou dos posts de exemplo.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use food_core::{
    corpus::sample_texts, AnnotatedDocument, EmissionPolicy, ExtractorConfig, FoodPipeline, LexiconAnnotator,
    TagMatch,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Parser)]
#[command(author, version, about = "Extrai entidades de alimentos de textos curtos")]
struct Cli {
    /// Imprime as tags USAS de cada token
    #[arg(short = 't', long = "tags")]
    print_tags: bool,

    /// Documento/texto a ser processado
    #[arg(short, long, value_name = "TEXT", conflicts_with = "annotated")]
    doc: Option<String>,

    /// Documentos pré-anotados em JSON (um documento ou uma lista)
    #[arg(short, long, value_name = "FILE")]
    annotated: Option<PathBuf>,

    /// Léxico TSV alternativo para o anotador
    #[arg(short, long, value_name = "FILE")]
    lexicon: Option<PathBuf>,

    /// Não repete tokens de comida já absorvidos por um span anterior
    #[arg(long)]
    dedupe: bool,

    /// Regra 4 dispara com qualquer uma das tags proibidas
    #[arg(long)]
    not_allowed_any: bool,

    /// Saída em JSON (um objeto por linha)
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config(&self) -> ExtractorConfig {
        ExtractorConfig {
            not_allowed_match: if self.not_allowed_any { TagMatch::Any } else { TagMatch::All },
            emission: if self.dedupe {
                EmissionPolicy::SkipConsumed
            } else {
                EmissionPolicy::EveryFoodToken
            },
        }
    }
}

/// Arquivo JSON com um documento ou uma lista de documentos
#[derive(Deserialize)]
#[serde(untagged)]
enum AnnotatedInput {
    Many(Vec<AnnotatedDocument>),
    One(AnnotatedDocument),
}

#[derive(Serialize)]
struct Report<'a> {
    document: &'a str,
    entities: &'a [String],
}

fn print_report(cli: &Cli, text: &str, doc: &AnnotatedDocument, entities: &[String]) -> anyhow::Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string(&Report { document: text, entities })?);
        return Ok(());
    }
    println!("DOCUMENT:");
    println!("{}", text);
    if cli.print_tags {
        print!("{}", doc.diagnostic_dump());
        println!();
    }
    println!("EXTRACTED FOOD ENTITIES:");
    println!("{:?}", entities);
    println!();
    Ok(())
}

fn run_annotated(cli: &Cli, pipeline: &FoodPipeline, path: &Path) -> anyhow::Result<()> {
    let content = fs::read_to_string(path).with_context(|| format!("lendo {:?}", path))?;
    let docs = match serde_json::from_str(&content).with_context(|| format!("JSON inválido em {:?}", path))? {
        AnnotatedInput::Many(docs) => docs,
        AnnotatedInput::One(doc) => vec![doc],
    };
    debug!(documents = docs.len(), "documentos pré-anotados carregados");

    for doc in &docs {
        let entities = pipeline.analyze_document(doc).texts();
        print_report(cli, &doc.text(), doc, &entities)?;
    }
    Ok(())
}

fn run_texts(cli: &Cli, pipeline: &FoodPipeline, texts: &[&str]) -> anyhow::Result<()> {
    for result in pipeline.analyze_batch(texts) {
        let analysis = result?;
        print_report(cli, &analysis.cleaned, &analysis.document, &analysis.texts())?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let annotator = match &cli.lexicon {
        Some(path) => LexiconAnnotator::from_path(path).with_context(|| format!("léxico {:?}", path))?,
        None => LexiconAnnotator::builtin()?,
    };
    let pipeline = FoodPipeline::with_annotator(annotator).with_config(cli.config());

    if let Some(path) = &cli.annotated {
        return run_annotated(&cli, &pipeline, path);
    }

    match &cli.doc {
        Some(doc) => run_texts(&cli, &pipeline, &[doc.as_str()]),
        None => run_texts(&cli, &pipeline, &sample_texts()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["foodie", "-t", "-d", "almond milk", "--dedupe"]);
        assert!(cli.print_tags);
        assert_eq!(cli.doc.as_deref(), Some("almond milk"));
        assert_eq!(cli.config().emission, EmissionPolicy::SkipConsumed);
        assert_eq!(cli.config().not_allowed_match, TagMatch::All);
    }

    #[test]
    fn test_cli_doc_conflicts_with_annotated() {
        let result = Cli::try_parse_from(["foodie", "-d", "milk", "-a", "docs.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["foodie"]);
        assert!(!cli.print_tags && !cli.json);
        assert_eq!(cli.config(), ExtractorConfig::default());
    }

    #[test]
    fn test_annotated_input_shapes() {
        let one = r#"[{"index":0,"text":"milk","lemma":"milk","pos":"NOUN","tags":["F1"]}]"#;
        let many = format!("[{}]", one);
        assert!(matches!(serde_json::from_str::<AnnotatedInput>(one).unwrap(), AnnotatedInput::One(_)));
        assert!(matches!(serde_json::from_str::<AnnotatedInput>(&many).unwrap(), AnnotatedInput::Many(d) if d.len() == 1));
    }
}
