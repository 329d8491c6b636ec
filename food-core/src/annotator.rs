//! # Anotador — Classes Gramaticais e Tags Semânticas
//!
//! O motor de regras não sabe de onde vêm as anotações: ele recebe um
//! [`AnnotatedDocument`] pronto. O trait [`Annotator`] é a fronteira com
//! quem produz essas anotações (um tagger externo, um serviço, um arquivo).
//!
//! [`LexiconAnnotator`] é a implementação incluída: um tagger por dicionário,
//! no mesmo espírito dos gazetteers do motor de regras. Cada forma de
//! superfície (em minúsculas) aponta para lema, classe gramatical e tags.
//!
//! ## Formato do léxico (TSV)
//!
//! ```text
//! # forma    lema    POS    tags
//! milk       milk    NOUN   F1
//! bowl       bowl    NOUN   O2 AG.01.u
//! ```
//!
//! ## Ordem de busca
//!
//! 1. Forma exata.
//! 2. Plural regular (`-ies` → `-y`, `-es`, `-s`), apenas para entradas `NOUN`.
//! 3. Pontuação → `PUNCT`; números → `NUM`.
//! 4. Caso contrário → `X` com a tag `Z99` (palavra não reconhecida).

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::document::{AnnotatedDocument, DocumentError};
use crate::semtag::{PartOfSpeech, TagSet};
use crate::tokenizer::tokenize;

/// Léxico embutido, cobre o corpus de exemplo
const BUILTIN_LEXICON: &str = include_str!("../data/lexicon.tsv");

/// Tag atribuída a palavras fora do léxico
pub const UNMATCHED_TAG: &str = "Z99";

/// Falhas ao obter anotações.
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("falha ao ler o léxico: {0}")]
    Io(#[from] std::io::Error),
    #[error("léxico malformado na linha {line}: {reason}")]
    MalformedLexicon { line: usize, reason: String },
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Produz um documento anotado a partir de texto limpo.
pub trait Annotator: Send + Sync {
    fn annotate(&self, text: &str) -> Result<AnnotatedDocument, AnnotationError>;
}

/// Uma entrada do léxico
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconEntry {
    pub lemma: String,
    pub pos: PartOfSpeech,
    pub tags: TagSet,
}

/// Tagger por dicionário.
#[derive(Debug, Clone, Default)]
pub struct LexiconAnnotator {
    entries: HashMap<String, LexiconEntry>,
}

impl LexiconAnnotator {
    /// Anotador com o léxico embutido.
    pub fn builtin() -> Result<Self, AnnotationError> {
        Self::from_tsv(BUILTIN_LEXICON)
    }

    /// Carrega um léxico TSV de um arquivo.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AnnotationError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_tsv(&content)
    }

    /// Parseia um léxico TSV (`forma\tlema\tPOS\ttags`).
    pub fn from_tsv(content: &str) -> Result<Self, AnnotationError> {
        let mut annotator = Self::default();
        for (i, raw) in content.lines().enumerate() {
            let line = raw.trim_end();
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 3 || fields.len() > 4 {
                return Err(AnnotationError::MalformedLexicon {
                    line: i + 1,
                    reason: format!("esperados 3 ou 4 campos, encontrados {}", fields.len()),
                });
            }
            let form = fields[0].trim();
            if form.is_empty() {
                return Err(AnnotationError::MalformedLexicon {
                    line: i + 1,
                    reason: "forma vazia".to_string(),
                });
            }
            let tags: TagSet = fields
                .get(3)
                .map(|t| t.split_whitespace().collect())
                .unwrap_or_default();
            annotator.insert(
                form,
                LexiconEntry {
                    lemma: fields[1].trim().to_string(),
                    pos: PartOfSpeech::from_label(fields[2].trim()),
                    tags,
                },
            );
        }
        debug!(entries = annotator.len(), "léxico carregado");
        Ok(annotator)
    }

    pub fn insert(&mut self, form: &str, entry: LexiconEntry) {
        self.entries.insert(form.to_lowercase(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Busca a entrada de uma forma de superfície (ver ordem de busca no módulo).
    pub fn lookup(&self, word: &str) -> LexiconEntry {
        let lower = word.to_lowercase();
        if let Some(entry) = self.entries.get(&lower) {
            return entry.clone();
        }
        if let Some(entry) = self.lookup_plural(&lower) {
            return entry;
        }
        fallback_entry(word)
    }

    fn lookup_plural(&self, lower: &str) -> Option<LexiconEntry> {
        let mut candidates = Vec::new();
        if let Some(stem) = lower.strip_suffix("ies") {
            candidates.push(format!("{}y", stem));
        }
        if let Some(stem) = lower.strip_suffix("es") {
            candidates.push(stem.to_string());
        }
        if let Some(stem) = lower.strip_suffix('s') {
            candidates.push(stem.to_string());
        }
        candidates
            .iter()
            .filter(|c| !c.is_empty())
            .filter_map(|c| self.entries.get(c))
            .find(|e| e.pos == PartOfSpeech::Noun)
            .cloned()
    }
}

/// Entrada para palavras fora do léxico
fn fallback_entry(word: &str) -> LexiconEntry {
    let pos = if word.chars().all(|c| c.is_ascii_punctuation() || (!c.is_alphanumeric() && !c.is_whitespace())) {
        PartOfSpeech::Punct
    } else if word.chars().all(|c| c.is_numeric() || c == '.' || c == ',') {
        PartOfSpeech::Num
    } else {
        PartOfSpeech::X
    };
    let tags = if pos == PartOfSpeech::X {
        [UNMATCHED_TAG].into_iter().collect()
    } else {
        TagSet::new()
    };
    LexiconEntry {
        lemma: word.to_lowercase(),
        pos,
        tags,
    }
}

impl Annotator for LexiconAnnotator {
    fn annotate(&self, text: &str) -> Result<AnnotatedDocument, AnnotationError> {
        let parts = tokenize(text).into_iter().map(|token| {
            let entry = self.lookup(&token.text);
            (token.text, entry.lemma, entry.pos, entry.tags)
        });
        Ok(AnnotatedDocument::from_parts(parts))
    }
}
