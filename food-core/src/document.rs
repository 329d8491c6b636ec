//! # Documento Anotado
//!
//! Estrutura de dados entregue pelo anotador externo: uma sequência ordenada
//! de tokens, cada um com texto, lema, classe gramatical e tags semânticas.
//!
//! O documento é **imutável** depois de construído. O motor de regras e o
//! extrator nunca escrevem nos tokens; eles produzem registros próprios
//! alinhados pelo índice (ver [`crate::rules::TokenFlags`]).
//!
//! ## Formato JSON
//!
//! ```json
//! [
//!   {"index": 0, "text": "almond", "lemma": "almond", "pos": "ADJ", "tags": []},
//!   {"index": 1, "text": "milk", "lemma": "milk", "pos": "NOUN", "tags": ["F1"]}
//! ]
//! ```

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::semtag::{PartOfSpeech, TagSet};

/// Um token com suas anotações linguísticas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedToken {
    /// Posição no documento (0, 1, 2...).
    pub index: usize,
    /// Forma de superfície (ex: "bananas").
    pub text: String,
    /// Forma base (ex: "banana").
    pub lemma: String,
    pub pos: PartOfSpeech,
    /// Tags semânticas; ausente no JSON equivale a conjunto vazio.
    #[serde(default)]
    pub tags: TagSet,
}

impl AnnotatedToken {
    pub fn new(index: usize, text: &str, lemma: &str, pos: PartOfSpeech, tags: TagSet) -> Self {
        Self {
            index,
            text: text.to_string(),
            lemma: lemma.to_string(),
            pos,
            tags,
        }
    }
}

/// Falha ao montar um documento a partir de tokens externos.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("token na posição {position} tem índice {found}; esperado {position}")]
    NonContiguousIndex { position: usize, found: usize },
}

/// Sequência ordenada de tokens com índices contíguos a partir de zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AnnotatedToken>", into = "Vec<AnnotatedToken>")]
pub struct AnnotatedDocument {
    tokens: Vec<AnnotatedToken>,
}

impl AnnotatedDocument {
    /// Valida que `tokens[i].index == i` para todo token.
    pub fn new(tokens: Vec<AnnotatedToken>) -> Result<Self, DocumentError> {
        for (position, token) in tokens.iter().enumerate() {
            if token.index != position {
                return Err(DocumentError::NonContiguousIndex {
                    position,
                    found: token.index,
                });
            }
        }
        Ok(Self { tokens })
    }

    /// Monta o documento atribuindo os índices na ordem recebida.
    pub fn from_parts<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = (String, String, PartOfSpeech, TagSet)>,
    {
        let tokens = parts
            .into_iter()
            .enumerate()
            .map(|(index, (text, lemma, pos, tags))| AnnotatedToken {
                index,
                text,
                lemma,
                pos,
                tags,
            })
            .collect();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[AnnotatedToken] {
        &self.tokens
    }

    pub fn get(&self, index: usize) -> Option<&AnnotatedToken> {
        self.tokens.get(index)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Texto dos tokens unidos por espaço
    pub fn text(&self) -> String {
        self.join(0..self.tokens.len())
    }

    /// Texto de superfície dos tokens indicados, unidos por espaço, na ordem dada.
    pub fn join(&self, indices: impl IntoIterator<Item = usize>) -> String {
        indices
            .into_iter()
            .filter_map(|i| self.tokens.get(i))
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Dump de diagnóstico separado por tabulações: `Text / Lemma / POS / USAS Tags`.
    ///
    /// Útil para entender por que uma regra disparou (ou não) em um token.
    pub fn diagnostic_dump(&self) -> String {
        let mut out = String::from("Text\tLemma\tPOS\tUSAS Tags\n");
        for token in &self.tokens {
            let _ = writeln!(out, "{}\t{}\t{}\t{}", token.text, token.lemma, token.pos, token.tags);
        }
        out
    }
}

impl TryFrom<Vec<AnnotatedToken>> for AnnotatedDocument {
    type Error = DocumentError;

    fn try_from(tokens: Vec<AnnotatedToken>) -> Result<Self, Self::Error> {
        Self::new(tokens)
    }
}

impl From<AnnotatedDocument> for Vec<AnnotatedToken> {
    fn from(doc: AnnotatedDocument) -> Self {
        doc.tokens
    }
}
