//! # food-core — Extração de Entidades de Alimentos por Regras (FoodIE)
//!
//! Este crate encontra menções a alimentos em textos curtos e informais
//! (ex: posts sobre substituições em receitas) raciocinando sobre anotações
//! linguísticas, sem nenhum modelo estatístico.
//!
//! ## Arquitetura do Sistema
//!
//! 1.  **Entrada**: Texto bruto (String).
//! 2.  **Limpeza** ([`clean`]): hashtags, aspas e transliteração para ASCII.
//! 3.  **Anotação** ([`annotator`]): tokens com lema, classe gramatical e tags semânticas.
//! 4.  **Regras** ([`rules`]): quatro flags por token (comida, objeto genérico, cor, proibido).
//! 5.  **Extração** ([`extractor`]): encadeamento de vizinhos e validação dos spans.
//! 6.  **Saída**: Lista de strings, uma por token de comida, na ordem do documento.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use food_core::{extract_food_entities, AnnotatedDocument, PartOfSpeech, TagSet};
//!
//! let doc = AnnotatedDocument::from_parts(vec![
//!     ("red".to_string(), "red".to_string(), PartOfSpeech::Adj, ["O4.3"].into_iter().collect::<TagSet>()),
//!     ("apple".to_string(), "apple".to_string(), PartOfSpeech::Noun, ["F1"].into_iter().collect::<TagSet>()),
//! ]);
//!
//! assert_eq!(extract_food_entities(&doc), vec!["red apple"]);
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: Orquestrador que conecta todos os estágios.
//! - [`document`]: Modelo de dados de entrada (tokens anotados).
//! - [`corpus`]: Posts de exemplo.

pub mod annotator;
pub mod clean;
pub mod corpus;
pub mod document;
pub mod extractor;
pub mod pipeline;
pub mod rules;
pub mod semtag;
pub mod tokenizer;

pub use annotator::{AnnotationError, Annotator, LexiconAnnotator};
pub use document::{AnnotatedDocument, AnnotatedToken, DocumentError};
pub use extractor::{
    extract, extract_food_entities, EmissionPolicy, EntityKind, Extraction, ExtractorConfig, FoodEntity,
};
pub use pipeline::{Analysis, FoodPipeline, PipelineEvent};
pub use rules::{TagMatch, TokenFlags};
pub use semtag::{PartOfSpeech, SemanticTag, TagSet};
