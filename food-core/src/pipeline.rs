//! # Pipeline FoodIE — Orquestrador com Eventos Observáveis
//!
//! O pipeline coordena limpeza, anotação, regras e extração, e emite eventos
//! em cada passo via um canal Rust (`mpsc`), permitindo que o servidor
//! WebSocket transmita o progresso em tempo real para o cliente.
//!
//! ```rust
//! use food_core::FoodPipeline;
//!
//! let pipeline = FoodPipeline::new().unwrap();
//! let analysis = pipeline.analyze("Replacing dairy with almond milk!").unwrap();
//! assert!(analysis.texts().contains(&"almond milk".to_string()));
//! ```
//!
//! ## Concorrência
//!
//! Dentro de um documento a extração é estritamente sequencial (o estado de
//! consumo de um passo afeta os seguintes). Documentos diferentes não
//! compartilham estado, então [`FoodPipeline::analyze_batch`] processa cada
//! um em uma tarefa Rayon.

use std::sync::mpsc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::annotator::{AnnotationError, Annotator, LexiconAnnotator};
use crate::clean::clean_text;
use crate::document::{AnnotatedDocument, AnnotatedToken};
use crate::extractor::{ChainAttempt, Extraction, Extractor, ExtractorConfig, FoodEntity};
use crate::rules::{apply_rules, TokenFlags};

/// Eventos emitidos pelo pipeline durante o processamento.
///
/// Cada variante carrega os dados necessários para renderizar uma etapa da visualização.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PipelineEvent {
    /// **Passo 1**: Texto limpo (hashtags, aspas e acentos removidos).
    Cleaned { original: String, cleaned: String },
    /// **Passo 2**: Tokens anotados pelo anotador.
    Annotated {
        tokens: Vec<AnnotatedToken>,
        total: usize,
    },
    /// **Passo 3**: Flags das quatro regras para um token.
    FlagsComputed {
        token_index: usize,
        token_text: String,
        flags: TokenFlags,
    },
    /// **Passo 4**: Uma tentativa de span a partir de uma raiz de comida.
    ChainEvaluated {
        attempt: ChainAttempt,
        root_text: String,
        span_text: String,
    },
    /// **Conclusão**: Entidades extraídas e tempo total.
    Done {
        entities: Vec<FoodEntity>,
        total_tokens: usize,
        processing_ms: u64,
    },
    /// **Falha**: O anotador não conseguiu processar o texto.
    Error { message: String },
}

/// Resultado de uma análise de texto bruto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub original: String,
    pub cleaned: String,
    pub document: AnnotatedDocument,
    pub extraction: Extraction,
}

impl Analysis {
    pub fn texts(&self) -> Vec<String> {
        self.extraction.texts()
    }
}

/// O pipeline principal: limpeza → anotação → regras → extração.
pub struct FoodPipeline {
    annotator: Box<dyn Annotator>,
    pub config: ExtractorConfig,
}

impl FoodPipeline {
    /// Cria o pipeline com o léxico embutido e a configuração padrão.
    pub fn new() -> Result<Self, AnnotationError> {
        Ok(Self::with_annotator(LexiconAnnotator::builtin()?))
    }

    pub fn with_annotator(annotator: impl Annotator + 'static) -> Self {
        Self {
            annotator: Box::new(annotator),
            config: ExtractorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    /// Extrai entidades de um documento já anotado (sem limpeza nem anotação).
    pub fn analyze_document(&self, doc: &AnnotatedDocument) -> Extraction {
        crate::extractor::extract(doc, &self.config)
    }

    /// Processa o texto de forma síncrona e retorna o resultado final.
    pub fn analyze(&self, text: &str) -> Result<Analysis, AnnotationError> {
        let cleaned = clean_text(text);
        let document = self.annotator.annotate(&cleaned)?;
        let extraction = self.analyze_document(&document);
        info!(
            tokens = document.len(),
            entities = extraction.entities.len(),
            "documento analisado"
        );
        Ok(Analysis {
            original: text.to_string(),
            cleaned,
            document,
            extraction,
        })
    }

    /// Processa vários textos em paralelo; a ordem de saída é a de entrada.
    pub fn analyze_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<Result<Analysis, AnnotationError>> {
        texts.par_iter().map(|t| self.analyze(t.as_ref())).collect()
    }

    /// Executa o pipeline enviando eventos de progresso em tempo real.
    ///
    /// # Fluxo de Eventos
    /// 1. `Cleaned`
    /// 2. `Annotated` (ou `Error`, encerrando o fluxo)
    /// 3. `FlagsComputed` (um por token)
    /// 4. `ChainEvaluated` (um por token de comida)
    /// 5. `Done`
    pub fn analyze_streaming(&self, text: &str, tx: mpsc::Sender<PipelineEvent>) {
        let start = Instant::now();

        // === Passo 1: Limpeza ===
        let cleaned = clean_text(text);
        let _ = tx.send(PipelineEvent::Cleaned {
            original: text.to_string(),
            cleaned: cleaned.clone(),
        });

        // === Passo 2: Anotação ===
        let document = match self.annotator.annotate(&cleaned) {
            Ok(doc) => doc,
            Err(err) => {
                let _ = tx.send(PipelineEvent::Error {
                    message: err.to_string(),
                });
                return;
            }
        };
        let _ = tx.send(PipelineEvent::Annotated {
            tokens: document.tokens().to_vec(),
            total: document.len(),
        });

        // === Passo 3: Regras ===
        let flags = apply_rules(&document, &self.config.rules());
        for (token, token_flags) in document.tokens().iter().zip(&flags) {
            let _ = tx.send(PipelineEvent::FlagsComputed {
                token_index: token.index,
                token_text: token.text.clone(),
                flags: *token_flags,
            });
        }

        // === Passo 4: Encadeamento e validação ===
        let extraction = Extractor::with_flags(&document, flags).run(self.config.emission);
        for attempt in &extraction.attempts {
            let _ = tx.send(PipelineEvent::ChainEvaluated {
                root_text: document.tokens()[attempt.root].text.clone(),
                span_text: document.join(attempt.span.iter().copied()),
                attempt: attempt.clone(),
            });
        }

        let _ = tx.send(PipelineEvent::Done {
            entities: extraction.entities,
            total_tokens: document.len(),
            processing_ms: start.elapsed().as_millis() as u64,
        });
    }
}
