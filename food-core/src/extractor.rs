//! # Extrator de Entidades — Encadeamento e Validação de Spans
//!
//! Percorre o documento da esquerda para a direita. Cada token marcado como
//! comida vira a **raiz** de uma tentativa de span:
//!
//! ```text
//! span = cadeia_esquerda(i) ++ [i] ++ cadeia_direita(i)
//! ```
//!
//! - **Cadeia à esquerda**: absorve vizinhos `NOUN`/`PROPN`/`ADJ` ainda não
//!   consumidos, parando no primeiro que falhar.
//! - **Cadeia à direita**: igual, mas também absorve objetos genéricos e cores
//!   de qualquer classe gramatical.
//! - **Validação**: rejeita spans vazios e spans cujo último token é um
//!   substantivo-objeto genérico ou um token proibido.
//!
//! Um span válido emite seu texto; um inválido emite só o texto da raiz.
//!
//! ## Estado de consumo
//!
//! Cada token absorvido por uma cadeia é marcado como consumido e nunca volta a
//! participar de outra cadeia na mesma passada. A raiz não é marcada: se a
//! cadeia à direita parar logo depois dela, a raiz seguinte ainda pode
//! absorvê-la pela esquerda. O vetor de consumo pertence à passada
//! ([`Extractor`]) e é descartado no fim; o documento continua imutável.
//!
//! Uma raiz que já foi consumida por um span anterior ainda gera uma entrada:
//! sua tentativa dá span vazio e cai no fallback do próprio texto
//! (ver [`EmissionPolicy`]).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::AnnotatedDocument;
use crate::rules::{apply_rules, RuleConfig, TagMatch, TokenFlags};
use crate::semtag::PartOfSpeech;

/// O que fazer com raízes de comida já consumidas por um span anterior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionPolicy {
    /// Uma entrada por token de comida; raízes consumidas reaparecem sozinhas.
    #[default]
    EveryFoodToken,
    /// Raízes já consumidas não geram entrada.
    SkipConsumed,
}

/// Configuração completa de uma extração.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub not_allowed_match: TagMatch,
    #[serde(default)]
    pub emission: EmissionPolicy,
}

impl ExtractorConfig {
    pub fn rules(&self) -> RuleConfig {
        RuleConfig {
            not_allowed_match: self.not_allowed_match,
        }
    }
}

/// Motivo pelo qual um span foi rejeitado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// A raiz já estava consumida
    EmptySpan,
    /// Último token é substantivo e objeto genérico (ex: "rice bowl")
    GeneralObjectHead,
    /// Último token tem a flag `not_allowed`
    NotAllowedHead,
    /// Índice fora do documento
    OutOfRange,
}

/// Uma tentativa de construção de span a partir de uma raiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainAttempt {
    pub root: usize,
    /// Índices dos tokens do span, em ordem
    pub span: Vec<usize>,
    pub rejection: Option<Rejection>,
}

impl ChainAttempt {
    pub fn is_valid(&self) -> bool {
        self.rejection.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Span validado (um ou mais tokens)
    Span,
    /// Span rejeitado; apenas o texto da raiz
    Fallback,
}

/// Uma entidade de alimento extraída.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodEntity {
    pub text: String,
    /// Token de comida que originou a entidade
    pub root: usize,
    /// Índice do primeiro token (inclusivo)
    pub start_token: usize,
    /// Índice do último token (inclusivo)
    pub end_token: usize,
    pub kind: EntityKind,
}

/// Resultado completo de uma passada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub flags: Vec<TokenFlags>,
    pub attempts: Vec<ChainAttempt>,
    pub entities: Vec<FoodEntity>,
}

impl Extraction {
    /// Lista de strings na ordem do documento
    pub fn texts(&self) -> Vec<String> {
        self.entities.iter().map(|e| e.text.clone()).collect()
    }
}

/// Uma passada de extração sobre um documento.
///
/// As flags são calculadas antes de qualquer encadeamento; o vetor `consumed`
/// começa todo falso e só muda de falso para verdadeiro.
pub struct Extractor<'a> {
    doc: &'a AnnotatedDocument,
    flags: Vec<TokenFlags>,
    consumed: Vec<bool>,
}

impl<'a> Extractor<'a> {
    pub fn new(doc: &'a AnnotatedDocument, rules: &RuleConfig) -> Self {
        let flags = apply_rules(doc, rules);
        Self::with_flags(doc, flags)
    }

    /// Usa flags já calculadas por [`apply_rules`] sobre o mesmo documento.
    pub(crate) fn with_flags(doc: &'a AnnotatedDocument, flags: Vec<TokenFlags>) -> Self {
        debug_assert_eq!(doc.len(), flags.len());
        Self {
            doc,
            flags,
            consumed: vec![false; doc.len()],
        }
    }

    pub fn flags(&self) -> &[TokenFlags] {
        &self.flags
    }

    pub fn is_consumed(&self, index: usize) -> bool {
        self.consumed.get(index).copied().unwrap_or(false)
    }

    fn pos(&self, index: usize) -> PartOfSpeech {
        self.doc.tokens()[index].pos
    }

    /// Pode entrar em qualquer cadeia: classe encadeável e ainda livre.
    fn joins_chain(&self, index: usize) -> bool {
        self.pos(index).is_chainable() && !self.consumed[index]
    }

    /// Pode estender à direita mesmo sem classe encadeável.
    fn extends_right(&self, index: usize) -> bool {
        let flags = &self.flags[index];
        (flags.general_object || flags.color) && !self.consumed[index]
    }

    /// Absorve vizinhos à esquerda de `root`, retornando-os da esquerda para a direita.
    pub fn chain_left(&mut self, root: usize) -> Vec<usize> {
        let mut chunk = Vec::new();
        if root >= self.doc.len() {
            return chunk;
        }
        for j in (0..root).rev() {
            if !self.joins_chain(j) {
                break;
            }
            self.consumed[j] = true;
            chunk.push(j);
        }
        chunk.reverse();
        chunk
    }

    /// Absorve vizinhos à direita de `root`.
    pub fn chain_right(&mut self, root: usize) -> Vec<usize> {
        let mut chunk = Vec::new();
        for j in root.saturating_add(1)..self.doc.len() {
            if !(self.joins_chain(j) || self.extends_right(j)) {
                break;
            }
            self.consumed[j] = true;
            chunk.push(j);
        }
        chunk
    }

    /// Constrói o span enraizado em `root`; vazio se a raiz já foi consumida.
    pub fn build_span(&mut self, root: usize) -> Vec<usize> {
        if self.consumed.get(root).copied().unwrap_or(true) {
            return Vec::new();
        }
        let mut span = self.chain_left(root);
        span.push(root);
        span.extend(self.chain_right(root));
        span
    }

    /// Motivo de rejeição do span, se houver.
    pub fn check_span(&self, span: &[usize]) -> Option<Rejection> {
        let Some(&last) = span.last() else {
            return Some(Rejection::EmptySpan);
        };
        let Some(flags) = self.flags.get(last) else {
            return Some(Rejection::OutOfRange);
        };
        if self.pos(last) == PartOfSpeech::Noun && flags.general_object {
            return Some(Rejection::GeneralObjectHead);
        }
        if flags.not_allowed {
            return Some(Rejection::NotAllowedHead);
        }
        None
    }

    pub fn validate(&self, span: &[usize]) -> bool {
        self.check_span(span).is_none()
    }

    /// Executa a passada completa e consome o extrator.
    pub fn run(mut self, emission: EmissionPolicy) -> Extraction {
        let mut attempts = Vec::new();
        let mut entities = Vec::new();

        for root in 0..self.doc.len() {
            if !self.flags[root].food {
                continue;
            }
            if emission == EmissionPolicy::SkipConsumed && self.consumed[root] {
                continue;
            }

            let span = self.build_span(root);
            let rejection = self.check_span(&span);
            debug!(root, span = ?span, rejection = ?rejection, "tentativa de span");

            let entity = match (rejection, span.first(), span.last()) {
                (None, Some(&start), Some(&end)) => FoodEntity {
                    text: self.doc.join(span.iter().copied()),
                    root,
                    start_token: start,
                    end_token: end,
                    kind: EntityKind::Span,
                },
                _ => FoodEntity {
                    text: self.doc.tokens()[root].text.clone(),
                    root,
                    start_token: root,
                    end_token: root,
                    kind: EntityKind::Fallback,
                },
            };

            entities.push(entity);
            attempts.push(ChainAttempt { root, span, rejection });
        }

        Extraction {
            flags: self.flags,
            attempts,
            entities,
        }
    }
}

/// Extrai entidades com a configuração informada.
pub fn extract(doc: &AnnotatedDocument, config: &ExtractorConfig) -> Extraction {
    Extractor::new(doc, &config.rules()).run(config.emission)
}

/// Atalho com a configuração padrão, retornando só as strings.
pub fn extract_food_entities(doc: &AnnotatedDocument) -> Vec<String> {
    extract(doc, &ExtractorConfig::default()).texts()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semtag::TagSet;
    use proptest::prelude::*;

    const P_NOUN: PartOfSpeech = PartOfSpeech::Noun;
    const P_ADJ: PartOfSpeech = PartOfSpeech::Adj;
    const P_VERB: PartOfSpeech = PartOfSpeech::Verb;
    const P_DET: PartOfSpeech = PartOfSpeech::Det;

    fn doc(parts: &[(&str, PartOfSpeech, &[&str])]) -> AnnotatedDocument {
        AnnotatedDocument::from_parts(parts.iter().map(|(text, pos, tags)| {
            (
                text.to_string(),
                text.to_string(),
                *pos,
                tags.iter().copied().collect::<TagSet>(),
            )
        }))
    }

    const PAN_TAGS: &[&str] = &["AG.01.t.08", "AG.01.u", "AH.02", "O4.6", "N3"];

    #[test]
    fn test_almond_milk() {
        let d = doc(&[("almond", P_ADJ, &[]), ("milk", P_NOUN, &["F1"])]);
        assert_eq!(extract_food_entities(&d), vec!["almond milk"]);
    }

    #[test]
    fn test_not_allowed_head_falls_back_to_root() {
        let d = doc(&[("zucchini", P_NOUN, &["F2"]), ("pan", P_NOUN, PAN_TAGS)]);
        let result = extract(&d, &ExtractorConfig::default());
        assert_eq!(result.texts(), vec!["zucchini"]);
        assert_eq!(result.attempts[0].span, vec![0, 1]);
        assert_eq!(result.attempts[0].rejection, Some(Rejection::NotAllowedHead));
        assert_eq!(result.entities[0].kind, EntityKind::Fallback);
    }

    #[test]
    fn test_color_adjective_on_left() {
        let d = doc(&[("red", P_ADJ, &["O4.3"]), ("apple", P_NOUN, &["F1"])]);
        assert_eq!(extract_food_entities(&d), vec!["red apple"]);
    }

    #[test]
    fn test_duplicate_emission() {
        let d = doc(&[("rice", P_NOUN, &["F1"]), ("rice", P_NOUN, &["F1"])]);
        let result = extract(&d, &ExtractorConfig::default());
        assert_eq!(result.texts(), vec!["rice rice", "rice"]);
        assert_eq!(result.attempts[1].span, Vec::<usize>::new());
        assert_eq!(result.attempts[1].rejection, Some(Rejection::EmptySpan));
    }

    #[test]
    fn test_skip_consumed_policy() {
        let d = doc(&[("rice", P_NOUN, &["F1"]), ("rice", P_NOUN, &["F1"])]);
        let config = ExtractorConfig {
            emission: EmissionPolicy::SkipConsumed,
            ..Default::default()
        };
        assert_eq!(extract(&d, &config).texts(), vec!["rice rice"]);
    }

    #[test]
    fn test_left_chain_stops_at_non_chainable() {
        // "fresh" nunca é alcançado porque "the" interrompe a cadeia
        let d = doc(&[
            ("fresh", P_ADJ, &[]),
            ("the", P_DET, &[]),
            ("green", P_ADJ, &[]),
            ("beans", P_NOUN, &["F1"]),
        ]);
        let mut ex = Extractor::new(&d, &RuleConfig::default());
        assert_eq!(ex.chain_left(3), vec![2]);
        assert!(!ex.is_consumed(0));
        assert!(ex.is_consumed(2));
    }

    #[test]
    fn test_left_chain_stops_at_consumed() {
        let d = doc(&[("sweet", P_ADJ, &[]), ("corn", P_NOUN, &["F1"])]);
        let mut ex = Extractor::new(&d, &RuleConfig::default());
        assert_eq!(ex.chain_left(1), vec![0]);
        assert_eq!(ex.chain_left(1), Vec::<usize>::new());
    }

    #[test]
    fn test_later_root_absorbs_earlier_root_from_the_left() {
        // "boils" é comida mas não encadeável: a cadeia de "milk" para nele
        let d = doc(&[("milk", P_NOUN, &["F1"]), ("boils", P_VERB, &["F1"])]);
        let result = extract(&d, &ExtractorConfig::default());
        assert_eq!(result.texts(), vec!["milk", "milk boils"]);
        assert_eq!(result.attempts[0].span, vec![0]);
        assert_eq!(result.attempts[1].span, vec![0, 1]);
    }

    #[test]
    fn test_root_is_not_marked_consumed() {
        let d = doc(&[("milk", P_NOUN, &["F1"])]);
        let mut ex = Extractor::new(&d, &RuleConfig::default());
        assert_eq!(ex.build_span(0), vec![0]);
        assert!(!ex.is_consumed(0));
    }

    #[test]
    fn test_out_of_range_root() {
        let d = doc(&[("milk", P_NOUN, &["F1"])]);
        let mut ex = Extractor::new(&d, &RuleConfig::default());
        assert!(ex.chain_left(5).is_empty());
        assert!(ex.chain_right(usize::MAX).is_empty());
        assert!(ex.build_span(3).is_empty());
        assert_eq!(ex.check_span(&[7]), Some(Rejection::OutOfRange));
    }

    #[test]
    fn test_right_chain_absorbs_color_and_object_of_any_pos() {
        let d = doc(&[
            ("soup", P_NOUN, &["F1"]),
            ("reddish", P_VERB, &["O4.3"]),
            ("thing", P_VERB, &["O2"]),
            ("boils", P_VERB, &[]),
        ]);
        let mut ex = Extractor::new(&d, &RuleConfig::default());
        assert_eq!(ex.chain_right(0), vec![1, 2]);
        assert!(!ex.is_consumed(3));
    }

    #[test]
    fn test_general_object_noun_head_rejected() {
        let d = doc(&[("burrito", P_NOUN, &["F1"]), ("bowl", P_NOUN, &["O2"])]);
        let result = extract(&d, &ExtractorConfig::default());
        assert_eq!(result.texts(), vec!["burrito"]);
        assert_eq!(result.attempts[0].rejection, Some(Rejection::GeneralObjectHead));
    }

    #[test]
    fn test_general_object_non_noun_head_accepted() {
        let d = doc(&[("cake", P_NOUN, &["F1"]), ("stuff", P_VERB, &["O2"])]);
        assert_eq!(extract_food_entities(&d), vec!["cake stuff"]);
    }

    #[test]
    fn test_not_allowed_any_mode() {
        let d = doc(&[("soup", P_NOUN, &["F1"]), ("pot", P_NOUN, &["AG.01.u"])]);
        assert_eq!(extract_food_entities(&d), vec!["soup pot"]);
        let config = ExtractorConfig {
            not_allowed_match: TagMatch::Any,
            ..Default::default()
        };
        assert_eq!(extract(&d, &config).texts(), vec!["soup"]);
    }

    #[test]
    fn test_non_food_tokens_emit_nothing() {
        let d = doc(&[("the", P_DET, &[]), ("pan", P_NOUN, &["O2"])]);
        let result = extract(&d, &ExtractorConfig::default());
        assert!(result.entities.is_empty());
        assert!(result.attempts.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let d = AnnotatedDocument::default();
        assert!(extract_food_entities(&d).is_empty());
    }

    #[test]
    fn test_validate_empty_span() {
        let d = doc(&[("milk", P_NOUN, &["F1"])]);
        let ex = Extractor::new(&d, &RuleConfig::default());
        assert!(!ex.validate(&[]));
        assert!(ex.validate(&[0]));
    }

    #[test]
    fn test_entity_token_range() {
        let d = doc(&[
            ("Greek", P_ADJ, &["Z2"]),
            ("yogurt", P_NOUN, &["F1"]),
            ("instead", P_VERB, &[]),
        ]);
        let result = extract(&d, &ExtractorConfig::default());
        let e = &result.entities[0];
        assert_eq!((e.start_token, e.end_token, e.root), (0, 1, 1));
        assert_eq!(e.kind, EntityKind::Span);
    }

    const CODES: &[&str] = &["F1", "F2", "L2", "B1", "O2", "B5", "O4.3", "N5", "Z99", "N3"];
    const POS: &[PartOfSpeech] = &[P_NOUN, P_ADJ, PartOfSpeech::Propn, P_VERB, P_DET];

    fn arb_doc() -> impl Strategy<Value = AnnotatedDocument> {
        proptest::collection::vec(
            (0..POS.len(), proptest::collection::vec(0..CODES.len(), 0..3)),
            0..12,
        )
        .prop_map(|tokens| {
            AnnotatedDocument::from_parts(tokens.into_iter().map(|(p, codes)| {
                (
                    "w".to_string(),
                    "w".to_string(),
                    POS[p],
                    codes.into_iter().map(|c| CODES[c]).collect::<TagSet>(),
                )
            }))
        })
    }

    proptest! {
        #[test]
        fn test_deterministic(d in arb_doc()) {
            let fresh = d.clone();
            let config = ExtractorConfig::default();
            prop_assert_eq!(extract(&d, &config), extract(&fresh, &config));
        }

        #[test]
        fn test_one_entry_per_food_token(d in arb_doc()) {
            let result = extract(&d, &ExtractorConfig::default());
            let food = result.flags.iter().filter(|f| f.food).count();
            prop_assert_eq!(result.entities.len(), food);
        }

        #[test]
        fn test_spans_are_contiguous_and_absorb_each_token_once(d in arb_doc()) {
            let result = extract(&d, &ExtractorConfig::default());
            let mut absorbed = vec![false; d.len()];
            for attempt in &result.attempts {
                for pair in attempt.span.windows(2) {
                    prop_assert_eq!(pair[0] + 1, pair[1]);
                }
                if !attempt.span.is_empty() {
                    prop_assert!(attempt.span.contains(&attempt.root));
                }
                for &i in attempt.span.iter().filter(|&&i| i != attempt.root) {
                    prop_assert!(!absorbed[i]);
                    absorbed[i] = true;
                }
            }
        }
    }
}
