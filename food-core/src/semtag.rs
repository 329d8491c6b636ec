//! # Tags Semânticas e Classes Gramaticais
//!
//! Vocabulário controlado que chega do anotador externo para cada token:
//!
//! - **Tag semântica** (`SemanticTag`): código opaco de uma taxonomia fixa
//!   (estilo USAS), ex: `"F1"` (comida), `"O2"` (objeto genérico), `"B1"` (corpo).
//! - **Classe gramatical** (`PartOfSpeech`): tagset Universal POS.
//!
//! O motor de regras só faz testes de pertinência sobre o conjunto de tags;
//! nenhuma ordem é relevante.
//!
//! | Código | Domínio                         |
//! |--------|---------------------------------|
//! | F1–F4  | Comida, bebida, fumo, agricultura |
//! | L2, L3 | Seres vivos (animais, plantas)  |
//! | O1.x   | Substâncias                     |
//! | O2     | Objetos genéricos               |
//! | O4.3   | Cor                             |
//! | B1, B5 | Corpo, roupas                   |

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Código de uma tag semântica (ex: `"F1"`, `"AG.01.t.08"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SemanticTag(String);

impl SemanticTag {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SemanticTag {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl Borrow<str> for SemanticTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SemanticTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Conjunto de tags semânticas de um token.
///
/// Um conjunto vazio é uma entrada válida: todos os testes de pertinência falham.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeSet<SemanticTag>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: impl Into<SemanticTag>) -> bool {
        self.0.insert(tag.into())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    /// Verdadeiro se ao menos um dos códigos estiver presente
    pub fn contains_any(&self, codes: &[&str]) -> bool {
        codes.iter().any(|code| self.contains(code))
    }

    /// Verdadeiro se todos os códigos estiverem presentes
    pub fn contains_all(&self, codes: &[&str]) -> bool {
        codes.iter().all(|code| self.contains(code))
    }

    /// Verdadeiro se nenhum dos códigos estiver presente
    pub fn is_disjoint_from(&self, codes: &[&str]) -> bool {
        !self.contains_any(codes)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SemanticTag> {
        self.0.iter()
    }
}

impl<T: Into<SemanticTag>> FromIterator<T> for TagSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for TagSet {
    /// Formato de lista: `[F1, O2]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", tag)?;
        }
        f.write_str("]")
    }
}

/// Classe gramatical no tagset Universal POS.
///
/// O algoritmo de encadeamento distingue apenas `NOUN`, `PROPN` e `ADJ`;
/// as demais classes são tratadas de forma opaca.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PartOfSpeech {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    /// Classe desconhecida ou não atribuída
    X,
    Space,
}

impl PartOfSpeech {
    /// Rótulo textual (ex: "NOUN", "PROPN")
    pub fn label(&self) -> &'static str {
        match self {
            PartOfSpeech::Adj => "ADJ",
            PartOfSpeech::Adp => "ADP",
            PartOfSpeech::Adv => "ADV",
            PartOfSpeech::Aux => "AUX",
            PartOfSpeech::Cconj => "CCONJ",
            PartOfSpeech::Det => "DET",
            PartOfSpeech::Intj => "INTJ",
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::Num => "NUM",
            PartOfSpeech::Part => "PART",
            PartOfSpeech::Pron => "PRON",
            PartOfSpeech::Propn => "PROPN",
            PartOfSpeech::Punct => "PUNCT",
            PartOfSpeech::Sconj => "SCONJ",
            PartOfSpeech::Sym => "SYM",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::X => "X",
            PartOfSpeech::Space => "SPACE",
        }
    }

    /// Parseia um rótulo; qualquer rótulo fora do tagset vira `X`.
    pub fn from_label(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "ADJ" => PartOfSpeech::Adj,
            "ADP" => PartOfSpeech::Adp,
            "ADV" => PartOfSpeech::Adv,
            "AUX" => PartOfSpeech::Aux,
            "CCONJ" => PartOfSpeech::Cconj,
            "DET" => PartOfSpeech::Det,
            "INTJ" => PartOfSpeech::Intj,
            "NOUN" => PartOfSpeech::Noun,
            "NUM" => PartOfSpeech::Num,
            "PART" => PartOfSpeech::Part,
            "PRON" => PartOfSpeech::Pron,
            "PROPN" => PartOfSpeech::Propn,
            "PUNCT" => PartOfSpeech::Punct,
            "SCONJ" => PartOfSpeech::Sconj,
            "SYM" => PartOfSpeech::Sym,
            "VERB" => PartOfSpeech::Verb,
            "SPACE" => PartOfSpeech::Space,
            _ => PartOfSpeech::X,
        }
    }

    /// Substantivos, nomes próprios e adjetivos podem compor uma cadeia de alimento.
    pub fn is_chainable(&self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::Propn | PartOfSpeech::Adj)
    }
}

impl From<String> for PartOfSpeech {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<PartOfSpeech> for String {
    fn from(pos: PartOfSpeech) -> Self {
        pos.label().to_string()
    }
}

impl Default for PartOfSpeech {
    fn default() -> Self {
        PartOfSpeech::X
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
