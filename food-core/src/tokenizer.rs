//! # Tokenizador para Inglês Informal
//!
//! Divide o texto limpo em tokens (palavras e pontuação) para o anotador.
//! Cada token preserva sua posição original no texto (offset em bytes).
//!
//! ## Esquema de Tokenização
//!
//! - Fronteiras de palavra do UAX #29 (`unicode-segmentation`): `stir-fry`
//!   vira `stir`, `-`, `fry`; `1.5` continua um único token.
//! - Espaços em branco são descartados.
//! - Clíticos do inglês são separados da palavra: `it's` → `it`, `'s`;
//!   `don't` → `do`, `n't`.
//!
//! ```rust
//! use food_core::tokenizer::tokenize;
//!
//! let tokens = tokenize("it's a game-changer!");
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, vec!["it", "'s", "a", "game", "-", "changer", "!"]);
//! ```

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Um token extraído do texto original.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// O texto do token (ex: "milk", ",", "'s").
    pub text: String,
    /// Índice de byte inicial no texto original (inclusive).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
}

/// Clíticos separados do final da palavra (comparação sem caixa)
const CLITICS: &[&str] = &["n't", "'s", "'re", "'ve", "'ll", "'d", "'m"];

/// Tokeniza um texto.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    for (start, word) in text.split_word_bound_indices() {
        if word.chars().all(char::is_whitespace) {
            continue;
        }
        match split_clitic(word) {
            Some(split_at) => {
                push_token(&mut tokens, &word[..split_at], start);
                push_token(&mut tokens, &word[split_at..], start + split_at);
            }
            None => push_token(&mut tokens, word, start),
        }
    }

    // Re-indexa os tokens
    for (i, token) in tokens.iter_mut().enumerate() {
        token.index = i;
    }
    tokens
}

/// Posição (em bytes) onde o clítico começa, se a palavra terminar com um.
fn split_clitic(word: &str) -> Option<usize> {
    let lower = word.to_lowercase();
    if lower.len() != word.len() {
        // Mudança de tamanho na conversão: offsets deixariam de bater
        return None;
    }
    CLITICS.iter().find_map(|clitic| {
        let split_at = word.len().checked_sub(clitic.len())?;
        (lower.ends_with(clitic) && split_at > 0 && word.is_char_boundary(split_at)).then_some(split_at)
    })
}

fn push_token(tokens: &mut Vec<Token>, text: &str, start: usize) {
    tokens.push(Token {
        text: text.to_string(),
        start,
        end: start + text.len(),
        index: 0, // será atribuído depois
    });
}
