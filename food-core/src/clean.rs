//! # Limpeza de Texto
//!
//! Normalização aplicada aos posts antes da anotação:
//!
//! 1. Remove hashtags (`#HealthyBaking`) e o espaço que as segue.
//! 2. Remove aspas duplas (`"`, `“`, `”`).
//! 3. Remove aspas simples que não estão dentro de uma palavra
//!   (`'oil'` → `oil`, mas `it's` fica intacto).
//! 4. Colapsa espaços em branco.
//! 5. Translitera para ASCII (`coÜld` → `coUld`, `jalapeño` → `jalapeno`).

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

fn hashtag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#\w+\s*").expect("regex de hashtag válida"))
}

fn double_quote_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"["“”]"#).expect("regex de aspas válida"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("regex de espaços válida"))
}

/// Limpa um post e translitera para ASCII.
pub fn clean_text(post: &str) -> String {
    let without_hashtags = hashtag_re().replace_all(post, "");
    let without_quotes = double_quote_re().replace_all(&without_hashtags, "");
    let without_single = strip_loose_single_quotes(&without_quotes);
    let collapsed = whitespace_re().replace_all(&without_single, " ");
    transliterate(collapsed.trim())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Mantém `'` apenas quando está entre dois caracteres de palavra.
fn strip_loose_single_quotes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '\'' {
            let prev_word = i > 0 && is_word_char(chars[i - 1]);
            let next_word = chars.get(i + 1).map(|&n| is_word_char(n)).unwrap_or(false);
            if !(prev_word && next_word) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Letras e pontuação sem decomposição canônica para ASCII
fn ascii_fallback(c: char) -> Option<&'static str> {
    let s = match c {
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "AE",
        'ø' => "o",
        'Ø' => "O",
        'œ' => "oe",
        'Œ' => "OE",
        'ł' => "l",
        'Ł' => "L",
        'đ' => "d",
        'Đ' => "D",
        'þ' => "th",
        'Þ' => "Th",
        '‘' | '’' | '′' => "'",
        '–' | '—' | '‐' | '−' => "-",
        '…' => "...",
        '\u{00a0}' => " ",
        _ => return None,
    };
    Some(s)
}

/// Decomposição NFKD sem marcas combinantes; o que sobrar fora do ASCII é descartado.
///
/// Não há romanização: caracteres sem decomposição (ex: `米`) somem em vez de
/// virarem uma transcrição como `Mi`.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else if let Some(s) = ascii_fallback(c) {
            out.push_str(s);
        } else {
            out.extend(
                std::iter::once(c)
                    .nfkd()
                    .filter(|d| !is_combining_mark(*d) && d.is_ascii()),
            );
        }
    }
    out
}
