//! # Motor de Regras — Classificação por Tags Semânticas
//!
//! Quatro regras independentes decidem o papel de cada token a partir do seu
//! conjunto de tags semânticas:
//!
//! | Regra | Flag             | Significado                                  |
//! |-------|------------------|----------------------------------------------|
//! | 1     | `food`           | Candidato a núcleo de entidade de alimento   |
//! | 2     | `general_object` | Objeto genérico (pode estender à direita)    |
//! | 3     | `color`          | Modificador de cor (pode estender à direita) |
//! | 4     | `not_allowed`    | Proibido como último token de uma entidade   |
//!
//! As regras são funções puras. A Regra 2 depende do resultado da Regra 1;
//! as Regras 3 e 4 são independentes. Todas rodam para todos os tokens antes
//! do encadeamento começar ([`apply_rules`]).

use serde::{Deserialize, Serialize};

use crate::document::{AnnotatedDocument, AnnotatedToken};
use crate::semtag::TagSet;

/// Comida e bebida
pub const FOOD_TAGS: &[&str] = &["F1", "F2", "F3", "F4"];
/// Seres vivos (animais e plantas)
pub const LIVING_TAGS: &[&str] = &["L2", "L3"];
pub const SUBSTANCE_TAGS: &[&str] = &["O1.1", "O1.2"];

pub const BODY_PART_TAG: &str = "B1";
pub const LINEAR_ORDER_TAG: &str = "N4";
pub const LOCATION_DIRECTION_TAG: &str = "M6";
pub const TEXTURE_TAG: &str = "O4.5";

/// Qualquer uma destas tags impede a Regra 1
pub const FOOD_EXCLUSION_TAGS: &[&str] = &["O2", "N5", "B5", "AH.02", "AG.01.t.08", "AG.01.u"];

pub const GENERAL_OBJECT_TAG: &str = "O2";
pub const CLOTHING_TAG: &str = "B5";
pub const COLOR_TAG: &str = "O4.3";

/// Equipamento de cozinha, recipiente, roupa, temperatura, medida
pub const NOT_ALLOWED_TAGS: &[&str] = &["AG.01.t.08", "AG.01.u", "AH.02", "O4.6", "N3"];

/// Como a Regra 4 combina as tags de [`NOT_ALLOWED_TAGS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagMatch {
    /// Todas as cinco tags precisam estar presentes.
    #[default]
    All,
    /// Basta uma das cinco tags.
    Any,
}

/// Configuração do motor de regras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub not_allowed_match: TagMatch,
}

/// Flags derivadas de um token, alinhadas pelo índice com o documento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenFlags {
    pub food: bool,
    pub general_object: bool,
    pub color: bool,
    pub not_allowed: bool,
}

/// **Regra 1**: `(A ∨ B) ∧ C`
///
/// - A: alguma tag de comida, ser vivo ou substância
/// - B: parte do corpo, sem ordem linear, direção ou textura
/// - C: nenhuma tag de objeto genérico, quantidade, roupa, utensílio ou recipiente
pub fn food_rule(tags: &TagSet) -> bool {
    let food_like = tags.contains_any(FOOD_TAGS)
        || tags.contains_any(LIVING_TAGS)
        || tags.contains_any(SUBSTANCE_TAGS);

    let body_part = tags.contains(BODY_PART_TAG)
        && !tags.contains(LINEAR_ORDER_TAG)
        && !tags.contains(LOCATION_DIRECTION_TAG)
        && !tags.contains(TEXTURE_TAG);

    (food_like || body_part) && tags.is_disjoint_from(FOOD_EXCLUSION_TAGS)
}

/// **Regra 2**: objeto genérico ou roupa, que não é parte do corpo nem ser vivo,
/// e que a Regra 1 não marcou como comida.
pub fn general_object_rule(tags: &TagSet, food: bool) -> bool {
    let object = tags.contains(GENERAL_OBJECT_TAG) || tags.contains(CLOTHING_TAG);
    let not_living = !tags.contains(BODY_PART_TAG) && tags.is_disjoint_from(LIVING_TAGS);
    object && not_living && !food
}

/// **Regra 3**: cor
pub fn color_rule(tags: &TagSet) -> bool {
    tags.contains(COLOR_TAG)
}

/// **Regra 4**: tokens que não podem fechar uma entidade de alimento.
pub fn not_allowed_rule(tags: &TagSet, matching: TagMatch) -> bool {
    match matching {
        TagMatch::All => tags.contains_all(NOT_ALLOWED_TAGS),
        TagMatch::Any => tags.contains_any(NOT_ALLOWED_TAGS),
    }
}

/// Aplica as quatro regras a um token
pub fn classify(token: &AnnotatedToken, config: &RuleConfig) -> TokenFlags {
    let tags = &token.tags;
    let food = food_rule(tags);
    TokenFlags {
        food,
        general_object: general_object_rule(tags, food),
        color: color_rule(tags),
        not_allowed: not_allowed_rule(tags, config.not_allowed_match),
    }
}

/// Classifica todos os tokens do documento.
///
/// Retorna um vetor `token_index → TokenFlags`; o documento não é modificado.
pub fn apply_rules(doc: &AnnotatedDocument, config: &RuleConfig) -> Vec<TokenFlags> {
    doc.tokens().iter().map(|t| classify(t, config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semtag::PartOfSpeech;
    use proptest::prelude::*;

    fn tags(codes: &[&str]) -> TagSet {
        codes.iter().copied().collect()
    }

    const ALL_CODES: &[&str] = &[
        "F1", "F2", "F3", "F4", "L2", "L3", "O1.1", "O1.2", "B1", "N4", "M6", "O4.5", "O2",
        "N5", "B5", "AH.02", "AG.01.t.08", "AG.01.u", "O4.3", "O4.6", "N3", "Z99", "A1.1.1",
    ];

    #[test]
    fn test_food_rule_food_tags() {
        assert!(food_rule(&tags(&["F1"])));
        assert!(food_rule(&tags(&["F2", "Z99"])));
        assert!(food_rule(&tags(&["L2"])));
        assert!(food_rule(&tags(&["O1.2"])));
        assert!(!food_rule(&tags(&["Z99"])));
    }

    #[test]
    fn test_food_rule_body_part() {
        assert!(food_rule(&tags(&["B1"])));
        assert!(!food_rule(&tags(&["B1", "N4"])));
        assert!(!food_rule(&tags(&["B1", "M6"])));
        assert!(!food_rule(&tags(&["B1", "O4.5"])));
    }

    #[test]
    fn test_food_rule_exclusions() {
        for excluded in FOOD_EXCLUSION_TAGS {
            assert!(!food_rule(&tags(&["F1", excluded])), "{} deveria excluir", excluded);
        }
    }

    #[test]
    fn test_general_object_rule() {
        assert!(general_object_rule(&tags(&["O2"]), false));
        assert!(general_object_rule(&tags(&["B5"]), false));
        assert!(!general_object_rule(&tags(&["O2", "L3"]), false));
        assert!(!general_object_rule(&tags(&["O2", "B1"]), false));
        assert!(!general_object_rule(&tags(&["O2"]), true));
    }

    #[test]
    fn test_color_rule() {
        assert!(color_rule(&tags(&["O4.3"])));
        assert!(!color_rule(&tags(&["O4.6"])));
    }

    #[test]
    fn test_not_allowed_requires_all_five() {
        assert!(not_allowed_rule(&tags(NOT_ALLOWED_TAGS), TagMatch::All));
        assert!(!not_allowed_rule(&tags(&["AG.01.t.08", "AG.01.u", "AH.02", "O4.6"]), TagMatch::All));
        assert!(!not_allowed_rule(&tags(&["N3"]), TagMatch::All));
    }

    #[test]
    fn test_not_allowed_any_mode() {
        assert!(not_allowed_rule(&tags(&["N3"]), TagMatch::Any));
        assert!(!not_allowed_rule(&tags(&["F1"]), TagMatch::Any));
    }

    #[test]
    fn test_empty_tags_no_flags() {
        let token = AnnotatedToken::new(0, "the", "the", PartOfSpeech::Det, TagSet::new());
        assert_eq!(classify(&token, &RuleConfig::default()), TokenFlags::default());
    }

    #[test]
    fn test_apply_rules_is_index_aligned() {
        let doc = AnnotatedDocument::from_parts(vec![
            ("red".to_string(), "red".to_string(), PartOfSpeech::Adj, tags(&["O4.3"])),
            ("apple".to_string(), "apple".to_string(), PartOfSpeech::Noun, tags(&["F1"])),
        ]);
        let flags = apply_rules(&doc, &RuleConfig::default());
        assert_eq!(flags.len(), 2);
        assert!(flags[0].color && !flags[0].food);
        assert!(flags[1].food && !flags[1].color);
    }

    proptest! {
        #[test]
        fn test_general_object_excludes_food(picks in proptest::collection::vec(0..ALL_CODES.len(), 0..8)) {
            let set: TagSet = picks.iter().map(|&i| ALL_CODES[i]).collect();
            let token = AnnotatedToken::new(0, "w", "w", PartOfSpeech::Noun, set);
            for config in [RuleConfig::default(), RuleConfig { not_allowed_match: TagMatch::Any }] {
                let flags = classify(&token, &config);
                prop_assert!(!(flags.general_object && flags.food));
            }
        }

        #[test]
        fn test_literal_not_allowed_implies_any(picks in proptest::collection::vec(0..ALL_CODES.len(), 0..10)) {
            let set: TagSet = picks.iter().map(|&i| ALL_CODES[i]).collect();
            if not_allowed_rule(&set, TagMatch::All) {
                prop_assert!(not_allowed_rule(&set, TagMatch::Any));
            }
        }
    }
}
