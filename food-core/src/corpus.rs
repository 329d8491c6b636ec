//! # Corpus de Exemplo — Posts sobre Substituições de Receitas
//!
//! Posts curtos e informais, com hashtags, aspas e ruído de digitação, usados
//! quando nenhuma entrada é fornecida (CLI) e como demonstração na interface web.

/// Um post de exemplo com o tema da substituição
pub struct SamplePost {
    /// Tema (utilizado para rotular os exemplos na UI).
    pub topic: &'static str,
    /// Texto bruto, antes da limpeza.
    pub text: &'static str,
}

/// Retorna os posts de exemplo, na ordem de processamento.
pub fn sample_posts() -> Vec<SamplePost> {
    vec![
        SamplePost {
            topic: "sopa",
            text: "Heat the Colby-jack white beef soup in the pan until it boils.",
        },
        SamplePost {
            topic: "confeitaria",
            text: "Just tried using applesauce instead of 'oil' in my baking recipe and it turned out surprisingly moist! #HealthyBaking #FoodSubstitutions",
        },
        SamplePost {
            topic: "low-carb",
            text: "Swapped cauliflower for rice in my stir-fry and it's a game-changer! Low-carb and delicious. #FoodHacks #CauliflowerRice",
        },
        SamplePost {
            topic: "sem lactose",
            text: "Replacing dairy with almond milk in my \"morning\" smoothie -    loving the nutty flavor! #DairyFree #HealthyChoices",
        },
        SamplePost {
            topic: "café da manhã",
            text: "Who knew mashed avocado coÜld replace butter   on toast? \n    Creamy goodness with a healthier twist. #AvocadoLove #HealthyEating",
        },
        SamplePost {
            topic: "molhos",
            text: "Used Greek yogurt instead of mayo in my 'potato' salad - lighter and tangier! #HealthySwaps #YogurtLove",
        },
        SamplePost {
            topic: "massas",
            text: "Trying out zucchini noodles instead of pasta for a low-carb dinner. Surprisingly satisfying! #Zoodles #HealthyEating",
        },
        SamplePost {
            topic: "adoçantes",
            text: "Substituted maple syrup for sugar in my baking - adds a lovely depth of flavor! #NaturalSweeteners #BakingTips",
        },
        SamplePost {
            topic: "vegetariano",
            text: "Made a veggie burger with black beans instead of meat - so hearty and packed with protein! #VegetarianLife #PlantBased",
        },
        SamplePost {
            topic: "grãos",
            text: "Using quinoa instead of rice in my burrito bowl - a nuttier taste and loaded with nutrients! #QuinoaLove #HealthyChoices",
        },
        SamplePost {
            topic: "ovos",
            text: "Discovering the wonders of using mashed bananas as an egg substitute in baking. Works like a charm! #EggSubstitutes #BakingTips",
        },
    ]
}

/// Apenas os textos brutos dos posts de exemplo
pub fn sample_texts() -> Vec<&'static str> {
    sample_posts().iter().map(|p| p.text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::clean_text;

    #[test]
    fn test_sample_posts_not_empty() {
        let posts = sample_posts();
        assert_eq!(posts.len(), 11);
        assert!(posts.iter().all(|p| !p.text.trim().is_empty()));
    }

    #[test]
    fn test_samples_clean_to_ascii() {
        for text in sample_texts() {
            let cleaned = clean_text(text);
            assert!(cleaned.is_ascii(), "{}", cleaned);
            assert!(!cleaned.contains('#'));
        }
    }
}
