//! Instructions sent to the text generator.

use super::{Category, QuizAnswer, ScoreVector};

/// System instruction for archetype classification.
pub const ARCHETYPE_SYSTEM_PROMPT: &str = r#"Ты мастер-гадатель, определяющий архетип игрока по его ответам.
Существует ровно четыре архетипа: "Воин", "Маг", "Искатель", "Тень".

Ответь ТОЛЬКО одним JSON-объектом без пояснений и без разметки:
{"type": "<один из четырёх архетипов>", "description": "<2-3 предложения о человеке во втором лице>", "CTA": "<одно конкретное действие на ближайшие дни>"}

Поле "type" должно в точности совпадать с одним из четырёх названий."#;

/// System instruction for prophecy generation.
pub const PROPHECY_SYSTEM_PROMPT: &str = r#"Ты оракул, который пишет короткие пророчества.
Пиши во втором лице, 2-4 предложения, образно, но без мрачности.
Ответь только текстом пророчества, без кавычек, заголовков и JSON."#;

/// User instruction listing the answers and the aggregated scores.
pub fn archetype_user_prompt(answers: &[QuizAnswer], scores: &ScoreVector) -> String {
    let mut prompt = String::from("Ответы игрока:\n");
    for answer in answers {
        prompt.push_str(&format!(
            "- Вопрос {}: {}\n",
            answer.question_id,
            answer.answer_text.trim()
        ));
    }
    let tally = scores
        .iter()
        .map(|(category, score)| format!("{}={}", category.label(), score))
        .collect::<Vec<_>>()
        .join(", ");
    prompt.push_str(&format!("\nПредварительные баллы: {}\n", tally));
    prompt.push_str("Определи архетип игрока.");
    prompt
}

/// User instruction for a prophecy keyed by the resolved category.
pub fn prophecy_user_prompt(category: Category) -> String {
    format!(
        "Архетип игрока: {}.\nНапиши для него личное пророчество на ближайшее время.",
        category.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::archetype::aggregate;

    #[test]
    fn archetype_prompt_lists_answers_and_scores() {
        let answers = vec![
            QuizAnswer::new(1, " Сразу в бой ").with_weight(Category::Warrior, 3),
            QuizAnswer::new(2, "Наблюдаю").with_weight(Category::Shadow, 1),
        ];
        let prompt = archetype_user_prompt(&answers, &aggregate(&answers));

        assert!(prompt.contains("Вопрос 1: Сразу в бой\n"));
        assert!(prompt.contains("Вопрос 2: Наблюдаю"));
        assert!(prompt.contains("Воин=3, Маг=0, Искатель=0, Тень=1"));
    }

    #[test]
    fn system_prompt_names_every_label() {
        for category in Category::ALL {
            assert!(ARCHETYPE_SYSTEM_PROMPT.contains(category.label()));
        }
    }

    #[test]
    fn prophecy_prompt_names_category() {
        assert!(prophecy_user_prompt(Category::Seeker).contains("Искатель"));
    }
}
