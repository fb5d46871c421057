use quiz_core::model::{Article, MULTIPLE_CHOICE_OPTIONS, QuestionKind, TRUE_FALSE_OPTIONS};

const SYSTEM_PROMPT: &str = "You are a quiz generator that creates engaging news quiz questions. \
Always respond with valid JSON in the specified format.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOptions {
    pub question_count: usize,
    pub language: String,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            question_count: 5,
            language: "Norwegian".into(),
        }
    }
}

/// System and user messages for one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPrompt {
    pub system: String,
    pub user: String,
}

/// Build the generation prompt for the given articles.
///
/// # Errors
///
/// Returns `serde_json::Error` if the articles cannot be serialized.
pub fn build_prompt(
    articles: &[Article],
    options: &PromptOptions,
) -> Result<QuizPrompt, serde_json::Error> {
    let articles_json = serde_json::to_string_pretty(articles)?;
    let [yes, no] = TRUE_FALSE_OPTIONS;
    let count = options.question_count;
    let language = &options.language;
    let multiple_choice = QuestionKind::MultipleChoice.as_str();
    let true_false = QuestionKind::TrueFalse.as_str();

    let user = format!(
        r#"Create exactly {count} quiz questions based on these news articles. Mix both multiple-choice and true/false questions.
Make the questions challenging but fair, focusing on key facts and details from the articles.

Important: All questions and answers must be written in {language}.

Return your response in this exact JSON format:
{{
  "questions": [
    {{ "question": "...", "type": "{multiple_choice}", "options": ["...", "...", "...", "..."], "answer": "..." }},
    {{ "question": "...", "type": "{true_false}", "options": ["{yes}", "{no}"], "answer": "{yes}" }}
  ]
}}

Rules:
- Multiple-choice questions have exactly {MULTIPLE_CHOICE_OPTIONS} options
- True/false questions use exactly ["{yes}", "{no}"] as options
- "answer" matches exactly one of the options
- Base every question on the articles only; skip a question rather than invent facts
- Keep questions clear and unambiguous

Articles:
{articles_json}
"#
    );

    Ok(QuizPrompt {
        system: SYSTEM_PROMPT.to_owned(),
        user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_count_language_and_articles() {
        let articles = vec![Article::new("Måling", "Arbeiderpartiet vokser.")];
        let options = PromptOptions {
            question_count: 3,
            language: "Norwegian".into(),
        };
        let prompt = build_prompt(&articles, &options).unwrap();

        assert!(prompt.user.starts_with("Create exactly 3 quiz questions"));
        assert!(prompt.user.contains("written in Norwegian"));
        assert!(prompt.user.contains(r#"["Sant", "Usant"]"#));
        assert!(prompt.user.contains("Arbeiderpartiet vokser."));
        assert!(prompt.user.contains(r#""type": "multipleChoice""#));
        assert!(prompt.system.contains("valid JSON"));
    }

    #[test]
    fn prompt_keeps_fields_the_model_does_not_name() {
        let article: Article =
            serde_json::from_str(r#"{"title": "Valg", "lead": "Rekordhøy deltakelse."}"#).unwrap();
        let prompt = build_prompt(&[article], &PromptOptions::default()).unwrap();
        assert!(prompt.user.contains(r#""lead": "Rekordhøy deltakelse.""#));
    }
}
