use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::Quiz;
use rand::rng;
use rand::seq::SliceRandom;
use storage::ArticleRepository;
use tracing::{info, warn};

use crate::error::SupplyError;
use crate::generator::QuizGenerator;
use crate::parse::parse_quiz;
use crate::prompt::{PromptOptions, build_prompt};

/// Produces a validated quiz on demand.
#[async_trait]
pub trait QuizSupplier: Send + Sync {
    /// # Errors
    ///
    /// Returns `SupplyError` for every failure; a partial quiz is never returned.
    async fn fetch_quiz(&self) -> Result<Quiz, SupplyError>;
}

/// Builds quizzes from stored articles through a `QuizGenerator`.
#[derive(Clone)]
pub struct ArticleQuizSupplier {
    articles: Arc<dyn ArticleRepository>,
    generator: Arc<dyn QuizGenerator>,
    options: PromptOptions,
    max_articles: Option<usize>,
}

impl ArticleQuizSupplier {
    #[must_use]
    pub fn new(articles: Arc<dyn ArticleRepository>, generator: Arc<dyn QuizGenerator>) -> Self {
        Self {
            articles,
            generator,
            options: PromptOptions::default(),
            max_articles: None,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: PromptOptions) -> Self {
        self.options = options;
        self
    }

    /// Cap how many articles go into one prompt. A random subset is used when
    /// more are available.
    #[must_use]
    pub fn with_max_articles(mut self, max_articles: Option<usize>) -> Self {
        self.max_articles = max_articles.filter(|max| *max > 0);
        self
    }
}

#[async_trait]
impl QuizSupplier for ArticleQuizSupplier {
    async fn fetch_quiz(&self) -> Result<Quiz, SupplyError> {
        let mut articles = self.articles.list_articles().await?;
        if articles.is_empty() {
            return Err(SupplyError::NoArticles);
        }
        if let Some(max) = self.max_articles.filter(|max| articles.len() > *max) {
            articles.shuffle(&mut rng());
            articles.truncate(max);
        }

        let prompt = build_prompt(&articles, &self.options).map_err(SupplyError::Prompt)?;
        let raw = self.generator.generate(&prompt).await?;
        let quiz = parse_quiz(&raw).inspect_err(|err| {
            warn!(error = %err, "rejected generated quiz");
        })?;

        if quiz.len() != self.options.question_count {
            // The generator may skip questions it cannot ground in the articles.
            info!(
                requested = self.options.question_count,
                received = quiz.len(),
                "generated quiz has a different question count"
            );
        }
        info!(articles = articles.len(), questions = quiz.len(), "quiz generated");
        Ok(quiz)
    }
}
