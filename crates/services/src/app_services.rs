use std::sync::Arc;

use quiz_core::scoring::ScoringRule;
use storage::Storage;

use crate::Clock;
use crate::generator::QuizGenerator;
use crate::prompt::PromptOptions;
use crate::sessions::QuizSessionService;
use crate::supplier::{ArticleQuizSupplier, QuizSupplier};

/// Assembles the supplier and session service from storage and a generator.
#[derive(Clone)]
pub struct AppServices {
    supplier: Arc<dyn QuizSupplier>,
    session: Arc<QuizSessionService>,
}

impl AppServices {
    #[must_use]
    pub fn new(
        storage: &Storage,
        generator: Arc<dyn QuizGenerator>,
        prompt: PromptOptions,
        max_articles: Option<usize>,
        rule: ScoringRule,
        clock: Clock,
    ) -> Self {
        let supplier: Arc<dyn QuizSupplier> = Arc::new(
            ArticleQuizSupplier::new(Arc::clone(&storage.articles), generator)
                .with_options(prompt)
                .with_max_articles(max_articles),
        );
        let session = Arc::new(QuizSessionService::with_clock(
            Arc::clone(&supplier),
            rule,
            clock,
        ));
        Self { supplier, session }
    }

    #[must_use]
    pub fn supplier(&self) -> Arc<dyn QuizSupplier> {
        Arc::clone(&self.supplier)
    }

    #[must_use]
    pub fn session(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.session)
    }
}
