#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use quiz_core::model::{Question, QuestionKind, Quiz};
use services::{GenerationError, QuizGenerator, QuizPrompt, QuizSupplier, SupplyError};
use tokio::sync::oneshot;

pub fn mc(text: &str, answer: &str) -> Question {
    Question::new(
        text,
        QuestionKind::MultipleChoice,
        vec!["A".into(), "B".into(), "C".into(), "D".into()],
        answer,
    )
    .unwrap()
}

/// Quiz of `n` multiple-choice questions whose answer is always "A".
pub fn quiz_of(n: usize) -> Quiz {
    Quiz::new((0..n).map(|i| mc(&format!("Q{i}"), "A")).collect()).unwrap()
}

/// Supplier that answers each fetch from a queue of (possibly gated) responses.
#[derive(Default)]
pub struct ScriptedSupplier {
    responses: Mutex<VecDeque<oneshot::Receiver<Result<Quiz, SupplyError>>>>,
    calls: AtomicUsize,
}

impl ScriptedSupplier {
    pub fn push_ready(&self, response: Result<Quiz, SupplyError>) {
        let (tx, rx) = oneshot::channel();
        tx.send(response).ok();
        self.responses.lock().unwrap().push_back(rx);
    }

    pub fn push_gated(&self) -> oneshot::Sender<Result<Quiz, SupplyError>> {
        let (tx, rx) = oneshot::channel();
        self.responses.lock().unwrap().push_back(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuizSupplier for ScriptedSupplier {
    async fn fetch_quiz(&self) -> Result<Quiz, SupplyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(rx) => rx.await.unwrap_or(Err(SupplyError::NoArticles)),
            None => Err(SupplyError::NoArticles),
        }
    }
}

/// Generator that returns a canned payload and records the prompts it saw.
pub struct CannedGenerator {
    payload: Result<String, ()>,
    prompts: Mutex<Vec<QuizPrompt>>,
}

impl CannedGenerator {
    pub fn ok(payload: &str) -> Self {
        Self {
            payload: Ok(payload.to_owned()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn empty_response() -> Self {
        Self {
            payload: Err(()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<QuizPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuizGenerator for CannedGenerator {
    async fn generate(&self, prompt: &QuizPrompt) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.payload
            .clone()
            .map_err(|()| GenerationError::EmptyResponse)
    }
}

pub const VALID_PAYLOAD: &str = r#"{
  "questions": [
    {
      "question": "Hvilket parti vokser i Trøndelag?",
      "type": "multipleChoice",
      "options": ["Arbeiderpartiet", "Høyre", "FrP", "SV"],
      "answer": "Arbeiderpartiet"
    },
    {
      "question": "Åge Aleksandersen følte maktesløshet. Sant eller usant?",
      "type": "trueOrFalse",
      "options": ["Sant", "Usant"],
      "answer": "Sant"
    },
    {
      "question": "Regner det i Bergen?",
      "type": "trueOrFalse",
      "options": ["Sant", "Usant"],
      "answer": "Usant"
    }
  ]
}"#;
