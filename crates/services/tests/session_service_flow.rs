mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{ScriptedSupplier, quiz_of};
use quiz_core::SessionError;
use quiz_core::scoring::ScoringRule;
use quiz_core::session::{Advance, SessionPhase};
use quiz_core::time::fixed_clock;
use services::{
    ANIMATION_PERIOD, FetchOutcome, QuizServiceError, QuizSessionService, SupplyError,
};

fn service(supplier: &Arc<ScriptedSupplier>, rule: ScoringRule) -> QuizSessionService {
    QuizSessionService::with_clock(supplier.clone(), rule, fixed_clock())
}

fn play(service: &QuizSessionService, option: &str) {
    service.select_answer(option).unwrap();
    service.check_answer().unwrap();
}

#[tokio::test]
async fn full_round_correct_correct_wrong() {
    let supplier = Arc::new(ScriptedSupplier::default());
    supplier.push_ready(Ok(quiz_of(3)));
    let service = service(&supplier, ScoringRule::streak());

    assert_eq!(
        service.fetch_quiz().await.unwrap(),
        FetchOutcome::Loaded { questions: 3 }
    );

    play(&service, "A");
    let snap = service.snapshot().unwrap();
    assert_eq!((snap.score, snap.streak), (10, 1));
    assert_eq!(service.advance().unwrap(), Advance::Next { index: 1 });

    play(&service, "A");
    let snap = service.snapshot().unwrap();
    assert_eq!((snap.score, snap.streak), (25, 2));
    service.advance().unwrap();

    play(&service, "C");
    let snap = service.snapshot().unwrap();
    assert_eq!((snap.score, snap.streak), (25, 0));
    assert!(snap.on_last_question);
    assert!(!snap.is_complete);

    assert_eq!(service.advance().unwrap(), Advance::Completed);
    let snap = service.snapshot().unwrap();
    assert!(snap.is_complete);
    let summary = snap.summary.unwrap();
    assert_eq!(summary.correct_answers(), 2);
    assert_eq!(summary.best_streak(), 2);
    assert_eq!(summary.score(), 25);
}

#[tokio::test]
async fn failed_fetch_leaves_session_untouched() {
    let supplier = Arc::new(ScriptedSupplier::default());
    supplier.push_ready(Ok(quiz_of(2)));
    supplier.push_ready(Err(SupplyError::NoArticles));
    let service = service(&supplier, ScoringRule::streak());

    service.fetch_quiz().await.unwrap();
    play(&service, "A");
    let before = service.snapshot().unwrap();

    let err = service.fetch_quiz().await.unwrap_err();
    assert!(matches!(
        err,
        QuizServiceError::FetchFailed(SupplyError::NoArticles)
    ));

    let after = service.snapshot().unwrap();
    assert_eq!(after, before);
    assert!(!after.fetch_pending);
    assert_eq!(service.advance().unwrap(), Advance::Next { index: 1 });
}

#[tokio::test]
async fn mutations_before_any_quiz_are_rejected() {
    let supplier = Arc::new(ScriptedSupplier::default());
    let service = service(&supplier, ScoringRule::streak());

    let err = service.select_answer("A").unwrap_err();
    assert!(matches!(err, QuizServiceError::Session(SessionError::NoQuiz)));
    assert!(!service.snapshot().unwrap().has_quiz());
}

#[tokio::test]
async fn stale_response_cannot_clobber_newer_quiz() {
    let supplier = Arc::new(ScriptedSupplier::default());
    let slow = supplier.push_gated();
    let fast = supplier.push_gated();
    let service = service(&supplier, ScoringRule::streak());

    let (first, second, ()) = tokio::join!(service.fetch_quiz(), service.fetch_quiz(), async {
        assert!(service.fetch_pending().unwrap());
        assert!(matches!(
            service.select_answer("A"),
            Err(QuizServiceError::FetchPending)
        ));
        fast.send(Ok(quiz_of(2))).ok();
        tokio::task::yield_now().await;
        slow.send(Ok(quiz_of(5))).ok();
    });

    assert_eq!(first.unwrap(), FetchOutcome::Superseded);
    assert_eq!(second.unwrap(), FetchOutcome::Loaded { questions: 2 });
    assert_eq!(supplier.calls(), 2);

    let snap = service.snapshot().unwrap();
    assert_eq!(snap.total_questions, 2);
    assert!(!snap.fetch_pending);
}

#[tokio::test(start_paused = true)]
async fn cancelled_fetch_does_not_stay_pending() {
    let supplier = Arc::new(ScriptedSupplier::default());
    let _never = supplier.push_gated();
    let service = service(&supplier, ScoringRule::streak());

    let timed_out = tokio::time::timeout(Duration::from_secs(1), service.fetch_quiz()).await;
    assert!(timed_out.is_err());
    assert!(!service.fetch_pending().unwrap());
}

#[tokio::test]
async fn new_quiz_keeps_best_streak_but_reset_clears_it() {
    let supplier = Arc::new(ScriptedSupplier::default());
    supplier.push_ready(Ok(quiz_of(2)));
    supplier.push_ready(Ok(quiz_of(1)));
    let service = service(&supplier, ScoringRule::streak());

    service.fetch_quiz().await.unwrap();
    play(&service, "A");
    service.advance().unwrap();
    play(&service, "A");
    service.advance().unwrap();
    assert_eq!(service.snapshot().unwrap().best_streak, 2);

    service.fetch_quiz().await.unwrap();
    let snap = service.snapshot().unwrap();
    assert_eq!(snap.phase, SessionPhase::Answering { index: 0 });
    assert_eq!((snap.score, snap.best_streak), (0, 2));

    service.reset().unwrap();
    let snap = service.snapshot().unwrap();
    assert_eq!(snap.phase, SessionPhase::Empty);
    assert_eq!(snap.best_streak, 0);
}

#[tokio::test]
async fn reset_drops_in_flight_fetch() {
    let supplier = Arc::new(ScriptedSupplier::default());
    let gate = supplier.push_gated();
    let service = service(&supplier, ScoringRule::streak());

    let (outcome, ()) = tokio::join!(service.fetch_quiz(), async {
        service.reset().unwrap();
        gate.send(Ok(quiz_of(3))).ok();
    });

    assert_eq!(outcome.unwrap(), FetchOutcome::Superseded);
    assert!(!service.snapshot().unwrap().has_quiz());
}

#[tokio::test(start_paused = true)]
async fn score_animation_converges_monotonically() {
    let supplier = Arc::new(ScriptedSupplier::default());
    supplier.push_ready(Ok(quiz_of(2)));
    let service = service(&supplier, ScoringRule::streak());
    service.fetch_quiz().await.unwrap();
    play(&service, "A");

    let (mut rx, handle) = service.spawn_score_animation(ANIMATION_PERIOD);
    let mut seen = vec![*rx.borrow_and_update()];
    tokio::time::timeout(Duration::from_secs(5), async {
        while seen.last() != Some(&10) {
            rx.changed().await.unwrap();
            seen.push(*rx.borrow_and_update());
        }
    })
    .await
    .expect("animation should reach the score");
    handle.abort();

    assert!(seen.windows(2).all(|w| w[0] < w[1]), "not monotonic: {seen:?}");
    assert_eq!(service.snapshot().unwrap().displayed_score, 10);
}

#[tokio::test(start_paused = true)]
async fn countdown_expiry_completes_session() {
    let supplier = Arc::new(ScriptedSupplier::default());
    supplier.push_ready(Ok(quiz_of(3)));
    let service = service(&supplier, ScoringRule::countdown(3));
    service.fetch_quiz().await.unwrap();
    service.select_answer("A").unwrap();

    let (mut rx, handle) = service.spawn_countdown();
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            rx.changed().await.unwrap();
            if rx.borrow_and_update().is_some_and(|tick| tick.expired) {
                break;
            }
        }
    })
    .await
    .expect("countdown should expire");
    handle.abort();

    let snap = service.snapshot().unwrap();
    assert!(snap.is_complete);
    assert_eq!(snap.time_left, Some(0));
    assert_eq!(snap.correct_answers, 1);
    assert_eq!(snap.score, 10);
    assert!(matches!(
        service.select_answer("B"),
        Err(QuizServiceError::Session(SessionError::Completed))
    ));
}

/// Start a second fetch on its own task and wait until it holds the ticket.
async fn start_pending_fetch(
    service: &QuizSessionService,
) -> tokio::task::JoinHandle<Result<FetchOutcome, QuizServiceError>> {
    let pending = service.clone();
    let handle = tokio::spawn(async move { pending.fetch_quiz().await });
    while !service.fetch_pending().unwrap() {
        tokio::task::yield_now().await;
    }
    handle
}

#[tokio::test(start_paused = true)]
async fn countdown_stands_still_while_fetch_pending() {
    let supplier = Arc::new(ScriptedSupplier::default());
    supplier.push_ready(Ok(quiz_of(3)));
    let gate = supplier.push_gated();
    let service = service(&supplier, ScoringRule::countdown(3));
    service.fetch_quiz().await.unwrap();
    service.select_answer("A").unwrap();

    let (rx, countdown) = service.spawn_countdown();
    let fetch = start_pending_fetch(&service).await;

    tokio::time::sleep(Duration::from_secs(5)).await;
    let snap = service.snapshot().unwrap();
    assert!(snap.fetch_pending);
    assert!(!snap.is_complete);
    assert_eq!(snap.time_left, Some(3));
    assert_eq!((snap.score, snap.correct_answers), (0, 0));
    assert!(rx.borrow().is_none());

    gate.send(Ok(quiz_of(2))).ok();
    assert_eq!(
        fetch.await.unwrap().unwrap(),
        FetchOutcome::Loaded { questions: 2 }
    );
    let snap = service.snapshot().unwrap();
    assert_eq!(snap.total_questions, 2);
    assert_eq!(snap.time_left, Some(3));
    countdown.abort();
}

#[tokio::test(start_paused = true)]
async fn pending_fetch_blocks_check_and_advance_but_not_the_score_display() {
    let supplier = Arc::new(ScriptedSupplier::default());
    supplier.push_ready(Ok(quiz_of(2)));
    let gate = supplier.push_gated();
    let service = service(&supplier, ScoringRule::streak());
    service.fetch_quiz().await.unwrap();
    service.select_answer("A").unwrap();

    let fetch = start_pending_fetch(&service).await;
    assert!(matches!(
        service.check_answer(),
        Err(QuizServiceError::FetchPending)
    ));
    assert!(matches!(
        service.select_answer("B"),
        Err(QuizServiceError::FetchPending)
    ));
    gate.send(Ok(quiz_of(2))).ok();
    fetch.await.unwrap().unwrap();

    play(&service, "A");
    let gate = supplier.push_gated();
    let fetch = start_pending_fetch(&service).await;
    assert!(matches!(
        service.advance(),
        Err(QuizServiceError::FetchPending)
    ));

    let (mut rx, animation) = service.spawn_score_animation(ANIMATION_PERIOD);
    tokio::time::timeout(Duration::from_secs(5), async {
        while *rx.borrow_and_update() != 10 {
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("display should catch up while the fetch is pending");
    animation.abort();

    let snap = service.snapshot().unwrap();
    assert!(snap.fetch_pending);
    assert_eq!(snap.phase, SessionPhase::Checked { index: 0 });
    assert_eq!((snap.score, snap.displayed_score), (10, 10));

    gate.send(Ok(quiz_of(1))).ok();
    fetch.await.unwrap().unwrap();
    assert_eq!(service.snapshot().unwrap().total_questions, 1);
}
