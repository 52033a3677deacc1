use std::collections::BTreeMap;
use std::sync::Arc;

use quiz_core::model::{
    Difficulty, OptionKey, QuestionDraft, QuizDraft, SessionError,
};
use quiz_core::time::{fixed_clock, fixed_now};
use services::{
    Clock, ExamLoopService, ExamProgress, QuizCatalogService, ResultHistoryService, TimerDriver,
    TimerTick,
};
use storage::repository::{InMemoryRepository, ResultRepository};

fn question(correct: OptionKey) -> QuestionDraft {
    QuestionDraft {
        prompt: format!("Which option is {correct}?"),
        options: BTreeMap::from([
            (OptionKey::A, "first".into()),
            (OptionKey::B, "second".into()),
            (OptionKey::C, "third".into()),
            (OptionKey::D, "fourth".into()),
        ]),
        correct_key: correct,
        explanation: "by construction".into(),
    }
}

fn draft(timer_minutes: u32) -> QuizDraft {
    QuizDraft {
        name: "Integration".into(),
        syllabus: "end to end".into(),
        difficulty: Difficulty::Medium,
        timer_minutes,
        questions: vec![
            question(OptionKey::A),
            question(OptionKey::B),
            question(OptionKey::C),
        ],
    }
}

#[tokio::test]
async fn manual_submission_persists_exactly_one_result() {
    let repo = InMemoryRepository::new();
    let clock = fixed_clock();
    let catalog = QuizCatalogService::new(clock, Arc::new(repo.clone()));
    let exams = ExamLoopService::new(clock, Arc::new(repo.clone()), Arc::new(repo.clone()));

    let quiz_id = catalog
        .create_quiz(draft(5), "owner@example.com")
        .await
        .unwrap();
    let mut session = exams.start_exam(quiz_id).await.unwrap();

    // Answer the first two, mark the third for review and leave it blank.
    session.select_answer(OptionKey::A).unwrap();
    session.go_next().unwrap();
    session.select_answer(OptionKey::D).unwrap();
    session.go_next().unwrap();
    session.toggle_review_mark().unwrap();

    let progress = ExamProgress::of(&session);
    assert_eq!(progress.answered, 2);
    assert_eq!(progress.unanswered, 1);
    assert_eq!(progress.marked_for_review, 1);

    let submission = exams
        .submit_exam(&mut session, "taker@example.com", quiz_id)
        .await
        .unwrap();
    assert_eq!(submission.result.score(), 1);
    assert_eq!(submission.result.total(), 3);

    let stored = repo.results_for_user("taker@example.com").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].score, 1);

    // Re-submission is rejected and nothing extra lands in storage.
    let err = exams
        .submit_exam(&mut session, "taker@example.com", quiz_id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        services::ExamError::Session(SessionError::AlreadySubmitted)
    ));
    assert_eq!(repo.results_for_user("taker@example.com").await.unwrap().len(), 1);
}

#[tokio::test]
async fn timer_expiry_scores_once_and_shares_the_persistence_path() {
    let repo = InMemoryRepository::new();
    let mut clock = fixed_clock();
    let catalog = QuizCatalogService::new(clock, Arc::new(repo.clone()));
    let exams = ExamLoopService::new(clock, Arc::new(repo.clone()), Arc::new(repo.clone()));

    let quiz_id = catalog
        .create_quiz(draft(1), "owner@example.com")
        .await
        .unwrap();
    let mut session = exams.start_exam(quiz_id).await.unwrap();
    session.select_answer(OptionKey::A).unwrap();

    let mut driver = TimerDriver::new();
    let mut expired = None;
    for _ in 0..60 {
        clock.advance(chrono::Duration::seconds(1));
        match driver.tick(&mut session, clock.now()) {
            TimerTick::Running { .. } => {}
            TimerTick::Expired(result) => {
                assert!(expired.is_none(), "expiry fired twice");
                expired = Some(result);
            }
            TimerTick::Stopped => panic!("driver stopped before the budget ran out"),
        }
    }

    let result = expired.expect("expiry after 60 ticks");
    assert_eq!(result.score(), 1);
    assert_eq!(result.time_taken_seconds(), 60);
    assert!(session.is_submitted());
    assert_eq!(session.remaining_seconds(), 0);

    // Expiry persists through the same path manual submission uses.
    let topic = session.quiz().name().to_owned();
    exams
        .record_result("taker@example.com", quiz_id, &topic, &result)
        .await
        .unwrap();
    let stored = repo.results_for_user("taker@example.com").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].time_taken_seconds, 60);

    // Late ticks after expiry are inert.
    assert_eq!(driver.tick(&mut session, clock.now()), TimerTick::Stopped);
}

#[tokio::test]
async fn manual_submit_racing_the_last_tick_wins_exactly_once() {
    let repo = InMemoryRepository::new();
    let clock = fixed_clock();
    let catalog = QuizCatalogService::new(clock, Arc::new(repo.clone()));
    let exams = ExamLoopService::new(clock, Arc::new(repo.clone()), Arc::new(repo.clone()));

    let quiz_id = catalog
        .create_quiz(draft(1), "owner@example.com")
        .await
        .unwrap();
    let mut session = exams.start_exam(quiz_id).await.unwrap();
    let mut driver = TimerDriver::new();

    // Run the countdown down to one remaining second.
    for _ in 0..59 {
        assert!(matches!(
            driver.tick(&mut session, clock.now()),
            TimerTick::Running { .. }
        ));
    }

    // Both triggers fire in the same scheduling turn: manual first.
    let submission = exams
        .submit_exam(&mut session, "taker@example.com", quiz_id)
        .await
        .unwrap();
    assert_eq!(driver.tick(&mut session, clock.now()), TimerTick::Stopped);

    assert_eq!(submission.result.total(), 3);
    assert_eq!(repo.results_for_user("taker@example.com").await.unwrap().len(), 1);
}

#[tokio::test]
async fn bookmarks_survive_from_a_scored_attempt() {
    let repo = InMemoryRepository::new();
    let clock = fixed_clock();
    let catalog = QuizCatalogService::new(clock, Arc::new(repo.clone()));
    let exams = ExamLoopService::new(clock, Arc::new(repo.clone()), Arc::new(repo.clone()));
    let history =
        ResultHistoryService::new(clock, Arc::new(repo.clone()), Arc::new(repo.clone()));

    let quiz_id = catalog
        .create_quiz(draft(2), "owner@example.com")
        .await
        .unwrap();
    let mut session = exams.start_exam(quiz_id).await.unwrap();
    let submission = exams
        .submit_exam(&mut session, "taker@example.com", quiz_id)
        .await
        .unwrap();

    assert!(
        history
            .toggle_bookmark("taker@example.com", quiz_id, &submission.result, 0)
            .await
            .unwrap()
    );
    let saved = history.bookmarks_for_user("taker@example.com").await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].prompt, "Which option is A?");
    assert!(saved[0].selected.is_unanswered());
}

#[test]
fn quiz_draft_loads_from_generator_json() {
    // Shape the generation pipeline hands over after its own parsing.
    let payload = r#"{
        "name": "Fixture Quiz",
        "syllabus": "serde",
        "difficulty": "hard",
        "timer_minutes": 2,
        "questions": [
            {
                "prompt": "Pick B",
                "options": { "A": "no", "B": "yes", "C": "no", "D": "no" },
                "correct_key": "B",
                "explanation": "B is yes"
            }
        ]
    }"#;

    let draft: QuizDraft = serde_json::from_str(payload).unwrap();
    let quiz = draft.validate().unwrap();
    assert_eq!(quiz.name(), "Fixture Quiz");
    assert_eq!(quiz.difficulty(), Difficulty::Hard);
    assert_eq!(quiz.question_count(), 1);
    assert_eq!(quiz.question(0).unwrap().correct_text(), "yes");

    let mut session = quiz_core::model::Session::new(quiz, fixed_now());
    session.select_answer(OptionKey::B).unwrap();
    let result = session.submit(fixed_now()).unwrap();
    assert!(result.is_perfect());
}

#[test]
fn clock_is_exported_for_embedders() {
    // The view layer constructs services with either clock flavor.
    let system = Clock::default();
    let fixed = fixed_clock();
    assert!(system.now() >= fixed.now());
}
