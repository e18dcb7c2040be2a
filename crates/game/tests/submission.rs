// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use quiz_fhevm::{FhevmInstance, MockFhevmInstance, WalletSigner};
use quiz_game::{AnswerMark, GameSettings, QuizError, QuizGame, SharedState, VerificationOutcome};
use quiz_storage::{InMemoryStringStorage, StoreKeys, StringStorage};
use quiz_test_helpers::{
    fake_contracts, question, FakeAnswerGame, LocalFhevm, TestSigner, FAKE_GAME_ADDRESS,
};
use std::sync::Arc;
use tracing_test::traced_test;

const CHAIN_ID: u64 = 31337;

struct Harness {
    game: QuizGame,
    fake: Arc<FakeAnswerGame>,
    signer: Arc<TestSigner>,
    storage: Arc<InMemoryStringStorage>,
}

fn harness(instance: Option<Arc<dyn FhevmInstance>>) -> Harness {
    let signer = Arc::new(TestSigner::random());
    let fake = Arc::new(FakeAnswerGame::new(
        signer.address(),
        vec![
            question(0, "What is 0?", 0),
            question(1, "What is 2?", 2),
            question(2, "What is 3?", 3),
        ],
    ));
    let storage = Arc::new(InMemoryStringStorage::new());
    let game = QuizGame::new(
        CHAIN_ID,
        &GameSettings::default(),
        fake_contracts(fake.clone(), None, None),
        instance,
        Some(signer.clone() as Arc<dyn WalletSigner>),
        storage.clone(),
        SharedState::default(),
    );
    Harness {
        game,
        fake,
        signer,
        storage,
    }
}

fn simulation() -> Arc<dyn FhevmInstance> {
    Arc::new(MockFhevmInstance::new(CHAIN_ID, Address::ZERO))
}

#[tokio::test]
async fn test_simulation_submit_scenario() -> Result<(), QuizError> {
    let h = harness(Some(simulation()));
    h.game.load_questions().await;

    let outcome = h.game.submit_answer(0, 0).await?;
    assert!(outcome.ok);
    assert_eq!(outcome.correct_answer, Some(0));
    assert_eq!(
        h.game.state().read().await.answered.get(&0),
        Some(&AnswerMark { ok: true })
    );

    let again = h.game.submit_answer(0, 1).await;
    assert!(matches!(again, Err(QuizError::ChainRejected(_))));

    let state = h.game.state().snapshot().await;
    assert_eq!(state.answered.get(&0), Some(&AnswerMark { ok: true }));
    assert!(matches!(state.error, Some(QuizError::ChainRejected(_))));
    assert!(!state.is_loading());

    assert_eq!(h.fake.mock_submit_count(), 2);
    assert_eq!(h.fake.submit_count(), 0);
    assert_eq!(h.fake.verification_count(), 0);
    assert!(h.game.wait_for_verifications().await.is_empty());
    assert_eq!(h.signer.prompts(), 0);
    Ok(())
}

#[tokio::test]
async fn test_simulation_refreshes_stats() -> Result<(), QuizError> {
    let h = harness(Some(simulation()));
    h.game.load_questions().await;

    h.game.submit_answer(1, 2).await?;
    h.game.submit_answer(2, 0).await?;

    let state = h.game.state().snapshot().await;
    let stats = state.user_stats.clone().unwrap_or_default();
    assert_eq!(stats.total_answered, 2);
    assert_eq!(stats.correct_answers, 1);
    assert_eq!(state.user_answers.len(), 2);
    assert_eq!(h.game.accuracy().await, 50.0);
    assert_eq!(
        state.answered.get(&2),
        Some(&AnswerMark { ok: false })
    );
    Ok(())
}

#[tokio::test]
async fn test_simulation_decrypt_is_skipped() -> Result<(), QuizError> {
    let h = harness(Some(simulation()));
    assert_eq!(
        h.game.decrypt_and_verify(0).await?,
        VerificationOutcome::Skipped
    );
    assert_eq!(h.signer.prompts(), 0);
    Ok(())
}

#[tokio::test]
async fn test_production_submit_verifies_in_background() -> Result<(), QuizError> {
    let fhevm = Arc::new(LocalFhevm::new(CHAIN_ID, Address::ZERO));
    let h = harness(Some(fhevm.clone() as Arc<dyn FhevmInstance>));
    h.game.load_questions().await;

    let outcome = h.game.submit_answer(1, 2).await?;
    assert!(outcome.ok);
    assert_eq!(h.fake.submit_count(), 1);
    assert_eq!(h.fake.mock_submit_count(), 0);

    let outcomes = h.game.wait_for_verifications().await;
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(
        outcomes[0],
        Ok(VerificationOutcome::Verified {
            answer_index: 0,
            plaintext: 2,
            ..
        })
    ));

    assert_eq!(fhevm.decryption_count(), 1);
    assert_eq!(h.fake.verification_count(), 1);
    assert_eq!(h.fake.answers_of(h.signer.address())[0].is_correct, Some(true));
    assert_eq!(h.fake.stats_of(h.signer.address()).correct_answers, 1);
    Ok(())
}

#[tokio::test]
async fn test_production_grant_is_signed_once() -> Result<(), QuizError> {
    let fhevm = Arc::new(LocalFhevm::new(CHAIN_ID, Address::ZERO));
    let h = harness(Some(fhevm.clone() as Arc<dyn FhevmInstance>));
    h.game.load_questions().await;

    h.game.submit_answer(0, 0).await?;
    h.game.wait_for_verifications().await;
    h.game.submit_answer(2, 1).await?;
    let outcomes = h.game.wait_for_verifications().await;

    assert!(matches!(
        outcomes[0],
        Ok(VerificationOutcome::Verified {
            answer_index: 1,
            plaintext: 1,
            ..
        })
    ));
    assert_eq!(h.signer.prompts(), 1);
    assert_eq!(fhevm.decryption_count(), 2);

    let key =
        StoreKeys::decryption_signature(CHAIN_ID, &h.signer.address(), &[FAKE_GAME_ADDRESS]);
    assert!(h.storage.get_item(&key).await.ok().flatten().is_some());

    let answers = h.fake.answers_of(h.signer.address());
    assert_eq!(answers[0].is_correct, Some(true));
    assert_eq!(answers[1].is_correct, Some(false));
    Ok(())
}

#[tokio::test]
async fn test_not_ready_without_capability() {
    let h = harness(None);
    let result = h.game.submit_answer(0, 0).await;
    assert!(matches!(result, Err(QuizError::NotReady(_))));
    assert!(matches!(
        h.game.state().snapshot().await.error,
        Some(QuizError::NotReady(_))
    ));
    assert_eq!(h.fake.mock_submit_count() + h.fake.submit_count(), 0);
}

#[tokio::test]
async fn test_encryption_failure_submits_nothing() {
    let fhevm = Arc::new(LocalFhevm::new(CHAIN_ID, Address::ZERO));
    fhevm.fail_encryption();
    let h = harness(Some(fhevm as Arc<dyn FhevmInstance>));

    let result = h.game.submit_answer(0, 0).await;
    assert!(matches!(result, Err(QuizError::EncryptionFailure(_))));
    assert_eq!(h.fake.submit_count(), 0);
    assert!(h.game.state().read().await.answered.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_missing_plaintext_is_decryption_failure() -> Result<(), QuizError> {
    let fhevm = Arc::new(LocalFhevm::new(CHAIN_ID, Address::ZERO));
    fhevm.withhold_values();
    let h = harness(Some(fhevm.clone() as Arc<dyn FhevmInstance>));
    h.game.load_questions().await;

    let outcome = h.game.submit_answer(1, 2).await?;
    assert!(outcome.ok);

    let outcomes = h.game.wait_for_verifications().await;
    assert!(matches!(outcomes[0], Err(QuizError::DecryptionFailure(_))));
    assert!(matches!(
        h.game.state().snapshot().await.error,
        Some(QuizError::DecryptionFailure(_))
    ));
    assert_eq!(h.fake.verification_count(), 0);
    assert!(h.fake.answers_of(h.signer.address())[0].is_pending());

    let direct = h.game.decrypt_and_verify(0).await;
    assert!(matches!(direct, Err(QuizError::DecryptionFailure(_))));
    assert!(logs_contain("decryption_failure"));
    Ok(())
}

#[tokio::test]
async fn test_rejected_signature_blocks_verification() -> Result<(), QuizError> {
    let fhevm = Arc::new(LocalFhevm::new(CHAIN_ID, Address::ZERO));
    let h = harness(Some(fhevm.clone() as Arc<dyn FhevmInstance>));
    h.signer.reject_all();
    h.game.load_questions().await;

    h.game.submit_answer(1, 2).await?;
    let outcomes = h.game.wait_for_verifications().await;

    assert!(matches!(
        outcomes[0],
        Err(QuizError::AuthorizationUnavailable(_))
    ));
    assert_eq!(h.signer.prompts(), 1);
    assert_eq!(fhevm.decryption_count(), 0);
    assert_eq!(h.storage.len().await, 0);
    Ok(())
}

#[tokio::test]
async fn test_manual_verify_and_daily_reset() -> Result<(), QuizError> {
    let fhevm = Arc::new(LocalFhevm::new(CHAIN_ID, Address::ZERO));
    let h = harness(Some(fhevm as Arc<dyn FhevmInstance>));
    h.signer.reject_all();
    h.game.load_questions().await;

    h.game.submit_answer(2, 3).await?;
    h.game.wait_for_verifications().await;

    h.game.verify_answer(0, 3).await?;
    let state = h.game.state().snapshot().await;
    assert_eq!(state.user_answers[0].is_correct, Some(true));
    assert_eq!(state.user_stats.as_ref().map(|s| s.daily_answers), Some(1));

    let again = h.game.verify_answer(0, 3).await;
    assert!(matches!(again, Err(QuizError::ChainRejected(_))));

    h.game.reset_daily_limit().await?;
    let stats = h.game.state().snapshot().await.user_stats.unwrap_or_default();
    assert_eq!(stats.daily_answers, 0);
    assert!(h.game.can_answer().await);
    Ok(())
}

#[tokio::test]
async fn test_reset_local_answers() -> Result<(), QuizError> {
    let h = harness(Some(simulation()));
    h.game.load_questions().await;
    h.game.submit_answer(0, 0).await?;
    assert!(!h.game.state().read().await.answered.is_empty());

    h.game.reset_local_answers().await;
    assert!(h.game.state().read().await.answered.is_empty());
    Ok(())
}

/// Lets spawned verifications run until `done` of them reached the contract and finished.
async fn settle(fake: &FakeAnswerGame, done: usize) {
    for _ in 0..100 {
        if fake.verification_count() >= done {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
}

#[tokio::test]
async fn test_finished_verifications_are_not_kept() -> Result<(), QuizError> {
    let fhevm = Arc::new(LocalFhevm::new(CHAIN_ID, Address::ZERO));
    let h = harness(Some(fhevm as Arc<dyn FhevmInstance>));
    h.game.load_questions().await;

    for (n, id) in [0u64, 1, 2].into_iter().enumerate() {
        h.game.submit_answer(id, 0).await?;
        assert_eq!(h.game.pending_verifications(), 1);
        settle(&h.fake, n + 1).await;
    }

    assert_eq!(h.fake.verification_count(), 3);
    assert_eq!(h.signer.prompts(), 1);
    let outcomes = h.game.wait_for_verifications().await;
    assert_eq!(outcomes.len(), 1);
    assert_eq!(h.game.pending_verifications(), 0);
    Ok(())
}

#[tokio::test]
async fn test_repeat_submission_reports_recorded_verdict() -> Result<(), QuizError> {
    let signer = Arc::new(TestSigner::random());
    let fake = Arc::new(FakeAnswerGame::allowing_repeats(
        signer.address(),
        vec![question(1, "What is 2?", 2)],
    ));
    let game = QuizGame::new(
        CHAIN_ID,
        &GameSettings::default(),
        fake_contracts(fake.clone(), None, None),
        Some(simulation()),
        Some(signer as Arc<dyn WalletSigner>),
        Arc::new(InMemoryStringStorage::new()),
        SharedState::default(),
    );
    game.load_questions().await;

    let first = game.submit_answer(1, 0).await?;
    assert!(!first.ok);

    let second = game.submit_answer(1, 2).await?;
    assert!(!second.ok);
    assert_eq!(second.correct_answer, Some(2));
    assert_eq!(
        game.state().read().await.answered.get(&1),
        Some(&AnswerMark { ok: false })
    );
    assert_eq!(fake.mock_submit_count(), 2);
    Ok(())
}
