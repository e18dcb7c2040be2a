// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::{address, Address, Bytes, TxHash, B256, U256};
use async_trait::async_trait;
use eyre::{bail, Result};
use quiz_evm::{AnswerGameRead, AnswerGameWrite, AnswerRecord, Question, UserStats};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Mutex, MutexGuard,
    },
};

pub const FAKE_GAME_ADDRESS: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
pub const DAILY_LIMIT: u64 = 10;
/// Reward minted for every correct answer
pub const REWARD_PER_CORRECT: u64 = 10;

#[derive(Default)]
struct Ledger {
    questions: Vec<Question>,
    answers: HashMap<Address, Vec<AnswerRecord>>,
    stats: HashMap<Address, UserStats>,
}

/// In-memory AnswerGame.
///
/// Writes are attributed to `sender`. Each user may answer a question once; a second answer is
/// rejected like the deployed contract does, unless built with [`FakeAnswerGame::allowing_repeats`].
pub struct FakeAnswerGame {
    sender: Address,
    deployed: bool,
    fail_reads: bool,
    allow_repeats: bool,
    ledger: Mutex<Ledger>,
    tx_counter: AtomicU64,
    submits: AtomicUsize,
    mock_submits: AtomicUsize,
    verifications: AtomicUsize,
}

impl FakeAnswerGame {
    pub fn new(sender: Address, questions: Vec<Question>) -> Self {
        Self {
            sender,
            deployed: true,
            fail_reads: false,
            allow_repeats: false,
            ledger: Mutex::new(Ledger {
                questions,
                ..Default::default()
            }),
            tx_counter: AtomicU64::new(0),
            submits: AtomicUsize::new(0),
            mock_submits: AtomicUsize::new(0),
            verifications: AtomicUsize::new(0),
        }
    }

    /// No bytecode at the address
    pub fn undeployed(sender: Address) -> Self {
        Self {
            deployed: false,
            ..Self::new(sender, vec![])
        }
    }

    /// Every read call errors
    pub fn failing_reads(sender: Address, questions: Vec<Question>) -> Self {
        Self {
            fail_reads: true,
            ..Self::new(sender, questions)
        }
    }

    /// Accepts any number of answers to the same question
    pub fn allowing_repeats(sender: Address, questions: Vec<Question>) -> Self {
        Self {
            allow_repeats: true,
            ..Self::new(sender, questions)
        }
    }

    pub fn submit_count(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn mock_submit_count(&self) -> usize {
        self.mock_submits.load(Ordering::SeqCst)
    }

    pub fn verification_count(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }

    pub fn answers_of(&self, user: Address) -> Vec<AnswerRecord> {
        self.ledger().answers.get(&user).cloned().unwrap_or_default()
    }

    pub fn stats_of(&self, user: Address) -> UserStats {
        self.ledger().stats.get(&user).cloned().unwrap_or_default()
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_tx(&self) -> TxHash {
        let n = self.tx_counter.fetch_add(1, Ordering::SeqCst) + 1;
        TxHash::left_padding_from(&n.to_be_bytes())
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads {
            bail!("rpc unavailable");
        }
        Ok(())
    }

    /// Store an answer for `sender`. A known plaintext is judged immediately, otherwise the
    /// answer stays pending until verified.
    fn record(
        &self,
        question_id: u64,
        handle: B256,
        plaintext: Option<u32>,
    ) -> Result<TxHash> {
        let mut ledger = self.ledger();
        let Some(question) = ledger
            .questions
            .iter()
            .find(|q| q.id == question_id && q.active)
            .cloned()
        else {
            bail!("execution reverted: question {question_id} not found");
        };

        let answers = ledger.answers.entry(self.sender).or_default();
        if !self.allow_repeats && answers.iter().any(|a| a.question_id == question_id) {
            bail!("execution reverted: already answered");
        }

        let stats = ledger.stats.entry(self.sender).or_default();
        if stats.daily_answers >= DAILY_LIMIT {
            bail!("execution reverted: daily limit reached");
        }

        let is_correct = plaintext.map(|p| p == question.correct_answer);
        let reward = match is_correct {
            Some(true) => U256::from(REWARD_PER_CORRECT),
            _ => U256::ZERO,
        };
        stats.total_answered += 1;
        stats.daily_answers += 1;
        if is_correct == Some(true) {
            stats.correct_answers += 1;
            stats.total_reward += reward;
        }

        let timestamp = 1_700_000_000 + stats.total_answered;
        stats.last_answer_date = timestamp;
        ledger
            .answers
            .entry(self.sender)
            .or_default()
            .push(AnswerRecord {
                question_id,
                encrypted_answer: handle,
                is_correct,
                timestamp,
                reward,
            });

        Ok(self.next_tx())
    }
}

#[async_trait]
impl AnswerGameRead for FakeAnswerGame {
    fn address(&self) -> Address {
        FAKE_GAME_ADDRESS
    }

    async fn has_code(&self) -> Result<bool> {
        self.check_reads()?;
        Ok(self.deployed)
    }

    async fn question_count(&self) -> Result<u64> {
        self.check_reads()?;
        Ok(self.ledger().questions.len() as u64)
    }

    async fn get_question(&self, question_id: u64) -> Result<Question> {
        self.check_reads()?;
        match self.ledger().questions.get(question_id as usize) {
            Some(question) => Ok(question.clone()),
            None => bail!("execution reverted: question {question_id} not found"),
        }
    }

    async fn get_user_stats(&self, user: Address) -> Result<UserStats> {
        self.check_reads()?;
        Ok(self.stats_of(user))
    }

    async fn get_user_answers(
        &self,
        user: Address,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<AnswerRecord>> {
        self.check_reads()?;
        Ok(self
            .answers_of(user)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn get_encrypted_answer(&self, user: Address, answer_index: u64) -> Result<B256> {
        self.check_reads()?;
        match self.answers_of(user).get(answer_index as usize) {
            Some(answer) => Ok(answer.encrypted_answer),
            None => bail!("execution reverted: answer {answer_index} not found"),
        }
    }
}

#[async_trait]
impl AnswerGameWrite for FakeAnswerGame {
    async fn submit_answer(
        &self,
        question_id: u64,
        handle: B256,
        input_proof: Bytes,
    ) -> Result<TxHash> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        if input_proof.is_empty() {
            bail!("execution reverted: invalid input proof");
        }
        self.record(question_id, handle, None)
    }

    async fn submit_answer_mock(&self, question_id: u64, answer: u32) -> Result<TxHash> {
        self.mock_submits.fetch_add(1, Ordering::SeqCst);
        self.record(question_id, B256::ZERO, Some(answer))
    }

    async fn verify_answer(&self, answer_index: u64, decrypted_answer: u32) -> Result<TxHash> {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        let mut ledger = self.ledger();
        let Some(answer) = ledger
            .answers
            .get(&self.sender)
            .and_then(|answers| answers.get(answer_index as usize))
            .cloned()
        else {
            bail!("execution reverted: answer {answer_index} not found");
        };
        if !answer.is_pending() {
            bail!("execution reverted: already verified");
        }
        let Some(correct_answer) = ledger
            .questions
            .iter()
            .find(|q| q.id == answer.question_id)
            .map(|q| q.correct_answer)
        else {
            bail!("execution reverted: question {} not found", answer.question_id);
        };

        let correct = decrypted_answer == correct_answer;
        let reward = if correct {
            U256::from(REWARD_PER_CORRECT)
        } else {
            U256::ZERO
        };
        if let Some(record) = ledger
            .answers
            .get_mut(&self.sender)
            .and_then(|answers| answers.get_mut(answer_index as usize))
        {
            record.is_correct = Some(correct);
            record.reward = reward;
        }
        if correct {
            let stats = ledger.stats.entry(self.sender).or_default();
            stats.correct_answers += 1;
            stats.total_reward += reward;
        }
        Ok(self.next_tx())
    }

    async fn reset_daily_limit(&self) -> Result<TxHash> {
        self.ledger()
            .stats
            .entry(self.sender)
            .or_default()
            .daily_answers = 0;
        Ok(self.next_tx())
    }
}

/// An active question with four options
pub fn question(id: u64, text: &str, correct_answer: u32) -> Question {
    Question {
        id,
        text: text.to_string(),
        options: ["A", "B", "C", "D"].iter().map(|o| o.to_string()).collect(),
        correct_answer,
        difficulty: 1,
        active: true,
    }
}
