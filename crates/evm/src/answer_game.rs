// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    bindings::AnswerGame,
    provider::{confirmed, NONCE_LOCK},
    AnswerRecord, ProviderType, Question, QuizContract, ReadWrite, UserStats,
};
use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
use async_trait::async_trait;
use eyre::{eyre, Result};

/// Read-only calls on the game contract
#[async_trait]
pub trait AnswerGameRead: Send + Sync {
    fn address(&self) -> Address;

    /// Whether any bytecode is deployed at the contract address
    async fn has_code(&self) -> Result<bool>;

    async fn question_count(&self) -> Result<u64>;

    async fn get_question(&self, question_id: u64) -> Result<Question>;

    async fn get_user_stats(&self, user: Address) -> Result<UserStats>;

    /// Page of a user's answers in submission order
    async fn get_user_answers(
        &self,
        user: Address,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<AnswerRecord>>;

    /// Ciphertext handle stored for the user's answer at `answer_index`
    async fn get_encrypted_answer(&self, user: Address, answer_index: u64) -> Result<B256>;
}

/// State-changing calls on the game contract. Each call waits for the receipt.
#[async_trait]
pub trait AnswerGameWrite: Send + Sync {
    async fn submit_answer(
        &self,
        question_id: u64,
        handle: B256,
        input_proof: Bytes,
    ) -> Result<TxHash>;

    /// Plaintext entrypoint used when no coprocessor is available
    async fn submit_answer_mock(&self, question_id: u64, answer: u32) -> Result<TxHash>;

    async fn verify_answer(&self, answer_index: u64, decrypted_answer: u32) -> Result<TxHash>;

    async fn reset_daily_limit(&self) -> Result<TxHash>;
}

#[async_trait]
impl<T> AnswerGameRead for QuizContract<T>
where
    T: ProviderType,
{
    fn address(&self) -> Address {
        self.contract_address
    }

    async fn has_code(&self) -> Result<bool> {
        self.code_deployed().await
    }

    async fn question_count(&self) -> Result<u64> {
        let contract = AnswerGame::new(self.contract_address, &self.provider);
        let count = contract.questionCount().call().await?;
        u64::try_from(count).map_err(|_| eyre!("question count {count} out of range"))
    }

    async fn get_question(&self, question_id: u64) -> Result<Question> {
        let contract = AnswerGame::new(self.contract_address, &self.provider);
        let question = contract
            .getQuestion(U256::from(question_id))
            .call()
            .await?;
        Ok(question.into())
    }

    async fn get_user_stats(&self, user: Address) -> Result<UserStats> {
        let contract = AnswerGame::new(self.contract_address, &self.provider);
        let stats = contract.getUserStats(user).call().await?;
        Ok(stats.into())
    }

    async fn get_user_answers(
        &self,
        user: Address,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<AnswerRecord>> {
        let contract = AnswerGame::new(self.contract_address, &self.provider);
        let answers = contract
            .getUserAnswers(user, U256::from(offset), U256::from(limit))
            .call()
            .await?;
        Ok(answers.into_iter().map(Into::into).collect())
    }

    async fn get_encrypted_answer(&self, user: Address, answer_index: u64) -> Result<B256> {
        let contract = AnswerGame::new(self.contract_address, &self.provider);
        let handle = contract
            .getEncryptedAnswer(user, U256::from(answer_index))
            .call()
            .await?;
        Ok(handle)
    }
}

#[async_trait]
impl AnswerGameWrite for QuizContract<ReadWrite> {
    async fn submit_answer(
        &self,
        question_id: u64,
        handle: B256,
        input_proof: Bytes,
    ) -> Result<TxHash> {
        let _guard = NONCE_LOCK.lock().await;
        let contract = AnswerGame::new(self.contract_address, &self.provider);
        let receipt = contract
            .submitAnswer(U256::from(question_id), handle, input_proof)
            .send()
            .await?
            .get_receipt()
            .await?;
        confirmed(receipt, "submitAnswer")
    }

    async fn submit_answer_mock(&self, question_id: u64, answer: u32) -> Result<TxHash> {
        let _guard = NONCE_LOCK.lock().await;
        let contract = AnswerGame::new(self.contract_address, &self.provider);
        let receipt = contract
            .submitAnswerMock(U256::from(question_id), answer)
            .send()
            .await?
            .get_receipt()
            .await?;
        confirmed(receipt, "submitAnswerMock")
    }

    async fn verify_answer(&self, answer_index: u64, decrypted_answer: u32) -> Result<TxHash> {
        let _guard = NONCE_LOCK.lock().await;
        let contract = AnswerGame::new(self.contract_address, &self.provider);
        let receipt = contract
            .verifyAnswer(U256::from(answer_index), decrypted_answer)
            .send()
            .await?
            .get_receipt()
            .await?;
        confirmed(receipt, "verifyAnswer")
    }

    async fn reset_daily_limit(&self) -> Result<TxHash> {
        let _guard = NONCE_LOCK.lock().await;
        let contract = AnswerGame::new(self.contract_address, &self.provider);
        let receipt = contract
            .resetDailyLimit()
            .send()
            .await?
            .get_receipt()
            .await?;
        confirmed(receipt, "resetDailyLimit")
    }
}
