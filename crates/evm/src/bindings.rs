// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Solidity bindings for the quiz contracts

use alloy::sol;

sol! {
    #[derive(Debug)]
    struct Question {
        uint256 id;
        string questionText;
        string[] options;
        uint32 correctAnswer;
        uint8 difficulty;
        bool isActive;
    }

    #[derive(Debug)]
    struct UserStats {
        uint256 totalAnswered;
        uint256 correctAnswers;
        uint256 totalReward;
        uint256 dailyAnswers;
        uint256 lastAnswerDate;
    }

    #[derive(Debug)]
    struct UserAnswer {
        uint256 questionId;
        bytes32 encryptedAnswer;
        bool isCorrect;
        bool isVerified;
        uint256 timestamp;
        uint256 reward;
    }

    #[derive(Debug)]
    struct LeaderboardEntry {
        address user;
        uint256 score;
        uint256 correctAnswers;
        uint256 totalAnswered;
        uint256 totalReward;
        uint256 rank;
    }

    #[derive(Debug)]
    #[sol(rpc)]
    contract AnswerGame {
        function questionCount() external view returns (uint256);
        function getQuestion(uint256 questionId) external view returns (Question memory);
        function getUserStats(address user) external view returns (UserStats memory);
        function getUserAnswers(address user, uint256 offset, uint256 limit) external view returns (UserAnswer[] memory);
        function getEncryptedAnswer(address user, uint256 answerIndex) external view returns (bytes32);
        function submitAnswer(uint256 questionId, bytes32 encryptedAnswer, bytes calldata inputProof) external;
        function submitAnswerMock(uint256 questionId, uint32 answer) external;
        function verifyAnswer(uint256 answerIndex, uint32 decryptedAnswer) external;
        function resetDailyLimit() external;
    }

    #[derive(Debug)]
    #[sol(rpc)]
    contract Leaderboard {
        function getLeaderboard(uint8 leaderboardType, uint256 offset, uint256 limit) external view returns (LeaderboardEntry[] memory);
        function getUserRank(uint8 leaderboardType, address user) external view returns (uint256);
    }

    #[derive(Debug)]
    #[sol(rpc)]
    contract AnswerToken {
        function balanceOf(address account) external view returns (uint256);
    }
}
