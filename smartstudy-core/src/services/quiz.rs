//! Quiz engine - one in-memory quiz session
//!
//! NotStarted -> InProgress -> Finished. `start()` always begins a fresh
//! session, whatever the current state.

use crate::domain::result::{Error, Result};
use crate::domain::{
    AnswerRecord, Question, QuizProgress, QuizResult, QuizState, QUESTION_BANK,
};

/// Sequential quiz over a fixed question list
#[derive(Debug, Clone)]
pub struct QuizEngine {
    bank: Vec<Question>,
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
    answers: Vec<AnswerRecord>,
    state: QuizState,
}

impl Default for QuizEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizEngine {
    /// Engine over the bundled question bank
    pub fn new() -> Self {
        Self::with_questions(QUESTION_BANK.to_vec())
    }

    pub fn with_questions(bank: Vec<Question>) -> Self {
        Self {
            bank,
            questions: Vec::new(),
            current_index: 0,
            score: 0,
            answers: Vec::new(),
            state: QuizState::NotStarted,
        }
    }

    /// Reset to the first question, discarding any progress
    pub fn start(&mut self) {
        self.questions = self.bank.clone();
        self.current_index = 0;
        self.score = 0;
        self.answers.clear();
        self.state = if self.questions.is_empty() {
            QuizState::Finished
        } else {
            QuizState::InProgress
        };
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == QuizState::InProgress
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn current_question(&self) -> Result<&Question> {
        if !self.is_active() {
            return Err(Error::QuizNotActive);
        }
        self.questions
            .get(self.current_index)
            .ok_or(Error::QuizNotActive)
    }

    pub fn progress(&self) -> Result<QuizProgress> {
        self.current_question()?;
        Ok(QuizProgress {
            number: self.current_index + 1,
            total: self.questions.len(),
        })
    }

    /// Whether the current question already has an answer
    pub fn is_answered(&self) -> bool {
        match self.questions.get(self.current_index) {
            Some(q) => self.answers.iter().any(|a| a.question_id == q.id),
            None => false,
        }
    }

    /// Grade `selected` against the current question
    ///
    /// The cursor does not move; call `advance()` for the next question.
    pub fn submit_answer(&mut self, selected: usize) -> Result<AnswerRecord> {
        let question = *self.current_question()?;

        if self.is_answered() {
            return Err(Error::AlreadyAnswered(question.id));
        }
        if selected >= question.options.len() {
            return Err(Error::InvalidOption {
                selected,
                available: question.options.len(),
            });
        }

        let record = AnswerRecord {
            question_id: question.id,
            selected,
            correct: question.correct,
            is_correct: question.is_correct(selected),
        };
        if record.is_correct {
            self.score += 1;
        }
        self.answers.push(record.clone());

        Ok(record)
    }

    /// Move past the current question, answered or not
    pub fn advance(&mut self) -> Result<QuizState> {
        if !self.is_active() {
            return Err(Error::QuizNotActive);
        }

        self.current_index += 1;
        if self.current_index >= self.questions.len() {
            self.state = QuizState::Finished;
        }
        Ok(self.state)
    }

    pub fn result(&self) -> Result<QuizResult> {
        if self.state != QuizState::Finished {
            return Err(Error::QuizNotFinished);
        }
        Ok(QuizResult::new(self.score, self.questions.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScoreTier;

    #[test]
    fn test_not_started() {
        let engine = QuizEngine::new();
        assert_eq!(engine.state(), QuizState::NotStarted);
        assert!(matches!(engine.current_question(), Err(Error::QuizNotActive)));
        assert!(matches!(engine.result(), Err(Error::QuizNotFinished)));
    }

    #[test]
    fn test_all_correct() {
        let mut engine = QuizEngine::new();
        engine.start();

        for _ in 0..5 {
            let correct = engine.current_question().unwrap().correct;
            assert!(engine.submit_answer(correct).unwrap().is_correct);
            engine.advance().unwrap();
        }

        let result = engine.result().unwrap();
        assert_eq!(result.score, 5);
        assert_eq!(result.total, 5);
        assert_eq!(result.tier, ScoreTier::Master);
        assert!(!engine.is_active());
    }

    #[test]
    fn test_wrong_then_skip() {
        let mut engine = QuizEngine::new();
        engine.start();

        let wrong = (engine.current_question().unwrap().correct + 1) % 4;
        let record = engine.submit_answer(wrong).unwrap();
        assert!(!record.is_correct);
        assert_eq!(record.question_id, 1);

        while engine.advance().unwrap() == QuizState::InProgress {}

        let result = engine.result().unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.tier, ScoreTier::KeepTrying);
    }

    #[test]
    fn test_second_submission_rejected() {
        let mut engine = QuizEngine::new();
        engine.start();

        let correct = engine.current_question().unwrap().correct;
        engine.submit_answer(correct).unwrap();
        assert!(matches!(
            engine.submit_answer(correct),
            Err(Error::AlreadyAnswered(1))
        ));
        assert_eq!(engine.score(), 1);
        assert_eq!(engine.answers().len(), 1);
    }

    #[test]
    fn test_invalid_option() {
        let mut engine = QuizEngine::new();
        engine.start();
        assert!(matches!(
            engine.submit_answer(4),
            Err(Error::InvalidOption { selected: 4, available: 4 })
        ));
        assert!(!engine.is_answered());
    }

    #[test]
    fn test_progress() {
        let mut engine = QuizEngine::new();
        engine.start();
        assert_eq!(engine.progress().unwrap(), QuizProgress { number: 1, total: 5 });

        for _ in 0..4 {
            engine.advance().unwrap();
        }
        assert!(engine.progress().unwrap().is_last());

        engine.advance().unwrap();
        assert!(engine.progress().is_err());
        assert!(matches!(engine.advance(), Err(Error::QuizNotActive)));
    }

    #[test]
    fn test_restart_discards_progress() {
        let mut engine = QuizEngine::new();
        engine.start();
        let correct = engine.current_question().unwrap().correct;
        engine.submit_answer(correct).unwrap();
        engine.advance().unwrap();

        engine.start();
        assert_eq!(engine.current_index(), 0);
        assert_eq!(engine.score(), 0);
        assert!(engine.answers().is_empty());
        assert_eq!(engine.state(), QuizState::InProgress);
    }

    #[test]
    fn test_empty_bank_finishes_immediately() {
        let mut engine = QuizEngine::with_questions(Vec::new());
        engine.start();
        assert_eq!(engine.state(), QuizState::Finished);
        assert_eq!(engine.result().unwrap().total, 0);
    }
}
