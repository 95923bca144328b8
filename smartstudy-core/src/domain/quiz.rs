//! Quiz domain model: questions, answers and score tiers

use serde::Serialize;

/// A read-only multiple-choice question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: u32,
    pub question: &'static str,
    pub options: [&'static str; 4],
    /// Index into `options` of the right answer
    pub correct: usize,
}

impl Question {
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct
    }
}

/// The bundled question bank
pub const QUESTION_BANK: [Question; 5] = [
    Question {
        id: 1,
        question: "What is the most effective study technique for long-term retention?",
        options: [
            "Cramming the night before",
            "Spaced repetition over time",
            "Reading notes once",
            "Highlighting everything",
        ],
        correct: 1,
    },
    Question {
        id: 2,
        question: "Which environment is best for focused studying?",
        options: [
            "Noisy coffee shop",
            "Bed with TV on",
            "Quiet, well-lit space",
            "While listening to music",
        ],
        correct: 2,
    },
    Question {
        id: 3,
        question: "How long should study sessions typically last for optimal focus?",
        options: [
            "6-8 hours continuously",
            "25-50 minutes with breaks",
            "2-3 hours without breaks",
            "10-15 minutes only",
        ],
        correct: 1,
    },
    Question {
        id: 4,
        question: "What is the Feynman Technique?",
        options: [
            "Speed reading method",
            "Memory palace technique",
            "Explaining concepts in simple terms",
            "Group study method",
        ],
        correct: 2,
    },
    Question {
        id: 5,
        question: "When is the best time to review study material?",
        options: [
            "Only during exams",
            "Once a month",
            "Regularly with increasing intervals",
            "Never review, just move forward",
        ],
        correct: 2,
    },
];

/// One graded answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: u32,
    pub selected: usize,
    pub correct: usize,
    pub is_correct: bool,
}

/// Lifecycle of a quiz session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizState {
    NotStarted,
    InProgress,
    Finished,
}

/// Score band chosen by percentage correct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Master,
    Great,
    Good,
    Fair,
    KeepTrying,
}

impl ScoreTier {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            ScoreTier::Master
        } else if percentage >= 80.0 {
            ScoreTier::Great
        } else if percentage >= 70.0 {
            ScoreTier::Good
        } else if percentage >= 60.0 {
            ScoreTier::Fair
        } else {
            ScoreTier::KeepTrying
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ScoreTier::Master => "Excellent! You're a study master! 🌟",
            ScoreTier::Great => "Great job! You know your stuff! 👏",
            ScoreTier::Good => "Good work! Keep studying! 📚",
            ScoreTier::Fair => "Not bad! Room for improvement! 💪",
            ScoreTier::KeepTrying => "Keep studying and try again! 📖",
        }
    }
}

/// Summary of a finished quiz
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub tier: ScoreTier,
    pub message: &'static str,
}

impl QuizResult {
    pub fn new(score: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            score as f64 * 100.0 / total as f64
        };
        let tier = ScoreTier::from_percentage(percentage);
        Self {
            score,
            total,
            percentage,
            tier,
            message: tier.message(),
        }
    }
}

/// Position of the current question, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizProgress {
    pub number: usize,
    pub total: usize,
}

impl QuizProgress {
    pub fn is_last(&self) -> bool {
        self.number == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_is_well_formed() {
        for q in QUESTION_BANK.iter() {
            assert!(q.correct < q.options.len(), "question {} has a bad answer index", q.id);
        }
        let ids: Vec<u32> = QUESTION_BANK.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(ScoreTier::from_percentage(100.0), ScoreTier::Master);
        assert_eq!(ScoreTier::from_percentage(90.0), ScoreTier::Master);
        assert_eq!(ScoreTier::from_percentage(89.9), ScoreTier::Great);
        assert_eq!(ScoreTier::from_percentage(80.0), ScoreTier::Great);
        assert_eq!(ScoreTier::from_percentage(70.0), ScoreTier::Good);
        assert_eq!(ScoreTier::from_percentage(60.0), ScoreTier::Fair);
        assert_eq!(ScoreTier::from_percentage(59.9), ScoreTier::KeepTrying);
        assert_eq!(ScoreTier::from_percentage(0.0), ScoreTier::KeepTrying);
    }

    #[test]
    fn test_result_for_five_questions() {
        assert_eq!(QuizResult::new(5, 5).tier, ScoreTier::Master);
        assert_eq!(QuizResult::new(4, 5).tier, ScoreTier::Great);
        assert_eq!(QuizResult::new(3, 5).tier, ScoreTier::Fair);
        assert_eq!(QuizResult::new(2, 5).tier, ScoreTier::KeepTrying);
    }

    #[test]
    fn test_empty_quiz_result() {
        let result = QuizResult::new(0, 0);
        assert_eq!(result.percentage, 0.0);
        assert_eq!(result.tier, ScoreTier::KeepTrying);
    }
}
