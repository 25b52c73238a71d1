use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug)]
pub struct QuizQuestion {
    pub id: &'static str,
    pub q: &'static str,
    pub choices: &'static [&'static str],
    pub answer: i64,
    pub explanation: &'static str,
}

pub static QUIZ: &[QuizQuestion] = &[
    QuizQuestion {
        id: "q1",
        q: "Which of these will typically reduce your taxable income?",
        choices: &[
            "Standard deduction / tax-exempt contributions",
            "Increasing your gross salary",
            "Ignoring receipts",
        ],
        answer: 0,
        explanation: "Contributions to certain retirement/savings and allowed deductions reduce taxable income.",
    },
    QuizQuestion {
        id: "q2",
        q: "If you prepay a high-interest credit card, you are:",
        choices: &[
            "Reducing future interest expense",
            "Increasing interest expense",
            "Decreasing credit score instantly",
        ],
        answer: 0,
        explanation: "Paying down high-interest debt reduces interest charges going forward.",
    },
    QuizQuestion {
        id: "q3",
        q: "Loan amortization means:",
        choices: &[
            "Gradually paying principal + interest over time",
            "A one-time fee",
            "A tax",
        ],
        answer: 0,
        explanation: "Amortization is the schedule of paying both interest and principal over time.",
    },
];

/// A question as shown to the player, without its answer key.
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub id: &'static str,
    pub q: &'static str,
    pub choices: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionFeedback {
    pub id: &'static str,
    pub correct: bool,
    pub explanation: &'static str,
    pub correct_choice_index: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizScore {
    pub score: usize,
    pub out_of: usize,
    pub feedback: Vec<QuestionFeedback>,
}

pub fn public_questions() -> Vec<PublicQuestion> {
    QUIZ.iter()
        .map(|question| PublicQuestion {
            id: question.id,
            q: question.q,
            choices: question.choices,
        })
        .collect()
}

/// Unanswered questions are scored as wrong.
pub fn score_quiz(answers: &HashMap<String, i64>) -> QuizScore {
    let feedback: Vec<QuestionFeedback> = QUIZ
        .iter()
        .map(|question| QuestionFeedback {
            id: question.id,
            correct: answers.get(question.id) == Some(&question.answer),
            explanation: question.explanation,
            correct_choice_index: question.answer,
        })
        .collect();

    QuizScore {
        score: feedback.iter().filter(|item| item.correct).count(),
        out_of: QUIZ.len(),
        feedback,
    }
}
