//! Quiz command - interactive study skills quiz

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Confirm, Select};
use smartstudy_core::{LogEvent, QuizState, ScoreTier};

use super::{get_context, get_logger, log_event};
use crate::output;

pub fn run() -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context(logger.clone())?;
    let quiz = ctx.quiz_mut()?;

    quiz.start();
    log_event(&logger, LogEvent::new("quiz_started").with_command("quiz"));

    while quiz.state() == QuizState::InProgress {
        let progress = quiz.progress()?;
        let question = *quiz.current_question()?;

        println!();
        println!(
            "{}",
            format!("Question {} of {}", progress.number, progress.total).dimmed()
        );
        let selected = Select::new()
            .with_prompt(question.question)
            .items(&question.options)
            .default(0)
            .interact()?;

        let record = quiz.submit_answer(selected)?;
        if record.is_correct {
            println!("{} Correct!", "✓".green());
        } else {
            println!(
                "{} Incorrect. The correct answer is: {}",
                "✗".red(),
                question.options[record.correct].bold()
            );
        }

        let label = if progress.is_last() { "Show Results" } else { "Next Question" };
        if !Confirm::new().with_prompt(label).default(true).interact()? {
            println!("{}", "Quiz abandoned".dimmed());
            return Ok(());
        }
        quiz.advance()?;
    }

    let result = quiz.result()?;
    log_event(&logger, LogEvent::new("quiz_completed").with_command("quiz"));

    println!();
    println!("{}", "Quiz Complete!".bold());
    println!(
        "Your score: {}/{} ({:.0}%)",
        result.score, result.total, result.percentage
    );
    match result.tier {
        ScoreTier::Master | ScoreTier::Great => output::success(result.message),
        ScoreTier::Good | ScoreTier::Fair => output::info(result.message),
        ScoreTier::KeepTrying => output::warning(result.message),
    }

    Ok(())
}
