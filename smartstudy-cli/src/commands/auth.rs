//! Account commands - register, login, logout, whoami

use std::thread;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password};
use serde_json::json;
use smartstudy_core::{Error, LogEvent};

use super::{get_context, get_logger, log_failure};
use crate::output;

fn prompt_text(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::<String>::new().with_prompt(prompt).interact_text()?),
    }
}

fn prompt_password(value: Option<String>) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Password::new().with_prompt("Password").interact()?),
    }
}

pub fn register(
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    no_login: bool,
) -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context(logger.clone())?;

    let name = prompt_text(name, "Full name")?;
    let email = prompt_text(email, "Email")?;
    // Fail before asking for a password nobody will use
    if ctx.accounts.find_by_email(&email).is_some() {
        return Err(Error::DuplicateEmail.into());
    }
    let password = prompt_password(password)?;

    if let Err(e) = ctx.register(&name, &email, &password) {
        log_failure(
            &logger,
            LogEvent::new("register_failed").with_command("register"),
            &e,
        );
        return Err(e.into());
    }
    output::success("Account created successfully!");

    if no_login || !ctx.config.auto_login_after_register {
        println!("{}", "Log in with `study login`.".dimmed());
        return Ok(());
    }

    output::info("Logging you in...");
    thread::sleep(Duration::from_millis(ctx.config.auto_login_delay_ms));
    let user = ctx.login(&email, &password)?;
    output::success(&format!("Welcome back, {}!", user.name));

    Ok(())
}

pub fn login(email: Option<String>, password: Option<String>) -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context(logger.clone())?;

    let email = prompt_text(email, "Email")?;
    let password = prompt_password(password)?;

    match ctx.login(&email, &password) {
        Ok(user) => {
            output::success(&format!("Welcome back, {}!", user.name));
            Ok(())
        }
        Err(e) => {
            log_failure(&logger, LogEvent::new("login_failed").with_command("login"), &e);
            Err(e.into())
        }
    }
}

pub fn logout() -> Result<()> {
    let mut ctx = get_context(get_logger())?;

    if !ctx.is_authenticated() {
        output::warning("Not logged in");
        return Ok(());
    }

    ctx.logout()?;
    output::success("Logged out successfully");
    Ok(())
}

pub fn whoami(json: bool) -> Result<()> {
    let ctx = get_context(get_logger())?;
    let user = ctx.current_user().ok_or(Error::NoActiveSession)?;

    if json {
        // Never print the stored password
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "id": user.id,
                "name": user.name,
                "email": user.email,
                "createdAt": user.created_at.timestamp_millis(),
            }))?
        );
        return Ok(());
    }

    println!("{}", user.name.bold());
    println!("  Email: {}", user.email);
    println!("  Member since: {}", output::format_date(&user.created_at));
    println!("  Notes: {}", ctx.notes()?.len());
    Ok(())
}
