//! Terminal host for the controller and submitters.
//!
//! The CLI drives the same [`Page`] and [`Region`] capabilities a browser
//! page would, rendered as plain lines:
//!
//! ```text
//! ! Recipe deleted successfully.            alert
//! → /dashboard                              navigation
//! ↻ reload                                  reload
//! [ok] Username updated successfully        inline message (success)
//! [error] An error occurred: ...            inline message (error)
//! Cookbook: Remove from Cookbook            cookbook button
//! Tests passed (exit code 0)                banner, tags stripped
//! ```
//!
//! Loaded collections are listed as one numbered line per card:
//!
//! ```text
//! 001 Pasta Carbonara → /recipe/Pasta-Carbonara
//! 002 Penne Arrabbiata → /recipe/Penne-Arrabbiata
//!
//! Loaded 2 recipes
//! ```
//!
//! # Architecture
//!
//! Every display has a `format_*` function (returns `String` or
//! `Vec<String>`) for testability and a `print_*` wrapper or trait method
//! that writes it. Format functions are pure: no I/O, no side effects.

use crate::actions::ActionOutcome;
use crate::collection::{CardAction, LoadOutcome};
use crate::page::{CookbookButton, Page, Region, Tone};
use maud::Markup;
use std::io::{self, BufRead, Write};
use std::sync::Mutex;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Strip HTML tags from a string (simple angle-bracket stripping).
fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

fn unescape_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

// ============================================================================
// Page effects
// ============================================================================

pub fn format_alert(message: &str) -> String {
    format!("! {message}")
}

pub fn format_navigation(location: &str) -> String {
    format!("→ {location}")
}

pub fn format_message(text: &str, tone: Tone) -> String {
    let tag = match tone {
        Tone::Success => "ok",
        Tone::Error => "error",
    };
    format!("[{tag}] {text}")
}

pub fn format_cookbook_button(button: CookbookButton) -> String {
    format!("Cookbook: {}", button.label())
}

/// Banner markup flattened to its text, one line per non-blank line.
///
/// ```text
/// Tests failed (exit code 1)
/// 1 failed, 7 passed
/// ```
pub fn format_banner(banner: &str) -> Vec<String> {
    let blocks = banner.replace("<p", "\n<p");
    unescape_entities(&strip_html_tags(&blocks))
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// `y` or `yes`, case-insensitive, accepts; anything else declines.
pub fn parse_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

// ============================================================================
// Collections and outcomes
// ============================================================================

/// One numbered line per rendered card, then a count.
pub fn format_load_outcome(outcome: &LoadOutcome) -> Vec<String> {
    match outcome {
        LoadOutcome::Rendered(actions) => {
            let mut lines: Vec<String> = actions
                .iter()
                .enumerate()
                .map(|(i, a)| format_card_action(i + 1, a))
                .collect();
            if !lines.is_empty() {
                lines.push(String::new());
            }
            let noun = if actions.len() == 1 { "recipe" } else { "recipes" };
            lines.push(format!("Loaded {} {noun}", actions.len()));
            lines
        }
        LoadOutcome::Failed => vec!["Error loading recipes.".to_string()],
        LoadOutcome::Superseded => vec!["Superseded by a newer request".to_string()],
    }
}

fn format_card_action(index: usize, action: &CardAction) -> String {
    format!(
        "{} {} → {}",
        format_index(index),
        action.recipe_name,
        action.target
    )
}

/// Print the collection listing to stderr, keeping stdout for the HTML.
pub fn print_load_outcome(outcome: &LoadOutcome) {
    for line in format_load_outcome(outcome) {
        eprintln!("{}", line);
    }
}

pub fn format_action_outcome(outcome: ActionOutcome) -> Option<&'static str> {
    match outcome {
        ActionOutcome::Completed => None,
        ActionOutcome::Failed => Some("Action failed"),
        ActionOutcome::Declined => Some("Cancelled"),
        ActionOutcome::Invalid => Some("Nothing sent: form is incomplete"),
    }
}

// ============================================================================
// Terminal page and captured region
// ============================================================================

/// [`Page`] that prints every effect as a line on stdout. Confirmation
/// prompts read an answer from stdin unless `assume_yes` is set.
pub struct TerminalPage {
    assume_yes: bool,
}

impl TerminalPage {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    fn ask(&self, prompt: &str) -> io::Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{prompt} [y/N] ")?;
        stdout.flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(parse_confirmation(&answer))
    }
}

impl Page for TerminalPage {
    fn alert(&self, message: &str) {
        println!("{}", format_alert(message));
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            println!("{prompt} [y/N] y");
            return true;
        }
        self.ask(prompt).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read confirmation, declining");
            false
        })
    }

    fn navigate(&self, location: &str) {
        println!("{}", format_navigation(location));
    }

    fn reload(&self) {
        println!("↻ reload");
    }

    fn show_message(&self, text: &str, tone: Tone) {
        println!("{}", format_message(text, tone));
    }

    fn set_cookbook_button(&self, button: CookbookButton) {
        println!("{}", format_cookbook_button(button));
    }

    fn show_banner(&self, banner: Markup) {
        for line in format_banner(&banner.into_string()) {
            println!("{}", line);
        }
    }

    fn dismiss_banner(&self) {
        tracing::debug!("banner dismissed");
    }
}

/// [`Region`] holding the latest fragment in memory; the CLI writes it out
/// once the load settles.
#[derive(Default)]
pub struct CapturedRegion {
    content: Mutex<Option<Markup>>,
}

impl CapturedRegion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_markup(self) -> Option<Markup> {
        self.content.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl Region for CapturedRegion {
    fn replace(&self, content: Markup) {
        let mut slot = self.content.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(content);
    }
}

// ============================================================================
// Tests
// ============================================================================
