//! Plain-text rendering of the view state.

use std::fmt::{self, Display};

use chrono::{Local, TimeZone};
use client_core::{FormStatus, Notice, SessionStatus, ViewState};
use shared::domain::Entry;

const RULE: &str = "------------------------------------------------------------";

pub fn tag_markers(entry: &Entry) -> Vec<String> {
    entry.tags.iter().map(|tag| format!("#{tag}")).collect()
}

pub fn render_entry<Tz>(entry: &Entry, tz: &Tz) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut lines = vec![
        entry.message.clone(),
        format!(
            "{} • {}",
            entry.category,
            entry
                .created_at
                .with_timezone(tz)
                .format("%Y-%m-%d %H:%M:%S")
        ),
    ];

    if let Some(description) = entry.description() {
        lines.push(description.to_string());
    }

    let markers = tag_markers(entry);
    if !markers.is_empty() {
        lines.push(markers.join(" "));
    }

    lines
}

fn login_button_label(state: &ViewState) -> &'static str {
    match state.session_status() {
        SessionStatus::Authenticating => "Logging in...",
        _ => "Log In",
    }
}

fn post_button_label(state: &ViewState) -> &'static str {
    match state.form_status() {
        FormStatus::Submitting => "Posting...",
        FormStatus::Idle => "Post Commit",
    }
}

struct Screen<'a, Tz> {
    state: &'a ViewState,
    tz: &'a Tz,
}

impl<Tz> fmt::Display for Screen<'_, Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state;

        match state.session() {
            Some(session) => {
                let who = session
                    .email
                    .clone()
                    .unwrap_or_else(|| session.user_id.to_string());
                writeln!(out, "Dev Commits  ({who})  [logout]")?;
            }
            None => writeln!(out, "Dev Commits")?,
        }
        writeln!(out, "{RULE}")?;

        if state.session().is_none() {
            let password_mask = "*".repeat(state.credentials.password.chars().count());
            writeln!(out, "Log In")?;
            writeln!(out, "  email:    {}", state.credentials.email)?;
            writeln!(out, "  password: {password_mask}")?;
            writeln!(out, "  [{}]", login_button_label(state))?;
        } else {
            let draft = &state.draft;
            writeln!(out, "New Commit")?;
            writeln!(out, "  message:     {}", draft.message)?;
            writeln!(out, "  description: {}", draft.description)?;
            writeln!(out, "  type:        {}", draft.category)?;
            writeln!(out, "  tags:        {}", draft.tags)?;
            writeln!(out, "  [{}]", post_button_label(state))?;
        }

        match &state.notice {
            Some(Notice::Info(text)) => writeln!(out, "\n{text}")?,
            Some(Notice::Error(text)) => writeln!(out, "\n! {text}")?,
            None => {}
        }

        writeln!(out, "{RULE}")?;
        if state.entries().is_empty() {
            writeln!(out, "(no commits yet)")?;
        }
        for entry in state.entries() {
            for line in render_entry(entry, self.tz) {
                writeln!(out, "  {line}")?;
            }
            writeln!(out)?;
        }

        Ok(())
    }
}

pub fn render_screen_in<Tz>(state: &ViewState, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    Screen { state, tz }.to_string()
}

pub fn render_screen(state: &ViewState) -> String {
    render_screen_in(state, &Local)
}

/// Progress hook for the controller: shows busy labels while a call is in flight.
pub fn progress_line(state: &ViewState) {
    if state.is_signing_in() {
        println!("{}", login_button_label(state));
    } else if state.is_submitting() {
        println!("{}", post_button_label(state));
    }
}

#[cfg(test)]
#[path = "../tests/render_tests.rs"]
mod tests;
