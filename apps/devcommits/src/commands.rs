//! Line commands typed at the prompt, mapped onto controller actions.

use client_core::{Notice, ViewController};
use shared::domain::{Category, UnknownCategory};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  email <value>            set the login email
  password <value>         set the login password
  login [<email> <pass>]   sign in
  logout                   sign out
  message <text>           set the commit message
  description <text>       set the description
  type <category>          Feature | Fix | Refactor | Design | Crash
  tags <a, b, c>           comma-separated tags
  post                     post the commit
  reload                   reload the list
  help                     show this help
  quit                     leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Email(String),
    Password(String),
    Login(Option<(String, String)>),
    Logout,
    Message(String),
    Description(String),
    Type(Category),
    Tags(String),
    Post,
    Reload,
    Help,
    Quit,
    Nothing,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error("'{0}' needs a value")]
    MissingValue(&'static str),
    #[error("usage: login [<email> <password>]")]
    LoginUsage,
    #[error(transparent)]
    Category(#[from] UnknownCategory),
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Nothing);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let required = |name: &'static str| {
        if rest.is_empty() {
            Err(CommandError::MissingValue(name))
        } else {
            Ok(rest.to_string())
        }
    };

    match verb.to_ascii_lowercase().as_str() {
        "email" => required("email").map(Command::Email),
        "password" => required("password").map(Command::Password),
        "login" => {
            let parts: Vec<&str> = rest.split_whitespace().collect();
            match parts.as_slice() {
                [] => Ok(Command::Login(None)),
                [email, password] => Ok(Command::Login(Some((
                    email.to_string(),
                    password.to_string(),
                )))),
                _ => Err(CommandError::LoginUsage),
            }
        }
        "logout" => Ok(Command::Logout),
        "message" | "msg" => required("message").map(Command::Message),
        // Description and tags may be cleared with an empty value.
        "description" | "desc" => Ok(Command::Description(rest.to_string())),
        "type" => Ok(Command::Type(required("type")?.parse()?)),
        "tags" => Ok(Command::Tags(rest.to_string())),
        "post" => Ok(Command::Post),
        "reload" | "refresh" => Ok(Command::Reload),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(verb.to_string())),
    }
}

/// Applies one command. Action failures are already reflected in the
/// controller's notice, so they are not propagated.
pub async fn apply(controller: &mut ViewController, command: Command) {
    match command {
        Command::Email(v) => controller.state_mut().credentials.email = v,
        Command::Password(v) => controller.state_mut().credentials.password = v,
        Command::Login(fields) => {
            if let Some((email, password)) = fields {
                let credentials = &mut controller.state_mut().credentials;
                credentials.email = email;
                credentials.password = password;
            }
            let _ = controller.sign_in().await;
        }
        Command::Logout => controller.sign_out().await,
        Command::Message(v) => controller.state_mut().draft.message = v,
        Command::Description(v) => controller.state_mut().draft.description = v,
        Command::Type(category) => controller.state_mut().draft.category = category,
        Command::Tags(v) => controller.state_mut().draft.tags = v,
        Command::Post => {
            let _ = controller.submit_entry().await;
        }
        Command::Reload => {
            let _ = controller.load_entries().await;
        }
        Command::Help => controller.state_mut().notice = Some(Notice::Info(HELP.to_string())),
        Command::Quit | Command::Nothing => {}
    }
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
