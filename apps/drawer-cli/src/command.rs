//! # Argument Parsing
//!
//! `drawer [--config PATH] [--drawer N] [--json] <command> [args...]`
//!
//! Global flags may appear anywhere on the line.

use std::path::PathBuf;

use drawer_core::{BillingEvent, SubscriptionStatus};

use crate::error::CliError;

pub const USAGE: &str = "\
usage: drawer [--config PATH] [--drawer N] [--json] <command> [args...]

drawer commands (act on the selected drawer, default 1):
  show [N]                     counts, total and goal status
  count <kind> <n>             set the piece count for a denomination
  roll-value <kind> <amount>   set what one roll is worth
  target <amount>              goal float shown in the status line
  checkout-target <amount>     amount to leave in the drawer at checkout
  rolls on|off                 count rolls as their own denominations
  clear [N]                    reset a drawer to defaults
  plan [N]                     what to remove to reach the checkout target
  summary                      every drawer against its target
  select <N>                   check that drawer N is available
  next | prev                  step to the neighbouring drawer
  kinds                        list denomination ids

account commands:
  status                       tier, user and drawer capacity
  dark-mode on|off             account preference
  signup <user-id>             create (or sign in to) an account
  sign-out                     back to a fresh guest drawer
  delete-account --yes         remove the account and its saved drawers

billing events (normally delivered by the payment provider):
  billing checkout <user-id> <customer-id>
  billing subscription <customer-id> <status>
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show { index: Option<usize> },
    Count { kind: String, value: String },
    RollValue { kind: String, value: String },
    Target { value: String },
    CheckoutTarget { value: String },
    Rolls { enabled: bool },
    Clear { index: Option<usize> },
    Plan { index: Option<usize> },
    Summary,
    Select { index: usize },
    Step { delta: isize },
    Kinds,
    Status,
    DarkMode { enabled: bool },
    SignUp { user_id: String },
    SignOut,
    DeleteAccount,
    Billing(BillingEvent),
    Help,
}

impl Command {
    /// Whether the command needs the drawer session at all.
    pub fn needs_session(&self) -> bool {
        !matches!(self, Command::Help | Command::Kinds | Command::Billing(_))
    }
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub config_path: Option<PathBuf>,
    /// Drawer to select before running the command.
    pub drawer: Option<usize>,
    pub json: bool,
}

pub fn parse_args<I>(args: I) -> Result<Invocation, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut config_path = None;
    let mut drawer = None;
    let mut json = false;
    let mut yes = false;
    let mut words = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| CliError::usage("--config needs a path"))?;
                config_path = Some(PathBuf::from(path));
            }
            "--drawer" => {
                let value = args
                    .next()
                    .ok_or_else(|| CliError::usage("--drawer needs a number"))?;
                drawer = Some(parse_index(&value)?);
            }
            "--json" => json = true,
            "--yes" | "-y" => yes = true,
            "--help" | "-h" => words.insert(0, "help".to_string()),
            flag if flag.starts_with("--") => {
                return Err(CliError::usage(format!("unknown flag {}", flag)));
            }
            _ => words.push(arg),
        }
    }

    let command = parse_command(&words, yes)?;
    Ok(Invocation {
        command,
        config_path,
        drawer,
        json,
    })
}

fn parse_command(words: &[String], yes: bool) -> Result<Command, CliError> {
    let Some((name, rest)) = words.split_first() else {
        return Ok(Command::Help);
    };
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

    let command = match (name.as_str(), rest.as_slice()) {
        ("help", _) => Command::Help,
        ("show", [index @ ..]) => Command::Show {
            index: optional_index(index)?,
        },
        ("count", [kind, value]) => Command::Count {
            kind: kind.to_string(),
            value: value.to_string(),
        },
        ("roll-value", [kind, value]) => Command::RollValue {
            kind: kind.to_string(),
            value: value.to_string(),
        },
        ("target", [value]) => Command::Target {
            value: value.to_string(),
        },
        ("checkout-target", [value]) => Command::CheckoutTarget {
            value: value.to_string(),
        },
        ("rolls", [value]) => Command::Rolls {
            enabled: parse_switch(value)?,
        },
        ("clear", [index @ ..]) => Command::Clear {
            index: optional_index(index)?,
        },
        ("plan", [index @ ..]) => Command::Plan {
            index: optional_index(index)?,
        },
        ("summary", []) => Command::Summary,
        ("select", [index]) => Command::Select {
            index: parse_index(index)?,
        },
        ("next", []) => Command::Step { delta: 1 },
        ("prev", []) => Command::Step { delta: -1 },
        ("kinds", []) => Command::Kinds,
        ("status", []) => Command::Status,
        ("dark-mode", [value]) => Command::DarkMode {
            enabled: parse_switch(value)?,
        },
        ("signup", [user_id]) => Command::SignUp {
            user_id: user_id.to_string(),
        },
        ("sign-out", []) => Command::SignOut,
        ("delete-account", []) => {
            if !yes {
                return Err(CliError::usage(
                    "delete-account removes all saved drawers; pass --yes to confirm",
                ));
            }
            Command::DeleteAccount
        }
        ("billing", ["checkout", user_id, customer_id]) => {
            Command::Billing(BillingEvent::CheckoutCompleted {
                user_id: user_id.to_string(),
                customer_id: customer_id.to_string(),
            })
        }
        ("billing", ["subscription", customer_id, status]) => {
            Command::Billing(BillingEvent::SubscriptionChanged {
                customer_id: customer_id.to_string(),
                status: SubscriptionStatus::parse(status),
            })
        }
        (name, _) => {
            return Err(CliError::usage(format!(
                "unrecognized command or arguments: {} (see `drawer help`)",
                name
            )));
        }
    };
    Ok(command)
}

fn optional_index(words: &[&str]) -> Result<Option<usize>, CliError> {
    match words {
        [] => Ok(None),
        [index] => parse_index(index).map(Some),
        _ => Err(CliError::usage("expected at most one drawer number")),
    }
}

/// Drawer numbers start at 1.
fn parse_index(value: &str) -> Result<usize, CliError> {
    match value.parse::<usize>() {
        Ok(index) if index >= 1 => Ok(index),
        _ => Err(CliError::usage(format!(
            "drawer number must be 1 or more, got '{}'",
            value
        ))),
    }
}

fn parse_switch(value: &str) -> Result<bool, CliError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(CliError::usage(format!("expected on or off, got '{}'", other))),
    }
}
