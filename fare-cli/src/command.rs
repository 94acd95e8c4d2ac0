//! Line commands for the interactive session.
//!
//! | Command | Effect |
//! |---------|--------|
//! | `base-old V` / `base-new V` | set a base fare |
//! | `penalty V` / `fee V` | set the airline penalty / service fee |
//! | `flexible yes\|no\|unset` | select flexibility |
//! | `add` | add a tax row |
//! | `remove N` | remove tax row N |
//! | `tax N old\|new V` | set a fare on tax row N |
//! | `code N XX` | set the tax code on row N |
//! | `clear` | reset the whole form |
//! | `show` | print the current summary |
//! | `quit` | end the session |
//!
//! Values are raw field text; anything unparseable counts as zero.

use fare_core::{FareField, FareForm, FareSide, Flexibility, RowCollectionError, RowIndex};
use thiserror::Error;

/// Errors for lines that are not a valid command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("invalid row number '{0}'")]
    InvalidRow(String),

    #[error("expected 'old' or 'new', got '{0}'")]
    InvalidSide(String),

    #[error("unknown flexibility '{0}'")]
    InvalidFlexibility(String),
}

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SetField(FareField, String),
    SetFlexibility(Flexibility),
    AddRow,
    RemoveRow(RowIndex),
    SetTaxFare(RowIndex, FareSide, String),
    SetTaxCode(RowIndex, String),
    Clear,
    Show,
    Quit,
}

/// What the session should do after applying a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Form inputs changed; schedule a recompute.
    Changed,
    /// Form inputs changed, but the command was also rejected in part and
    /// the message should be shown.
    ChangedWithNotice(String),
    /// Nothing changed; show the message.
    Rejected(String),
    /// Print the current summary now.
    Show,
    Quit,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;
        let rest: Vec<&str> = words.collect();

        let value = |command: &'static str| -> Result<String, CommandError> {
            rest.first()
                .map(|v| v.to_string())
                .ok_or(CommandError::MissingArgument {
                    command,
                    expected: "a value",
                })
        };
        let row = |command: &'static str| -> Result<RowIndex, CommandError> {
            let raw = rest.first().ok_or(CommandError::MissingArgument {
                command,
                expected: "a row number",
            })?;
            raw.parse::<u32>()
                .ok()
                .and_then(RowIndex::new)
                .ok_or_else(|| CommandError::InvalidRow(raw.to_string()))
        };

        match name.to_ascii_lowercase().as_str() {
            "base-old" => Ok(Self::SetField(FareField::BaseOldFare, value("base-old")?)),
            "base-new" => Ok(Self::SetField(FareField::BaseNewFare, value("base-new")?)),
            "penalty" => Ok(Self::SetField(FareField::AirlinePenalty, value("penalty")?)),
            "fee" => Ok(Self::SetField(FareField::ServiceFee, value("fee")?)),
            "flexible" => {
                let raw = rest.first().copied().unwrap_or("");
                Flexibility::parse(raw)
                    .map(Self::SetFlexibility)
                    .ok_or_else(|| CommandError::InvalidFlexibility(raw.to_string()))
            }
            "add" => Ok(Self::AddRow),
            "remove" => Ok(Self::RemoveRow(row("remove")?)),
            "tax" => {
                let index = row("tax")?;
                let side = match rest.get(1).map(|s| s.to_ascii_lowercase()) {
                    Some(s) if s == "old" => FareSide::Old,
                    Some(s) if s == "new" => FareSide::New,
                    Some(s) => return Err(CommandError::InvalidSide(s)),
                    None => {
                        return Err(CommandError::MissingArgument {
                            command: "tax",
                            expected: "'old' or 'new'",
                        });
                    }
                };
                // A missing value clears the field, like emptying an input.
                let raw = rest.get(2).map(|v| v.to_string()).unwrap_or_default();
                Ok(Self::SetTaxFare(index, side, raw))
            }
            "code" => {
                let index = row("code")?;
                let raw = rest.get(1).map(|v| v.to_string()).unwrap_or_default();
                Ok(Self::SetTaxCode(index, raw))
            }
            "clear" => Ok(Self::Clear),
            "show" => Ok(Self::Show),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// Applies the command to the form.
    pub fn apply(
        &self,
        form: &mut FareForm,
    ) -> Outcome {
        match self {
            Self::SetField(field, raw) => {
                form.set_field(*field, raw);
                Outcome::Changed
            }
            Self::SetFlexibility(flexibility) => {
                form.set_flexibility(*flexibility);
                Outcome::Changed
            }
            Self::AddRow => match form.add_tax_row() {
                Ok(_) => Outcome::Changed,
                Err(RowCollectionError::MaxRowsExceeded(max)) => {
                    Outcome::Rejected(crate::report::max_rows_alert(max))
                }
                Err(e) => Outcome::Rejected(e.to_string()),
            },
            Self::RemoveRow(index) => match form.remove_tax_row(*index) {
                Ok(()) => Outcome::Changed,
                Err(e) => Outcome::Rejected(e.to_string()),
            },
            Self::SetTaxFare(index, side, raw) => match form.set_tax_fare(*index, *side, raw) {
                Ok(()) => Outcome::Changed,
                Err(e) => Outcome::Rejected(e.to_string()),
            },
            Self::SetTaxCode(index, raw) => match form.set_tax_code(*index, raw) {
                Ok(()) if raw.chars().count() > fare_core::TaxRow::TAX_CODE_LEN => {
                    Outcome::ChangedWithNotice(format!(
                        "tax code truncated to {} characters",
                        fare_core::TaxRow::TAX_CODE_LEN
                    ))
                }
                Ok(()) => Outcome::Changed,
                Err(e) => Outcome::Rejected(e.to_string()),
            },
            Self::Clear => {
                form.clear();
                Outcome::Changed
            }
            Self::Show => Outcome::Show,
            Self::Quit => Outcome::Quit,
        }
    }
}
