//! # Presentation Binder
//!
//! Pure projection from request states to a view model. Same input, same
//! view; nothing here talks to the chain or the notifier.
//!
//! ## Rules
//!
//! | State                          | View                               |
//! |--------------------------------|------------------------------------|
//! | guesses `Ready(list)`          | table (empty list, empty table)    |
//! | guesses otherwise, loading     | disabled field, "Loading…"         |
//! | no contract handle             | disabled field, "Loading…"         |
//! | guesses `Failed` / `Idle`      | disabled field, no placeholder     |
//! | winner `Ready(Revealed(name))` | "{name} is the winner!", no form   |
//! | winner otherwise               | "No winner yet."                   |
//!
//! Failures are never rendered inline; their toast was already shown.

use std::fmt;

use guess_shared::{ContractHandle, Guess, WinnerState};

use crate::request::RequestState;
use crate::validation::GuessInput;

/// Placeholder text while data is not available yet.
pub const LOADING_TEXT: &str = "Loading…";

/// Banner when nobody won yet.
pub const NO_WINNER_TEXT: &str = "No winner yet.";

/// One table row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuessRow {
    /// Player name.
    pub name: String,
    /// Guessed number.
    pub number: u8,
}

impl From<&Guess> for GuessRow {
    fn from(guess: &Guess) -> Self {
        Self {
            name: guess.name.clone(),
            number: guess.number,
        }
    }
}

/// The guesses card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuessesView {
    /// Name/number table in chain order.
    Table(Vec<GuessRow>),
    /// Disabled input with placeholder text (possibly empty).
    Placeholder {
        /// Text shown in the disabled field.
        text: &'static str,
    },
}

/// The submission form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormView {
    /// Current name field.
    pub name: String,
    /// Current number field.
    pub number: String,
    /// Inputs are locked while a transaction is in flight.
    pub inputs_disabled: bool,
    /// Submit is locked while submitting or fetching.
    pub submit_disabled: bool,
    /// Submit button shows a spinner.
    pub submitting: bool,
}

/// Everything the game card renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameView {
    /// Guesses card.
    pub guesses: GuessesView,
    /// Winner banner.
    pub winner: String,
    /// Form; `None` once a winner is revealed.
    pub form: Option<FormView>,
    /// Contract address, or the loading text.
    pub contract_label: String,
}

impl GameView {
    /// True when the form is shown.
    #[must_use]
    pub const fn accepts_guesses(&self) -> bool {
        self.form.is_some()
    }
}

/// Builds the view model.
#[must_use]
pub fn project(
    handle: Option<&ContractHandle>,
    guesses: &RequestState<Vec<Guess>>,
    winner: &RequestState<WinnerState>,
    submission: &RequestState<()>,
    input: &GuessInput,
) -> GameView {
    let fetching = guesses.is_loading() || winner.is_loading();

    let guesses = match guesses.ready() {
        Some(list) => GuessesView::Table(list.iter().map(GuessRow::from).collect()),
        None if fetching || handle.is_none() => GuessesView::Placeholder { text: LOADING_TEXT },
        None => GuessesView::Placeholder { text: "" },
    };

    let revealed = winner.ready().and_then(WinnerState::name);
    let banner = revealed.map_or_else(
        || NO_WINNER_TEXT.to_string(),
        |name| format!("{name} is the winner!"),
    );

    let submitting = submission.is_loading();
    let form = revealed.is_none().then(|| FormView {
        name: input.name.clone(),
        number: input.number.clone(),
        inputs_disabled: submitting,
        submit_disabled: submitting || fetching,
        submitting,
    });

    GameView {
        guesses,
        winner: banner,
        form,
        contract_label: handle.map_or_else(
            || LOADING_TEXT.to_string(),
            |h| h.address().to_string(),
        ),
    }
}

impl fmt::Display for GameView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Guesses")?;
        match &self.guesses {
            GuessesView::Table(rows) => {
                writeln!(f, "  {:<24} Guess", "Name")?;
                for row in rows {
                    writeln!(f, "  {:<24} {}", row.name, row.number)?;
                }
            }
            GuessesView::Placeholder { text } => writeln!(f, "  [{text}]")?,
        }

        writeln!(f, "Winner")?;
        writeln!(f, "  {}", self.winner)?;

        if let Some(form) = &self.form {
            let state = if form.submitting {
                "submitting…"
            } else if form.submit_disabled {
                "disabled"
            } else {
                "ready"
            };
            writeln!(f, "Guess your number")?;
            writeln!(f, "  name={:?} guess={:?} submit={}", form.name, form.number, state)?;
        }

        write!(f, "{}", self.contract_label)
    }
}
