//! Two-step deletes: the first request asks for confirmation, the second carries the decision.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::html::{BUTTON_DELETE_STYLE, LINK_STYLE};

/// Whether the user has agreed to a destructive action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The user has not answered the prompt yet.
    Pending,
    /// The user agreed, the action should go ahead.
    Confirmed,
    /// The user backed out, nothing should change.
    Cancelled,
}

/// The answer to a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Go ahead with the action.
    Confirm,
    /// Back out of the action.
    Cancel,
}

/// The query string for delete endpoints, e.g. `?decision=confirm`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConfirmationQuery {
    /// `None` until the user has answered the prompt.
    pub decision: Option<Decision>,
}

impl From<ConfirmationQuery> for Confirmation {
    fn from(query: ConfirmationQuery) -> Self {
        match query.decision {
            None => Confirmation::Pending,
            Some(Decision::Confirm) => Confirmation::Confirmed,
            Some(Decision::Cancel) => Confirmation::Cancelled,
        }
    }
}

/// The id of the element confirmation prompts are swapped into.
pub const CONFIRM_CONTAINER_ID: &str = "confirm-container";

/// Where the confirmed request's response should go.
pub struct ConfirmTarget<'a> {
    /// A CSS selector, e.g. "#transaction-sheet".
    pub selector: &'a str,
    /// An htmx swap strategy, e.g. "outerHTML".
    pub swap: &'a str,
}

/// Render a prompt asking the user to confirm a delete.
///
/// Both buttons send `DELETE delete_url` again, with the decision in the
/// query string. Cancelling clears the prompt.
pub fn confirmation_prompt(message: &str, delete_url: &str, target: ConfirmTarget<'_>) -> Markup {
    let confirm_url = format!("{delete_url}?decision=confirm");
    let cancel_url = format!("{delete_url}?decision=cancel");
    let container = format!("#{CONFIRM_CONTAINER_ID}");

    html!(
        div
            role="alertdialog"
            aria-labelledby="confirm-message"
            class="w-full max-w-md mx-auto my-4 p-4 rounded-lg border border-red-300
                bg-red-50 text-red-800 dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        {
            p id="confirm-message" class="mb-3 text-sm" { (message) }

            div class="flex gap-4"
            {
                button
                    type="button"
                    hx-delete=(confirm_url)
                    hx-target=(target.selector)
                    hx-swap=(target.swap)
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }

                button
                    type="button"
                    hx-delete=(cancel_url)
                    hx-target=(container)
                    hx-swap="innerHTML"
                    class=(LINK_STYLE)
                {
                    "Cancel"
                }
            }
        }
    )
}

/// Clears any open prompt with an out-of-band swap, for responses that
/// replace some other part of the page.
pub fn clear_confirm_container() -> Markup {
    html!( div id=(CONFIRM_CONTAINER_ID) hx-swap-oob="true" {} )
}
