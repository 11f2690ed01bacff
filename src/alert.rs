//! Alert messages shown to the user after an action succeeds or fails.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A dismissible message rendered into the page's alert container.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with further details.
    Success { message: String, details: String },
    /// A success message on its own.
    SuccessSimple { message: String },
    /// An error message with details on what went wrong or how to fix it.
    Error { message: String, details: String },
    /// A warning that does not stop the user from continuing.
    Warning { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (message, details, style) = match self {
            Alert::Success { message, details } => (message, details, SUCCESS_STYLE),
            Alert::SuccessSimple { message } => (message, String::new(), SUCCESS_STYLE),
            Alert::Error { message, details } => (message, details, ERROR_STYLE),
            Alert::Warning { message, details } => (message, details, WARNING_STYLE),
        };

        html! {
            div
                role="alert"
                class={ "flex items-start justify-between gap-4 p-4 mb-4 text-sm rounded-lg border " (style) }
            {
                div
                {
                    p class="font-semibold" { (message) }

                    @if !details.is_empty() {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="font-bold"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

const SUCCESS_STYLE: &str = "text-green-800 bg-green-50 border-green-300 \
    dark:bg-gray-800 dark:text-green-400 dark:border-green-800";

const ERROR_STYLE: &str = "text-red-800 bg-red-50 border-red-300 \
    dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

const WARNING_STYLE: &str = "text-yellow-800 bg-yellow-50 border-yellow-300 \
    dark:bg-gray-800 dark:text-yellow-300 dark:border-yellow-800";
