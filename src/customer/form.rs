use maud::{Markup, html};

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base},
    navigation::NavBar,
};

/// Whether the customer form creates a new customer or updates an existing one.
pub(super) enum FormAction<'a> {
    Create,
    Update { endpoint: &'a str },
}

/// The customer form, `error_message` is shown under the inputs when non-empty.
pub(super) fn customer_form_view(
    action: &FormAction<'_>,
    name: &str,
    phone: &str,
    error_message: &str,
) -> Markup {
    let (post_endpoint, put_endpoint, submit_text) = match action {
        FormAction::Create => (Some(endpoints::POST_CUSTOMER), None, "Create Customer"),
        FormAction::Update { endpoint } => (None, Some(*endpoint), "Save Customer"),
    };

    html! {
        form
            hx-post=[post_endpoint]
            hx-put=[put_endpoint]
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    value=(name)
                    placeholder="Customer Name"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="phone" class=(FORM_LABEL_STYLE) { "Phone (optional)" }

                input
                    id="phone"
                    type="tel"
                    name="phone"
                    value=(phone)
                    placeholder="+234 801 234 5678"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400" { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}

pub(super) fn customer_form_page(title: &str, form: Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::CUSTOMERS_VIEW).into_html();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { (title) }
            (form)
        }
    };

    base(title, &[], &content)
}
