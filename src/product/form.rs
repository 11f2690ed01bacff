use maud::{Markup, html};

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base},
    navigation::NavBar,
};

/// Whether the product form creates a new product or updates an existing one.
pub(super) enum FormAction<'a> {
    Create,
    /// Editing keeps the product's serial number, which is shown but never submitted.
    Update { endpoint: &'a str, serial: &'a str },
}

pub(super) fn product_form_view(
    action: &FormAction<'_>,
    name: &str,
    description: &str,
    error_message: &str,
) -> Markup {
    let (post_endpoint, put_endpoint, serial, submit_text) = match action {
        FormAction::Create => (Some(endpoints::POST_PRODUCT), None, None, "Create Product"),
        FormAction::Update { endpoint, serial } => {
            (None, Some(*endpoint), Some(*serial), "Save Product")
        }
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
            @if let Some(serial) = serial {
                div
                {
                    label for="serial" class=(FORM_LABEL_STYLE) { "Serial Number" }

                    input
                        id="serial"
                        type="text"
                        value=(serial)
                        readonly
                        class={ (FORM_TEXT_INPUT_STYLE) " opacity-75 cursor-not-allowed" };
                }
            }

            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    value=(name)
                    placeholder="Product Name"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description (optional)" }

                textarea
                    id="description"
                    name="description"
                    rows="3"
                    placeholder="e.g. Clean, stripped wire"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    (description)
                }
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400" { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}

pub(super) fn product_form_page(title: &str, form: Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::PRODUCTS_VIEW).into_html();

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
