//! Shared page layout, styles and number formatting for the HTML views.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500 \
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_SECONDARY_STYLE: &str = "w-full py-2.5 px-5 mb-2 \
    text-sm font-medium text-gray-900 bg-white rounded border border-gray-200 \
    hover:bg-gray-100 hover:text-blue-700 focus:z-10 dark:bg-gray-800 \
    dark:text-gray-400 dark:border-gray-600 dark:hover:text-white \
    dark:hover:bg-gray-700";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 \
    mx-auto lg:py-0 max-w-md text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Summary card style
pub const CARD_STYLE: &str = "rounded border border-gray-200 bg-white px-4 py-3 \
    shadow-sm dark:border-gray-700 dark:bg-gray-800";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

pub enum HeadElement {
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
    Style(PreEscaped<String>),
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - TZ Scraps" }
                link href="/static/main.css" rel="stylesheet";

                script src="/static/htmx-2.0.8-min.js" {}
                script src="/static/htmx-ext-response-targets-2.0.4.js" {}

                style
                {
                    r#"
                    #indicator.htmx-indicator {
                        display: none;
                    }

                    #indicator.htmx-request .htmx-indicator {
                        display: inline;
                    }

                    #indicator.htmx-request.htmx-indicator {
                        display: inline;
                    }
                    "#
                }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::Style(text) => style { (text) }
                    }
                }
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                div
                    id="confirm-container"
                    class="w-full max-w-md px-4"
                    style="position: fixed; top: 5rem; left: 50%; transform: translateX(-50%); z-index: 9998;"
                {}

                // Alert container for error responses and out-of-band swaps
                div
                    id="alert-container"
                    class="w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Homepage"
                    }
                }
            }
        }
    );

    base(title, &[], &content)
}

/// Edit link and delete button for a table row or card.
///
/// The delete button asks the server for a confirmation prompt, which is
/// placed in `#confirm-container`.
pub fn edit_delete_action_links(edit_url: &str, delete_url: &str) -> Markup {
    html!(
        a href=(edit_url) class=(LINK_STYLE) { "Edit" }

        button
            type="button"
            hx-delete=(delete_url)
            hx-target="#confirm-container"
            hx-target-error="#alert-container"
            class=(BUTTON_DELETE_STYLE)
        {
            "Delete"
        }
    )
}

/// A search box that reloads `target` as the user types.
pub fn search_input(endpoint: &str, search: &str, placeholder: &str, target: &str) -> Markup {
    html!(
        input
            type="search"
            name="search"
            value=(search)
            placeholder=(placeholder)
            hx-get=(endpoint)
            hx-trigger="input changed delay:300ms, search"
            hx-target=(target)
            hx-select=(target)
            hx-swap="outerHTML"
            hx-push-url="true"
            class=(FORM_TEXT_INPUT_STYLE);
    )
}

/// Returns the CSS styles for adding a currency symbol prefix to number inputs.
pub fn currency_input_styles(currency_symbol: &str) -> HeadElement {
    HeadElement::Style(PreEscaped(format!(
        r#"
        .input-wrapper {{
            position: relative;
            display: inline-block;
            width: 100%;
        }}
        .input-wrapper input[type="number"] {{
            padding-left: 1.6rem;
        }}
        .input-wrapper::before {{
            content: '{currency_symbol}';
            position: absolute;
            left: 0.6rem;
            top: 50%;
            transform: translateY(-50%);
            pointer-events: none;
        }}
        "#
    )))
}

/// Format `number` with thousands separators and exactly two decimal places.
///
/// The number is rounded to the nearest cent, e.g. `56.99999999999999`
/// becomes "57.00".
pub fn format_number(number: f64) -> String {
    let rounded = format!("{:.2}", number.abs());
    let Some((whole, fraction)) = rounded.split_once('.') else {
        return number.to_string();
    };

    let whole = match whole.parse::<u64>() {
        Ok(whole) => group_thousands(whole),
        Err(_) => whole.to_owned(),
    };
    let sign = if number < 0.0 && rounded != "0.00" {
        "-"
    } else {
        ""
    };

    format!("{sign}{whole}.{fraction}")
}

/// Insert thousands separators into a whole number, e.g. "1,234,567".
fn group_thousands(whole: u64) -> String {
    const BILLION: u64 = 1_000_000_000;

    static FORMATTER: OnceLock<Formatter> = OnceLock::new();

    // numfmt switches to scientific notation from 1e12 onwards.
    if whole >= 1000 * BILLION {
        let low = whole % BILLION;
        return format!(
            "{},{:03},{:03},{:03}",
            group_thousands(whole / BILLION),
            low / 1_000_000,
            low / 1000 % 1000,
            low % 1000
        );
    }

    let formatter = FORMATTER.get_or_init(|| {
        Formatter::new()
            .separator(',')
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    formatter.fmt_string(whole as f64)
}

/// Format `number` as currency, e.g. "₦1,234.50".
pub fn format_currency(currency_symbol: &str, number: f64) -> String {
    let formatted = format_number(number);

    match formatted.strip_prefix('-') {
        Some(amount) => format!("-{currency_symbol}{amount}"),
        None => format!("{currency_symbol}{formatted}"),
    }
}

/// A link with blue text for use in a <p> tag.
pub fn link(url: &str, text: &str) -> Markup {
    html! (
        a href=(url) class=(LINK_STYLE) { (text) }
    )
}

#[cfg(test)]
mod tests {
    use super::{format_currency, format_number};

    #[test]
    fn format_number_pads_to_two_decimals() {
        assert_eq!(format_number(0.0), "0.00");
        assert_eq!(format_number(12.0), "12.00");
        assert_eq!(format_number(12.3), "12.30");
        assert_eq!(format_number(1234.56), "1,234.56");
    }

    #[test]
    fn format_currency_prefixes_symbol() {
        assert_eq!(format_currency("₦", 1500.0), "₦1,500.00");
        assert_eq!(format_currency("₦", 0.0), "₦0.00");
        assert_eq!(format_currency("NGN ", 2.5), "NGN 2.50");
    }

    #[test]
    fn format_currency_negative() {
        assert_eq!(format_currency("₦", -20.5), "-₦20.50");
    }

    #[test]
    fn format_number_rounds_to_nearest_cent() {
        assert_eq!(format_number(0.57 * 100.0), "57.00");
        assert_eq!(format_number(0.7 + 0.1), "0.80");
        assert_eq!(format_number(2.345_000_1), "2.35");
        assert_eq!(format_number(999.999), "1,000.00");
    }

    #[test]
    fn format_number_small_magnitudes() {
        assert_eq!(format_number(0.004), "0.00");
        assert_eq!(format_number(0.006), "0.01");
        assert_eq!(format_number(0.05), "0.05");
    }

    #[test]
    fn format_number_large_magnitudes() {
        assert_eq!(format_number(2e12), "2,000,000,000,000.00");
        assert_eq!(format_number(1_234_567_890_123.5), "1,234,567,890,123.50");
        assert_eq!(format_number(999_999_999_999.0), "999,999,999,999.00");
    }

    #[test]
    fn format_currency_tiny_negative_has_no_sign() {
        assert_eq!(format_currency("₦", -0.001), "₦0.00");
        assert_eq!(format_currency("₦", -0.006), "-₦0.01");
    }

    #[test]
    fn format_currency_rounds_float_products() {
        assert_eq!(format_currency("₦", 0.57 * 100.0), "₦57.00");
    }
}
