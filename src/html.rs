//! Shared page layout, styles and formatting helpers for the HTML views.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, html};
use numfmt::{Formatter, Precision};

pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

pub const CARD_STYLE: &str = "w-full max-w-5xl mb-6 p-4 rounded-lg bg-white shadow \
    dark:bg-gray-800";

pub const SELECT_STYLE: &str = "block p-2 rounded text-sm text-gray-900 dark:text-white \
    bg-gray-50 dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    focus:ring-blue-600 focus:border-blue-600";

/// htmx is pinned to a release on the jsDelivr CDN and checked against its
/// published subresource integrity hash.
const HTMX_URL: &str = "https://cdn.jsdelivr.net/npm/htmx.org@2.0.8/dist/htmx.min.js";
const HTMX_INTEGRITY: &str =
    "sha384-/TgkGk7p307TH7EXJDuUlgG3Ce1UVolAOFopFekQkkXihi5u/6OCvVKyz1W+idaz";

/// The ECharts build bundled with `charming`, served from `static/`.
pub const ECHARTS_PATH: &str = "/static/echarts-5.5.1.min.js";

/// Extra elements for the `<head>` of a page.
pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
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
                title { (title) " - Pennywise" }
                link href="/static/main.css" rel="stylesheet";

                script src=(HTMX_URL) integrity=(HTMX_INTEGRITY) crossorigin="anonymous" {}

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }
            }

            body class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)
            }
        }
    }
}

pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let (Some(positive_fmt), Some(negative_fmt)) = (positive_fmt, negative_fmt) else {
        return format!("${number:.2}");
    };

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "$0.00".to_owned()
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    let length = formatted_string.len();
    if length >= 3 && formatted_string.as_bytes()[length - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

#[cfg(test)]
mod tests {
    use maud::html;
    use scraper::{Html, Selector};

    use super::{ECHARTS_PATH, HeadElement, base, format_currency};

    #[test]
    fn formats_with_two_decimals() {
        assert_eq!(format_currency(12.3), "$12.30");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn formats_negative_numbers() {
        assert_eq!(format_currency(-45.5), "-$45.50");
    }

    #[test]
    fn base_links_stylesheet_htmx_and_extra_scripts() {
        let page = base(
            "Reports",
            &[HeadElement::ScriptLink(ECHARTS_PATH.to_owned())],
            &html! { p { "content" } },
        );
        let document = Html::parse_document(&page.into_string());

        let stylesheet = Selector::parse("link[rel=stylesheet]").unwrap();
        let hrefs: Vec<_> = document
            .select(&stylesheet)
            .filter_map(|link| link.value().attr("href"))
            .collect();
        assert_eq!(hrefs, vec!["/static/main.css"]);

        let scripts = Selector::parse("script[src]").unwrap();
        let scripts: Vec<_> = document.select(&scripts).collect();
        assert_eq!(scripts.len(), 2);
        assert!(scripts[0].value().attr("src").unwrap().contains("htmx.org@2.0.8"));
        assert!(scripts[0].value().attr("integrity").is_some());
        assert_eq!(scripts[1].value().attr("src"), Some(ECHARTS_PATH));
    }
}
