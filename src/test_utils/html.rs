use scraper::{ElementRef, Html, Selector};

pub(crate) fn parse_html_document(markup: &str) -> Html {
    Html::parse_document(markup)
}

pub(crate) fn parse_html_fragment(markup: &str) -> Html {
    Html::parse_fragment(markup)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

#[track_caller]
pub(crate) fn select_all<'a>(html: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    let selector = Selector::parse(selector)
        .unwrap_or_else(|error| panic!("Invalid selector {selector:?}: {error:?}"));

    html.select(&selector).collect()
}

#[track_caller]
pub(crate) fn must_select<'a>(html: &'a Html, selector: &str) -> ElementRef<'a> {
    select_all(html, selector)
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("No element found matching {selector:?}"))
}

/// The whitespace-normalised text content of `element`.
pub(crate) fn text_of(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
