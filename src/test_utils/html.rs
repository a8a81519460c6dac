use axum::{body::Body, response::Response};
use scraper::{ElementRef, Html, Selector};

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    let body = response.into_body();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Could not get response body");
    let text = String::from_utf8_lossy(&body).to_string();

    Html::parse_document(&text)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// Collect the trimmed text of every element matching `selector`.
#[track_caller]
pub(crate) fn select_text(html: &Html, selector: &str) -> Vec<String> {
    let selector = Selector::parse(selector).expect("invalid selector");

    html.select(&selector).map(element_text).collect()
}

pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join("").trim().to_owned()
}
