use maud::{html, Markup, DOCTYPE};

/// Inline error shown in place of the rest of the page.
pub fn error_banner(message: &str) -> Markup {
    html! {
        div class="error-banner" role="alert" { (message) }
    }
}

/// Standalone page for request-level failures.
pub fn error_page(status: u16, message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ja" {
            head {
                meta charset="utf-8";
                title { "Error " (status) }
                link rel="stylesheet" href="/static/main.css";
            }
            body class="error-page" {
                h1 { "Error " (status) }
                p { (message) }
                p { a href="/" { "← トップへ戻る" } }
            }
        }
    }
}
