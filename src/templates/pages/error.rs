use crate::errors::ServerError;
use maud::{html, Markup, DOCTYPE};

/// Standalone error page; does not depend on settings so it can always render.
pub fn error_page(status: u16, err: &ServerError) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Error " (status) }
                link rel="stylesheet" href="/static/main.css";
            }
            body class="error" {
                h1 { "Error " (status) }
                p { (err.public_message()) }
                @if err.is_retryable() {
                    p { a href="" { "Try again" } }
                }
                p { a href="/" { "← Back to home" } }
            }
        }
    }
}
