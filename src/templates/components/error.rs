use maud::{html, Markup};

/// Inline failure notice. `retry_href` adds a "Try again" link.
pub fn error_panel(message: &str, retry_href: Option<&str>) -> Markup {
    html! {
        div class="error-panel" role="alert" {
            p { (message) }
            @if let Some(href) = retry_href {
                a class="btn" href=(href) { "Try again" }
            }
        }
    }
}
