use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(site_name: &str, title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | " (site_name) }
                link rel="icon" href="/static/favicon/favicon.ico";
                link rel="stylesheet" href="/static/main.css";
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    a href="/" class="brand" { (site_name) }
                    nav {
                        ul {
                            li { a href="/" { "Buy" } }
                        }
                    }
                }
                (content)
            }
        }
    }
}
