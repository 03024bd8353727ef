//! Standalone HTML page shell.
//!
//! Wraps an already-rendered article fragment in a complete document:
//!
//! ```text
//! <!DOCTYPE html>
//! <html lang="en">
//! <head>
//!     <meta charset="utf-8">
//!     <meta name="viewport" content="width=device-width, initial-scale=1.0">
//!     <title>…</title>
//!     <link rel="stylesheet" href="…">   (one per configured stylesheet)
//! </head>
//! <body>…article…</body>
//! </html>
//! ```
//!
//! Built with [maud](https://maud.lambda.xyz/). Title, language, and
//! stylesheet hrefs are escaped; the article is inserted verbatim because it
//! is converter output.

use crate::config::PageConfig;
use maud::{DOCTYPE, Markup, PreEscaped, html};

pub fn render_page(article: &str, title: &str, page: &PageConfig) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(page.language) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @for sheet in &page.stylesheets {
                    link rel="stylesheet" href=(sheet);
                }
            }
            body {
                (PreEscaped(article))
            }
        }
    }
}
