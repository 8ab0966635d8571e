//! Static page content shared by both front-ends.

use serde::{Deserialize, Serialize};

pub const TITLE: &str = "Lorenz Attractor";
pub const PARAMETERS_HEADING: &str = "Set parameters:";
pub const SIDEBAR_HEADING: &str = "Parameters";

pub const EQUATIONS_LATEX: &str = r"\begin{align*}
    \frac{dx}{dt} &= \sigma (y - x) \\
    \frac{dy}{dt} &= x (\rho - z) - y \\
    \frac{dz}{dt} &= x y - \beta z
\end{align*}";

const FOOTER_STYLE: &str = "<style>.footer {
    position: fixed;
    left: 0;
    bottom: 0;
    width: 100%;
    background-color: rgb(211, 211, 211);
    color: black;
    text-align: center;
}
</style>";

/// Attribution shown in the fixed footer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    pub author: Option<String>,
    pub link: Option<String>,
    /// Trailing text, e.g. the hosting framework.
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageContent {
    pub title: String,
    pub sidebar_heading: String,
    pub equations_latex: String,
    pub footer_html: Option<String>,
}

impl PageContent {
    pub fn new(footer: &FooterConfig) -> Self {
        Self {
            title: TITLE.to_string(),
            sidebar_heading: SIDEBAR_HEADING.to_string(),
            equations_latex: EQUATIONS_LATEX.to_string(),
            footer_html: footer_html(footer),
        }
    }
}

/// Footer fragment, or `None` when no author is configured.
pub fn footer_html(footer: &FooterConfig) -> Option<String> {
    let author = footer.author.as_deref()?;
    let name = escape_html(author);
    let credit = match footer.link.as_deref() {
        Some(link) => format!(
            "<a href=\"{}\" target=\"_blank\">{}</a>",
            escape_html(link),
            name
        ),
        None => name,
    };
    let suffix = footer
        .suffix
        .as_deref()
        .map(|s| format!(" {}", escape_html(s)))
        .unwrap_or_default();
    Some(format!(
        "{FOOTER_STYLE}\n<div class='footer'>\n   By {credit}{suffix}.\n</div>\n"
    ))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_author_means_no_footer() {
        assert!(footer_html(&FooterConfig::default()).is_none());
        let page = PageContent::new(&FooterConfig::default());
        assert!(page.footer_html.is_none());
        assert_eq!(page.sidebar_heading, "Parameters");
    }

    #[test]
    fn footer_links_author() {
        let html = footer_html(&FooterConfig {
            author: Some("someone".into()),
            link: Some("https://example.org/someone".into()),
            suffix: Some("using WebAssembly".into()),
        })
        .expect("footer");
        assert!(html.contains("class='footer'"));
        assert!(html.contains(
            "By <a href=\"https://example.org/someone\" target=\"_blank\">someone</a> using WebAssembly."
        ));
    }

    #[test]
    fn footer_escapes_markup() {
        let html = footer_html(&FooterConfig {
            author: Some("<script>".into()),
            ..FooterConfig::default()
        })
        .expect("footer");
        assert!(html.contains("By &lt;script&gt;."));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn equations_mention_all_parameters() {
        for symbol in [r"\sigma", r"\rho", r"\beta"] {
            assert!(EQUATIONS_LATEX.contains(symbol));
        }
    }
}
