//! HTML-to-email conversion through CSS inlining.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use css_inline::CSSInliner;
use regex::Regex;

use crate::compat::{self, WarnLevel, Warning};

/// Result of inlining one HTML document.
#[derive(Debug)]
pub struct InlineResult {
    /// The document with all applicable rules inlined as `style` attributes
    pub html: String,

    /// Compatibility warnings for the CSS that was inlined
    pub warnings: Vec<Warning>,
}

/// Errors that can occur while inlining.
#[derive(Debug, thiserror::Error)]
pub enum InlineError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to inline CSS: {0}")]
    Inline(#[from] css_inline::InlineError),
}

/// Inline the stylesheets of an HTML file on disk.
///
/// `<style>` blocks are inlined directly. `<link rel="stylesheet">` tags
/// pointing at local files are resolved relative to the input file and
/// inlined as well; remote stylesheets are skipped with a warning. Both kinds
/// of tag are removed from the output, since mail clients ignore them anyway.
pub fn inline_file(path: &Path) -> Result<InlineResult, InlineError> {
    let html = fs::read_to_string(path).map_err(|source| InlineError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let base_dir = path.parent().unwrap_or(Path::new("."));
    let linked_css = collect_linked_css(&html, base_dir);

    inline_html(&html, &linked_css)
}

/// Inline an HTML document given as a string, with `extra_css` appended to
/// whatever `<style>` blocks the document carries.
pub fn inline_html(html: &str, extra_css: &str) -> Result<InlineResult, InlineError> {
    let inliner = CSSInliner::options()
        .load_remote_stylesheets(false)
        .extra_css(if extra_css.is_empty() {
            None
        } else {
            Some(Cow::Borrowed(extra_css))
        })
        .build();

    let inlined = inliner.inline(html)?;

    let mut css = collect_style_blocks(html);
    css.push_str(extra_css);
    let warnings = compat::check(&css, WarnLevel::Safe);

    Ok(InlineResult {
        html: inlined,
        warnings,
    })
}

/// Read every local stylesheet referenced by a `<link rel="stylesheet">` tag,
/// concatenated in document order.
fn collect_linked_css(html: &str, base_dir: &Path) -> String {
    let link_tag = Regex::new(r"(?is)<link\b[^>]*>").expect("valid regex");
    let rel_stylesheet = Regex::new(r#"(?i)rel\s*=\s*["']?stylesheet"#).expect("valid regex");
    let href = Regex::new(r#"(?i)href\s*=\s*["']([^"']+)["']"#).expect("valid regex");

    let mut css = String::new();

    for tag in link_tag.find_iter(html) {
        let tag = tag.as_str();
        if !rel_stylesheet.is_match(tag) {
            continue;
        }

        let Some(target) = href.captures(tag).and_then(|c| c.get(1)) else {
            continue;
        };
        let target = target.as_str();

        // Remote stylesheets are out of scope for email output.
        if target.contains("://") || target.starts_with("//") {
            tracing::warn!("skipping remote stylesheet {target}");
            continue;
        }

        let stylesheet_path = base_dir.join(target);
        match fs::read_to_string(&stylesheet_path) {
            Ok(content) => {
                css.push_str(&content);
                css.push('\n');
            }
            Err(e) => {
                tracing::warn!(
                    "skipping unreadable stylesheet {}: {e}",
                    stylesheet_path.display()
                );
            }
        }
    }

    css
}

/// Extract the contents of every `<style>` block.
fn collect_style_blocks(html: &str) -> String {
    let style_block = Regex::new(r"(?is)<style[^>]*>(.*?)</style>").expect("valid regex");

    let mut css = String::new();
    for caps in style_block.captures_iter(html) {
        if let Some(body) = caps.get(1) {
            css.push_str(body.as_str());
            css.push('\n');
        }
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn inlines_style_block() {
        let html = r#"<html><head><style>.foo { color: red; }</style></head>
<body><div class="foo">hi</div></body></html>"#;

        let result = inline_html(html, "").unwrap();

        assert!(result.html.contains(r#"style="color: red"#));
        assert!(!result.html.contains("<style"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn resolves_linked_stylesheet() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("stylesheets")).unwrap();
        fs::write(
            temp.path().join("stylesheets/screen.css"),
            "p { color: blue; }",
        )
        .unwrap();

        let page = temp.path().join("index.html");
        fs::write(
            &page,
            r#"<html><head><link rel="stylesheet" href="stylesheets/screen.css"></head>
<body><p>hello</p></body></html>"#,
        )
        .unwrap();

        let result = inline_file(&page).unwrap();

        assert!(result.html.contains(r#"style="color: blue"#));
        assert!(!result.html.contains("<link"));
    }

    #[test]
    fn missing_linked_stylesheet_is_skipped() {
        let temp = tempdir().unwrap();
        let page = temp.path().join("index.html");
        fs::write(
            &page,
            r#"<html><head><link rel="stylesheet" href="nope.css"></head><body><p>x</p></body></html>"#,
        )
        .unwrap();

        let result = inline_file(&page).unwrap();
        assert!(result.html.contains("<p>x</p>"));
    }

    #[test]
    fn warns_about_problem_properties() {
        let html = r#"<html><head><style>.box { float: left; }</style></head>
<body><div class="box"></div></body></html>"#;

        let result = inline_html(html, "").unwrap();

        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0]
            .clients
            .iter()
            .any(|c| c.contains("Outlook")));
    }

    #[test]
    fn inlining_is_a_fixed_point() {
        let html = r#"<html><head><style>.foo { color: red; }</style></head>
<body><div class="foo">hi</div></body></html>"#;

        let once = inline_html(html, "").unwrap();
        let twice = inline_html(&once.html, "").unwrap();

        assert_eq!(once.html, twice.html);
    }
}
