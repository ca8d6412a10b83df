//! Markdown assembly: deterministic merging of the per-page OCR output.
//!
//! The OCR service returns each page's Markdown with image references of the
//! form `![name](name)`, where `name` is a symbolic key into that page's
//! image list rather than a real path. This module resolves those
//! placeholders against the page's base64 data and joins the pages into one
//! document. Pure functions, no I/O, no failure mode: a page with no images
//! passes through unchanged.
//!
//! Substitution is literal string replacement. The placeholder pattern is
//! built from the image name as-is, so names containing characters that are
//! special to regex engines (`fig(1).png`, `a+b.jpeg`) substitute correctly.

use crate::client::{OcrImage, OcrResponse};

/// Separator between pages in the merged document: exactly one blank line.
const PAGE_SEPARATOR: &str = "\n\n";

/// Replace every `![id](id)` placeholder with `![id](base64)` for each image
/// on the page. Names with no matching placeholder leave the text untouched.
pub fn substitute_images(markdown: &str, images: &[OcrImage]) -> String {
    let mut text = markdown.to_string();
    for img in images {
        let placeholder = format!("![{}]({})", img.id, img.id);
        let replacement = format!("![{}]({})", img.id, img.image_base64);
        text = text.replace(&placeholder, &replacement);
    }
    text
}

/// Merge all pages into a single Markdown document: per-page image
/// substitution, then concatenation in page order with one blank line
/// between entries.
pub fn combine_pages(response: &OcrResponse) -> String {
    response
        .pages
        .iter()
        .map(|page| substitute_images(&page.markdown, &page.images))
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::OcrPage;

    fn image(id: &str, data: &str) -> OcrImage {
        OcrImage {
            id: id.to_string(),
            image_base64: data.to_string(),
        }
    }

    fn page(markdown: &str, images: Vec<OcrImage>) -> OcrPage {
        OcrPage {
            markdown: markdown.to_string(),
            images,
        }
    }

    #[test]
    fn substitutes_placeholder_with_data() {
        let out = substitute_images("A ![x](x)", &[image("x", "data:img1")]);
        assert_eq!(out, "A ![x](data:img1)");
    }

    #[test]
    fn substitutes_every_occurrence() {
        let out = substitute_images("![x](x) and again ![x](x)", &[image("x", "D")]);
        assert_eq!(out, "![x](D) and again ![x](D)");
    }

    #[test]
    fn unrelated_images_leave_text_unchanged() {
        let text = "No placeholders here.";
        let out = substitute_images(text, &[image("img-7.jpeg", "data:...")]);
        assert_eq!(out, text);
    }

    #[test]
    fn regex_special_characters_in_name_are_literal() {
        let out = substitute_images(
            "see ![fig(1).png](fig(1).png)",
            &[image("fig(1).png", "data:ok")],
        );
        assert_eq!(out, "see ![fig(1).png](data:ok)");
    }

    #[test]
    fn partial_placeholder_not_touched() {
        // Name appearing outside the exact `![id](id)` pattern stays as-is.
        let out = substitute_images("mentioning x and ![x](other)", &[image("x", "D")]);
        assert_eq!(out, "mentioning x and ![x](other)");
    }

    #[test]
    fn combines_pages_with_blank_line() {
        let response = OcrResponse {
            pages: vec![
                page("A ![x](x)", vec![image("x", "data:img1")]),
                page("B", vec![]),
            ],
        };
        assert_eq!(combine_pages(&response), "A ![x](data:img1)\n\nB");
    }

    #[test]
    fn single_page_has_no_separator() {
        let response = OcrResponse {
            pages: vec![page("only", vec![])],
        };
        assert_eq!(combine_pages(&response), "only");
    }

    #[test]
    fn empty_page_list_yields_empty_document() {
        let response = OcrResponse { pages: vec![] };
        assert_eq!(combine_pages(&response), "");
    }

    #[test]
    fn idempotent_once_substituted() {
        let response = OcrResponse {
            pages: vec![
                page("A ![x](x)", vec![image("x", "data:img1")]),
                page("B ![y](y)", vec![image("y", "data:img2")]),
            ],
        };
        let once = combine_pages(&response);
        // Re-running substitution over the merged output changes nothing:
        // substituted forms no longer match the placeholder pattern.
        let again = substitute_images(
            &substitute_images(&once, &[image("x", "data:img1")]),
            &[image("y", "data:img2")],
        );
        assert_eq!(once, again);
    }
}
