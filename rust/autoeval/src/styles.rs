//! Panel stylesheet injection

use web_sys::Document;

use autoeval_core::EvalError;

use crate::interop::dom_error;

pub const STYLE_ELEMENT_ID: &str = "auto-eval-styles";

const PANEL_CSS: &str = include_str!("../assets/panel.css");

/// Add the panel stylesheet to `<head>` once
pub fn inject(document: &Document) -> Result<(), EvalError> {
    if document.get_element_by_id(STYLE_ELEMENT_ID).is_some() {
        return Ok(());
    }
    let style = document.create_element("style").map_err(dom_error)?;
    style.set_id(STYLE_ELEMENT_ID);
    style.set_text_content(Some(PANEL_CSS));

    let parent = match document.head() {
        Some(head) => head.into(),
        None => document
            .document_element()
            .ok_or_else(|| EvalError::Dom("document has no root element".to_string()))?,
    };
    parent.append_child(&style).map_err(dom_error)?;
    Ok(())
}
