//! Evaluation page access
//!
//! All lookups go through `PageSelectors`; nothing here knows the host page's
//! markup beyond that.

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement, HtmlSelectElement, Node, NodeList};

use autoeval_core::{EvalError, FormPage, PageSelectors, Section};

use crate::interop::dom_error;
use crate::widget::SelectWidget;

pub struct DomPage {
    document: Document,
    selectors: PageSelectors,
}

impl DomPage {
    pub fn new(document: Document, selectors: PageSelectors) -> Self {
        Self { document, selectors }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Header the panel is inserted after
    pub fn anchor(&self) -> Result<HtmlElement, EvalError> {
        self.document
            .query_selector(&self.selectors.anchor)
            .map_err(dom_error)?
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| EvalError::AnchorNotFound(self.selectors.anchor.clone()))
    }

    /// Subtree watched while the host page reacts to change events
    pub fn form_root(&self) -> Option<Node> {
        self.document
            .body()
            .map(Into::into)
            .or_else(|| self.document.document_element().map(Into::into))
    }
}

fn select_widgets(list: NodeList) -> Vec<SelectWidget> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<HtmlSelectElement>().ok())
        .map(SelectWidget::new)
        .collect()
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

impl FormPage for DomPage {
    type Widget = SelectWidget;

    fn questions(&self) -> Result<Vec<SelectWidget>, EvalError> {
        let list = self
            .document
            .query_selector_all(&self.selectors.questions)
            .map_err(dom_error)?;
        Ok(select_widgets(list))
    }

    fn sections(&self) -> Result<Vec<Section<SelectWidget>>, EvalError> {
        let headings = self
            .document
            .query_selector_all(&self.selectors.section_headings)
            .map_err(dom_error)?;

        let mut sections = Vec::new();
        for heading in elements(headings) {
            // headings outside a grouping container have nothing to aggregate
            let Some(container) = heading
                .closest(&self.selectors.section_container)
                .map_err(dom_error)?
            else {
                continue;
            };
            let questions = container
                .query_selector_all(&self.selectors.section_questions)
                .map_err(dom_error)?;
            sections.push(Section::new(heading.text_content(), select_widgets(questions)));
        }
        Ok(sections)
    }
}

/// Resolve once the document has finished parsing
pub async fn when_ready(document: &Document) -> Result<(), EvalError> {
    if document.ready_state() != "loading" {
        return Ok(());
    }
    let promise = Promise::new(&mut |resolve, reject| {
        if let Err(err) = document.add_event_listener_with_callback("DOMContentLoaded", &resolve) {
            let _ = reject.call1(&JsValue::NULL, &err);
        }
    });
    JsFuture::from(promise).await.map(|_| ()).map_err(dom_error)
}
