//! Panel view
//!
//! Builds the panel markup once, after the anchor, and re-renders it from a
//! `PanelModel`. Event wiring lives in the controller.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, HtmlButtonElement, HtmlElement, Node};

use autoeval_core::{EvalError, PanelLog, PanelModel, Strategy, PANEL_TITLE, SCORES_HEADING};

use crate::interop::dom_error;

pub const PREFERRED_BUTTON_ID: &str = "auto-eval-preferred-btn";
pub const TOGGLE_BUTTON_ID: &str = "auto-eval-toggle-btn";
pub const DROPDOWN_ID: &str = "auto-eval-dropdown-menu";
pub const LOG_LIST_ID: &str = "auto-eval-logs";

const SHOW_CLASS: &str = "show";
const ACTIVE_ITEM_CLASS: &str = "eval-dropdown-menu-item--active";
const FILLED_CLASS: &str = "eval-btn--filled";
const GREEN_CLASS: &str = "eval-btn--filled-green";

pub struct PanelView {
    document: Document,
    container: HtmlElement,
    button_group: HtmlElement,
    preferred_button: HtmlButtonElement,
    toggle_button: HtmlButtonElement,
    dropdown: HtmlElement,
    items: Vec<(Strategy, HtmlElement)>,
    log_list: HtmlElement,
}

impl PanelView {
    /// Create the panel and insert it right after `anchor`
    pub fn build(document: &Document, anchor: &Element) -> Result<Self, EvalError> {
        let create = |tag: &str, class: &str| -> Result<HtmlElement, EvalError> {
            let el = document
                .create_element(tag)
                .map_err(dom_error)?
                .dyn_into::<HtmlElement>()
                .map_err(|_| EvalError::Dom(format!("<{}> is not an HTMLElement", tag)))?;
            if !class.is_empty() {
                el.set_class_name(class);
            }
            Ok(el)
        };

        let container = create("div", "eval-panel-container")?;
        let title = create("h3", "eval-panel-title")?;
        title.set_text_content(Some(PANEL_TITLE));

        let button_container = create("div", "eval-button-container")?;
        let button_group = create("div", "eval-btn-group")?;

        let preferred_button = Self::create_button(document, "", GREEN_CLASS)?;
        preferred_button.set_id(PREFERRED_BUTTON_ID);

        let toggle_button = Self::create_button(document, "\u{25BC}", GREEN_CLASS)?;
        toggle_button.set_id(TOGGLE_BUTTON_ID);

        let dropdown = create("div", "eval-dropdown-menu")?;
        dropdown.set_id(DROPDOWN_ID);

        let mut items = Vec::with_capacity(Strategy::ALL.len());
        for strategy in Strategy::ALL {
            let item = create("a", "eval-dropdown-menu-item")?;
            item.set_attribute("href", "#").map_err(dom_error)?;
            item.set_text_content(Some(strategy.name()));
            item.dataset()
                .set("strategy", strategy.id())
                .map_err(dom_error)?;
            dropdown.append_child(&item).map_err(dom_error)?;
            items.push((strategy, item));
        }

        let log_list = create("ul", "")?;
        log_list.set_id(LOG_LIST_ID);

        container.append_child(&title).map_err(dom_error)?;
        button_group.append_child(&preferred_button).map_err(dom_error)?;
        button_group.append_child(&toggle_button).map_err(dom_error)?;
        button_group.append_child(&dropdown).map_err(dom_error)?;
        button_container.append_child(&button_group).map_err(dom_error)?;
        container.append_child(&button_container).map_err(dom_error)?;
        container.append_child(&log_list).map_err(dom_error)?;

        anchor
            .insert_adjacent_element("afterend", &container)
            .map_err(dom_error)?;

        Ok(Self {
            document: document.clone(),
            container,
            button_group,
            preferred_button,
            toggle_button,
            dropdown,
            items,
            log_list,
        })
    }

    fn create_button(
        document: &Document,
        text: &str,
        color_class: &str,
    ) -> Result<HtmlButtonElement, EvalError> {
        let button = document
            .create_element("button")
            .map_err(dom_error)?
            .dyn_into::<HtmlButtonElement>()
            .map_err(|_| EvalError::Dom("<button> is not an HTMLButtonElement".to_string()))?;
        button.set_type("button");
        button.set_text_content(Some(text));
        let classes = button.class_list();
        classes.add_2("eval-btn", FILLED_CLASS).map_err(dom_error)?;
        if !color_class.is_empty() {
            classes.add_1(color_class).map_err(dom_error)?;
        }
        Ok(button)
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    pub fn preferred_button(&self) -> &HtmlButtonElement {
        &self.preferred_button
    }

    pub fn toggle_button(&self) -> &HtmlButtonElement {
        &self.toggle_button
    }

    pub fn items(&self) -> &[(Strategy, HtmlElement)] {
        &self.items
    }

    /// True when a click target lies inside the button group
    pub fn group_contains(&self, target: Option<EventTarget>) -> bool {
        target
            .and_then(|t| t.dyn_into::<Node>().ok())
            .map(|node| self.button_group.contains(Some(&node)))
            .unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    pub fn render(&self, model: &PanelModel) -> Result<(), EvalError> {
        let loading = model.is_loading();
        self.preferred_button.set_disabled(loading);
        self.toggle_button.set_disabled(loading);
        self.preferred_button
            .set_text_content(Some(&model.preferred_label()));

        let dropdown_classes = self.dropdown.class_list();
        dropdown_classes
            .toggle_with_force(SHOW_CLASS, model.is_dropdown_open())
            .map_err(dom_error)?;
        for (strategy, item) in &self.items {
            item.class_list()
                .toggle_with_force(ACTIVE_ITEM_CLASS, model.is_active_item(*strategy))
                .map_err(dom_error)?;
        }

        self.render_log(model.log())
    }

    fn render_log(&self, log: &PanelLog) -> Result<(), EvalError> {
        self.log_list.set_inner_html("");

        let Some(body) = log.body() else {
            self.log_list
                .style()
                .set_property("display", "none")
                .map_err(dom_error)?;
            return Ok(());
        };

        let pre = self.document.create_element("pre").map_err(dom_error)?;
        match log {
            PanelLog::Scores { lines, .. } if !lines.is_empty() => {
                let heading = self.document.create_element("strong").map_err(dom_error)?;
                heading.set_text_content(Some(SCORES_HEADING));
                pre.append_child(&heading).map_err(dom_error)?;
                let rest = self
                    .document
                    .create_text_node(&format!("\n\n{}", lines.join("\n")));
                pre.append_child(&rest).map_err(dom_error)?;
            }
            _ => pre.set_text_content(Some(&body)),
        }
        self.log_list.append_child(&pre).map_err(dom_error)?;

        if let Some(summary) = log.summary() {
            let li = self.document.create_element("li").map_err(dom_error)?;
            li.set_class_name("eval-log-summary");
            li.set_text_content(Some(summary));
            self.log_list.append_child(&li).map_err(dom_error)?;
        }

        self.log_list
            .style()
            .set_property("display", "block")
            .map_err(dom_error)?;
        Ok(())
    }
}
