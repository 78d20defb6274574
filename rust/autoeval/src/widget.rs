//! `<select>` elements as question widgets

use wasm_bindgen::JsCast;
use web_sys::{Event, EventInit, HtmlOptionElement, HtmlSelectElement};

use autoeval_core::{AnswerOption, EvalError, QuestionWidget, SelectionMode};

use crate::interop::dom_error;

#[derive(Debug, Clone)]
pub struct SelectWidget {
    element: HtmlSelectElement,
}

impl SelectWidget {
    pub fn new(element: HtmlSelectElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &HtmlSelectElement {
        &self.element
    }

    fn option_at(&self, index: u32) -> Option<HtmlOptionElement> {
        self.element
            .item(index)
            .and_then(|el| el.dyn_into::<HtmlOptionElement>().ok())
    }

    /// Options paired with their position in the full list
    fn option_elements(&self) -> impl Iterator<Item = (usize, HtmlOptionElement)> + '_ {
        (0..self.element.length())
            .filter_map(move |i| self.option_at(i).map(|option| (i as usize, option)))
    }
}

impl QuestionWidget for SelectWidget {
    fn mode(&self) -> SelectionMode {
        if self.element.multiple() {
            SelectionMode::Multiple
        } else {
            SelectionMode::Single
        }
    }

    fn options(&self) -> Vec<AnswerOption> {
        self.option_elements()
            .map(|(index, option)| AnswerOption {
                index,
                text: option.text(),
                value: option.value(),
                disabled: option.disabled(),
            })
            .collect()
    }

    fn selected_value(&self) -> Option<String> {
        let value = self.element.value();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    fn clear_selection(&mut self) {
        for (_, option) in self.option_elements() {
            option.set_selected(false);
        }
    }

    fn select(&mut self, index: usize) {
        if let Some(option) = self.option_at(index as u32) {
            option.set_selected(true);
        }
    }

    fn notify_changed(&self) -> Result<(), EvalError> {
        let init = EventInit::new();
        init.set_bubbles(true);
        let event = Event::new_with_event_init_dict("change", &init).map_err(dom_error)?;
        self.element.dispatch_event(&event).map_err(dom_error)?;
        Ok(())
    }
}
