//! Settings popup: pick and save the preferred strategy

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, FormData, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement};

use autoeval_core::{EvalError, Strategy};

use crate::interop::dom_error;
use crate::log;
use crate::storage::SyncPreferenceStore;
use crate::timer::sleep;

const FORM_ID: &str = "strategyForm";
const STATUS_ID: &str = "status";
const SAVE_BUTTON_ID: &str = "saveButton";
const CONTAINER_ID: &str = "strategy-container";
const RADIO_NAME: &str = "strategy";

pub const SAVED_MESSAGE: &str = "¡Preferencia guardada!";
pub const NOTHING_SELECTED_MESSAGE: &str = "Por favor, selecciona una opción.";
pub const SAVE_LABEL: &str = "Guardar";
pub const SAVED_LABEL: &str = "Guardado";
const STATUS_RESET_MS: u32 = 1500;

#[derive(Clone)]
struct PopupElements {
    document: Document,
    form: HtmlFormElement,
    container: HtmlElement,
    status: Option<HtmlElement>,
    save_button: Option<HtmlButtonElement>,
}

impl PopupElements {
    fn find(document: &Document) -> Option<Self> {
        let by_id = |id: &str| document.get_element_by_id(id);
        let form = by_id(FORM_ID)?.dyn_into::<HtmlFormElement>().ok()?;
        let container = by_id(CONTAINER_ID)?.dyn_into::<HtmlElement>().ok()?;
        Some(Self {
            document: document.clone(),
            form,
            container,
            status: by_id(STATUS_ID).and_then(|el| el.dyn_into().ok()),
            save_button: by_id(SAVE_BUTTON_ID).and_then(|el| el.dyn_into().ok()),
        })
    }

    fn set_status(&self, text: &str) {
        if let Some(status) = &self.status {
            status.set_text_content(Some(text));
        }
    }

    fn set_button_label(&self, text: &str) {
        if let Some(button) = &self.save_button {
            button.set_text_content(Some(text));
        }
    }

    /// One radio per strategy, the current one checked
    fn build_options(&self, current: Strategy) -> Result<(), EvalError> {
        self.container.set_inner_html("");
        for strategy in Strategy::ALL {
            let row = self.document.create_element("div").map_err(dom_error)?;
            let label = self.document.create_element("label").map_err(dom_error)?;
            let radio = self
                .document
                .create_element("input")
                .map_err(dom_error)?
                .dyn_into::<HtmlInputElement>()
                .map_err(|_| EvalError::Dom("<input> is not an HTMLInputElement".to_string()))?;
            radio.set_type("radio");
            radio.set_name(RADIO_NAME);
            radio.set_value(strategy.id());
            radio.set_checked(strategy == current);

            label.append_child(&radio).map_err(dom_error)?;
            let text = self
                .document
                .create_text_node(&format!(" {}", strategy.description()));
            label.append_child(&text).map_err(dom_error)?;
            row.append_child(&label).map_err(dom_error)?;
            self.container.append_child(&row).map_err(dom_error)?;
        }
        Ok(())
    }

    fn selected_strategy(&self) -> Result<Option<Strategy>, EvalError> {
        let data = FormData::new_with_form(&self.form).map_err(dom_error)?;
        Ok(data
            .get(RADIO_NAME)
            .as_string()
            .filter(|id| !id.is_empty())
            .map(|id| Strategy::from_id(&id)))
    }
}

async fn save(elements: PopupElements, strategy: Strategy) {
    if let Err(err) = SyncPreferenceStore::new().save(strategy).await {
        log::error(&format!("Could not save preference: {}", err));
        elements.set_status(&err.user_message());
        return;
    }
    elements.set_status(SAVED_MESSAGE);
    elements.set_button_label(SAVED_LABEL);

    if sleep(STATUS_RESET_MS).await.is_ok() {
        elements.set_status("");
        elements.set_button_label(SAVE_LABEL);
    }
}

/// Wire the popup page. Missing markup is logged and leaves the page inert.
pub async fn run(document: Document) -> Result<(), EvalError> {
    let Some(elements) = PopupElements::find(&document) else {
        log::error("Popup: could not find key elements.");
        return Ok(());
    };

    let current = match SyncPreferenceStore::new().load().await {
        Ok(strategy) => strategy,
        Err(err) => {
            log::warn(&format!("Could not load preference, using default: {}", err));
            Strategy::FALLBACK
        }
    };
    elements.build_options(current)?;

    let handler_elements = elements.clone();
    let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        match handler_elements.selected_strategy() {
            Ok(Some(strategy)) => {
                wasm_bindgen_futures::spawn_local(save(handler_elements.clone(), strategy));
            }
            Ok(None) => handler_elements.set_status(NOTHING_SELECTED_MESSAGE),
            Err(err) => {
                log::error(&err.to_string());
                handler_elements.set_status(&err.user_message());
            }
        }
    });
    elements
        .form
        .add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())
        .map_err(dom_error)?;
    // the popup page lives exactly as long as this listener
    on_submit.forget();

    Ok(())
}
