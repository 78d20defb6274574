//! Controller: one instance per injected panel
//!
//! Owns the panel model, view, page adapter and preference store. Event
//! handlers hold a `Weak` back-reference, so nothing here is global.
//!
//! Run sequence: `begin_run` → fill → settle → score → `finish_run`.
//! Buttons stay disabled for the whole run; that is the only mutual exclusion.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, MouseEvent};

use autoeval_core::{
    EvalError, Evaluator, EvaluatorConfig, FillReport, PanelModel, ScoreReport, Strategy,
};

use crate::interop::dom_error;
use crate::log;
use crate::page::DomPage;
use crate::settle::SettleWatch;
use crate::storage::{Subscription, SyncPreferenceStore};
use crate::styles;
use crate::ui::PanelView;

type ClickHandler = Closure<dyn FnMut(MouseEvent)>;

pub struct Controller {
    page: DomPage,
    view: PanelView,
    evaluator: Evaluator,
    store: SyncPreferenceStore,
    model: RefCell<PanelModel>,
    // kept apart from the model: host change listeners may click while a fill holds it
    rng: RefCell<SmallRng>,
    handlers: RefCell<Vec<ClickHandler>>,
    subscription: RefCell<Option<Subscription>>,
}

/// Seed from the browser's generator; the core never touches OS entropy
fn browser_seeded_rng() -> SmallRng {
    let high = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let low = (js_sys::Math::random() * u32::MAX as f64) as u64;
    SmallRng::seed_from_u64((high << 32) ^ low ^ js_sys::Date::now() as u64)
}

impl Controller {
    /// Inject the panel. `Ok(None)` when the anchor is missing.
    pub fn mount(document: Document, config: EvaluatorConfig) -> Result<Option<Rc<Self>>, EvalError> {
        let page = DomPage::new(document.clone(), config.selectors.clone());
        let anchor = match page.anchor() {
            Ok(anchor) => anchor,
            Err(EvalError::AnchorNotFound(selector)) => {
                log::info(&format!("Target header not found ({}).", selector));
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        styles::inject(&document)?;
        let view = PanelView::build(&document, &anchor)?;

        let controller = Rc::new(Self {
            page,
            view,
            evaluator: Evaluator::new(config),
            store: SyncPreferenceStore::new(),
            model: RefCell::new(PanelModel::new()),
            rng: RefCell::new(browser_seeded_rng()),
            handlers: RefCell::new(Vec::new()),
            subscription: RefCell::new(None),
        });

        controller.wire_events()?;
        controller.render();
        Ok(Some(controller))
    }

    // -------------------------------------------------------------------------
    // Preference
    // -------------------------------------------------------------------------

    /// Read the stored preference and start listening for changes
    pub async fn sync_preference(self: &Rc<Self>) {
        let strategy = match self.store.load().await {
            Ok(strategy) => strategy,
            Err(err) => {
                log::warn(&format!("Could not load preference, using default: {}", err));
                Strategy::FALLBACK
            }
        };
        self.apply_preference(strategy);

        let weak = Rc::downgrade(self);
        match self.store.subscribe(move |strategy| {
            if let Some(controller) = weak.upgrade() {
                controller.apply_preference(strategy);
            }
        }) {
            Ok(subscription) => *self.subscription.borrow_mut() = Some(subscription),
            Err(err) => log::warn(&format!("Preference changes will not be followed: {}", err)),
        }
    }

    /// Applied immediately, even while a run is in flight
    pub fn apply_preference(&self, strategy: Strategy) {
        self.model.borrow_mut().set_preferred(strategy);
        log::info(&format!("UI strategy updated: {}", strategy));
        self.render();
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    fn wire_events(self: &Rc<Self>) -> Result<(), EvalError> {
        let weak = Rc::downgrade(self);
        self.listen(self.view.preferred_button(), &weak, |controller, event| {
            event.prevent_default();
            let strategy = controller.model.borrow().preferred();
            controller.evaluate(strategy);
        })?;

        self.listen(self.view.toggle_button(), &weak, |controller, event| {
            event.prevent_default();
            event.stop_propagation();
            controller.model.borrow_mut().toggle_dropdown();
            controller.render();
        })?;

        for (strategy, item) in self.view.items() {
            let strategy = *strategy;
            self.listen(item, &weak, move |controller, event| {
                event.prevent_default();
                controller.model.borrow_mut().close_dropdown();
                controller.render();
                controller.evaluate(strategy);
            })?;
        }

        // any click outside the button group closes the menu
        self.listen(self.page.document(), &weak, |controller, event| {
            let open = controller.model.borrow().is_dropdown_open();
            if open && !controller.view.group_contains(event.target()) {
                controller.model.borrow_mut().close_dropdown();
                controller.render();
            }
        })?;

        Ok(())
    }

    fn listen<F>(&self, target: &web_sys::EventTarget, weak: &Weak<Self>, mut handler: F) -> Result<(), EvalError>
    where
        F: FnMut(Rc<Self>, MouseEvent) + 'static,
    {
        let weak = weak.clone();
        let closure = ClickHandler::new(move |event: MouseEvent| {
            if let Some(controller) = weak.upgrade() {
                handler(controller, event);
            }
        });
        target
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(dom_error)?;
        self.handlers.borrow_mut().push(closure);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Runs
    // -------------------------------------------------------------------------

    /// Start a run in the background
    pub fn evaluate(self: &Rc<Self>, strategy: Strategy) {
        let controller = Rc::clone(self);
        wasm_bindgen_futures::spawn_local(async move {
            controller.run(strategy).await;
        });
    }

    /// One complete run; always ends idle
    pub async fn run(&self, strategy: Strategy) {
        if let Err(err) = self.model.borrow_mut().begin_run() {
            log::warn(&err.to_string());
            return;
        }
        self.render();

        match self.fill_and_score(strategy).await {
            Ok((fill, report)) => {
                log::info(&format!(
                    "{} questions filled with '{}', {} skipped",
                    fill.filled, strategy, fill.skipped
                ));
                self.model.borrow_mut().finish_run(&report, fill.filled);
            }
            Err(err) => {
                match &err {
                    EvalError::NoQuestions => log::warn(&err.to_string()),
                    _ => log::error(&format!("Failed during evaluation: {}", err)),
                }
                self.model.borrow_mut().fail_run(err.user_message());
            }
        }
        self.render();
    }

    async fn fill_and_score(&self, strategy: Strategy) -> Result<(FillReport, ScoreReport), EvalError> {
        let settle_config = &self.evaluator.config().settle;
        let root = self.page.form_root();
        let watch = SettleWatch::arm(root.as_ref(), settle_config)?;

        let fill = {
            let mut rng = self.rng.borrow_mut();
            self.evaluator.fill(&self.page, strategy, &mut *rng)?
        };

        let outcome = watch.wait().await?;
        log::info(&format!("Page settled ({:?})", outcome));

        let report = self.evaluator.score(&self.page)?;
        Ok((fill, report))
    }

    fn render(&self) {
        let model = self.model.borrow();
        if let Err(err) = self.view.render(&model) {
            log::error(&format!("Failed to render panel: {}", err));
        }
    }
}
