//! Browser tests for the DOM adapters
//!
//! Run with `wasm-pack test --headless --chrome rust/autoeval`.

#![cfg(target_arch = "wasm32")]

use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlElement, HtmlSelectElement};

use autoeval::controller::Controller;
use autoeval::page::DomPage;
use autoeval::settle::{SettleOutcome, SettleWatch};
use autoeval::ui::{PanelView, LOG_LIST_ID, PREFERRED_BUTTON_ID};
use autoeval::widget::SelectWidget;
use autoeval::{parse_config, styles};
use autoeval_core::{
    EvaluatorConfig, Evaluator, FormPage, PageSelectors, PanelModel, QuestionWidget, ScoreReport,
    SelectionMode, SettleConfig, Strategy,
};

wasm_bindgen_test_configure!(run_in_browser);

const FIXTURE: &str = r#"
<h2 id="lbl_nombre_cuestionario">Evaluación docente</h2>
<div class="grupos-preguntas">
  <h3>Metodología</h3>
  <select class="browser-default" id="q1">
    <option value="" disabled selected>Seleccione</option>
    <option value="5">Siempre</option>
    <option value="4">Casi siempre</option>
    <option value="3">A veces</option>
    <option value="2">Casi nunca</option>
    <option value="1">Nunca</option>
  </select>
  <select class="browser-default" id="q2">
    <option value="">Seleccione</option>
    <option value="5">Siempre</option>
    <option value="4">Casi siempre</option>
    <option value="3">A veces</option>
    <option value="2">Casi nunca</option>
    <option value="1">Nunca</option>
  </select>
  <select class="browser-default" id="q3" multiple>
    <option value="a">Teoría</option>
    <option value="b" disabled>Laboratorio</option>
    <option value="c">Proyecto</option>
  </select>
</div>
<div class="grupos-preguntas">
  <h3></h3>
  <select class="browser-default" id="q4">
    <option value="5">Siempre</option>
    <option value="1">Nunca</option>
  </select>
</div>
"#;

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn mount_fixture() -> HtmlElement {
    let doc = document();
    let root = doc
        .create_element("div")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    root.set_inner_html(FIXTURE);
    doc.body().unwrap().append_child(&root).unwrap();
    root
}

fn select(id: &str) -> SelectWidget {
    SelectWidget::new(
        document()
            .get_element_by_id(id)
            .unwrap()
            .dyn_into::<HtmlSelectElement>()
            .unwrap(),
    )
}

#[wasm_bindgen_test]
fn select_widget_reads_options() {
    let root = mount_fixture();
    let q1 = select("q1");
    assert_eq!(q1.mode(), SelectionMode::Single);
    let options = q1.options();
    assert_eq!(options.len(), 6);
    assert!(options[0].disabled);
    assert_eq!(options[1].value, "5");
    assert_eq!(select("q3").mode(), SelectionMode::Multiple);
    root.remove();
}

#[wasm_bindgen_test]
fn page_fill_and_score_first() {
    let root = mount_fixture();
    let page = DomPage::new(document(), PageSelectors::default());
    assert!(page.anchor().is_ok());
    assert_eq!(page.questions().unwrap().len(), 4);

    let sections = page.sections().unwrap();
    assert_eq!(sections.len(), 2);
    // multi-selects are excluded from scoring lookups
    assert_eq!(sections[0].questions.len(), 2);

    let evaluator = Evaluator::default();
    let mut rng = SmallRng::seed_from_u64(4);
    let fill = evaluator.fill(&page, Strategy::First, &mut rng).unwrap();
    assert_eq!(fill.filled, 4);

    let selected_multi = select("q3")
        .element()
        .selected_options()
        .length();
    assert!((1..=2).contains(&selected_multi));

    let report = evaluator.score(&page).unwrap();
    assert_eq!(
        report.lines(),
        vec![
            "Metodología: 100% (8/8)".to_string(),
            "Sección Desconocida: 100% (4/4)".to_string(),
        ]
    );
    root.remove();
}

#[wasm_bindgen_test]
fn change_events_bubble() {
    let root = mount_fixture();
    let hits = std::rc::Rc::new(std::cell::Cell::new(0));
    let counter = hits.clone();
    let listener = wasm_bindgen::closure::Closure::<dyn FnMut(web_sys::Event)>::new(move |_| {
        counter.set(counter.get() + 1);
    });
    root.add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
        .unwrap();

    select("q2").notify_changed().unwrap();
    assert_eq!(hits.get(), 1);
    root.remove();
}

#[wasm_bindgen_test]
fn panel_renders_model() {
    let root = mount_fixture();
    let doc = document();
    styles::inject(&doc).unwrap();
    styles::inject(&doc).unwrap();
    assert_eq!(doc.query_selector_all("#auto-eval-styles").unwrap().length(), 1);

    let page = DomPage::new(doc.clone(), PageSelectors::default());
    let view = PanelView::build(&doc, &page.anchor().unwrap()).unwrap();

    let mut model = PanelModel::new();
    view.render(&model).unwrap();
    let button = doc.get_element_by_id(PREFERRED_BUTTON_ID).unwrap();
    assert_eq!(button.text_content().unwrap(), "Cargando...");

    model.set_preferred(Strategy::First);
    model.begin_run().unwrap();
    view.render(&model).unwrap();
    assert!(view.preferred_button().disabled());
    assert_eq!(button.text_content().unwrap(), "Evaluar (Primero)");

    model.finish_run(&ScoreReport::default(), 0);
    view.render(&model).unwrap();
    assert!(!view.preferred_button().disabled());
    let log = doc.get_element_by_id(LOG_LIST_ID).unwrap();
    assert!(log.text_content().unwrap().contains("Total: 0 preguntas completadas."));

    view.container().remove();
    root.remove();
}

#[wasm_bindgen_test]
async fn run_survives_host_click_during_fill() {
    let root = mount_fixture();
    let controller = Controller::mount(document(), EvaluatorConfig::fixed_delay())
        .unwrap()
        .unwrap();

    // a host listener that clicks the page for every change event it sees
    let body = document().body().unwrap();
    let on_change = wasm_bindgen::closure::Closure::<dyn FnMut(web_sys::Event)>::new(move |_| {
        body.click();
    });
    root.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())
        .unwrap();

    controller.run(Strategy::First).await;

    let log = document().get_element_by_id(LOG_LIST_ID).unwrap();
    let text = log.text_content().unwrap();
    assert!(text.contains("Metodología: 100% (8/8)"));
    assert!(text.contains("Total: 4 preguntas completadas."));

    root.remove();
    on_change.forget();
    // document click handlers stay registered; keep their target alive
    std::mem::forget(controller);
}

#[wasm_bindgen_test]
async fn settle_falls_back_to_delay() {
    let watch = SettleWatch::arm(None, &SettleConfig::fixed_delay(10)).unwrap();
    assert_eq!(watch.wait().await.unwrap(), SettleOutcome::Timeout);
}

#[wasm_bindgen_test]
async fn settle_resolves_on_mutation() {
    let root = mount_fixture();
    let node: web_sys::Node = root.clone().into();
    let watch = SettleWatch::arm(Some(&node), &SettleConfig::default()).unwrap();
    root.set_attribute("data-touched", "yes").unwrap();
    assert_eq!(watch.wait().await.unwrap(), SettleOutcome::Mutation);
    root.remove();
}

#[wasm_bindgen_test]
fn config_parsing() {
    assert_eq!(parse_config(JsValue::UNDEFINED).unwrap(), EvaluatorConfig::default());
    let bad = js_sys::JSON::parse(r#"{ "maxScorePerQuestion": 0 }"#).unwrap();
    assert!(parse_config(bad).is_err());
}
