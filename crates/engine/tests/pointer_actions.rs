//! Stability-gated actions against a scripted document

use std::sync::Arc;
use std::time::Duration;

use pagepilot_dom_port::{
    DomEvent, FakeDom, FakeElement, FrameRef, Point, Rect, SelectOption,
};
use pagepilot_engine::{
    ActionOpts, Engine, EngineError, RetryBudget, SelectOpts, WaitOpts, WaitPolicy,
};

fn engine(dom: &Arc<FakeDom>) -> Engine {
    Engine::new(dom.clone())
}

fn quick() -> ActionOpts {
    ActionOpts {
        policy: Some(WaitPolicy::new(
            Duration::from_millis(100),
            Duration::from_millis(500),
        )),
        ..ActionOpts::default()
    }
}

#[tokio::test(start_paused = true)]
async fn click_travels_to_the_element_center() {
    let dom = Arc::new(FakeDom::new());
    let button = dom.insert(FakeElement::new("#go").at(Rect::new(200.0, 100.0, 100.0, 40.0)));
    let eng = engine(&dom);

    let clicked = eng.click("#go", ActionOpts::default()).await.unwrap();

    assert_eq!(clicked, button);
    assert_eq!(dom.events_for(button), vec![DomEvent::Click]);
    assert_eq!(eng.pointer_position().await, Point::new(250.0, 120.0));
}

#[tokio::test(start_paused = true)]
async fn moved_target_is_retried_once_then_clicked() {
    let dom = Arc::new(FakeDom::new());
    let stable = Rect::new(100.0, 300.0, 80.0, 20.0);
    let button = dom.insert(FakeElement::new("#shifty"));
    // visibility probe, first attempt (measure, re-measure sees the shift),
    // then the queue drains and the element holds still
    dom.script_rects(
        button,
        [
            Rect::new(100.0, 100.0, 80.0, 20.0),
            Rect::new(100.0, 100.0, 80.0, 20.0),
            stable,
        ],
    );
    let eng = engine(&dom);

    let clicked = eng.click("#shifty", ActionOpts::default()).await.unwrap();

    assert_eq!(clicked, button);
    // 1 visibility probe + 2 measurements per attempt, success on attempt 2
    assert_eq!(dom.rect_queries(button), 5);
    assert_eq!(eng.pointer_position().await, stable.center());
}

#[tokio::test(start_paused = true)]
async fn perpetually_moving_target_exhausts_the_budget() {
    let dom = Arc::new(FakeDom::new());
    let button = dom.insert(FakeElement::new("#restless"));
    let rects = (0..16).map(|i| Rect::new(100.0, 50.0 + 10.0 * f64::from(i), 80.0, 20.0));
    dom.script_rects(button, rects);
    let eng = engine(&dom);

    let err = eng
        .click(
            "#restless",
            ActionOpts {
                retry: Some(RetryBudget { max_retries: 3 }),
                ..ActionOpts::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::TargetUnstable("#restless".to_string()));
    assert!(dom.events_for(button).is_empty());
}

#[tokio::test(start_paused = true)]
async fn offscreen_target_is_scrolled_into_view_first() {
    let dom = Arc::new(FakeDom::new());
    let below_fold = dom.insert(FakeElement::new("#deep").at(Rect::new(100.0, 900.0, 80.0, 20.0)));
    let eng = engine(&dom);

    eng.click("#deep", ActionOpts::default()).await.unwrap();
    assert_eq!(dom.scrolled(), vec![below_fold]);
}

#[tokio::test(start_paused = true)]
async fn frame_offset_shifts_the_travel_target() {
    let dom = Arc::new(FakeDom::new());
    let frame = FrameRef::new("sidebar");
    let button = dom.insert(
        FakeElement::new("#inner")
            .in_frame(frame.clone())
            .at(Rect::new(10.0, 10.0, 20.0, 20.0)),
    );
    dom.set_frame_offset(frame.clone(), Point::new(400.0, 200.0));
    let eng = engine(&dom);

    eng.click("#inner", ActionOpts::in_frame(frame)).await.unwrap();

    assert_eq!(dom.events_for(button), vec![DomEvent::Click]);
    assert_eq!(eng.pointer_position().await, Point::new(420.0, 220.0));
}

#[tokio::test]
async fn instant_click_skips_travel_and_delays() {
    let dom = Arc::new(FakeDom::new());
    let button = dom.insert(FakeElement::new("#fast"));
    let eng = engine(&dom);

    eng.click("#fast", ActionOpts::instant()).await.unwrap();

    assert_eq!(dom.events_for(button), vec![DomEvent::Click]);
    // no measurements happen without the stability gate
    assert_eq!(dom.rect_queries(button), 0);
    assert_eq!(eng.pointer_position().await, Point::default());
}

#[tokio::test(start_paused = true)]
async fn fill_fires_reactive_input_then_change() {
    let dom = Arc::new(FakeDom::new());
    let field = dom.insert(FakeElement::new("#email"));
    let eng = engine(&dom);

    eng.fill("#email", "a@b.example", ActionOpts::default())
        .await
        .unwrap();

    assert_eq!(dom.value_of(field).as_deref(), Some("a@b.example"));
    assert_eq!(
        dom.events_for(field),
        vec![
            DomEvent::Focus,
            DomEvent::Input {
                force_reactive: true
            },
            DomEvent::Change,
        ]
    );
}

#[tokio::test]
async fn fill_notifies_even_without_animation() {
    let dom = Arc::new(FakeDom::new());
    let field = dom.insert(FakeElement::new("#name").with_value("old"));
    let eng = engine(&dom);

    eng.fill("#name", "", ActionOpts::instant()).await.unwrap();

    // no focus on the instant path, but the notifications always fire
    assert_eq!(dom.value_of(field).as_deref(), Some(""));
    assert_eq!(
        dom.events_for(field),
        vec![
            DomEvent::Input {
                force_reactive: true
            },
            DomEvent::Change,
        ]
    );
}

#[tokio::test]
async fn check_is_idempotent() {
    let dom = Arc::new(FakeDom::new());
    let agree = dom.insert(FakeElement::new("#agree").checkbox(true));
    let eng = engine(&dom);

    eng.check("#agree", true, ActionOpts::instant()).await.unwrap();

    assert!(dom.events_for(agree).is_empty());
    assert_eq!(dom.checked_state(agree), Some(true));
}

#[tokio::test]
async fn check_clicks_to_reach_the_desired_state() {
    let dom = Arc::new(FakeDom::new());
    let agree = dom.insert(FakeElement::new("#agree").checkbox(true));
    let eng = engine(&dom);

    eng.check("#agree", false, ActionOpts::instant()).await.unwrap();

    assert_eq!(dom.events_for(agree), vec![DomEvent::Click]);
    assert_eq!(dom.checked_state(agree), Some(false));
}

fn select_control(dom: &Arc<FakeDom>) -> pagepilot_dom_port::ElementHandle {
    dom.insert(FakeElement::new("#choice").with_options(vec![
        SelectOption::new("a", "Option A"),
        SelectOption::new("b", "Option B"),
        SelectOption::new("c", "Option C"),
    ]))
}

#[tokio::test]
async fn select_modes_agree_on_the_resulting_value() {
    for selection in [
        SelectOpts::by_value("b"),
        SelectOpts::by_index(1),
        SelectOpts::by_label("Option B"),
    ] {
        let dom = Arc::new(FakeDom::new());
        let control = select_control(&dom);
        let eng = engine(&dom);

        eng.select("#choice", selection, ActionOpts::instant())
            .await
            .unwrap();

        assert_eq!(dom.value_of(control).as_deref(), Some("b"));
        assert_eq!(dom.selected_of(control), Some(1));
        assert_eq!(
            dom.events_for(control),
            vec![DomEvent::Focus, DomEvent::Change]
        );
    }
}

#[tokio::test]
async fn select_without_criteria_fails_before_touching_the_dom() {
    let dom = Arc::new(FakeDom::new());
    select_control(&dom);
    let eng = engine(&dom);

    let err = eng
        .select("#choice", SelectOpts::default(), ActionOpts::instant())
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::InvalidSelection);
    assert!(dom.events().is_empty());
}

#[tokio::test]
async fn select_miss_leaves_the_control_unchanged() {
    let dom = Arc::new(FakeDom::new());
    let control = select_control(&dom);
    let eng = engine(&dom);

    eng.select("#choice", SelectOpts::by_value("zzz"), ActionOpts::instant())
        .await
        .unwrap();

    // the selection stays put, but listeners still see the change event
    assert_eq!(dom.selected_of(control), Some(0));
    assert_eq!(
        dom.events_for(control),
        vec![DomEvent::Focus, DomEvent::Change]
    );
}

#[tokio::test]
async fn actions_on_missing_elements_surface_not_found() {
    let dom = Arc::new(FakeDom::new());
    let eng = engine(&dom);

    let err = eng.click("#ghost", quick()).await.unwrap_err();
    assert_eq!(err, EngineError::not_found("#ghost"));

    let err = eng
        .fill("#ghost", "x", quick())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::not_found("#ghost"));
}

#[tokio::test(start_paused = true)]
async fn handle_targets_skip_requerying() {
    let dom = Arc::new(FakeDom::new());
    let button = dom.insert(FakeElement::new("#once"));
    let eng = engine(&dom);

    let found = eng.await_element("#once", WaitOpts::default()).await.unwrap();
    dom.remove(dom.insert(FakeElement::new("#once"))); // unrelated churn

    eng.click(found, ActionOpts::instant()).await.unwrap();
    assert_eq!(dom.events_for(button), vec![DomEvent::Click]);
}
