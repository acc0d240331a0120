use std::cell::RefCell;
use std::rc::Rc;

use agenda_shared::actions::{
  is_submit_key,
  search_location
};
use agenda_shared::{
  ActionRegistry,
  Axis,
  FilterBinder,
  PageConfig
};
use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{
  Document,
  Element,
  Event,
  HtmlInputElement,
  HtmlSelectElement,
  KeyboardEvent,
  Window
};

use crate::api;
use crate::dom::{
  HashLocation,
  PageView
};

type Binder =
  Rc<RefCell<FilterBinder<HashLocation, PageView>>>;

/// Binds the filter widgets, the schedule
/// triggers and the search box, then runs
/// the initial fragment change.
pub fn mount(
  window: Window,
  document: Document,
  config: PageConfig
) {
  let binder: Binder =
    Rc::new(RefCell::new(FilterBinder::new(
      HashLocation::new(window.location()),
      PageView::new(
        document.clone(),
        config.clone()
      )
    )));

  let mut listeners = vec![
    EventListener::new(
      &window,
      "hashchange",
      {
        let binder = binder.clone();
        move |_: &Event| {
          binder
            .borrow_mut()
            .on_fragment_change();
        }
      }
    ),
  ];

  for (axis, id) in [
    (Axis::Date, &config.date_select_id),
    (Axis::Type, &config.type_select_id)
  ] {
    if let Some(select) = document
      .get_element_by_id(id)
      .and_then(|element| {
        element
          .dyn_into::<HtmlSelectElement>()
          .ok()
      })
    {
      let binder = binder.clone();
      let widget = select.clone();
      listeners.push(EventListener::new(
        &select,
        "change",
        move |_: &Event| {
          binder
            .borrow_mut()
            .on_select(axis, &widget.value());
        }
      ));
    }
  }

  if let Some(reset) =
    document.get_element_by_id(&config.reset_id)
  {
    let binder = binder.clone();
    listeners.push(EventListener::new(
      &reset,
      "click",
      move |event: &Event| {
        event.prevent_default();
        binder.borrow_mut().reset();
      }
    ));
  }

  listeners.push(bind_triggers(
    &document,
    config.registry(),
    config.id_attribute.clone()
  ));

  if let Some(listener) =
    bind_search(&window, &document, &config)
  {
    listeners.push(listener);
  }

  binder.borrow_mut().on_fragment_change();

  tracing::info!(
    listeners = listeners.len(),
    "schedule page bound"
  );
  for listener in listeners {
    listener.forget();
  }
}

/// One document-level click listener; the
/// registry decides which trigger fired.
fn bind_triggers(
  document: &Document,
  registry: ActionRegistry,
  id_attribute: String
) -> EventListener {
  let doc = document.clone();
  EventListener::new(
    document,
    "click",
    move |event: &Event| {
      let Some(target) = event
        .target()
        .and_then(|t| {
          t.dyn_into::<Element>().ok()
        })
      else {
        return;
      };

      let Some(trigger) =
        find_trigger(&target, &registry)
      else {
        return;
      };

      let classes = trigger.class_name();
      let event_id =
        trigger.get_attribute(&id_attribute);
      match registry.resolve(
        classes.split_whitespace(),
        event_id.as_deref()
      ) {
        | Some(request) => {
          event.prevent_default();
          api::dispatch(doc.clone(), request);
        }
        | None => {
          tracing::warn!(
            classes = %classes,
            "schedule trigger without event id"
          );
        }
      }
    }
  )
}

fn find_trigger(
  target: &Element,
  registry: &ActionRegistry
) -> Option<Element> {
  registry
    .trigger_classes()
    .find_map(|class| {
      target
        .closest(&format!(".{class}"))
        .ok()
        .flatten()
    })
}

fn bind_search(
  window: &Window,
  document: &Document,
  config: &PageConfig
) -> Option<EventListener> {
  let input = document
    .get_element_by_id(&config.search_box_id)?
    .dyn_into::<HtmlInputElement>()
    .ok()?;
  let location = window.location();
  let path = config.search_path.clone();
  let field = input.clone();

  Some(EventListener::new(
    &input,
    "keydown",
    move |event: &Event| {
      let Some(key_event) =
        event.dyn_ref::<KeyboardEvent>()
      else {
        return;
      };
      if !is_submit_key(&key_event.key()) {
        return;
      }

      let href =
        search_location(&path, &field.value());
      tracing::debug!(href = %href, "navigating to search");
      if let Err(error) =
        location.set_href(&href)
      {
        tracing::error!(
          ?error,
          "failed to navigate to search"
        );
      }
    }
  ))
}
