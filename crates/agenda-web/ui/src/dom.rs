use agenda_shared::{
  Axis,
  FilterView,
  ListItem,
  Location,
  PageConfig,
  Projection
};
use wasm_bindgen::JsCast;
use web_sys::{
  Document,
  HtmlElement,
  HtmlSelectElement
};

const CONFIG_ELEMENT_ID: &str =
  "agenda-config";

/// Reads the optional inline TOML config,
/// falling back to the defaults.
pub fn load_config(
  document: &Document
) -> PageConfig {
  let Some(text) = document
    .get_element_by_id(CONFIG_ELEMENT_ID)
    .and_then(|element| {
      element.text_content()
    })
  else {
    return PageConfig::default();
  };

  match PageConfig::from_toml(&text) {
    | Ok(config) => {
      tracing::debug!("loaded inline page config");
      config
    }
    | Err(error) => {
      tracing::warn!(
        %error,
        "invalid inline page config; \
         using defaults"
      );
      PageConfig::default()
    }
  }
}

/// The browser's `location.hash`.
pub struct HashLocation {
  location: web_sys::Location
}

impl HashLocation {
  pub fn new(
    location: web_sys::Location
  ) -> Self {
    Self {
      location
    }
  }
}

impl Location for HashLocation {
  // Still percent-encoded here; the codec
  // decodes each key.
  fn fragment(&self) -> String {
    self
      .location
      .hash()
      .unwrap_or_default()
  }

  fn set_fragment(
    &mut self,
    fragment: &str
  ) {
    if let Err(error) =
      self.location.set_hash(fragment)
    {
      tracing::error!(
        ?error,
        fragment,
        "failed to set location hash"
      );
    }
  }
}

/// Selector widgets, event rows and the
/// empty-state notice of the rendered page.
pub struct PageView {
  document:    Document,
  config:      PageConfig,
  date_select: Option<HtmlSelectElement>,
  type_select: Option<HtmlSelectElement>
}

impl PageView {
  pub fn new(
    document: Document,
    config: PageConfig
  ) -> Self {
    let date_select = select_by_id(
      &document,
      &config.date_select_id
    );
    let type_select = select_by_id(
      &document,
      &config.type_select_id
    );
    Self {
      document,
      config,
      date_select,
      type_select
    }
  }

  fn rows(&self) -> Vec<HtmlElement> {
    let Ok(nodes) = self
      .document
      .query_selector_all(
        &self.config.item_selector
      )
    else {
      tracing::warn!(
        selector = %self.config.item_selector,
        "invalid item selector"
      );
      return vec![];
    };

    (0..nodes.length())
      .filter_map(|idx| nodes.item(idx))
      .filter_map(|node| {
        node.dyn_into::<HtmlElement>().ok()
      })
      .collect()
  }
}

impl FilterView for PageView {
  fn set_selector(
    &mut self,
    axis: Axis,
    value: &str
  ) {
    let select = match axis {
      | Axis::Date => &self.date_select,
      | Axis::Type => &self.type_select
    };
    if let Some(select) = select {
      select.set_value(value);
    }
  }

  fn items(&self) -> Vec<ListItem> {
    self
      .rows()
      .iter()
      .map(|row| {
        let attr = |name: &str| {
          row
            .get_attribute(name)
            .unwrap_or_default()
        };
        ListItem {
          id:   row.get_attribute(
            &self.config.id_attribute
          ),
          date: attr(
            &self.config.date_attribute
          ),
          kind: attr(
            &self.config.type_attribute
          )
        }
      })
      .collect()
  }

  fn apply(
    &mut self,
    projection: &Projection
  ) {
    for (idx, row) in
      self.rows().iter().enumerate()
    {
      row.set_hidden(
        !projection.is_visible(idx)
      );
    }
  }

  fn set_empty(&mut self, empty: bool) {
    if let Some(notice) = self
      .document
      .get_element_by_id(
        &self.config.empty_state_id
      )
      .and_then(|element| {
        element
          .dyn_into::<HtmlElement>()
          .ok()
      })
    {
      notice.set_hidden(!empty);
    }
  }
}

fn select_by_id(
  document: &Document,
  id: &str
) -> Option<HtmlSelectElement> {
  let select = document
    .get_element_by_id(id)
    .and_then(|element| {
      element
        .dyn_into::<HtmlSelectElement>()
        .ok()
    });
  if select.is_none() {
    tracing::warn!(id, "selector widget missing");
  }
  select
}
