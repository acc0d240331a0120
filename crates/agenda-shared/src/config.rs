use serde::{
  Deserialize,
  Serialize
};

use crate::actions::{
  ActionKind,
  ActionRegistry
};

/// DOM hooks and collaborator endpoints of
/// the schedule page.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct PageConfig {
  pub date_select_id:        String,
  pub type_select_id:        String,
  pub reset_id:              String,
  pub empty_state_id:        String,
  pub item_selector:         String,
  pub date_attribute:        String,
  pub type_attribute:        String,
  pub id_attribute:          String,
  pub schedule_container_id: String,
  pub search_box_id:         String,
  pub add_path:              String,
  pub remove_path:           String,
  pub search_path:           String,
  pub add_trigger_class:     String,
  pub remove_trigger_class:  String,
  pub event_id_param:        String
}

impl Default for PageConfig {
  fn default() -> Self {
    let s = |v: &str| v.to_string();
    Self {
      date_select_id:        s("date-select"),
      type_select_id:        s("type-select"),
      reset_id:              s("reset-filters"),
      empty_state_id:        s("no-events"),
      item_selector:         s(".event"),
      date_attribute:        s("data-date"),
      type_attribute:        s("data-type"),
      id_attribute:          s("data-id"),
      schedule_container_id: s("schedule"),
      search_box_id:         s("search-box"),
      add_path:              s("/add"),
      remove_path:           s("/remove"),
      search_path:           s("/search"),
      add_trigger_class:     s(
        "add-to-schedule"
      ),
      remove_trigger_class:  s(
        "remove-from-schedule"
      ),
      event_id_param:        s("event_id")
    }
  }
}

impl PageConfig {
  pub fn from_toml(
    text: &str
  ) -> Result<Self, toml::de::Error> {
    toml::from_str(text)
  }

  pub fn registry(&self) -> ActionRegistry {
    let mut registry = ActionRegistry::new(
      self.event_id_param.clone(),
      self.schedule_container_id.clone()
    );
    registry
      .register(
        self.add_trigger_class.clone(),
        ActionKind::Add,
        self.add_path.clone()
      )
      .register(
        self.remove_trigger_class.clone(),
        ActionKind::Remove,
        self.remove_path.clone()
      );
    registry
  }
}
