use serde::{
  Deserialize,
  Serialize
};
use tracing::trace;

use crate::fragment::{
  ALL,
  SelectorState
};

/// One row of the rendered event listing.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct ListItem {
  #[serde(default)]
  pub id:   Option<String>,
  pub date: String,
  #[serde(rename = "type")]
  pub kind: String
}

impl ListItem {
  pub fn new(
    date: impl Into<String>,
    kind: impl Into<String>
  ) -> Self {
    Self {
      id:   None,
      date: date.into(),
      kind: kind.into()
    }
  }

  pub fn with_id(
    mut self,
    id: impl Into<String>
  ) -> Self {
    self.id = Some(id.into());
    self
  }
}

/// Visibility of every item, in the order
/// the items were given.
#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub struct Projection {
  visible: Vec<bool>,
  count:   usize
}

impl Projection {
  pub fn flags(&self) -> &[bool] {
    &self.visible
  }

  pub fn is_visible(
    &self,
    index: usize
  ) -> bool {
    self
      .visible
      .get(index)
      .copied()
      .unwrap_or(false)
  }

  pub fn visible_count(&self) -> usize {
    self.count
  }

  /// True when nothing is left on screen.
  pub fn is_empty(&self) -> bool {
    self.count == 0
  }

  /// Items that stay visible.
  pub fn select<'a>(
    &'a self,
    items: &'a [ListItem]
  ) -> impl Iterator<Item = &'a ListItem>
  {
    items
      .iter()
      .zip(&self.visible)
      .filter_map(|(item, visible)| {
        visible.then_some(item)
      })
  }
}

/// Computes which items match the current
/// selection. A sentinel `all` on one axis
/// is never compared against item data.
#[tracing::instrument(skip(items), fields(items = items.len()))]
pub fn project(
  state: &SelectorState,
  items: &[ListItem]
) -> Projection {
  if state.is_unfiltered() {
    return Projection {
      visible: vec![true; items.len()],
      count:   items.len()
    };
  }

  let date_label = state.date_label();
  let visible: Vec<bool> = items
    .iter()
    .map(|item| {
      let ok = if state.kind == ALL {
        item.date == date_label
      } else if state.date == ALL {
        item.kind == state.kind
      } else {
        item.date == date_label
          && item.kind == state.kind
      };
      trace!(id = ?item.id, ok, "item visibility");
      ok
    })
    .collect();

  let count =
    visible.iter().filter(|v| **v).count();
  Projection {
    visible,
    count
  }
}
