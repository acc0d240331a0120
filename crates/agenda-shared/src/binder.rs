use tracing::{
  debug,
  info
};

use crate::fragment::{
  self,
  ALL,
  Axis,
  DEFAULT_FRAGMENT,
  Location,
  MARKER,
  SelectorState
};
use crate::projector::{
  ListItem,
  Projection,
  project
};

/// Whether any filter is active.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum FilterMode {
  Unfiltered,
  Filtered
}

impl FilterMode {
  pub fn of(state: &SelectorState) -> Self {
    if state.is_unfiltered() {
      Self::Unfiltered
    } else {
      Self::Filtered
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Unfiltered => "unfiltered",
      | Self::Filtered => "filtered"
    }
  }
}

/// The widgets and listing the binder
/// drives.
pub trait FilterView {
  fn set_selector(
    &mut self,
    axis: Axis,
    value: &str
  );

  fn items(&self) -> Vec<ListItem>;

  fn apply(
    &mut self,
    projection: &Projection
  );

  fn set_empty(&mut self, empty: bool);
}

/// Keeps the selector widgets and the
/// visible listing in line with the page
/// fragment.
///
/// Writes only ever touch the fragment. The
/// page is expected to call
/// [`FilterBinder::on_fragment_change`] once
/// the new fragment is in place, which is
/// the only place projection happens.
pub struct FilterBinder<L, V> {
  location: L,
  view:     V,
  mode:     Option<FilterMode>
}

impl<L, V> FilterBinder<L, V>
where
  L: Location,
  V: FilterView
{
  pub fn new(
    location: L,
    view: V
  ) -> Self {
    Self {
      location,
      view,
      mode: None
    }
  }

  pub fn location(&self) -> &L {
    &self.location
  }

  pub fn view(&self) -> &V {
    &self.view
  }

  /// Mode after the last fragment change,
  /// `None` before the first one.
  pub fn mode(&self) -> Option<FilterMode> {
    self.mode
  }

  /// Read path. Runs on load and on every
  /// navigation event.
  #[tracing::instrument(skip(self))]
  pub fn on_fragment_change(
    &mut self
  ) -> Projection {
    let state =
      fragment::decode(&mut self.location);

    self
      .view
      .set_selector(Axis::Date, &state.date);
    self
      .view
      .set_selector(Axis::Type, &state.kind);

    let items = self.view.items();
    let projection = project(&state, &items);
    self.view.apply(&projection);
    self
      .view
      .set_empty(projection.is_empty());

    let mode = FilterMode::of(&state);
    if self.mode != Some(mode) {
      info!(
        from = ?self.mode,
        to = mode.as_str(),
        "filter mode changed"
      );
      self.mode = Some(mode);
    }
    debug!(
      date = %state.date,
      kind = %state.kind,
      visible = projection.visible_count(),
      total = items.len(),
      "applied filter"
    );

    projection
  }

  /// Write path for a widget edit. The
  /// other axis keeps whatever the fragment
  /// currently says.
  #[tracing::instrument(skip(self))]
  pub fn on_select(
    &mut self,
    axis: Axis,
    value: &str
  ) {
    let current =
      fragment::decode(&mut self.location);
    let next = current.with(axis, value);
    let target =
      fragment::with_marker(&next);
    debug!(target = %target, "writing fragment");
    self.location.set_fragment(&target);
  }

  /// Puts both widgets back on `all` and
  /// writes the canonical fragment.
  #[tracing::instrument(skip(self))]
  pub fn reset(&mut self) {
    self.view.set_selector(Axis::Date, ALL);
    self.view.set_selector(Axis::Type, ALL);
    self.location.set_fragment(&format!(
      "{MARKER}{DEFAULT_FRAGMENT}"
    ));
  }
}
