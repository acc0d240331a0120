pub mod actions;
pub mod binder;
pub mod config;
pub mod fragment;
pub mod projector;

pub use actions::{
  ActionKind,
  ActionRegistry,
  ScheduleRequest
};
pub use binder::{
  FilterBinder,
  FilterMode,
  FilterView
};
pub use config::PageConfig;
pub use fragment::{
  ALL,
  Axis,
  Location,
  MemoryLocation,
  SelectorState
};
pub use projector::{
  ListItem,
  Projection
};
