use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  trace
};

/// Selector value meaning "no filter on
/// this axis".
pub const ALL: &str = "all";

/// Prefix the page puts in front of the
/// encoded state.
pub const MARKER: &str = "#!";

/// Canonical fragment body written when the
/// current one cannot be read.
pub const DEFAULT_FRAGMENT: &str =
  "date=all&type=all";

const DATE_PREFIX: &str = "date=";
const TYPE_PREFIX: &str = "type=";

/// The two filter axes a visitor can pick.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum Axis {
  Date,
  Type
}

/// Current filter selection. The date key
/// is kept in its fragment form, with `_`
/// standing in for spaces.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct SelectorState {
  pub date: String,
  #[serde(rename = "type")]
  pub kind: String
}

impl Default for SelectorState {
  fn default() -> Self {
    Self {
      date: ALL.to_string(),
      kind: ALL.to_string()
    }
  }
}

impl SelectorState {
  pub fn new(
    date: impl AsRef<str>,
    kind: impl Into<String>
  ) -> Self {
    Self {
      date: date_to_key(date.as_ref()),
      kind: kind.into()
    }
  }

  pub fn is_unfiltered(&self) -> bool {
    self.date == ALL && self.kind == ALL
  }

  /// Date as shown on the items, with the
  /// `_` placeholders turned back into
  /// spaces.
  pub fn date_label(&self) -> String {
    self.date.replace('_', " ")
  }

  /// Returns a copy with one axis replaced
  /// and the other left alone.
  pub fn with(
    &self,
    axis: Axis,
    value: &str
  ) -> Self {
    match axis {
      | Axis::Date => {
        Self::new(value, self.kind.clone())
      }
      | Axis::Type => {
        Self {
          date: self.date.clone(),
          kind: value.to_string()
        }
      }
    }
  }
}

/// Read/write access to the navigational
/// fragment of the page.
pub trait Location {
  fn fragment(&self) -> String;

  fn set_fragment(
    &mut self,
    fragment: &str
  );
}

/// A `Location` held in memory. Every write
/// is kept so callers can see what the page
/// would have navigated to.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocation {
  current: String,
  writes:  Vec<String>
}

impl MemoryLocation {
  pub fn new(
    fragment: impl Into<String>
  ) -> Self {
    Self {
      current: fragment.into(),
      writes:  vec![]
    }
  }

  pub fn writes(&self) -> &[String] {
    &self.writes
  }
}

impl Location for MemoryLocation {
  fn fragment(&self) -> String {
    self.current.clone()
  }

  fn set_fragment(
    &mut self,
    fragment: &str
  ) {
    let normalized =
      if fragment.starts_with('#') {
        fragment.to_string()
      } else {
        format!("#{fragment}")
      };
    self.writes.push(normalized.clone());
    self.current = normalized;
  }
}

/// Renders the fragment body,
/// `date=<date>&type=<type>`. Both keys are
/// percent-encoded so separators inside a
/// key survive the trip back.
pub fn encode(
  state: &SelectorState
) -> String {
  format!(
    "{DATE_PREFIX}{}&{TYPE_PREFIX}{}",
    urlencoding::encode(&date_to_key(
      &state.date
    )),
    urlencoding::encode(&state.kind)
  )
}

/// Same as [`encode`] with the `#!` marker
/// in front.
pub fn with_marker(
  state: &SelectorState
) -> String {
  format!("{MARKER}{}", encode(state))
}

/// Parses a fragment without touching the
/// page. Returns `None` when fewer than two
/// `&`-separated parts are present.
pub fn parse(
  raw: &str
) -> Option<SelectorState> {
  let body = strip_marker(raw);
  let mut parts = body.split('&');
  let (Some(date_part), Some(type_part)) =
    (parts.next(), parts.next())
  else {
    return None;
  };

  let date = date_part
    .strip_prefix(DATE_PREFIX)
    .unwrap_or(date_part);
  let kind = type_part
    .strip_prefix(TYPE_PREFIX)
    .unwrap_or(type_part);

  trace!(raw, date, kind, "parsed fragment");
  Some(SelectorState {
    date: unescape_key(date),
    kind: unescape_key(kind)
  })
}

/// Browsers hand `location.hash` back
/// percent-encoded. A key that is not valid
/// UTF-8 once decoded is kept as written.
fn unescape_key(key: &str) -> String {
  match urlencoding::decode(key) {
    | Ok(decoded) => decoded.into_owned(),
    | Err(error) => {
      debug!(key, %error, "undecodable fragment key");
      key.to_string()
    }
  }
}

/// Reads the selector state from the page
/// fragment. An incomplete fragment is first
/// rewritten to the canonical default.
#[tracing::instrument(skip(location))]
pub fn decode<L: Location + ?Sized>(
  location: &mut L
) -> SelectorState {
  let raw = location.fragment();
  if let Some(state) = parse(&raw) {
    return state;
  }

  debug!(
    raw = %raw,
    "fragment incomplete; rewriting \
     to default"
  );
  location.set_fragment(&format!(
    "{MARKER}{DEFAULT_FRAGMENT}"
  ));
  parse(&location.fragment())
    .unwrap_or_default()
}

fn strip_marker(raw: &str) -> &str {
  raw
    .strip_prefix(MARKER)
    .or_else(|| raw.strip_prefix('#'))
    .unwrap_or(raw)
}

fn date_to_key(date: &str) -> String {
  date.replace(' ', "_")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn encode_replaces_spaces_in_date() {
    let state = SelectorState {
      date: "july 10".to_string(),
      kind: "music".to_string()
    };
    assert_eq!(
      encode(&state),
      "date=july_10&type=music"
    );
  }

  #[test]
  fn parse_strips_prefixes_only_once()
  {
    let state = parse(
      "#!date=date=x&type=type=y"
    )
    .unwrap();
    assert_eq!(state.date, "date=x");
    assert_eq!(state.kind, "type=y");
  }

  #[test]
  fn parse_accepts_plain_hash() {
    let state =
      parse("#date=all&type=poster")
        .unwrap();
    assert_eq!(state.kind, "poster");
  }

  #[test]
  fn parse_is_best_effort_for_odd_parts()
  {
    let state =
      parse("#!&").expect("two parts");
    assert_eq!(state.date, "");
    assert_eq!(state.kind, "");

    let state =
      parse("#!july_10&talk&extra")
        .unwrap();
    assert_eq!(state.date, "july_10");
    assert_eq!(state.kind, "talk");
  }

  #[test]
  fn separators_inside_keys_survive() {
    let state =
      SelectorState::new(ALL, "Q&A");
    let fragment = with_marker(&state);
    assert_eq!(
      fragment,
      "#!date=all&type=Q%26A"
    );

    let mut location =
      MemoryLocation::new(fragment);
    assert_eq!(decode(&mut location), state);

    let odd = SelectorState::new(
      "day #2",
      "a=b%c"
    );
    assert_eq!(
      parse(&with_marker(&odd)),
      Some(odd)
    );
  }

  #[test]
  fn parse_decodes_browser_escapes() {
    let state = parse(
      "#!date=juli_%C3%A9t%C3%A9&type=poster%20session"
    )
    .unwrap();
    assert_eq!(state.kind, "poster session");
    assert_eq!(state.date, "juli_été");
    assert_eq!(state.date_label(), "juli été");
  }

  #[test]
  fn parse_keeps_undecodable_key() {
    let state =
      parse("#!date=%FF&type=all").unwrap();
    assert_eq!(state.date, "%FF");
  }

  #[test]
  fn parse_rejects_single_part() {
    assert!(parse("").is_none());
    assert!(parse("#!").is_none());
    assert!(
      parse("#!date=july_10").is_none()
    );
  }

  #[test]
  fn decode_heals_missing_fragment() {
    let mut location =
      MemoryLocation::new("");
    let state = decode(&mut location);
    assert_eq!(
      state,
      SelectorState::default()
    );
    assert_eq!(
      location.fragment(),
      "#!date=all&type=all"
    );
    assert_eq!(location.writes().len(), 1);
  }

  #[test]
  fn decode_leaves_valid_fragment_alone()
  {
    let mut location = MemoryLocation::new(
      "#!date=july_10&type=music"
    );
    let state = decode(&mut location);
    assert_eq!(state.date, "july_10");
    assert_eq!(state.date_label(), "july 10");
    assert!(location.writes().is_empty());
  }

  #[test]
  fn with_keeps_other_axis() {
    let state =
      SelectorState::new("july 10", ALL);
    let next =
      state.with(Axis::Type, "workshop");
    assert_eq!(next.date, "july_10");
    assert_eq!(next.kind, "workshop");
    assert_eq!(
      next.with(Axis::Date, ALL).kind,
      "workshop"
    );
  }
}
