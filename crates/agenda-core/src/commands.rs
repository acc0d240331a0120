use std::fs;
use std::io::Write;
use std::path::Path;

use agenda_shared::actions::search_location;
use agenda_shared::fragment::{self, with_marker};
use agenda_shared::{
    ActionKind, Axis, FilterBinder, FilterMode, FilterView, ListItem, Location, MemoryLocation,
    Projection, SelectorState,
};
use anyhow::{Context, anyhow};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::cli::{Command, SelectArgs};
use crate::config::Config;
use crate::render::Renderer;

/// Listing the CLI drives the binder against. Records what the page would
/// show.
#[derive(Debug, Default)]
pub struct ListingView {
    items: Vec<ListItem>,
    date: String,
    kind: String,
    visible: Vec<bool>,
    empty: bool,
}

impl ListingView {
    pub fn new(items: Vec<ListItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }
}

impl FilterView for ListingView {
    fn set_selector(&mut self, axis: Axis, value: &str) {
        match axis {
            Axis::Date => self.date = value.to_string(),
            Axis::Type => self.kind = value.to_string(),
        }
    }

    fn items(&self) -> Vec<ListItem> {
        self.items.clone()
    }

    fn apply(&mut self, projection: &Projection) {
        self.visible = projection.flags().to_vec();
    }

    fn set_empty(&mut self, empty: bool) {
        self.empty = empty;
    }
}

#[derive(Debug, Serialize)]
struct DecodeReport {
    state: SelectorState,
    date_label: String,
    mode: &'static str,
    fragment: String,
    rewritten: bool,
}

#[derive(Debug, Serialize)]
struct ProjectReport<'a> {
    fragment: String,
    state: SelectorState,
    mode: &'static str,
    visible: Vec<&'a ListItem>,
    total: usize,
    empty: bool,
}

#[derive(Debug, Serialize)]
struct FragmentReport {
    fragment: String,
}

pub fn dispatch<W: Write>(
    cfg: &Config,
    renderer: &Renderer,
    command: Command,
    out: &mut W,
) -> anyhow::Result<()> {
    debug!(?command, "dispatching command");

    match command {
        Command::Decode { fragment } => cmd_decode(renderer, &fragment, out),
        Command::Encode { date, kind } => {
            let state = SelectorState::new(&date, kind);
            print_fragment(renderer, with_marker(&state), out)
        }
        Command::Project { fragment, items } => cmd_project(renderer, &fragment, &items, out),
        Command::Select(args) => cmd_select(renderer, args, out),
        Command::Reset => {
            let mut binder = FilterBinder::new(MemoryLocation::default(), ListingView::default());
            binder.reset();
            print_fragment(renderer, binder.location().fragment(), out)
        }
        Command::Search { keywords } => {
            let target = search_location(&cfg.page.search_path, &keywords.join(" "));
            if renderer.is_json() {
                renderer.json(out, &serde_json::json!({ "location": target }))
            } else {
                writeln!(out, "{target}")?;
                Ok(())
            }
        }
        Command::Request { action, event_id } => cmd_request(cfg, renderer, action, &event_id, out),
        Command::Config => cmd_config(cfg, renderer, out),
    }
}

#[instrument(skip(renderer, out))]
fn cmd_decode<W: Write>(renderer: &Renderer, raw: &str, out: &mut W) -> anyhow::Result<()> {
    let mut location = MemoryLocation::new(raw);
    let state = fragment::decode(&mut location);
    let report = DecodeReport {
        date_label: state.date_label(),
        mode: FilterMode::of(&state).as_str(),
        fragment: location.fragment(),
        rewritten: !location.writes().is_empty(),
        state,
    };

    if renderer.is_json() {
        return renderer.json(out, &report);
    }

    renderer.field(out, "date", &report.state.date)?;
    renderer.field(out, "label", &report.date_label)?;
    renderer.field(out, "type", &report.state.kind)?;
    renderer.field(out, "mode", report.mode)?;
    if report.rewritten {
        renderer.field(out, "rewritten", &report.fragment)?;
    }
    Ok(())
}

#[instrument(skip(renderer, out))]
fn cmd_project<W: Write>(
    renderer: &Renderer,
    raw: &str,
    items_path: &Path,
    out: &mut W,
) -> anyhow::Result<()> {
    let items = load_items(items_path)?;
    let mut binder = FilterBinder::new(MemoryLocation::new(raw), ListingView::new(items));
    let projection = binder.on_fragment_change();

    let view = binder.view();
    let state = SelectorState {
        date: view.date.clone(),
        kind: view.kind.clone(),
    };
    let report = ProjectReport {
        fragment: binder.location().fragment(),
        mode: FilterMode::of(&state).as_str(),
        state,
        visible: projection.select(&view.items).collect(),
        total: view.items.len(),
        empty: view.empty,
    };
    info!(
        visible = report.visible.len(),
        total = report.total,
        "projected listing"
    );

    if renderer.is_json() {
        return renderer.json(out, &report);
    }

    renderer.field(out, "fragment", &report.fragment)?;
    renderer.field(out, "mode", report.mode)?;
    renderer.field(
        out,
        "visible",
        &format!("{}/{}", report.visible.len(), report.total),
    )?;
    writeln!(out)?;
    renderer.print_listing(out, &view.items, &view.visible)?;
    if report.empty {
        writeln!(out)?;
        renderer.notice(out, "no events match the current filters")?;
    }
    Ok(())
}

#[instrument(skip(renderer, out))]
fn cmd_select<W: Write>(renderer: &Renderer, args: SelectArgs, out: &mut W) -> anyhow::Result<()> {
    let (axis, value) = match (args.date, args.kind) {
        (Some(date), None) => (Axis::Date, date),
        (None, Some(kind)) => (Axis::Type, kind),
        _ => return Err(anyhow!("select exactly one of --date or --type")),
    };

    let mut binder = FilterBinder::new(
        MemoryLocation::new(args.fragment),
        ListingView::default(),
    );
    binder.on_select(axis, &value);
    print_fragment(renderer, binder.location().fragment(), out)
}

#[instrument(skip(cfg, renderer, out))]
fn cmd_request<W: Write>(
    cfg: &Config,
    renderer: &Renderer,
    action: ActionKind,
    event_id: &str,
    out: &mut W,
) -> anyhow::Result<()> {
    let request = cfg
        .page
        .registry()
        .request(action, event_id)
        .ok_or_else(|| anyhow!("no {} request for event id {event_id:?}", action.as_str()))?;

    if renderer.is_json() {
        return renderer.json(out, &request);
    }

    renderer.field(out, "method", "POST")?;
    renderer.field(out, "path", &request.path)?;
    renderer.field(out, "body", &request.form_body())?;
    renderer.field(out, "target", &format!("#{}", request.target))?;
    Ok(())
}

fn cmd_config<W: Write>(cfg: &Config, renderer: &Renderer, out: &mut W) -> anyhow::Result<()> {
    if renderer.is_json() {
        return renderer.json(out, &cfg.page);
    }

    for path in &cfg.loaded_files {
        writeln!(out, "# loaded from {}", path.display())?;
    }
    let text = toml::to_string_pretty(&cfg.page).context("failed to render config")?;
    write!(out, "{text}")?;
    Ok(())
}

fn print_fragment<W: Write>(
    renderer: &Renderer,
    fragment: String,
    out: &mut W,
) -> anyhow::Result<()> {
    if renderer.is_json() {
        return renderer.json(out, &FragmentReport { fragment });
    }
    writeln!(out, "{fragment}")?;
    Ok(())
}

#[instrument]
pub fn load_items(path: &Path) -> anyhow::Result<Vec<ListItem>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read items from {}", path.display()))?;
    let items: Vec<ListItem> = serde_json::from_str(&text)
        .with_context(|| format!("invalid items json in {}", path.display()))?;
    debug!(count = items.len(), "loaded items");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(command: Command) -> String {
        let cfg = Config::defaults().unwrap();
        let renderer = Renderer::new(false, false);
        let mut out = Vec::new();
        dispatch(&cfg, &renderer, command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn decode_reports_rewrite() {
        let text = run(Command::Decode {
            fragment: String::new(),
        });
        assert!(text.contains("mode      unfiltered"));
        assert!(text.contains("rewritten #!date=all&type=all"));
    }

    #[test]
    fn encode_normalizes_date() {
        let text = run(Command::Encode {
            date: "july 10".to_string(),
            kind: "music".to_string(),
        });
        assert_eq!(text, "#!date=july_10&type=music\n");
    }

    #[test]
    fn select_preserves_other_axis() {
        let text = run(Command::Select(SelectArgs {
            fragment: "#!date=july_10&type=all".to_string(),
            date: None,
            kind: Some("workshop".to_string()),
        }));
        assert_eq!(text, "#!date=july_10&type=workshop\n");
    }

    #[test]
    fn reset_prints_default() {
        assert_eq!(run(Command::Reset), "#!date=all&type=all\n");
    }

    #[test]
    fn request_with_blank_id_fails() {
        let cfg = Config::defaults().unwrap();
        let renderer = Renderer::new(false, false);
        let mut out = Vec::new();
        let err = dispatch(
            &cfg,
            &renderer,
            Command::Request {
                action: ActionKind::Remove,
                event_id: " ".to_string(),
            },
            &mut out,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no remove request"));
    }
}
