use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use trackline_core::layout::can_build_trees;
use trackline_core::parsers::parse_trace;
use trackline_core::{LayoutConfig, TrackAppender, TrackAppenderName, TracksCoordinator};
use trackline_protocol::VisualGroup;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackSummary {
    name: TrackAppenderName,
    start_level: usize,
    end_level: usize,
    height: usize,
    events: usize,
    tree_view_events: usize,
    can_build_trees: bool,
    visible: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutSummary<'a> {
    tracks: Vec<TrackSummary>,
    groups: &'a [VisualGroup],
    entries: usize,
    next_level: usize,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: trackline <trace.json> [config.json]");
        std::process::exit(1);
    }

    let config = match args.get(2) {
        Some(path) => {
            let data = std::fs::read(path).with_context(|| format!("reading {path}"))?;
            LayoutConfig::from_json(&data).with_context(|| format!("loading config {path}"))?
        }
        None => LayoutConfig::default(),
    };

    let path = PathBuf::from(&args[1]);
    let data = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let trace = parse_trace(&data)?;
    log::info!(
        "parsed {} track events from {}",
        trace.event_count(),
        path.display()
    );

    let mut coordinator = TracksCoordinator::new(&trace, &config);
    let next_level = coordinator.append_all(config.starting_level, config.expanded_by_default)?;

    // Tracks without events claim no levels and are left out.
    let mut tracks = Vec::new();
    for (name, band) in coordinator.registry().bands() {
        let events = coordinator.events_in_track(name)?;
        let tree_view = coordinator.events_for_tree_view(name)?;
        tracks.push(TrackSummary {
            name,
            start_level: band.start_level,
            end_level: band.end_level,
            height: band.height(),
            events: events.len(),
            tree_view_events: tree_view.len(),
            can_build_trees: can_build_trees(events),
            visible: coordinator.is_track_visible(name),
        });
    }
    let visible: Vec<String> = coordinator
        .all_visible_track_appenders()
        .map(|t| t.name().to_string())
        .collect();
    log::debug!("visible tracks: {}", visible.join(", "));

    let summary = LayoutSummary {
        tracks,
        groups: coordinator.buffer().groups(),
        entries: coordinator.buffer().len(),
        next_level,
    };
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &summary)?;
    writeln!(out)?;
    Ok(())
}
