//! The viewer's control panel
//!
//! Three subgroups: the button bar along the top, the pan arrows (shown only
//! while paused) and an info row with the generation entry and status label.
//! Every handler talks to [`ViewerState`], never to a widget.

use std::sync::Arc;
use std::time::Duration;

use lifeview_core::{FontId, Rect};
use lifeview_widgets::{
    on_click, Align, ArrangeDirection, Arrow, Button, EditKind, Entry, Image, Label, Result,
    Separator, Subgroup, UiCommand, ValidationError, Widget, WidgetBase, WidgetGroup, WidgetId,
};

use crate::config::ViewerConfig;
use crate::state::{ViewerCommand, ViewerState};

// Widget ids
pub const BUTTON_CLOSE: WidgetId = WidgetId(0);
pub const BUTTON_STOP_START: WidgetId = WidgetId(1);
pub const BUTTON_STEP: WidgetId = WidgetId(2);
pub const BUTTON_FASTER: WidgetId = WidgetId(3);
pub const BUTTON_SLOWER: WidgetId = WidgetId(4);
pub const ARROW_UP: WidgetId = WidgetId(5);
pub const ARROW_DOWN: WidgetId = WidgetId(6);
pub const ARROW_LEFT: WidgetId = WidgetId(7);
pub const ARROW_RIGHT: WidgetId = WidgetId(8);
pub const BUTTON_FASTEST: WidgetId = WidgetId(9);
pub const GENERATION_ENTRY: WidgetId = WidgetId(10);
pub const STATUS_LABEL: WidgetId = WidgetId(11);
pub const SEPARATOR: WidgetId = WidgetId(999);

// Subgroup ids
pub const BUTTONS: u32 = 1;
pub const ARROWS: u32 = 2;
pub const INFO: u32 = 3;

const PAN_STEP: i32 = 100;
const ENTRY_WIDTH: i32 = 200;

/// Build the control panel and add it to `widgets`
pub fn install(
    widgets: &mut WidgetGroup,
    config: &ViewerConfig,
    state: &Arc<ViewerState>,
    font: FontId,
) {
    widgets.add(button_bar(config, state, font));
    widgets.add(arrow_pad(config, state));
    widgets.add(info_row(config, state, font));
    tracing::debug!("control panel installed");
}

fn button_bar(config: &ViewerConfig, state: &Arc<ViewerState>, font: FontId) -> Subgroup {
    let cfg = &config.buttons;
    let (bg, fg) = (cfg.background(), cfg.foreground());
    let button_rect = Rect::new(0, cfg.margin_top, cfg.width, cfg.height);
    let image_rect = Rect::new(0, cfg.margin_top, cfg.height, cfg.height);
    let base = |id: WidgetId, rect: Rect| {
        WidgetBase::new(id, rect)
            .with_background(bg)
            .with_foreground(fg)
    };

    let quit = {
        let state = Arc::clone(state);
        Button::new(
            base(BUTTON_CLOSE, button_rect).with_on_click(on_click(move |_| {
                state.request_quit();
                true
            })),
            "Quit",
        )
    };

    let stop_start = {
        let state = Arc::clone(state);
        Button::new(
            base(BUTTON_STOP_START, button_rect)
                .with_debounce(Duration::from_millis(config.stop_start_debounce_ms))
                .with_on_click(on_click(move |_| {
                    state.post(ViewerCommand::ToggleRun);
                    true
                })),
            "Stop",
        )
    };

    let separator = Separator::new(
        WidgetBase::new(SEPARATOR, Rect::new(0, cfg.margin_top, 10, cfg.height))
            .with_background(bg.dim(2.0)),
    );

    let slower = {
        let state = Arc::clone(state);
        Image::new(
            base(BUTTON_SLOWER, image_rect).with_on_click(on_click(move |_| {
                state.slower();
                true
            })),
            "slower",
        )
    };

    let faster = {
        let state = Arc::clone(state);
        Image::new(
            base(BUTTON_FASTER, image_rect).with_on_click(on_click(move |_| {
                state.faster();
                true
            })),
            "faster",
        )
    };

    let fastest = {
        let state = Arc::clone(state);
        Image::new(
            base(BUTTON_FASTEST, image_rect).with_on_click(on_click(move |_| {
                state.fastest();
                true
            })),
            "fastest",
        )
    };

    let mut step = {
        let state = Arc::clone(state);
        Button::new(
            base(BUTTON_STEP, button_rect)
                .with_debounce(Duration::from_millis(config.step_debounce_ms))
                .with_on_click(on_click(move |_| {
                    state.post(ViewerCommand::Step);
                    true
                })),
            "Step",
        )
    };
    step.set_visible(false);

    let mut bar = Subgroup::new(BUTTONS)
        .with_font(font)
        .with(quit)
        .with(stop_start)
        .with(separator)
        .with(slower)
        .with(faster)
        .with(fastest)
        .with(step);
    bar.arrange_left_to_right(10, cfg.margin_top, cfg.gap);
    bar
}

fn arrow_pad(config: &ViewerConfig, state: &Arc<ViewerState>) -> Subgroup {
    let cfg = &config.buttons;
    let anchor = config.arrow_anchor();
    let arrow = |id: WidgetId, w: i32, h: i32, dx: i32, dy: i32| {
        let state = Arc::clone(state);
        Arrow::new(
            WidgetBase::new(id, Rect::new(anchor.x, anchor.y, w, h))
                .with_background(cfg.background())
                .with_foreground(cfg.foreground())
                .with_on_click(on_click(move |_| {
                    state.pan(dx, dy);
                    true
                })),
        )
    };

    let mut pad = Subgroup::new(ARROWS)
        .with(arrow(ARROW_RIGHT, 70, 50, PAN_STEP, 0))
        .with(arrow(ARROW_LEFT, -70, 50, -PAN_STEP, 0))
        .with(arrow(ARROW_DOWN, 50, 70, 0, PAN_STEP))
        .with(arrow(ARROW_UP, 50, -70, 0, -PAN_STEP));
    pad.set_visible_all(false);
    pad
}

fn info_row(config: &ViewerConfig, state: &Arc<ViewerState>, font: FontId) -> Subgroup {
    let cfg = &config.buttons;
    let y = cfg.bar_height() + cfg.margin_top;
    let h = cfg.height / 2;

    let entry = {
        let state = Arc::clone(state);
        Entry::new(
            WidgetBase::new(GENERATION_ENTRY, Rect::new(0, y, ENTRY_WIDTH, h))
                .with_background(cfg.background())
                .with_foreground(cfg.foreground()),
            "",
        )
        .with_on_change(digits_only)
        .with_on_commit(move |text| match text.parse::<u64>() {
            Ok(n) => state.post(ViewerCommand::RunFor(n)),
            Err(_) => state.status("Enter a number of generations"),
        })
    };

    let status = Label::new(
        WidgetBase::new(STATUS_LABEL, Rect::new(0, y, 0, h)).with_foreground(cfg.foreground()),
        "",
        Align::Fit,
    );

    let mut row = Subgroup::new(INFO).with_font(font).with(entry).with(status);
    row.arrange_left_to_right(10, y, cfg.gap);
    row
}

/// Change callback for the generation entry
fn digits_only(
    old: &str,
    proposed: &str,
    kind: EditKind,
) -> std::result::Result<String, ValidationError> {
    match kind {
        EditKind::Insert(c) if !c.is_ascii_digit() => {
            Err(ValidationError::new(format!("'{}' is not a digit", c)))
        }
        // A leading zero is dropped, wherever the cursor was
        EditKind::Insert('0') if proposed.starts_with('0') => Ok(old.to_string()),
        _ => Ok(proposed.to_string()),
    }
}

/// Switch the control panel between its running and paused layouts
///
/// Running shows Slower/Faster; paused shows Step and the arrow pad.
pub fn show_run_state(
    widgets: &mut WidgetGroup,
    config: &ViewerConfig,
    running: bool,
) -> Result<()> {
    let cfg = &config.buttons;
    let label = if running { "Stop" } else { "Start" };
    let commands = [
        UiCommand::set_text(BUTTON_STOP_START, label),
        UiCommand::SetVisible {
            widget: BUTTON_STEP,
            visible: !running,
        },
        UiCommand::SetVisible {
            widget: BUTTON_SLOWER,
            visible: running,
        },
        UiCommand::SetVisible {
            widget: BUTTON_FASTER,
            visible: running,
        },
        UiCommand::SetSubgroupVisible {
            subgroup: ARROWS,
            visible: !running,
        },
        UiCommand::Arrange {
            subgroup: BUTTONS,
            x: 10,
            y: cfg.margin_top,
            gap: cfg.gap,
            direction: ArrangeDirection::LeftToRight,
        },
    ];
    for command in commands {
        widgets.apply(command)?;
    }
    Ok(())
}
