//! Deferred widget mutations
//!
//! Click handlers run off the main loop and must not touch widgets. They post
//! a [`UiCommand`] instead; the owner of the [`WidgetGroup`](crate::WidgetGroup)
//! applies it on the next tick.

use crate::widget::WidgetId;

/// Which way `Arrange` lays out a subgroup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrangeDirection {
    LeftToRight,
    RightToLeft,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UiCommand {
    SetVisible {
        widget: WidgetId,
        visible: bool,
    },
    SetEnabled {
        widget: WidgetId,
        enabled: bool,
    },
    SetText {
        widget: WidgetId,
        text: String,
    },
    SetSubgroupVisible {
        subgroup: u32,
        visible: bool,
    },
    SetSubgroupEnabled {
        subgroup: u32,
        enabled: bool,
    },
    /// Re-run layout for a subgroup starting at `(x, y)`
    Arrange {
        subgroup: u32,
        x: i32,
        y: i32,
        gap: i32,
        direction: ArrangeDirection,
    },
    SetFrame {
        widget: WidgetId,
        frame: u32,
    },
    NextFrame {
        widget: WidgetId,
    },
}

impl UiCommand {
    pub fn show(widget: impl Into<WidgetId>) -> Self {
        UiCommand::SetVisible {
            widget: widget.into(),
            visible: true,
        }
    }

    pub fn hide(widget: impl Into<WidgetId>) -> Self {
        UiCommand::SetVisible {
            widget: widget.into(),
            visible: false,
        }
    }

    pub fn set_text(widget: impl Into<WidgetId>, text: impl Into<String>) -> Self {
        UiCommand::SetText {
            widget: widget.into(),
            text: text.into(),
        }
    }
}
