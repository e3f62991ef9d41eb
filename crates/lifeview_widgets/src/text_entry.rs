//! Single-line text entry
//!
//! The editing logic lives in [`EntryState`], which knows nothing about
//! drawing: it holds the text, the cursor, the visible window of glyphs and
//! the undo history. [`Entry`] wraps it as a widget, renders one cached
//! texture per glyph and feeds the glyph widths back into the state.
//!
//! # Key handling
//!
//! | key | effect |
//! |---|---|
//! | printable char | insert at cursor, cursor + 1 |
//! | Backspace / Delete | remove before / at cursor |
//! | Enter | commit |
//! | Left / Right | cursor ∓ 1 |
//! | Home / Down | cursor to start |
//! | End / Up | cursor to end |
//! | Ctrl held + Z | undo |
//!
//! Only key-down events edit; key-up is ignored except to track Ctrl.

use std::any::Any;
use std::fmt;

use lifeview_core::{Color, Rect, Surface};
use lifeview_platform::{Key, KeyState, KeyboardEvent};
use lifeview_texture::{lock_shared, SharedTextureCache, TextureKey};

use crate::cursor::CursorBlink;
use crate::dispatch::ClickDispatcher;
use crate::error::{Result, ValidationError};
use crate::widget::{require_cache, require_font, FrameContext, Widget, WidgetBase, WidgetKind};

/// Gap between the entry's edge and its text, on both sides
pub const TEXT_INSET: i32 = 10;

const CURSOR_WIDTH: i32 = 2;

/// The kind of edit offered to a change callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    Insert(char),
    Backspace,
    Delete,
}

/// Change callback: `(old, proposed, kind)` → text to keep, or a rejection
pub type ChangeHandler =
    Box<dyn FnMut(&str, &str, EditKind) -> std::result::Result<String, ValidationError> + Send>;

/// Called with the current text when Enter is pressed
pub type CommitHandler = Box<dyn FnMut(&str) + Send>;

/// Result of feeding one key event to an [`EntryState`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not a key the entry reacts to; nothing changed
    Ignored,
    /// Key consumed (text and/or cursor may have changed)
    Handled,
    /// Enter pressed; carries the current text
    Commit(String),
    /// The change callback refused the edit
    Rejected(ValidationError),
}

/// Editing state of a text entry
#[derive(Clone, Debug, Default)]
pub struct EntryState {
    text: Vec<char>,
    cursor: usize,
    leadin: usize,
    leadout: usize,
    history: Vec<String>,
    modifier_held: bool,
    dirty: bool,
}

impl EntryState {
    pub fn new(text: &str) -> Self {
        let text: Vec<char> = text.chars().collect();
        Self {
            leadout: text.len(),
            text,
            dirty: true,
            ..Default::default()
        }
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    pub fn chars(&self) -> &[char] {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The visible glyph range `[leadin, leadout)`
    pub fn window(&self) -> (usize, usize) {
        (self.leadin, self.leadout)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn modifier_held(&self) -> bool {
        self.modifier_held
    }

    /// Forget a held modifier, used when focus is lost mid-chord
    pub fn release_modifier(&mut self) {
        self.modifier_held = false;
    }

    /// Replace the text without touching history
    pub fn set_text(&mut self, text: &str) {
        let text: Vec<char> = text.chars().collect();
        if text != self.text {
            self.text = text;
            self.clamp();
            self.dirty = true;
        }
    }

    /// Move the cursor, clamped into `[0, len]`
    pub fn set_cursor(&mut self, cursor: usize) {
        let cursor = cursor.min(self.text.len());
        if cursor != self.cursor {
            self.cursor = cursor;
            self.dirty = true;
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let target = self.cursor.saturating_add_signed(delta);
        self.set_cursor(target);
    }

    fn clamp(&mut self) {
        let len = self.text.len();
        self.cursor = self.cursor.min(len);
        self.leadin = self.leadin.min(self.cursor);
        self.leadout = self.leadout.clamp(self.cursor, len);
    }

    fn push_history(&mut self, text: String) {
        if self.history.last() != Some(&text) {
            self.history.push(text);
        }
    }

    /// Restore the most recent history entry. Returns false if there is none.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.text = previous.chars().collect();
                self.clamp();
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Apply one key event
    pub fn apply_key(
        &mut self,
        event: &KeyboardEvent,
        change: Option<&mut ChangeHandler>,
    ) -> KeyOutcome {
        if event.key == Key::Ctrl {
            self.modifier_held = event.state == KeyState::Pressed;
            return KeyOutcome::Handled;
        }
        if event.state != KeyState::Pressed {
            return KeyOutcome::Ignored;
        }

        if self.modifier_held || event.modifiers.ctrl {
            return match event.key {
                Key::Char('z') | Key::Char('Z') => {
                    self.undo();
                    KeyOutcome::Handled
                }
                _ => KeyOutcome::Ignored,
            };
        }

        match event.key {
            Key::Enter => KeyOutcome::Commit(self.text()),
            Key::Backspace => {
                if self.cursor == 0 {
                    return KeyOutcome::Handled;
                }
                let mut proposed = self.text.clone();
                proposed.remove(self.cursor - 1);
                self.edit(proposed, self.cursor - 1, EditKind::Backspace, change)
            }
            Key::Delete => {
                if self.cursor >= self.text.len() {
                    return KeyOutcome::Handled;
                }
                let mut proposed = self.text.clone();
                proposed.remove(self.cursor);
                self.edit(proposed, self.cursor, EditKind::Delete, change)
            }
            Key::Left => {
                self.move_cursor(-1);
                KeyOutcome::Handled
            }
            Key::Right => {
                self.move_cursor(1);
                KeyOutcome::Handled
            }
            Key::Home | Key::Down => {
                self.set_cursor(0);
                KeyOutcome::Handled
            }
            Key::End | Key::Up => {
                self.set_cursor(self.text.len());
                KeyOutcome::Handled
            }
            key => match key.as_char() {
                Some(c) => {
                    let mut proposed = self.text.clone();
                    proposed.insert(self.cursor, c);
                    self.edit(proposed, self.cursor + 1, EditKind::Insert(c), change)
                }
                None => KeyOutcome::Ignored,
            },
        }
    }

    fn edit(
        &mut self,
        proposed: Vec<char>,
        cursor: usize,
        kind: EditKind,
        change: Option<&mut ChangeHandler>,
    ) -> KeyOutcome {
        let old = self.text();
        let proposed: String = proposed.into_iter().collect();
        let kept = match change {
            Some(handler) => match handler(&old, &proposed, kind) {
                Ok(kept) => kept,
                Err(err) => {
                    tracing::debug!("entry edit rejected: {}", err);
                    return KeyOutcome::Rejected(err);
                }
            },
            None => proposed,
        };

        if kept == old {
            return KeyOutcome::Handled;
        }
        self.push_history(old);
        self.text = kept.chars().collect();
        self.cursor = cursor.min(self.text.len());
        self.clamp();
        self.dirty = true;
        KeyOutcome::Handled
    }

    /// Recompute the visible window for the given glyph widths
    ///
    /// `widths[i]` is the advance of glyph `i`; `interior` is the pixel width
    /// available for text. Afterwards `leadin <= cursor <= leadout <= len`.
    pub fn recompute_window(&mut self, widths: &[i32], interior: i32) {
        let len = self.text.len().min(widths.len());
        self.cursor = self.cursor.min(len);
        self.leadin = self.leadin.min(len);

        self.leadout = fill_forward(widths, self.leadin, len, interior);
        let count = self.leadout - self.leadin;

        if self.cursor > self.leadout {
            self.leadout = self.cursor;
            self.leadin = self.leadout.saturating_sub(count);
        }
        if self.cursor < self.leadin {
            self.leadin = self.cursor;
            self.leadout = fill_forward(widths, self.leadin, len, interior);
        }
        self.leadout = self.leadout.min(len);
    }

    /// Cursor position for a click `x` pixels right of the text origin
    ///
    /// The first visible glyph whose right edge lies beyond `x` takes the
    /// cursor; a click past the last visible glyph puts it at `leadout`.
    pub fn cursor_from_offset(&self, x: i32, widths: &[i32]) -> usize {
        let end = self.leadout.min(widths.len());
        let mut offset = 0;
        for (i, w) in widths.iter().enumerate().take(end).skip(self.leadin) {
            if offset + w > x {
                return i;
            }
            offset += w;
        }
        self.leadout
    }
}

/// First index from `start` at which the accumulated width would exceed
/// `interior`, or `len` if everything fits
fn fill_forward(widths: &[i32], start: usize, len: usize, interior: i32) -> usize {
    let mut sum = 0;
    for (i, w) in widths.iter().enumerate().take(len).skip(start) {
        if sum + w > interior {
            return i;
        }
        sum += w;
    }
    len
}

// ============================================================================
// Entry widget
// ============================================================================

/// Text entry widget
pub struct Entry {
    base: WidgetBase,
    state: EntryState,
    focused: bool,
    cache: Option<SharedTextureCache>,
    on_change: Option<ChangeHandler>,
    on_commit: Option<CommitHandler>,
    validation_error: Option<ValidationError>,
    glyph_widths: Vec<i32>,
    blink: CursorBlink,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("base", &self.base)
            .field("state", &self.state)
            .field("focused", &self.focused)
            .field("validation_error", &self.validation_error)
            .finish()
    }
}

impl Entry {
    pub fn new(base: WidgetBase, text: &str) -> Self {
        Self {
            base,
            state: EntryState::new(text),
            focused: false,
            cache: None,
            on_change: None,
            on_commit: None,
            validation_error: None,
            glyph_widths: Vec::new(),
            blink: CursorBlink::default(),
        }
    }

    /// Vet every edit before it is applied
    pub fn with_on_change<F>(mut self, f: F) -> Self
    where
        F: FnMut(&str, &str, EditKind) -> std::result::Result<String, ValidationError>
            + Send
            + 'static,
    {
        self.on_change = Some(Box::new(f));
        self
    }

    pub fn with_on_commit<F>(mut self, f: F) -> Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.on_commit = Some(Box::new(f));
        self
    }

    pub fn with_blink(mut self, blink: CursorBlink) -> Self {
        self.blink = blink;
        self
    }

    pub fn state(&self) -> &EntryState {
        &self.state
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor()
    }

    /// The last rejection message, cleared on read
    pub fn take_validation_error(&mut self) -> Option<ValidationError> {
        self.validation_error.take()
    }

    // Debounce only gates clicks; typing is never suppressed
    fn accepts_input(&self) -> bool {
        self.focused && self.base.is_enabled_flag() && self.base.is_visible()
    }
}

impl Widget for Entry {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Entry
    }

    fn draw(&mut self, surface: &mut dyn Surface, frame: &FrameContext) -> Result<()> {
        let id = self.base.id();
        let rect = self.base.bounds();
        let enabled = self.base.is_enabled();
        let mut color = self.base.foreground().unwrap_or(Color::WHITE);
        if !enabled {
            color = color.dim(2.0);
        }

        let font = require_font(frame, id)?;
        let mut cache = lock_shared(require_cache(&self.cache, id)?);

        // Rasterise any glyph not yet cached and capture advances
        let mut widths = Vec::with_capacity(self.state.len());
        let mut glyph_height = 0;
        for &ch in self.state.chars() {
            let entry = cache.get_or_create(&TextureKey::glyph(ch, color), || {
                surface.render_text(ch.encode_utf8(&mut [0u8; 4]), font, color)
            })?;
            widths.push(entry.width());
            glyph_height = glyph_height.max(entry.height());
        }
        self.state.recompute_window(&widths, rect.w - TEXT_INSET * 2);

        if let Some(bg) = self.base.background() {
            surface.fill_rect(rect, bg);
        }

        let paint_cursor = self.accepts_input() && self.blink.is_visible(frame.time);
        let (leadin, leadout) = self.state.window();
        let ty = rect.y + (rect.h - glyph_height) / 2;
        let mut tx = rect.x + TEXT_INSET;
        let cursor_bar = |x: i32| Rect::new(x, rect.y, CURSOR_WIDTH, rect.h);

        for (pos, &ch) in self.state.chars()[leadin..leadout].iter().enumerate() {
            let pos = pos + leadin;
            let w = widths[pos];
            if let Some(entry) = cache.get(&TextureKey::glyph(ch, color)) {
                surface.copy_texture(
                    entry.texture(),
                    None,
                    Rect::new(tx, ty, w, entry.height()),
                )?;
            }
            if paint_cursor && pos == self.state.cursor() {
                surface.fill_rect(cursor_bar(tx), Color::WHITE);
            }
            tx += w;
        }
        if paint_cursor && self.state.cursor() == leadout {
            surface.fill_rect(cursor_bar(tx), Color::WHITE);
        }

        if let Some(fg) = self.base.foreground() {
            let border = if enabled { fg } else { fg.dim(2.0) };
            surface.outline_rect(
                Rect::new(rect.x + 1, rect.y + 1, rect.w - 1, rect.h - 1),
                border,
            );
        }

        self.glyph_widths = widths;
        self.state.mark_clean();
        Ok(())
    }

    fn click(&mut self, x: i32, y: i32, dispatcher: &ClickDispatcher) -> bool {
        if !self.base.is_enabled() {
            return false;
        }
        if self.glyph_widths.len() == self.state.len() {
            let origin = self.base.bounds().x + TEXT_INSET;
            let cursor = self.state.cursor_from_offset(x - origin, &self.glyph_widths);
            self.state.set_cursor(cursor);
        } else {
            // Text changed since the last draw; widths are stale
            self.state.set_cursor(self.state.window().1);
        }
        dispatcher.click(&self.base, x, y);
        true
    }

    fn can_focus(&self) -> bool {
        self.base.is_enabled_flag() && self.base.is_visible()
    }

    fn set_focus(&mut self, focus: bool) {
        let focus = focus && self.can_focus();
        if !focus {
            self.state.release_modifier();
        }
        self.focused = focus;
    }

    fn has_focus(&self) -> bool {
        self.focused && self.base.is_enabled_flag()
    }

    fn key_press(&mut self, event: &KeyboardEvent) -> bool {
        if !self.accepts_input() {
            return false;
        }
        match self.state.apply_key(event, self.on_change.as_mut()) {
            KeyOutcome::Ignored => false,
            KeyOutcome::Handled => true,
            KeyOutcome::Commit(text) => {
                if let Some(commit) = self.on_commit.as_mut() {
                    commit(&text);
                }
                true
            }
            KeyOutcome::Rejected(err) => {
                self.validation_error = Some(err);
                true
            }
        }
    }

    fn set_texture_cache(&mut self, cache: SharedTextureCache) {
        self.cache = Some(cache);
    }

    fn text(&self) -> Option<String> {
        Some(self.state.text())
    }

    fn set_text(&mut self, text: &str) -> bool {
        self.state.set_text(text);
        true
    }

    fn destroy(&mut self) {
        self.set_focus(false);
        self.on_change = None;
        self.on_commit = None;
        self.base.set_on_click(None);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifeview_core::{DrawCommand, FontId, RecordingSurface, Size};
    use lifeview_platform::Modifiers;
    use lifeview_texture::shared;

    fn press(key: Key) -> KeyboardEvent {
        KeyboardEvent::pressed(key)
    }

    fn type_str(state: &mut EntryState, s: &str) {
        for c in s.chars() {
            state.apply_key(&press(Key::Char(c)), None);
        }
    }

    fn check_invariants(state: &EntryState) {
        let (leadin, leadout) = state.window();
        assert!(state.cursor() <= state.len());
        assert!(leadin <= state.cursor(), "leadin {} cursor {}", leadin, state.cursor());
        assert!(state.cursor() <= leadout);
        assert!(leadout <= state.len());
    }

    #[test]
    fn test_typing_and_editing() {
        let mut state = EntryState::new("");
        type_str(&mut state, "abc");
        assert_eq!(state.text(), "abc");
        assert_eq!(state.cursor(), 3);

        state.apply_key(&press(Key::Left), None);
        state.apply_key(&press(Key::Backspace), None);
        assert_eq!(state.text(), "ac");
        assert_eq!(state.cursor(), 1);

        state.apply_key(&press(Key::Delete), None);
        assert_eq!(state.text(), "a");
        assert_eq!(state.cursor(), 1);

        // Delete at the end and backspace at the start are no-ops
        state.apply_key(&press(Key::Delete), None);
        state.apply_key(&press(Key::Home), None);
        state.apply_key(&press(Key::Backspace), None);
        assert_eq!(state.text(), "a");
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_cursor_keys() {
        let mut state = EntryState::new("hello");
        state.apply_key(&press(Key::Up), None);
        assert_eq!(state.cursor(), 5);
        state.apply_key(&press(Key::Right), None);
        assert_eq!(state.cursor(), 5);
        state.apply_key(&press(Key::Down), None);
        assert_eq!(state.cursor(), 0);
        state.apply_key(&press(Key::Left), None);
        assert_eq!(state.cursor(), 0);
        state.apply_key(&press(Key::End), None);
        assert_eq!(state.cursor(), 5);
    }

    #[test]
    fn test_cursor_bounds_under_edit_sequences() {
        let keys = [
            Key::Char('x'),
            Key::Left,
            Key::Backspace,
            Key::Delete,
            Key::Right,
            Key::Up,
            Key::Char('y'),
            Key::Down,
            Key::Delete,
            Key::End,
            Key::Backspace,
            Key::Char('z'),
        ];
        let mut state = EntryState::new("seed");
        // Walk a deterministic pseudo-random sequence over the key set
        let mut n: usize = 7;
        for _ in 0..500 {
            n = (n * 31 + 11) % 997;
            state.apply_key(&press(keys[n % keys.len()]), None);
            let widths = vec![10; state.len()];
            state.recompute_window(&widths, 30);
            check_invariants(&state);
        }
    }

    #[test]
    fn test_undo_round_trip() {
        let mut state = EntryState::new("ab");
        state.apply_key(&press(Key::End), None);
        type_str(&mut state, "c");
        state.apply_key(&press(Key::Backspace), None);
        state.apply_key(&press(Key::Backspace), None);
        assert_eq!(state.text(), "a");

        let ctrl_down = KeyboardEvent::pressed(Key::Ctrl);
        let z = press(Key::Char('z'));
        state.apply_key(&ctrl_down, None);
        state.apply_key(&z, None);
        assert_eq!(state.text(), "ab");
        state.apply_key(&z, None);
        assert_eq!(state.text(), "abc");
        state.apply_key(&z, None);
        assert_eq!(state.text(), "ab");
        // History exhausted; undo is a no-op
        assert_eq!(state.apply_key(&z, None), KeyOutcome::Handled);
        assert_eq!(state.text(), "ab");
        assert!(state.cursor() <= state.len());

        state.apply_key(&KeyboardEvent::released(Key::Ctrl), None);
        state.apply_key(&press(Key::End), None);
        type_str(&mut state, "z");
        assert_eq!(state.text(), "abz");
    }

    #[test]
    fn test_ctrl_modifier_flag_also_undoes() {
        let mut state = EntryState::new("");
        type_str(&mut state, "q");
        let chord = press(Key::Char('z')).with_modifiers(Modifiers::CTRL);
        state.apply_key(&chord, None);
        assert_eq!(state.text(), "");
    }

    #[test]
    fn test_key_release_and_unknown_keys_are_ignored() {
        let mut state = EntryState::new("a");
        assert_eq!(
            state.apply_key(&KeyboardEvent::released(Key::Char('b')), None),
            KeyOutcome::Ignored
        );
        assert_eq!(state.apply_key(&press(Key::Tab), None), KeyOutcome::Ignored);
        assert_eq!(state.apply_key(&press(Key::Escape), None), KeyOutcome::Ignored);
        assert_eq!(state.text(), "a");
        assert_eq!(state.history_len(), 0);
    }

    #[test]
    fn test_enter_commits_without_change() {
        let mut state = EntryState::new("42");
        assert_eq!(
            state.apply_key(&press(Key::Enter), None),
            KeyOutcome::Commit("42".to_string())
        );
        assert_eq!(state.text(), "42");
    }

    #[test]
    fn test_change_callback_can_keep_replace_or_reject() {
        let mut state = EntryState::new("1");
        state.apply_key(&press(Key::End), None);

        let mut digits_only: ChangeHandler = Box::new(|old: &str, proposed: &str, kind: EditKind| match kind {
            EditKind::Insert(c) if !c.is_ascii_digit() => {
                Err(ValidationError::new(format!("'{}' is not a digit", c)))
            }
            EditKind::Insert('0') => Ok(old.to_string()),
            _ => Ok(proposed.to_string()),
        });

        state.mark_clean();
        let outcome = state.apply_key(&press(Key::Char('x')), Some(&mut digits_only));
        assert!(matches!(outcome, KeyOutcome::Rejected(_)));
        assert_eq!(state.text(), "1");
        assert!(!state.is_dirty());

        // Unchanged result: no history push, nothing to redraw
        state.apply_key(&press(Key::Char('0')), Some(&mut digits_only));
        assert_eq!(state.history_len(), 0);
        assert!(!state.is_dirty());

        state.apply_key(&press(Key::Char('7')), Some(&mut digits_only));
        assert_eq!(state.text(), "17");
        assert_eq!(state.history_len(), 1);
        assert!(state.is_dirty());
    }

    #[test]
    fn test_history_skips_duplicate_top() {
        let mut state = EntryState::new("");
        type_str(&mut state, "a");
        state.apply_key(&press(Key::Backspace), None);
        // "" pushed, then "a"; typing "a" again pushes "" (top is "a")
        type_str(&mut state, "a");
        assert_eq!(state.history_len(), 3);
        state.push_history(String::new());
        assert_eq!(state.history_len(), 3);
    }

    #[test]
    fn test_hello_window_scrolls_to_cursor() {
        let mut state = EntryState::new("HELLO");
        state.set_cursor(5);
        state.recompute_window(&[10; 5], 30);
        assert_eq!(state.window(), (2, 5));
        let visible: String = state.chars()[2..5].iter().collect();
        assert_eq!(visible, "LLO");

        // Jumping home scrolls back
        state.set_cursor(0);
        state.recompute_window(&[10; 5], 30);
        assert_eq!(state.window(), (0, 3));
    }

    #[test]
    fn test_window_with_wide_glyph() {
        let mut state = EntryState::new("aWb");
        state.set_cursor(1);
        state.recompute_window(&[10, 50, 10], 30);
        assert_eq!(state.window(), (0, 1));
        check_invariants(&state);
    }

    #[test]
    fn test_click_to_cursor() {
        let mut state = EntryState::new("HELLO");
        state.recompute_window(&[10; 5], 30);
        assert_eq!(state.window(), (0, 3));

        let widths = [10; 5];
        assert_eq!(state.cursor_from_offset(0, &widths), 0);
        assert_eq!(state.cursor_from_offset(9, &widths), 0);
        assert_eq!(state.cursor_from_offset(10, &widths), 1);
        assert_eq!(state.cursor_from_offset(25, &widths), 2);
        // Past the visible glyphs
        assert_eq!(state.cursor_from_offset(200, &widths), 3);
    }

    // ------------------------------------------------------------------------
    // Widget
    // ------------------------------------------------------------------------

    fn entry(text: &str) -> Entry {
        let mut e = Entry::new(
            WidgetBase::new(20, Rect::new(0, 0, 50, 30)).with_foreground(Color::WHITE),
            text,
        )
        .with_blink(CursorBlink::solid());
        e.set_texture_cache(shared());
        e
    }

    fn frame() -> FrameContext {
        FrameContext {
            font: Some(FontId::DEFAULT),
            ..Default::default()
        }
    }

    #[test]
    fn test_focus_requires_enabled_and_visible() {
        let mut e = entry("a");
        e.set_enabled(false);
        e.set_focus(true);
        assert!(!e.has_focus());

        e.set_enabled(true);
        e.set_focus(true);
        assert!(e.has_focus());
        e.set_visible(false);
        assert!(!e.has_focus());
    }

    #[test]
    fn test_debounced_click_does_not_block_typing() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let dispatcher = ClickDispatcher::new(crate::dispatch::DispatchMode::Queued, rt.handle().clone());
        let mut e = Entry::new(
            WidgetBase::new(20, Rect::new(0, 0, 50, 30))
                .with_debounce(std::time::Duration::from_millis(500))
                .with_on_click(crate::dispatch::on_click(|_| true)),
            "",
        );
        e.set_focus(true);

        // The runtime is never driven, so the debounce window stays open
        assert!(e.click(5, 5, &dispatcher));
        assert!(e.base().is_suppressed());
        assert!(e.has_focus());
        assert!(e.key_press(&press(Key::Char('7'))));
        assert_eq!(e.text().as_deref(), Some("7"));
    }

    #[test]
    fn test_unfocused_entry_ignores_keys() {
        let mut e = entry("a");
        assert!(!e.key_press(&press(Key::Char('b'))));
        e.set_focus(true);
        assert!(e.key_press(&press(Key::Char('b'))));
        assert_eq!(e.text().as_deref(), Some("ba"));
    }

    #[test]
    fn test_rejected_edit_is_stored() {
        let mut e = entry("").with_on_change(|_, _, _| Err(ValidationError::new("nope")));
        e.set_focus(true);
        assert!(e.key_press(&press(Key::Char('x'))));
        assert_eq!(e.text().as_deref(), Some(""));
        assert_eq!(e.take_validation_error().unwrap().message(), "nope");
        assert!(e.take_validation_error().is_none());
    }

    #[test]
    fn test_commit_handler_receives_text() {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut e = entry("12").with_on_commit(move |text| {
            let _ = tx.send(text.to_string());
        });
        e.set_focus(true);
        assert!(e.key_press(&press(Key::Enter)));
        assert_eq!(rx.try_recv().unwrap(), "12");
    }

    #[test]
    fn test_draw_visible_glyphs_and_cursor() {
        let mut surface = RecordingSurface::new(Size::new(200, 100));
        let mut e = entry("HELLO");
        e.set_focus(true);
        e.key_press(&press(Key::End));
        e.draw(&mut surface, &frame()).unwrap();

        // Interior is 50 - 20 = 30 px: three 10 px glyphs
        assert_eq!(e.state().window(), (2, 5));
        let copies = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::CopyTexture { .. }))
            .count();
        assert_eq!(copies, 3);
        // Cursor bar after the last visible glyph
        assert!(surface.commands().contains(&DrawCommand::FillRect {
            rect: Rect::new(40, 0, 2, 30),
            color: Color::WHITE
        }));
        // "L" is cached once and reused
        assert_eq!(surface.created_textures(), 4);
        assert!(!e.state().is_dirty());
    }

    #[test]
    fn test_click_uses_widths_from_last_draw() {
        let mut surface = RecordingSurface::new(Size::new(200, 100));
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let dispatcher = ClickDispatcher::new(crate::dispatch::DispatchMode::Queued, rt.handle().clone());

        let mut e = entry("HELLO");
        e.set_focus(true);
        e.draw(&mut surface, &frame()).unwrap();

        // Text starts at x = 10; second glyph spans 20..30
        assert!(e.click(25, 5, &dispatcher));
        assert_eq!(e.cursor(), 1);
        assert!(e.click(500, 5, &dispatcher));
        assert_eq!(e.cursor(), 3);
    }
}
