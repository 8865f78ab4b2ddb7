use super::Shell;
use crate::config::SettingValue;
use crate::router::PAGES;
use crate::view::page::{ControlEvent, PageControl, PageView};
use crate::view::virtualizer;
use crossterm::event::{KeyCode, KeyModifiers};

/// Which surface receives keys right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum InputContext {
    Splash,
    Queue,
    Page,
}

impl Shell {
    /// Determine the current input context based on UI state
    ///
    /// Priority order: Splash > Queue panel > Page
    pub(super) fn input_context(&self) -> InputContext {
        if self.splash.is_active() {
            InputContext::Splash
        } else if self.queue.is_open() {
            InputContext::Queue
        } else {
            InputContext::Page
        }
    }

    /// Handle a key event
    ///
    /// This is the central key handling logic used by both main.rs and tests.
    pub fn handle_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
    ) -> std::io::Result<()> {
        tracing::trace!("handle_key: code={:?}, modifiers={:?}", code, modifiers);

        // Quit works in every context
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('q') {
            self.quit();
            return Ok(());
        }

        match self.input_context() {
            InputContext::Splash => self.handle_splash_key(code),
            InputContext::Queue => self.handle_queue_key(code, modifiers),
            InputContext::Page => self.handle_page_key(code, modifiers),
        }
        Ok(())
    }

    fn handle_splash_key(&mut self, code: KeyCode) {
        if code == KeyCode::Char(' ') && self.splash.skip() {
            self.after_splash();
        }
    }

    /// Keys shared by the page and queue contexts. Returns true when the
    /// key was consumed.
    fn handle_global_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('b') {
            self.toggle_queue();
            return true;
        }
        let target = match code {
            KeyCode::F(1) => Some(PAGES[0]),
            KeyCode::F(2) => Some(PAGES[1]),
            KeyCode::F(3) => Some(PAGES[2]),
            _ => None,
        };
        if let Some(name) = target {
            if let Some(req) = self.router.navigate(name) {
                self.spawn_page_load(req);
            }
            return true;
        }
        false
    }

    fn handle_queue_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if self.handle_global_key(code, modifiers) {
            return;
        }
        if code == KeyCode::Esc {
            // An open list eats the first Esc, the panel the second
            let closed = self
                .queue
                .view_mut()
                .map(|view| virtualizer::close_all(view))
                .unwrap_or(false);
            if !closed {
                self.queue.close();
            }
            return;
        }
        if let Some(view) = self.queue.view_mut() {
            handle_view_key(view, code, modifiers);
        }
    }

    fn handle_page_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if self.handle_global_key(code, modifiers) {
            return;
        }
        if let Some(view) = self.router.view_mut() {
            handle_view_key(view, code, modifiers);
        }
    }
}

/// Keyboard interaction with one live page surface
///
/// An open select captures navigation keys first; otherwise a focused
/// text input captures editing keys; whatever remains moves focus or
/// activates the focused control.
fn handle_view_key(view: &mut PageView, code: KeyCode, modifiers: KeyModifiers) {
    if view.open_select().is_some() {
        match code {
            KeyCode::Up => virtualizer::highlight_prev(view),
            KeyCode::Down => virtualizer::highlight_next(view),
            KeyCode::Enter | KeyCode::Char(' ') => virtualizer::commit_highlighted(view),
            KeyCode::Esc => {
                virtualizer::close_all(view);
            }
            KeyCode::Tab => {
                virtualizer::close_all(view);
                view.focus_next();
            }
            KeyCode::BackTab => {
                virtualizer::close_all(view);
                view.focus_prev();
            }
            _ => {}
        }
        return;
    }

    if handle_input_edit(view, code, modifiers) {
        return;
    }

    match code {
        KeyCode::Tab | KeyCode::Down => view.focus_next(),
        KeyCode::BackTab | KeyCode::Up => view.focus_prev(),
        KeyCode::PageDown => view.scroll = view.scroll.saturating_add(5),
        KeyCode::PageUp => view.scroll = view.scroll.saturating_sub(5),
        KeyCode::Enter | KeyCode::Char(' ') => activate_focused(view),
        KeyCode::Left => step_focused_radio(view, -1),
        KeyCode::Right => step_focused_radio(view, 1),
        _ => {}
    }
}

/// Editing keys for a focused text input. Returns true when consumed.
fn handle_input_edit(view: &mut PageView, code: KeyCode, modifiers: KeyModifiers) -> bool {
    let Some(focused) = view.focused.clone() else {
        return false;
    };
    let submitted = {
        let Some(PageControl::Input { id, state, .. }) = view.control_mut(&focused) else {
            return false;
        };
        match code {
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                state.insert(c);
                None
            }
            KeyCode::Backspace => {
                state.backspace();
                None
            }
            KeyCode::Delete => {
                state.delete();
                None
            }
            KeyCode::Left => {
                state.move_left();
                None
            }
            KeyCode::Right => {
                state.move_right();
                None
            }
            KeyCode::Home => {
                state.move_home();
                None
            }
            KeyCode::End => {
                state.move_end();
                None
            }
            KeyCode::Enter => Some(ControlEvent::Submitted {
                id: id.clone(),
                text: state.value.clone(),
            }),
            _ => return false,
        }
    };
    if let Some(event) = submitted {
        view.push_event(event);
    }
    true
}

/// Enter or Space on the focused control
fn activate_focused(view: &mut PageView) {
    let Some(focused) = view.focused.clone() else {
        return;
    };
    if matches!(view.control(&focused), Some(PageControl::Select { .. })) {
        virtualizer::open(view, &focused);
        return;
    }
    let mut event = None;
    match view.control_mut(&focused) {
        Some(PageControl::Checkbox { id, state, .. }) => {
            state.toggle();
            event = Some(ControlEvent::Changed {
                id: id.clone(),
                value: SettingValue::Bool(state.checked),
            });
        }
        Some(PageControl::Radio { id, state }) => {
            state.select_next();
            event = state.selected_value().map(|value| ControlEvent::Changed {
                id: id.clone(),
                value: SettingValue::Text(value.to_string()),
            });
        }
        Some(PageControl::Button { id, .. }) => {
            event = Some(ControlEvent::Activated { id: id.clone() });
        }
        _ => {}
    }
    if let Some(event) = event {
        view.push_event(event);
    }
}

/// Left/Right steps a focused radio group through its options
fn step_focused_radio(view: &mut PageView, dir: isize) {
    let Some(focused) = view.focused.clone() else {
        return;
    };
    let mut event = None;
    if let Some(PageControl::Radio { id, state }) = view.control_mut(&focused) {
        let len = state.options.len();
        if len == 0 {
            return;
        }
        let next = (state.selected as isize + dir).rem_euclid(len as isize) as usize;
        if state.select(next) {
            event = state.selected_value().map(|value| ControlEvent::Changed {
                id: id.clone(),
                value: SettingValue::Text(value.to_string()),
            });
        }
    }
    if let Some(event) = event {
        view.push_event(event);
    }
}
