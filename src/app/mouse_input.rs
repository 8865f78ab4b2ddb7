//! Mouse input handling.
//!
//! Hit testing runs against the control layouts captured by the last
//! render pass, so clicks land on what was actually on screen. The
//! queue panel overlays the page, so clicks inside its rect never
//! reach page controls.

use super::Shell;
use crate::config::SettingValue;
use crate::router::PAGES;
use crate::view::page::{ControlEvent, ControlHit, PageControl, PageLayout, PageView};
use crate::view::virtualizer;

use ratatui::layout::Rect;

impl Shell {
    /// Handle a mouse event.
    /// Returns true if a re-render is needed.
    pub fn handle_mouse(
        &mut self,
        mouse_event: crossterm::event::MouseEvent,
    ) -> std::io::Result<bool> {
        use crossterm::event::{MouseButton, MouseEventKind};

        // The splash covers the whole screen and takes no pointer input
        if self.splash.is_active() {
            return Ok(false);
        }

        let col = mouse_event.column;
        let row = mouse_event.row;
        tracing::trace!(
            "handle_mouse: kind={:?}, col={}, row={}",
            mouse_event.kind,
            col,
            row
        );

        let needs_render = match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.handle_mouse_click(col, row);
                true
            }
            MouseEventKind::ScrollDown => {
                self.handle_mouse_scroll(col, row, 1);
                true
            }
            MouseEventKind::ScrollUp => {
                self.handle_mouse_scroll(col, row, -1);
                true
            }
            MouseEventKind::Moved => self.handle_mouse_moved(col, row),
            _ => false,
        };
        Ok(needs_render)
    }

    fn handle_mouse_click(&mut self, col: u16, row: u16) {
        if let Some(index) = self.nav_tab_at(col, row) {
            // A press on the nav bar dismisses open menus everywhere
            if let Some(view) = self.router.view_mut() {
                virtualizer::close_all(view);
            }
            if let Some(view) = self.queue.view_mut() {
                virtualizer::close_all(view);
            }
            if let Some(req) = self.router.navigate(PAGES[index]) {
                self.spawn_page_load(req);
            }
            return;
        }

        let on_queue_toggle = self
            .cached_layout
            .queue_toggle_area
            .map_or(false, |area| rect_hit(area, col, row));
        if on_queue_toggle {
            // toggle_queue dismisses open lists on both surfaces
            self.toggle_queue();
            return;
        }

        let in_queue = self
            .cached_layout
            .queue_area
            .map_or(false, |area| rect_hit(area, col, row));

        if in_queue {
            // The panel absorbs the click; the page below only loses
            // any menu it still had open
            if let Some(view) = self.router.view_mut() {
                virtualizer::close_all(view);
            }
            if let Some(view) = self.queue.view_mut() {
                click_view(view, &self.cached_layout.queue_layout, col, row);
            }
        } else {
            if let Some(view) = self.queue.view_mut() {
                virtualizer::close_all(view);
            }
            if let Some(view) = self.router.view_mut() {
                click_view(view, &self.cached_layout.page_layout, col, row);
            }
        }
    }

    fn handle_mouse_scroll(&mut self, col: u16, row: u16, delta: i32) {
        let in_queue = self
            .cached_layout
            .queue_area
            .map_or(false, |area| rect_hit(area, col, row));
        let view = if in_queue {
            self.queue.view_mut()
        } else {
            self.router.view_mut()
        };
        let Some(view) = view else {
            return;
        };

        // The wheel steers an open menu before it scrolls the page
        if view.open_select().is_some() {
            if delta > 0 {
                virtualizer::highlight_next(view);
            } else {
                virtualizer::highlight_prev(view);
            }
            return;
        }

        if delta > 0 {
            view.scroll = view.scroll.saturating_add(1);
        } else {
            view.scroll = view.scroll.saturating_sub(1);
        }
    }

    /// Track the control under the pointer for hover styling.
    /// Returns true when the hover target changed.
    fn handle_mouse_moved(&mut self, col: u16, row: u16) -> bool {
        let in_queue = self
            .cached_layout
            .queue_area
            .map_or(false, |area| rect_hit(area, col, row));
        let (view, layout) = if in_queue {
            (self.queue.view_mut(), &self.cached_layout.queue_layout)
        } else {
            (self.router.view_mut(), &self.cached_layout.page_layout)
        };
        let Some(view) = view else {
            return false;
        };

        let hovered = layout.hit_at(col, row).map(|(id, _)| id.to_string());
        if view.hovered != hovered {
            view.hovered = hovered;
            true
        } else {
            false
        }
    }

    fn nav_tab_at(&self, col: u16, row: u16) -> Option<usize> {
        self.cached_layout
            .nav_tab_areas
            .iter()
            .find(|(_, area)| rect_hit(*area, col, row))
            .map(|(index, _)| *index)
    }
}

fn rect_hit(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

/// Apply a left click to a view using the layout from the last render.
fn click_view(view: &mut PageView, layout: &PageLayout, col: u16, row: u16) {
    let Some((id, hit)) = layout.hit_at(col, row) else {
        // Click-away closes whatever menu was open
        virtualizer::close_all(view);
        return;
    };
    let id = id.to_string();

    match hit {
        ControlHit::Select(dropdown) => {
            if let Some(index) = dropdown.option_at(col, row) {
                virtualizer::commit_option(view, &id, index);
            } else if dropdown.is_button(col, row) {
                view.focused = Some(id.clone());
                virtualizer::toggle(view, &id);
            }
        }
        ControlHit::Checkbox(_) => {
            virtualizer::close_all(view);
            let mut event = None;
            if let Some(PageControl::Checkbox {
                id,
                state,
                disabled,
            }) = view.control_mut(&id)
            {
                if !*disabled {
                    state.toggle();
                    event = Some(ControlEvent::Changed {
                        id: id.clone(),
                        value: SettingValue::Bool(state.checked),
                    });
                }
            }
            if let Some(event) = event {
                view.focused = Some(id);
                view.push_event(event);
            }
        }
        ControlHit::Radio(group) => {
            virtualizer::close_all(view);
            let index = group.option_at(col, row);
            let mut event = None;
            if let (Some(index), Some(PageControl::Radio { id, state })) =
                (index, view.control_mut(&id))
            {
                if state.select(index) {
                    event = state.selected_value().map(|value| ControlEvent::Changed {
                        id: id.clone(),
                        value: SettingValue::Text(value.to_string()),
                    });
                }
            }
            if let Some(event) = event {
                view.focused = Some(id);
                view.push_event(event);
            }
        }
        ControlHit::Input(_) => {
            virtualizer::close_all(view);
            let mut take_focus = false;
            if let Some(PageControl::Input {
                state, disabled, ..
            }) = view.control_mut(&id)
            {
                if !*disabled {
                    state.move_end();
                    take_focus = true;
                }
            }
            if take_focus {
                view.focused = Some(id);
            }
        }
        ControlHit::Button(_) => {
            virtualizer::close_all(view);
            view.focused = Some(id.clone());
            view.push_event(ControlEvent::Activated { id });
        }
    }
}
