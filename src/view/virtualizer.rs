//! Select widget binding and interaction
//!
//! Pages describe selects declaratively; this module binds an interactive
//! [`DropdownState`] widget over each [`SelectModel`] and keeps the two
//! sides consistent:
//!
//! - `initialize` is idempotent: a select that already has a widget is
//!   left alone, so re-running it after a page swap binds only the new
//!   controls.
//! - At most one widget is open at a time.
//! - Committing an option updates the widget label, closes the list,
//!   writes the value back to the model and queues a change event.
//!   Programmatic model writes go the other way through `sync` and queue
//!   nothing.

use crate::config::SettingValue;
use crate::view::controls::DropdownState;
use crate::view::page::{ControlEvent, PageControl, PageView};

/// Bind widgets to any selects that do not have one yet
///
/// Returns the number of widgets created.
pub fn initialize(view: &mut PageView) -> usize {
    let mut bound = 0;
    for section in &mut view.sections {
        for control in &mut section.controls {
            if let PageControl::Select {
                model,
                widget,
                synced_revision,
            } = control
            {
                if widget.is_some() {
                    continue;
                }
                let selected = model
                    .values
                    .iter()
                    .position(|v| *v == model.value)
                    .unwrap_or(0);
                *widget = Some(
                    DropdownState::with_values(
                        model.options.clone(),
                        model.values.clone(),
                        model.label.clone(),
                    )
                    .with_selected(selected),
                );
                *synced_revision = model.revision;
                bound += 1;
            }
        }
    }
    if bound > 0 {
        tracing::debug!("bound {} select widget(s) on page '{}'", bound, view.name);
    }
    bound
}

/// Push model changes into stale widgets
///
/// Called every tick; covers programmatic value writes and enable state
/// flips. A widget whose model was disabled while its list was open is
/// closed here.
pub fn sync(view: &mut PageView) {
    for section in &mut view.sections {
        for control in &mut section.controls {
            if let PageControl::Select {
                model,
                widget: Some(widget),
                synced_revision,
            } = control
            {
                if *synced_revision != model.revision {
                    widget.set_value(&model.value);
                    *synced_revision = model.revision;
                }
                if !model.enabled && widget.open {
                    widget.close();
                }
            }
        }
    }
}

/// Open one select's list, closing any other
pub fn open(view: &mut PageView, id: &str) {
    close_all(view);
    if let Some(PageControl::Select {
        model,
        widget: Some(widget),
        ..
    }) = view.control_mut(id)
    {
        if model.enabled {
            widget.open();
        }
    }
}

/// Toggle one select's list; opening is exclusive
pub fn toggle(view: &mut PageView, id: &str) {
    let was_open = matches!(
        view.control(id),
        Some(PageControl::Select {
            widget: Some(w),
            ..
        }) if w.open
    );
    if was_open {
        close_all(view);
    } else {
        open(view, id);
    }
}

/// Close every open list
///
/// Returns true when something was open.
pub fn close_all(view: &mut PageView) -> bool {
    let mut closed = false;
    for section in &mut view.sections {
        for control in &mut section.controls {
            if let PageControl::Select {
                widget: Some(widget),
                ..
            } = control
            {
                if widget.open {
                    widget.close();
                    closed = true;
                }
            }
        }
    }
    closed
}

/// Move the highlight in the open list
pub fn highlight_next(view: &mut PageView) {
    with_open_widget(view, |w| w.highlight_next());
}

/// Move the highlight in the open list
pub fn highlight_prev(view: &mut PageView) {
    with_open_widget(view, |w| w.highlight_prev());
}

/// Commit the highlighted option of the open list
pub fn commit_highlighted(view: &mut PageView) {
    let Some(id) = view.open_select() else {
        return;
    };
    let index = match view.control(&id) {
        Some(PageControl::Select {
            widget: Some(w), ..
        }) => w.highlighted,
        _ => return,
    };
    commit_option(view, &id, index);
}

/// Commit an option by index, as from a mouse click on its row
pub fn commit_option(view: &mut PageView, id: &str, index: usize) {
    let committed = match view.control_mut(id) {
        Some(PageControl::Select {
            model,
            widget: Some(widget),
            synced_revision,
        }) => {
            if !model.enabled || !widget.select(index) {
                None
            } else {
                widget.selected_value().map(str::to_string).map(|value| {
                    // The widget already shows the new value, so the model
                    // write must not count as a pending sync.
                    model.set_value(&value);
                    *synced_revision = model.revision;
                    value
                })
            }
        }
        _ => None,
    };
    if let Some(value) = committed {
        view.push_event(ControlEvent::Changed {
            id: id.to_string(),
            value: SettingValue::Text(value),
        });
    }
}

fn with_open_widget(view: &mut PageView, f: impl FnOnce(&mut DropdownState)) {
    let Some(id) = view.open_select() else {
        return;
    };
    if let Some(PageControl::Select {
        widget: Some(widget),
        ..
    }) = view.control_mut(&id)
    {
        f(widget);
    }
}
