//! Page navigation and load sequencing
//!
//! Pages are fetched asynchronously, so rapid navigation can finish out of
//! order. Every navigation gets a generation ticket; only the most recent
//! ticket may install its page, anything older is dropped on arrival. The
//! surviving page slides in over 200ms, from the right when moving forward
//! in the page order and from the left when moving back.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::services::time_source::SharedTimeSource;
use crate::view::page::{PageTemplate, PageView};

/// Shell pages in navigation order
pub const PAGES: [&str; 3] = ["downloader", "console", "settings"];

pub const SLIDE_ANIM: Duration = Duration::from_millis(200);

pub fn page_index(name: &str) -> Option<usize> {
    PAGES.iter().position(|p| *p == name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
enum Transition {
    None,
    Sliding {
        direction: SlideDirection,
        since: Instant,
    },
}

/// A fetch the caller should start for a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub ticket: u64,
    pub name: String,
    pub index: usize,
}

#[derive(Debug)]
struct PendingLoad {
    ticket: u64,
    name: String,
    index: usize,
    direction: SlideDirection,
}

pub struct ViewRouter {
    view: Option<PageView>,
    current_name: Option<String>,
    current_index: usize,
    pending: Option<PendingLoad>,
    next_ticket: u64,
    transition: Transition,
    clock: SharedTimeSource,
}

impl ViewRouter {
    pub fn new(clock: SharedTimeSource) -> Self {
        Self {
            view: None,
            current_name: None,
            current_index: 0,
            pending: None,
            next_ticket: 1,
            transition: Transition::None,
            clock,
        }
    }

    /// Begin navigation to a page
    ///
    /// Returns the fetch the caller must start, or None when the page is
    /// unknown or already current. Navigating back to the current page
    /// does not cancel a load already in flight.
    pub fn navigate(&mut self, name: &str) -> Option<LoadRequest> {
        let Some(index) = page_index(name) else {
            tracing::warn!("navigate to unknown page {:?}", name);
            return None;
        };
        if self.current_name.as_deref() == Some(name) {
            return None;
        }
        let direction = if index >= self.current_index {
            SlideDirection::Right
        } else {
            SlideDirection::Left
        };
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some(PendingLoad {
            ticket,
            name: name.to_string(),
            index,
            direction,
        });
        tracing::debug!("navigate to '{}' (ticket {})", name, ticket);
        Some(LoadRequest {
            ticket,
            name: name.to_string(),
            index,
        })
    }

    /// Install a fetched page if its ticket is still current
    ///
    /// The new page is returned for post-swap setup. A stale ticket
    /// returns None and changes nothing.
    pub fn complete_load(
        &mut self,
        ticket: u64,
        template: &PageTemplate,
    ) -> Option<&mut PageView> {
        match &self.pending {
            Some(p) if p.ticket == ticket => {}
            _ => {
                tracing::debug!("dropping stale page load (ticket {})", ticket);
                return None;
            }
        }
        let pending = self.pending.take()?;
        self.view = Some(PageView::from_template(pending.name.clone(), template));
        self.current_name = Some(pending.name);
        self.current_index = pending.index;
        self.transition = Transition::Sliding {
            direction: pending.direction,
            since: self.clock.now(),
        };
        self.view.as_mut()
    }

    /// Drop a failed load if its ticket is still current
    pub fn fail_load(&mut self, ticket: u64) -> bool {
        match &self.pending {
            Some(p) if p.ticket == ticket => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Settle a finished slide
    pub fn tick(&mut self) {
        if let Transition::Sliding { since, .. } = self.transition {
            if self.clock.now().duration_since(since) >= SLIDE_ANIM {
                self.transition = Transition::None;
            }
        }
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.transition, Transition::Sliding { .. })
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn view(&self) -> Option<&PageView> {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut PageView> {
        self.view.as_mut()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    /// The sub-area the page should be drawn into, shrunk toward the
    /// entering edge while a slide is running
    pub fn animated_area(&self, area: Rect) -> Rect {
        let Transition::Sliding { direction, since } = self.transition else {
            return area;
        };
        let p = (self.clock.now().duration_since(since).as_secs_f64()
            / SLIDE_ANIM.as_secs_f64())
        .min(1.0);
        let inset = ((1.0 - p) * area.width as f64).round() as u16;
        let width = area.width.saturating_sub(inset);
        match direction {
            SlideDirection::Right => Rect::new(area.x + inset, area.y, width, area.height),
            SlideDirection::Left => Rect::new(area.x, area.y, width, area.height),
        }
    }
}
