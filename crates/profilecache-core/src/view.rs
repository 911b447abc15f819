//! Which panel is on screen.
//!
//! At most one backdrop is active at a time; the profile modal is
//! independent of it and renders above whatever backdrop is showing.

use crate::models::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backdrop {
    #[default]
    None,
    Details,
    Favorites,
    Gallery,
    BulkProfiles,
}

impl Backdrop {
    pub fn title(self) -> &'static str {
        match self {
            Backdrop::None => "",
            Backdrop::Details => "Details",
            Backdrop::Favorites => "Favorites",
            Backdrop::Gallery => "Gallery",
            Backdrop::BulkProfiles => "Bulk Profiles",
        }
    }
}

/// A backdrop change, reported so the caller can tear down what closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Backdrop,
    pub to: Backdrop,
}

impl Transition {
    pub fn is_change(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Default)]
pub struct ViewController {
    backdrop: Backdrop,
    modal: Option<Profile>,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backdrop(&self) -> Backdrop {
        self.backdrop
    }

    pub fn modal(&self) -> Option<&Profile> {
        self.modal.as_ref()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal.is_some()
    }

    /// Show `backdrop`, replacing whichever one was active.
    pub fn open(&mut self, backdrop: Backdrop) -> Transition {
        let from = std::mem::replace(&mut self.backdrop, backdrop);
        Transition { from, to: backdrop }
    }

    /// Open `backdrop`, or close it if it is already showing.
    pub fn toggle(&mut self, backdrop: Backdrop) -> Transition {
        if self.backdrop == backdrop {
            self.close_backdrop()
        } else {
            self.open(backdrop)
        }
    }

    pub fn close_backdrop(&mut self) -> Transition {
        self.open(Backdrop::None)
    }

    pub fn open_modal(&mut self, profile: Profile) {
        self.modal = Some(profile);
    }

    /// Returns the profile that was showing, if any.
    pub fn close_modal(&mut self) -> Option<Profile> {
        self.modal.take()
    }
}
