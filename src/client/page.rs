use std::fmt;

use super::store::EntryStore;
use super::view_model::{EntryViewModel, Mode, Phase};

pub const TITLE: &str = "DayScore";
pub const ADD_ENTRY: &str = "[Add Entry]";

/// Plain-text page: heading, banner, the open form or the add affordance,
/// then the list.
pub struct Page<'a, S: EntryStore> {
    vm: &'a EntryViewModel<S>,
}

impl<'a, S: EntryStore> Page<'a, S> {
    pub fn new(vm: &'a EntryViewModel<S>) -> Self {
        Self { vm }
    }
}

impl<S: EntryStore> fmt::Display for Page<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.vm.phase() == Phase::Loading {
            return writeln!(f, "Loading...");
        }

        writeln!(f, "{}", TITLE)?;
        writeln!(f)?;

        if let Some(banner) = self.vm.banner() {
            writeln!(f, "{}", banner)?;
            writeln!(f)?;
        }

        match self.vm.mode() {
            Mode::Idle => writeln!(f, "{}", ADD_ENTRY)?,
            Mode::Creating(form) => write!(f, "New Entry\n{}", form)?,
            Mode::Editing(form) => write!(f, "Edit Entry\n{}", form)?,
        }

        writeln!(f)?;
        writeln!(f, "Entries")?;
        write!(f, "{}", self.vm.list())
    }
}
