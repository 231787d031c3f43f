//! Client side of DayScore: the store client, the view model that owns the
//! entry snapshot, and the form and list state it drives.

pub mod form;
pub mod list;
pub mod page;
pub mod store;
pub mod view_model;

pub use form::{EntryForm, FormRequest};
pub use list::{EntryList, ListIntent};
pub use store::{EntryStore, HttpEntryStore, StoreError};
pub use view_model::{EntryViewModel, Mode, Phase};
