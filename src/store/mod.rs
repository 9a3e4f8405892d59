//! Client-side state stores
//!
//! Two explicit state owners with narrow action interfaces and one-way data
//! flow (actions mutate state, the controller publishes snapshots, the GUI
//! renders them):
//!
//! - [`GammaStore`]: cached gamma state, presets, and connection status.
//!   Every read/write is mediated by the bridge; local state is updated
//!   optimistically and reconciled on the next poll.
//! - [`UiStore`]: pure local UI state with no backend calls. Holds tab
//!   selection, theme, visibility flags, and the capped self-expiring
//!   notification queue.
//!
//! All mutation happens on the controller thread; the stores themselves are
//! plain structs with no interior locking.

pub mod gamma;
pub mod ui;

pub use gamma::{GammaStore, Preset};
pub use ui::{ActiveTab, Notification, NotificationKind, Theme, ThemeMode, UiStore};
