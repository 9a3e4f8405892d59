//! UI state store
//!
//! Pure local state container with no backend calls: tab selection, window
//! and quick-control visibility, window position, theme mode, and the capped
//! self-expiring notification queue. Expiry is deadline-based; the controller
//! prunes elapsed entries on its ticks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Maximum number of notifications kept, newest first
const NOTIFICATION_CAP: usize = 10;

/// Main window tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    /// Sliders, presets, and the day-progress clock
    #[default]
    Overview,
    /// 24-hour schedule preview
    Schedule,
    /// Preferences and user preset management
    Settings,
}

/// User-selected theme mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Derive the theme from ambient conditions (currently resolves to dark)
    #[default]
    Auto,
    /// Always light
    Light,
    /// Always dark
    Dark,
}

/// Resolved theme actually rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Light theme
    Light,
    /// Dark theme
    Dark,
}

/// Severity of a notification; determines its expiry timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Informational
    Info,
    /// Operation succeeded
    Success,
    /// Something degraded but recoverable
    Warning,
    /// Operation failed
    Error,
}

impl NotificationKind {
    /// How long a notification of this kind stays visible
    pub fn timeout(self) -> Duration {
        match self {
            Self::Info | Self::Success => Duration::from_secs(5),
            Self::Warning | Self::Error => Duration::from_secs(10),
        }
    }
}

/// A transient message shown in the notification stack
#[derive(Debug, Clone)]
pub struct Notification {
    /// Unique id within this session
    pub id: String,
    /// Severity, also determines expiry
    pub kind: NotificationKind,
    /// Short headline
    pub title: String,
    /// Body text
    pub message: String,
    /// When the notification was raised
    pub timestamp: DateTime<Utc>,
    /// When it self-expires
    pub deadline: Instant,
}

/// State owner for everything that is purely view-side
pub struct UiStore {
    main_window_visible: bool,
    quick_control_visible: bool,
    window_position: Option<(i32, i32)>,
    active_tab: ActiveTab,
    theme_mode: ThemeMode,
    current_theme: Theme,
    notifications: Vec<Notification>,
    next_notification_id: u64,
}

impl Default for UiStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UiStore {
    /// Create a store with the default view state
    pub fn new() -> Self {
        Self {
            main_window_visible: true,
            quick_control_visible: false,
            window_position: None,
            active_tab: ActiveTab::Overview,
            theme_mode: ThemeMode::Auto,
            current_theme: Theme::Dark,
            notifications: Vec::new(),
            next_notification_id: 0,
        }
    }

    /// Whether the main window is shown
    pub fn main_window_visible(&self) -> bool {
        self.main_window_visible
    }

    /// Whether the quick control surface is shown
    pub fn quick_control_visible(&self) -> bool {
        self.quick_control_visible
    }

    /// Last known window position
    pub fn window_position(&self) -> Option<(i32, i32)> {
        self.window_position
    }

    /// Currently selected tab
    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    /// User-selected theme mode
    pub fn theme_mode(&self) -> ThemeMode {
        self.theme_mode
    }

    /// Resolved theme
    pub fn current_theme(&self) -> Theme {
        self.current_theme
    }

    /// Live notifications, newest first
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Show or hide the main window
    pub fn set_main_window_visible(&mut self, visible: bool) {
        self.main_window_visible = visible;
    }

    /// Show or hide the quick control surface
    pub fn set_quick_control_visible(&mut self, visible: bool) {
        self.quick_control_visible = visible;
    }

    /// Remember the window position
    pub fn set_window_position(&mut self, x: i32, y: i32) {
        self.window_position = Some((x, y));
    }

    /// Select a tab
    pub fn set_active_tab(&mut self, tab: ActiveTab) {
        self.active_tab = tab;
    }

    /// Set the theme mode and re-derive the rendered theme
    ///
    /// Auto is documented to follow ambient conditions but currently always
    /// resolves to dark; this is a placeholder until scheduling exists.
    pub fn set_theme_mode(&mut self, mode: ThemeMode) {
        self.theme_mode = mode;
        self.current_theme = match mode {
            ThemeMode::Light => Theme::Light,
            ThemeMode::Dark | ThemeMode::Auto => Theme::Dark,
        };
    }

    /// Override the rendered theme without changing the mode
    pub fn set_current_theme(&mut self, theme: Theme) {
        self.current_theme = theme;
    }

    /// Push a notification, evicting the oldest beyond the cap
    ///
    /// Returns the generated id.
    pub fn add_notification(
        &mut self,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) -> String {
        self.add_notification_at(kind, title, message, Instant::now())
    }

    /// Push a notification with an explicit insertion instant
    pub fn add_notification_at(
        &mut self,
        kind: NotificationKind,
        title: &str,
        message: &str,
        now: Instant,
    ) -> String {
        let id = self.next_notification_id.to_string();
        self.next_notification_id += 1;
        self.notifications.insert(
            0,
            Notification {
                id: id.clone(),
                kind,
                title: title.to_string(),
                message: message.to_string(),
                timestamp: Utc::now(),
                deadline: now + kind.timeout(),
            },
        );
        self.notifications.truncate(NOTIFICATION_CAP);
        id
    }

    /// Remove a notification by id
    pub fn remove_notification(&mut self, id: &str) {
        self.notifications.retain(|n| n.id != id);
    }

    /// Drop all notifications
    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }

    /// Drop notifications whose deadline has passed
    pub fn prune_expired(&mut self, now: Instant) {
        self.notifications.retain(|n| n.deadline > now);
    }
}
