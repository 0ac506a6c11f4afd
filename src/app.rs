// Panel state and main event loop.
// Holds the transient key selection and routes every action into the
// cache; all displayed data is re-derived from the cache each frame.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::prelude::*;
use ratatui::widgets::ListState;
use serde_json::Value;

use crate::cache::{CacheKey, DataCache};
use crate::config::Config;
use crate::error::Result;
use crate::key::ParsedKey;
use crate::subscription::KeySubscription;
use crate::ui;

/// Maximum notices retained for the status bar.
const MAX_NOTICES: usize = 50;

/// Severity of a status-bar notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
}

/// A one-line message shown in the status bar.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Main panel state.
pub struct App {
    /// Live view of the cache.
    pub subscription: KeySubscription,
    /// Currently selected key, if any.
    pub selected: Option<CacheKey>,
    /// List widget state for the key pane.
    pub list_state: ListState,
    /// Horizontal scroll offset for the value view.
    pub value_scroll_x: u16,
    /// Vertical scroll offset for the value view.
    pub value_scroll_y: u16,
    /// Whether the help overlay is shown.
    pub show_help: bool,
    /// Whether the clear-cache confirmation is shown.
    pub confirm_clear: bool,
    /// Recent notices, newest last.
    pub notices: Vec<Notice>,
    /// Whether the panel should exit.
    pub should_quit: bool,
    tick_rate: Duration,
}

impl App {
    /// Mount the panel on `cache`. The initial selection is the first
    /// live key, or none when the cache is empty.
    pub fn new(cache: Arc<dyn DataCache>, config: &Config) -> Self {
        let subscription = KeySubscription::new(cache);
        let selected = subscription.current_keys().first().cloned();
        Self {
            subscription,
            selected,
            list_state: ListState::default(),
            value_scroll_x: 0,
            value_scroll_y: 0,
            show_help: false,
            confirm_clear: false,
            notices: Vec::new(),
            should_quit: false,
            tick_rate: Duration::from_millis(config.tick_rate_ms),
        }
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> Result<()> {
        while !self.should_quit {
            if self.subscription.take_dirty() {
                self.reconcile_selection();
            }
            self.sync_list_state();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> Result<()> {
        if event::poll(self.tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Apply one key press to the panel state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.confirm_clear {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.confirm_clear = false;
                    self.clear_cache();
                }
                _ => self.confirm_clear = false,
            }
            return;
        }
        if self.show_help {
            self.show_help = false;
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Char('r') => self.revalidate_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('c') => {
                if !self.current_keys().is_empty() {
                    self.confirm_clear = true;
                }
            }
            KeyCode::PageUp => self.value_scroll_y = self.value_scroll_y.saturating_sub(20),
            KeyCode::PageDown => self.value_scroll_y = self.value_scroll_y.saturating_add(20),
            KeyCode::Left | KeyCode::Char('h') => {
                self.value_scroll_x = self.value_scroll_x.saturating_sub(4);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.value_scroll_x = self.value_scroll_x.saturating_add(4);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.value_scroll_y = 0;
                self.value_scroll_x = 0;
            }
            KeyCode::End | KeyCode::Char('G') => self.scroll_value_to_end(),
            _ => {}
        }
    }

    /// Keys as the cache reports them right now.
    pub fn current_keys(&self) -> Vec<CacheKey> {
        self.subscription.current_keys()
    }

    /// Pretty-printed JSON for the selected entry. An absent value
    /// renders as `null`; serialization problems degrade to `null` too.
    pub fn selected_value_pretty(&self) -> Option<String> {
        let key = self.selected.as_ref()?;
        let value = self.subscription.current_value(key).unwrap_or(Value::Null);
        Some(serde_json::to_string_pretty(&value).unwrap_or_else(|_| String::from("null")))
    }

    /// Most recent notice for the status bar.
    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Drop a selection whose key disappeared from the cache, falling
    /// back to the first remaining key. Runs after every notification.
    fn reconcile_selection(&mut self) {
        let keys = self.current_keys();
        if let Some(selected) = &self.selected {
            if !keys.iter().any(|k| k == selected) {
                self.set_selected(keys.first().cloned());
            }
        }
    }

    /// Mirror the selected key into the list widget state.
    fn sync_list_state(&mut self) {
        let keys = self.current_keys();
        let index = self.selected_index(&keys);
        self.list_state.select(index);
    }

    fn selected_index(&self, keys: &[CacheKey]) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        keys.iter().position(|k| k == selected)
    }

    /// Change the selection, resetting the value scroll on a new key.
    fn set_selected(&mut self, key: Option<CacheKey>) {
        if self.selected != key {
            self.value_scroll_x = 0;
            self.value_scroll_y = 0;
        }
        self.selected = key;
    }

    fn select_next(&mut self) {
        let keys = self.current_keys();
        if keys.is_empty() {
            return;
        }
        let next = match self.selected_index(&keys) {
            Some(i) if i + 1 < keys.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.set_selected(Some(keys[next].clone()));
    }

    fn select_prev(&mut self) {
        let keys = self.current_keys();
        if keys.is_empty() {
            return;
        }
        let prev = match self.selected_index(&keys) {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.set_selected(Some(keys[prev].clone()));
    }

    /// Ask the cache to refetch the selected key. Fire-and-forget: the
    /// cache notifies when the refetch lands.
    fn revalidate_selected(&mut self) {
        let Some(key) = self.selected.clone() else {
            return;
        };
        self.subscription.cache().mutate(&key, None, true);
        self.push_notice(
            NoticeLevel::Info,
            format!("Revalidating {}", ParsedKey::decode(&key).label()),
        );
    }

    /// Delete the selected entry and select the first remaining key.
    fn delete_selected(&mut self) {
        let Some(key) = self.selected.clone() else {
            return;
        };
        self.subscription.cache().delete(&key);
        let keys = self.current_keys();
        self.set_selected(keys.first().cloned());
        self.push_notice(
            NoticeLevel::Warn,
            format!("Deleted {}", ParsedKey::decode(&key).label()),
        );
    }

    /// Clear the whole cache; nothing stays selected.
    fn clear_cache(&mut self) {
        self.subscription.cache().clear();
        self.set_selected(None);
        self.push_notice(NoticeLevel::Warn, String::from("Cache cleared"));
    }

    fn scroll_value_to_end(&mut self) {
        if let Some(text) = self.selected_value_pretty() {
            let line_count = text.lines().count() as u16;
            self.value_scroll_y = line_count.saturating_sub(10);
        }
    }

    fn push_notice(&mut self, level: NoticeLevel, message: String) {
        self.notices.push(Notice {
            level,
            message,
            timestamp: Utc::now(),
        });
        if self.notices.len() > MAX_NOTICES {
            self.notices.remove(0);
        }
    }
}
