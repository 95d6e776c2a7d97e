//! Centered modal dialog chrome

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear},
};
use serde::{Deserialize, Serialize};

use super::layout::{self, PopupSize};
use crate::factory::{FactoryScope, PopupFactory, PopupFactoryProvider};
use crate::metadata::Metadata;
use crate::registry::PopupEntry;
use crate::theme::PopupTheme;
use crate::Frame;

/// Metadata key owned by the dialog chrome.
pub const ALERT_DIALOG_KEY: &str = "alert_dialog";

/// Presentation options for dialog chrome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogProperties {
    /// Title rendered on the top border.
    pub title: Option<String>,
    pub size: PopupSize,
    /// Whether Esc dismisses the dialog.
    pub dismiss_on_esc: bool,
    /// Whether the obscured UI is dimmed behind the dialog.
    pub dim_backdrop: bool,
}

impl Default for DialogProperties {
    fn default() -> Self {
        Self {
            title: None,
            size: PopupSize::default(),
            dismiss_on_esc: true,
            dim_backdrop: true,
        }
    }
}

impl DialogProperties {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_size(mut self, size: PopupSize) -> Self {
        self.size = size;
        self
    }

    pub fn dismiss_on_esc(mut self, dismiss: bool) -> Self {
        self.dismiss_on_esc = dismiss;
        self
    }

    pub fn dim_backdrop(mut self, dim: bool) -> Self {
        self.dim_backdrop = dim;
        self
    }
}

/// Offers dialog chrome for entries carrying [`ALERT_DIALOG_KEY`].
#[derive(Debug, Default)]
pub struct DialogFactoryProvider;

impl DialogFactoryProvider {
    pub fn new() -> Self {
        Self
    }

    /// Metadata marking an entry as dialog-rendered.
    pub fn metadata(properties: DialogProperties) -> Metadata {
        Metadata::new().with(ALERT_DIALOG_KEY, properties)
    }
}

impl PopupFactoryProvider for DialogFactoryProvider {
    fn create(&self, entry: &PopupEntry) -> Option<Box<dyn PopupFactory>> {
        let properties = entry
            .metadata()
            .get::<DialogProperties>(ALERT_DIALOG_KEY)?
            .clone();
        Some(Box::new(DialogFactory { properties }))
    }
}

struct DialogFactory {
    properties: DialogProperties,
}

impl PopupFactory for DialogFactory {
    fn render(
        &self,
        entry: &PopupEntry,
        frame: &mut Frame<'_>,
        area: Rect,
        theme: &PopupTheme,
        scope: &FactoryScope,
    ) {
        if self.properties.dim_backdrop {
            let dim = Block::default()
                .style(Style::default().bg(theme.backdrop).add_modifier(Modifier::DIM));
            frame.render_widget(dim, area);
        }

        let container = layout::centered(self.properties.size, area);
        frame.render_widget(Clear, container);

        let mut block = Block::default()
            .borders(Borders::ALL)
            .style(Style::default().fg(theme.border));
        if let Some(title) = &self.properties.title {
            block = block.title(title.clone());
        }
        frame.render_widget(block, container);

        entry.render(frame, layout::inset(container), theme, scope);
    }

    fn handle_key(&self, entry: &PopupEntry, key: KeyEvent, scope: &FactoryScope) -> bool {
        if self.properties.dismiss_on_esc
            && key.code == KeyCode::Esc
            && key.modifiers.is_empty()
        {
            scope.request_dismiss();
            return true;
        }
        if entry.handle_key(key, scope) {
            return true;
        }
        // Dialogs are modal: unhandled keys stop here instead of reaching
        // the UI underneath.
        true
    }
}
