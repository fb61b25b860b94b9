// src/session/controller.rs
use crate::catalog::lookup::Catalog;
use crate::config::Config;
use crate::domain::errors::{AppResult, SessionError, SessionResult};
use crate::domain::models::{CatalogEntry, PaymentMethod, PaymentSelection, QuoteResult};
use crate::pricing::engine::compute_quote;
use crate::proposal::banner::BannerImage;
use crate::proposal::message::{compose_message, ComposedMessage, LinkEncoding};
use crate::proposal::pdf::{ProposalExporter, ProposalRequest, PDF_MIME_TYPE};
use std::path::Path;

/// Session-wide settings that never change after start-up
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub link_encoding: LinkEncoding,
    pub proposal_title: String,
    pub proposal_file_name: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Config::default().session_settings()
    }
}

/// How the user picks a kit among the search results
#[derive(Debug, Clone, PartialEq)]
pub enum KitChoice {
    /// 1-based position in the current results
    Index(usize),
    Description(String),
    /// Text typed at the prompt: an exact description wins, otherwise a
    /// number is read as a position
    Entered(String),
}

/// One user input change
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Search(String),
    SelectKit(KitChoice),
    SetClientName(String),
    SetPaymentMethod(PaymentMethod),
    SetDiscount(u8),
}

/// Everything the user has entered so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub query: String,
    pub selected_kit: Option<String>,
    /// Kit shown by the last recompute, used to detect kit switches
    pub previous_kit: Option<String>,
    pub client_name: String,
    pub selection: PaymentSelection,
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub enum SessionView {
    /// The search found no kit; nothing else was computed
    NotFound { query: String },
    Quote(Box<QuoteView>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteView {
    /// Descriptions matching the current search, in catalog order
    pub matches: Vec<String>,
    pub entry: CatalogEntry,
    pub selection: PaymentSelection,
    pub quote: QuoteResult,
    pub message: ComposedMessage,
    pub whatsapp_link: String,
    pub client_name: Option<String>,
    /// True when this run picked a different kit than the previous one
    pub kit_switched: bool,
}

/// Proposal ready for download
#[derive(Debug, Clone)]
pub struct ProposalDocument {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ProposalDocument {
    /// Write the PDF bytes to `path`, replacing any previous file
    pub async fn save(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::write(path, &self.bytes).await
    }
}

/// Holds the session state and re-runs the quote pipeline on every change
pub struct SessionController {
    catalog: Catalog,
    banner: Option<BannerImage>,
    exporter: ProposalExporter,
    settings: SessionSettings,
    state: SessionState,
}

impl SessionController {
    pub fn new(catalog: Catalog, banner: Option<BannerImage>, settings: SessionSettings) -> Self {
        let exporter = ProposalExporter::new(&settings.proposal_title);
        Self {
            catalog,
            banner,
            exporter,
            settings,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Apply an input change and recompute the view
    pub fn handle(&mut self, event: SessionEvent) -> SessionResult<SessionView> {
        log::debug!("Session event: {:?}", event);

        match event {
            SessionEvent::Search(query) => {
                self.state.query = query;
            }
            SessionEvent::SelectKit(choice) => {
                let description = self.resolve_choice(&choice)?;
                self.state.selected_kit = Some(description);
            }
            SessionEvent::SetClientName(name) => {
                self.state.client_name = name.trim().to_string();
            }
            SessionEvent::SetPaymentMethod(method) => {
                let current = self.state.selection.discount_percent;
                self.state.selection = PaymentSelection::clamped(method, current);
                if self.state.selection.discount_percent != current {
                    log::info!(
                        "Discount lowered from {}% to {}% for {}",
                        current,
                        self.state.selection.discount_percent,
                        method
                    );
                }
            }
            SessionEvent::SetDiscount(percent) => {
                let method = self.state.selection.method;
                if percent > method.max_discount() {
                    log::warn!(
                        "Discount {}% exceeds the {}% allowed for {}; clamping",
                        percent,
                        method.max_discount(),
                        method
                    );
                }
                self.state.selection = PaymentSelection::clamped(method, percent);
            }
        }

        Ok(self.recompute())
    }

    /// Run search, selection, pricing and message composition from the current state
    pub fn recompute(&mut self) -> SessionView {
        let matches: Vec<String> = self
            .catalog
            .search(&self.state.query)
            .into_iter()
            .map(|entry| entry.description.clone())
            .collect();

        let Some(first) = matches.first() else {
            log::info!("No kit matches '{}'", self.state.query);
            return SessionView::NotFound {
                query: self.state.query.clone(),
            };
        };

        // Fall back to the first result when the chosen kit is no longer listed
        let selected = match &self.state.selected_kit {
            Some(kit) if matches.contains(kit) => kit.clone(),
            _ => first.clone(),
        };
        self.state.selected_kit = Some(selected.clone());

        let kit_switched = self.state.previous_kit.as_deref() != Some(selected.as_str());
        if kit_switched {
            log::info!("Kit switched to '{}'; resetting payment options", selected);
            self.state.previous_kit = Some(selected.clone());
            self.state.selection = PaymentSelection::default();
        }

        let Some(entry) = self.catalog.resolve(&selected).cloned() else {
            // Matches come from the same catalog, so this only happens on a logic error
            return SessionView::NotFound {
                query: self.state.query.clone(),
            };
        };

        let selection = self.state.selection;
        let quote = compute_quote(&entry, &selection);
        let message = compose_message(&entry.description, &selection, &quote);
        let whatsapp_link = message.whatsapp_link(self.settings.link_encoding);

        log::debug!(
            "Quote for '{}': discounted {} shipping {} total {}",
            entry.description,
            quote.discounted_price,
            quote.shipping_estimate,
            quote.total_with_shipping
        );

        let client_name = Some(self.state.client_name.clone()).filter(|n| !n.is_empty());

        SessionView::Quote(Box::new(QuoteView {
            matches,
            entry,
            selection,
            quote,
            message,
            whatsapp_link,
            client_name,
            kit_switched,
        }))
    }

    /// Render the proposal PDF for the current quote
    pub fn export_proposal(&mut self) -> AppResult<ProposalDocument> {
        let view = match self.recompute() {
            SessionView::Quote(view) => view,
            SessionView::NotFound { .. } => return Err(SessionError::NoKitSelected.into()),
        };

        let bytes = self.exporter.render(&ProposalRequest {
            client_name: view.client_name.as_deref(),
            message: &view.message.text,
            model_link: &view.entry.model_link,
            banner: self.banner.as_ref(),
        })?;

        log::info!(
            "Exported proposal for '{}' ({} bytes)",
            view.entry.description,
            bytes.len()
        );

        Ok(ProposalDocument {
            file_name: self.settings.proposal_file_name.clone(),
            mime_type: PDF_MIME_TYPE,
            bytes,
        })
    }

    fn resolve_choice(&self, choice: &KitChoice) -> SessionResult<String> {
        let matches = self.catalog.search(&self.state.query);
        let by_position = |index: usize| {
            index
                .checked_sub(1)
                .and_then(|i| matches.get(i))
                .map(|entry| entry.description.clone())
                .ok_or_else(|| SessionError::UnknownKit(format!("#{}", index)))
        };
        let by_description = |description: &str| {
            matches
                .iter()
                .find(|entry| entry.description == description)
                .map(|entry| entry.description.clone())
        };

        match choice {
            KitChoice::Index(index) => by_position(*index),
            KitChoice::Description(description) => {
                by_description(description).ok_or_else(|| SessionError::UnknownKit(description.clone()))
            }
            KitChoice::Entered(text) => match by_description(text) {
                Some(description) => Ok(description),
                None => match text.parse::<usize>() {
                    Ok(index) => by_position(index),
                    Err(_) => Err(SessionError::UnknownKit(text.clone())),
                },
            },
        }
    }
}
