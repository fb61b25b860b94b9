// src/session/mod.rs
pub mod command;
pub mod controller;
pub mod render;

pub use command::{parse_command, Command, HELP};
pub use controller::{
    KitChoice, ProposalDocument, QuoteView, SessionController, SessionEvent, SessionSettings,
    SessionState, SessionView,
};
pub use render::render_view;
