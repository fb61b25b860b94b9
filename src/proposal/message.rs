// src/proposal/message.rs
use crate::domain::models::{PaymentSelection, QuoteResult};
use crate::pricing::format::format_currency;

const WHATSAPP_SHARE_URL: &str = "https://wa.me/?text=";

/// Note appended to every shipping figure
pub const SHIPPING_NOTE: &str = "(pago direto à transportadora)";

/// How the share link escapes the message text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkEncoding {
    /// Only spaces and newlines are escaped
    #[default]
    Minimal,
    /// Every reserved character is percent-encoded
    Strict,
}

/// Quote summary ready to be shown, shared or exported
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedMessage {
    pub text: String,
}

impl ComposedMessage {
    /// Message text with `%20` for spaces and `%0A` for newlines
    pub fn url_encoded(&self) -> String {
        minimal_url_encode(&self.text)
    }

    pub fn whatsapp_link(&self, encoding: LinkEncoding) -> String {
        let encoded = match encoding {
            LinkEncoding::Minimal => self.url_encoded(),
            LinkEncoding::Strict => urlencoding::encode(&self.text).into_owned(),
        };
        format!("{}{}", WHATSAPP_SHARE_URL, encoded)
    }
}

/// Render the quote summary for a kit
pub fn compose_message(
    kit_name: &str,
    selection: &PaymentSelection,
    quote: &QuoteResult,
) -> ComposedMessage {
    let text = format!(
        "Kit: {kit}\n\n\
         Valor à vista: {cash}\n\
         Valor com {percent}% de desconto ({method}): {discounted}\n\
         Frete estimado: {shipping} {note}\n\
         💵 Total com Frete: {total}\n\n\
         Valor estimado da casa pronta: {turn_key}",
        kit = kit_name,
        cash = format_currency(quote.cash_price),
        percent = selection.discount_percent,
        method = selection.method.label(),
        discounted = format_currency(quote.discounted_price),
        shipping = format_currency(quote.shipping_estimate),
        note = SHIPPING_NOTE,
        total = format_currency(quote.total_with_shipping),
        turn_key = format_currency(quote.turn_key_estimate),
    );

    ComposedMessage { text }
}

pub fn minimal_url_encode(text: &str) -> String {
    text.replace(' ', "%20").replace('\n', "%0A")
}

pub fn minimal_url_decode(encoded: &str) -> String {
    encoded.replace("%0A", "\n").replace("%20", " ")
}
