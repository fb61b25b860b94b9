// src/session/render.rs
use crate::pricing::format::format_currency;
use crate::proposal::message::SHIPPING_NOTE;
use crate::session::controller::{QuoteView, SessionView};

pub const NOT_FOUND_WARNING: &str = "Nenhum modelo encontrado com esse termo.";

/// Terminal rendering of a session view
pub fn render_view(view: &SessionView) -> String {
    match view {
        SessionView::NotFound { .. } => format!("⚠ {}", NOT_FOUND_WARNING),
        SessionView::Quote(quote) => render_quote(quote),
    }
}

fn render_quote(view: &QuoteView) -> String {
    let quote = &view.quote;
    let selection = &view.selection;
    let mut lines = vec!["Kits encontrados:".to_string()];

    for (i, description) in view.matches.iter().enumerate() {
        let marker = if *description == view.entry.description { '>' } else { ' ' };
        lines.push(format!(" {} {}. {}", marker, i + 1, description));
    }
    lines.push(format!("📦 Kit selecionado: {}", view.entry.description));
    if let Some(client) = &view.client_name {
        lines.push(format!("Cliente: {}", client));
    }

    lines.push(String::new());
    lines.push("🔍 Resultado da Simulação".to_string());
    lines.push(format!("💰 Valor à Vista: {}", format_currency(quote.cash_price)));
    lines.push(format!(
        "Forma de Pagamento: {} | Desconto: {}% (máx. {}%)",
        selection.method,
        selection.discount_percent,
        selection.method.max_discount()
    ));
    lines.push(format!("💲 Com Desconto: {}", format_currency(quote.discounted_price)));
    lines.push(format!(
        "📐 Estimativa Média de Casa Pronta: {}",
        format_currency(quote.turn_key_estimate)
    ));
    lines.push(format!(
        "🚚 Frete Estimado: {} {}",
        format_currency(quote.shipping_estimate),
        SHIPPING_NOTE
    ));
    lines.push(format!(
        "💵 Valor Total com Frete: {} + {} = {}",
        format_currency(quote.discounted_price),
        format_currency(quote.shipping_estimate),
        format_currency(quote.total_with_shipping)
    ));
    if let Some(days) = quote.assembly_days_estimate {
        lines.push(format!("🕒 Estimativa montagem: {} dias", days));
    }

    lines.push(String::new());
    lines.push(format!("🔗 VER MODELO ONLINE: {}", view.entry.model_link));
    lines.push(format!("📲 Enviar via WhatsApp: {}", view.whatsapp_link));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::lookup::Catalog;
    use crate::domain::models::CatalogEntry;
    use crate::session::controller::{SessionController, SessionEvent, SessionSettings};
    use rust_decimal_macros::dec;

    fn session() -> SessionController {
        let catalog = Catalog::new(vec![
            CatalogEntry::new("Chalé 36m²", dec!(50000), dec!(3000), "https://example.com/chale")
                .with_area(dec!(36)),
            CatalogEntry::new("Chalé 20m²", dec!(30000), dec!(1500), "https://example.com/chale20"),
        ]);
        SessionController::new(catalog, None, SessionSettings::default())
    }

    #[test]
    fn renders_the_results_panel() {
        let mut session = session();
        session.handle(SessionEvent::Search("chalé".into())).expect("view");
        let view = session.handle(SessionEvent::SetDiscount(10)).expect("view");
        let text = render_view(&view);

        assert!(text.contains(" > 1. Chalé 36m²"));
        assert!(text.contains("   2. Chalé 20m²"));
        assert!(text.contains("💲 Com Desconto: R$ 45.000,00"));
        assert!(text.contains("🚚 Frete Estimado: R$ 3.450,00 (pago direto à transportadora)"));
        assert!(text.contains("R$ 45.000,00 + R$ 3.450,00 = R$ 48.450,00"));
        assert!(text.contains("🕒 Estimativa montagem: 3 dias"));
        assert!(text.contains("📲 Enviar via WhatsApp: https://wa.me/?text=Kit:%20Chal"));
    }

    #[test]
    fn panel_lines_are_in_order_with_blank_separators() {
        let mut session = session();
        let view = session.handle(SessionEvent::Search("36m²".into())).expect("view");
        let text = render_view(&view);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Kits encontrados:");
        assert_eq!(lines[1], " > 1. Chalé 36m²");
        assert_eq!(lines[2], "📦 Kit selecionado: Chalé 36m²");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "🔍 Resultado da Simulação");
        assert_eq!(lines[5], "💰 Valor à Vista: R$ 50.000,00");
        assert_eq!(lines[6], "Forma de Pagamento: À Vista | Desconto: 0% (máx. 12%)");
        assert_eq!(lines[lines.len() - 2], "🔗 VER MODELO ONLINE: https://example.com/chale");
        assert!(lines[lines.len() - 1].starts_with("📲 Enviar via WhatsApp: "));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn assembly_line_is_omitted_without_area() {
        let mut session = session();
        let view = session.handle(SessionEvent::Search("20m²".into())).expect("view");
        assert!(!render_view(&view).contains("Estimativa montagem"));
    }

    #[test]
    fn not_found_renders_a_warning() {
        let mut session = session();
        let view = session.handle(SessionEvent::Search("iglu".into())).expect("view");
        assert_eq!(render_view(&view), "⚠ Nenhum modelo encontrado com esse termo.");
    }
}
