// src/session/command.rs
use crate::domain::errors::{SessionError, SessionResult};
use crate::domain::models::PaymentMethod;
use crate::session::controller::{KitChoice, SessionEvent};

pub const HELP: &str = "\
Comandos:
  buscar <termo>          filtra os kits pela descrição
  kit <descrição|n>       escolhe um kit da lista
  cliente <nome>          nome do cliente na proposta
  pagamento avista|cartao forma de pagamento
  desconto <n>            desconto em % (máx. 12 à vista, 5 no cartão)
  mostrar                 mostra a simulação atual
  pdf                     gera a proposta em PDF
  ajuda                   esta mensagem
  sair                    encerra";

/// A line typed at the session prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(SessionEvent),
    Show,
    Export,
    Help,
    Quit,
}

/// Parse one input line; blank lines yield `None`
pub fn parse_command(line: &str) -> SessionResult<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "buscar" | "busca" | "search" => Command::Event(SessionEvent::Search(rest.to_string())),
        "kit" | "select" => {
            if rest.is_empty() {
                return Err(SessionError::InvalidCommand("kit needs a number or description".into()));
            }
            // Resolved by the session: exact description first, then position
            Command::Event(SessionEvent::SelectKit(KitChoice::Entered(rest.to_string())))
        }
        "cliente" | "client" => Command::Event(SessionEvent::SetClientName(rest.to_string())),
        "pagamento" | "payment" => {
            let method = rest
                .parse::<PaymentMethod>()
                .map_err(SessionError::InvalidCommand)?;
            Command::Event(SessionEvent::SetPaymentMethod(method))
        }
        "desconto" | "discount" => {
            let percent = rest
                .trim_end_matches('%')
                .parse::<u32>()
                .map_err(|_| SessionError::InvalidCommand(format!("invalid discount: '{}'", rest)))?;
            // Out-of-range values are clamped by the session, not rejected here
            let percent = u8::try_from(percent).unwrap_or(u8::MAX);
            Command::Event(SessionEvent::SetDiscount(percent))
        }
        "mostrar" | "show" => Command::Show,
        "pdf" | "export" => Command::Export,
        "ajuda" | "help" | "?" => Command::Help,
        "sair" | "quit" | "exit" => Command::Quit,
        other => return Err(SessionError::InvalidCommand(format!("unknown command '{}'", other))),
    };

    Ok(Some(command))
}
