// src/proposal/sanitize.rs

/// Keep only characters representable in Latin-1, silently dropping the rest
pub fn sanitize_latin1(text: &str) -> String {
    text.chars().filter(|c| u32::from(*c) <= 0xFF).collect()
}

/// Latin-1 bytes of the sanitized text, one byte per character
pub fn latin1_bytes(text: &str) -> Vec<u8> {
    sanitize_latin1(text)
        .chars()
        .filter_map(|c| u8::try_from(u32::from(c)).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keeps_accented_portuguese() {
        let text = "Valor à vista: R$ 1.000,00 (Cartão de Crédito) ção";
        assert_eq!(sanitize_latin1(text), text);
    }

    #[test]
    fn drops_emoji_and_wide_characters() {
        assert_eq!(sanitize_latin1("💵 Total com Frete"), " Total com Frete");
        assert_eq!(sanitize_latin1("Casa → pronta ✅"), "Casa  pronta ");
        assert_eq!(sanitize_latin1("🚚"), "");
    }

    #[test]
    fn latin1_bytes_are_single_byte_per_char() {
        assert_eq!(latin1_bytes("é²💵a"), vec![0xE9, 0xB2, b'a']);
    }
}
