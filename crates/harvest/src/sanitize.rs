//! Certificate titles as filesystem-safe filenames.

/// Name used when a certificate title is empty or sanitizes to nothing.
pub const FALLBACK_NAME: &str = "certificado_sem_nome";

/// Characters that are illegal in filenames on at least one supported
/// platform.
const ILLEGAL: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Turn a certificate title into a filesystem-safe filename stem.
///
/// Strips illegal characters, collapses whitespace runs to a single space and
/// trims the ends. Falls back to [`FALLBACK_NAME`] when nothing remains.
/// Idempotent: sanitizing a sanitized title is a no-op.
pub fn sanitize_title(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !ILLEGAL.contains(c)).collect();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_every_illegal_character() {
        assert_eq!(sanitize_title(r#"a\b/c*d?e:f"g<h>i|j"#), "abcdefghij");
    }

    #[test]
    fn collapses_and_trims_whitespace() {
        assert_eq!(sanitize_title("  a   b \t c  "), "a b c");
    }

    #[test]
    fn empty_input_yields_fallback() {
        assert_eq!(sanitize_title(""), FALLBACK_NAME);
    }

    #[test]
    fn input_of_only_illegal_chars_yields_fallback() {
        assert_eq!(sanitize_title(r#"///***:::"#), FALLBACK_NAME);
        assert_eq!(sanitize_title("   \t  "), FALLBACK_NAME);
    }

    #[test]
    fn is_idempotent() {
        for raw in [
            "  Certificado:  C++ Avançado?  ",
            r#"a\b/c"#,
            "",
            "já limpo",
        ] {
            let once = sanitize_title(raw);
            assert_eq!(sanitize_title(&once), once);
        }
    }

    #[test]
    fn realistic_title() {
        assert_eq!(
            sanitize_title("  Certificado:  C++ Avançado?  "),
            "Certificado C++ Avançado"
        );
    }

    #[test]
    fn slash_is_removed_not_replaced() {
        // "C/C++" loses the slash character itself; the surrounding letters
        // are kept and not re-spaced.
        assert_eq!(sanitize_title("Curso C/C++"), "Curso CC++");
    }

    #[test]
    fn preserves_unicode() {
        assert_eq!(sanitize_title("Introdução à Programação"), "Introdução à Programação");
    }
}
