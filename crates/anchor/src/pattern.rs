use crate::error::{AnchorFailure, Result};
use regex::{Regex, RegexBuilder};

/// Gap allowed between adjacent quote tokens: any run of punctuation,
/// whitespace, or line breaks, matched lazily so the tightest bridging span
/// wins when several candidates satisfy the token order.
const TOKEN_BRIDGE: &str = r"[\W\s]*?";

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Splits a quote into its word tokens, discarding the literal whitespace
/// and punctuation between them.
pub fn tokenize(quote: &str) -> Vec<String> {
    quote
        .split(|ch: char| !is_word_char(ch))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds the tolerant, case-insensitive search pattern for an ordered token
/// sequence. Each token is matched literally; tokens must appear in order,
/// contiguous modulo intervening non-word characters.
pub fn build_pattern(tokens: &[String]) -> Result<Regex> {
    if tokens.is_empty() {
        return Err(AnchorFailure::NoTokens);
    }
    let pattern = tokens
        .iter()
        .map(|token| regex::escape(token))
        .collect::<Vec<_>>()
        .join(TOKEN_BRIDGE);
    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()?;
    Ok(regex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tokenize_splits_on_punctuation_runs() {
        assert_eq!(
            tokenize("at our sole discretion, terminate"),
            vec!["at", "our", "sole", "discretion", "terminate"]
        );
    }

    #[test]
    fn tokenize_drops_empty_tokens() {
        assert_eq!(tokenize("  ...hello---world!! "), vec!["hello", "world"]);
        assert_eq!(tokenize("?!?!"), Vec::<String>::new());
    }

    #[test]
    fn tokenize_keeps_underscores_and_digits() {
        assert_eq!(tokenize("user_id 42"), vec!["user_id", "42"]);
    }

    #[test]
    fn build_pattern_rejects_empty_token_list() {
        assert!(matches!(
            build_pattern(&[]),
            Err(AnchorFailure::NoTokens)
        ));
    }

    #[test]
    fn pattern_bridges_whitespace_and_line_breaks() {
        let tokens = tokenize("sole discretion terminate");
        let regex = build_pattern(&tokens).expect("compiles");
        let text = "at our sole discretion,\nterminate your account.";
        let m = regex.find(text).expect("matches across the line break");
        assert_eq!(m.as_str(), "sole discretion,\nterminate");
    }

    #[test]
    fn pattern_is_case_insensitive() {
        let regex = build_pattern(&tokenize("Hello World")).expect("compiles");
        assert!(regex.is_match("hello world"));
        assert!(regex.is_match("HELLO, WORLD"));
    }

    #[test]
    fn pattern_escapes_regex_metacharacters() {
        let regex = build_pattern(&tokenize("a+b (c)")).expect("compiles");
        // Tokens are "a", "b", "c"; the metacharacters live in the gaps.
        assert!(regex.is_match("a + b (c)"));
        assert!(!regex.is_match("x y z"));
    }

    #[test]
    fn bridge_never_swallows_intervening_words() {
        let regex = build_pattern(&tokenize("data shared")).expect("compiles");
        // "may be" contains word characters; the bridge must not cross it.
        assert!(!regex.is_match("data may be shared"));
        assert!(regex.is_match("data... shared"));
    }
}
