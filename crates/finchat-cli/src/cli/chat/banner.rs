//! Welcome banner display for chat sessions.

use std::io::{self, Write};

use console::style;

/// Write the welcome banner at the start of a chat session.
///
/// Shows the service address, the products the chat is scoped to, and the
/// short session id.
pub fn print_welcome_banner(
    out: &mut impl Write,
    base_url: &str,
    context_ids: &[i64],
    session_id: &str,
) -> io::Result<()> {
    let products = if context_ids.is_empty() {
        "none".to_string()
    } else {
        context_ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };

    writeln!(out)?;
    writeln!(out, "  * {}", style("finchat assistant").cyan().bold())?;
    writeln!(
        out,
        "  {}",
        style("Questions about your recommended products").dim()
    )?;
    writeln!(out)?;
    writeln!(out, "  {}  {}", style("Service:").bold(), style(base_url).dim())?;
    writeln!(out, "  {} {}", style("Products:").bold(), style(products).dim())?;
    writeln!(
        out,
        "  {}  {}",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    )?;
    writeln!(out, "  {}", style("---").dim())?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_lists_products_and_short_session_id() {
        let mut out = Vec::new();
        print_welcome_banner(
            &mut out,
            "http://localhost:8080",
            &[4, 7],
            "0192f3c4-aaaa-7bbb-8ccc-123456789abc",
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("4, 7"));
        assert!(text.contains("0192f3c4"));
        assert!(!text.contains("aaaa"));
    }

    #[test]
    fn test_banner_without_products() {
        let mut out = Vec::new();
        print_welcome_banner(&mut out, "http://localhost:8080", &[], "abc").unwrap();
        assert!(String::from_utf8(out).unwrap().contains("none"));
    }
}
