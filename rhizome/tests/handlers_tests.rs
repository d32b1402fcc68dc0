use rhizome::handlers::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_parse_domain_line_bare_hostname() {
    assert_eq!(
        parse_domain_line("example.com"),
        Some("example.com".to_string())
    );
}

#[test]
fn test_parse_domain_line_with_scheme() {
    assert_eq!(
        parse_domain_line("https://example.com/some/path"),
        Some("example.com".to_string())
    );
}

#[test]
fn test_parse_domain_line_normalizes() {
    assert_eq!(
        parse_domain_line("  Mail.Example.COM.  "),
        Some("mail.example.com".to_string())
    );
}

#[test]
fn test_parse_domain_line_invalid() {
    assert_eq!(parse_domain_line("not a valid domain!!!"), None);
    assert_eq!(parse_domain_line(""), None);
    assert_eq!(parse_domain_line("   "), None);
}

#[test]
fn test_load_wordlist() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "www")?;
    writeln!(temp_file, "# internal hosts")?;
    writeln!(temp_file, "  grafana  ")?;
    writeln!(temp_file)?; // Empty line
    writeln!(temp_file, "jenkins")?;

    let prefixes = load_wordlist(temp_file.path())?;

    assert_eq!(prefixes, vec!["www", "grafana", "jenkins"]);

    Ok(())
}

#[test]
fn test_load_wordlist_empty() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file).unwrap();
    writeln!(temp_file, "   ").unwrap();
    writeln!(temp_file, "# only comments").unwrap();

    let result = load_wordlist(temp_file.path());

    assert!(result.is_err());
    assert!(result.unwrap_err().contains("No prefixes"));
}

#[test]
fn test_load_wordlist_missing_file() {
    let result = load_wordlist(std::path::Path::new("/nonexistent/wordlist.txt"));
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Failed to read"));
}
