use std::process::{Command, Stdio};

use url::Url;

pub(crate) fn parse_openable_url(raw_url: &str) -> Result<Url, String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err("Missing external URL.".to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|error| format!("Invalid URL: {error}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(format!(
            "Unsupported URL scheme '{scheme}', only http/https are allowed."
        )),
    }
}

/// Program and leading arguments of the OS URL handler.
#[cfg(target_os = "macos")]
const SYSTEM_OPENER: Option<(&str, &[&str])> = Some(("open", &[]));
#[cfg(target_os = "windows")]
const SYSTEM_OPENER: Option<(&str, &[&str])> =
    Some(("rundll32", &["url.dll,FileProtocolHandler"]));
#[cfg(all(unix, not(target_os = "macos")))]
const SYSTEM_OPENER: Option<(&str, &[&str])> = Some(("xdg-open", &[]));
#[cfg(not(any(target_os = "macos", target_os = "windows", unix)))]
const SYSTEM_OPENER: Option<(&str, &[&str])> = None;

fn opener_command(url: &Url) -> Result<Command, String> {
    let (program, leading_args) = SYSTEM_OPENER
        .ok_or_else(|| "Opening external URLs is not supported on this platform.".to_string())?;
    let mut command = Command::new(program);
    command
        .args(leading_args)
        .arg(url.as_str())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    Ok(command)
}

fn open_url_with_system_browser(url: &Url) -> Result<(), String> {
    let mut command = opener_command(url)?;
    command
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run {:?}: {error}", command.get_program()))
}

/// Hands an http/https URL to the OS default handler; other schemes are refused.
pub fn open_external<F>(raw_url: &str, log: F)
where
    F: Fn(&str),
{
    let result = parse_openable_url(raw_url)
        .and_then(|parsed| open_url_with_system_browser(&parsed));
    if let Err(error) = result {
        log(&format!("failed to open external url {raw_url}: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_openable_url_accepts_http_and_https() {
        assert!(parse_openable_url(" https://example.com/help ").is_ok());
        assert!(parse_openable_url("http://example.com").is_ok());
    }

    #[test]
    fn parse_openable_url_rejects_other_schemes_and_blank_input() {
        assert_eq!(
            parse_openable_url("   "),
            Err("Missing external URL.".to_string())
        );
        assert!(parse_openable_url("file:///etc/passwd")
            .unwrap_err()
            .contains("Unsupported URL scheme 'file'"));
        assert!(parse_openable_url("not a url")
            .unwrap_err()
            .starts_with("Invalid URL"));
    }

    #[cfg(unix)]
    #[test]
    fn opener_command_passes_the_url_last() {
        let url = Url::parse("https://example.com/docs?page=2").unwrap();
        let command = opener_command(&url).expect("unix has an opener");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args.last().copied(), Some(std::ffi::OsStr::new(url.as_str())));
        assert!(matches!(
            command.get_program().to_str(),
            Some("open") | Some("xdg-open")
        ));
    }
}
