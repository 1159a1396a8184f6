use std::{borrow::Cow, collections::HashSet, sync::OnceLock};

use tauri::http::{
    header::{self, HeaderValue},
    Request, Response, StatusCode,
};
use url::Url;

use crate::{
    ASSET_SCHEME, ASSET_SCHEME_HTTP_HOST, CONTENT_SECURITY_POLICY, DEV_ALLOWED_HOSTS,
    DEV_SERVER_HOST,
};

const LOCAL_SCHEMES: [&str; 3] = ["file", "data", "blob"];
const DEV_NETWORK_SCHEMES: [&str; 4] = ["http", "https", "ws", "wss"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    OpenExternal(Url),
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDecision {
    Allow,
    Cancel,
}

fn dev_allowed_hosts() -> &'static HashSet<&'static str> {
    static HOSTS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    HOSTS.get_or_init(|| DEV_ALLOWED_HOSTS.into_iter().collect())
}

/// `host[:port]`, with the port omitted when it is the scheme default.
pub(crate) fn host_with_port(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn is_external_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// The packaged front end's own origin. Windows webviews expose custom schemes as
/// `http(s)://<scheme>.localhost`.
pub(crate) fn is_app_asset_url(url: &Url) -> bool {
    url.scheme() == ASSET_SCHEME
        || (is_external_http(url) && url.host_str() == Some(ASSET_SCHEME_HTTP_HOST))
}

fn is_local_content(url: &Url) -> bool {
    LOCAL_SCHEMES.contains(&url.scheme()) || is_app_asset_url(url)
}

pub fn decide_navigation(raw_url: &str, dev_mode: bool) -> NavigationDecision {
    let Ok(parsed) = Url::parse(raw_url) else {
        return NavigationDecision::Block;
    };

    if is_app_asset_url(&parsed) {
        return NavigationDecision::Allow;
    }

    if is_external_http(&parsed) {
        let is_allowed_dev =
            dev_mode && host_with_port(&parsed).as_deref() == Some(DEV_SERVER_HOST);
        if is_allowed_dev {
            return NavigationDecision::Allow;
        }
        return NavigationDecision::OpenExternal(parsed);
    }

    if parsed.scheme() == "file" {
        NavigationDecision::Allow
    } else {
        NavigationDecision::Block
    }
}

pub fn decide_request(raw_url: &str, dev_mode: bool) -> RequestDecision {
    let Ok(parsed) = Url::parse(raw_url) else {
        return RequestDecision::Cancel;
    };

    if is_local_content(&parsed) {
        return RequestDecision::Allow;
    }

    if dev_mode && DEV_NETWORK_SCHEMES.contains(&parsed.scheme()) {
        let allowed = host_with_port(&parsed)
            .map(|host| dev_allowed_hosts().contains(host.as_str()))
            .unwrap_or(false);
        if allowed {
            return RequestDecision::Allow;
        }
    }

    RequestDecision::Cancel
}

pub fn content_security_policy() -> String {
    CONTENT_SECURITY_POLICY.join("; ")
}

/// Policy that pins the dev server page to the development allow-list.
pub fn dev_content_security_policy() -> String {
    let network_sources = DEV_ALLOWED_HOSTS
        .iter()
        .flat_map(|host| {
            DEV_NETWORK_SCHEMES
                .iter()
                .map(move |scheme| format!("{scheme}://{host}"))
        })
        .collect::<Vec<_>>()
        .join(" ");

    [
        format!("default-src 'self' data: blob: {network_sources}"),
        format!("script-src 'self' 'unsafe-inline' 'unsafe-eval' {network_sources}"),
        format!("style-src 'self' 'unsafe-inline' {network_sources}"),
        "object-src 'none'".to_string(),
    ]
    .join("; ")
}

const DEV_POLICY_SCRIPT_TEMPLATE: &str = r#"(() => {
  const meta = document.createElement("meta");
  meta.httpEquiv = "Content-Security-Policy";
  meta.content = __POLICY__;
  const insert = () => {
    const root = document.head || document.documentElement;
    if (!root) return false;
    root.prepend(meta);
    return true;
  };
  if (!insert()) {
    new MutationObserver((_, observer) => {
      if (insert()) observer.disconnect();
    }).observe(document, { childList: true, subtree: true });
  }
})();
"#;

/// The dev server page is not served by the host, so its policy is declared from inside the page.
pub fn dev_policy_script() -> String {
    let policy_json = serde_json::to_string(&dev_content_security_policy())
        .unwrap_or_else(|_| "\"default-src 'self'\"".to_string());
    DEV_POLICY_SCRIPT_TEMPLATE.replace("__POLICY__", &policy_json)
}

/// Applies the request guard and, outside development mode, the CSP header.
pub fn apply_resource_policy(
    request: &Request<Vec<u8>>,
    response: &mut Response<Cow<'static, [u8]>>,
    dev_mode: bool,
) -> RequestDecision {
    let decision = decide_request(&request.uri().to_string(), dev_mode);
    if decision == RequestDecision::Cancel {
        *response.status_mut() = StatusCode::FORBIDDEN;
        *response.body_mut() = Cow::Borrowed(&[]);
    }

    if !dev_mode {
        if let Ok(value) = HeaderValue::from_str(&content_security_policy()) {
            response.headers_mut().insert(header::CONTENT_SECURITY_POLICY, value);
        }
    }

    decision
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_blocks_unparseable_urls() {
        for raw in ["", "not a url", "://missing-scheme", "http://[::1"] {
            assert_eq!(decide_navigation(raw, false), NavigationDecision::Block);
            assert_eq!(decide_navigation(raw, true), NavigationDecision::Block);
        }
    }

    #[test]
    fn navigation_hands_external_http_to_os_handler() {
        let decision = decide_navigation("https://example.com/docs", false);
        assert_eq!(
            decision,
            NavigationDecision::OpenExternal(Url::parse("https://example.com/docs").unwrap())
        );
    }

    #[test]
    fn navigation_allows_dev_server_only_in_dev_mode() {
        assert_eq!(
            decide_navigation("http://localhost:5175/trades", true),
            NavigationDecision::Allow
        );
        assert!(matches!(
            decide_navigation("http://localhost:5175/trades", false),
            NavigationDecision::OpenExternal(_)
        ));
        assert!(matches!(
            decide_navigation("http://localhost:3000/", true),
            NavigationDecision::OpenExternal(_)
        ));
    }

    #[test]
    fn navigation_allows_local_files_and_blocks_other_schemes() {
        assert_eq!(
            decide_navigation("file:///opt/app/dist/index.html", false),
            NavigationDecision::Allow
        );
        assert_eq!(
            decide_navigation("javascript:alert(1)", false),
            NavigationDecision::Block
        );
        assert_eq!(
            decide_navigation("data:text/html,hi", true),
            NavigationDecision::Block
        );
        assert_eq!(
            decide_navigation("ftp://example.com/file", false),
            NavigationDecision::Block
        );
    }

    #[test]
    fn navigation_and_requests_allow_the_app_asset_origin() {
        for raw in [
            "metrixsight://localhost/index.html",
            "http://metrixsight.localhost/assets/app.js",
        ] {
            assert_eq!(decide_navigation(raw, false), NavigationDecision::Allow, "{raw}");
            assert_eq!(decide_request(raw, false), RequestDecision::Allow, "{raw}");
        }
        assert!(matches!(
            decide_navigation("http://metrixsight.example.com/", false),
            NavigationDecision::OpenExternal(_)
        ));
        assert_eq!(
            decide_request("http://evil.localhost/", false),
            RequestDecision::Cancel
        );
    }

    #[test]
    fn dev_policy_lists_only_allow_listed_hosts() {
        let policy = dev_content_security_policy();
        for host in DEV_ALLOWED_HOSTS {
            for scheme in DEV_NETWORK_SCHEMES {
                assert!(policy.contains(&format!("{scheme}://{host}")), "{scheme}://{host}");
            }
        }
        assert!(!policy.contains('*'));
        assert!(policy.contains("object-src 'none'"));

        let script = dev_policy_script();
        assert!(script.contains("Content-Security-Policy"));
        assert!(!script.contains("__POLICY__"));
    }

    #[test]
    fn request_always_allows_local_schemes() {
        for raw in [
            "file:///opt/app/dist/app.js",
            "data:image/png;base64,AAAA",
            "blob:https://example.com/1234",
        ] {
            assert_eq!(decide_request(raw, false), RequestDecision::Allow);
            assert_eq!(decide_request(raw, true), RequestDecision::Allow);
        }
    }

    #[test]
    fn request_cancels_everything_else_outside_dev_mode() {
        for raw in [
            "http://localhost:5175/",
            "https://fonts.googleapis.com/css",
            "wss://fonts.gstatic.com/socket",
            "ftp://example.com/",
            "tauri://localhost/index.html",
            "not a url",
        ] {
            assert_eq!(decide_request(raw, false), RequestDecision::Cancel, "{raw}");
        }
    }

    #[test]
    fn request_in_dev_mode_allows_only_listed_hosts_on_network_schemes() {
        assert_eq!(
            decide_request("http://localhost:5175/src/main.tsx", true),
            RequestDecision::Allow
        );
        assert_eq!(
            decide_request("ws://localhost:5175/", true),
            RequestDecision::Allow
        );
        assert_eq!(
            decide_request("https://fonts.gstatic.com/s/inter.woff2", true),
            RequestDecision::Allow
        );
        assert_eq!(
            decide_request("https://fonts.googleapis.com:443/css", true),
            RequestDecision::Allow
        );
        assert_eq!(
            decide_request("https://evil.example/", true),
            RequestDecision::Cancel
        );
        assert_eq!(
            decide_request("http://localhost:5176/", true),
            RequestDecision::Cancel
        );
        assert_eq!(
            decide_request("ftp://localhost:5175/", true),
            RequestDecision::Cancel
        );
    }

    #[test]
    fn host_with_port_omits_default_port() {
        let url = Url::parse("https://fonts.gstatic.com:443/x").unwrap();
        assert_eq!(host_with_port(&url).as_deref(), Some("fonts.gstatic.com"));
        let url = Url::parse("http://localhost:5175/").unwrap();
        assert_eq!(host_with_port(&url).as_deref(), Some("localhost:5175"));
    }

    #[test]
    fn content_security_policy_restricts_fonts_and_framing() {
        let csp = content_security_policy();
        assert!(csp.starts_with("default-src 'self'; script-src 'self';"));
        assert!(csp.contains("font-src 'self' https://fonts.gstatic.com"));
        assert!(csp.contains("style-src 'self' 'unsafe-inline' https://fonts.googleapis.com"));
        assert!(csp.contains("object-src 'none'"));
        assert!(csp.ends_with("frame-ancestors 'none'"));
    }

    fn request_for(uri: &str) -> Request<Vec<u8>> {
        Request::builder().uri(uri).body(Vec::new()).unwrap()
    }

    #[test]
    fn apply_resource_policy_injects_csp_outside_dev_mode() {
        let request = request_for("https://fonts.googleapis.com/css");
        let mut response = Response::new(Cow::Borrowed(&b"body"[..]));

        let decision = apply_resource_policy(&request, &mut response, false);

        assert_eq!(decision, RequestDecision::Cancel);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.body().is_empty());
        assert_eq!(
            response.headers().get(header::CONTENT_SECURITY_POLICY).unwrap(),
            content_security_policy().as_str()
        );
    }

    #[test]
    fn apply_resource_policy_leaves_allowed_dev_responses_untouched() {
        let request = request_for("http://localhost:5175/src/main.tsx");
        let mut response = Response::new(Cow::Borrowed(&b"body"[..]));

        let decision = apply_resource_policy(&request, &mut response, true);

        assert_eq!(decision, RequestDecision::Allow);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(&response.body()[..], b"body");
        assert!(response.headers().get(header::CONTENT_SECURITY_POLICY).is_none());
    }
}
