use std::{
    borrow::Cow,
    fs, io,
    path::{Component, Path, PathBuf},
    sync::RwLock,
};

use tauri::http::{
    header::{HeaderValue, CONTENT_TYPE},
    Request, Response, StatusCode,
};
use url::Url;

use crate::{
    append_desktop_log, append_startup_log,
    load_recovery::{self, LoadOutcome},
    origin_policy::{self, RequestDecision},
    webui_paths::{self, AssetRoots},
    ASSET_SCHEME, ASSET_SCHEME_HTTP_HOST,
};

const INDEX_FILE: &str = "index.html";

/// Start URL of the packaged front end. Windows webviews reach custom schemes over http.
pub fn start_url() -> Result<Url, String> {
    let raw = if cfg!(windows) {
        format!("http://{ASSET_SCHEME_HTTP_HOST}/{INDEX_FILE}")
    } else {
        format!("{ASSET_SCHEME}://localhost/{INDEX_FILE}")
    };
    Url::parse(&raw).map_err(|error| format!("Invalid asset URL {raw}: {error}"))
}

/// Serves the packaged `dist` directory under the app-asset scheme.
pub struct AssetServer {
    roots: AssetRoots,
    dist_dir: RwLock<PathBuf>,
    dev_mode: bool,
}

impl AssetServer {
    pub fn new(roots: AssetRoots, index_path: &Path, dev_mode: bool) -> Self {
        let dist_dir = index_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| roots.app_dir.clone());
        Self {
            roots,
            dist_dir: RwLock::new(dist_dir),
            dev_mode,
        }
    }

    pub fn from_roots(roots: AssetRoots, dev_mode: bool) -> Self {
        let index_path = webui_paths::resolve_packaged_index(&roots, Path::is_file);
        Self::new(roots, &index_path, dev_mode)
    }

    pub fn dist_dir(&self) -> PathBuf {
        match self.dist_dir.read() {
            Ok(dir) => dir.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn switch_dist_dir(&self, dir: PathBuf) {
        match self.dist_dir.write() {
            Ok(mut current) => *current = dir,
            Err(poisoned) => *poisoned.into_inner() = dir,
        }
    }

    pub fn handle(&self, request: &Request<Vec<u8>>) -> Response<Cow<'static, [u8]>> {
        let mut response = match relative_asset_path(&request.uri().to_string()) {
            Some(relative) => self.load(&relative),
            None => plain_response(StatusCode::BAD_REQUEST),
        };

        if origin_policy::apply_resource_policy(request, &mut response, self.dev_mode)
            == RequestDecision::Cancel
        {
            append_desktop_log(&format!("cancelled asset request to {}", request.uri()));
        }
        response
    }

    fn load(&self, relative: &Path) -> Response<Cow<'static, [u8]>> {
        let path = self.dist_dir().join(relative);
        let mut read = fs::read(&path);

        if relative == Path::new(INDEX_FILE) {
            let outcome = LoadOutcome::from_read(&read);
            if let Some(index) =
                load_recovery::recovery_target(outcome, self.dev_mode, &self.roots, Path::is_file)
            {
                append_startup_log(&format!(
                    "{} is missing, serving {} instead",
                    path.display(),
                    index.display()
                ));
                read = fs::read(&index);
                if let Some(dir) = index.parent() {
                    self.switch_dist_dir(dir.to_path_buf());
                }
            }
        }

        match read {
            Ok(bytes) => {
                let mut response = Response::new(Cow::Owned(bytes));
                response.headers_mut().insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static(mime_from_extension(relative)),
                );
                response
            }
            Err(error) => {
                append_desktop_log(&format!("failed to read asset {}: {error}", path.display()));
                if error.kind() == io::ErrorKind::NotFound {
                    plain_response(StatusCode::NOT_FOUND)
                } else {
                    plain_response(StatusCode::INTERNAL_SERVER_ERROR)
                }
            }
        }
    }
}

fn plain_response(status: StatusCode) -> Response<Cow<'static, [u8]>> {
    let mut response = Response::new(Cow::Borrowed(&[][..]));
    *response.status_mut() = status;
    response
}

/// Maps a request URI onto a path inside the served directory; traversal yields `None`.
fn relative_asset_path(raw_uri: &str) -> Option<PathBuf> {
    let url = Url::parse(raw_uri).ok()?;
    let mut relative = PathBuf::new();
    for segment in url.path().split('/').filter(|segment| !segment.is_empty()) {
        let decoded = percent_encoding::percent_decode_str(segment)
            .decode_utf8()
            .ok()?;
        let mut components = Path::new(decoded.as_ref()).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => relative.push(part),
            _ => return None,
        }
    }

    if relative.as_os_str().is_empty() {
        relative.push(INDEX_FILE);
    }
    Some(relative)
}

fn mime_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|extension| extension.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "text/javascript",
        Some("json") | Some("map") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("wasm") => "application/wasm",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
