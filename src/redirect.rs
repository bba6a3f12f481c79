use url::Url;

const ROOT: &str = "/";

/// Where to send the visitor after a successful login.
///
/// Reads the `redirect` query parameter of the page URL. Missing, empty and
/// non-local targets all fall back to the application root.
pub fn resolve_redirect(page_url: &Url) -> String {
    page_url
        .query_pairs()
        .find(|(key, _)| *key == "redirect")
        .map(|(_, value)| value.into_owned())
        .filter(|target| is_local_path(target))
        .unwrap_or_else(|| ROOT.to_string())
}

/// True for `/path` style targets. Rejects scheme-relative (`//host`) and
/// backslash tricks browsers normalize into them.
pub fn is_local_path(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.starts_with("/\\")
        && !target.chars().any(char::is_control)
}

/// Query string suffix that carries `redirect` forward to another link.
pub fn redirect_query(target: Option<&str>) -> String {
    match target.filter(|t| !t.is_empty()) {
        Some(t) => format!("redirect={}", urlencoding::encode(t)),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(url: &str) -> String {
        resolve_redirect(&Url::parse(url).unwrap())
    }

    #[test]
    fn test_encoded_redirect_is_decoded() {
        assert_eq!(
            resolve("http://localhost/login?redirect=%2Fdashboard"),
            "/dashboard"
        );
    }

    #[test]
    fn test_missing_or_empty_redirect_goes_to_root() {
        assert_eq!(resolve("http://localhost/login"), "/");
        assert_eq!(resolve("http://localhost/login?redirect="), "/");
        assert_eq!(resolve("http://localhost/login?tab=registration"), "/");
    }

    #[test]
    fn test_redirect_keeps_nested_query() {
        assert_eq!(
            resolve("http://localhost/login?redirect=%2Fboards%3Fpage%3D2"),
            "/boards?page=2"
        );
    }

    #[test]
    fn test_offsite_redirects_are_refused() {
        assert_eq!(resolve("http://localhost/login?redirect=https%3A%2F%2Fevil.example"), "/");
        assert_eq!(resolve("http://localhost/login?redirect=%2F%2Fevil.example"), "/");
        assert_eq!(resolve("http://localhost/login?redirect=%2F%5Cevil.example"), "/");
        assert_eq!(resolve("http://localhost/login?redirect=dashboard"), "/");
    }

    #[test]
    fn test_redirect_query_encodes_target() {
        assert_eq!(redirect_query(Some("/a b")), "redirect=%2Fa%20b");
        assert_eq!(redirect_query(Some("")), "");
        assert_eq!(redirect_query(None), "");
    }
}
