//! Rewriting `scheme://` invocations into ordinary argument vectors.
//!
//! An application registered as a URL handler is started with the whole URL
//! as its only argument. When the scheme is one the application accepts,
//! `app://open/report.pdf?readonly=true#top` becomes
//!
//! ```text
//! open  report.pdf  --readonly=true  --fragment  top
//! ```
//!
//! which is then parsed under `StyleProfile::URL`.

use std::borrow::Cow;

use log::debug;
use percent_encoding::percent_decode_str;
use url::Url;

use crate::utils::cap_or_empty;

decl_regex! {
    URL_INVOCATION: r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*)://";
}

/// An argument vector rewritten from a URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedUrl {
    /// The scheme, lowercased.
    pub scheme: String,
    pub args:   Vec<String>,
}

/// Rewrites `args` if it is exactly one `scheme://` URL whose scheme is in
/// `schemes` (compared case-insensitively). Returns `None` otherwise, in
/// which case `args` should be parsed as they are.
///
/// The authority and the path segments become positionals, in order. A
/// URL with a segment that decodes to something starting with `-` is not
/// rewritten, since the segment would be read as an option.
pub fn normalize<S: AsRef<str>>(args: &[S], schemes: &[String]) -> Option<NormalizedUrl> {
    let [arg] = args else {
        return None;
    };
    let arg = arg.as_ref();
    let caps = URL_INVOCATION.captures(arg)?;
    let scheme = cap_or_empty(&caps, "scheme");
    if !schemes.iter().any(|s| s.eq_ignore_ascii_case(scheme)) {
        debug!("'{scheme}' is not a registered URL scheme");
        return None;
    }
    let url = match Url::parse(arg) {
        Ok(url) => url,
        Err(e) => {
            debug!("'{arg}' looks like a URL but does not parse: {e}");
            return None;
        }
    };

    let mut out: Vec<String> = url
        .host_str()
        .into_iter()
        .chain(url.path_segments().into_iter().flatten())
        .filter(|seg| !seg.is_empty())
        .map(|seg| decode(seg).into_owned())
        .collect();
    if let Some(seg) = out.iter().find(|seg| seg.starts_with('-')) {
        debug!("'{arg}' has the path segment '{seg}', which reads as an option");
        return None;
    }
    // Not `query_pairs`: a key without `=` must stay distinguishable.
    for pair in url.query().into_iter().flat_map(|q| q.split('&')) {
        if pair.is_empty() {
            continue;
        }
        match pair.split_once('=') {
            Some((key, value)) => out.push(format!("--{}={}", decode(key), decode(value))),
            None => out.push(format!("--{}", decode(pair))),
        }
    }
    if let Some(fragment) = url.fragment().filter(|f| !f.is_empty()) {
        out.push("--fragment".to_string());
        out.push(decode(fragment).into_owned());
    }

    debug!("rewrote {arg} to {out:?}");
    Some(NormalizedUrl {
        scheme: url.scheme().to_string(),
        args:   out,
    })
}

/// Percent-decodes one URL component. Invalid UTF-8 is replaced.
pub fn decode(s: &str) -> Cow<'_, str> {
    percent_decode_str(s).decode_utf8_lossy()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schemes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn path_and_query() {
        let n = normalize(&["app://open/report.pdf?readonly=true"], &schemes(&["app"])).unwrap();
        assert_eq!(n.scheme, "app");
        assert_eq!(n.args, ["open", "report.pdf", "--readonly=true"]);
    }

    #[test]
    fn fragment_and_key_only_query() {
        let n = normalize(&["App://show?verbose&&page=2#Section%201"], &schemes(&["app"])).unwrap();
        assert_eq!(n.scheme, "app");
        assert_eq!(n.args, ["show", "--verbose", "--page=2", "--fragment", "Section 1"]);
    }

    #[test]
    fn percent_decoding() {
        let n = normalize(&["app://open/My%20File.txt?name=a%26b"], &schemes(&["app"])).unwrap();
        assert_eq!(n.args, ["open", "My File.txt", "--name=a&b"]);
    }

    #[test]
    fn not_a_url_invocation() {
        let registered = schemes(&["app"]);
        assert!(normalize(&["https://example.com"], &registered).is_none());
        assert!(normalize(&["app://a", "b"], &registered).is_none());
        assert!(normalize(&["app:/a"], &registered).is_none());
        assert!(normalize(&["app://bad host/x"], &registered).is_none());
        assert!(normalize::<&str>(&[], &registered).is_none());
        assert!(normalize(&["app://a"], &[]).is_none());
    }

    #[test]
    fn dash_segments_are_not_rewritten() {
        let registered = schemes(&["app"]);
        assert!(normalize(&["app://open/-draft.pdf"], &registered).is_none());
        assert!(normalize(&["app://open/%2D%2Dverbose"], &registered).is_none());
        assert!(normalize(&["app://-x/report.pdf"], &registered).is_none());

        let n = normalize(&["app://open/draft-1.pdf?x=-1"], &registered).unwrap();
        assert_eq!(n.args, ["open", "draft-1.pdf", "--x=-1"]);
    }
}
