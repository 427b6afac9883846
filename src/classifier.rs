//! Package name classification.
//!
//! Decides whether a raw import reference names an installable third-party
//! package and, if so, reduces it to the key used in `dependencies`
//! (`@scope/name` for scoped packages, the first path segment otherwise).
//!
//! Two policies are available. [`Policy::Strict`] rejects Node.js built-ins,
//! protocol and path prefixes, templated strings, and anything that does not
//! look like a publishable npm name. [`Policy::LocalPrefix`] only rejects
//! references that start with a local path prefix.

use clap::ValueEnum;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Classification policy applied to every raw reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// Built-in aware filter with npm name validation.
    #[default]
    Strict,
    /// Treat everything not starting with `.`, `/`, `@/` or `~/` as external.
    LocalPrefix,
}

/// Node.js core modules. Subpaths such as `fs/promises` are covered by
/// checking the first path segment.
pub const NODE_BUILTINS: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

const SENTINELS: &[&str] = &[".", "..", "..."];

// `http` also matches `http-errors`, `https-proxy-agent`, ... and is kept as is.
const REJECTED_PREFIXES: &[&str] = &["node:", "./", "../", "/", "#", "file:", "data:", "http"];

const TEMPLATE_PREFIXES: &[&str] = &["$", "{{", "<%"];

const PRIVATE_PREFIX: &str = "_";

const LOCAL_PREFIXES: &[&str] = &[".", "/", "@/", "~/"];

static PACKAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:@[\w-]+/)?[a-z0-9][a-z0-9._-]*$").unwrap());

/// Returns the canonical package name for `raw` if it names an external package.
pub fn classify(raw: &str, policy: Policy) -> Option<String> {
    match policy {
        Policy::Strict => classify_strict(raw),
        Policy::LocalPrefix => classify_local_prefix(raw),
    }
}

/// Reduces a reference to its package name.
///
/// `@scope/pkg/sub/path` becomes `@scope/pkg`, `lodash/fp/map` becomes `lodash`.
/// A lone `@scope` without a slash is returned unchanged.
pub fn canonical_name(raw: &str) -> &str {
    let mut slashes = raw.match_indices('/').map(|(i, _)| i);
    let end = if raw.starts_with('@') {
        slashes.nth(1)
    } else {
        slashes.next()
    };
    match end {
        Some(i) => &raw[..i],
        None => raw,
    }
}

/// Whether `name` (or its first path segment) is a Node.js core module.
pub fn is_builtin(name: &str) -> bool {
    let head = name.split('/').next().unwrap_or(name);
    NODE_BUILTINS.contains(&head)
}

fn classify_strict(raw: &str) -> Option<String> {
    if is_builtin(raw) {
        return None;
    }
    if SENTINELS.contains(&raw) {
        return None;
    }
    if REJECTED_PREFIXES.iter().any(|p| raw.starts_with(p)) {
        return None;
    }
    if raw.is_empty()
        || TEMPLATE_PREFIXES.iter().any(|p| raw.starts_with(p))
        || raw.starts_with(PRIVATE_PREFIX)
    {
        return None;
    }

    let name = canonical_name(raw);
    if PACKAGE_NAME.is_match(name) {
        Some(name.to_string())
    } else {
        None
    }
}

fn classify_local_prefix(raw: &str) -> Option<String> {
    if LOCAL_PREFIXES.iter().any(|p| raw.starts_with(p)) {
        None
    } else {
        Some(canonical_name(raw).to_string())
    }
}
