// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-call encode state.
//!
//! A session is created at the entry of one top-level encode call and
//! dropped when it returns. Sessions are never shared between calls.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Default validity window of advertisement documents, in seconds.
pub const DEFAULT_VALID_FOR_SECS: i64 = 600;

/// Href prefix used by tree encoding when the caller gives none.
pub const DEFAULT_HREF_PREFIX: &str = "/resources";

/// Detail level revealing everything.
pub const MAX_DETAIL: u8 = 99;

/// Caller options for one encode call.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Prefix for dereference URLs. Markup carries `omf:href` only when set.
    pub href_prefix: Option<String>,
    /// Detail to reveal, 0 (min) ..= [`MAX_DETAIL`].
    pub detail: u8,
    /// Validity window of advertisement documents.
    pub valid_for: Duration,
    /// Pin the `generated` timestamp (defaults to now).
    pub generated_at: Option<DateTime<Utc>>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            href_prefix: None,
            detail: MAX_DETAIL,
            valid_for: Duration::seconds(DEFAULT_VALID_FOR_SECS),
            generated_at: None,
        }
    }
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn href_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.href_prefix = Some(prefix.into());
        self
    }

    pub fn detail(mut self, detail: u8) -> Self {
        self.detail = detail.min(MAX_DETAIL);
        self
    }

    pub fn valid_for(mut self, window: Duration) -> Self {
        self.valid_for = window;
        self
    }

    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }
}

/// Markup-mode session: identity -> emitted id, plus nesting depth.
#[derive(Debug)]
pub struct MarkupSession {
    emitted: HashMap<Uuid, String>,
    depth: u32,
    options: EncodeOptions,
}

impl MarkupSession {
    pub fn new(options: EncodeOptions) -> Self {
        Self {
            emitted: HashMap::new(),
            depth: 0,
            options,
        }
    }

    /// Id under which `identity` was already rendered in this document.
    pub fn emitted_id(&self, identity: Uuid) -> Option<&str> {
        self.emitted.get(&identity).map(String::as_str)
    }

    pub(crate) fn mark_emitted(&mut self, identity: Uuid, id: String) {
        self.emitted.insert(identity, id);
    }

    /// Current resource nesting depth (0 outside any resource).
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub(crate) fn enter(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Number of fully rendered resources.
    pub fn emitted_count(&self) -> usize {
        self.emitted.len()
    }
}

/// Tree-mode session: href -> identity of the resource described there.
#[derive(Debug)]
pub struct TreeSession {
    href2obj: HashMap<String, Uuid>,
    options: EncodeOptions,
}

impl TreeSession {
    pub fn new(options: EncodeOptions) -> Self {
        Self {
            href2obj: HashMap::new(),
            options,
        }
    }

    pub fn href_prefix(&self) -> &str {
        self.options
            .href_prefix
            .as_deref()
            .unwrap_or(DEFAULT_HREF_PREFIX)
    }

    /// Identity already described under `href`.
    pub fn described(&self, href: &str) -> Option<Uuid> {
        self.href2obj.get(href).copied()
    }

    pub(crate) fn mark_described(&mut self, href: String, identity: Uuid) {
        self.href2obj.insert(href, identity);
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }
}

impl Default for TreeSession {
    fn default() -> Self {
        Self::new(EncodeOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let opts = EncodeOptions::default();
        assert_eq!(opts.valid_for, Duration::seconds(600));
        assert_eq!(opts.detail, MAX_DETAIL);
        assert!(opts.href_prefix.is_none());
        assert_eq!(EncodeOptions::new().detail(200).detail, MAX_DETAIL);
    }

    #[test]
    fn test_markup_session_depth() {
        let mut session = MarkupSession::new(EncodeOptions::default());
        session.enter();
        session.enter();
        assert_eq!(session.depth(), 2);
        session.leave();
        session.leave();
        session.leave();
        assert_eq!(session.depth(), 0);
    }

    #[test]
    fn test_tree_session_prefix() {
        assert_eq!(TreeSession::default().href_prefix(), DEFAULT_HREF_PREFIX);
        let session = TreeSession::new(EncodeOptions::new().href_prefix("http://am/res"));
        assert_eq!(session.href_prefix(), "http://am/res");
    }
}
