//! Short code derivation with mnemonic-first, hash-fallback policy.
//!
//! The deterministic path hashes the URL and keeps a URL-safe base64 prefix,
//! so the same URL always derives the same code with no external dependency.
//! When a slug suggester is configured it is consulted first; any failure is
//! absorbed here and the hash path takes over. Callers never see a generation
//! error.

use base64::Engine as _;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

use crate::infrastructure::mnemonic::SlugSuggester;

/// Length of a hash-derived code.
const HASH_CODE_LEN: usize = 8;

/// Length of the widened code used for the single collision retry.
const WIDE_CODE_LEN: usize = 12;

/// Accepted shape for suggested slugs: lowercase words joined by hyphens.
static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap());

/// Codes reserved for system endpoints to prevent routing conflicts.
const RESERVED_CODES: &[&str] = &["api", "health"];

/// How a code was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeOrigin {
    /// Suggested by the external summarization service.
    Mnemonic,
    /// Derived from the URL hash. `fallback` carries the reason when the
    /// mnemonic path was attempted and failed.
    Hash { fallback: Option<String> },
}

/// A candidate short code together with its provenance.
#[derive(Debug, Clone)]
pub struct GeneratedCode {
    pub code: String,
    pub origin: CodeOrigin,
}

/// Derives the deterministic code for a URL: SHA-256 over the UTF-8 bytes,
/// URL-safe base64, first `len` characters.
pub fn hash_code(url: &str, len: usize) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest);
    encoded[..len].to_string()
}

/// Validates and canonicalizes a suggested slug.
///
/// Returns `None` when the suggestion is unusable as a short code.
fn sanitize_slug(raw: &str) -> Option<String> {
    let slug = raw.trim().to_ascii_lowercase();

    if slug.len() < 4 || slug.len() > 32 {
        return None;
    }
    if !SLUG_REGEX.is_match(&slug) {
        return None;
    }
    if RESERVED_CODES.contains(&slug.as_str()) {
        return None;
    }

    Some(slug)
}

/// Produces candidate short codes for URLs.
///
/// Holds the fallback policy: mnemonic first when a suggester is configured,
/// deterministic hashing otherwise and on any mnemonic failure.
pub struct CodeGenerator {
    suggester: Option<Arc<dyn SlugSuggester>>,
}

impl CodeGenerator {
    /// Creates a generator. Pass `None` to disable the mnemonic path.
    pub fn new(suggester: Option<Arc<dyn SlugSuggester>>) -> Self {
        Self { suggester }
    }

    /// Generates a candidate code for `url`.
    ///
    /// Never fails: mnemonic failures are absorbed and reported through
    /// [`CodeOrigin::Hash`]'s `fallback` field.
    pub async fn generate(&self, url: &str) -> GeneratedCode {
        let Some(suggester) = &self.suggester else {
            return GeneratedCode {
                code: hash_code(url, HASH_CODE_LEN),
                origin: CodeOrigin::Hash { fallback: None },
            };
        };

        let reason = match suggester.suggest(url).await {
            Ok(raw) => match sanitize_slug(&raw) {
                Some(slug) => {
                    debug!("Using mnemonic code '{}' for {}", slug, url);
                    return GeneratedCode {
                        code: slug,
                        origin: CodeOrigin::Mnemonic,
                    };
                }
                None => format!("unusable suggestion '{}'", raw),
            },
            Err(e) => e.to_string(),
        };

        warn!("Mnemonic generation failed for {}: {}", url, reason);

        GeneratedCode {
            code: hash_code(url, HASH_CODE_LEN),
            origin: CodeOrigin::Hash {
                fallback: Some(reason),
            },
        }
    }

    /// Derives the widened variant used for the single collision retry.
    ///
    /// Deterministic like the primary hash path: a longer prefix of the same
    /// digest.
    pub fn disambiguate(&self, url: &str) -> String {
        hash_code(url, WIDE_CODE_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mnemonic::{MockSlugSuggester, SlugError};

    #[test]
    fn test_hash_code_is_deterministic() {
        let a = hash_code("https://example.com/a", HASH_CODE_LEN);
        let b = hash_code("https://example.com/a", HASH_CODE_LEN);
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_code_length() {
        assert_eq!(hash_code("https://example.com/a", HASH_CODE_LEN).len(), 8);
        assert_eq!(hash_code("https://example.com/a", WIDE_CODE_LEN).len(), 12);
    }

    #[test]
    fn test_hash_code_url_safe_alphabet() {
        for url in [
            "https://example.com/",
            "https://example.com/some/long/path?q=1",
            "https://example.com/\u{00e9}\u{4f60}\u{597d}",
        ] {
            let code = hash_code(url, HASH_CODE_LEN);
            assert!(
                code.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
                "code '{}' contains non-URL-safe characters",
                code
            );
        }
    }

    #[test]
    fn test_distinct_urls_usually_distinct_codes() {
        let a = hash_code("https://example.com/a", HASH_CODE_LEN);
        let b = hash_code("https://example.com/b", HASH_CODE_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn test_disambiguate_extends_primary_code() {
        let generator = CodeGenerator::new(None);
        let short = hash_code("https://example.com/a", HASH_CODE_LEN);
        let wide = generator.disambiguate("https://example.com/a");

        assert_eq!(wide.len(), 12);
        assert!(wide.starts_with(&short));
        assert_ne!(short, wide);
    }

    #[test]
    fn test_sanitize_slug_accepts_hyphenated_words() {
        assert_eq!(
            sanitize_slug("rust-async-guide"),
            Some("rust-async-guide".to_string())
        );
        assert_eq!(sanitize_slug("  Fast-Cars "), Some("fast-cars".to_string()));
    }

    #[test]
    fn test_sanitize_slug_rejects_bad_shapes() {
        assert_eq!(sanitize_slug("ab"), None);
        assert_eq!(sanitize_slug("-leading"), None);
        assert_eq!(sanitize_slug("trailing-"), None);
        assert_eq!(sanitize_slug("two  words"), None);
        assert_eq!(sanitize_slug("under_score"), None);
        assert_eq!(sanitize_slug(&"x".repeat(33)), None);
        assert_eq!(sanitize_slug(""), None);
    }

    #[test]
    fn test_sanitize_slug_rejects_reserved() {
        assert_eq!(sanitize_slug("health"), None);
        assert_eq!(sanitize_slug("api"), None);
    }

    #[tokio::test]
    async fn test_generate_without_suggester_uses_hash() {
        let generator = CodeGenerator::new(None);
        let generated = generator.generate("https://example.com/a").await;

        assert_eq!(generated.code.len(), 8);
        assert_eq!(generated.origin, CodeOrigin::Hash { fallback: None });
    }

    #[tokio::test]
    async fn test_generate_prefers_mnemonic() {
        let mut suggester = MockSlugSuggester::new();
        suggester
            .expect_suggest()
            .times(1)
            .returning(|_| Ok("rust-blog-post".to_string()));

        let generator = CodeGenerator::new(Some(Arc::new(suggester)));
        let generated = generator.generate("https://example.com/a").await;

        assert_eq!(generated.code, "rust-blog-post");
        assert_eq!(generated.origin, CodeOrigin::Mnemonic);
    }

    #[tokio::test]
    async fn test_generate_falls_back_on_suggester_error() {
        let mut suggester = MockSlugSuggester::new();
        suggester
            .expect_suggest()
            .times(1)
            .returning(|_| Err(SlugError::Fetch("connection refused".to_string())));

        let generator = CodeGenerator::new(Some(Arc::new(suggester)));
        let generated = generator.generate("https://example.com/a").await;

        assert_eq!(generated.code.len(), 8);
        assert_eq!(generated.code, hash_code("https://example.com/a", 8));
        match generated.origin {
            CodeOrigin::Hash { fallback: Some(reason) } => {
                assert!(reason.contains("connection refused"));
            }
            other => panic!("expected hash fallback, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_falls_back_on_unusable_suggestion() {
        let mut suggester = MockSlugSuggester::new();
        suggester
            .expect_suggest()
            .times(1)
            .returning(|_| Ok("Not A Valid Slug!!".to_string()));

        let generator = CodeGenerator::new(Some(Arc::new(suggester)));
        let generated = generator.generate("https://example.com/a").await;

        assert_eq!(generated.code, hash_code("https://example.com/a", 8));
        assert!(matches!(
            generated.origin,
            CodeOrigin::Hash { fallback: Some(_) }
        ));
    }
}
