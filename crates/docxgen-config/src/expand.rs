//! `${VAR}` expansion for `docxgen.toml` values.
//!
//! Each expandable value is addressed by an [`ExpandField`], so a missing
//! variable is reported against the configuration key that referenced it.
//! Variables come from a lookup function: the process environment when
//! loading, a fixed table in tests.

use std::borrow::Cow;
use std::path::PathBuf;

use crate::ConfigError;

/// Configuration keys that accept `${VAR}` references.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ExpandField {
    ServerHost,
    PublicBaseUrl,
    KeyPrefix,
    S3Bucket,
    S3Region,
    S3Endpoint,
    FsRoot,
}

impl ExpandField {
    /// Dotted key as written in `docxgen.toml`.
    pub(crate) fn key(self) -> &'static str {
        match self {
            Self::ServerHost => "server.host",
            Self::PublicBaseUrl => "storage.public_base_url",
            Self::KeyPrefix => "storage.key_prefix",
            Self::S3Bucket => "storage.s3.bucket",
            Self::S3Region => "storage.s3.region",
            Self::S3Endpoint => "storage.s3.endpoint",
            Self::FsRoot => "storage.fs.root",
        }
    }
}

/// Marker for a variable without a value.
struct Unset;

/// Expands `${VAR}` and `${VAR:-default}` in place.
///
/// Bare `$VAR` is left untouched.
pub(crate) struct Expander<F> {
    lookup: F,
}

impl Expander<fn(&str) -> Option<String>> {
    /// Expander reading the process environment.
    pub(crate) fn from_env() -> Self {
        Self {
            lookup: |var: &str| std::env::var(var).ok(),
        }
    }
}

impl<F: Fn(&str) -> Option<String>> Expander<F> {
    pub(crate) fn new(lookup: F) -> Self {
        Self { lookup }
    }

    pub(crate) fn string(&self, value: &mut String, field: ExpandField) -> Result<(), ConfigError> {
        if let Some(expanded) = self.expand(value, field)? {
            *value = expanded;
        }
        Ok(())
    }

    pub(crate) fn optional(
        &self,
        value: &mut Option<String>,
        field: ExpandField,
    ) -> Result<(), ConfigError> {
        match value {
            Some(value) => self.string(value, field),
            None => Ok(()),
        }
    }

    /// Expand a path; non-UTF-8 paths are left as they are.
    pub(crate) fn path(&self, value: &mut PathBuf, field: ExpandField) -> Result<(), ConfigError> {
        let Some(text) = value.to_str() else {
            return Ok(());
        };
        if let Some(expanded) = self.expand(text, field)? {
            *value = PathBuf::from(expanded);
        }
        Ok(())
    }

    /// Returns `None` when `value` has no references to replace.
    fn expand(&self, value: &str, field: ExpandField) -> Result<Option<String>, ConfigError> {
        if !value.contains("${") {
            return Ok(None);
        }
        let expanded = shellexpand::env_with_context(value, |var| {
            (self.lookup)(var).map(Some).ok_or(Unset)
        })
        .map_err(|e| ConfigError::EnvVar {
            field: field.key(),
            var: e.var_name,
        })?;
        Ok(match expanded {
            Cow::Borrowed(_) => None,
            Cow::Owned(expanded) => Some(expanded),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn vars(name: &str) -> Option<String> {
        match name {
            "DOCS_BUCKET" => Some("team-docs".to_owned()),
            "CDN_HOST" => Some("cdn.example.com".to_owned()),
            "BLOB_DIR" => Some("/var/lib/docxgen".to_owned()),
            _ => None,
        }
    }

    fn expander() -> Expander<fn(&str) -> Option<String>> {
        Expander::new(vars as fn(&str) -> Option<String>)
    }

    #[test]
    fn test_field_keys_match_toml_layout() {
        assert_eq!(ExpandField::S3Bucket.key(), "storage.s3.bucket");
        assert_eq!(ExpandField::FsRoot.key(), "storage.fs.root");
    }

    #[test]
    fn test_string_whole_value() {
        let mut bucket = "${DOCS_BUCKET}".to_owned();
        expander().string(&mut bucket, ExpandField::S3Bucket).unwrap();
        assert_eq!(bucket, "team-docs");
    }

    #[test]
    fn test_string_embedded_reference() {
        let mut url = "https://${CDN_HOST}/documents".to_owned();
        expander()
            .string(&mut url, ExpandField::PublicBaseUrl)
            .unwrap();
        assert_eq!(url, "https://cdn.example.com/documents");
    }

    #[test]
    fn test_default_used_when_unset() {
        let mut region = "${DOCS_REGION:-eu-west-1}".to_owned();
        expander().string(&mut region, ExpandField::S3Region).unwrap();
        assert_eq!(region, "eu-west-1");
    }

    #[test]
    fn test_bare_dollar_left_alone() {
        let mut prefix = "$DOCS_BUCKET/out".to_owned();
        expander().string(&mut prefix, ExpandField::KeyPrefix).unwrap();
        assert_eq!(prefix, "$DOCS_BUCKET/out");
    }

    #[test]
    fn test_missing_variable_names_config_key() {
        let mut endpoint = Some("http://${MINIO_HOST}:9000".to_owned());
        let err = expander()
            .optional(&mut endpoint, ExpandField::S3Endpoint)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "storage.s3.endpoint references ${MINIO_HOST}, which is not set"
        );
    }

    #[test]
    fn test_optional_none_untouched() {
        let mut value = None;
        expander()
            .optional(&mut value, ExpandField::PublicBaseUrl)
            .unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_path_expansion() {
        let mut root = PathBuf::from("${BLOB_DIR}/blobs");
        expander().path(&mut root, ExpandField::FsRoot).unwrap();
        assert_eq!(root, PathBuf::from("/var/lib/docxgen/blobs"));
    }
}
