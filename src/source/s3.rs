//! Rule files from an S3 bucket prefix.
//!
//! # Responsibilities
//! - Build an S3 client from explicit or ambient credentials
//! - Page through `ListObjectsV2` under the prefix
//! - Fetch and parse every object with the rule extension
//!
//! # Design Decisions
//! - Explicit access keys win over the default credential chain
//! - A listing failure aborts the fetch; a failed `GetObject` skips one key
//! - Listing order (lexicographic by key) is the first-seen order for ties

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;

use crate::config::S3Config;
use crate::error::{FetchError, SourceError};
use crate::routing::ruleset::RuleBatch;
use crate::source::{has_extension, parser::parse_rules};

/// Provider name attached to static credentials.
const STATIC_PROVIDER: &str = "redirector-static";

/// Reads every matching object under `s3://bucket/prefix`.
#[derive(Debug, Clone)]
pub struct S3Source {
    bucket: String,
    prefix: String,
    extension: String,
    access: S3Config,
}

impl S3Source {
    pub fn new(
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        extension: impl Into<String>,
        access: S3Config,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
            extension: extension.into(),
            access,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    async fn client(&self) -> Client {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some((key_id, secret)) = self.access.static_credentials() {
            tracing::info!("Using static AWS credentials");
            loader = loader.credentials_provider(Credentials::new(
                key_id,
                secret,
                self.access.session_token.clone().filter(|t| !t.is_empty()),
                None,
                STATIC_PROVIDER,
            ));
        } else {
            tracing::info!("Using default AWS credential chain");
        }

        if let Some(region) = self.access.region.clone().filter(|r| !r.is_empty()) {
            loader = loader.region(Region::new(region));
        }

        let shared = loader.load().await;
        let mut config = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = self.access.endpoint() {
            tracing::info!(endpoint = %endpoint, "Using custom S3 endpoint");
            config = config.endpoint_url(endpoint).force_path_style(true);
        }
        Client::from_conf(config.build())
    }

    /// List the prefix and compile every matching object.
    pub async fn fetch_all(&self) -> Result<RuleBatch, SourceError> {
        tracing::info!(bucket = %self.bucket, prefix = %self.prefix, "Loading redirects from S3");

        let client = self.client().await;
        let mut pages = client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&self.prefix)
            .into_paginator()
            .send();

        let mut batch = RuleBatch::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| SourceError::List {
                bucket: self.bucket.clone(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

            for key in page.contents().iter().filter_map(|object| object.key()) {
                if !has_extension(key, &self.extension) {
                    continue;
                }
                tracing::info!(bucket = %self.bucket, key = %key, "Processing S3 object");
                match self.load_object(&client, key).await {
                    Ok(rules) => batch.merge(rules),
                    Err(e) => tracing::warn!(error = %e, "Skipping S3 object"),
                }
            }
        }
        Ok(batch)
    }

    async fn load_object(&self, client: &Client, key: &str) -> Result<RuleBatch, FetchError> {
        let object_error = |message: String| FetchError::Object {
            key: key.to_string(),
            message,
        };

        let response = client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| object_error(DisplayErrorContext(&e).to_string()))?;

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| object_error(e.to_string()))?
            .into_bytes();

        parse_rules(body.as_ref(), key)
    }
}
