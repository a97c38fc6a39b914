//! REST (PostgREST-style) table operations.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::config::SupabaseConfig;

use super::auth::Session;
use super::{SupabaseError, error_message};

/// An equality filter on a table column.
///
/// Rendered as the PostgREST `column=eq.value` query parameter. Equality is
/// the only operator this storefront consumes.
#[derive(Debug, Clone)]
pub struct Filter {
    column: &'static str,
    value: String,
}

impl Filter {
    /// Match rows whose `column` equals `value`.
    #[must_use]
    pub fn eq(column: &'static str, value: impl ToString) -> Self {
        Self {
            column,
            value: value.to_string(),
        }
    }

    fn as_query_pair(&self) -> (&'static str, String) {
        (self.column, format!("eq.{}", self.value))
    }
}

/// Client for the remote data/auth service.
///
/// Cheap to clone; all clones share one HTTP connection pool. Constructed
/// once at startup - there is no lazy global and no "maybe ready" state.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

pub(super) struct SupabaseClientInner {
    pub(super) http: reqwest::Client,
    pub(super) project_url: Url,
    pub(super) anon_key: SecretString,
}

impl SupabaseClient {
    /// Create a new client from configuration.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            inner: Arc::new(SupabaseClientInner {
                http: reqwest::Client::new(),
                project_url: config.project_url.clone(),
                anon_key: config.anon_key.clone(),
            }),
        }
    }

    pub(super) fn inner(&self) -> &SupabaseClientInner {
        &self.inner
    }

    /// Build the URL for a `select` against `table`.
    ///
    /// `columns` is the projection (`None` means `*`), `order` is the
    /// PostgREST order clause (e.g. `created_at.desc`).
    fn select_url(
        &self,
        table: &str,
        columns: Option<&str>,
        filters: &[Filter],
        order: Option<&str>,
    ) -> Url {
        let mut url = self.table_url(table);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", columns.unwrap_or("*"));
            for filter in filters {
                let (column, value) = filter.as_query_pair();
                pairs.append_pair(column, &value);
            }
            if let Some(order) = order {
                pairs.append_pair("order", order);
            }
        }
        url
    }

    fn table_url(&self, table: &str) -> Url {
        let mut url = self.inner.project_url.clone();
        // Url::join would misbehave without a trailing slash on the base
        url.path_segments_mut()
            .map(|mut segments| {
                segments.pop_if_empty().extend(["rest", "v1", table]);
            })
            .unwrap_or_default();
        url
    }

    /// Bearer token for a request: the session's access token when signed
    /// in, the anonymous key otherwise.
    fn bearer(&self, session: Option<&Session>) -> String {
        session.map_or_else(
            || self.inner.anon_key.expose_secret().to_string(),
            |s| s.access_token.expose_secret().to_string(),
        )
    }

    fn authed(
        &self,
        request: reqwest::RequestBuilder,
        session: Option<&Session>,
    ) -> reqwest::RequestBuilder {
        request
            .header("apikey", self.inner.anon_key.expose_secret())
            .bearer_auth(self.bearer(session))
    }

    /// Select rows from a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the service rejects it, or
    /// the response body cannot be decoded as a list of `T`.
    #[instrument(skip(self, session), fields(table = %table))]
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        columns: Option<&str>,
        filters: &[Filter],
        order: Option<&str>,
        session: Option<&Session>,
    ) -> Result<Vec<T>, SupabaseError> {
        let url = self.select_url(table, columns, filters, order);
        let response = self.authed(self.inner.http.get(url), session).send().await?;
        let body = check_status(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Insert a row (or, with a slice payload, several rows) without
    /// reading anything back.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    #[instrument(skip(self, payload, session), fields(table = %table))]
    pub async fn insert<T: Serialize + ?Sized>(
        &self,
        table: &str,
        payload: &T,
        session: Option<&Session>,
    ) -> Result<(), SupabaseError> {
        let response = self
            .authed(self.inner.http.post(self.table_url(table)), session)
            .json(payload)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// Insert a row and return the stored representation (the
    /// select-after-insert the checkout flow relies on for the order id).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the service rejects it, or
    /// the returned representation is missing or malformed.
    #[instrument(skip(self, payload, session), fields(table = %table))]
    pub async fn insert_returning<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        table: &str,
        payload: &T,
        session: Option<&Session>,
    ) -> Result<R, SupabaseError> {
        let response = self
            .authed(self.inner.http.post(self.table_url(table)), session)
            .header("Prefer", "return=representation")
            .json(payload)
            .send()
            .await?;
        let body = check_status(response).await?;
        let mut rows: Vec<R> = serde_json::from_str(&body)?;
        if rows.is_empty() {
            return Err(SupabaseError::NotFound(format!(
                "insert into {table} returned no representation"
            )));
        }
        Ok(rows.remove(0))
    }

    /// Delete rows matching every filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    #[instrument(skip(self, session), fields(table = %table))]
    pub async fn delete(
        &self,
        table: &str,
        filters: &[Filter],
        session: Option<&Session>,
    ) -> Result<(), SupabaseError> {
        let mut url = self.table_url(table);
        {
            let mut pairs = url.query_pairs_mut();
            for filter in filters {
                let (column, value) = filter.as_query_pair();
                pairs.append_pair(column, &value);
            }
        }
        let response = self
            .authed(self.inner.http.delete(url), session)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Read the body, turning non-success statuses into [`SupabaseError::Api`].
async fn check_status(response: reqwest::Response) -> Result<String, SupabaseError> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if status.is_success() {
        Ok(body)
    } else {
        tracing::warn!(status = %status, message = %error_message(&body), "remote service rejected request");
        Err(SupabaseError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_client() -> SupabaseClient {
        let config = SupabaseConfig {
            project_url: Url::parse("https://proj.supabase.co").unwrap(),
            anon_key: SecretString::from("anon-key"),
        };
        SupabaseClient::new(&config)
    }

    #[test]
    fn test_table_url() {
        let client = test_client();
        assert_eq!(
            client.table_url("products").as_str(),
            "https://proj.supabase.co/rest/v1/products"
        );
    }

    #[test]
    fn test_select_url_defaults_to_star() {
        let client = test_client();
        let url = client.select_url("products", None, &[], None);
        assert_eq!(
            url.as_str(),
            "https://proj.supabase.co/rest/v1/products?select=*"
        );
    }

    #[test]
    fn test_select_url_with_filters_and_order() {
        let client = test_client();
        let filters = [Filter::eq("user_id", "abc"), Filter::eq("product_id", 7)];
        let url = client.select_url(
            "wishlist",
            Some("product_id"),
            &filters,
            Some("created_at.desc"),
        );
        assert_eq!(
            url.as_str(),
            "https://proj.supabase.co/rest/v1/wishlist\
             ?select=product_id&user_id=eq.abc&product_id=eq.7&order=created_at.desc"
        );
    }

    #[test]
    fn test_bearer_prefers_session_token() {
        let client = test_client();
        assert_eq!(client.bearer(None), "anon-key");

        let session = Session::for_tests("session-token");
        assert_eq!(client.bearer(Some(&session)), "session-token");
    }
}
