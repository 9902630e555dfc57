// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access token lifecycle.
//!
//! The refresh token is durable (see [`TokenStore`]); the access token only
//! ever lives in an [`AccessToken`] held by the caller. When no usable refresh
//! token exists, an operator has to approve the app again through an
//! [`AuthorizationCodeProvider`].

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::strava::{StravaClient, TokenResponse};
use crate::services::token_store::TokenStore;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// In-memory Strava access token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Source of authorization codes for the interactive OAuth flow.
#[async_trait]
pub trait AuthorizationCodeProvider: Send + Sync {
    /// Show `authorize_url` to whoever can approve the app and return the
    /// `code` they got back from the redirect.
    async fn authorization_code(&self, authorize_url: &str) -> Result<String>;
}

/// Prompts on the terminal and reads the code from stdin.
#[derive(Debug, Default)]
pub struct ConsoleCodeProvider;

#[async_trait]
impl AuthorizationCodeProvider for ConsoleCodeProvider {
    async fn authorization_code(&self, authorize_url: &str) -> Result<String> {
        println!("Visit the following URL to authorize the app:");
        println!("{}", authorize_url);
        println!("Enter the authorization code from the URL after approval:");

        let mut line = String::new();
        let read = BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .map_err(|e| AppError::Auth(format!("Failed to read authorization code: {}", e)))?;

        let code = line.trim();
        if read == 0 || code.is_empty() {
            return Err(AppError::Auth("No authorization code entered".to_string()));
        }
        Ok(code.to_string())
    }
}

/// Obtains access tokens, rotating the stored refresh token on every exchange.
#[derive(Clone)]
pub struct AuthClient {
    client: StravaClient,
    store: TokenStore,
    codes: Arc<dyn AuthorizationCodeProvider>,
    authorize_base: String,
    redirect_uri: String,
}

impl AuthClient {
    pub fn new(
        client: StravaClient,
        store: TokenStore,
        codes: Arc<dyn AuthorizationCodeProvider>,
        authorize_base: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client,
            store,
            codes,
            authorize_base: authorize_base.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Wire up from configuration, storing the refresh token under the data dir.
    pub fn from_config(
        config: &Config,
        client: StravaClient,
        codes: Arc<dyn AuthorizationCodeProvider>,
    ) -> Self {
        Self::new(
            client,
            TokenStore::new(config.refresh_token_path()),
            codes,
            config.strava_authorize_url.clone(),
            config.redirect_uri.clone(),
        )
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.store
    }

    /// Run the interactive authorization flow and exchange the resulting code.
    ///
    /// Fails with [`AppError::Auth`] if no code is supplied or Strava rejects it.
    pub async fn reauthorize(&self) -> Result<AccessToken> {
        tracing::info!("Reauthorizing with Strava");

        let url = self
            .client
            .authorize_url(&self.authorize_base, &self.redirect_uri);
        let code = self.codes.authorization_code(&url).await?;

        let tokens = self.client.exchange_code(&code).await?;
        let access_token = self.store_tokens(tokens).await?;

        tracing::info!("Reauthorization succeeded, new refresh token stored");
        Ok(access_token)
    }

    /// Get a fresh access token from the stored refresh token.
    ///
    /// Falls back to [`reauthorize`](Self::reauthorize) when there is no stored
    /// token or Strava rejects it. Transport failures are returned as-is.
    pub async fn refresh(&self) -> Result<AccessToken> {
        let Some(refresh_token) = self.store.load().await? else {
            tracing::warn!("No refresh token stored, reauthorization required");
            return self.reauthorize().await;
        };

        let tokens = match self.client.refresh_token(&refresh_token).await {
            Ok(tokens) => tokens,
            Err(AppError::Auth(reason)) => {
                tracing::warn!(%reason, "Failed to refresh token, initiating reauthorization");
                return self.reauthorize().await;
            }
            Err(e) => return Err(e),
        };

        let access_token = self.store_tokens(tokens).await?;
        tracing::info!("Access token refreshed");
        Ok(access_token)
    }

    /// Persist the rotated refresh token and hand back the access token.
    ///
    /// Strava invalidates the previous refresh token once a new one is issued.
    async fn store_tokens(&self, tokens: TokenResponse) -> Result<AccessToken> {
        self.store.save(&tokens.refresh_token).await?;
        Ok(AccessToken::new(tokens.access_token))
    }
}
