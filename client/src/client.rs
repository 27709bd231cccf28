//! HTTP client for the portal's REST API.
//!
//! All endpoints live under `/api/v1`. Authenticated calls carry the member's
//! bearer token; a 401 triggers one token refresh and a single retry before
//! the session is dropped.

use huay_types::api::{
    AffiliateStats, ApiMessage, BetRecord, BulkBetRequest, BulkBetResponse, ChatMessage,
    CheckMultiplyRequest, CheckMultiplyResponse, DepositRequest, DepositTicket,
    ForgotPasswordRequest, GameItem, GameLaunch, GameLaunchRequest, HuayConfig, LoginRequest,
    LotteryRules, MemberProfile, RefreshRequest, RefreshResponse, RegisterRequest, ResultsPage,
    SaveTemplateRequest, SendMessageRequest, Template, Transaction, WithdrawalRequest,
};
use huay_types::lottery::Period;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::auth::AuthSession;
use crate::{Error, Result};

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    /// Base URL of the API, ending in `/api/v1/`.
    pub base_url: Url,
    auth: AuthSession,
}

impl Client {
    /// Create a client for the portal at `base_url` (scheme must be http or
    /// https).
    pub fn new(base_url: &str, auth: AuthSession) -> Result<Self> {
        let url = Url::parse(base_url)?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(Error::InvalidScheme(other.to_string())),
        }
        let base_url = url.join("api/v1/")?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            auth,
        })
    }

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Send a request, retrying once through a token refresh on 401. A second
    /// 401, or a failed refresh, clears the session.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let response = self.execute_raw(method, path, body).await?;
        Ok(response.json().await?)
    }

    async fn execute_raw(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let url = self.url(path)?;
        let mut refreshed = false;
        loop {
            let mut request = self.http.request(method.clone(), url.clone());
            if let Some(token) = self.auth.access_token() {
                request = request.bearer_auth(token);
            }
            if let Some(body) = &body {
                request = request.json(body);
            }
            let response = request.send().await?;
            let status = response.status();
            if status == StatusCode::UNAUTHORIZED && self.auth.is_authenticated() {
                if refreshed || !self.try_refresh().await {
                    self.auth.clear();
                    return Err(Error::Unauthorized);
                }
                refreshed = true;
                continue;
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                if let Ok(ApiMessage {
                    message: Some(message),
                }) = serde_json::from_str(&body)
                {
                    return Err(Error::Api { status, message });
                }
                return Err(Error::FailedWithBody { status, body });
            }
            return Ok(response);
        }
    }

    /// Exchange the refresh token for new tokens. Sent without the execute
    /// path so a 401 here cannot recurse.
    async fn try_refresh(&self) -> bool {
        let Some(refresh_token) = self.auth.refresh_token() else {
            return false;
        };
        let url = match self.url("member/auth/refresh") {
            Ok(url) => url,
            Err(_) => return false,
        };
        let sent = self
            .http
            .post(url)
            .json(&RefreshRequest {
                refresh_token: refresh_token.clone(),
            })
            .send()
            .await;
        match sent {
            Ok(response) if response.status().is_success() => {
                match response.json::<RefreshResponse>().await {
                    Ok(tokens) => {
                        // Some backends rotate the refresh token, some do not.
                        let refresh = tokens.refresh_token.unwrap_or(refresh_token);
                        self.auth.set_tokens(&tokens.access_token, &refresh);
                        true
                    }
                    Err(err) => {
                        tracing::warn!(?err, "token refresh returned malformed body");
                        false
                    }
                }
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "token refresh rejected");
                false
            }
            Err(err) => {
                tracing::warn!(?err, "token refresh failed");
                false
            }
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(Method::GET, path, None).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.execute(Method::POST, path, Some(serde_json::to_value(body)?))
            .await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.execute_raw(Method::DELETE, path, None).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Authentication
    // -----------------------------------------------------------------------

    /// Log in with phone and password, storing the session tokens and profile.
    pub async fn login(&self, phone: &str, password: &str) -> Result<MemberProfile> {
        let response: huay_types::api::LoginResponse = self
            .post(
                "member/auth/login",
                &LoginRequest {
                    phone: phone.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        match &response.refresh_token {
            Some(refresh) => self.auth.set_tokens(&response.access_token, refresh),
            None => self.auth.set_access_token(&response.access_token),
        }
        self.auth.set_profile(response.member.clone());
        Ok(response.member)
    }

    /// Create a member account. Registration does not log the member in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        self.execute_raw(
            Method::POST,
            "member/auth/register",
            Some(serde_json::to_value(request)?),
        )
        .await?;
        Ok(())
    }

    /// Start the password-reset flow for a phone number.
    pub async fn forgot_password(&self, phone: &str) -> Result<()> {
        self.execute_raw(
            Method::POST,
            "member/auth/forgot-password",
            Some(serde_json::to_value(&ForgotPasswordRequest {
                phone: phone.to_string(),
            })?),
        )
        .await?;
        Ok(())
    }

    /// End the session. The server-side revocation is best effort; local state
    /// is always cleared.
    pub async fn logout(&self) {
        if self.auth.is_authenticated() {
            if let Err(err) = self
                .execute_raw(Method::POST, "member/auth/logout", None)
                .await
            {
                tracing::warn!(?err, "logout request failed");
            }
        }
        self.auth.clear();
    }

    /// Fetch the member profile (including current credit) and cache it.
    pub async fn refresh_profile(&self) -> Result<MemberProfile> {
        let profile: MemberProfile = self.get("member/profile").await?;
        self.auth.set_profile(profile.clone());
        Ok(profile)
    }

    // -----------------------------------------------------------------------
    // Lottery
    // -----------------------------------------------------------------------

    pub async fn active_periods(&self) -> Result<Vec<Period>> {
        self.get("member/lottery/active").await
    }

    /// Payout-config rows for a lottery. All rows are returned; callers filter
    /// to the default, active ones.
    pub async fn huay_config(&self, lottery_id: u64) -> Result<Vec<HuayConfig>> {
        self.get(&format!("lottery/{lottery_id}/huay-config?type=1"))
            .await
    }

    pub async fn check_multiply(
        &self,
        request: &CheckMultiplyRequest,
    ) -> Result<CheckMultiplyResponse> {
        self.post("lottery/check-multiply", request).await
    }

    pub async fn place_bulk_bets(&self, request: &BulkBetRequest) -> Result<BulkBetResponse> {
        self.post("lottery/bet/bulk", request).await
    }

    pub async fn lottery_rules(&self, huay_code: &str) -> Result<LotteryRules> {
        self.get(&format!("lottery/{huay_code}/rules")).await
    }

    /// Settled results for a `YYYY-MM-DD` date.
    pub async fn results(&self, date: &str) -> Result<ResultsPage> {
        self.get(&format!("member/lottery/results?date={date}")).await
    }

    pub async fn bet_history(&self, period_id: Option<&str>) -> Result<Vec<BetRecord>> {
        let path = match period_id {
            Some(id) => format!("member/lottery/bets?periodId={id}"),
            None => "member/lottery/bets".to_string(),
        };
        self.get(&path).await
    }

    // -----------------------------------------------------------------------
    // Saved templates
    // -----------------------------------------------------------------------

    pub async fn templates(&self) -> Result<Vec<Template>> {
        self.get("lottery/templates").await
    }

    /// One template with its items populated.
    pub async fn template(&self, id: &str) -> Result<Template> {
        self.get(&format!("lottery/templates/{id}")).await
    }

    pub async fn save_template(&self, request: &SaveTemplateRequest) -> Result<Template> {
        self.post("lottery/templates", request).await
    }

    pub async fn delete_template(&self, id: &str) -> Result<()> {
        self.delete(&format!("lottery/templates/{id}")).await
    }

    // -----------------------------------------------------------------------
    // Wallet
    // -----------------------------------------------------------------------

    pub async fn request_deposit(&self, request: &DepositRequest) -> Result<DepositTicket> {
        self.post("member/wallet/deposit", request).await
    }

    pub async fn request_withdrawal(&self, request: &WithdrawalRequest) -> Result<Transaction> {
        self.post("member/wallet/withdraw", request).await
    }

    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.get("member/wallet/transactions").await
    }

    // -----------------------------------------------------------------------
    // Game lobby, affiliate, chat
    // -----------------------------------------------------------------------

    pub async fn games(&self) -> Result<Vec<GameItem>> {
        self.get("member/games").await
    }

    pub async fn launch_game(&self, request: &GameLaunchRequest) -> Result<GameLaunch> {
        self.post("member/games/launch", request).await
    }

    pub async fn affiliate_stats(&self) -> Result<AffiliateStats> {
        self.get("member/affiliate/stats").await
    }

    /// Chat messages, optionally only those newer than `after`.
    pub async fn chat_messages(&self, after: Option<u64>) -> Result<Vec<ChatMessage>> {
        let path = match after {
            Some(id) => format!("member/chat/messages?after={id}"),
            None => "member/chat/messages".to_string(),
        };
        self.get(&path).await
    }

    pub async fn send_chat(&self, request: &SendMessageRequest) -> Result<ChatMessage> {
        self.post("member/chat/messages", request).await
    }
}
