use std::env;

use anyhow::{anyhow, ensure, Result};
use common_sso::{SsoConfig, SsoOptions, TokenUrlBuilder};
use reqwest::header::{HeaderMap, LOCATION, SET_COOKIE};
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::info;

const MAX_HOPS: usize = 10;
const AUTHENTICATED_COOKIE: &str = "_zendesk_authenticated=1";
const SESSION_COOKIES: [&str; 4] = [
    "_zendesk_shared_session",
    AUTHENTICATED_COOKIE,
    "_zendesk_cookie",
    "_zendesk_session",
];
const REQUEST_ID_HEADER: &str = "x-zendesk-request-id";

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

struct LiveAccount {
    subdomain: String,
    shared_secret: String,
    user_name: String,
    user_email: String,
}

impl LiveAccount {
    fn from_env() -> Option<Self> {
        Some(Self {
            subdomain: var("ZENDESK_SUBDOMAIN")?,
            shared_secret: var("ZENDESK_SHARED_SECRET")?,
            user_name: var("ZENDESK_TEST_USER_NAME")?,
            user_email: var("ZENDESK_TEST_USER_EMAIL")?,
        })
    }

    fn url(&self, subdomain: &str, secret: &str) -> Result<String> {
        self.url_with(subdomain, secret, &SsoOptions::new())
    }

    fn url_with(&self, subdomain: &str, secret: &str, options: &SsoOptions) -> Result<String> {
        let builder = TokenUrlBuilder::new(SsoConfig::new(subdomain, secret))?;
        Ok(builder.build_url(
            self.user_name.as_str(),
            self.user_email.as_str(),
            None,
            Some(options),
        )?)
    }
}

/// Token-authenticated client for the Zendesk users API.
struct UsersApi {
    client: Client,
    base: String,
    user: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: u64,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserList {
    users: Vec<ApiUser>,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: ApiUser,
}

impl UsersApi {
    fn from_env(subdomain: &str) -> Result<Option<Self>> {
        let (Some(user), Some(token)) = (var("ZENDESK_API_USER"), var("ZENDESK_API_TOKEN")) else {
            return Ok(None);
        };
        Ok(Some(Self {
            client: Client::builder().build()?,
            base: format!("https://{subdomain}.zendesk.com/api/v2/users"),
            user: format!("{user}/token"),
            token,
        }))
    }

    async fn search(&self, params: &[(&str, &str)]) -> Result<Vec<ApiUser>> {
        let list: UserList = self
            .client
            .get(format!("{}/search.json", self.base))
            .basic_auth(&self.user, Some(&self.token))
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(list.users)
    }

    async fn delete(&self, id: u64) -> Result<ApiUser> {
        let deleted: UserEnvelope = self
            .client
            .delete(format!("{}/{id}.json", self.base))
            .basic_auth(&self.user, Some(&self.token))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(deleted.user)
    }

    /// Removes the user signed on by a test, found by email.
    async fn delete_by_email(&self, email: &str) -> Result<()> {
        let users = self.search(&[("query", email)]).await?;
        let user = users
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no zendesk user found for {email}"))?;
        let deleted = self.delete(user.id).await?;
        ensure!(
            deleted.email.as_deref() == Some(email),
            "deleted user {} has email {:?}",
            deleted.id,
            deleted.email
        );
        info!(id = deleted.id, "deleted zendesk test user");
        Ok(())
    }
}

struct Hop {
    status: StatusCode,
    headers: HeaderMap,
}

impl Hop {
    fn cookies(&self) -> impl Iterator<Item = &str> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info,common_sso=debug")
        .with_test_writer()
        .try_init();
}

fn client() -> Result<Client> {
    Ok(Client::builder().redirect(Policy::none()).build()?)
}

/// Follows redirects by hand so every hop's status and headers are visible.
async fn follow(client: &Client, start: &str) -> Result<Vec<Hop>> {
    let mut hops = Vec::new();
    let mut next = Url::parse(start)?;

    for _ in 0..MAX_HOPS {
        let response = client.get(next.clone()).send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let location = headers
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        info!(%status, url = %next.host_str().unwrap_or_default(), "zendesk hop");
        hops.push(Hop { status, headers });

        match location {
            Some(target) if status.is_redirection() => next = next.join(&target)?,
            _ => return Ok(hops),
        }
    }

    Err(anyhow!("more than {MAX_HOPS} redirects from {start}"))
}

fn sets_cookie(hops: &[Hop], prefix: &str) -> bool {
    hops.iter()
        .flat_map(Hop::cookies)
        .any(|cookie| cookie.starts_with(prefix))
}

fn sets_authenticated_cookie(hops: &[Hop]) -> bool {
    sets_cookie(hops, AUTHENTICATED_COOKIE)
}

#[tokio::test(flavor = "multi_thread")]
#[cfg_attr(not(feature = "integration"), ignore = "enable with --features integration (requires ZENDESK_* env vars)")]
async fn sign_on_redirects_and_authenticates() -> Result<()> {
    init_tracing();
    let Some(account) = LiveAccount::from_env() else {
        return Ok(());
    };

    let url = account.url(&account.subdomain, &account.shared_secret)?;
    let hops = follow(&client()?, &url).await?;

    assert_eq!(hops[0].status, StatusCode::FOUND);
    assert!(hops.iter().any(|hop| hop.status == StatusCode::OK));
    assert!(
        hops.iter().any(|hop| hop.headers.contains_key(REQUEST_ID_HEADER)),
        "no hop carried X-Zendesk-Request-Id"
    );
    for cookie in SESSION_COOKIES {
        assert!(sets_cookie(&hops, cookie), "the {cookie:?} cookie was not set");
    }

    if let Some(api) = UsersApi::from_env(&account.subdomain)? {
        api.delete_by_email(&account.user_email).await?;
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[cfg_attr(not(feature = "integration"), ignore = "enable with --features integration (requires ZENDESK_* env vars)")]
async fn sign_on_with_external_id_creates_user() -> Result<()> {
    init_tracing();
    let (Some(account), Some(external_id)) =
        (LiveAccount::from_env(), var("ZENDESK_TEST_USER_EXTERNAL_ID"))
    else {
        return Ok(());
    };
    let Some(api) = UsersApi::from_env(&account.subdomain)? else {
        return Ok(());
    };

    let options = SsoOptions::new().with("external_id", external_id.as_str());
    let url = account.url_with(&account.subdomain, &account.shared_secret, &options)?;
    follow(&client()?, &url).await?;

    let users = api.search(&[("external_id", external_id.as_str())]).await?;
    assert_eq!(users.len(), 1, "expected one user with external_id {external_id}");
    assert_eq!(users[0].email.as_deref(), Some(account.user_email.as_str()));

    api.delete_by_email(&account.user_email).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[cfg_attr(not(feature = "integration"), ignore = "enable with --features integration (requires ZENDESK_* env vars)")]
async fn sign_on_fails_with_404_when_subdomain_is_bad() -> Result<()> {
    init_tracing();
    let Some(account) = LiveAccount::from_env() else {
        return Ok(());
    };

    let subdomain = format!("{}gunk", account.subdomain);
    let url = account.url(&subdomain, &account.shared_secret)?;
    let response = client()?.get(url).send().await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[cfg_attr(not(feature = "integration"), ignore = "enable with --features integration (requires ZENDESK_* env vars)")]
async fn sign_on_with_bad_secret_is_not_authenticated() -> Result<()> {
    init_tracing();
    let Some(account) = LiveAccount::from_env() else {
        return Ok(());
    };

    let url = account.url(&account.subdomain, "this-is-not-your-secret")?;
    let hops = follow(&client()?, &url).await?;

    assert!(!sets_authenticated_cookie(&hops));
    Ok(())
}
