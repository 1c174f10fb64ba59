use async_trait::async_trait;
use domain::{Post, Slug};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use crate::{CmsConfig, ContentStore, StoreError};

const ALL_SLUGS_QUERY: &str = r#"*[_type == "post"]{ _id, slug { current } }"#;

// 评论在查询时关联：只取 approved == true 的评论
const POST_BY_SLUG_QUERY: &str = r#"*[_type == "post" && slug.current == $slug][0]{
  _id,
  _createdAt,
  title,
  author-> { name, image },
  'comments': *[_type == "comment" && post._ref == ^._id && approved == true],
  description,
  mainImage,
  slug,
  body
}"#;

#[derive(Deserialize)]
struct QueryResponse<T> {
    result: T,
}

#[derive(Deserialize)]
struct SlugRow {
    slug: Option<SlugCurrent>,
}

#[derive(Deserialize)]
struct SlugCurrent {
    current: Option<String>,
}

/// Content store backed by the Sanity HTTP query API.
#[derive(Clone)]
pub struct SanityStore {
    client: reqwest::Client,
    config: CmsConfig,
}

impl SanityStore {
    pub fn new(config: CmsConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: CmsConfig) -> Self {
        Self { client, config }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, serde_json::Value)],
    ) -> Result<T, StoreError> {
        // 参数按 GROQ 约定编码为 `$name=<json>`
        let mut pairs: Vec<(String, String)> = vec![("query".to_string(), query.to_string())];
        for (name, value) in params {
            pairs.push((format!("${}", name), value.to_string()));
        }

        let mut req = self.client.get(self.config.query_url()).query(&pairs);
        if let Some(token) = &self.config.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }

        let bytes = resp.bytes().await?;
        let parsed: QueryResponse<T> = serde_json::from_slice(&bytes)?;
        Ok(parsed.result)
    }
}

#[async_trait]
impl ContentStore for SanityStore {
    async fn post_slugs(&self) -> Result<Vec<String>, StoreError> {
        let rows: Vec<SlugRow> = self.fetch(ALL_SLUGS_QUERY, &[]).await?;
        let slugs: Vec<String> = rows
            .into_iter()
            .filter_map(|r| r.slug.and_then(|s| s.current))
            .collect();
        debug!("Store returned {} post slugs", slugs.len());
        Ok(slugs)
    }

    async fn post_by_slug(&self, slug: &Slug) -> Result<Option<Post>, StoreError> {
        let post: Option<Post> = self
            .fetch(
                POST_BY_SLUG_QUERY,
                &[("slug", serde_json::Value::from(slug.as_str()))],
            )
            .await?;
        Ok(post.map(Post::retain_approved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> SanityStore {
        let mut cfg = CmsConfig::new("proj", "production");
        cfg.api_host = Some(server.uri());
        cfg.token = Some("secret".into());
        SanityStore::new(cfg)
    }

    #[tokio::test]
    async fn lists_slugs_and_skips_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2021-10-21/data/query/production"))
            .and(query_param("query", ALL_SLUGS_QUERY))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ms": 3,
                "result": [
                    { "_id": "a", "slug": { "current": "hello-world" } },
                    { "_id": "b", "slug": null },
                    { "_id": "c", "slug": { "current": "second" } }
                ]
            })))
            .mount(&server)
            .await;

        let slugs = store_for(&server).post_slugs().await.unwrap();
        assert_eq!(slugs, vec!["hello-world", "second"]);
    }

    #[tokio::test]
    async fn passes_slug_as_json_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("$slug", "\"hello-world\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": {
                    "_id": "post-1",
                    "_createdAt": "2022-03-01T10:20:30Z",
                    "title": "Hello World",
                    "description": "",
                    "slug": { "current": "hello-world" },
                    "body": [],
                    "author": { "name": "Ada" },
                    "comments": [
                        { "_id": "c1", "post": { "_ref": "post-1" }, "name": "Bob",
                          "comment": "Hi", "approved": true },
                        { "_id": "c2", "post": { "_ref": "post-1" }, "name": "Eve",
                          "comment": "Spam", "approved": false }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let slug = Slug::new("hello-world").unwrap();
        let post = store_for(&server).post_by_slug(&slug).await.unwrap().unwrap();
        assert_eq!(post.title, "Hello World");
        assert_eq!(post.comments.len(), 1);
        assert!(post.comments.iter().all(|c| c.approved));
    }

    #[tokio::test]
    async fn null_result_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "result": null })),
            )
            .mount(&server)
            .await;

        let slug = Slug::new("nope").unwrap();
        assert!(store_for(&server).post_by_slug(&slug).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn error_status_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = store_for(&server).post_slugs().await.unwrap_err();
        match err {
            StoreError::Status { status, body } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
