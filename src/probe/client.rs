//! # HTTP 模块客户端

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};

use super::{ModuleProbe, TargetService, TestReport};
use crate::config::ProbeConfig;
use crate::error::{MonitorError, ProbeError, Result};
use crate::ldebug;
use crate::logging::{LogComponent, LogStage};

const USER_AGENT: &str = concat!("module-monitor/", env!("CARGO_PKG_VERSION"));

/// 基于 reqwest 的模块协议客户端
///
/// 内部 `Client` 复用连接池，多个并发调用之间不共享其他状态。
#[derive(Debug, Clone)]
pub struct HttpModuleProbe {
    client: Client,
    test_timeout: Duration,
    location_timeout: Duration,
}

impl HttpModuleProbe {
    /// 按调用配置创建客户端
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| MonitorError::internal_with_source("创建HTTP客户端失败", e))?;

        Ok(Self {
            client,
            test_timeout: config.test_timeout(),
            location_timeout: config.location_timeout(),
        })
    }

    /// 发送 GET 请求并把响应体解析为 JSON 对象
    async fn fetch_object(
        &self,
        endpoint: &str,
        query: Option<&[(&str, &str)]>,
        timeout: Duration,
    ) -> std::result::Result<Map<String, Value>, ProbeError> {
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

        let mut request = self.client.get(endpoint).timeout(timeout);
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProbeError::from_reqwest(endpoint, timeout_ms, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status {
                url: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ProbeError::from_reqwest(endpoint, timeout_ms, e))?;

        serde_json::from_slice::<Map<String, Value>>(&body)
            .map_err(|e| ProbeError::malformed(endpoint, e.to_string()))
    }
}

#[async_trait]
impl ModuleProbe for HttpModuleProbe {
    async fn resolve_location(&self, module_url: &str) -> std::result::Result<String, ProbeError> {
        let endpoint = format!("{module_url}/location");
        let mut body = self
            .fetch_object(&endpoint, None, self.location_timeout)
            .await?;

        let location = match body.remove("location") {
            None | Some(Value::Null) => {
                return Err(ProbeError::MissingLocation { url: endpoint });
            }
            Some(Value::String(location)) => location,
            // 非字符串按 JSON 文本保留
            Some(other) => other.to_string(),
        };

        ldebug!(
            "system",
            LogStage::Probing,
            LogComponent::Probe,
            "resolve_location",
            "模块 location 解析成功",
            module_url = %module_url,
            location = %location
        );
        Ok(location)
    }

    async fn run_test(
        &self,
        module_url: &str,
        target: &TargetService,
    ) -> std::result::Result<TestReport, ProbeError> {
        let endpoint = format!("{module_url}/test");
        let query = [("url", target.url.as_str())];
        let body = self
            .fetch_object(&endpoint, Some(&query), self.test_timeout)
            .await?;

        Ok(TestReport::from(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn probe() -> HttpModuleProbe {
        let config = ProbeConfig {
            test_timeout_secs: 1,
            location_timeout_secs: 1,
            connect_timeout_secs: 1,
        };
        HttpModuleProbe::new(&config).unwrap()
    }

    async fn location_server(response: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/location"))
            .respond_with(response)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn resolves_string_location() {
        let server =
            location_server(ResponseTemplate::new(200).set_body_json(json!({"location": "ModA"})))
                .await;

        let location = probe().resolve_location(&server.uri()).await.unwrap();
        assert_eq!(location, "ModA");
    }

    #[tokio::test]
    async fn renders_non_string_location_as_json() {
        let server =
            location_server(ResponseTemplate::new(200).set_body_json(json!({"location": 42})))
                .await;

        let location = probe().resolve_location(&server.uri()).await.unwrap();
        assert_eq!(location, "42");
    }

    #[tokio::test]
    async fn null_or_missing_location_is_rejected() {
        for body in [json!({"location": null}), json!({"name": "ModA"})] {
            let server = location_server(ResponseTemplate::new(200).set_body_json(body)).await;
            let err = probe().resolve_location(&server.uri()).await.unwrap_err();
            assert!(matches!(err, ProbeError::MissingLocation { .. }), "{err}");
        }
    }

    #[tokio::test]
    async fn non_success_status_is_rejected() {
        let server = location_server(ResponseTemplate::new(503)).await;

        let err = probe().resolve_location(&server.uri()).await.unwrap_err();
        assert!(matches!(err, ProbeError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn unparseable_body_is_malformed() {
        let server = location_server(ResponseTemplate::new(200).set_body_string("ModA")).await;

        let err = probe().resolve_location(&server.uri()).await.unwrap_err();
        assert!(matches!(err, ProbeError::Malformed { .. }));
    }

    #[tokio::test]
    async fn slow_module_times_out() {
        let server = location_server(
            ResponseTemplate::new(200)
                .set_body_json(json!({"location": "ModB"}))
                .set_delay(Duration::from_secs(3)),
        )
        .await;

        let err = probe().resolve_location(&server.uri()).await.unwrap_err();
        assert!(err.is_timeout(), "{err}");
    }

    #[tokio::test]
    async fn run_test_passes_target_url_as_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/test"))
            .and(query_param("url", "https://lms.university.edu/login?next=/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"online": true, "latencyMs": 8})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let target = TargetService::new(7, "https://lms.university.edu/login?next=/");
        let report = probe().run_test(&server.uri(), &target).await.unwrap();

        assert_eq!(report.is_online(), Some(true));
        assert_eq!(report.fields()["latencyMs"], json!(8));
    }

    #[tokio::test]
    async fn run_test_rejects_array_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"online": true}])))
            .mount(&server)
            .await;

        let target = TargetService::new(1, "http://library.university.edu");
        let err = probe().run_test(&server.uri(), &target).await.unwrap_err();
        assert!(matches!(err, ProbeError::Malformed { .. }));
    }

    #[tokio::test]
    async fn unreachable_module_is_network_failure() {
        let target = TargetService::new(1, "http://library.university.edu");
        let err = probe()
            .run_test("http://127.0.0.1:9", &target)
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::Network { .. } | ProbeError::Timeout { .. }));
    }
}
