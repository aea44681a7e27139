use super::{AllowNotFound, WaitPeriods};
use crate::clients::error::{self, Result};
use crate::{CrdExt, Manifest};
use core::fmt::Debug;
use kube::api::{Patch, PatchParams, PostParams};
use kube::Api;
use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use snafu::ResultExt;

/// A trait with implementations of code that is shared between clients of ACK custom resources.
#[async_trait::async_trait]
pub trait CrdClient: Sized {
    type Crd: kube::Resource<DynamicType = (), Scope = k8s_openapi::NamespaceResourceScope>
        + Serialize
        + DeserializeOwned
        + Debug
        + Clone
        + Send
        + Sync
        + CrdExt;

    // The following need to be implemented which allows the rest of the functions to have
    // default implementations.

    fn new_from_api(api: Api<Self::Crd>) -> Self;
    fn kind(&self) -> &'static str;
    fn api(&self) -> &Api<Self::Crd>;

    async fn new(namespace: &str) -> Result<Self> {
        let k8s_client = kube::Client::try_default()
            .await
            .context(error::InitializationSnafu)?;
        Ok(Self::new_from_k8s_client(k8s_client, namespace))
    }

    fn new_from_k8s_client(k8s_client: kube::Client, namespace: &str) -> Self {
        Self::new_from_api(Self::create_api(k8s_client, namespace))
    }

    fn create_api(k8s_client: kube::Client, namespace: &str) -> Api<Self::Crd> {
        Api::<Self::Crd>::namespaced(k8s_client, namespace)
    }

    async fn get<S>(&self, name: S) -> Result<Self::Crd>
    where
        S: AsRef<str> + Send,
    {
        let name: &str = name.as_ref();
        Ok(self
            .api()
            .get(name)
            .await
            .context(error::KubeApiCallSnafu {
                method: "get",
                what: self.kind(),
            })?)
    }

    /// Like `get` but returns `None` instead of an error when the object does not exist.
    async fn get_opt<S>(&self, name: S) -> Result<Option<Self::Crd>>
    where
        S: AsRef<str> + Send,
    {
        let name: &str = name.as_ref();
        Ok(self
            .api()
            .get(name)
            .await
            .allow_not_found(|_| ())
            .context(error::KubeApiCallSnafu {
                method: "get",
                what: self.kind(),
            })?)
    }

    async fn exists<S>(&self, name: S) -> Result<bool>
    where
        S: AsRef<str> + Send,
    {
        Ok(self.get_opt(name).await?.is_some())
    }

    /// Submits a rendered manifest. The document is sent as written, so fields that `Self::Crd`
    /// does not model still reach the API server.
    async fn create(&self, manifest: &Manifest<Self::Crd>) -> Result<Self::Crd> {
        let name = manifest.object().object_name();
        trace!("creating {} '{}'", self.kind(), name);
        let body = serde_json::to_vec(manifest.document())
            .context(error::SerdeSnafu { what: name })?;
        let request = kube::core::Request::new(self.api().resource_url())
            .create(&PostParams::default(), body)
            .map_err(kube::Error::BuildRequest)
            .context(error::KubeApiCallSnafu {
                method: "create",
                what: self.kind(),
            })?;
        Ok(self
            .api()
            .clone()
            .into_client()
            .request::<Self::Crd>(request)
            .await
            .context(error::KubeApiCallSnafu {
                method: "create",
                what: self.kind(),
            })?)
    }

    /// Applies a JSON merge patch. Keys set to `null` in `patch` are removed from the object and
    /// arrays are replaced as a whole.
    async fn merge_patch<S>(&self, name: S, patch: Value, description: &str) -> Result<Self::Crd>
    where
        S: AsRef<str> + Send,
    {
        let name: &str = name.as_ref();
        trace!("{} for {} '{}': {}", description, self.kind(), name, patch);
        Ok(self
            .api()
            .patch(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .context(error::KubeApiCallForSnafu {
                operation: description,
                name,
            })?)
    }

    /// Requests deletion. Returns `None` if the object did not exist.
    async fn delete<S>(&self, name: S) -> Result<Option<Self::Crd>>
    where
        S: AsRef<str> + Send,
    {
        let name: &str = name.as_ref();
        Ok(self
            .api()
            .delete(name, &Default::default())
            .await
            .allow_not_found(|_| debug!("{} '{}' was already gone", self.kind(), name))
            .context(error::KubeApiCallSnafu {
                method: "delete",
                what: self.kind(),
            })?
            .and_then(|either| either.left()))
    }

    /// Polls until the controller has written a `status` to the object. ACK controllers write
    /// status the first time they reconcile an object, so this tells us that the object has been
    /// picked up.
    async fn wait_consumed<S>(&self, name: S, wait: WaitPeriods) -> Result<Self::Crd>
    where
        S: AsRef<str> + Send,
    {
        let name: &str = name.as_ref();
        for _ in 0..wait.periods {
            tokio::time::sleep(wait.period_length).await;
            if let Some(crd) = self.get_opt(name).await? {
                if crd.has_status() {
                    debug!("{} '{}' was consumed by the controller", self.kind(), name);
                    return Ok(crd);
                }
            }
            trace!("waiting for the controller to consume {} '{}'", self.kind(), name);
        }
        Err(error::ConsumeTimeoutSnafu {
            kind: self.kind(),
            name,
            waited: wait.total(),
        }
        .build()
        .into())
    }

    /// Polls until the condition `condition_type` has status `expected`. The condition is checked
    /// once more than there are periods: immediately, and after each period.
    async fn wait_on_condition<S>(
        &self,
        name: S,
        condition_type: &str,
        expected: &str,
        wait: WaitPeriods,
    ) -> Result<Self::Crd>
    where
        S: AsRef<str> + Send,
    {
        let name: &str = name.as_ref();
        let mut last_observed = None;
        for period in 0..=wait.periods {
            let crd = self.get(name).await?;
            last_observed = crd.condition_status(condition_type).map(str::to_string);
            if last_observed.as_deref() == Some(expected) {
                debug!(
                    "condition '{}' of {} '{}' is '{}'",
                    condition_type,
                    self.kind(),
                    name,
                    expected
                );
                return Ok(crd);
            }
            if period < wait.periods {
                trace!(
                    "condition '{}' of {} '{}' is {:?}, waiting for '{}'",
                    condition_type,
                    self.kind(),
                    name,
                    last_observed,
                    expected
                );
                tokio::time::sleep(wait.period_length).await;
            }
        }
        Err(error::ConditionTimeoutSnafu {
            kind: self.kind(),
            name,
            condition_type,
            expected,
            last_observed,
            waited: wait.total(),
        }
        .build()
        .into())
    }

    /// Requests deletion, then polls until `get(name)` returns `NOT_FOUND`. An object that is
    /// already gone counts as deleted.
    async fn delete_and_wait<S>(&self, name: S, wait: WaitPeriods) -> Result<()>
    where
        S: AsRef<str> + Send,
    {
        let name: &str = name.as_ref();
        self.delete(name).await?;
        for _ in 0..wait.periods {
            tokio::time::sleep(wait.period_length).await;
            if !self.exists(name).await? {
                debug!("{} '{}' has been deleted", self.kind(), name);
                return Ok(());
            }
            trace!("waiting for {} '{}' to be deleted", self.kind(), name);
        }
        Err(error::DeleteTimeoutSnafu {
            kind: self.kind(),
            name,
            waited: wait.total(),
        }
        .build()
        .into())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::clients::{DeliveryStreamClient, HttpStatusCode, StatusCode};
    use crate::constants::{CONDITION_STATUS_TRUE, CONDITION_TYPE_RESOURCE_SYNCED};
    use crate::DeliveryStream;
    use http::{Method, Request, Response};
    use hyper::Body;
    use serde_json::json;
    use std::time::Duration;
    use tokio::task::JoinHandle;
    use tokio::time::Instant;

    const NAME: &str = "http-dest-delivery-stream-abc";
    const STREAMS_PATH: &str =
        "/apis/firehose.services.k8s.aws/v1alpha1/namespaces/default/deliverystreams";

    type ApiServerHandle = tower_test::mock::Handle<Request<Body>, Response<Body>>;

    /// Answers the client's requests in order and hands back the request bodies it received.
    struct ApiServerVerifier(ApiServerHandle);

    enum Reply {
        Object(Value),
        NotFound,
    }

    impl Reply {
        fn into_response(self) -> Response<Body> {
            let (status, body) = match self {
                Reply::Object(object) => (200, object),
                Reply::NotFound => (
                    404,
                    json!({
                        "kind": "Status",
                        "apiVersion": "v1",
                        "metadata": {},
                        "status": "Failure",
                        "message": format!("deliverystreams \"{}\" not found", NAME),
                        "reason": "NotFound",
                        "code": 404
                    }),
                ),
            };
            Response::builder()
                .status(status)
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap()
        }
    }

    impl ApiServerVerifier {
        fn run(mut self, replies: Vec<(Method, Reply)>) -> JoinHandle<Vec<Value>> {
            tokio::spawn(async move {
                let mut bodies = Vec::new();
                for (method, reply) in replies {
                    let (request, send) = self.0.next_request().await.expect("service not called");
                    assert_eq!(request.method(), method);
                    assert!(request.uri().path().starts_with(STREAMS_PATH));
                    let body = hyper::body::to_bytes(request.into_body()).await.unwrap();
                    bodies.push(serde_json::from_slice(&body).unwrap_or(Value::Null));
                    send.send_response(reply.into_response());
                }
                bodies
            })
        }
    }

    fn test_client() -> (DeliveryStreamClient, ApiServerVerifier) {
        let (mock_service, handle) = tower_test::mock::pair::<Request<Body>, Response<Body>>();
        let client = kube::Client::new(mock_service, "default");
        (
            DeliveryStreamClient::new_from_k8s_client(client, "default"),
            ApiServerVerifier(handle),
        )
    }

    async fn finish(server: JoinHandle<Vec<Value>>) -> Vec<Value> {
        tokio::time::timeout(Duration::from_secs(1), server)
            .await
            .expect("timeout on mock apiserver")
            .expect("all requests were answered")
    }

    fn stream(synced: Option<&str>) -> Reply {
        let mut object = json!({
            "apiVersion": "firehose.services.k8s.aws/v1alpha1",
            "kind": "DeliveryStream",
            "metadata": { "name": NAME, "namespace": "default" },
            "spec": { "deliveryStreamName": NAME }
        });
        if let Some(synced) = synced {
            object["status"] = json!({
                "conditions": [{ "type": CONDITION_TYPE_RESOURCE_SYNCED, "status": synced }]
            });
        }
        Reply::Object(object)
    }

    fn get(reply: Reply) -> (Method, Reply) {
        (Method::GET, reply)
    }

    fn short_wait() -> WaitPeriods {
        WaitPeriods::new(2, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn create_sends_the_rendered_document() {
        let (client, server) = test_client();
        let yaml = format!(
            r#"apiVersion: firehose.services.k8s.aws/v1alpha1
kind: DeliveryStream
metadata:
  name: {NAME}
spec:
  deliveryStreamName: {NAME}
  kinesisStreamSourceConfiguration:
    kinesisStreamARN: arn:aws:kinesis:us-west-2:123456789012:stream/source
"#
        );
        let manifest: Manifest<DeliveryStream> = Manifest::from_yaml(&yaml, "test").unwrap();
        let server = server.run(vec![(Method::POST, stream(None))]);

        let created = client.create(&manifest).await.unwrap();
        assert_eq!(created.object_name(), NAME);

        let bodies = finish(server).await;
        assert_eq!(
            bodies[0]["spec"]["kinesisStreamSourceConfiguration"]["kinesisStreamARN"],
            "arn:aws:kinesis:us-west-2:123456789012:stream/source"
        );
        assert_eq!(&bodies[0], manifest.document());
    }

    #[tokio::test(start_paused = true)]
    async fn wait_consumed_polls_until_status_appears() {
        let (client, server) = test_client();
        let server = server.run(vec![
            get(Reply::NotFound),
            get(stream(None)),
            get(stream(Some("False"))),
        ]);

        let start = Instant::now();
        let consumed = client
            .wait_consumed(NAME, WaitPeriods::new(5, Duration::from_secs(5)))
            .await
            .unwrap();
        assert!(consumed.has_status());
        assert_eq!(start.elapsed(), Duration::from_secs(15));
        finish(server).await;
    }

    #[tokio::test]
    async fn wait_consumed_times_out() {
        tokio::time::pause();
        let (client, server) = test_client();
        let server = server.run(vec![get(stream(None)), get(stream(None))]);

        let err = client.wait_consumed(NAME, short_wait()).await.unwrap_err();
        assert!(err.to_string().contains("was not given a status"));
        finish(server).await;
    }

    #[tokio::test(start_paused = true)]
    async fn condition_is_checked_once_more_than_there_are_periods() {
        let (client, server) = test_client();
        let server = server.run(vec![
            get(stream(None)),
            get(stream(Some("Unknown"))),
            get(stream(Some("False"))),
        ]);

        let start = Instant::now();
        let err = client
            .wait_on_condition(
                NAME,
                CONDITION_TYPE_RESOURCE_SYNCED,
                CONDITION_STATUS_TRUE,
                short_wait(),
            )
            .await
            .unwrap_err();
        assert_eq!(start.elapsed(), Duration::from_secs(10));
        assert!(err.status_code().is_none());
        let message = err.to_string();
        assert!(message.contains("ACK.ResourceSynced"), "{}", message);
        assert!(message.contains("last observed: False"), "{}", message);
        finish(server).await;
    }

    #[tokio::test]
    async fn condition_met_on_first_check_does_not_wait() {
        tokio::time::pause();
        let (client, server) = test_client();
        let server = server.run(vec![get(stream(Some("True")))]);

        let start = Instant::now();
        let synced = client
            .wait_on_condition(
                NAME,
                CONDITION_TYPE_RESOURCE_SYNCED,
                CONDITION_STATUS_TRUE,
                short_wait(),
            )
            .await
            .unwrap();
        assert!(synced.is_synced());
        assert_eq!(start.elapsed(), Duration::ZERO);
        finish(server).await;
    }

    #[tokio::test]
    async fn missing_object_fails_the_condition_wait() {
        tokio::time::pause();
        let (client, server) = test_client();
        let server = server.run(vec![get(Reply::NotFound)]);

        let err = client
            .wait_on_condition(
                NAME,
                CONDITION_TYPE_RESOURCE_SYNCED,
                CONDITION_STATUS_TRUE,
                short_wait(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(StatusCode::NOT_FOUND));
        finish(server).await;
    }

    #[tokio::test]
    async fn already_deleted_objects_count_as_deleted() {
        tokio::time::pause();
        let (client, server) = test_client();
        let server = server.run(vec![(Method::DELETE, Reply::NotFound), get(Reply::NotFound)]);

        client.delete_and_wait(NAME, short_wait()).await.unwrap();
        finish(server).await;
    }

    #[tokio::test]
    async fn delete_waits_for_the_object_to_disappear() {
        tokio::time::pause();
        let (client, server) = test_client();
        let server = server.run(vec![
            (Method::DELETE, stream(Some("True"))),
            get(stream(Some("True"))),
            get(Reply::NotFound),
        ]);

        client.delete_and_wait(NAME, short_wait()).await.unwrap();
        finish(server).await;
    }

    #[tokio::test]
    async fn delete_times_out_if_the_object_remains() {
        tokio::time::pause();
        let (client, server) = test_client();
        let server = server.run(vec![
            (Method::DELETE, stream(Some("True"))),
            get(stream(Some("True"))),
            get(stream(Some("True"))),
        ]);

        let err = client.delete_and_wait(NAME, short_wait()).await.unwrap_err();
        assert!(err.to_string().contains("still existed"));
        finish(server).await;
    }
}
