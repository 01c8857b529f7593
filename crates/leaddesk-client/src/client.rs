//! The single choke point for backend calls, plus typed endpoint wrappers.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use leaddesk_models::{
    IntegrationSettings, Integrations, Lead, LeadId, Limits, Message, NewLead, OutboundMessage,
    OutboxId, OutboxRunReport, Profile, QueuedOutbound, Usage,
};

use crate::error::{ClientError, Result};
use crate::http::HttpTransport;
use crate::transport::{ApiRequest, Method, Transport};
use crate::types::{
    AutomationEnvelope, BulkDeleteEnvelope, ChatReply, ConvoEnvelope, CreatedLeadEnvelope,
    EnqueueEnvelope, HealthStatus, LeadsEnvelope, LimitsEnvelope, ProfileEnvelope, QueuedEnvelope,
};

/// Client for the LeadDesk backend.
#[derive(Clone)]
pub struct RemoteClient {
    transport: Arc<dyn Transport>,
}

impl RemoteClient {
    /// Creates a client over any transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Creates an HTTP client rooted at `base_url`.
    pub fn http(base_url: &str) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(base_url)?)))
    }

    /// Sends a request and normalizes the outcome.
    ///
    /// Returns the parsed JSON payload, or `None` when the body was empty or
    /// not JSON. Non-success statuses become [`ClientError::Request`].
    pub async fn call(&self, request: ApiRequest) -> Result<Option<Value>> {
        let method = request.method;
        let path = request.path();

        let response = self.transport.execute(request).await.map_err(|e| {
            warn!(%method, %path, error = %e, "request did not complete");
            e
        })?;

        let payload = parse_payload(&response.body);

        if !response.is_success() {
            let err = ClientError::from_status(response.status, payload);
            debug!(%method, %path, status = response.status, error = %err, "request rejected");
            return Err(err);
        }

        debug!(%method, %path, status = response.status, "request ok");
        Ok(payload)
    }

    async fn get<T: DeserializeOwned + Default>(&self, segments: &[&str]) -> Result<T> {
        let request = ApiRequest::new(Method::Get, segments);
        let path = request.path();
        decode(&path, self.call(request).await?)
    }

    async fn post<T: DeserializeOwned + Default>(&self, segments: &[&str], body: Value) -> Result<T> {
        let request = ApiRequest::new(Method::Post, segments).with_body(body);
        let path = request.path();
        decode(&path, self.call(request).await?)
    }

    /// GET /api/leads
    pub async fn list_leads(&self) -> Result<Vec<Lead>> {
        let env: LeadsEnvelope = self.get(&["api", "leads"]).await?;
        Ok(env.leads)
    }

    /// GET /api/convo/{lead_id}
    pub async fn conversation(&self, lead_id: &LeadId) -> Result<Vec<Message>> {
        let env: ConvoEnvelope = self.get(&["api", "convo", lead_id.as_str()]).await?;
        Ok(env.messages)
    }

    /// POST /api/salesperson/chat
    pub async fn send_chat(&self, lead_id: &LeadId, message: &str) -> Result<ChatReply> {
        self.post(
            &["api", "salesperson", "chat"],
            json!({ "lead_id": lead_id, "message": message }),
        )
        .await
    }

    /// POST /api/funnel/move
    pub async fn move_stage(&self, lead_id: &LeadId, stage: &str) -> Result<()> {
        self.call(
            ApiRequest::new(Method::Post, &["api", "funnel", "move"])
                .with_body(json!({ "lead_id": lead_id, "stage": stage })),
        )
        .await?;
        Ok(())
    }

    /// GET /api/profile
    pub async fn profile(&self) -> Result<Profile> {
        let env: ProfileEnvelope = self.get(&["api", "profile"]).await?;
        Ok(env.profile.unwrap_or_default())
    }

    /// POST /api/profile
    pub async fn save_profile(&self, profile: &Profile) -> Result<()> {
        let body = serde_json::to_value(profile).map_err(|e| ClientError::Decode {
            path: "/api/profile".into(),
            message: e.to_string(),
        })?;
        self.call(ApiRequest::new(Method::Post, &["api", "profile"]).with_body(body))
            .await?;
        Ok(())
    }

    /// POST /api/leads, returning the new lead's id.
    pub async fn create_lead(&self, lead: &NewLead) -> Result<LeadId> {
        let env: CreatedLeadEnvelope = self
            .post(
                &["api", "leads"],
                json!({ "name": lead.name, "contact": lead.contact, "source": lead.source }),
            )
            .await?;
        env.lead.map(|l| l.id).ok_or_else(|| ClientError::Decode {
            path: "/api/leads".into(),
            message: "response did not include the created lead".into(),
        })
    }

    /// DELETE /api/leads/{lead_id}
    pub async fn delete_lead(&self, lead_id: &LeadId) -> Result<()> {
        self.call(ApiRequest::new(Method::Delete, &["api", "leads", lead_id.as_str()]))
            .await?;
        Ok(())
    }

    /// POST /api/leads/bulk_delete, returning how many leads were removed.
    pub async fn bulk_delete(&self, stage: &str) -> Result<u32> {
        let env: BulkDeleteEnvelope = self
            .post(&["api", "leads", "bulk_delete"], json!({ "stage": stage }))
            .await?;
        Ok(env.deleted)
    }

    /// GET /api/usage
    pub async fn usage(&self) -> Result<Usage> {
        self.get(&["api", "usage"]).await
    }

    /// GET /api/automation/state. An absent flag reads as off.
    pub async fn automation_state(&self) -> Result<bool> {
        let env: AutomationEnvelope = self.get(&["api", "automation", "state"]).await?;
        Ok(env.enabled.unwrap_or(false))
    }

    /// POST /api/automation/toggle, returning the server's new flag.
    ///
    /// The flag is never guessed: a response without `enabled` is an error.
    pub async fn toggle_automation(&self) -> Result<bool> {
        let env: AutomationEnvelope = self
            .post(&["api", "automation", "toggle"], json!({}))
            .await?;
        env.enabled.ok_or_else(|| ClientError::Decode {
            path: "/api/automation/toggle".into(),
            message: "response did not include `enabled`".into(),
        })
    }

    /// POST /api/outbox/enqueue_last_reply
    pub async fn enqueue_last_reply(&self, lead_id: &LeadId) -> Result<OutboxId> {
        let env: EnqueueEnvelope = self
            .post(
                &["api", "outbox", "enqueue_last_reply"],
                json!({ "lead_id": lead_id }),
            )
            .await?;
        env.outbox_id.ok_or_else(|| ClientError::Decode {
            path: "/api/outbox/enqueue_last_reply".into(),
            message: "response did not include `outbox_id`".into(),
        })
    }

    /// POST /api/outbox/run
    pub async fn run_outbox(&self) -> Result<OutboxRunReport> {
        self.post(&["api", "outbox", "run"], json!({})).await
    }

    /// GET /api/integrations
    pub async fn integrations(&self) -> Result<IntegrationSettings> {
        self.get(&["api", "integrations"]).await
    }

    /// POST /api/integrations. Flags go out as `0`/`1`.
    pub async fn save_integrations(&self, integrations: &Integrations) -> Result<()> {
        self.call(ApiRequest::new(Method::Post, &["api", "integrations"]).with_body(json!({
            "twilio_enabled": u8::from(integrations.twilio_enabled),
            "sendgrid_enabled": u8::from(integrations.sendgrid_enabled),
            "autosend_enabled": u8::from(integrations.autosend_enabled),
            "autosend_channels": integrations.autosend_channels,
        })))
        .await?;
        Ok(())
    }

    /// POST /api/outbound/queue
    pub async fn queue_outbound(&self, message: &OutboundMessage) -> Result<QueuedOutbound> {
        let env: QueuedEnvelope = self
            .post(
                &["api", "outbound", "queue"],
                json!({
                    "lead_id": message.lead_id,
                    "channel": message.channel,
                    "recipient": message.recipient,
                    "subject": message.subject,
                    "body": message.body,
                }),
            )
            .await?;
        env.queued.ok_or_else(|| ClientError::Decode {
            path: "/api/outbound/queue".into(),
            message: "response did not include `queued`".into(),
        })
    }

    /// POST /api/outbound/run
    pub async fn run_outbound(&self) -> Result<OutboxRunReport> {
        self.post(&["api", "outbound", "run"], json!({})).await
    }

    /// GET /api/limits
    pub async fn limits(&self) -> Result<Limits> {
        let env: LimitsEnvelope = self.get(&["api", "limits"]).await?;
        Ok(env.limits)
    }

    /// POST /api/limits
    pub async fn save_limits(&self, limits: &Limits) -> Result<()> {
        self.call(ApiRequest::new(Method::Post, &["api", "limits"]).with_body(json!({
            "plan": limits.plan,
            "lead_cap": limits.lead_cap,
            "monthly_price_usd": limits.monthly_price_usd,
        })))
        .await?;
        Ok(())
    }

    /// GET /health
    pub async fn health(&self) -> Result<HealthStatus> {
        self.get(&["health"]).await
    }
}

fn parse_payload(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    serde_json::from_str(body).ok()
}

fn decode<T: DeserializeOwned + Default>(path: &str, payload: Option<Value>) -> Result<T> {
    match payload {
        None => Ok(T::default()),
        Some(value) => serde_json::from_value(value).map_err(|e| ClientError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RawResponse;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records what was asked.
    struct Scripted {
        responses: Mutex<VecDeque<Result<RawResponse>>>,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<RawResponse>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
            self.seen.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(RawResponse::new(200, "")))
        }
    }

    fn client(responses: Vec<Result<RawResponse>>) -> (RemoteClient, Arc<Scripted>) {
        let scripted = Scripted::new(responses);
        (RemoteClient::new(scripted.clone()), scripted)
    }

    #[tokio::test]
    async fn test_call_tolerates_empty_and_non_json_bodies() {
        let (client, _) = client(vec![
            Ok(RawResponse::new(200, "")),
            Ok(RawResponse::new(200, "<html>ok</html>")),
        ]);

        let first = client.call(ApiRequest::new(Method::Get, &["api", "usage"])).await;
        assert_eq!(first.unwrap(), None);

        let second = client.call(ApiRequest::new(Method::Get, &["api", "usage"])).await;
        assert_eq!(second.unwrap(), None);
    }

    #[tokio::test]
    async fn test_call_non_json_failure_gets_generic_message() {
        let (client, _) = client(vec![Ok(RawResponse::new(500, "Internal Server Error"))]);
        let err = client.list_leads().await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed (500)");
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_typed_calls_default_absent_fields() {
        let (client, _) = client(vec![
            Ok(RawResponse::new(200, "")),
            Ok(RawResponse::new(200, r#"{"ok": true}"#)),
            Ok(RawResponse::new(200, r#"{"ok": true}"#)),
        ]);

        assert!(client.list_leads().await.unwrap().is_empty());
        let report = client.run_outbox().await.unwrap();
        assert_eq!((report.sent, report.failed), (0, 0));
        assert!(!client.automation_state().await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle_without_flag_is_an_error() {
        let (client, _) = client(vec![Ok(RawResponse::new(200, r#"{"ok": true}"#))]);
        let err = client.toggle_automation().await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_create_lead_requires_id() {
        let (client, seen) = client(vec![
            Ok(RawResponse::new(200, r#"{"lead": {"id": "L1", "name": "Jo"}}"#)),
            Ok(RawResponse::new(200, r#"{"ok": true}"#)),
        ]);

        let id = client.create_lead(&NewLead::new("Jo", "@jo", "ig")).await.unwrap();
        assert_eq!(id, LeadId::from("L1"));
        assert!(client.create_lead(&NewLead::new("Al", "", "")).await.is_err());

        let seen = seen.seen.lock().unwrap();
        assert_eq!(seen[0].path(), "/api/leads");
        assert_eq!(seen[0].body.as_ref().unwrap()["contact"], "@jo");
    }

    #[tokio::test]
    async fn test_enqueue_accepts_numeric_ids() {
        let (client, _) = client(vec![Ok(RawResponse::new(200, r#"{"outbox_id": 42}"#))]);
        let id = client.enqueue_last_reply(&LeadId::from("L1")).await.unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[tokio::test]
    async fn test_lead_list_accepts_numeric_ids() {
        let (client, _) = client(vec![Ok(RawResponse::new(
            200,
            r#"{"leads": [{"id": 7, "name": "Jo", "stage": "New"}]}"#,
        ))]);
        let leads = client.list_leads().await.unwrap();
        assert_eq!(leads[0].id, LeadId::from("7"));
    }

    #[tokio::test]
    async fn test_integrations_round_trip_as_integers() {
        let (client, seen) = client(vec![
            Ok(RawResponse::new(
                200,
                r#"{"ok": true, "integrations": {"twilio_enabled": 1, "sendgrid_enabled": 0,
                    "autosend_enabled": 0, "autosend_channels": "sms"},
                    "env_ready": {"twilio": false, "sendgrid": true}}"#,
            )),
            Ok(RawResponse::new(200, r#"{"ok": true}"#)),
        ]);

        let mut settings = client.integrations().await.unwrap();
        assert!(settings.integrations.twilio_enabled);
        assert!(settings.env_ready.sendgrid);

        settings.integrations.autosend_enabled = true;
        client.save_integrations(&settings.integrations).await.unwrap();

        let seen = seen.seen.lock().unwrap();
        let body = seen[1].body.as_ref().unwrap();
        assert_eq!(seen[1].path(), "/api/integrations");
        assert_eq!(body["twilio_enabled"], 1);
        assert_eq!(body["autosend_enabled"], 1);
        assert_eq!(body["autosend_channels"], "sms");
    }

    #[tokio::test]
    async fn test_queue_outbound_returns_entry() {
        let (client, seen) = client(vec![
            Ok(RawResponse::new(
                200,
                r#"{"ok": true, "queued": {"id": 9, "status": "queued", "created_at": "now"}}"#,
            )),
            Ok(RawResponse::new(400, r#"{"error": "body required"}"#)),
            Ok(RawResponse::new(200, r#"{"ok": true}"#)),
        ]);
        let message = OutboundMessage {
            lead_id: Some(LeadId::from("L1")),
            channel: "email".into(),
            recipient: "jo@example.com".into(),
            subject: "Hello".into(),
            body: "Checking in".into(),
        };

        let queued = client.queue_outbound(&message).await.unwrap();
        assert_eq!(queued.id.as_str(), "9");
        assert_eq!(queued.status, "queued");

        let err = client.queue_outbound(&OutboundMessage::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "body required");

        let err = client.queue_outbound(&message).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));

        let seen = seen.seen.lock().unwrap();
        assert_eq!(seen[0].path(), "/api/outbound/queue");
        assert_eq!(seen[0].body.as_ref().unwrap()["lead_id"], "L1");
        assert_eq!(seen[0].body.as_ref().unwrap()["channel"], "email");
    }

    #[tokio::test]
    async fn test_transport_errors_pass_through() {
        let (client, _) = client(vec![Err(ClientError::Transport("refused".into()))]);
        let err = client.usage().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_decode_error() {
        let (client, _) = client(vec![Ok(RawResponse::new(200, r#"{"leads": "nope"}"#))]);
        let err = client.list_leads().await.unwrap_err();
        match err {
            ClientError::Decode { path, .. } => assert_eq!(path, "/api/leads"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
