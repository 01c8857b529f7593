//! In-memory backend for controller tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use leaddesk_client::{ApiRequest, RawResponse, RemoteClient, Result, Transport};

use crate::controller::Dashboard;

#[derive(Default)]
struct Backend {
    leads: Vec<Value>,
    convos: HashMap<String, Vec<Value>>,
    profile: Value,
    automation: bool,
    next_id: usize,
    queued: u32,
    integrations: Option<Value>,
    outbound: Vec<Value>,
    failures: HashMap<String, (u16, Value)>,
    overrides: HashMap<String, Value>,
    calls: Vec<String>,
}

/// Behaves like the real backend for the endpoints the controller uses.
///
/// Routes are keyed as `"METHOD /path"`, e.g. `"POST /api/outbox/run"`.
#[derive(Default)]
pub struct FakeBackend {
    inner: Mutex<Backend>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seeds leads as `(id, name, stage)`.
    pub fn with_leads(self: Arc<Self>, leads: &[(&str, &str, &str)]) -> Arc<Self> {
        {
            let mut b = self.inner.lock().unwrap();
            for (id, name, stage) in leads {
                b.leads.push(json!({"id": id, "name": name, "contact": "", "source": "", "stage": stage}));
            }
            b.next_id = b.leads.len();
        }
        self
    }

    pub fn with_automation(self: Arc<Self>, enabled: bool) -> Arc<Self> {
        self.inner.lock().unwrap().automation = enabled;
        self
    }

    pub fn with_messages(self: Arc<Self>, lead_id: &str, contents: &[&str]) -> Arc<Self> {
        {
            let mut b = self.inner.lock().unwrap();
            let convo = b.convos.entry(lead_id.to_string()).or_default();
            for content in contents {
                convo.push(json!({"role": "user", "content": content, "created_at": ""}));
            }
        }
        self
    }

    /// Seeds the integration switches.
    pub fn with_integrations(self: Arc<Self>, twilio: bool, sendgrid: bool, autosend: bool) -> Arc<Self> {
        self.inner.lock().unwrap().integrations = Some(json!({
            "twilio_enabled": u8::from(twilio),
            "sendgrid_enabled": u8::from(sendgrid),
            "autosend_enabled": u8::from(autosend),
            "autosend_channels": "sms,email",
        }));
        self
    }

    pub fn set_contact(&self, lead_id: &str, contact: &str) {
        let mut b = self.inner.lock().unwrap();
        if let Some(lead) = b.leads.iter_mut().find(|l| l["id"] == lead_id) {
            lead["contact"] = json!(contact);
        }
    }

    /// Bodies of messages waiting in the outbound queue.
    pub fn outbound(&self) -> Vec<Value> {
        self.inner.lock().unwrap().outbound.clone()
    }

    /// Makes `route` answer with `status` and `body` from now on.
    pub fn fail(&self, route: &str, status: u16, body: Value) {
        self.inner
            .lock()
            .unwrap()
            .failures
            .insert(route.to_string(), (status, body));
    }

    /// Makes `route` succeed with a fixed body from now on.
    pub fn respond(&self, route: &str, body: Value) {
        self.inner
            .lock()
            .unwrap()
            .overrides
            .insert(route.to_string(), body);
    }

    /// Routes called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn count(&self, route: &str) -> usize {
        self.calls().iter().filter(|c| *c == route).count()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    /// A controller wired to this backend that approves confirmations.
    pub fn dashboard(self: &Arc<Self>) -> Dashboard {
        Dashboard::new(RemoteClient::new(self.clone()))
            .with_confirm(Arc::new(crate::confirm::AssumeYes))
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let mut b = self.inner.lock().unwrap();
        let route = format!("{} {}", request.method, request.path());
        b.calls.push(route.clone());

        if let Some((status, body)) = b.failures.get(&route) {
            return Ok(RawResponse::new(*status, body.to_string()));
        }
        if let Some(body) = b.overrides.get(&route) {
            return Ok(RawResponse::new(200, body.to_string()));
        }

        let body = request.body.clone().unwrap_or(Value::Null);
        let segments: Vec<&str> = request.segments.iter().map(String::as_str).collect();
        let (status, payload) = match (route.split(' ').next().unwrap_or(""), segments.as_slice()) {
            ("GET", ["api", "leads"]) => (200, json!({"ok": true, "leads": b.leads})),
            ("POST", ["api", "leads"]) => {
                b.next_id += 1;
                let lead = json!({
                    "id": format!("L{}", b.next_id),
                    "name": body["name"],
                    "contact": body["contact"],
                    "source": body["source"],
                    "stage": "New",
                });
                b.leads.insert(0, lead.clone());
                (200, json!({"ok": true, "lead": lead}))
            }
            ("DELETE", ["api", "leads", id]) => {
                let before = b.leads.len();
                b.leads.retain(|l| l["id"] != *id);
                if b.leads.len() == before {
                    (404, json!({"error": "Lead not found"}))
                } else {
                    (200, json!({"ok": true}))
                }
            }
            ("POST", ["api", "leads", "bulk_delete"]) => {
                let stage = body["stage"].as_str().unwrap_or("Lost").to_string();
                let before = b.leads.len();
                b.leads.retain(|l| l["stage"] != stage.as_str());
                (200, json!({"ok": true, "deleted": before - b.leads.len()}))
            }
            ("GET", ["api", "convo", id]) => {
                let messages = b.convos.get(*id).cloned().unwrap_or_default();
                (200, json!({"ok": true, "messages": messages}))
            }
            ("POST", ["api", "salesperson", "chat"]) => {
                let id = body["lead_id"].as_str().unwrap_or_default().to_string();
                let reply = format!("re: {}", body["message"].as_str().unwrap_or_default());
                let convo = b.convos.entry(id).or_default();
                convo.push(json!({"role": "user", "content": body["message"], "created_at": ""}));
                convo.push(json!({"role": "assistant", "content": reply.clone(), "created_at": ""}));
                (200, json!({"ok": true, "reply": reply}))
            }
            ("POST", ["api", "funnel", "move"]) => {
                let id = body["lead_id"].clone();
                let stage = body["stage"].clone();
                match b.leads.iter_mut().find(|l| l["id"] == id) {
                    Some(lead) => {
                        lead["stage"] = stage;
                        (200, json!({"ok": true}))
                    }
                    None => (404, json!({"error": "Lead not found"})),
                }
            }
            ("GET", ["api", "profile"]) => (200, json!({"ok": true, "profile": b.profile})),
            ("POST", ["api", "profile"]) => {
                b.profile = body;
                (200, json!({"ok": true}))
            }
            ("GET", ["api", "usage"]) => (
                200,
                json!({"ok": true, "used_leads": b.leads.len(), "lead_cap": 100, "month": "2026-10", "plan": "pro"}),
            ),
            ("GET", ["api", "limits"]) => (
                200,
                json!({"ok": true, "limits": {"plan": "pro", "lead_cap": 100, "monthly_price_usd": 49}}),
            ),
            ("POST", ["api", "limits"]) => (200, json!({"ok": true})),
            ("GET", ["api", "automation", "state"]) => (200, json!({"enabled": b.automation})),
            ("POST", ["api", "automation", "toggle"]) => {
                b.automation = !b.automation;
                (200, json!({"ok": true, "enabled": b.automation}))
            }
            ("POST", ["api", "outbox", "enqueue_last_reply"]) => {
                b.queued += 1;
                (200, json!({"ok": true, "outbox_id": format!("ob-{}", b.queued)}))
            }
            ("POST", ["api", "outbox", "run"]) => {
                let sent = std::mem::take(&mut b.queued);
                (200, json!({"ok": true, "queued_found": sent, "sent": sent, "failed": 0}))
            }
            ("GET", ["api", "integrations"]) => {
                let integrations = b.integrations.clone().unwrap_or_else(|| {
                    json!({"twilio_enabled": 0, "sendgrid_enabled": 0, "autosend_enabled": 0, "autosend_channels": "sms,email"})
                });
                (
                    200,
                    json!({"ok": true, "integrations": integrations, "env_ready": {"twilio": false, "sendgrid": false}}),
                )
            }
            ("POST", ["api", "integrations"]) => {
                b.integrations = Some(body);
                (200, json!({"ok": true}))
            }
            ("POST", ["api", "outbound", "queue"]) => {
                if body["body"].as_str().unwrap_or("").trim().is_empty() {
                    (400, json!({"error": "body required"}))
                } else {
                    b.outbound.push(body);
                    let id = format!("out-{}", b.outbound.len());
                    (
                        200,
                        json!({"ok": true, "queued": {"id": id, "status": "queued", "created_at": ""}}),
                    )
                }
            }
            ("POST", ["api", "outbound", "run"]) => {
                let sent = std::mem::take(&mut b.outbound).len();
                (200, json!({"ok": true, "queued_found": sent, "sent": sent, "failed": 0}))
            }
            _ => (404, json!({"detail": "Not Found"})),
        };

        Ok(RawResponse::new(status, payload.to_string()))
    }
}
