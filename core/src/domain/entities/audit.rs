//! Audit events shipped to the external audit sink.
//!
//! The sink receives a JSON array of `{entity, content}` envelopes. When
//! delivery fails the event is kept in the store under a fallback key
//! bucketed by the send timestamp.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::keys::{fields, format_timestamp, year_month, KeySpace};

pub const REQUEST_ENTITY: &str = "historico_envio_sms";
pub const RESPONSE_ENTITY: &str = "historico_confirmacao_sms";

/// A send accepted by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestAudit {
    pub tenant: String,
    pub phone_number: String,
    pub send_order_id: String,
    pub billing_sequence: String,
    pub provider_message_id: String,
    pub sent_at: DateTime<Utc>,
}

/// A completed verification, successful or archived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseAudit {
    pub tenant: String,
    pub send_order_id: String,
    pub billing_sequence: String,
    pub validation_code: Option<String>,
    pub sent_at: DateTime<Utc>,
    pub received_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    RequestSent(RequestAudit),
    ResponseRecorded(ResponseAudit),
}

#[derive(Serialize)]
struct RequestContent<'a> {
    id: &'a str,
    bandeira_id: &'a str,
    telefone: &'a str,
    data_hora_requisicao: String,
    identificador_sms: &'a str,
}

#[derive(Serialize)]
struct ResponseContent<'a> {
    id: &'a str,
    codigo_validacao: Option<i64>,
    data_hora_confirmacao: Option<String>,
}

impl AuditEvent {
    /// Entity name understood by the audit sink
    pub fn entity(&self) -> &'static str {
        match self {
            AuditEvent::RequestSent(_) => REQUEST_ENTITY,
            AuditEvent::ResponseRecorded(_) => RESPONSE_ENTITY,
        }
    }

    pub fn tenant(&self) -> &str {
        match self {
            AuditEvent::RequestSent(r) => &r.tenant,
            AuditEvent::ResponseRecorded(r) => &r.tenant,
        }
    }

    pub fn billing_sequence(&self) -> &str {
        match self {
            AuditEvent::RequestSent(r) => &r.billing_sequence,
            AuditEvent::ResponseRecorded(r) => &r.billing_sequence,
        }
    }

    /// Body posted to the audit sink
    pub fn to_payload(&self) -> Value {
        let content = match self {
            AuditEvent::RequestSent(r) => serde_json::to_value(RequestContent {
                id: &r.send_order_id,
                bandeira_id: &r.tenant,
                telefone: &r.phone_number,
                data_hora_requisicao: format_timestamp(r.sent_at),
                identificador_sms: &r.provider_message_id,
            }),
            AuditEvent::ResponseRecorded(r) => serde_json::to_value(ResponseContent {
                id: &r.send_order_id,
                codigo_validacao: r
                    .validation_code
                    .as_deref()
                    .map(|code| code.parse::<i64>().unwrap_or_default()),
                data_hora_confirmacao: r.received_at.map(format_timestamp),
            }),
        }
        .unwrap_or(Value::Null);
        json!([{ "entity": self.entity(), "content": content }])
    }

    /// Store key used when delivery fails
    pub fn fallback_key(&self, keys: &KeySpace) -> String {
        match self {
            AuditEvent::RequestSent(r) => keys.request_audit_fallback(
                &year_month(r.sent_at),
                &r.tenant,
                &r.billing_sequence,
            ),
            AuditEvent::ResponseRecorded(r) => keys.response_audit_fallback(
                &year_month(r.sent_at),
                &r.tenant,
                &r.billing_sequence,
            ),
        }
    }

    /// Hash fields written under the fallback key
    pub fn fallback_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            AuditEvent::RequestSent(r) => vec![
                (fields::SEND_ORDER_ID, r.send_order_id.clone()),
                (fields::PHONE_NUMBER, r.phone_number.clone()),
                (fields::PROVIDER_MESSAGE_ID, r.provider_message_id.clone()),
                (fields::SENT_AT, format_timestamp(r.sent_at)),
            ],
            AuditEvent::ResponseRecorded(r) => vec![
                (fields::SEND_ORDER_ID, r.send_order_id.clone()),
                (
                    fields::AUDIT_VALIDATION_CODE,
                    r.validation_code.clone().unwrap_or_default(),
                ),
                (
                    fields::RECEIVED_AT,
                    r.received_at.map(format_timestamp).unwrap_or_default(),
                ),
            ],
        }
    }
}
