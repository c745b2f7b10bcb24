//! Reply processing shared by the pipelines.
//!
//! Every capability reply passes the same gate here: validate against the
//! flow's declared shape, then decode into the typed model. Nothing in
//! this module touches a store; the session commits results only after a
//! whole reply has been admitted.

use patchwise_ai::contract::{Flow, NORMALIZE_ACK};
use patchwise_schema::validate;
use serde::Deserialize;
use serde_json::Value;

use crate::error::FlowFailure;
use crate::model::{Advisory, Asset, PatchDraft, VulnerabilityDraft};

#[derive(Debug, Deserialize)]
struct NormalizeAck {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NormalizePayload {
    normalized_data: String,
}

/// Decoded parse-scan reply.
#[derive(Debug, Deserialize)]
pub(crate) struct ScanReply {
    /// Services identified by the scan
    pub(crate) services: Vec<Asset>,
    /// One-line narrative summary of the scan
    pub(crate) summary: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CorrelationReply {
    mapped_vulnerabilities: String,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    response: String,
}

/// Turn a normalize reply into vulnerability drafts.
///
/// The acknowledgement flag is checked before the full reply shape: a
/// backend that rejects a feed answers `success: false` with a message and
/// nothing else, and that must surface as a rejection rather than a
/// missing-field violation.
pub(crate) fn normalized_items(reply: &Value) -> Result<Vec<VulnerabilityDraft>, FlowFailure> {
    validate(reply, &NORMALIZE_ACK)?;
    let ack: NormalizeAck = serde_json::from_value(reply.clone())?;
    if !ack.success {
        return Err(FlowFailure::Rejected(
            ack.message.unwrap_or_else(|| "ingestion failed".to_owned()),
        ));
    }

    validate(reply, Flow::Normalize.reply_shape())?;
    let payload: NormalizePayload = serde_json::from_value(reply.clone())?;
    extract_items(&payload.normalized_data)
}

/// Parse the normalized document and locate the item list.
///
/// In order of precedence: the `vulnerabilities` field of an object, the
/// document itself when it is an array, else a single-item list wrapping
/// the whole document. A `vulnerabilities` field holding anything other
/// than an array or null is malformed.
fn extract_items(normalized: &str) -> Result<Vec<VulnerabilityDraft>, FlowFailure> {
    let parsed: Value = serde_json::from_str(normalized)?;
    let items = match parsed {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("vulnerabilities") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) => {
                map.insert("vulnerabilities".to_owned(), Value::Null);
                vec![Value::Object(map)]
            }
            Some(_) => {
                return Err(FlowFailure::Malformed(
                    "`vulnerabilities` field is not an array".to_owned(),
                ));
            }
            None => vec![Value::Object(map)],
        },
        other => vec![other],
    };
    Ok(items.into_iter().map(VulnerabilityDraft::from_value).collect())
}

/// Validate and decode a parse-scan reply.
pub(crate) fn scan_reply(reply: &Value) -> Result<ScanReply, FlowFailure> {
    validate(reply, Flow::ParseScan.reply_shape())?;
    Ok(serde_json::from_value(reply.clone())?)
}

/// Validate a correlate reply and extract the mapping report.
pub(crate) fn correlation_report(reply: &Value) -> Result<String, FlowFailure> {
    validate(reply, Flow::Correlate.reply_shape())?;
    let decoded: CorrelationReply = serde_json::from_value(reply.clone())?;
    Ok(decoded.mapped_vulnerabilities)
}

/// Validate and decode a prioritize reply into patch drafts.
pub(crate) fn patch_drafts(reply: &Value) -> Result<Vec<PatchDraft>, FlowFailure> {
    validate(reply, Flow::Prioritize.reply_shape())?;
    Ok(serde_json::from_value(reply.clone())?)
}

/// Validate and decode an advise reply.
pub(crate) fn advisory(reply: &Value) -> Result<Advisory, FlowFailure> {
    validate(reply, Flow::Advise.reply_shape())?;
    Ok(serde_json::from_value(reply.clone())?)
}

/// Validate a chat reply and extract the answer.
pub(crate) fn chat_response(reply: &Value) -> Result<String, FlowFailure> {
    validate(reply, Flow::Chat.reply_shape())?;
    let decoded: ChatReply = serde_json::from_value(reply.clone())?;
    if decoded.response.is_empty() {
        return Err(FlowFailure::Malformed("empty chat response".to_owned()));
    }
    Ok(decoded.response)
}

/// Render the asset store as a scan-result document.
///
/// Deterministic: one `<port>` entry per asset in store order, state fixed
/// at `open`. Field values are interpolated verbatim; the consumer reads
/// the document as prompt text, not strict XML.
pub(crate) fn scan_description(assets: &[Asset]) -> String {
    let entries: Vec<String> = assets
        .iter()
        .map(|asset| {
            format!(
                r#"      <port protocol="{protocol}" portid="{port}">
        <state state="open"/>
        <service name="{name}" version="{version}"/>
      </port>"#,
                protocol = asset.protocol,
                port = asset.port,
                name = asset.service_name,
                version = asset.service_version,
            )
        })
        .collect();

    format!(
        r#"<nmaprun>
  <host>
    <ports>
{entries}
    </ports>
  </host>
</nmaprun>"#,
        entries = entries.join("\n"),
    )
}
