//! Serialisable model of an already-resolved API description.
//!
//! This is the input boundary of the crate: reference resolution, extension
//! extraction and cycle breaking all happen upstream, so everything here is a
//! plain owned tree. Collections are ordered (`Vec`, never a map) because the
//! menu traversal must be a pure function of source order.

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
/// Root of the resolved document: description sections, tag groups, tags and
/// webhooks, in the order they should appear in the outline.
pub struct Document {
    /// Free-standing description sections rendered before the API reference.
    #[serde(default)]
    pub sections: Vec<DocSection>,
    /// Optional tag groupings; when present, tags nest one level deeper.
    #[serde(default)]
    pub groups: Vec<TagGroup>,
    /// Tags in declaration order, each owning its operations.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Webhook operations, grouped under a synthetic `Webhooks` tag.
    #[serde(default)]
    pub webhooks: Vec<Operation>,
}

impl Document {
    /// Read and deserialize a resolved document from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
/// A heading-level division of the introductory description text.
pub struct DocSection {
    /// Heading text, also the source of the section slug.
    pub name: String,
    /// Markdown body under the heading.
    #[serde(default)]
    pub description: Option<String>,
    /// Nested sub-headings.
    #[serde(default)]
    pub children: Vec<DocSection>,
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
/// A named grouping of tags (`x-tagGroups` in the source format).
pub struct TagGroup {
    /// Group display name.
    pub name: String,
    /// Names of member tags, resolved against [`Document::tags`].
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
/// A tag owning the operations declared under it.
pub struct Tag {
    /// Tag name, also the source of the tag slug.
    pub name: String,
    /// Markdown description shown in the tag section.
    #[serde(default)]
    pub description: Option<String>,
    /// Operations in declaration order.
    #[serde(default)]
    pub operations: Vec<Operation>,
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
/// A single API operation (one verb on one path).
pub struct Operation {
    /// Stable operation identifier when the source declares one.
    #[serde(default)]
    pub operation_id: Option<String>,
    /// Short human-readable summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Lower-case HTTP verb.
    pub http_verb: String,
    /// Path template, e.g. `/pets/{id}`.
    pub path: String,
    /// Whether the operation is marked deprecated.
    #[serde(default)]
    pub deprecated: bool,
    /// Path, query, header and cookie parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Request body, when the operation accepts one.
    #[serde(default)]
    pub request_body: Option<RequestBody>,
    /// Responses in declaration order, keyed by status code string.
    #[serde(default)]
    pub responses: Vec<Response>,
    /// Out-of-band callbacks registered by this operation.
    #[serde(default)]
    pub callbacks: Vec<Callback>,
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
/// A parameter or response header.
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Location (`path`, `query`, `header`, `cookie`); absent for headers.
    #[serde(default, rename = "in")]
    pub location: Option<String>,
    /// Whether the parameter must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Whether the parameter is marked deprecated.
    #[serde(default)]
    pub deprecated: bool,
    /// Schema of the parameter value.
    #[serde(default)]
    pub schema: Option<Schema>,
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
/// A request body holding one media type per supported MIME.
pub struct RequestBody {
    /// Markdown description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether a body must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Media types in declaration order.
    #[serde(default)]
    pub content: Vec<MediaType>,
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
/// One MIME entry of a request or response body.
pub struct MediaType {
    /// MIME string, e.g. `application/json`.
    pub mime: String,
    /// Schema of the payload for this MIME.
    #[serde(default)]
    pub schema: Option<Schema>,
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
/// A response for one status code.
pub struct Response {
    /// Status code string (`200`, `4XX`, `default`).
    pub code: String,
    /// Markdown description.
    #[serde(default)]
    pub description: Option<String>,
    /// Response headers, modelled as fields.
    #[serde(default)]
    pub headers: Vec<Parameter>,
    /// Media types in declaration order.
    #[serde(default)]
    pub content: Vec<MediaType>,
}

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
/// A schema node, already dereferenced and cycle-free.
pub struct Schema {
    /// Optional title used for variant labels.
    #[serde(default)]
    pub title: Option<String>,
    /// Markdown description.
    #[serde(default)]
    pub description: Option<String>,
    /// Mutually-exclusive variant branches (`oneOf`).
    #[serde(default)]
    pub one_of: Vec<Schema>,
    /// Named object fields in declaration order.
    #[serde(default)]
    pub fields: Vec<SchemaField>,
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
/// A named field of an object schema.
pub struct SchemaField {
    /// Field name.
    pub name: String,
    /// Whether the field is required.
    #[serde(default)]
    pub required: bool,
    /// Whether the field is marked deprecated.
    #[serde(default)]
    pub deprecated: bool,
    /// Nested schema of the field value.
    #[serde(default)]
    pub schema: Option<Box<Schema>>,
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
/// A named callback: out-of-band operations an API consumer must implement.
pub struct Callback {
    /// Callback name from the source document.
    pub name: String,
    /// Operations invoked on the consumer.
    #[serde(default)]
    pub operations: Vec<Operation>,
}
